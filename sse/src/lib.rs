//! Server-Sent Events (SSE) session layer for long-lived HTTP responses.
//!
//! This crate frames discrete events onto a single persistent response and keeps
//! that response alive while staying responsive to client disconnects and
//! server-side time limits.
//!
//! # Architecture
//!
//! - **One session per connection**: an [`SseSession`] exclusively owns the output
//!   stream of one client for the lifetime of the connection. It is driven by a
//!   single task and needs no locking.
//! - **Flush per frame**: every event or comment is written and flushed before the
//!   call returns, so frames reach the client in call order.
//! - **Liveness probes**: [`SseSession::pace`] injects a `noop` comment every
//!   `probe_interval` cycles. Many transports only learn about a vanished peer
//!   after an attempted write.
//! - **Cooperative time limits**: each pacing cycle extends an [`ExecutionBudget`]
//!   before sleeping, so a watchdog never cuts a healthy stream off mid-sleep.
//!
//! # Example: a producer loop
//!
//! ```rust,ignore
//! use sse::{transport, SseSession};
//! use std::time::Duration;
//!
//! let (transport, pending) = transport::channel(16);
//! let mut session = SseSession::open(transport, 10);
//!
//! tokio::spawn(async move {
//!     let mut n = 0u64;
//!     while session.pace(Duration::from_secs(1), Duration::from_secs(30)).await {
//!         n += 1;
//!         session.send_event(&n.to_string(), Some("tick"), Some(&n.to_string())).await;
//!     }
//! });
//!
//! // Hand `pending.into_response().await?` back to axum.
//! ```
//!
//! # Modules
//!
//! - `budget`: execution budgets (`Unbounded` and the cooperative `Watchdog`)
//! - `error`: transport and response assembly errors
//! - `frame`: line-exact encoding of event and comment frames
//! - `headers`: the response headers that mark a stream as SSE
//! - `session`: the `SseSession` framing and pacing primitive
//! - `transport`: the `Transport` seam and its axum-backed channel implementation

pub mod budget;
pub mod error;
pub mod frame;
pub mod headers;
pub mod session;
pub mod transport;

pub use budget::{ExecutionBudget, Unbounded};
pub use error::Error;
pub use session::SseSession;
pub use transport::Transport;
