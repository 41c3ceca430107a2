//! SSE HTTP handler for the web layer.
//!
//! This module contains only the Axum handler for the demo event stream.
//! Framing, pacing and the response transport live in the `sse` crate.

pub mod handler;
