//! Error types for SSE transports.

use std::fmt;

/// Failures reported by a [`Transport`](crate::Transport) or while assembling the
/// streaming response.
///
/// A session never returns these to its caller. A failed flush is logged and the
/// peer's absence is then discovered through `pace` returning `false`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The receiving side of the stream is gone. Bytes handed to the transport
    /// after this point are dropped.
    Disconnected,

    /// The transport was dropped before a session emitted the response headers,
    /// so there is no response to hand back to the HTTP layer.
    HeadersNotSent,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Disconnected => write!(f, "SSE peer disconnected"),
            Error::HeadersNotSent => {
                write!(f, "SSE transport closed before response headers were sent")
            }
        }
    }
}

impl std::error::Error for Error {}
