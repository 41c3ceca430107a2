//! The output seam a session writes through, and its axum-backed implementation.

use crate::error::Error;
use async_stream::stream;
use async_trait::async_trait;
use axum::body::{Body, Bytes};
use axum::http::HeaderMap;
use axum::response::Response;
use log::*;
use std::convert::Infallible;
use tokio::sync::{mpsc, oneshot};

/// Capabilities a session consumes from the HTTP layer.
///
/// Implementations own the connection's output for one client. They are driven by
/// a single task, so none of the methods need to be reentrant.
#[async_trait]
pub trait Transport: Send {
    /// Hand the response header block to the HTTP layer. Called once, when the
    /// session opens.
    fn send_headers(&mut self, headers: HeaderMap);

    /// Buffer bytes for the next flush.
    fn write(&mut self, chunk: &str);

    /// Push everything buffered so far to the network. Returns once the bytes have
    /// been accepted by the server-side buffer.
    async fn flush(&mut self) -> Result<(), Error>;

    /// Whether the peer has gone away. Buffered transports may only notice after a
    /// write has been attempted.
    fn is_disconnected(&self) -> bool;
}

/// Writes frames into a bounded channel whose receiving end is an axum response body.
///
/// When the client disconnects, hyper drops the body, the channel closes and
/// [`Transport::is_disconnected`] starts returning `true`.
pub struct ChannelTransport {
    headers: Option<oneshot::Sender<HeaderMap>>,
    sender: mpsc::Sender<Bytes>,
    buffer: String,
}

/// The response half of a [`ChannelTransport`], waiting for the session to emit headers.
pub struct PendingResponse {
    headers: oneshot::Receiver<HeaderMap>,
    body: mpsc::Receiver<Bytes>,
}

/// Create a connected transport/response pair. `capacity` bounds how many flushed
/// frames may sit unsent before `flush` waits for the client to catch up.
pub fn channel(capacity: usize) -> (ChannelTransport, PendingResponse) {
    let (headers_tx, headers_rx) = oneshot::channel();
    let (body_tx, body_rx) = mpsc::channel(capacity.max(1));

    (
        ChannelTransport {
            headers: Some(headers_tx),
            sender: body_tx,
            buffer: String::new(),
        },
        PendingResponse {
            headers: headers_rx,
            body: body_rx,
        },
    )
}

#[async_trait]
impl Transport for ChannelTransport {
    fn send_headers(&mut self, headers: HeaderMap) {
        match self.headers.take() {
            Some(tx) => {
                if tx.send(headers).is_err() {
                    debug!("SSE response dropped before headers could be sent");
                }
            }
            None => warn!("SSE response headers already sent, ignoring second header block"),
        }
    }

    fn write(&mut self, chunk: &str) {
        self.buffer.push_str(chunk);
    }

    async fn flush(&mut self) -> Result<(), Error> {
        if self.buffer.is_empty() {
            return Ok(());
        }

        let chunk = Bytes::from(std::mem::take(&mut self.buffer));
        self.sender
            .send(chunk)
            .await
            .map_err(|_| Error::Disconnected)
    }

    fn is_disconnected(&self) -> bool {
        self.sender.is_closed()
    }
}

impl PendingResponse {
    /// Wait for the session to open, then build a streaming response carrying its
    /// headers and every frame it flushes.
    pub async fn into_response(self) -> Result<Response, Error> {
        let headers = self.headers.await.map_err(|_| Error::HeadersNotSent)?;

        let mut body = self.body;
        let stream = stream! {
            while let Some(chunk) = body.recv().await {
                yield Ok::<_, Infallible>(chunk);
            }
            debug!("SSE transport closed, ending response body");
        };

        let mut response = Response::new(Body::from_stream(stream));
        *response.headers_mut() = headers;
        Ok(response)
    }
}
