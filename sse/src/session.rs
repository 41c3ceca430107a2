use crate::budget::{ExecutionBudget, Unbounded};
use crate::frame;
use crate::headers::sse_headers;
use crate::transport::Transport;
use log::*;
use serde::Serialize;
use std::time::Duration;

/// Comment sent to exercise the transport so a vanished peer can be noticed.
const PROBE: &str = "noop";

/// One client's event stream.
///
/// The session owns the connection's output for its whole lifetime and is driven by
/// a single task. It has no closed state: a disconnect is discovered through
/// [`SseSession::pace`] returning `false`, after which the caller should stop
/// producing frames and drop the session.
pub struct SseSession<T: Transport> {
    transport: T,
    budget: Box<dyn ExecutionBudget>,
    probe_interval: u32,
    frames_since_probe: u32,
}

impl<T: Transport> SseSession<T> {
    /// Emit the event-stream headers and start a session over `transport`.
    ///
    /// `probe_interval` is the number of pacing cycles allowed without a write
    /// before a liveness probe is forced. Zero probes on every cycle.
    pub fn open(mut transport: T, probe_interval: u32) -> Self {
        transport.send_headers(sse_headers());
        debug!("Opened SSE session (probe interval {probe_interval})");

        Self {
            transport,
            budget: Box::new(Unbounded),
            probe_interval,
            frames_since_probe: 0,
        }
    }

    /// Extend `budget` on every pacing cycle instead of running unbounded.
    pub fn with_budget(mut self, budget: impl ExecutionBudget + 'static) -> Self {
        self.budget = Box::new(budget);
        self
    }

    pub fn probe_interval(&self) -> u32 {
        self.probe_interval
    }

    /// Pacing cycles since the last frame of any kind was sent.
    pub fn frames_since_probe(&self) -> u32 {
        self.frames_since_probe
    }

    /// Send `data` as one event, one `data:` line per line of input, preceded by the
    /// optional `id:` and `event:` lines. Flushes before returning.
    /// `Some("")` is not treated as absent: it emits an empty `id: ` or `event: ` line.
    pub async fn send_event(&mut self, data: &str, event_name: Option<&str>, id: Option<&str>) {
        self.emit(frame::event(data, event_name, id)).await;
    }

    /// Send a comment frame. Clients ignore these, so they are safe filler.
    pub async fn send_comment(&mut self, text: &str) {
        self.emit(frame::comment(text)).await;
    }

    /// Serialize `value` as JSON and send it as the event's data.
    ///
    /// A value that fails to serialize is logged and nothing is sent.
    pub async fn send_json<S: Serialize>(
        &mut self,
        event_name: Option<&str>,
        id: Option<&str>,
        value: &S,
    ) {
        let data = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to serialize SSE event data: {e}");
                return;
            }
        };

        self.send_event(&data, event_name, id).await;
    }

    /// Wait between production cycles, probing for a disconnected client.
    ///
    /// Call this once per iteration of the producing loop in place of a plain sleep.
    /// Every `probe_interval + 1` cycles without a frame a `noop` comment is written
    /// first, because many transports only notice a dead peer after a write. Returns
    /// `false` without sleeping once the client is gone.
    ///
    /// `time_limit` is handed to the execution budget before sleeping and must be
    /// longer than `sleep`.
    pub async fn pace(&mut self, sleep: Duration, time_limit: Duration) -> bool {
        self.frames_since_probe = self.frames_since_probe.saturating_add(1);
        if self.frames_since_probe > self.probe_interval {
            debug!("No SSE frame for {} cycles, sending probe", self.probe_interval);
            self.send_comment(PROBE).await;
        }

        if self.transport.is_disconnected() {
            debug!("SSE client disconnected, stopping");
            return false;
        }

        self.budget.extend(time_limit);
        tokio::time::sleep(sleep).await;
        true
    }

    async fn emit(&mut self, frame: String) {
        self.frames_since_probe = 0;
        trace!("Sending SSE frame: {frame:?}");

        self.transport.write(&frame);
        if let Err(e) = self.transport.flush().await {
            warn!("Failed to flush SSE frame: {e}. Client will be treated as gone.");
        }
    }
}
