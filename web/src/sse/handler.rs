use crate::error::Result;
use ::sse::budget::watchdog;
use ::sse::transport::{self, Transport};
use ::sse::SseSession;
use axum::extract::{Query, State};
use axum::response::Response;
use log::*;
use serde::{Deserialize, Serialize};
use service::AppState;
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct StreamParams {
    /// Stop after this many ticks instead of the configured cap.
    ticks: Option<u64>,
}

#[derive(Debug, Serialize)]
struct Tick {
    tick: u64,
    uptime_ms: u64,
}

/// SSE handler that streams a `tick` event once per pacing cycle.
/// The stream ends when the client goes away, the tick cap is reached,
/// or the stream outlives its time limit.
pub(crate) async fn sse_handler(
    State(app_state): State<AppState>,
    Query(params): Query<StreamParams>,
) -> Result<Response> {
    let config = &app_state.config;
    let max_ticks = params.ticks.or(config.max_ticks);
    let sleep = config.pace_sleep();
    let time_limit = config.stream_time_limit();

    debug!("Establishing SSE tick stream (max ticks {max_ticks:?})");

    let (transport, pending) = transport::channel(config.stream_buffer_capacity);
    let (budget, expiry) = watchdog(time_limit);
    let session = SseSession::open(transport, config.probe_interval).with_budget(budget);

    tokio::spawn(async move {
        tokio::select! {
            ticks = produce_ticks(session, sleep, time_limit, max_ticks) => {
                debug!("SSE tick stream finished after {ticks} tick(s)");
            }
            _ = expiry.expired() => {
                warn!("SSE tick stream exceeded its time limit, closing connection");
            }
        }
    });

    Ok(pending.into_response().await?)
}

/// Emits ticks until the session reports a disconnect or `max_ticks` is reached.
/// Returns the number of ticks sent.
async fn produce_ticks<T: Transport>(
    mut session: SseSession<T>,
    sleep: Duration,
    time_limit: Duration,
    max_ticks: Option<u64>,
) -> u64 {
    let started = Instant::now();
    let mut tick = 0;

    while max_ticks.map_or(true, |max| tick < max) && session.pace(sleep, time_limit).await {
        tick += 1;
        let payload = Tick {
            tick,
            uptime_ms: millis(started.elapsed()),
        };
        session
            .send_json(Some("tick"), Some(&tick.to_string()), &payload)
            .await;
    }

    tick
}

fn millis(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::define_routes;
    use axum::body::{to_bytes, Body};
    use axum::http::header::CONTENT_TYPE;
    use axum::http::{Request, StatusCode};
    use clap::Parser;
    use service::config::Config;
    use tower::ServiceExt;

    fn app_state(args: &[&str]) -> AppState {
        let args = std::iter::once("tiny_sse").chain(args.iter().copied());
        AppState::new(Config::try_parse_from(args).unwrap())
    }

    async fn get_events(app_state: AppState, uri: &str) -> (StatusCode, String, String) {
        let response = define_routes(app_state)
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let content_type = response.headers()[CONTENT_TYPE]
            .to_str()
            .unwrap()
            .to_string();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, content_type, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test(start_paused = true)]
    async fn test_stream_sends_requested_ticks_then_ends() {
        let (status, content_type, body) =
            get_events(app_state(&["--pace-sleep-secs", "0.5"]), "/events?ticks=2").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type, "text/event-stream");
        assert_eq!(
            body,
            "id: 1\nevent: tick\ndata: {\"tick\":1,\"uptime_ms\":500}\n\n\
             id: 2\nevent: tick\ndata: {\"tick\":2,\"uptime_ms\":1000}\n\n"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_stream_uses_configured_tick_cap() {
        let (_, _, body) = get_events(app_state(&["--max-ticks", "3"]), "/events").await;

        let ids: Vec<&str> = body.lines().filter(|l| l.starts_with("id: ")).collect();
        assert_eq!(ids, vec!["id: 1", "id: 2", "id: 3"]);

        let last = body.lines().filter(|l| l.starts_with("data: ")).last().unwrap();
        let tick: serde_json::Value = serde_json::from_str(&last["data: ".len()..]).unwrap();
        assert_eq!(tick["tick"], 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_ticks_yields_empty_stream() {
        let (status, _, body) = get_events(app_state(&[]), "/events?ticks=0").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_watchdog_cuts_off_stream_sleeping_past_time_limit() {
        let state = app_state(&["--pace-sleep-secs", "5", "--stream-time-limit-secs", "2"]);
        let started = Instant::now();

        let (status, _, body) = get_events(state, "/events").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.is_empty());
        assert_eq!(started.elapsed(), Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_probe_interval_probes_before_each_tick() {
        let (transport, pending) = transport::channel(16);
        let session = SseSession::open(transport, 0);
        let response = pending.into_response().await.unwrap();

        let ticks = produce_ticks(
            session,
            Duration::from_secs(1),
            Duration::from_secs(5),
            Some(1),
        )
        .await;
        assert_eq!(ticks, 1);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(String::from_utf8(body.to_vec())
            .unwrap()
            .starts_with(": noop\n\nid: 1\nevent: tick\n"));
    }

    #[test]
    fn test_millis_saturates_instead_of_truncating() {
        assert_eq!(millis(Duration::from_millis(1500)), 1500);
        assert_eq!(millis(Duration::MAX), u64::MAX);
    }

    #[tokio::test(start_paused = true)]
    async fn test_producer_stops_when_client_is_gone() {
        let (transport, pending) = transport::channel(16);
        let session = SseSession::open(transport, 10);
        drop(pending);
        let started = Instant::now();

        let ticks = produce_ticks(
            session,
            Duration::from_secs(1),
            Duration::from_secs(30),
            None,
        )
        .await;

        assert_eq!(ticks, 0);
        assert_eq!(started.elapsed(), Duration::ZERO);
    }
}
