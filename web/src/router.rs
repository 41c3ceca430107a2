use crate::{controller::health_check_controller, sse};
use axum::{routing::get, Router};
use service::AppState;

pub fn define_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check_controller::health_check))
        .route("/events", get(sse::handler::sse_handler))
        .with_state(app_state)
}
