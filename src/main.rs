use log::*;
use service::{config::Config, logging::Logger, AppState};

#[tokio::main]
async fn main() {
    let config = Config::new();
    Logger::init_logger(&config);

    info!("Starting up tiny_sse");

    if !config.time_limit_exceeds_sleep() {
        warn!(
            "Stream time limit ({:?}) does not exceed the pace sleep ({:?}); \
             streams will be cut off mid-sleep",
            config.stream_time_limit(),
            config.pace_sleep()
        );
    }

    let app_state = AppState::new(config);

    if let Err(e) = web::init_server(app_state).await {
        error!("Server stopped: {e}");
        std::process::exit(1);
    }
}
