use log::*;
use service::AppState;
use tokio::net::TcpListener;

mod controller;
pub mod error;
pub mod router;
mod sse;

pub async fn init_server(app_state: AppState) -> std::io::Result<()> {
    let interface = app_state.config.interface().to_string();
    let port = app_state.config.port;

    let listener = TcpListener::bind((interface.as_str(), port)).await?;
    info!("Server starting... listening for connections on http://{interface}:{port}");
    info!(
        "Streams pace every {:?}, probe after {} quiet cycle(s), time limit {:?}",
        app_state.config.pace_sleep(),
        app_state.config.probe_interval,
        app_state.config.stream_time_limit(),
    );

    axum::serve(listener, router::define_routes(app_state)).await
}
