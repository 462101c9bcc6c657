//! Keep-alive HTTP listener.
//!
//! Some hosts cold-start the process unless something pings it over
//! HTTP. This answers health GETs and logs whatever the pinger POSTs.

use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use tracing::info;

pub fn router() -> Router {
    Router::new().route("/", get(health).post(log_ping))
}

/// Bind and serve until the process exits.
pub async fn serve(port: u16) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!(port, "keep-alive listener up");
    axum::serve(listener, router()).await
}

async fn health() -> &'static str {
    "ok"
}

async fn log_ping(body: String) -> StatusCode {
    info!(body = %body, "keep-alive ping");
    StatusCode::OK
}
