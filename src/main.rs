mod app;
mod auth;
mod categories;
mod compare;
mod config;
mod dashboard;
mod db;
mod error;
mod history;
mod home;
mod navigation;
mod profile;
mod state;
mod store;
mod transactions;

use crate::auth::session::log_auth_events;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "finzz=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let state = AppState::init().await?;
    tokio::spawn(log_auth_events(state.sessions.subscribe()));

    app::serve(app::build_app(state)).await
}
