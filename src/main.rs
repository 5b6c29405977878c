//! Automatic Section Knowledge Test · Quiz Backend
//!
//! - Axum HTTP + WebSocket API
//! - Optional Supabase persistence (via environment variables), in-memory otherwise
//! - Embedded identity and quiz screens
//!
//! Important env variables:
//!   PORT              : u16 (default 3000)
//!   SUPABASE_URL      : enables the Supabase store together with SUPABASE_ANON_KEY
//!   SUPABASE_ANON_KEY : anon/service key sent as `apikey` and bearer token
//!   QUIZ_CONFIG_PATH  : path to TOML config (quiz knobs + optional question bank)
//!   LOG_LEVEL         : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT        : "pretty" (default) or "json"

mod telemetry;
mod util;
mod domain;
mod config;
mod error;
mod seeds;
mod state;
mod store;
mod supabase;
mod protocol;
mod quiz;
mod logic;
mod routes;

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::info;

use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  // Shared application state (question bank, quiz knobs, store handle).
  let state = Arc::new(AppState::new());
  info!(target: "quiz_backend", store = state.store.kind(), "Application state ready");

  let app = build_router(state.clone());

  // Read port from env or default to 3000.
  let addr: SocketAddr = std::env::var("PORT")
    .ok()
    .and_then(|p| p.parse::<u16>().ok())
    .map(|port| SocketAddr::from(([0, 0, 0, 0], port)))
    .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

  let listener = TcpListener::bind(addr).await?;
  info!(target: "quiz_backend", %addr, "HTTP server listening");
  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await?;
  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!(target: "quiz_backend", error = %e, "Failed to listen for Ctrl-C");
    std::future::pending::<()>().await;
  }
  info!(target: "quiz_backend", "Shutdown signal received");
}
