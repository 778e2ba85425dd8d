//! # Pantry Server
//!
//! HTTP API for the home inventory, grocery list and recipe book.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Pantry Server                                  │
//! │                                                                         │
//! │  Browser / scanner ───► axum Router ───► routes::* ───► pantry-db      │
//! │                              │                │                         │
//! │                              │                └──────► pantry-assist    │
//! │                              │                         (if configured)  │
//! │                              └──► ServeDir fallback (static web UI)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The router is built from an [`AppState`] so tests can drive it with an
//! in-memory database and fake collaborators.

pub mod config;
pub mod error;
pub mod render;
pub mod routes;
pub mod state;

use std::path::Path;

use axum::Router;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub use config::PantryConfig;
pub use error::{ApiError, ApiResult, ErrorCode};
pub use state::AppState;

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    routes::api_routes()
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Builds the router with the static web UI served as the fallback.
pub fn router_with_static(state: AppState, static_dir: Option<&Path>) -> Router {
    let app = router(state);
    match static_dir {
        Some(dir) => app.fallback_service(ServeDir::new(dir)),
        None => app,
    }
}
