//! HTTP adapters - REST API implementations.

pub mod intake;

use axum::Router;

pub use intake::{intake_routes, IntakeHandlers};

/// Full API router.
pub fn api_router(handlers: IntakeHandlers) -> Router {
    Router::new().nest("/api/intake/sessions", intake_routes(handlers))
}
