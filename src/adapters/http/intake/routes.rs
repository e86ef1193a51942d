//! HTTP routes for intake endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{get_progress, start_intake, submit_message, IntakeHandlers};

/// Creates the intake router, to be nested under `/api/intake/sessions`.
pub fn intake_routes(handlers: IntakeHandlers) -> Router {
    Router::new()
        .route("/", post(start_intake))
        .route("/:id", get(get_progress))
        .route("/:id/messages", post(submit_message))
        .with_state(handlers)
}
