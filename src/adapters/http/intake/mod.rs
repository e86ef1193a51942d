//! HTTP adapter for intake conversations.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    CollectedFieldResponse, ErrorResponse, ProgressResponse, StartIntakeRequest,
    SubmitMessageRequest, TurnResponse,
};
pub use handlers::IntakeHandlers;
pub use routes::intake_routes;
