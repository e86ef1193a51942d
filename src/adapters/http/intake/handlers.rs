//! HTTP handlers for intake endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::application::handlers::intake::{
    GetProgressHandler, GetProgressQuery, StartIntakeCommand, StartIntakeHandler,
    SubmitAnswerCommand, SubmitAnswerHandler,
};
use crate::domain::foundation::{DomainError, ErrorCode, IntakeSessionId};
use crate::domain::intake::RecordKind;

use super::dto::{
    ErrorResponse, ProgressResponse, StartIntakeRequest, SubmitMessageRequest, TurnResponse,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct IntakeHandlers {
    start_handler: Arc<StartIntakeHandler>,
    submit_handler: Arc<SubmitAnswerHandler>,
    progress_handler: Arc<GetProgressHandler>,
}

impl IntakeHandlers {
    pub fn new(
        start_handler: Arc<StartIntakeHandler>,
        submit_handler: Arc<SubmitAnswerHandler>,
        progress_handler: Arc<GetProgressHandler>,
    ) -> Self {
        Self {
            start_handler,
            submit_handler,
            progress_handler,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/intake/sessions - Start a conversation
pub async fn start_intake(
    State(handlers): State<IntakeHandlers>,
    Json(req): Json<StartIntakeRequest>,
) -> Response {
    let record_kind = match req.record_kind.parse::<RecordKind>() {
        Ok(kind) => kind,
        Err(e) => return handle_intake_error(e.into()),
    };

    let result = handlers
        .start_handler
        .handle(StartIntakeCommand { record_kind })
        .await;
    let response: TurnResponse = result.into();
    (StatusCode::CREATED, Json(response)).into_response()
}

/// POST /api/intake/sessions/:id/messages - Submit one line of input
pub async fn submit_message(
    State(handlers): State<IntakeHandlers>,
    Path(session_id): Path<String>,
    Json(req): Json<SubmitMessageRequest>,
) -> Response {
    let session_id = match session_id.parse::<IntakeSessionId>() {
        Ok(id) => id,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::bad_request("Invalid session ID")),
            )
                .into_response()
        }
    };

    let cmd = SubmitAnswerCommand {
        session_id,
        input: req.input,
    };

    match handlers.submit_handler.handle(cmd).await {
        Ok(response) => (
            StatusCode::OK,
            Json(TurnResponse::from_submit(session_id.to_string(), response)),
        )
            .into_response(),
        Err(e) => handle_intake_error(e),
    }
}

/// GET /api/intake/sessions/:id - Conversation progress
pub async fn get_progress(
    State(handlers): State<IntakeHandlers>,
    Path(session_id): Path<String>,
) -> Response {
    let session_id = match session_id.parse::<IntakeSessionId>() {
        Ok(id) => id,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::bad_request("Invalid session ID")),
            )
                .into_response()
        }
    };

    match handlers
        .progress_handler
        .handle(GetProgressQuery { session_id })
        .await
    {
        Ok(progress) => {
            let response: ProgressResponse = progress.into();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_intake_error(e),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Error handling
// ════════════════════════════════════════════════════════════════════════════

fn handle_intake_error(error: DomainError) -> Response {
    match error.code {
        ErrorCode::SessionNotFound => {
            let id = error
                .details
                .get("session_id")
                .cloned()
                .unwrap_or_default();
            (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse::not_found("Intake session", &id)),
            )
                .into_response()
        }
        ErrorCode::ValidationFailed => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request(error.message)),
        )
            .into_response(),
        _ => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::internal(error.message)),
        )
            .into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_not_found_maps_to_404() {
        let error = DomainError::new(ErrorCode::SessionNotFound, "gone")
            .with_detail("session_id", "abc");
        assert_eq!(handle_intake_error(error).status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn validation_failure_maps_to_400() {
        let error = DomainError::new(ErrorCode::ValidationFailed, "bad");
        assert_eq!(handle_intake_error(error).status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn unknown_record_kind_maps_to_400() {
        let error: DomainError = "vehicle".parse::<RecordKind>().unwrap_err().into();
        assert_eq!(error.code, ErrorCode::ValidationFailed);
        assert_eq!(handle_intake_error(error).status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn other_errors_map_to_500() {
        let error = DomainError::new(ErrorCode::ProtocolViolation, "boom");
        assert_eq!(
            handle_intake_error(error).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
