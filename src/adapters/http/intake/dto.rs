//! Request and response bodies for the intake endpoints.

use serde::{Deserialize, Serialize};

use crate::application::handlers::intake::{IntakeProgress, StartIntakeResult};
use crate::application::SubmitResponse;
use crate::domain::intake::{Phase, RecordKind};

// ════════════════════════════════════════════════════════════════════════════
// Requests
// ════════════════════════════════════════════════════════════════════════════

/// Body of `POST /api/intake/sessions`.
#[derive(Debug, Clone, Deserialize)]
pub struct StartIntakeRequest {
    /// `asset`, `incident` or `risk`
    pub record_kind: String,
}

/// Body of `POST /api/intake/sessions/:id/messages`.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitMessageRequest {
    pub input: String,
}

// ════════════════════════════════════════════════════════════════════════════
// Responses
// ════════════════════════════════════════════════════════════════════════════

/// Reply to a start or a submitted message.
#[derive(Debug, Clone, Serialize)]
pub struct TurnResponse {
    pub session_id: String,
    pub record_id: String,
    pub response: String,
    pub phase: Phase,
    pub step_index: usize,
    pub total_steps: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
}

impl From<StartIntakeResult> for TurnResponse {
    fn from(result: StartIntakeResult) -> Self {
        Self {
            session_id: result.session_id.to_string(),
            record_id: result.record_id.to_string(),
            response: result.rendered_response,
            phase: result.phase,
            step_index: result.step_index,
            total_steps: result.total_steps,
            external_id: None,
        }
    }
}

impl TurnResponse {
    pub fn from_submit(session_id: String, response: SubmitResponse) -> Self {
        Self {
            session_id,
            record_id: response.record_id.to_string(),
            response: response.rendered_response,
            phase: response.phase,
            step_index: response.step_index,
            total_steps: response.total_steps,
            external_id: response.external_id,
        }
    }
}

/// One collected answer.
#[derive(Debug, Clone, Serialize)]
pub struct CollectedFieldResponse {
    pub field: String,
    pub value: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Body of `GET /api/intake/sessions/:id`.
#[derive(Debug, Clone, Serialize)]
pub struct ProgressResponse {
    pub session_id: String,
    pub record_kind: RecordKind,
    pub record_id: String,
    pub phase: Phase,
    pub step_index: usize,
    pub total_steps: usize,
    pub percentage: u8,
    pub attempts_on_current_step: u32,
    pub collected: Vec<CollectedFieldResponse>,
    pub current_prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
}

impl From<IntakeProgress> for ProgressResponse {
    fn from(progress: IntakeProgress) -> Self {
        Self {
            session_id: progress.session_id.to_string(),
            record_kind: progress.record_kind,
            record_id: progress.record_id.to_string(),
            phase: progress.phase,
            step_index: progress.step_index,
            total_steps: progress.total_steps,
            percentage: progress.percentage,
            attempts_on_current_step: progress.attempts_on_current_step,
            collected: progress
                .collected
                .into_iter()
                .map(|c| CollectedFieldResponse {
                    field: c.field.as_str().to_string(),
                    value: c
                        .value
                        .as_ref()
                        .and_then(|v| serde_json::to_value(v).ok())
                        .unwrap_or(serde_json::Value::Null),
                    label: c.display_label,
                })
                .collect(),
            current_prompt: progress.current_prompt,
            external_id: progress.external_id,
        }
    }
}

/// Error body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            code: "BAD_REQUEST".to_string(),
            message: message.into(),
        }
    }

    pub fn not_found(resource_type: &str, id: &str) -> Self {
        Self {
            code: "NOT_FOUND".to_string(),
            message: format!("{} not found: {}", resource_type, id),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            code: "INTERNAL_ERROR".to_string(),
            message: message.into(),
        }
    }
}
