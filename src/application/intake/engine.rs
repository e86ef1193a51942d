//! ConversationEngine - Drives intake sessions through their step catalog.
//!
//! The engine is the only place that talks to the catalog provider and the
//! commit adapter. It never returns an error for user input: every outcome,
//! including collaborator failures, becomes a rendered response plus a
//! transcript diagnostic.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::commit::CommitAdapter;
use super::session::IntakeSession;
use crate::domain::foundation::{IntakeSessionId, RecordId, StateMachine, Timestamp};
use crate::domain::intake::{
    render_summary, CatalogOptions, CatalogQuery, ControlToken, ConversationState, Phase,
    RecordKind, StepDescriptor, TranscriptEntry, TypedValue, ValidationContext,
};
use crate::ports::CatalogProvider;

const ACKNOWLEDGEMENT: &str = "✅ Got it!";
const EMPTY_INPUT: &str = "Please provide a response to continue.";
const CONFIRM_REMINDER: &str = "Please confirm by typing 'yes' or 'no'.";

/// What the user sees after one input, plus where the session now stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitResponse {
    pub rendered_response: String,
    pub phase: Phase,
    pub step_index: usize,
    pub total_steps: usize,
    pub record_id: RecordId,
    /// Set once the record has been committed.
    pub external_id: Option<String>,
}

impl SubmitResponse {
    fn from_state(state: &ConversationState, rendered_response: String) -> Self {
        Self {
            rendered_response,
            phase: state.phase(),
            step_index: state.current_step_index(),
            total_steps: state.total_steps(),
            record_id: state.record_id().clone(),
            external_id: state.external_id().map(String::from),
        }
    }

    /// True once the conversation was committed or cancelled.
    pub fn is_terminal(&self) -> bool {
        self.phase.is_terminal()
    }
}

/// Text to show and an optional diagnostic for the transcript.
struct Reply {
    text: String,
    diagnostic: Option<String>,
}

impl Reply {
    fn new(text: String) -> Self {
        Self {
            text,
            diagnostic: None,
        }
    }

    fn with_diagnostic(text: String, diagnostic: impl Into<String>) -> Self {
        Self {
            text,
            diagnostic: Some(diagnostic.into()),
        }
    }
}

/// Generic driver shared by all record kinds.
#[derive(Clone)]
pub struct ConversationEngine {
    catalog_provider: Arc<dyn CatalogProvider>,
    commit_adapter: CommitAdapter,
}

impl ConversationEngine {
    pub fn new(catalog_provider: Arc<dyn CatalogProvider>, commit_adapter: CommitAdapter) -> Self {
        Self {
            catalog_provider,
            commit_adapter,
        }
    }

    /// Opens a conversation at step 0 and renders the greeting.
    pub async fn start(&self, session_id: IntakeSessionId, kind: RecordKind) -> (IntakeSession, String) {
        let state = ConversationState::new(session_id, kind, Timestamp::now());
        let prompt = self.first_prompt(&state).await;
        let opening = format!(
            "{}\n\nI've generated {} ID: **{}** for this {}. \
             Type 'quit' at any time to cancel, or 'restart' to start over.\n\n{}",
            kind.greeting(),
            kind.noun(),
            state.record_id(),
            kind.noun(),
            prompt
        );

        info!(
            session_id = %session_id,
            record_kind = %kind,
            record_id = %state.record_id(),
            "Intake session started"
        );

        (IntakeSession::new(state, prompt), opening)
    }

    /// Processes one line of input.
    pub async fn submit(&self, session: &mut IntakeSession, raw: &str) -> SubmitResponse {
        let now = Timestamp::now();
        let step_index = session.state.current_step_index();
        let prompt_shown = session.last_prompt.clone();
        let mut diagnostics = Vec::new();

        if let Some(repair) = session.state.repair() {
            warn!(
                session_id = %session.id(),
                repair = %repair,
                "Conversation state was inconsistent; reset to last consistent step"
            );
            diagnostics.push(format!("protocol error: {}", repair));
        }

        let reply = match (session.state.phase(), ControlToken::parse(raw)) {
            (_, Some(ControlToken::Restart)) => self.restart(session, now, None).await,
            (Phase::Collecting, Some(token)) if token.is_abandon() => self.cancel(session, now),
            (Phase::Collecting, _) => self.collect(session, raw, now).await,
            (Phase::AwaitingConfirmation, Some(ControlToken::Yes)) => {
                self.confirm(session, now).await
            }
            (Phase::AwaitingConfirmation, Some(ControlToken::No | ControlToken::Cancel)) => {
                let notice = format!(
                    "{} registration cancelled. Let's start over!",
                    session.state.record_kind().label()
                );
                self.restart(session, now, Some(notice)).await
            }
            (Phase::AwaitingConfirmation, Some(ControlToken::Quit)) => self.cancel(session, now),
            (Phase::AwaitingConfirmation, _) => {
                session.state.touch(now);
                Reply::new(format!(
                    "{}\n\n{}",
                    render_summary(&session.state),
                    CONFIRM_REMINDER
                ))
            }
            (phase @ (Phase::Committed | Phase::Cancelled), _) => {
                session.state.touch(now);
                Reply::with_diagnostic(
                    self.terminal_reminder(&session.state),
                    format!("protocol error: input received while {}", phase),
                )
            }
        };

        diagnostics.extend(reply.diagnostic);
        session.transcript.push(TranscriptEntry {
            step_index,
            prompt: prompt_shown,
            raw_input: raw.to_string(),
            diagnostic: if diagnostics.is_empty() {
                None
            } else {
                Some(diagnostics.join("; "))
            },
            timestamp: now,
        });

        SubmitResponse::from_state(&session.state, reply.text)
    }

    /// Cancels an idle session. Returns false if it had already ended.
    pub fn expire(&self, session: &mut IntakeSession, now: Timestamp) -> bool {
        if session.state.phase().is_terminal() {
            return false;
        }
        let step_index = session.state.current_step_index();
        match session.state.cancel(now) {
            Ok(discarded) => session.discarded = discarded,
            Err(_) => return false,
        }

        info!(
            session_id = %session.id(),
            record_id = %session.state.record_id(),
            step = step_index,
            "Intake session expired after inactivity"
        );
        session.transcript.push(TranscriptEntry {
            step_index,
            prompt: session.last_prompt.clone(),
            raw_input: String::new(),
            diagnostic: Some("session expired after inactivity".to_string()),
            timestamp: now,
        });
        session.last_prompt = self.terminal_reminder(&session.state);
        true
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Collecting
    // ─────────────────────────────────────────────────────────────────────────

    async fn collect(&self, session: &mut IntakeSession, raw: &str, now: Timestamp) -> Reply {
        let Some(step) = session.state.current_step() else {
            // repair() guarantees a current step while collecting
            return Reply::with_diagnostic(session.last_prompt.clone(), "protocol error: no current step");
        };

        let input = raw.trim();
        if input.is_empty() {
            session.state.record_rejection(now);
            return Reply::with_diagnostic(EMPTY_INPUT.to_string(), "empty input");
        }

        let options = match step.validator.catalog_query() {
            Some(query) => Some(self.fetch_options(query).await),
            None => None,
        };
        let mut ctx = ValidationContext::new(now.local_naive());
        if let Some(options) = &options {
            ctx = ctx.with_options(options);
        }
        let outcome = step.validator.validate(input, &ctx);

        if !outcome.accepted {
            session.state.record_rejection(now);
            let reason = outcome.message.unwrap_or_default();
            let prompt = step.render_prompt(options.as_ref());
            debug!(
                session_id = %session.id(),
                step = session.state.current_step_index(),
                field = %step.field,
                attempts = session.state.attempts_on_current_step(),
                "Answer rejected"
            );
            let text = if reason.is_empty() {
                format!("❌ {}\n\n{}", step.error_message, prompt)
            } else {
                format!("❌ {} {}\n\n{}", step.error_message, reason, prompt)
            };
            session.last_prompt = prompt;
            return Reply::with_diagnostic(text, reason);
        }

        let display_label = match (&options, &outcome.normalized_value) {
            (Some(options), Some(TypedValue::Integer(id))) => {
                options.label_for(*id).map(String::from)
            }
            _ => None,
        };
        let warning = outcome.message;

        let phase = match session
            .state
            .accept(input, outcome.normalized_value, display_label, now)
        {
            Ok(phase) => phase,
            Err(e) => {
                return Reply::with_diagnostic(session.last_prompt.clone(), format!("protocol error: {}", e))
            }
        };
        debug!(
            session_id = %session.id(),
            step = session.state.current_step_index(),
            field = %step.field,
            "Answer accepted"
        );

        let mut text = ACKNOWLEDGEMENT.to_string();
        if let Some(warning) = &warning {
            text.push('\n');
            text.push_str(warning);
        }

        let prompt = match (phase, session.state.current_step()) {
            (Phase::Collecting, Some(next)) => self.prompt_for(next).await,
            _ => format!(
                "{}\n\nDo you want to save this {}? (yes/no)",
                render_summary(&session.state),
                session.state.record_kind().noun()
            ),
        };
        text.push_str("\n\n");
        text.push_str(&prompt);
        session.last_prompt = prompt;

        match warning {
            Some(warning) => Reply::with_diagnostic(text, warning),
            None => Reply::new(text),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Confirmation and control
    // ─────────────────────────────────────────────────────────────────────────

    async fn confirm(&self, session: &mut IntakeSession, now: Timestamp) -> Reply {
        let record = match session.state.freeze() {
            Ok(record) => record,
            Err(e) => {
                return Reply::with_diagnostic(
                    format!("{}\n\n{}", render_summary(&session.state), CONFIRM_REMINDER),
                    format!("protocol error: {}", e),
                )
            }
        };

        let outcome = self.commit_adapter.commit(&record).await;
        let kind = session.state.record_kind();

        match (outcome.success, outcome.external_id) {
            (true, Some(external_id)) => {
                if let Err(e) = session.state.mark_committed(external_id.clone(), now) {
                    return Reply::with_diagnostic(session.last_prompt.clone(), format!("protocol error: {}", e));
                }
                let text = format!(
                    "✅ {} successfully registered with ID: {} (reference {})!\n\n\
                     Type 'restart' to register another {}.",
                    kind.label(),
                    record.record_id(),
                    external_id,
                    kind.noun()
                );
                session.last_prompt = self.terminal_reminder(&session.state);
                Reply::new(text)
            }
            _ => {
                session.state.touch(now);
                let error = outcome
                    .error
                    .unwrap_or_else(|| "the store did not return an identifier".to_string());
                let text = format!(
                    "❌ Error saving {}: {}\n\n\
                     Type 'yes' to try again, 'no' to start over, or 'quit' to cancel.",
                    kind.noun(),
                    error
                );
                Reply::with_diagnostic(text, format!("commit error: {}", error))
            }
        }
    }

    async fn restart(&self, session: &mut IntakeSession, now: Timestamp, notice: Option<String>) -> Reply {
        if let Err(e) = session.state.restart(now) {
            return Reply::with_diagnostic(session.last_prompt.clone(), format!("protocol error: {}", e));
        }
        let kind = session.state.record_kind();
        info!(
            session_id = %session.id(),
            record_kind = %kind,
            record_id = %session.state.record_id(),
            "Intake session restarted"
        );

        let prompt = self.first_prompt(&session.state).await;
        let notice = notice.unwrap_or_else(|| format!("🔄 Let's register a new {}!", kind.noun()));
        let text = format!(
            "{}\nNew {} ID: **{}**\n\n{}",
            notice,
            kind.noun(),
            session.state.record_id(),
            prompt
        );
        session.last_prompt = prompt;
        Reply::new(text)
    }

    fn cancel(&self, session: &mut IntakeSession, now: Timestamp) -> Reply {
        match session.state.cancel(now) {
            Ok(discarded) => session.discarded = discarded,
            Err(e) => {
                return Reply::with_diagnostic(
                    session.last_prompt.clone(),
                    format!("protocol error: {}", e),
                )
            }
        }
        let kind = session.state.record_kind();
        info!(
            session_id = %session.id(),
            record_kind = %kind,
            record_id = %session.state.record_id(),
            "Intake session cancelled"
        );
        session.last_prompt = self.terminal_reminder(&session.state);
        Reply::new(format!(
            "👋 Goodbye! {} registration cancelled. Type 'restart' to begin a new one.",
            kind.label()
        ))
    }

    fn terminal_reminder(&self, state: &ConversationState) -> String {
        let kind = state.record_kind();
        let status = match state.phase() {
            Phase::Committed => "completed",
            _ => "cancelled",
        };
        format!(
            "{} registration {}! Type 'restart' to register another {}.",
            kind.label(),
            status,
            kind.noun()
        )
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Prompts and catalog lookups
    // ─────────────────────────────────────────────────────────────────────────

    async fn first_prompt(&self, state: &ConversationState) -> String {
        match state.catalog().step(0) {
            Some(step) => self.prompt_for(step).await,
            None => String::new(),
        }
    }

    async fn prompt_for(&self, step: &StepDescriptor) -> String {
        let options = match step.options_source {
            Some(query) => Some(self.fetch_options(query).await),
            None => None,
        };
        step.render_prompt(options.as_ref())
    }

    async fn fetch_options(&self, query: CatalogQuery) -> CatalogOptions {
        match self.catalog_provider.list_options(query).await {
            Ok(options) => CatalogOptions::Available(options),
            Err(e) => {
                warn!(
                    query = %query,
                    error = %e,
                    "Catalog lookup failed; ids will be accepted without a membership check"
                );
                CatalogOptions::Unavailable {
                    reason: e.to_string(),
                }
            }
        }
    }
}
