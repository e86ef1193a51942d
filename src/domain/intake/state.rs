//! Conversation state aggregate.
//!
//! One `ConversationState` is owned by exactly one intake session. It holds
//! the answers accepted so far and the current phase, and enforces the
//! collection invariants; it performs no I/O.

use serde::Serialize;

use super::catalog::StepCatalog;
use super::phase::Phase;
use super::record::{Record, RecordField};
use super::record_kind::RecordKind;
use super::step::StepDescriptor;
use super::value::{FieldId, TypedValue};
use crate::domain::foundation::{
    DomainError, ErrorCode, IntakeSessionId, RecordId, StateMachine, Timestamp,
};

/// One accepted answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectedField {
    pub step_index: usize,
    pub field: FieldId,
    /// The answer as typed.
    pub raw: String,
    /// Normalized value; `None` when accepted without one (e.g. "unknown").
    pub value: Option<TypedValue>,
    /// Catalog label for dynamic id answers, when known.
    pub display_label: Option<String>,
}

/// State of one intake conversation.
///
/// # Invariants
///
/// - `collected_fields` holds exactly one entry per step with index
///   `< current_step_index`, in step order
/// - `current_step_index == total_steps` iff phase is not `Collecting`
///   (except after cancel or restart, which reset it)
/// - accepted fields are never overwritten except by a full restart
/// - `record_id` changes only on restart
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationState {
    session_id: IntakeSessionId,
    record_kind: RecordKind,
    record_id: RecordId,
    current_step_index: usize,
    collected_fields: Vec<CollectedField>,
    attempts_on_current_step: u32,
    phase: Phase,
    started_at: Timestamp,
    updated_at: Timestamp,
    external_id: Option<String>,
}

impl ConversationState {
    /// Starts collecting a new record at step 0.
    pub fn new(session_id: IntakeSessionId, record_kind: RecordKind, now: Timestamp) -> Self {
        Self {
            session_id,
            record_kind,
            record_id: RecordId::generate(record_kind.id_prefix(), &now),
            current_step_index: 0,
            collected_fields: Vec::new(),
            attempts_on_current_step: 0,
            phase: Phase::Collecting,
            started_at: now,
            updated_at: now,
            external_id: None,
        }
    }

    /// Reconstitute a state from stored parts (no validation).
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        session_id: IntakeSessionId,
        record_kind: RecordKind,
        record_id: RecordId,
        current_step_index: usize,
        collected_fields: Vec<CollectedField>,
        attempts_on_current_step: u32,
        phase: Phase,
        started_at: Timestamp,
        updated_at: Timestamp,
        external_id: Option<String>,
    ) -> Self {
        Self {
            session_id,
            record_kind,
            record_id,
            current_step_index,
            collected_fields,
            attempts_on_current_step,
            phase,
            started_at,
            updated_at,
            external_id,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn session_id(&self) -> &IntakeSessionId {
        &self.session_id
    }

    pub fn record_kind(&self) -> RecordKind {
        self.record_kind
    }

    pub fn record_id(&self) -> &RecordId {
        &self.record_id
    }

    pub fn catalog(&self) -> StepCatalog {
        StepCatalog::for_kind(self.record_kind)
    }

    pub fn current_step_index(&self) -> usize {
        self.current_step_index
    }

    pub fn total_steps(&self) -> usize {
        self.catalog().len()
    }

    /// Returns the step awaiting an answer, if collecting.
    pub fn current_step(&self) -> Option<&'static StepDescriptor> {
        if self.phase.is_collecting() {
            self.catalog().step(self.current_step_index)
        } else {
            None
        }
    }

    pub fn collected_fields(&self) -> &[CollectedField] {
        &self.collected_fields
    }

    /// Returns the accepted answer for a field, if any.
    pub fn collected(&self, field: FieldId) -> Option<&CollectedField> {
        self.collected_fields.iter().find(|c| c.field == field)
    }

    pub fn attempts_on_current_step(&self) -> u32 {
        self.attempts_on_current_step
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn started_at(&self) -> &Timestamp {
        &self.started_at
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    /// Identifier assigned by the record sink after a successful commit.
    pub fn external_id(&self) -> Option<&str> {
        self.external_id.as_deref()
    }

    /// Share of steps answered, 0-100.
    pub fn progress_percentage(&self) -> u8 {
        let total = self.total_steps();
        if total == 0 {
            return 100;
        }
        ((self.collected_fields.len() * 100) / total).min(100) as u8
    }

    /// True when no input arrived for at least `timeout_secs`.
    pub fn is_idle(&self, now: &Timestamp, timeout_secs: u64) -> bool {
        now.duration_since(&self.updated_at).num_seconds() >= timeout_secs as i64
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Stores an accepted answer for the current step and advances.
    ///
    /// Returns the phase after advancing: `Collecting` while steps remain,
    /// `AwaitingConfirmation` after the last one.
    ///
    /// # Errors
    ///
    /// - `InvalidStateTransition` if not collecting
    pub fn accept(
        &mut self,
        raw: impl Into<String>,
        value: Option<TypedValue>,
        display_label: Option<String>,
        now: Timestamp,
    ) -> Result<Phase, DomainError> {
        let step = self.current_step().ok_or_else(|| {
            DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!("Cannot accept an answer while {}", self.phase),
            )
        })?;

        self.collected_fields.push(CollectedField {
            step_index: self.current_step_index,
            field: step.field,
            raw: raw.into(),
            value,
            display_label,
        });
        self.current_step_index += 1;
        self.attempts_on_current_step = 0;

        if self.current_step_index >= self.total_steps() {
            self.transition(Phase::AwaitingConfirmation)?;
        }
        self.updated_at = now;
        Ok(self.phase)
    }

    /// Counts a rejected answer; nothing else changes.
    pub fn record_rejection(&mut self, now: Timestamp) {
        self.attempts_on_current_step += 1;
        self.updated_at = now;
    }

    /// Discards everything and starts again at step 0 with a new record id.
    pub fn restart(&mut self, now: Timestamp) -> Result<(), DomainError> {
        self.transition(Phase::Collecting)?;

        let prefix = self.record_kind.id_prefix();
        let mut record_id = RecordId::generate(prefix, &now);
        if record_id == self.record_id {
            record_id = RecordId::generate(prefix, &now.plus_secs(1));
        }

        self.record_id = record_id;
        self.current_step_index = 0;
        self.collected_fields.clear();
        self.attempts_on_current_step = 0;
        self.started_at = now;
        self.updated_at = now;
        self.external_id = None;
        Ok(())
    }

    /// Abandons the conversation, discarding collected answers.
    ///
    /// # Errors
    ///
    /// - `InvalidStateTransition` if already committed or cancelled
    ///
    /// Returns the discarded answers.
    pub fn cancel(&mut self, now: Timestamp) -> Result<Vec<CollectedField>, DomainError> {
        self.transition(Phase::Cancelled)?;
        let discarded = std::mem::take(&mut self.collected_fields);
        self.current_step_index = 0;
        self.attempts_on_current_step = 0;
        self.updated_at = now;
        Ok(discarded)
    }

    /// Builds the record to commit, fields in catalog order.
    ///
    /// Answers accepted without a value become `TypedValue::Unknown`.
    ///
    /// # Errors
    ///
    /// - `InvalidStateTransition` if not awaiting confirmation
    /// - `ProtocolViolation` if a step has no collected answer
    pub fn freeze(&self) -> Result<Record, DomainError> {
        if self.phase != Phase::AwaitingConfirmation {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!("Cannot freeze a record while {}", self.phase),
            ));
        }

        let fields = self
            .catalog()
            .steps()
            .iter()
            .map(|step| {
                let collected = self.collected(step.field).ok_or_else(|| {
                    DomainError::new(
                        ErrorCode::ProtocolViolation,
                        format!("No answer collected for '{}'", step.field),
                    )
                    .with_detail("record_id", self.record_id.as_str())
                })?;
                Ok(RecordField {
                    field: step.field,
                    value: collected.value.clone().unwrap_or(TypedValue::Unknown),
                })
            })
            .collect::<Result<Vec<_>, DomainError>>()?;

        Ok(Record::new(self.record_id.clone(), self.record_kind, fields))
    }

    /// Marks the record as persisted under `external_id`.
    pub fn mark_committed(
        &mut self,
        external_id: impl Into<String>,
        now: Timestamp,
    ) -> Result<(), DomainError> {
        self.transition(Phase::Committed)?;
        self.external_id = Some(external_id.into());
        self.updated_at = now;
        Ok(())
    }

    fn transition(&mut self, target: Phase) -> Result<(), DomainError> {
        self.phase = self
            .phase
            .transition_to(target)
            .map_err(|e| e.with_detail("record_id", self.record_id.as_str()))?;
        Ok(())
    }

    /// Records activity without changing anything else.
    pub fn touch(&mut self, now: Timestamp) {
        self.updated_at = now;
    }

    /// Restores the collection invariants if they were broken.
    ///
    /// Falls back to the last consistent position: collected answers beyond
    /// the step index are dropped, the index is pulled back to the answers
    /// actually held, and the phase is re-derived from the index. Returns a
    /// description of what was repaired, or `None` if the state was sound.
    pub fn repair(&mut self) -> Option<String> {
        if self.phase.is_terminal() {
            return None;
        }

        let total = self.total_steps();
        let mut fixes = Vec::new();

        let consistent = self
            .collected_fields
            .iter()
            .enumerate()
            .take_while(|(i, c)| {
                c.step_index == *i && self.catalog().step(*i).map(|s| s.field) == Some(c.field)
            })
            .count();
        if consistent < self.collected_fields.len() {
            fixes.push(format!(
                "dropped {} out-of-order answers",
                self.collected_fields.len() - consistent
            ));
            self.collected_fields.truncate(consistent);
        }

        let index = self.current_step_index.min(total);
        if index != self.collected_fields.len() || self.current_step_index > total {
            let held = self.collected_fields.len();
            if held > index {
                self.collected_fields.truncate(index);
            }
            fixes.push(format!(
                "step index {} realigned to {}",
                self.current_step_index,
                self.collected_fields.len()
            ));
            self.current_step_index = self.collected_fields.len();
        }

        let expected = if self.current_step_index >= total {
            Phase::AwaitingConfirmation
        } else {
            Phase::Collecting
        };
        if self.phase != expected {
            fixes.push(format!("phase {} reset to {}", self.phase, expected));
            self.phase = expected;
        }

        if fixes.is_empty() {
            None
        } else {
            Some(fixes.join("; "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start(kind: RecordKind) -> ConversationState {
        ConversationState::new(
            IntakeSessionId::new(),
            kind,
            Timestamp::from_unix_secs(1_705_276_800),
        )
    }

    fn later(secs: u64) -> Timestamp {
        Timestamp::from_unix_secs(1_705_276_800 + secs)
    }

    fn answer_all(state: &mut ConversationState) {
        while state.phase() == Phase::Collecting {
            let step = state.current_step().unwrap();
            state
                .accept("x", Some(TypedValue::Text(step.field.to_string())), None, later(1))
                .unwrap();
        }
    }

    mod construction {
        use super::*;

        #[test]
        fn starts_collecting_at_step_zero() {
            let state = start(RecordKind::Asset);
            assert_eq!(state.phase(), Phase::Collecting);
            assert_eq!(state.current_step_index(), 0);
            assert_eq!(state.total_steps(), 15);
            assert!(state.collected_fields().is_empty());
        }

        #[test]
        fn record_id_uses_kind_prefix_and_start_time() {
            let state = start(RecordKind::Incident);
            assert_eq!(state.record_id().as_str(), "INC-276800");
        }
    }

    mod accept {
        use super::*;

        #[test]
        fn advances_one_step_and_resets_attempts() {
            let mut state = start(RecordKind::Incident);
            state.record_rejection(later(1));
            assert_eq!(state.attempts_on_current_step(), 1);

            let phase = state
                .accept("Phishing wave", Some(TypedValue::Text("Phishing wave".into())), None, later(2))
                .unwrap();

            assert_eq!(phase, Phase::Collecting);
            assert_eq!(state.current_step_index(), 1);
            assert_eq!(state.attempts_on_current_step(), 0);
            assert_eq!(state.collected_fields()[0].field.as_str(), "incident_title");
        }

        #[test]
        fn last_answer_moves_to_confirmation() {
            let mut state = start(RecordKind::Incident);
            answer_all(&mut state);
            assert_eq!(state.phase(), Phase::AwaitingConfirmation);
            assert_eq!(state.current_step_index(), state.total_steps());
            assert!(state.current_step().is_none());
        }

        #[test]
        fn rejected_when_not_collecting() {
            let mut state = start(RecordKind::Incident);
            answer_all(&mut state);
            let err = state.accept("late", None, None, later(3)).unwrap_err();
            assert_eq!(err.code, ErrorCode::InvalidStateTransition);
            assert_eq!(state.collected_fields().len(), 7);
        }
    }

    mod rejection {
        use super::*;

        #[test]
        fn only_counts_attempts() {
            let mut state = start(RecordKind::Risk);
            state.accept("Title", Some(TypedValue::Text("Title".into())), None, later(1)).unwrap();
            let before = state.collected_fields().to_vec();

            state.record_rejection(later(2));
            state.record_rejection(later(3));

            assert_eq!(state.collected_fields(), before.as_slice());
            assert_eq!(state.current_step_index(), 1);
            assert_eq!(state.attempts_on_current_step(), 2);
        }
    }

    mod restart_and_cancel {
        use super::*;

        #[test]
        fn restart_clears_and_issues_new_record_id() {
            let mut state = start(RecordKind::Asset);
            let old_id = state.record_id().clone();
            answer_all(&mut state);

            state.restart(later(0)).unwrap();

            assert_eq!(state.phase(), Phase::Collecting);
            assert_eq!(state.current_step_index(), 0);
            assert!(state.collected_fields().is_empty());
            assert_eq!(state.record_kind(), RecordKind::Asset);
            assert_ne!(state.record_id(), &old_id);
        }

        #[test]
        fn restart_from_terminal_phase() {
            let mut state = start(RecordKind::Incident);
            state.cancel(later(1)).unwrap();
            state.restart(later(5)).unwrap();
            assert_eq!(state.phase(), Phase::Collecting);
            assert_eq!(state.record_id().as_str(), "INC-276805");
        }

        #[test]
        fn cancel_discards_answers() {
            let mut state = start(RecordKind::Asset);
            state.accept("Server-01", Some(TypedValue::Text("Server-01".into())), None, later(1)).unwrap();
            let discarded = state.cancel(later(2)).unwrap();
            assert_eq!(state.phase(), Phase::Cancelled);
            assert!(state.collected_fields().is_empty());
            assert_eq!(discarded.len(), 1);
            assert_eq!(discarded[0].raw, "Server-01");
        }

        #[test]
        fn cannot_cancel_twice() {
            let mut state = start(RecordKind::Asset);
            state.cancel(later(1)).unwrap();
            assert!(state.cancel(later(2)).is_err());
        }
    }

    mod freeze {
        use super::*;

        #[test]
        fn builds_record_in_catalog_order() {
            let mut state = start(RecordKind::Incident);
            answer_all(&mut state);
            let record = state.freeze().unwrap();
            let names: Vec<_> = record.fields().iter().map(|f| f.field.as_str()).collect();
            assert_eq!(names.first(), Some(&"incident_title"));
            assert_eq!(names.last(), Some(&"detected_date"));
            assert_eq!(record.record_id(), state.record_id());
        }

        #[test]
        fn missing_value_becomes_unknown() {
            let mut state = start(RecordKind::Incident);
            while state.current_step_index() < 6 {
                state.accept("x", Some(TypedValue::Text("x".into())), None, later(1)).unwrap();
            }
            state.accept("unknown", None, None, later(2)).unwrap();
            let record = state.freeze().unwrap();
            assert_eq!(record.get("detected_date"), Some(&TypedValue::Unknown));
        }

        #[test]
        fn refused_while_collecting() {
            assert!(start(RecordKind::Risk).freeze().is_err());
        }
    }

    mod commit {
        use super::*;

        #[test]
        fn mark_committed_stores_external_id() {
            let mut state = start(RecordKind::Incident);
            answer_all(&mut state);
            state.mark_committed("42", later(9)).unwrap();
            assert_eq!(state.phase(), Phase::Committed);
            assert_eq!(state.external_id(), Some("42"));
            assert_eq!(state.collected_fields().len(), 7);
        }

        #[test]
        fn cannot_commit_while_collecting() {
            let mut state = start(RecordKind::Incident);
            assert!(state.mark_committed("42", later(1)).is_err());
        }
    }

    mod repair {
        use super::*;

        fn field(index: usize, name: &'static str) -> CollectedField {
            CollectedField {
                step_index: index,
                field: FieldId::new(name),
                raw: "x".to_string(),
                value: Some(TypedValue::Text("x".to_string())),
                display_label: None,
            }
        }

        fn broken(index: usize, fields: Vec<CollectedField>, phase: Phase) -> ConversationState {
            ConversationState::reconstitute(
                IntakeSessionId::new(),
                RecordKind::Incident,
                RecordId::new("INC-000001").unwrap(),
                index,
                fields,
                0,
                phase,
                later(0),
                later(0),
                None,
            )
        }

        #[test]
        fn sound_state_is_untouched() {
            let mut state = start(RecordKind::Incident);
            assert_eq!(state.repair(), None);
        }

        #[test]
        fn index_ahead_of_answers_is_pulled_back() {
            let mut state = broken(3, vec![field(0, "incident_title")], Phase::Collecting);
            assert!(state.repair().is_some());
            assert_eq!(state.current_step_index(), 1);
            assert_eq!(state.phase(), Phase::Collecting);
        }

        #[test]
        fn confirmation_with_missing_answers_returns_to_collecting() {
            let mut state = broken(
                7,
                vec![field(0, "incident_title"), field(1, "incident_description")],
                Phase::AwaitingConfirmation,
            );
            state.repair().unwrap();
            assert_eq!(state.current_step_index(), 2);
            assert_eq!(state.phase(), Phase::Collecting);
        }

        #[test]
        fn out_of_order_answers_are_dropped() {
            let mut state = broken(
                2,
                vec![field(0, "incident_title"), field(1, "severity")],
                Phase::Collecting,
            );
            state.repair().unwrap();
            assert_eq!(state.collected_fields().len(), 1);
            assert_eq!(state.current_step_index(), 1);
        }
    }

    #[test]
    fn idle_after_timeout() {
        let state = start(RecordKind::Asset);
        assert!(!state.is_idle(&later(59), 60));
        assert!(state.is_idle(&later(60), 60));
    }

    #[test]
    fn progress_percentage_counts_answers() {
        let mut state = start(RecordKind::Incident);
        assert_eq!(state.progress_percentage(), 0);
        answer_all(&mut state);
        assert_eq!(state.progress_percentage(), 100);
    }
}
