//! Conversation transcript kept for audit.
//!
//! Entries are appended as the conversation runs and the whole document is
//! handed to a transcript sink once, when the session reaches a terminal
//! phase.

use serde::Serialize;

use super::phase::Phase;
use super::record_kind::RecordKind;
use super::state::{CollectedField, ConversationState};
use crate::domain::foundation::{IntakeSessionId, RecordId, Timestamp};

/// One exchange: the prompt shown and the input received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranscriptEntry {
    pub step_index: usize,
    pub prompt: String,
    pub raw_input: String,
    /// Validation message, lookup warning, commit error or protocol repair.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostic: Option<String>,
    pub timestamp: Timestamp,
}

/// Append-only log of one conversation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: TranscriptEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Diagnostics recorded so far, in order.
    pub fn diagnostics(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().filter_map(|e| e.diagnostic.as_deref())
    }

    /// Moves the entries out, leaving the transcript empty.
    pub fn take(&mut self) -> Vec<TranscriptEntry> {
        std::mem::take(&mut self.entries)
    }
}

/// Document written by a transcript sink at session end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionTranscript {
    pub session_id: IntakeSessionId,
    pub record_kind: RecordKind,
    pub record_id: RecordId,
    pub phase: Phase,
    /// True when the record was committed.
    pub completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    pub fields: Vec<CollectedField>,
    pub entries: Vec<TranscriptEntry>,
    pub started_at: Timestamp,
    pub written_at: Timestamp,
}

impl SessionTranscript {
    /// Captures the final state of a session together with its entries.
    pub fn capture(
        state: &ConversationState,
        entries: Vec<TranscriptEntry>,
        written_at: Timestamp,
    ) -> Self {
        Self {
            session_id: *state.session_id(),
            record_kind: state.record_kind(),
            record_id: state.record_id().clone(),
            phase: state.phase(),
            completed: state.phase() == Phase::Committed,
            external_id: state.external_id().map(String::from),
            fields: state.collected_fields().to_vec(),
            entries,
            started_at: *state.started_at(),
            written_at,
        }
    }

    /// File name stem: `<kind>_intake_<record-id>_<YYYYmmdd_HHMMSS>`.
    pub fn file_stem(&self) -> String {
        format!(
            "{}_intake_{}_{}",
            self.record_kind.noun(),
            self.record_id,
            self.written_at.as_datetime().format("%Y%m%d_%H%M%S")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(diagnostic: Option<&str>) -> TranscriptEntry {
        TranscriptEntry {
            step_index: 0,
            prompt: "What would you like to title this incident?".to_string(),
            raw_input: "VPN".to_string(),
            diagnostic: diagnostic.map(String::from),
            timestamp: Timestamp::from_unix_secs(0),
        }
    }

    #[test]
    fn collects_diagnostics_in_order() {
        let mut transcript = Transcript::new();
        transcript.push(entry(Some("too short")));
        transcript.push(entry(None));
        transcript.push(entry(Some("still too short")));
        let diagnostics: Vec<_> = transcript.diagnostics().collect();
        assert_eq!(diagnostics, vec!["too short", "still too short"]);
    }

    #[test]
    fn take_empties_the_transcript() {
        let mut transcript = Transcript::new();
        transcript.push(entry(None));
        assert_eq!(transcript.take().len(), 1);
        assert!(transcript.is_empty());
    }

    #[test]
    fn file_stem_names_kind_record_and_time() {
        let state = ConversationState::new(
            IntakeSessionId::new(),
            RecordKind::Risk,
            Timestamp::from_unix_secs(1_705_276_800),
        );
        let doc = SessionTranscript::capture(&state, vec![], Timestamp::from_unix_secs(1_705_276_800));
        assert_eq!(doc.file_stem(), "risk_intake_RSK-276800_20240115_000000");
        assert!(!doc.completed);
    }

    #[test]
    fn omits_empty_diagnostic_when_serialized() {
        let json = serde_json::to_value(entry(None)).unwrap();
        assert!(json.get("diagnostic").is_none());
    }
}
