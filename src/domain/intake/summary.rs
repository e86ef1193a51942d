//! Summary rendering for confirmation.

use super::state::{CollectedField, ConversationState};
use super::step::StepDescriptor;
use super::validator::Validator;
use super::value::FieldId;

/// Placeholder for fields without an answer.
pub const MISSING: &str = "N/A";

const LIKELIHOOD: FieldId = FieldId::new("likelihood_score");
const IMPACT: FieldId = FieldId::new("impact_score");

/// Renders the collected answers in catalog order.
///
/// Never fails: steps without an answer show [`MISSING`]. Risk records get
/// an extra inherent score line (likelihood × impact) after the impact
/// score; it is display-only and not part of the record.
pub fn render_summary(state: &ConversationState) -> String {
    let catalog = state.catalog();
    let mut lines = vec![
        format!("📋 **{} Summary:**", state.record_kind().label()),
        format!("• ID: {}", state.record_id()),
    ];

    for step in catalog.steps() {
        let value = state
            .collected(step.field)
            .map(|c| display_value(step, c))
            .unwrap_or_else(|| MISSING.to_string());
        lines.push(format!("• {}: {}", step.label, value));

        if step.field == IMPACT {
            lines.push(format!("• Inherent Risk Score: {}", inherent_score(state)));
        }
    }

    lines.join("\n")
}

fn display_value(step: &StepDescriptor, collected: &CollectedField) -> String {
    let Some(value) = &collected.value else {
        return "Unknown".to_string();
    };

    match (step.validator, &collected.display_label) {
        (Validator::BoundedInteger { hi, .. }, _) => format!("{}/{}", value, hi),
        (Validator::DynamicIdLookup(_), Some(label)) => format!("{} ({})", value, label),
        _ => value.to_string(),
    }
}

fn inherent_score(state: &ConversationState) -> String {
    let score = |field| {
        state
            .collected(field)
            .and_then(|c| c.value.as_ref())
            .and_then(|v| v.as_integer())
    };
    match (score(LIKELIHOOD), score(IMPACT)) {
        (Some(likelihood), Some(impact)) => (likelihood * impact).to_string(),
        _ => MISSING.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{IntakeSessionId, Timestamp};
    use crate::domain::intake::record_kind::RecordKind;
    use crate::domain::intake::value::TypedValue;

    fn state(kind: RecordKind) -> ConversationState {
        ConversationState::new(IntakeSessionId::new(), kind, Timestamp::from_unix_secs(42))
    }

    fn answer(state: &mut ConversationState, value: TypedValue, label: Option<&str>) {
        state
            .accept(value.to_string(), Some(value), label.map(String::from), Timestamp::now())
            .unwrap();
    }

    #[test]
    fn empty_state_renders_placeholders() {
        let summary = render_summary(&state(RecordKind::Incident));
        assert!(summary.starts_with("📋 **Incident Summary:**\n• ID: INC-000042"));
        assert!(summary.contains("• Title: N/A"));
        assert!(summary.contains("• Detection Date: N/A"));
    }

    #[test]
    fn lines_follow_catalog_order() {
        let summary = render_summary(&state(RecordKind::Asset));
        let name = summary.find("• Name:").unwrap();
        let location = summary.find("• Location:").unwrap();
        assert!(name < location);
    }

    #[test]
    fn bounded_scores_show_their_maximum() {
        let mut risk = state(RecordKind::Risk);
        answer(&mut risk, TypedValue::Text("Weak passwords".into()), None);
        answer(&mut risk, TypedValue::Text("Users reuse passwords".into()), None);
        answer(&mut risk, TypedValue::Integer(3), Some("Operational"));
        answer(&mut risk, TypedValue::Integer(8), None);
        answer(&mut risk, TypedValue::Text("External hackers".into()), None);
        answer(&mut risk, TypedValue::Text("Weak policy".into()), None);
        answer(&mut risk, TypedValue::Integer(4), None);
        answer(&mut risk, TypedValue::Integer(3), None);

        let summary = render_summary(&risk);
        assert!(summary.contains("• Category: 3 (Operational)"));
        assert!(summary.contains("• Asset: 8\n"));
        assert!(summary.contains("• Likelihood Score: 4/5"));
        assert!(summary.contains("• Impact Score: 3/5\n• Inherent Risk Score: 12"));
    }

    #[test]
    fn inherent_score_missing_until_both_scores_known() {
        let summary = render_summary(&state(RecordKind::Risk));
        assert!(summary.contains("• Inherent Risk Score: N/A"));
    }

    #[test]
    fn non_risk_kinds_have_no_inherent_score() {
        assert!(!render_summary(&state(RecordKind::Asset)).contains("Inherent"));
    }

    #[test]
    fn unknown_answer_shows_unknown() {
        let mut incident = state(RecordKind::Incident);
        for _ in 0..6 {
            answer(&mut incident, TypedValue::Text("value".into()), None);
        }
        incident.accept("unknown", None, None, Timestamp::now()).unwrap();
        assert!(render_summary(&incident).contains("• Detection Date: Unknown"));
    }
}
