//! The frozen record handed to the commit adapter.

use serde::Serialize;

use super::record_kind::RecordKind;
use super::value::{FieldId, TypedValue};
use crate::domain::foundation::RecordId;

/// One field of a finished record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordField {
    pub field: FieldId,
    pub value: TypedValue,
}

/// A finished, validated record, fields in catalog order.
///
/// Built once by `ConversationState::freeze` and consumed by exactly one
/// commit attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    record_id: RecordId,
    kind: RecordKind,
    fields: Vec<RecordField>,
}

impl Record {
    pub fn new(record_id: RecordId, kind: RecordKind, fields: Vec<RecordField>) -> Self {
        Self {
            record_id,
            kind,
            fields,
        }
    }

    pub fn record_id(&self) -> &RecordId {
        &self.record_id
    }

    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    pub fn fields(&self) -> &[RecordField] {
        &self.fields
    }

    /// Looks a field up by column name.
    pub fn get(&self, name: &str) -> Option<&TypedValue> {
        self.fields
            .iter()
            .find(|f| f.field.as_str() == name)
            .map(|f| &f.value)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(TypedValue::as_text)
    }

    pub fn integer(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(TypedValue::as_integer)
    }

    /// Product of likelihood and impact, for risk records.
    pub fn inherent_risk_score(&self) -> Option<i64> {
        Some(self.integer("likelihood_score")? * self.integer("impact_score")?)
    }
}
