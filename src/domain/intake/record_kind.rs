//! Record kinds collected by the intake engine.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// The kind of record a conversation collects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Asset,
    Incident,
    Risk,
}

impl RecordKind {
    /// All kinds, in display order.
    pub const ALL: [RecordKind; 3] = [RecordKind::Asset, RecordKind::Incident, RecordKind::Risk];

    /// Short prefix of generated record identifiers.
    pub fn id_prefix(&self) -> &'static str {
        match self {
            Self::Asset => "AST-",
            Self::Incident => "INC-",
            Self::Risk => "RSK-",
        }
    }

    /// Lowercase noun used in conversational text.
    pub fn noun(&self) -> &'static str {
        match self {
            Self::Asset => "asset",
            Self::Incident => "incident",
            Self::Risk => "risk",
        }
    }

    /// Capitalised label used in headings.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Asset => "Asset",
            Self::Incident => "Incident",
            Self::Risk => "Risk",
        }
    }

    /// Opening line shown when a conversation starts.
    pub fn greeting(&self) -> &'static str {
        match self {
            Self::Asset => "👋 Hi! I'm here to help you register a new asset step by step.",
            Self::Incident => "👋 Hello! I'm here to help you report a security incident.",
            Self::Risk => "👋 Let's register a new risk in the risk register.",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.noun())
    }
}

impl FromStr for RecordKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asset" => Ok(Self::Asset),
            "incident" => Ok(Self::Incident),
            "risk" => Ok(Self::Risk),
            other => Err(ValidationError::invalid_format(
                "record_kind",
                format!("unknown record kind '{}', expected asset, incident or risk", other),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixes_are_kind_specific() {
        assert_eq!(RecordKind::Asset.id_prefix(), "AST-");
        assert_eq!(RecordKind::Incident.id_prefix(), "INC-");
        assert_eq!(RecordKind::Risk.id_prefix(), "RSK-");
    }

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("Asset".parse::<RecordKind>().unwrap(), RecordKind::Asset);
        assert_eq!(" risk ".parse::<RecordKind>().unwrap(), RecordKind::Risk);
        assert!("vendor".parse::<RecordKind>().is_err());
    }

    #[test]
    fn serializes_to_snake_case() {
        let json = serde_json::to_string(&RecordKind::Incident).unwrap();
        assert_eq!(json, "\"incident\"");
    }
}
