//! Step descriptors and catalog lookups.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::validator::Validator;
use super::value::FieldId;

/// A lookup against the external catalog of valid ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogQuery {
    /// Risk categories (`id`, `category_name`).
    RiskCategories,
    /// Registered information assets (`id`, `asset_name`).
    InformationAssets,
}

impl fmt::Display for CatalogQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RiskCategories => f.write_str("risk categories"),
            Self::InformationAssets => f.write_str("information assets"),
        }
    }
}

/// One entry returned by the catalog provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogOption {
    pub id: i64,
    pub label: String,
}

impl CatalogOption {
    pub fn new(id: i64, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
        }
    }
}

/// Options fetched for the step currently being answered.
///
/// Lives only for the duration of one prompt or validation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogOptions {
    Available(Vec<CatalogOption>),
    Unavailable { reason: String },
}

impl CatalogOptions {
    /// Returns the label of the option with the given id, if known.
    pub fn label_for(&self, id: i64) -> Option<&str> {
        match self {
            Self::Available(options) => options
                .iter()
                .find(|option| option.id == id)
                .map(|option| option.label.as_str()),
            Self::Unavailable { .. } => None,
        }
    }
}

/// One question of an intake conversation.
#[derive(Debug, Clone, PartialEq)]
pub struct StepDescriptor {
    /// Field the answer is stored under.
    pub field: FieldId,
    /// Caption used in the summary.
    pub label: &'static str,
    /// Question text.
    pub prompt: &'static str,
    pub validator: Validator,
    /// Static message shown whenever the answer is rejected.
    pub error_message: &'static str,
    /// Catalog lookup whose options are listed under the prompt.
    pub options_source: Option<CatalogQuery>,
}

impl StepDescriptor {
    /// Renders the prompt, listing options inline when the step has any.
    ///
    /// `options` must be the result of querying `options_source`; it is
    /// ignored for steps without one.
    pub fn render_prompt(&self, options: Option<&CatalogOptions>) -> String {
        let mut prompt = self.prompt.to_string();

        if let Validator::EnumeratedSelection(labels) = self.validator {
            prompt.push_str("\n\n");
            prompt.push_str(&numbered_list(labels));
        }

        if self.options_source.is_some() {
            match options {
                Some(CatalogOptions::Available(list)) if !list.is_empty() => {
                    for option in list {
                        prompt.push_str(&format!("\n{}: {}", option.id, option.label));
                    }
                }
                Some(CatalogOptions::Available(_)) => {
                    prompt.push_str("\n(No options are currently registered.)");
                }
                Some(CatalogOptions::Unavailable { reason }) => {
                    prompt.push_str(&format!(
                        "\n⚠️ The option list could not be loaded ({}). \
                         Enter the ID directly; it cannot be verified right now.",
                        reason
                    ));
                }
                None => {}
            }
        }

        prompt
    }
}

/// Renders `1. A\n2. B...` for positional selection.
pub fn numbered_list(labels: &[&str]) -> String {
    labels
        .iter()
        .enumerate()
        .map(|(i, label)| format!("{}. {}", i + 1, label))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup_step() -> StepDescriptor {
        StepDescriptor {
            field: FieldId::new("category_id"),
            label: "Category",
            prompt: "Please select a risk category by entering its ID:",
            validator: Validator::DynamicIdLookup(CatalogQuery::RiskCategories),
            error_message: "Please select a valid category ID.",
            options_source: Some(CatalogQuery::RiskCategories),
        }
    }

    #[test]
    fn lists_catalog_options_as_id_colon_label() {
        let options = CatalogOptions::Available(vec![
            CatalogOption::new(3, "Operational"),
            CatalogOption::new(7, "Strategic"),
        ]);
        let prompt = lookup_step().render_prompt(Some(&options));
        assert!(prompt.ends_with("\n3: Operational\n7: Strategic"));
    }

    #[test]
    fn warns_when_catalog_unavailable() {
        let options = CatalogOptions::Unavailable {
            reason: "connection refused".to_string(),
        };
        let prompt = lookup_step().render_prompt(Some(&options));
        assert!(prompt.contains("⚠️"));
        assert!(prompt.contains("connection refused"));
    }

    #[test]
    fn enumerated_selection_lists_numbered_labels() {
        let step = StepDescriptor {
            field: FieldId::new("severity"),
            label: "Severity",
            prompt: "What's the severity level of this incident?",
            validator: Validator::EnumeratedSelection(&["Low", "High"]),
            error_message: "Please choose a valid severity level.",
            options_source: None,
        };
        assert_eq!(
            step.render_prompt(None),
            "What's the severity level of this incident?\n\n1. Low\n2. High"
        );
    }

    #[test]
    fn label_for_finds_known_ids() {
        let options = CatalogOptions::Available(vec![CatalogOption::new(3, "Operational")]);
        assert_eq!(options.label_for(3), Some("Operational"));
        assert_eq!(options.label_for(4), None);
    }
}
