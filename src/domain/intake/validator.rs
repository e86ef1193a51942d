//! Per-field validators.
//!
//! Every validator is a pure function of the raw answer and a
//! [`ValidationContext`]. A rejected answer never errors; it yields a
//! [`ValidationOutcome`] carrying a message the engine shows to the user.

use chrono::NaiveDateTime;

use super::datetime::{parse_flexible, parse_iso_date, FlexibleDateTime};
use super::step::{numbered_list, CatalogOptions, CatalogQuery};
use super::value::TypedValue;

/// Rule applied to the answer of one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validator {
    /// Trimmed answer has at least `n` characters.
    MinLength(usize),
    /// Trimmed answer equals one of the labels exactly (case-sensitive).
    ClosedEnum(&'static [&'static str]),
    /// Whole number within `lo..=hi`.
    BoundedInteger { lo: i64, hi: i64 },
    /// Decimal digits only.
    DigitsOnly,
    /// Whole number present among the ids returned by the catalog.
    DynamicIdLookup(CatalogQuery),
    /// Free-form date/time, see [`super::datetime`].
    FlexibleDateTime,
    /// Position in `1..=len` or a case-insensitive match of one label.
    EnumeratedSelection(&'static [&'static str]),
    /// Strict `YYYY-MM-DD` date.
    IsoDate,
}

/// Inputs a validator may consult besides the answer itself.
#[derive(Debug, Clone, Copy)]
pub struct ValidationContext<'a> {
    /// Local wall-clock time used for relative dates.
    pub now: NaiveDateTime,
    /// Options fetched for this attempt, for catalog-backed steps.
    pub options: Option<&'a CatalogOptions>,
}

impl<'a> ValidationContext<'a> {
    pub fn new(now: NaiveDateTime) -> Self {
        Self { now, options: None }
    }

    pub fn with_options(mut self, options: &'a CatalogOptions) -> Self {
        self.options = Some(options);
        self
    }
}

/// Result of validating one answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationOutcome {
    pub accepted: bool,
    pub normalized_value: Option<TypedValue>,
    /// Rejection reason, or a warning attached to an accepted answer.
    pub message: Option<String>,
}

impl ValidationOutcome {
    pub fn accept(value: TypedValue) -> Self {
        Self {
            accepted: true,
            normalized_value: Some(value),
            message: None,
        }
    }

    /// Accepted, but nothing to store (e.g. "unknown").
    pub fn accept_empty() -> Self {
        Self {
            accepted: true,
            normalized_value: None,
            message: None,
        }
    }

    pub fn accept_with_warning(value: TypedValue, warning: impl Into<String>) -> Self {
        Self {
            accepted: true,
            normalized_value: Some(value),
            message: Some(warning.into()),
        }
    }

    pub fn reject(message: impl Into<String>) -> Self {
        Self {
            accepted: false,
            normalized_value: None,
            message: Some(message.into()),
        }
    }
}

impl Validator {
    /// Validates a raw answer.
    pub fn validate(&self, raw: &str, ctx: &ValidationContext<'_>) -> ValidationOutcome {
        let input = raw.trim();
        match *self {
            Validator::MinLength(min) => min_length(input, min),
            Validator::ClosedEnum(labels) => closed_enum(input, labels),
            Validator::BoundedInteger { lo, hi } => bounded_integer(input, lo, hi),
            Validator::DigitsOnly => digits_only(input),
            Validator::DynamicIdLookup(query) => dynamic_id_lookup(input, query, ctx.options),
            Validator::FlexibleDateTime => flexible_date_time(input, ctx.now),
            Validator::EnumeratedSelection(labels) => enumerated_selection(input, labels),
            Validator::IsoDate => iso_date(input),
        }
    }

    /// Returns the catalog query this validator needs, if any.
    pub fn catalog_query(&self) -> Option<CatalogQuery> {
        match self {
            Validator::DynamicIdLookup(query) => Some(*query),
            _ => None,
        }
    }
}

fn min_length(input: &str, min: usize) -> ValidationOutcome {
    let len = input.chars().count();
    if len >= min {
        ValidationOutcome::accept(TypedValue::Text(input.to_string()))
    } else {
        ValidationOutcome::reject(format!(
            "Expected at least {} characters, got {}.",
            min, len
        ))
    }
}

fn closed_enum(input: &str, labels: &[&str]) -> ValidationOutcome {
    match labels.iter().find(|label| **label == input) {
        Some(label) => ValidationOutcome::accept(TypedValue::Text((*label).to_string())),
        None => ValidationOutcome::reject(format!(
            "'{}' is not one of: {}.",
            input,
            labels.join(", ")
        )),
    }
}

fn bounded_integer(input: &str, lo: i64, hi: i64) -> ValidationOutcome {
    match input.parse::<i64>() {
        Ok(value) if (lo..=hi).contains(&value) => {
            ValidationOutcome::accept(TypedValue::Integer(value))
        }
        Ok(value) => ValidationOutcome::reject(format!(
            "{} is outside the range {} to {}.",
            value, lo, hi
        )),
        Err(_) => ValidationOutcome::reject(format!("'{}' is not a whole number.", input)),
    }
}

fn digits_only(input: &str) -> ValidationOutcome {
    if input.is_empty() || !input.chars().all(|c| c.is_ascii_digit()) {
        return ValidationOutcome::reject(format!("'{}' must contain digits only.", input));
    }
    match input.parse::<i64>() {
        Ok(value) => ValidationOutcome::accept(TypedValue::Integer(value)),
        Err(_) => ValidationOutcome::reject(format!("{} is too large.", input)),
    }
}

fn dynamic_id_lookup(
    input: &str,
    query: CatalogQuery,
    options: Option<&CatalogOptions>,
) -> ValidationOutcome {
    let id = match input.parse::<i64>() {
        Ok(id) => id,
        Err(_) => return ValidationOutcome::reject("Please enter a valid number."),
    };

    match options {
        Some(CatalogOptions::Available(list)) => {
            if list.iter().any(|option| option.id == id) {
                ValidationOutcome::accept(TypedValue::Integer(id))
            } else {
                let ids: Vec<String> = list.iter().map(|option| option.id.to_string()).collect();
                ValidationOutcome::reject(format!(
                    "Please select a valid ID from: [{}].",
                    ids.join(", ")
                ))
            }
        }
        Some(CatalogOptions::Unavailable { reason }) => ValidationOutcome::accept_with_warning(
            TypedValue::Integer(id),
            format!(
                "⚠️ The {} catalog is unavailable ({}); ID {} was accepted without checking that it exists.",
                query, reason, id
            ),
        ),
        None => ValidationOutcome::accept_with_warning(
            TypedValue::Integer(id),
            format!(
                "⚠️ No {} were looked up; ID {} was accepted without checking that it exists.",
                query, id
            ),
        ),
    }
}

fn flexible_date_time(input: &str, now: NaiveDateTime) -> ValidationOutcome {
    match parse_flexible(input, now) {
        Some(FlexibleDateTime::Unknown) => ValidationOutcome::accept_empty(),
        Some(FlexibleDateTime::At(dt)) => ValidationOutcome::accept(TypedValue::DateTime(dt)),
        None => ValidationOutcome::reject(format!(
            "I couldn't parse '{}'. Try a format like \"2024-01-15 14:30\", \"today at 2:30 PM\", or \"unknown\".",
            input
        )),
    }
}

fn enumerated_selection(input: &str, labels: &[&str]) -> ValidationOutcome {
    let choices = || {
        format!(
            "Please choose by number (1-{}) or by name:\n{}",
            labels.len(),
            numbered_list(labels)
        )
    };

    if let Ok(position) = input.parse::<i64>() {
        return match usize::try_from(position) {
            Ok(p) if (1..=labels.len()).contains(&p) => {
                ValidationOutcome::accept(TypedValue::Text(labels[p - 1].to_string()))
            }
            _ => ValidationOutcome::reject(format!("{} is not a listed option. {}", position, choices())),
        };
    }

    let lower = input.to_lowercase();
    if lower.is_empty() {
        return ValidationOutcome::reject(choices());
    }

    if let Some(label) = labels.iter().find(|label| label.to_lowercase() == lower) {
        return ValidationOutcome::accept(TypedValue::Text((*label).to_string()));
    }

    let matches: Vec<&str> = labels
        .iter()
        .copied()
        .filter(|label| {
            let label = label.to_lowercase();
            label.contains(&lower) || lower.contains(&label)
        })
        .collect();

    match matches.as_slice() {
        [single] => ValidationOutcome::accept(TypedValue::Text((*single).to_string())),
        [] => ValidationOutcome::reject(format!("I didn't recognize '{}'. {}", input, choices())),
        several => ValidationOutcome::reject(format!(
            "'{}' matches more than one option ({}). {}",
            input,
            several.join(", "),
            choices()
        )),
    }
}

fn iso_date(input: &str) -> ValidationOutcome {
    match parse_iso_date(input) {
        Some(date) => ValidationOutcome::accept(TypedValue::Date(date)),
        None => ValidationOutcome::reject("Please enter date in YYYY-MM-DD format."),
    }
}
