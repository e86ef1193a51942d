//! Intake domain module.
//!
//! A conversation walks a fixed [`StepCatalog`] one answer at a time,
//! validating each answer, then shows a summary and waits for an explicit
//! yes/no before the record is committed.
//!
//! # Phases
//!
//! - `Collecting` - answering steps `0..N`
//! - `AwaitingConfirmation` - all steps answered, summary shown
//! - `Committed` - the record sink accepted the record
//! - `Cancelled` - abandoned by the user or expired while idle

mod catalog;
mod datetime;
mod input;
mod phase;
mod record;
mod record_kind;
mod state;
mod step;
mod summary;
mod transcript;
mod validator;
mod value;

pub use catalog::StepCatalog;
pub use datetime::{parse_flexible, parse_iso_date, FlexibleDateTime};
pub use input::ControlToken;
pub use phase::Phase;
pub use record::{Record, RecordField};
pub use record_kind::RecordKind;
pub use state::{CollectedField, ConversationState};
pub use step::{numbered_list, CatalogOption, CatalogOptions, CatalogQuery, StepDescriptor};
pub use summary::{render_summary, MISSING};
pub use transcript::{SessionTranscript, Transcript, TranscriptEntry};
pub use validator::{ValidationContext, ValidationOutcome, Validator};
pub use value::{FieldId, TypedValue};
