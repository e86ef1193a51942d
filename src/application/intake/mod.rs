//! Intake application services.
//!
//! - `ConversationEngine` - drives one session through its step catalog
//! - `CommitAdapter` - single-attempt hand-off of confirmed records to a sink
//! - `SessionRegistry` - live sessions for the HTTP surface

mod commit;
mod engine;
mod registry;
mod session;

pub use commit::{CommitAdapter, CommitOutcome};
pub use engine::{ConversationEngine, SubmitResponse};
pub use registry::{SessionHandle, SessionRegistry};
pub use session::{flush_transcript, IntakeSession};
