//! Application layer - Engine, Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! `intake` holds the conversation engine; `handlers` wraps it in command
//! and query handlers for the outer surfaces.

pub mod handlers;
pub mod intake;

pub use intake::{
    flush_transcript, CommitAdapter, CommitOutcome, ConversationEngine, IntakeSession,
    SessionRegistry, SubmitResponse,
};
