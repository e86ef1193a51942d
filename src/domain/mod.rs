//! Domain layer containing the intake rules and types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors, state machine)
//! - `intake` - Step catalogs, validators, conversation state and summaries
//!
//! Nothing in this layer performs I/O.

pub mod foundation;
pub mod intake;
