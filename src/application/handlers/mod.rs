//! Application handlers.
//!
//! Command and query handlers that orchestrate the intake engine and the
//! session registry.

pub mod intake;

pub use intake::{
    ExpireIdleSessionsCommand, ExpireIdleSessionsHandler, ExpireIdleSessionsResult,
    GetProgressHandler, GetProgressQuery, IntakeProgress, StartIntakeCommand, StartIntakeHandler,
    StartIntakeResult, SubmitAnswerCommand, SubmitAnswerHandler,
};
