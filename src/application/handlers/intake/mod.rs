//! Intake command and query handlers.

mod expire_idle_sessions;
mod get_progress;
mod start_intake;
mod submit_answer;

pub use expire_idle_sessions::{
    ExpireIdleSessionsCommand, ExpireIdleSessionsHandler, ExpireIdleSessionsResult,
};
pub use get_progress::{GetProgressHandler, GetProgressQuery, IntakeProgress};
pub use start_intake::{StartIntakeCommand, StartIntakeHandler, StartIntakeResult};
pub use submit_answer::{SubmitAnswerCommand, SubmitAnswerHandler};
