//! Phase enum for the intake conversation lifecycle.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::StateMachine;

/// Coarse state of one intake conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Collecting,
    AwaitingConfirmation,
    Committed,
    Cancelled,
}

impl Phase {
    /// Returns true while answers may still be collected.
    pub fn is_collecting(&self) -> bool {
        matches!(self, Phase::Collecting)
    }
}

impl StateMachine for Phase {
    /// Collecting advances or restarts within itself; every phase can
    /// restart back to Collecting.
    fn successors(&self) -> &'static [Self] {
        use Phase::*;
        match self {
            Collecting => &[Collecting, AwaitingConfirmation, Cancelled],
            AwaitingConfirmation => &[Committed, Collecting, Cancelled],
            Committed | Cancelled => &[Collecting],
        }
    }

    /// Committed and Cancelled end the conversation; only a restart leaves them.
    fn is_terminal(&self) -> bool {
        matches!(self, Phase::Committed | Phase::Cancelled)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::Collecting => "Collecting",
            Phase::AwaitingConfirmation => "Awaiting confirmation",
            Phase::Committed => "Committed",
            Phase::Cancelled => "Cancelled",
        };
        write!(f, "{}", s)
    }
}
