//! Transition table trait for lifecycle enums.

use std::fmt;

use super::{DomainError, ErrorCode};

/// A lifecycle enum whose legal moves are listed per state.
///
/// ```ignore
/// impl StateMachine for Phase {
///     fn successors(&self) -> &'static [Self] {
///         match self {
///             Collecting => &[Collecting, AwaitingConfirmation, Cancelled],
///             // ...
///         }
///     }
/// }
///
/// let next = phase.transition_to(Phase::Committed)?;
/// ```
pub trait StateMachine: Sized + Copy + PartialEq + fmt::Debug + 'static {
    /// States reachable from `self` in one step.
    fn successors(&self) -> &'static [Self];

    /// True when the lifecycle has ended. Defaults to "no successors".
    fn is_terminal(&self) -> bool {
        self.successors().is_empty()
    }

    fn can_transition_to(&self, target: &Self) -> bool {
        self.successors().contains(target)
    }

    /// # Errors
    ///
    /// - `InvalidStateTransition` if `target` is not a successor
    fn transition_to(&self, target: Self) -> Result<Self, DomainError> {
        if self.can_transition_to(&target) {
            return Ok(target);
        }
        Err(DomainError::new(
            ErrorCode::InvalidStateTransition,
            format!("Cannot move from {:?} to {:?}", self, target),
        )
        .with_detail("from", format!("{:?}", self))
        .with_detail("to", format!("{:?}", target)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Door {
        Open,
        Shut,
        Bricked,
    }

    impl StateMachine for Door {
        fn successors(&self) -> &'static [Self] {
            match self {
                Door::Open => &[Door::Shut],
                Door::Shut => &[Door::Open, Door::Bricked],
                Door::Bricked => &[],
            }
        }
    }

    #[test]
    fn listed_successor_is_reachable() {
        assert_eq!(Door::Shut.transition_to(Door::Bricked).unwrap(), Door::Bricked);
    }

    #[test]
    fn unlisted_target_is_an_invalid_transition() {
        let err = Door::Open.transition_to(Door::Bricked).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidStateTransition);
        assert_eq!(err.details.get("from").map(String::as_str), Some("Open"));
    }

    #[test]
    fn state_without_successors_is_terminal() {
        assert!(Door::Bricked.is_terminal());
        assert!(!Door::Open.is_terminal());
    }
}
