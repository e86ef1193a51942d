//! Control keywords recognised in user input.

/// A control keyword, matched case-insensitively on the trimmed input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlToken {
    /// `quit` / `exit`
    Quit,
    /// `cancel`
    Cancel,
    /// `restart`
    Restart,
    /// `yes` / `y` / `confirm`
    Yes,
    /// `no` / `n`
    No,
}

impl ControlToken {
    /// Classifies raw input; `None` for ordinary answers.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "quit" | "exit" => Some(Self::Quit),
            "cancel" => Some(Self::Cancel),
            "restart" => Some(Self::Restart),
            "yes" | "y" | "confirm" => Some(Self::Yes),
            "no" | "n" => Some(Self::No),
            _ => None,
        }
    }

    /// True for keywords that abandon a conversation while collecting.
    pub fn is_abandon(&self) -> bool {
        matches!(self, Self::Quit | Self::Cancel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_case_insensitively_after_trim() {
        assert_eq!(ControlToken::parse(" YES "), Some(ControlToken::Yes));
        assert_eq!(ControlToken::parse("Quit"), Some(ControlToken::Quit));
        assert_eq!(ControlToken::parse("n"), Some(ControlToken::No));
    }

    #[test]
    fn ordinary_answers_are_not_tokens() {
        assert_eq!(ControlToken::parse("yes please"), None);
        assert_eq!(ControlToken::parse("Server-01"), None);
        assert_eq!(ControlToken::parse(""), None);
    }

    #[test]
    fn abandon_tokens() {
        assert!(ControlToken::Quit.is_abandon());
        assert!(ControlToken::Cancel.is_abandon());
        assert!(!ControlToken::No.is_abandon());
    }
}
