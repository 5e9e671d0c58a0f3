use std::fmt;

use serde::Serialize;

/// Life-cycle state of one search session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed,
}

impl SessionState {
    /// `true` once the session has produced its final outcome.
    #[must_use]
    pub fn is_settled(self) -> bool {
        matches!(self, SessionState::Ready | SessionState::Failed)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Idle => write!(f, "idle"),
            SessionState::Loading => write!(f, "loading"),
            SessionState::Ready => write!(f, "ready"),
            SessionState::Failed => write!(f, "failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_ready_and_failed_are_settled() {
        assert!(!SessionState::Idle.is_settled());
        assert!(!SessionState::Loading.is_settled());
        assert!(SessionState::Ready.is_settled());
        assert!(SessionState::Failed.is_settled());
    }

    #[test]
    fn displays_lowercase() {
        assert_eq!(SessionState::Loading.to_string(), "loading");
    }
}
