//! Screens and Transitions
//!
//! The five screens of the session state machine, the player actions that
//! move between them, and the error returned when an action is not allowed
//! on the current screen.

use std::fmt;
use serde::{Serialize, Deserialize};

/// Active screen. Exactly one at a time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    /// Level intro, name editing
    #[default]
    Start,
    /// Countdown running, ducks hopping
    Playing,
    /// All ducks caught
    Win,
    /// Countdown ran out
    Lose,
    /// Achievement list
    Scores,
}

impl Screen {
    /// Lower-case name, used in logs and error messages.
    pub fn as_str(self) -> &'static str {
        match self {
            Screen::Start => "start",
            Screen::Playing => "playing",
            Screen::Win => "win",
            Screen::Lose => "lose",
            Screen::Scores => "scores",
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Player-triggered actions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// start -> playing
    Begin,
    /// start -> scores
    ShowScores,
    /// scores -> start
    Back,
    /// win -> start, level + 1
    NextLevel,
    /// win/lose -> start, level = 1
    Restart,
    /// win/lose, records an achievement
    Save,
}

impl Action {
    /// Screens on which this action is accepted.
    pub fn allowed_on(self) -> &'static [Screen] {
        match self {
            Action::Begin | Action::ShowScores => &[Screen::Start],
            Action::Back => &[Screen::Scores],
            Action::NextLevel => &[Screen::Win],
            Action::Restart | Action::Save => &[Screen::Win, Screen::Lose],
        }
    }

    /// Check whether the action is accepted on `screen`.
    pub fn is_allowed_on(self, screen: Screen) -> bool {
        self.allowed_on().contains(&screen)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::Begin => "begin",
            Action::ShowScores => "show scores",
            Action::Back => "go back",
            Action::NextLevel => "advance to the next level",
            Action::Restart => "restart",
            Action::Save => "save an achievement",
        };
        f.write_str(name)
    }
}

/// Session errors. None of them changes the session state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// Action not accepted on the current screen.
    #[error("cannot {action} from the {screen} screen")]
    InvalidTransition {
        /// Attempted action
        action: Action,
        /// Screen at the time of the attempt
        screen: Screen,
    },

    /// Name edits are only accepted on the start screen.
    #[error("player name can only be edited on the start screen")]
    NameLocked,

    /// Saving requires a non-blank player name.
    #[error("player name is required")]
    EmptyName,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_table() {
        assert!(Action::Begin.is_allowed_on(Screen::Start));
        assert!(!Action::Begin.is_allowed_on(Screen::Win));
        assert!(Action::NextLevel.is_allowed_on(Screen::Win));
        assert!(!Action::NextLevel.is_allowed_on(Screen::Lose));
        assert!(Action::Restart.is_allowed_on(Screen::Lose));
        assert!(Action::Save.is_allowed_on(Screen::Win));
        assert!(!Action::Save.is_allowed_on(Screen::Playing));
        assert!(Action::Back.is_allowed_on(Screen::Scores));
    }

    #[test]
    fn test_error_message() {
        let err = SessionError::InvalidTransition {
            action: Action::NextLevel,
            screen: Screen::Lose,
        };
        assert_eq!(err.to_string(), "cannot advance to the next level from the lose screen");
    }
}
