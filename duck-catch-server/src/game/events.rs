//! Game Events
//!
//! Events emitted by the session engine. The presentation layer drains them
//! after each tick to update sprites, start network requests and play sounds.

use std::time::Duration;
use serde::{Serialize, Deserialize};

use crate::core::vec2::Vec2;
use crate::game::state::{DuckId, Facing};
use crate::game::screen::Screen;

/// Game event data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum GameEventData {
    /// Active screen changed
    ScreenChanged {
        from: Screen,
        to: Screen,
    },

    /// A level started with a fresh duck roster
    LevelStarted {
        level: u32,
        duck_count: u32,
        time_budget: u32,
        speed: f64,
    },

    /// A live duck hopped to a new position
    DuckMoved {
        duck_id: DuckId,
        position: Vec2,
        facing: Facing,
    },

    /// A duck was caught
    DuckCaught {
        duck_id: DuckId,
        remaining: u32,
    },

    /// Countdown decremented
    CountdownTick {
        remaining_seconds: u32,
    },

    /// Every duck of the level was caught in time
    LevelWon {
        level: u32,
    },

    /// Countdown reached zero
    LevelLost {
        level: u32,
        ducks_left: u32,
    },

    /// The scores screen needs the achievement list
    ScoresRequested {
        ticket: u64,
    },

    /// The player asked to record an achievement
    SaveRequested {
        name: String,
        level: u32,
    },

    /// User-visible notice changed (`None` = dismissed)
    NoticeChanged {
        notice: Option<String>,
    },
}

/// A game event stamped with the engine clock.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameEvent {
    /// Engine time when the event occurred
    pub at: Duration,

    /// Event data
    pub data: GameEventData,
}

impl GameEvent {
    /// Create a new event.
    pub fn new(at: Duration, data: GameEventData) -> Self {
        Self { at, data }
    }

    /// True for events that end a level.
    pub fn is_level_outcome(&self) -> bool {
        matches!(
            self.data,
            GameEventData::LevelWon { .. } | GameEventData::LevelLost { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_outcome_classification() {
        let won = GameEvent::new(Duration::ZERO, GameEventData::LevelWon { level: 2 });
        let tick = GameEvent::new(
            Duration::from_secs(1),
            GameEventData::CountdownTick { remaining_seconds: 29 },
        );

        assert!(won.is_level_outcome());
        assert!(!tick.is_level_outcome());
    }

    #[test]
    fn test_event_serializes_to_json() {
        let event = GameEvent::new(
            Duration::from_millis(1500),
            GameEventData::SaveRequested { name: "Bruno".into(), level: 3 },
        );

        let json = serde_json::to_string(&event).unwrap();
        let back: GameEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
