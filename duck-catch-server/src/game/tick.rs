//! Session Tick
//!
//! The single entry point that advances a session: queued inputs are applied
//! first, in arrival order, then the engine clock advances and due timers
//! fire in chronological order.
//!
//! Applying inputs before timers means a catch delivered in the same tick as
//! the countdown expiring wins the level: the win cancels the schedule before
//! the final countdown timer can fire.

use std::time::Duration;
use tracing::debug;

use crate::game::difficulty::GameConfig;
use crate::game::events::{GameEvent, GameEventData};
use crate::game::input::{Input, InputFrame};
use crate::game::screen::SessionError;
use crate::game::state::Session;

/// How a level ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LevelOutcome {
    /// Every duck caught in time
    Won {
        /// Level that was won
        level: u32,
    },
    /// Countdown reached zero
    Lost {
        /// Level that was lost
        level: u32,
        /// Ducks still alive at expiry
        ducks_left: u32,
    },
}

/// Result of a tick.
#[derive(Debug, Default)]
pub struct TickResult {
    /// Events generated this tick
    pub events: Vec<GameEvent>,
    /// Level outcome, if a level ended this tick
    pub outcome: Option<LevelOutcome>,
    /// Inputs that were not accepted
    pub rejected: usize,
}

/// Advance a session by one tick.
pub fn tick<I>(session: &mut Session, inputs: I, dt: Duration) -> TickResult
where
    I: IntoIterator<Item = Input>,
{
    let mut result = TickResult::default();

    #[cfg(feature = "debug-tracing")]
    tracing::trace!(
        "Tick at {:?} on {} screen, dt {:?}",
        session.clock(),
        session.screen(),
        dt
    );

    // 1. Apply inputs
    for input in inputs {
        if let Err(err) = apply_input(session, &input) {
            debug!("Input {:?} skipped: {}", input, err);
            result.rejected += 1;
        }
    }

    // 2. Advance the clock, firing due timers
    if !dt.is_zero() {
        session.advance(dt);
    }

    // 3. Collect events
    result.events = session.take_events();
    result.outcome = result.events.iter().find_map(|event| match event.data {
        GameEventData::LevelWon { level } => Some(LevelOutcome::Won { level }),
        GameEventData::LevelLost { level, ducks_left } => {
            Some(LevelOutcome::Lost { level, ducks_left })
        }
        _ => None,
    });

    result
}

/// Rejection reason for an input that had no effect.
#[derive(Debug, thiserror::Error)]
enum InputRejected {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("duck {0} is not catchable")]
    NotCatchable(u32),
}

fn apply_input(session: &mut Session, input: &Input) -> Result<(), InputRejected> {
    match input {
        Input::Begin => {
            session.begin()?;
        }
        Input::ShowScores => {
            session.show_scores()?;
        }
        Input::Back => session.back()?,
        Input::NextLevel => {
            session.next_level()?;
        }
        Input::Restart => session.restart()?,
        Input::Save => {
            session.request_save()?;
        }
        Input::Catch(id) => {
            session
                .catch_duck(*id)
                .ok_or(InputRejected::NotCatchable(*id))?;
        }
        Input::SetName(name) => session.set_player_name(name.clone())?,
        Input::DismissNotice => session.dismiss_notice(),
    }
    Ok(())
}

/// Replay recorded input frames against a fresh session.
///
/// Returns the final session and every event, in order.
pub fn replay_session(config: GameConfig, frames: &[InputFrame]) -> (Session, Vec<GameEvent>) {
    let mut session = Session::new(config);
    let mut all_events = Vec::new();

    for frame in frames {
        let result = tick(&mut session, frame.inputs.iter().cloned(), frame.dt);
        all_events.extend(result.events);
    }

    (session, all_events)
}
