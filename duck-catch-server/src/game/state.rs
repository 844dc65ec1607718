//! Game State Definitions
//!
//! The session: screen, level, player name, countdown and duck roster, plus
//! the auxiliary UI state (score list, notice) fed by network completions.
//!
//! Every mutation happens through a `Session` method. Win detection runs
//! inside [`Session::catch_duck`], in the same step that marks the duck
//! caught, so it can neither fire early nor need an extra click.

use std::time::Duration;
use serde::{Serialize, Deserialize};
use tracing::{debug, info, warn};

use crate::core::rng::DeterministicRng;
use crate::core::vec2::Vec2;
use crate::game::difficulty::{GameConfig, LevelParams};
use crate::game::events::{GameEvent, GameEventData};
use crate::game::schedule::{Schedule, Timer};
use crate::game::screen::{Action, Screen, SessionError};
use crate::network::protocol::{Achievement, SaveAchievement};

// =============================================================================
// DUCK
// =============================================================================

/// Duck identifier: index within the level, `0..level`.
pub type DuckId = u32;

/// Horizontal facing of a duck sprite.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facing {
    /// Moved towards smaller x last time
    Left,
    /// Moved towards larger x last time (initial facing)
    #[default]
    Right,
}

impl Facing {
    /// Facing after a hop from `from_x` to `to_x`.
    pub fn from_move(from_x: f32, to_x: f32) -> Self {
        if to_x > from_x {
            Facing::Right
        } else {
            Facing::Left
        }
    }
}

/// One clickable target.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Duck {
    /// Stable id within the level
    pub id: DuckId,
    /// Top-left sprite corner
    pub position: Vec2,
    /// Sprite orientation
    pub facing: Facing,
    /// False once caught, never reverts
    pub alive: bool,
}

// =============================================================================
// AUXILIARY UI STATE
// =============================================================================

/// Data backing the scores screen.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScoreBoard {
    /// A list request is in flight
    pub loading: bool,
    /// Last fetched records
    pub records: Vec<Achievement>,
    /// Id of the latest list request
    pub ticket: u64,
}

/// Result of a catch that was applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CatchOutcome {
    /// Caught duck
    pub duck_id: DuckId,
    /// Ducks still alive after this catch
    pub remaining: u32,
    /// This catch won the level
    pub level_won: bool,
}

/// How a save request ended, as reported by the front-end.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Gateway acknowledged with `success: true`
    Saved,
    /// Gateway answered without acknowledging
    Rejected,
    /// Transport or server error
    Failed(String),
}

impl SaveOutcome {
    /// Notice text shown to the player.
    pub fn notice(&self) -> String {
        match self {
            SaveOutcome::Saved => "Achievement saved!".to_string(),
            SaveOutcome::Rejected => "Could not save the achievement.".to_string(),
            SaveOutcome::Failed(reason) => format!("Error saving achievement: {}", reason),
        }
    }
}

// =============================================================================
// SESSION
// =============================================================================

/// The single mutable game state of one play-through.
#[derive(Clone, Debug)]
pub struct Session {
    /// Session configuration
    config: GameConfig,
    /// Active screen
    screen: Screen,
    /// Current level (1-indexed)
    level: u32,
    /// Player name
    player_name: String,
    /// Countdown
    remaining_seconds: u32,
    /// Duck roster of the current level
    ducks: Vec<Duck>,
    /// Ducks not yet caught
    alive_count: u32,
    /// Parameters of the last started level
    params: LevelParams,
    /// Engine time
    clock: Duration,
    /// Countdown and hop deadlines
    schedule: Schedule,
    /// Placement randomness
    rng: DeterministicRng,
    /// Scores screen data
    scores: ScoreBoard,
    /// User-visible notice
    notice: Option<String>,
    /// Events not yet drained
    pending_events: Vec<GameEvent>,
}

impl Session {
    /// Create a session on the start screen at level 1.
    pub fn new(config: GameConfig) -> Self {
        let params = config.level(1);
        Self {
            screen: Screen::Start,
            level: 1,
            player_name: config.player_name.clone(),
            remaining_seconds: params.time_budget,
            ducks: Vec::new(),
            alive_count: 0,
            params,
            clock: Duration::ZERO,
            schedule: Schedule::default(),
            rng: DeterministicRng::new(config.seed),
            scores: ScoreBoard::default(),
            notice: None,
            pending_events: Vec::new(),
            config,
        }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// Session configuration.
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Active screen.
    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Current level.
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Player name.
    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    /// Seconds left on the countdown.
    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    /// Duck roster of the current (or last) level.
    pub fn ducks(&self) -> &[Duck] {
        &self.ducks
    }

    /// Get a duck by id.
    pub fn duck(&self, id: DuckId) -> Option<&Duck> {
        self.ducks.get(id as usize)
    }

    /// Ducks not yet caught.
    pub fn alive_count(&self) -> u32 {
        self.alive_count
    }

    /// Parameters of the current (or last) level.
    pub fn level_params(&self) -> &LevelParams {
        &self.params
    }

    /// Movement speed of the current level.
    pub fn speed(&self) -> f64 {
        self.params.speed
    }

    /// Engine time.
    pub fn clock(&self) -> Duration {
        self.clock
    }

    /// True while any countdown or hop timer is pending.
    pub fn timers_armed(&self) -> bool {
        self.schedule.is_armed()
    }

    /// Scores screen data.
    pub fn scores(&self) -> &ScoreBoard {
        &self.scores
    }

    /// User-visible notice, if any.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    // -------------------------------------------------------------------------
    // Name
    // -------------------------------------------------------------------------

    /// Replace the player name. Only accepted on the start screen.
    pub fn set_player_name(&mut self, name: impl Into<String>) -> Result<(), SessionError> {
        if self.screen != Screen::Start {
            debug!("Name edit rejected on {} screen", self.screen);
            return Err(SessionError::NameLocked);
        }
        self.player_name = name.into();
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Transitions
    // -------------------------------------------------------------------------

    /// start -> playing: allocate the roster and arm the timers.
    pub fn begin(&mut self) -> Result<LevelParams, SessionError> {
        self.ensure_allowed(Action::Begin)?;

        let params = self.config.level(self.level);
        let area = self.config.area;

        self.ducks = (0..params.duck_count)
            .map(|id| Duck {
                id,
                position: area.random_position(&mut self.rng),
                facing: Facing::Right,
                alive: true,
            })
            .collect();
        self.alive_count = params.duck_count;
        self.remaining_seconds = params.time_budget;
        self.params = params;

        self.set_screen(Screen::Playing);
        self.schedule
            .arm(self.clock, 0..params.duck_count, params.move_interval);

        info!(
            "Level {} started: {} ducks, {}s, speed {:.1}",
            params.level, params.duck_count, params.time_budget, params.speed
        );
        self.push_event(GameEventData::LevelStarted {
            level: params.level,
            duck_count: params.duck_count,
            time_budget: params.time_budget,
            speed: params.speed,
        });

        if self.remaining_seconds == 0 {
            self.lose_level();
        }

        Ok(params)
    }

    /// start -> scores. Returns the ticket the list reply must carry.
    pub fn show_scores(&mut self) -> Result<u64, SessionError> {
        self.ensure_allowed(Action::ShowScores)?;

        self.scores.ticket += 1;
        self.scores.loading = true;
        self.scores.records.clear();
        self.set_screen(Screen::Scores);

        let ticket = self.scores.ticket;
        self.push_event(GameEventData::ScoresRequested { ticket });
        Ok(ticket)
    }

    /// scores -> start, discarding the fetched list.
    pub fn back(&mut self) -> Result<(), SessionError> {
        self.ensure_allowed(Action::Back)?;

        self.scores.loading = false;
        self.scores.records.clear();
        self.set_screen(Screen::Start);
        Ok(())
    }

    /// win -> start with the next level. Returns the new level.
    pub fn next_level(&mut self) -> Result<u32, SessionError> {
        self.ensure_allowed(Action::NextLevel)?;

        self.level = self.level.saturating_add(1);
        self.set_screen(Screen::Start);
        Ok(self.level)
    }

    /// win/lose -> start at level 1.
    pub fn restart(&mut self) -> Result<(), SessionError> {
        self.ensure_allowed(Action::Restart)?;

        self.level = 1;
        self.set_screen(Screen::Start);
        Ok(())
    }

    /// Ask for the current achievement to be recorded (win/lose only).
    ///
    /// The screen does not change. A blank name is refused locally with a
    /// notice and no request is emitted.
    pub fn request_save(&mut self) -> Result<SaveAchievement, SessionError> {
        self.ensure_allowed(Action::Save)?;

        if self.player_name.trim().is_empty() {
            self.set_notice(Some("Enter a player name before saving.".to_string()));
            return Err(SessionError::EmptyName);
        }

        let request = SaveAchievement {
            name: self.player_name.clone(),
            level: self.level,
        };
        self.push_event(GameEventData::SaveRequested {
            name: request.name.clone(),
            level: request.level,
        });
        Ok(request)
    }

    // -------------------------------------------------------------------------
    // Network completions
    // -------------------------------------------------------------------------

    /// Apply the result of a save request. Only the notice changes.
    pub fn finish_save(&mut self, outcome: SaveOutcome) {
        if let SaveOutcome::Failed(reason) = &outcome {
            warn!("Saving achievement failed: {}", reason);
        }
        self.set_notice(Some(outcome.notice()));
    }

    /// Apply the result of a list request.
    ///
    /// Dropped unless the scores screen is still showing the request that
    /// issued `ticket`. A failed load shows an empty list. Returns whether
    /// the reply was applied.
    pub fn finish_scores(&mut self, ticket: u64, result: Result<Vec<Achievement>, String>) -> bool {
        if self.screen != Screen::Scores || ticket != self.scores.ticket {
            debug!(
                "Dropping stale score list (ticket {}, current {}, screen {})",
                ticket, self.scores.ticket, self.screen
            );
            return false;
        }

        self.scores.loading = false;
        self.scores.records = match result {
            Ok(records) => records,
            Err(reason) => {
                warn!("Loading scores failed: {}", reason);
                Vec::new()
            }
        };
        true
    }

    /// Clear the notice.
    pub fn dismiss_notice(&mut self) {
        self.set_notice(None);
    }

    // -------------------------------------------------------------------------
    // Gameplay
    // -------------------------------------------------------------------------

    /// Catch a duck.
    ///
    /// No-op (returns `None`) unless playing and the duck is alive. The catch
    /// that leaves no duck alive wins the level before this call returns.
    pub fn catch_duck(&mut self, id: DuckId) -> Option<CatchOutcome> {
        if self.screen != Screen::Playing {
            debug!("Catch of duck {} ignored on {} screen", id, self.screen);
            return None;
        }

        let duck = self.ducks.get_mut(id as usize)?;
        if !duck.alive {
            return None;
        }
        duck.alive = false;

        self.alive_count = self.alive_count.saturating_sub(1);
        self.schedule.cancel_move(id);

        let remaining = self.alive_count;
        self.push_event(GameEventData::DuckCaught { duck_id: id, remaining });

        let level_won = remaining == 0;
        if level_won {
            self.win_level();
        }

        Some(CatchOutcome {
            duck_id: id,
            remaining,
            level_won,
        })
    }

    /// Hop a live duck to a fresh random position.
    ///
    /// No-op unless playing and the duck is alive.
    pub fn relocate_duck(&mut self, id: DuckId) -> Option<Vec2> {
        if self.screen != Screen::Playing {
            return None;
        }

        let area = self.config.area;
        let duck = self.ducks.get_mut(id as usize).filter(|d| d.alive)?;

        let position = area.random_position(&mut self.rng);
        duck.facing = Facing::from_move(duck.position.x, position.x);
        duck.position = position;

        #[cfg(feature = "debug-tracing")]
        tracing::trace!("Duck {} moved to {} facing {:?}", id, position, duck.facing);

        let facing = duck.facing;
        self.push_event(GameEventData::DuckMoved {
            duck_id: id,
            position,
            facing,
        });
        Some(position)
    }

    /// Advance the engine clock by `dt`, firing due timers in order.
    ///
    /// Stops firing as soon as the level ends: the transition cancels the
    /// schedule.
    pub fn advance(&mut self, dt: Duration) {
        let until = self.clock.saturating_add(dt);

        while let Some((due, timer)) = self.schedule.pop_due(until) {
            self.clock = due;

            #[cfg(feature = "debug-tracing")]
            tracing::trace!("Timer {:?} fired at {:?}", timer, due);

            match timer {
                Timer::Countdown => self.countdown(),
                Timer::Move(id) => {
                    let _ = self.relocate_duck(id);
                }
            }
        }

        self.clock = until;
    }

    // -------------------------------------------------------------------------
    // Events
    // -------------------------------------------------------------------------

    /// Take pending events (consumes them).
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.pending_events)
    }

    fn push_event(&mut self, data: GameEventData) {
        self.pending_events.push(GameEvent::new(self.clock, data));
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    fn ensure_allowed(&self, action: Action) -> Result<(), SessionError> {
        if action.is_allowed_on(self.screen) {
            Ok(())
        } else {
            debug!("Rejected '{}' on {} screen", action, self.screen);
            Err(SessionError::InvalidTransition {
                action,
                screen: self.screen,
            })
        }
    }

    fn set_screen(&mut self, to: Screen) {
        let from = self.screen;
        if from == to {
            return;
        }
        if from == Screen::Playing {
            self.schedule.cancel();
        }
        self.screen = to;
        self.set_notice(None);
        self.push_event(GameEventData::ScreenChanged { from, to });
    }

    fn set_notice(&mut self, notice: Option<String>) {
        if self.notice == notice {
            return;
        }
        self.notice = notice.clone();
        self.push_event(GameEventData::NoticeChanged { notice });
    }

    fn countdown(&mut self) {
        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        self.push_event(GameEventData::CountdownTick {
            remaining_seconds: self.remaining_seconds,
        });

        if self.remaining_seconds == 0 {
            self.lose_level();
        }
    }

    fn win_level(&mut self) {
        info!("Level {} won at {:?}", self.level, self.clock);
        self.set_screen(Screen::Win);
        self.push_event(GameEventData::LevelWon { level: self.level });
    }

    fn lose_level(&mut self) {
        info!(
            "Level {} lost with {} duck(s) left",
            self.level, self.alive_count
        );
        self.set_screen(Screen::Lose);
        self.push_event(GameEventData::LevelLost {
            level: self.level,
            ducks_left: self.alive_count,
        });
    }
}

// =============================================================================
// TESTS
// =============================================================================
