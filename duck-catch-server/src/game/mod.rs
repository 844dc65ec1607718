//! Game Session Engine
//!
//! Everything that decides what happens in a play-through. Deterministic:
//! time only moves through `tick`, randomness comes from the session seed.
//!
//! ## Module Structure
//!
//! - `area`: play area bounds and duck placement
//! - `difficulty`: per-level duck count, time budget and speed
//! - `screen`: screens, actions and the transition table
//! - `schedule`: countdown and hop deadlines
//! - `state`: the session and its ducks
//! - `input`: player inputs and recordings
//! - `tick`: the session loop
//! - `events`: events for the presentation layer

pub mod area;
pub mod difficulty;
pub mod screen;
pub mod schedule;
pub mod state;
pub mod input;
pub mod tick;
pub mod events;

// Re-export key types
pub use area::PlayArea;
pub use difficulty::{GameConfig, LevelParams};
pub use screen::{Action, Screen, SessionError};
pub use state::{Duck, DuckId, Facing, Session, SaveOutcome, CatchOutcome};
pub use input::{Input, InputQueue, InputFrame, InputRecording};
pub use tick::{tick, replay_session, TickResult, LevelOutcome};
pub use events::{GameEvent, GameEventData};
