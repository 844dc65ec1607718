//! Input Capture
//!
//! Player inputs queued by the presentation layer between two ticks, and a
//! recording of input frames that can be replayed against a fresh session.

use std::time::Duration;
use serde::{Serialize, Deserialize};

use crate::game::screen::Action;
use crate::game::state::DuckId;

// =============================================================================
// INPUT TYPES
// =============================================================================

/// One player input.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Input {
    /// Start the current level
    Begin,
    /// Open the scores screen
    ShowScores,
    /// Leave the scores screen
    Back,
    /// Advance after a win
    NextLevel,
    /// Back to level 1
    Restart,
    /// Record the current achievement
    Save,
    /// Click on a duck
    Catch(DuckId),
    /// Replace the player name
    SetName(String),
    /// Close the notice
    DismissNotice,
}

impl From<Action> for Input {
    fn from(action: Action) -> Self {
        match action {
            Action::Begin => Input::Begin,
            Action::ShowScores => Input::ShowScores,
            Action::Back => Input::Back,
            Action::NextLevel => Input::NextLevel,
            Action::Restart => Input::Restart,
            Action::Save => Input::Save,
        }
    }
}

// =============================================================================
// INPUT QUEUE
// =============================================================================

/// Inputs collected since the last tick, in arrival order.
#[derive(Clone, Debug, Default)]
pub struct InputQueue {
    pending: Vec<Input>,
}

impl InputQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an input.
    pub fn push(&mut self, input: impl Into<Input>) {
        self.pending.push(input.into());
    }

    /// Number of queued inputs.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// True if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Take every queued input, leaving the queue empty.
    pub fn drain(&mut self) -> Vec<Input> {
        std::mem::take(&mut self.pending)
    }
}

// =============================================================================
// RECORDING
// =============================================================================

/// Inputs applied at the start of a tick, followed by a clock advance of `dt`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputFrame {
    /// Inputs in application order
    pub inputs: Vec<Input>,
    /// Clock advance after the inputs
    pub dt: Duration,
}

impl InputFrame {
    /// Frame with inputs and no time passing.
    pub fn with_inputs(inputs: impl IntoIterator<Item = Input>) -> Self {
        Self {
            inputs: inputs.into_iter().collect(),
            dt: Duration::ZERO,
        }
    }

    /// Frame that only lets time pass.
    pub fn wait(dt: Duration) -> Self {
        Self {
            inputs: Vec::new(),
            dt,
        }
    }
}

/// Input frames of one session, in tick order.
///
/// The client records every frame it ticks; the seed and the frames are
/// enough for [`replay_session`](crate::game::replay_session) to rebuild the
/// session. Consecutive idle frames are merged, so long waits cost one entry.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputRecording {
    /// Session seed the frames were recorded with
    pub seed: u64,
    frames: Vec<InputFrame>,
}

impl InputRecording {
    /// Create an empty recording.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            frames: Vec::new(),
        }
    }

    /// Record one tick.
    pub fn record(&mut self, inputs: &[Input], dt: Duration) {
        if inputs.is_empty() {
            if let Some(last) = self.frames.last_mut().filter(|f| f.inputs.is_empty()) {
                last.dt = last.dt.saturating_add(dt);
                return;
            }
        }
        self.frames.push(InputFrame {
            inputs: inputs.to_vec(),
            dt,
        });
    }

    /// Recorded frames.
    pub fn frames(&self) -> &[InputFrame] {
        &self.frames
    }

    /// Total clock time covered.
    pub fn duration(&self) -> Duration {
        self.frames.iter().map(|f| f.dt).sum()
    }

    /// Total number of inputs.
    pub fn input_count(&self) -> usize {
        self.frames.iter().map(|f| f.inputs.len()).sum()
    }
}
