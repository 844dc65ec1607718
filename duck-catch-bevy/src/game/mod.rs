//! Game module - drives the session engine
//!
//! The session lives in a resource. Every frame the queued inputs are handed
//! to `tick` together with the frame time, the resulting events are
//! re-broadcast as Bevy events, and the app state follows the engine screen.

use bevy::prelude::*;

use duck_catch::game::{tick, GameConfig, GameEvent, Input, InputQueue, InputRecording, Session};

use crate::AppState;

pub mod audio;
pub mod ducks;

pub use audio::*;
pub use ducks::*;

// ============================================================================
// GAME PLUGIN
// ============================================================================

pub struct GamePlugin;

impl Plugin for GamePlugin {
    fn build(&self, app: &mut App) {
        app
            // Resources
            .init_resource::<ActiveSession>()
            .init_resource::<PendingInputs>()
            .init_resource::<SessionRecording>()

            // Events
            .add_event::<SessionEvent>()

            .add_systems(Startup, load_sound_assets)
            .add_systems(OnExit(AppState::Playing), cleanup_ducks)

            .add_systems(Update, (
                catch_clicked_duck.run_if(in_state(AppState::Playing)),
                advance_session,
                follow_engine_screen,
                sync_duck_sprites.run_if(in_state(AppState::Playing)),
                ease_duck_sprites.run_if(in_state(AppState::Playing)),
                play_quack,
            ).chain());
    }
}

// ============================================================================
// RESOURCES
// ============================================================================

/// The running session
#[derive(Resource)]
pub struct ActiveSession(pub Session);

impl Default for ActiveSession {
    fn default() -> Self {
        let seed = rand::random::<u64>();
        info!("New session, seed {}", seed);
        Self(Session::new(GameConfig::with_seed(seed)))
    }
}

/// Inputs waiting for the next tick
#[derive(Resource, Default)]
pub struct PendingInputs(pub InputQueue);

impl PendingInputs {
    pub fn push(&mut self, input: impl Into<Input>) {
        self.0.push(input);
    }
}

/// Every input fed to the session, replayable with `replay_session`
#[derive(Resource)]
pub struct SessionRecording(pub InputRecording);

impl FromWorld for SessionRecording {
    fn from_world(world: &mut World) -> Self {
        let seed = world.resource::<ActiveSession>().0.config().seed;
        Self(InputRecording::new(seed))
    }
}

// ============================================================================
// EVENTS
// ============================================================================

/// Engine event, re-broadcast for the UI and network plugins
#[derive(Event, Debug, Clone)]
pub struct SessionEvent(pub GameEvent);

// ============================================================================
// SYSTEMS
// ============================================================================

/// Apply queued inputs and advance the engine by the frame time
fn advance_session(
    time: Res<Time>,
    mut session: ResMut<ActiveSession>,
    mut pending: ResMut<PendingInputs>,
    mut recording: ResMut<SessionRecording>,
    mut events: EventWriter<SessionEvent>,
) {
    let inputs = pending.0.drain();
    let dt = time.delta();
    recording.0.record(&inputs, dt);
    let result = tick(&mut session.0, inputs, dt);

    if result.rejected > 0 {
        debug!("{} input(s) rejected this frame", result.rejected);
    }
    if let Some(outcome) = result.outcome {
        let recording = &recording.0;
        info!(
            "Level finished: {:?} (seed {}, {} inputs over {:.1}s recorded)",
            outcome,
            recording.seed,
            recording.input_count(),
            recording.duration().as_secs_f32()
        );
    }

    for event in result.events {
        events.send(SessionEvent(event));
    }
}

/// Keep the app state on the engine screen
fn follow_engine_screen(
    session: Res<ActiveSession>,
    state: Res<State<AppState>>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    let wanted = AppState::from(session.0.screen());
    if *state.get() != wanted {
        next_state.set(wanted);
    }
}
