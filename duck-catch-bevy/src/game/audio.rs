//! Sound effects played from engine events

use bevy::prelude::*;

use duck_catch::game::GameEventData;

use super::SessionEvent;

pub const QUACK_PATH: &str = "sounds/quack.wav";

#[derive(Resource)]
pub struct SoundAssets {
    quack: Handle<AudioSource>,
}

pub fn load_sound_assets(mut commands: Commands, asset_server: Res<AssetServer>) {
    commands.insert_resource(SoundAssets {
        quack: asset_server.load(QUACK_PATH),
    });
}

/// One quack per caught duck
pub fn play_quack(
    mut commands: Commands,
    mut events: EventReader<SessionEvent>,
    sounds: Res<SoundAssets>,
) {
    for _ in events.read().filter(|event| is_catch(&event.0.data)) {
        commands.spawn((
            AudioPlayer::new(sounds.quack.clone()),
            PlaybackSettings::DESPAWN,
        ));
    }
}

fn is_catch(data: &GameEventData) -> bool {
    matches!(data, GameEventData::DuckCaught { .. })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_catches_quack() {
        assert!(is_catch(&GameEventData::DuckCaught { duck_id: 0, remaining: 2 }));
        assert!(!is_catch(&GameEventData::LevelWon { level: 1 }));
        assert!(!is_catch(&GameEventData::CountdownTick { remaining_seconds: 9 }));
    }
}
