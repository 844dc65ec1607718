//! Duck sprites - drawing and clicking
//!
//! Engine positions are sprite top-left corners in play-area pixels with y
//! growing downwards. The camera sits at the area center with y up.
//!
//! Clicks are hit-tested against the sprites as drawn, which lag behind the
//! engine position while they ease toward it.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use duck_catch::game::area::PlayArea;
use duck_catch::game::{Facing, Input};
use duck_catch::{DuckId, Vec2 as PlayPoint};

use super::{ActiveSession, PendingInputs};

/// Higher is snappier
const EASE_RATE: f32 = 12.0;

const DUCK_COLOR: Color = Color::srgb(1.0, 0.85, 0.1);
const BEAK_COLOR: Color = Color::srgb(1.0, 0.45, 0.0);

// ============================================================================
// COMPONENTS
// ============================================================================

/// One sprite per live duck
#[derive(Component)]
pub struct DuckSprite {
    pub id: DuckId,
    /// World position the sprite eases toward
    pub target: Vec2,
}

// ============================================================================
// COORDINATES
// ============================================================================

/// World position of the center of a sprite placed at `position`
pub fn engine_to_world(position: PlayPoint, area: &PlayArea) -> Vec2 {
    let half = area.duck_size / 2.0;
    Vec2::new(
        position.x + half - area.width / 2.0,
        area.height / 2.0 - (position.y + half),
    )
}

/// Inverse of [`engine_to_world`]: sprite position from its world center
pub fn world_to_engine(center: Vec2, area: &PlayArea) -> PlayPoint {
    let half = area.duck_size / 2.0;
    PlayPoint::new(
        center.x + area.width / 2.0 - half,
        area.height / 2.0 - center.y - half,
    )
}

/// Topmost drawn sprite covering `point`
pub fn duck_under_cursor(
    point: PlayPoint,
    drawn: impl IntoIterator<Item = (DuckId, Vec3)>,
    area: &PlayArea,
) -> Option<DuckId> {
    drawn
        .into_iter()
        .filter(|(_, at)| area.hits(world_to_engine(at.truncate(), area), point))
        .max_by(|a, b| a.1.z.total_cmp(&b.1.z))
        .map(|(id, _)| id)
}

/// Play-area point under the cursor (window coordinates, origin top-left)
pub fn cursor_to_engine(cursor: Vec2, window_size: Vec2, area: &PlayArea) -> PlayPoint {
    let scale_x = if window_size.x > 0.0 { area.width / window_size.x } else { 1.0 };
    let scale_y = if window_size.y > 0.0 { area.height / window_size.y } else { 1.0 };
    PlayPoint::new(cursor.x * scale_x, cursor.y * scale_y)
}

fn facing_scale(facing: Facing) -> f32 {
    match facing {
        Facing::Right => 1.0,
        Facing::Left => -1.0,
    }
}

// ============================================================================
// SYSTEMS
// ============================================================================

/// Left click on a duck sprite queues a catch
pub fn catch_clicked_duck(
    mouse: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    session: Res<ActiveSession>,
    sprites: Query<(&DuckSprite, &Transform)>,
    mut pending: ResMut<PendingInputs>,
) {
    if !mouse.just_pressed(MouseButton::Left) {
        return;
    }
    let Ok(window) = windows.get_single() else {
        return;
    };
    let Some(cursor) = window.cursor_position() else {
        return;
    };

    let area = session.0.config().area;
    let point = cursor_to_engine(cursor, window.size(), &area);

    let drawn = sprites.iter().map(|(sprite, transform)| (sprite.id, transform.translation));
    if let Some(id) = duck_under_cursor(point, drawn, &area) {
        pending.push(Input::Catch(id));
    }
}

/// Spawn sprites for live ducks, despawn caught ones, retarget moved ones
pub fn sync_duck_sprites(
    mut commands: Commands,
    session: Res<ActiveSession>,
    mut sprites: Query<(Entity, &mut DuckSprite, &mut Transform)>,
) {
    let session = &session.0;
    let area = session.config().area;
    let mut drawn = Vec::new();

    for (entity, mut sprite, mut transform) in sprites.iter_mut() {
        match session.duck(sprite.id).filter(|d| d.alive) {
            Some(duck) => {
                sprite.target = engine_to_world(duck.position, &area);
                transform.scale.x = facing_scale(duck.facing);
                drawn.push(sprite.id);
            }
            None => commands.entity(entity).despawn_recursive(),
        }
    }

    for duck in session.ducks().iter().filter(|d| d.alive && !drawn.contains(&d.id)) {
        let at = engine_to_world(duck.position, &area);
        commands.spawn((
            Sprite {
                color: DUCK_COLOR,
                custom_size: Some(Vec2::splat(area.duck_size)),
                ..default()
            },
            Transform::from_translation(at.extend(duck.id as f32))
                .with_scale(Vec3::new(facing_scale(duck.facing), 1.0, 1.0)),
            DuckSprite { id: duck.id, target: at },
        )).with_children(|parent| {
            // Beak on the facing side, flipped with the parent scale
            parent.spawn((
                Sprite {
                    color: BEAK_COLOR,
                    custom_size: Some(Vec2::new(area.duck_size * 0.3, area.duck_size * 0.2)),
                    ..default()
                },
                Transform::from_xyz(area.duck_size * 0.5, area.duck_size * 0.15, 0.1),
            ));
        });
    }
}

/// Ease sprites toward their engine position
pub fn ease_duck_sprites(
    time: Res<Time>,
    mut sprites: Query<(&DuckSprite, &mut Transform)>,
) {
    let t = 1.0 - (-EASE_RATE * time.delta_secs()).exp();
    for (sprite, mut transform) in sprites.iter_mut() {
        let current = transform.translation.truncate();
        let next = current.lerp(sprite.target, t);
        transform.translation.x = next.x;
        transform.translation.y = next.y;
    }
}

pub fn cleanup_ducks(
    mut commands: Commands,
    sprites: Query<Entity, With<DuckSprite>>,
) {
    for entity in sprites.iter() {
        commands.entity(entity).despawn_recursive();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_to_world_corners() {
        let area = PlayArea::default();

        let top_left = engine_to_world(PlayPoint::new(0.0, 0.0), &area);
        assert_eq!(top_left, Vec2::new(-368.0, 218.0));

        let bottom_right = engine_to_world(PlayPoint::new(736.0, 436.0), &area);
        assert_eq!(bottom_right, Vec2::new(368.0, -218.0));
    }

    #[test]
    fn test_world_to_engine_inverts() {
        let area = PlayArea::default();
        let position = PlayPoint::new(123.0, 45.0);
        assert_eq!(world_to_engine(engine_to_world(position, &area), &area), position);
    }

    #[test]
    fn test_click_hits_sprite_where_drawn() {
        let area = PlayArea::default();
        let drawn_at = PlayPoint::new(100.0, 100.0);
        let heading_to = PlayPoint::new(600.0, 300.0);
        let sprite = (7, engine_to_world(drawn_at, &area).extend(7.0));

        // Sprite still gliding: the visible duck is catchable
        let on_sprite = PlayPoint::new(130.0, 130.0);
        assert_eq!(duck_under_cursor(on_sprite, [sprite], &area), Some(7));

        // The empty spot it is heading for is not
        let on_target = PlayPoint::new(630.0, 330.0);
        assert_eq!(duck_under_cursor(on_target, [sprite], &area), None);
        assert!(area.hits(heading_to, on_target));
    }

    #[test]
    fn test_click_prefers_topmost_sprite() {
        let area = PlayArea::default();
        let at = engine_to_world(PlayPoint::new(200.0, 200.0), &area);
        let drawn = [(0, at.extend(0.0)), (3, at.extend(3.0)), (1, at.extend(1.0))];
        assert_eq!(duck_under_cursor(PlayPoint::new(220.0, 220.0), drawn, &area), Some(3));
    }

    #[test]
    fn test_cursor_scales_to_area() {
        let area = PlayArea::default();

        let same = cursor_to_engine(Vec2::new(100.0, 50.0), Vec2::new(800.0, 500.0), &area);
        assert_eq!(same, PlayPoint::new(100.0, 50.0));

        let doubled = cursor_to_engine(Vec2::new(100.0, 50.0), Vec2::new(1600.0, 1000.0), &area);
        assert_eq!(doubled, PlayPoint::new(50.0, 25.0));
    }
}
