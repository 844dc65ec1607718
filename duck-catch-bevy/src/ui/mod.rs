//! UI module - one layout per screen plus the in-game HUD

use bevy::ecs::system::EntityCommands;
use bevy::input::keyboard::{Key, KeyboardInput};
use bevy::input::ButtonState;
use bevy::prelude::*;

use duck_catch::game::screen::Action;
use duck_catch::game::Input;

use crate::AppState;
use crate::game::{ActiveSession, PendingInputs};

/// Longest accepted player name
const MAX_NAME_LEN: usize = 20;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app
            .init_resource::<NameEditor>()
            .add_systems(OnEnter(AppState::Start), setup_start_screen)
            .add_systems(OnEnter(AppState::Playing), setup_hud)
            .add_systems(OnEnter(AppState::Win), setup_win_screen)
            .add_systems(OnEnter(AppState::Lose), setup_lose_screen)
            .add_systems(OnEnter(AppState::Scores), setup_scores_screen)
            .add_systems(OnExit(AppState::Start), (cleanup_screen, stop_name_editing))
            .add_systems(OnExit(AppState::Playing), cleanup_screen)
            .add_systems(OnExit(AppState::Win), cleanup_screen)
            .add_systems(OnExit(AppState::Lose), cleanup_screen)
            .add_systems(OnExit(AppState::Scores), cleanup_screen)
            .add_systems(Update, (
                handle_buttons,
                edit_player_name.run_if(in_state(AppState::Start)),
                dismiss_notice,
                update_live_text,
                refresh_scores_list.run_if(in_state(AppState::Scores)),
            ));
    }
}

// ============================================================================
// COMPONENTS & RESOURCES
// ============================================================================

/// Root of the current screen's UI
#[derive(Component)]
struct ScreenUI;

/// Button actions
#[derive(Component, Clone, Copy)]
enum UiButton {
    Begin,
    ShowScores,
    Back,
    NextLevel,
    Restart,
    Save,
    EditName,
}

/// Text refreshed from the session every frame
#[derive(Component, Clone, Copy)]
enum LiveText {
    Level,
    Time,
    Ducks,
    PlayerName,
    Notice,
}

/// Container rebuilt when the score list changes
#[derive(Component)]
struct ScoresList;

/// Player name being typed on the start screen
#[derive(Resource, Default)]
struct NameEditor {
    active: bool,
    draft: String,
}

const TEXT_DARK: Color = Color::srgb(0.1, 0.15, 0.25);
const TEXT_MUTED: Color = Color::srgb(0.3, 0.35, 0.45);
const BUTTON_IDLE: Color = Color::srgb(0.95, 0.75, 0.2);
const BUTTON_HOVER: Color = Color::srgb(1.0, 0.85, 0.35);
const BUTTON_PRESSED: Color = Color::srgb(0.85, 0.6, 0.1);

// ============================================================================
// BUILDERS
// ============================================================================

fn spawn_screen_root<'a>(commands: &'a mut Commands, background: Color) -> EntityCommands<'a> {
    commands.spawn((
        Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            flex_direction: FlexDirection::Column,
            justify_content: JustifyContent::Center,
            align_items: AlignItems::Center,
            ..default()
        },
        BackgroundColor(background),
        ScreenUI,
    ))
}

fn spawn_label(parent: &mut ChildBuilder, text: impl Into<String>, size: f32, color: Color) {
    parent.spawn((
        Text::new(text),
        TextFont {
            font_size: size,
            ..default()
        },
        TextColor(color),
        Node {
            margin: UiRect::bottom(Val::Px(12.0)),
            ..default()
        },
    ));
}

fn spawn_live_text(parent: &mut ChildBuilder, kind: LiveText, size: f32, color: Color) {
    parent.spawn((
        Text::new(""),
        TextFont {
            font_size: size,
            ..default()
        },
        TextColor(color),
        Node {
            margin: UiRect::bottom(Val::Px(12.0)),
            ..default()
        },
        kind,
    ));
}

fn spawn_button(parent: &mut ChildBuilder, text: &str, action: UiButton) {
    parent.spawn((
        Button,
        Node {
            width: Val::Px(220.0),
            height: Val::Px(48.0),
            margin: UiRect::all(Val::Px(6.0)),
            justify_content: JustifyContent::Center,
            align_items: AlignItems::Center,
            border: UiRect::all(Val::Px(2.0)),
            ..default()
        },
        BorderColor(TEXT_DARK),
        BackgroundColor(BUTTON_IDLE),
        action,
    )).with_children(|parent| {
        parent.spawn((
            Text::new(text),
            TextFont {
                font_size: 22.0,
                ..default()
            },
            TextColor(TEXT_DARK),
        ));
    });
}

fn spawn_button_row(parent: &mut ChildBuilder, buttons: &[(&str, UiButton)]) {
    parent.spawn(Node {
        flex_direction: FlexDirection::Row,
        justify_content: JustifyContent::Center,
        ..default()
    }).with_children(|row| {
        for (text, action) in buttons {
            spawn_button(row, text, *action);
        }
    });
}

// ============================================================================
// SCREENS
// ============================================================================

fn setup_start_screen(mut commands: Commands, session: Res<ActiveSession>) {
    let level = session.0.level();
    let params = session.0.config().level(level);

    spawn_screen_root(&mut commands, Color::srgba(0.85, 0.93, 1.0, 0.95)).with_children(|parent| {
        spawn_label(parent, "DUCK CATCH", 64.0, TEXT_DARK);
        spawn_label(parent, format!("Level {}", level), 32.0, TEXT_DARK);
        spawn_label(
            parent,
            format!(
                "Catch {} duck{} in {} seconds",
                params.duck_count,
                if params.duck_count == 1 { "" } else { "s" },
                params.time_budget
            ),
            20.0,
            TEXT_MUTED,
        );

        // Name field: click to edit, Enter to confirm
        parent.spawn((
            Button,
            Node {
                width: Val::Px(300.0),
                height: Val::Px(44.0),
                margin: UiRect::all(Val::Px(8.0)),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                border: UiRect::all(Val::Px(2.0)),
                ..default()
            },
            BorderColor(TEXT_MUTED),
            BackgroundColor(Color::WHITE),
            UiButton::EditName,
        )).with_children(|field| {
            field.spawn((
                Text::new(""),
                TextFont {
                    font_size: 22.0,
                    ..default()
                },
                TextColor(TEXT_DARK),
                LiveText::PlayerName,
            ));
        });

        spawn_button_row(parent, &[
            ("START", UiButton::Begin),
            ("SCORES", UiButton::ShowScores),
        ]);
    });
}

fn setup_hud(mut commands: Commands) {
    commands.spawn((
        Node {
            width: Val::Percent(100.0),
            height: Val::Px(44.0),
            position_type: PositionType::Absolute,
            top: Val::Px(0.0),
            left: Val::Px(0.0),
            padding: UiRect::horizontal(Val::Px(12.0)),
            flex_direction: FlexDirection::Row,
            justify_content: JustifyContent::SpaceBetween,
            align_items: AlignItems::Center,
            ..default()
        },
        BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.35)),
        ScreenUI,
    )).with_children(|parent| {
        for kind in [LiveText::Level, LiveText::Time, LiveText::Ducks] {
            parent.spawn((
                Text::new(""),
                TextFont {
                    font_size: 22.0,
                    ..default()
                },
                TextColor(Color::WHITE),
                kind,
            ));
        }
    });
}

fn setup_win_screen(mut commands: Commands, session: Res<ActiveSession>) {
    let level = session.0.level();

    spawn_screen_root(&mut commands, Color::srgba(0.85, 1.0, 0.85, 0.95)).with_children(|parent| {
        spawn_label(parent, "YOU CAUGHT THEM ALL!", 48.0, Color::srgb(0.1, 0.5, 0.15));
        spawn_label(parent, format!("Level {} complete", level), 26.0, TEXT_DARK);
        spawn_button_row(parent, &[
            ("NEXT LEVEL", UiButton::NextLevel),
            ("RESTART", UiButton::Restart),
        ]);
        spawn_button(parent, "SAVE ACHIEVEMENT", UiButton::Save);
        spawn_live_text(parent, LiveText::Notice, 18.0, TEXT_MUTED);
    });
}

fn setup_lose_screen(mut commands: Commands, session: Res<ActiveSession>) {
    let level = session.0.level();
    let left = session.0.alive_count();

    spawn_screen_root(&mut commands, Color::srgba(1.0, 0.87, 0.85, 0.95)).with_children(|parent| {
        spawn_label(parent, "TIME'S UP!", 48.0, Color::srgb(0.6, 0.1, 0.1));
        spawn_label(
            parent,
            format!("Level {}: {} duck{} got away", level, left, if left == 1 { "" } else { "s" }),
            26.0,
            TEXT_DARK,
        );
        spawn_button(parent, "RESTART", UiButton::Restart);
        spawn_button(parent, "SAVE ACHIEVEMENT", UiButton::Save);
        spawn_live_text(parent, LiveText::Notice, 18.0, TEXT_MUTED);
    });
}

fn setup_scores_screen(mut commands: Commands) {
    spawn_screen_root(&mut commands, Color::srgba(0.9, 0.9, 1.0, 0.97)).with_children(|parent| {
        spawn_label(parent, "ACHIEVEMENTS", 48.0, TEXT_DARK);
        parent.spawn((
            Node {
                width: Val::Px(520.0),
                max_height: Val::Px(300.0),
                flex_direction: FlexDirection::Column,
                overflow: Overflow::clip_y(),
                margin: UiRect::bottom(Val::Px(12.0)),
                ..default()
            },
            ScoresList,
        ));
        spawn_button(parent, "BACK", UiButton::Back);
    });
}

fn cleanup_screen(
    mut commands: Commands,
    query: Query<Entity, With<ScreenUI>>,
) {
    for entity in query.iter() {
        commands.entity(entity).despawn_recursive();
    }
}

// ============================================================================
// INTERACTION
// ============================================================================

fn handle_buttons(
    mut interaction_query: Query<
        (&Interaction, &UiButton, &mut BackgroundColor),
        Changed<Interaction>,
    >,
    session: Res<ActiveSession>,
    mut pending: ResMut<PendingInputs>,
    mut editor: ResMut<NameEditor>,
) {
    for (interaction, button, mut bg_color) in interaction_query.iter_mut() {
        if let UiButton::EditName = button {
            if *interaction == Interaction::Pressed && !editor.active {
                editor.active = true;
                editor.draft = session.0.player_name().to_string();
            }
            continue;
        }

        match *interaction {
            Interaction::Pressed => {
                let action = match button {
                    UiButton::Begin => Action::Begin,
                    UiButton::ShowScores => Action::ShowScores,
                    UiButton::Back => Action::Back,
                    UiButton::NextLevel => Action::NextLevel,
                    UiButton::Restart => Action::Restart,
                    UiButton::Save => Action::Save,
                    UiButton::EditName => continue,
                };
                pending.push(action);
                *bg_color = BackgroundColor(BUTTON_PRESSED);
            }
            Interaction::Hovered => *bg_color = BackgroundColor(BUTTON_HOVER),
            Interaction::None => *bg_color = BackgroundColor(BUTTON_IDLE),
        }
    }
}

fn edit_player_name(
    mut keys: EventReader<KeyboardInput>,
    mut editor: ResMut<NameEditor>,
    mut pending: ResMut<PendingInputs>,
) {
    if !editor.active {
        keys.clear();
        return;
    }

    let mut changed = false;
    for key in keys.read() {
        if key.state != ButtonState::Pressed {
            continue;
        }
        match &key.logical_key {
            Key::Character(text) => {
                for c in text.chars().filter(|c| !c.is_control()) {
                    if editor.draft.chars().count() < MAX_NAME_LEN {
                        editor.draft.push(c);
                        changed = true;
                    }
                }
            }
            Key::Space if editor.draft.chars().count() < MAX_NAME_LEN => {
                editor.draft.push(' ');
                changed = true;
            }
            Key::Backspace => {
                changed |= editor.draft.pop().is_some();
            }
            Key::Enter | Key::Escape => editor.active = false,
            _ => {}
        }
    }

    if changed {
        pending.push(Input::SetName(editor.draft.clone()));
    }
}

fn stop_name_editing(mut editor: ResMut<NameEditor>) {
    editor.active = false;
}

fn dismiss_notice(
    keyboard: Res<ButtonInput<KeyCode>>,
    session: Res<ActiveSession>,
    mut pending: ResMut<PendingInputs>,
) {
    if keyboard.just_pressed(KeyCode::Escape) && session.0.notice().is_some() {
        pending.push(Input::DismissNotice);
    }
}

// ============================================================================
// REFRESH
// ============================================================================

fn update_live_text(
    session: Res<ActiveSession>,
    editor: Res<NameEditor>,
    mut texts: Query<(&LiveText, &mut Text)>,
) {
    let session = &session.0;
    for (kind, mut text) in texts.iter_mut() {
        let value = match kind {
            LiveText::Level => format!("Level {}", session.level()),
            LiveText::Time => format!("Time: {}s", session.remaining_seconds()),
            LiveText::Ducks => format!("Ducks: {}", session.alive_count()),
            LiveText::PlayerName if editor.active => format!("{}_", editor.draft),
            LiveText::PlayerName => format!("Player: {}", session.player_name()),
            LiveText::Notice => session.notice().unwrap_or_default().to_string(),
        };
        if text.0 != value {
            text.0 = value;
        }
    }
}

fn refresh_scores_list(
    mut commands: Commands,
    session: Res<ActiveSession>,
    lists: Query<Entity, With<ScoresList>>,
    mut shown: Local<Option<(u64, bool, usize)>>,
) {
    let Ok(list) = lists.get_single() else {
        return;
    };
    let scores = session.0.scores();
    let key = (scores.ticket, scores.loading, scores.records.len());
    if *shown == Some(key) {
        return;
    }
    *shown = Some(key);

    commands.entity(list).despawn_descendants();
    commands.entity(list).with_children(|parent| {
        if scores.loading {
            spawn_label(parent, "Loading...", 22.0, TEXT_MUTED);
            return;
        }
        if scores.records.is_empty() {
            spawn_label(parent, "No scores yet", 22.0, TEXT_MUTED);
            return;
        }

        spawn_score_row(parent, "Name", "Level", "Date", TEXT_DARK);
        for record in &scores.records {
            let date = record.date.replacen('T', " ", 1);
            let date: String = date.chars().take(16).collect();
            spawn_score_row(parent, &record.name, &record.level.to_string(), &date, TEXT_MUTED);
        }
    });
}

fn spawn_score_row(parent: &mut ChildBuilder, name: &str, level: &str, date: &str, color: Color) {
    parent.spawn(Node {
        flex_direction: FlexDirection::Row,
        justify_content: JustifyContent::SpaceBetween,
        margin: UiRect::bottom(Val::Px(4.0)),
        ..default()
    }).with_children(|row| {
        for (cell, width) in [(name, 220.0), (level, 80.0), (date, 200.0)] {
            row.spawn((
                Text::new(cell),
                TextFont {
                    font_size: 18.0,
                    ..default()
                },
                TextColor(color),
                Node {
                    width: Val::Px(width),
                    ..default()
                },
            ));
        }
    });
}
