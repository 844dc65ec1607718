//! Network module - achievement gateway requests
//!
//! The engine only emits request events. This plugin turns them into HTTP
//! calls and feeds the replies back into the session on the main thread.

mod client;

pub use client::*;

use bevy::prelude::*;
use bevy_tokio_tasks::TokioTasksRuntime;

use duck_catch::config::gateway_url_from_env;
use duck_catch::game::GameEventData;
use duck_catch::network::GatewayClient;

use crate::game::{ActiveSession, SessionEvent};

pub struct NetworkPlugin;

impl Plugin for NetworkPlugin {
    fn build(&self, app: &mut App) {
        app
            .init_resource::<GatewayReplies>()
            .add_systems(Startup, setup_gateway)
            .add_systems(Update, (
                dispatch_gateway_requests,
                apply_gateway_replies,
            ));
    }
}

fn setup_gateway(mut commands: Commands) {
    let url = gateway_url_from_env();
    info!("Achievement gateway: {}", url);
    commands.insert_resource(Gateway {
        client: GatewayClient::new(url),
    });
}

/// Start a request for every scores/save event the engine emitted
fn dispatch_gateway_requests(
    mut events: EventReader<SessionEvent>,
    runtime: Res<TokioTasksRuntime>,
    gateway: Option<Res<Gateway>>,
    replies: Res<GatewayReplies>,
) {
    let Some(gateway) = gateway else {
        return;
    };

    for SessionEvent(event) in events.read() {
        match &event.data {
            GameEventData::ScoresRequested { ticket } => {
                request_scores(&runtime, &gateway, &replies, *ticket);
            }
            GameEventData::SaveRequested { name, level } => {
                request_save(&runtime, &gateway, &replies, name.clone(), *level);
            }
            _ => {}
        }
    }
}

/// Hand finished requests to the session
fn apply_gateway_replies(
    replies: Res<GatewayReplies>,
    mut session: ResMut<ActiveSession>,
) {
    for reply in replies.drain() {
        match reply {
            GatewayReply::Scores { ticket, result } => {
                if !session.0.finish_scores(ticket, result) {
                    debug!("Dropped stale score list {}", ticket);
                }
            }
            GatewayReply::Saved(outcome) => session.0.finish_save(outcome),
        }
    }
}
