//! Gateway requests on the tokio runtime

use bevy::prelude::*;
use bevy_tokio_tasks::TokioTasksRuntime;
use std::sync::{Arc, Mutex};

use duck_catch::game::SaveOutcome;
use duck_catch::network::{Achievement, GatewayClient};

/// Gateway client shared by all requests
#[derive(Resource, Clone)]
pub struct Gateway {
    pub client: GatewayClient,
}

/// A finished gateway request
#[derive(Debug)]
pub enum GatewayReply {
    Scores {
        ticket: u64,
        result: Result<Vec<Achievement>, String>,
    },
    Saved(SaveOutcome),
}

/// Thread-safe queue for replies coming back from the runtime
#[derive(Resource, Default, Clone)]
pub struct GatewayReplies {
    pub queue: Arc<Mutex<Vec<GatewayReply>>>,
}

impl GatewayReplies {
    fn push(&self, reply: GatewayReply) {
        if let Ok(mut queue) = self.queue.lock() {
            queue.push(reply);
        }
    }

    /// Take every queued reply
    pub fn drain(&self) -> Vec<GatewayReply> {
        self.queue
            .lock()
            .map(|mut queue| std::mem::take(&mut *queue))
            .unwrap_or_default()
    }
}

/// Fetch the achievement list for scores request `ticket`
pub fn request_scores(
    runtime: &TokioTasksRuntime,
    gateway: &Gateway,
    replies: &GatewayReplies,
    ticket: u64,
) {
    let client = gateway.client.clone();
    let replies = replies.clone();

    runtime.spawn_background_task(move |_ctx| async move {
        let result = client
            .list_achievements()
            .await
            .map_err(|e| e.to_string());

        match &result {
            Ok(list) => info!("Loaded {} achievement(s)", list.len()),
            Err(e) => warn!("Failed to load achievements: {}", e),
        }
        replies.push(GatewayReply::Scores { ticket, result });
    });
}

/// Record an achievement
pub fn request_save(
    runtime: &TokioTasksRuntime,
    gateway: &Gateway,
    replies: &GatewayReplies,
    name: String,
    level: u32,
) {
    let client = gateway.client.clone();
    let replies = replies.clone();

    runtime.spawn_background_task(move |_ctx| async move {
        let outcome = match client.save_achievement(&name, level).await {
            Ok(true) => SaveOutcome::Saved,
            Ok(false) => SaveOutcome::Rejected,
            Err(e) => SaveOutcome::Failed(e.to_string()),
        };
        info!("Save of level {} for {}: {:?}", level, name, outcome);
        replies.push(GatewayReply::Saved(outcome));
    });
}
