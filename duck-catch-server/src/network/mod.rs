//! Network Layer
//!
//! Achievement gateway (HTTP server, store) and the client the front-end
//! uses to reach it. Nothing in here touches the session engine.

pub mod protocol;
pub mod store;
pub mod server;
pub mod client;

pub use protocol::{Achievement, SaveAchievement, SaveAchievementPayload, SaveResponse, ErrorBody};
pub use store::{
    AchievementStore, SharedStore, StoreError, SqliteAchievementStore,
    MemoryAchievementStore, UnavailableStore,
};
pub use server::{GatewayServer, GatewayError, router};
pub use client::{GatewayClient, ClientError};
