//! # Duck Catch
//!
//! Session engine for the duck catching game and the achievement gateway it
//! reports to.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        DUCK CATCH                            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/            - Deterministic primitives                 │
//! │  ├── vec2.rs      - 2D positions                             │
//! │  └── rng.rs       - Deterministic Xorshift128+ PRNG          │
//! │                                                              │
//! │  game/            - Session engine (deterministic)           │
//! │  ├── area.rs      - Play area and duck placement             │
//! │  ├── difficulty.rs- Level parameters                         │
//! │  ├── screen.rs    - Screens and transitions                  │
//! │  ├── schedule.rs  - Countdown and hop timers                 │
//! │  ├── state.rs     - Session state                            │
//! │  ├── input.rs     - Player inputs and recordings             │
//! │  ├── tick.rs      - Session loop                             │
//! │  └── events.rs    - Events for the presentation layer        │
//! │                                                              │
//! │  network/         - Achievement gateway                      │
//! │  ├── protocol.rs  - JSON bodies                              │
//! │  ├── store.rs     - SQLite / memory persistence              │
//! │  ├── server.rs    - axum HTTP server                         │
//! │  └── client.rs    - hyper client for the front-end           │
//! │                                                              │
//! │  config.rs        - Environment configuration                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism
//!
//! The `core/` and `game/` modules never read the system clock: engine time
//! is a `Duration` advanced only by [`game::tick`], and all randomness comes
//! from the session seed. Given the same seed and the same input frames a
//! session produces the same ducks, the same events and the same outcome.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod config;
pub mod core;
pub mod game;
pub mod network;

// Re-export commonly used types
pub use core::vec2::Vec2;
pub use core::rng::DeterministicRng;
pub use game::difficulty::GameConfig;
pub use game::screen::Screen;
pub use game::state::{Session, DuckId};
pub use network::client::GatewayClient;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
