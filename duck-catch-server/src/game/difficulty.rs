//! Difficulty Scaling
//!
//! Per-level parameters derived from the session configuration:
//!
//! - duck count = `L`
//! - time budget = `base_time + (L - 1) * time_bonus`
//! - speed = `base_speed * growth^(L - 1)`
//! - move interval = `max(1 s / speed, min_move_interval)`
//!
//! Speed is computed in `f64` and grows strictly up to level 7_400 or so,
//! past which it saturates at `f64::MAX`.

use std::time::Duration;
use serde::{Serialize, Deserialize};

use crate::game::area::PlayArea;

/// Seconds on the clock at level 1.
pub const BASE_TIME_SECS: u32 = 30;

/// Extra seconds granted per level above 1.
pub const TIME_BONUS_PER_LEVEL: u32 = 10;

/// Duck speed at level 1 (relocations per second before the floor).
pub const BASE_SPEED: f64 = 80.0;

/// Speed multiplier applied per level.
pub const SPEED_GROWTH: f64 = 1.1;

/// Lower bound on the relocation interval.
pub const MIN_MOVE_INTERVAL: Duration = Duration::from_millis(20);

/// Name shown before the player edits it.
pub const DEFAULT_PLAYER_NAME: &str = "Player";

/// Configuration for a game session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Countdown at level 1 (seconds)
    pub base_time_secs: u32,
    /// Extra countdown per level (seconds)
    pub time_bonus_per_level: u32,
    /// Speed at level 1
    pub base_speed: f64,
    /// Per-level speed multiplier (> 1)
    pub speed_growth: f64,
    /// Fastest allowed relocation cadence
    pub min_move_interval: Duration,
    /// Play area bounds
    pub area: PlayArea,
    /// Initial player name
    pub player_name: String,
    /// RNG seed for duck placement
    pub seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            base_time_secs: BASE_TIME_SECS,
            time_bonus_per_level: TIME_BONUS_PER_LEVEL,
            base_speed: BASE_SPEED,
            speed_growth: SPEED_GROWTH,
            min_move_interval: MIN_MOVE_INTERVAL,
            area: PlayArea::default(),
            player_name: DEFAULT_PLAYER_NAME.to_string(),
            seed: 0,
        }
    }
}

impl GameConfig {
    /// Default configuration with a specific seed.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Parameters for a 1-indexed level.
    pub fn level(&self, level: u32) -> LevelParams {
        LevelParams::for_level(level, self)
    }
}

/// Derived parameters for one level.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelParams {
    /// Level number (1-indexed)
    pub level: u32,
    /// Number of ducks to catch
    pub duck_count: u32,
    /// Countdown start (seconds)
    pub time_budget: u32,
    /// Movement speed
    pub speed: f64,
    /// Delay between two relocations of the same duck
    pub move_interval: Duration,
}

impl LevelParams {
    /// Compute parameters for `level`. Level 0 is treated as level 1.
    pub fn for_level(level: u32, config: &GameConfig) -> Self {
        let level = level.max(1);
        let steps = level - 1;

        let time_budget = config
            .base_time_secs
            .saturating_add(steps.saturating_mul(config.time_bonus_per_level));

        let exponent = i32::try_from(steps).unwrap_or(i32::MAX);
        let speed = config.base_speed * config.speed_growth.powi(exponent);
        let speed = if speed.is_finite() { speed } else { f64::MAX };

        Self {
            level,
            duck_count: level,
            time_budget,
            speed,
            move_interval: move_interval(speed, config),
        }
    }
}

/// Relocation cadence for a given speed: `max(1 s / speed, min_move_interval)`.
pub fn move_interval(speed: f64, config: &GameConfig) -> Duration {
    if !(speed.is_finite() && speed > 0.0) {
        return config.min_move_interval;
    }
    Duration::from_secs_f64(speed.recip()).max(config.min_move_interval)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_level_one() {
        let params = GameConfig::default().level(1);
        assert_eq!(params.duck_count, 1);
        assert_eq!(params.time_budget, 30);
        assert_eq!(params.speed, 80.0);
        // 1 s / 80 = 12.5 ms, under the floor
        assert_eq!(params.move_interval, MIN_MOVE_INTERVAL);
    }

    #[test]
    fn test_slow_speed_sets_cadence() {
        let config = GameConfig {
            base_speed: 4.0,
            ..GameConfig::default()
        };
        assert_eq!(config.level(1).move_interval, Duration::from_millis(250));
        assert!(config.level(2).move_interval < Duration::from_millis(250));
    }

    #[test]
    fn test_speed_stays_finite_at_extreme_levels() {
        let config = GameConfig::default();
        let deep = config.level(886);
        let deeper = config.level(887);
        assert!(deep.speed.is_finite());
        assert!(deeper.speed > deep.speed);

        let last = config.level(u32::MAX);
        assert_eq!(last.speed, f64::MAX);
        assert_eq!(last.move_interval, MIN_MOVE_INTERVAL);
    }

    #[test]
    fn test_level_three_matches_formulas() {
        let params = GameConfig::default().level(3);
        assert_eq!(params.duck_count, 3);
        assert_eq!(params.time_budget, 50);
        assert!((params.speed - 96.8).abs() < 1e-3, "speed was {}", params.speed);
    }

    #[test]
    fn test_level_zero_clamped() {
        let config = GameConfig::default();
        assert_eq!(config.level(0), config.level(1));
    }

    #[test]
    fn test_move_interval_floor() {
        let config = GameConfig::default();
        assert_eq!(move_interval(1.0e9, &config), MIN_MOVE_INTERVAL);
        assert_eq!(move_interval(0.0, &config), MIN_MOVE_INTERVAL);
        assert_eq!(move_interval(f64::INFINITY, &config), MIN_MOVE_INTERVAL);
    }

    proptest! {
        #[test]
        fn prop_difficulty_is_monotonic(l1 in 1u32..7_000, delta in 1u32..300) {
            let config = GameConfig::default();
            let low = config.level(l1);
            let high = config.level(l1 + delta);

            prop_assert!(high.duck_count > low.duck_count);
            prop_assert!(high.time_budget >= low.time_budget);
            prop_assert!(high.speed.is_finite());
            prop_assert!(high.speed > low.speed, "level {} speed {} !> level {} speed {}",
                high.level, high.speed, low.level, low.speed);
            prop_assert!(high.move_interval <= low.move_interval);
        }

        #[test]
        fn prop_speed_never_decreases(l1 in 1u32..u32::MAX - 1) {
            let config = GameConfig::default();
            prop_assert!(config.level(l1 + 1).speed >= config.level(l1).speed);
        }
    }
}
