//! Level Timers
//!
//! The countdown and every per-duck "next move" deadline live in a single
//! schedule owned by the session. Leaving the playing screen cancels the
//! whole schedule at once, so nothing can fire into win/lose/start.

use std::collections::BTreeMap;
use std::time::Duration;

use crate::game::state::DuckId;

/// Countdown period.
pub const COUNTDOWN_PERIOD: Duration = Duration::from_secs(1);

/// A timer that came due.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Timer {
    /// One second of the countdown elapsed
    Countdown,
    /// A duck should hop
    Move(DuckId),
}

/// Deadlines for the active level.
#[derive(Clone, Debug, Default)]
pub struct Schedule {
    /// Next countdown decrement
    countdown_due: Option<Duration>,
    /// Next hop per live duck (BTreeMap keeps ties ordered by id)
    moves: BTreeMap<DuckId, Duration>,
    /// Delay between two hops of one duck
    move_interval: Duration,
}

impl Schedule {
    /// Arm the countdown and one hop timer per duck, starting at `now`.
    ///
    /// Replaces anything previously armed.
    pub fn arm<I>(&mut self, now: Duration, ducks: I, move_interval: Duration)
    where
        I: IntoIterator<Item = DuckId>,
    {
        self.countdown_due = Some(now + COUNTDOWN_PERIOD);
        self.move_interval = move_interval;
        self.moves = ducks
            .into_iter()
            .map(|id| (id, now + move_interval))
            .collect();
    }

    /// Cancel every timer.
    pub fn cancel(&mut self) {
        self.countdown_due = None;
        self.moves.clear();
    }

    /// Stop hopping one duck (it was caught).
    pub fn cancel_move(&mut self, id: DuckId) {
        self.moves.remove(&id);
    }

    /// True while any timer is pending.
    pub fn is_armed(&self) -> bool {
        self.countdown_due.is_some() || !self.moves.is_empty()
    }

    /// Number of ducks with a pending hop.
    pub fn pending_moves(&self) -> usize {
        self.moves.len()
    }

    /// Hop interval of the armed level.
    pub fn move_interval(&self) -> Duration {
        self.move_interval
    }

    /// Earliest pending deadline.
    ///
    /// On equal deadlines the countdown comes first, then hops by duck id.
    pub fn next_due(&self) -> Option<(Duration, Timer)> {
        let next_move = self
            .moves
            .iter()
            .min_by_key(|(id, due)| (**due, **id))
            .map(|(id, due)| (*due, Timer::Move(*id)));

        match (self.countdown_due, next_move) {
            (Some(cd), Some((mv, _))) if cd <= mv => Some((cd, Timer::Countdown)),
            (Some(cd), None) => Some((cd, Timer::Countdown)),
            (_, next_move) => next_move,
        }
    }

    /// Take the earliest timer due at or before `until` and re-arm it one
    /// period later.
    pub fn pop_due(&mut self, until: Duration) -> Option<(Duration, Timer)> {
        let (due, timer) = self.next_due()?;
        if due > until {
            return None;
        }

        match timer {
            Timer::Countdown => {
                self.countdown_due = Some(due + COUNTDOWN_PERIOD);
            }
            Timer::Move(id) => {
                // Guard against a zero interval spinning forever
                let step = self.move_interval.max(Duration::from_millis(1));
                self.moves.insert(id, due + step);
            }
        }

        Some((due, timer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_arm_and_order() {
        let mut schedule = Schedule::default();
        schedule.arm(Duration::ZERO, [0, 1], ms(500));

        assert_eq!(schedule.pop_due(ms(1000)), Some((ms(500), Timer::Move(0))));
        assert_eq!(schedule.pop_due(ms(1000)), Some((ms(500), Timer::Move(1))));
        // Countdown and hops both due at 1000: countdown first
        assert_eq!(schedule.pop_due(ms(1000)), Some((ms(1000), Timer::Countdown)));
        assert_eq!(schedule.pop_due(ms(1000)), Some((ms(1000), Timer::Move(0))));
        assert_eq!(schedule.pop_due(ms(1000)), Some((ms(1000), Timer::Move(1))));
        assert_eq!(schedule.pop_due(ms(1000)), None);
    }

    #[test]
    fn test_cancel_clears_everything() {
        let mut schedule = Schedule::default();
        schedule.arm(Duration::ZERO, 0..5, ms(100));
        assert!(schedule.is_armed());
        assert_eq!(schedule.pending_moves(), 5);

        schedule.cancel();
        assert!(!schedule.is_armed());
        assert_eq!(schedule.next_due(), None);
        assert_eq!(schedule.pop_due(ms(60_000)), None);
    }

    #[test]
    fn test_cancel_move_only_drops_one_duck() {
        let mut schedule = Schedule::default();
        schedule.arm(Duration::ZERO, [0, 1, 2], ms(100));
        schedule.cancel_move(1);

        let mut fired = Vec::new();
        while let Some((_, timer)) = schedule.pop_due(ms(100)) {
            fired.push(timer);
        }
        assert_eq!(fired, vec![Timer::Move(0), Timer::Move(2)]);
    }

    #[test]
    fn test_rearm_replaces_previous_level() {
        let mut schedule = Schedule::default();
        schedule.arm(Duration::ZERO, 0..3, ms(100));
        schedule.arm(ms(5000), [0], ms(250));

        assert_eq!(schedule.pending_moves(), 1);
        assert_eq!(schedule.move_interval(), ms(250));
        assert_eq!(schedule.next_due(), Some((ms(5250), Timer::Move(0))));
    }
}
