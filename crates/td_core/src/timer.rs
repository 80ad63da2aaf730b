//! Countdown timer shared by producers, tower fire cadence, bonus
//! durations and unit attacks.

use serde::{Deserialize, Serialize};

use crate::math::{fixed_serde, Fixed};

/// A countdown from `interval` to zero.
///
/// `remaining` always stays within `[0, interval]`. A timer with a zero
/// interval is permanently ready.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CooldownTimer {
    #[serde(with = "fixed_serde")]
    interval: Fixed,
    #[serde(with = "fixed_serde")]
    remaining: Fixed,
}

impl CooldownTimer {
    /// Create a timer that starts a full interval away from ready.
    #[must_use]
    pub fn new(interval: Fixed) -> Self {
        let interval = interval.max(Fixed::ZERO);
        Self {
            interval,
            remaining: interval,
        }
    }

    /// Create a timer that is ready immediately.
    #[must_use]
    pub fn ready(interval: Fixed) -> Self {
        Self {
            interval: interval.max(Fixed::ZERO),
            remaining: Fixed::ZERO,
        }
    }

    /// Advance by `dt` seconds. Returns true if the timer is ready afterwards.
    pub fn tick(&mut self, dt: Fixed) -> bool {
        self.remaining = (self.remaining - dt).max(Fixed::ZERO);
        self.is_ready()
    }

    /// Restart the countdown from the full interval.
    pub fn reset(&mut self) {
        self.remaining = self.interval;
    }

    /// True once the countdown reached zero.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.remaining <= Fixed::ZERO
    }

    /// Change the interval, clamping the remaining time into the new range.
    pub fn set_interval(&mut self, interval: Fixed) {
        self.interval = interval.max(Fixed::ZERO);
        self.remaining = self.remaining.min(self.interval);
    }

    /// Overwrite the remaining time, clamped to `[0, interval]`.
    pub fn set_remaining(&mut self, remaining: Fixed) {
        self.remaining = remaining.clamp(Fixed::ZERO, self.interval);
    }

    /// Fraction of the interval that has elapsed, in `[0, 1]`.
    #[must_use]
    pub fn progress(&self) -> Fixed {
        if self.interval <= Fixed::ZERO {
            return Fixed::ONE;
        }
        ((self.interval - self.remaining) / self.interval).clamp(Fixed::ZERO, Fixed::ONE)
    }

    /// Configured interval in seconds.
    #[must_use]
    pub const fn interval(&self) -> Fixed {
        self.interval
    }

    /// Seconds left until ready.
    #[must_use]
    pub const fn remaining(&self) -> Fixed {
        self.remaining
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_reaches_ready() {
        let mut timer = CooldownTimer::new(Fixed::from_num(1));
        assert!(!timer.tick(Fixed::from_num(0.5)));
        assert!(timer.tick(Fixed::from_num(0.5)));
        assert_eq!(timer.remaining(), Fixed::ZERO);
    }

    #[test]
    fn test_tick_clamps_at_zero() {
        let mut timer = CooldownTimer::new(Fixed::from_num(1));
        assert!(timer.tick(Fixed::from_num(5)));
        assert_eq!(timer.remaining(), Fixed::ZERO);
        assert_eq!(timer.progress(), Fixed::ONE);
    }

    #[test]
    fn test_reset_restores_interval() {
        let mut timer = CooldownTimer::new(Fixed::from_num(2));
        timer.tick(Fixed::from_num(3));
        timer.reset();
        assert_eq!(timer.remaining(), Fixed::from_num(2));
        assert!(!timer.is_ready());
    }

    #[test]
    fn test_set_interval_clamps_remaining() {
        let mut timer = CooldownTimer::new(Fixed::from_num(10));
        timer.set_interval(Fixed::from_num(4));
        assert_eq!(timer.remaining(), Fixed::from_num(4));
    }

    #[test]
    fn test_progress_midway() {
        let mut timer = CooldownTimer::new(Fixed::from_num(4));
        timer.tick(Fixed::from_num(1));
        assert_eq!(timer.progress(), Fixed::from_num(0.25));
    }

    #[test]
    fn test_zero_interval_always_ready() {
        let mut timer = CooldownTimer::new(Fixed::ZERO);
        assert!(timer.is_ready());
        timer.reset();
        assert!(timer.tick(Fixed::ZERO));
        assert_eq!(timer.progress(), Fixed::ONE);
    }
}
