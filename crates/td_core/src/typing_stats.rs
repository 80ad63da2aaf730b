//! Typing performance tracking on the simulation clock.
//!
//! Time only moves when the simulation calls [`TypingStats::advance`], so
//! two runs fed the same inputs compute identical multipliers.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::math::{fixed_serde, Fixed};

/// Width of the rolling WPM window, in seconds.
const ROLLING_WINDOW_SECS: i32 = 30;

/// Letters per "word" for WPM purposes.
const LETTERS_PER_WORD: i32 = 5;

/// Keystroke accuracy, speed and combo tracking.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypingStats {
    #[serde(with = "fixed_serde")]
    elapsed: Fixed,
    correct: u32,
    incorrect: u32,
    combo: u32,
    max_combo: u32,
    #[serde(skip)]
    events: VecDeque<Fixed>,
}

impl TypingStats {
    /// Fresh stats at time zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the clock forward.
    pub fn advance(&mut self, dt: Fixed) {
        self.elapsed += dt;
        self.trim_old();
    }

    /// Record one keystroke.
    pub fn record(&mut self, correct: bool) {
        if correct {
            self.correct += 1;
            self.combo += 1;
            self.max_combo = self.max_combo.max(self.combo);
        } else {
            self.incorrect += 1;
            self.combo = 0;
        }
        self.events.push_back(self.elapsed);
        self.trim_old();
    }

    fn trim_old(&mut self) {
        let cutoff = self.elapsed - Fixed::from_num(ROLLING_WINDOW_SECS);
        while self.events.front().is_some_and(|t| *t < cutoff) {
            self.events.pop_front();
        }
    }

    /// Keystrokes recorded.
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.correct + self.incorrect
    }

    /// Fraction of correct keystrokes. 1 when nothing has been typed.
    #[must_use]
    pub fn accuracy(&self) -> Fixed {
        let total = self.total();
        if total == 0 {
            return Fixed::ONE;
        }
        Fixed::from_num(self.correct) / Fixed::from_num(total)
    }

    /// Words per minute over the whole session.
    #[must_use]
    pub fn wpm(&self) -> Fixed {
        if self.elapsed <= Fixed::ZERO {
            return Fixed::ZERO;
        }
        let words = Fixed::from_num(self.total()) / Fixed::from_num(LETTERS_PER_WORD);
        words * Fixed::from_num(60) / self.elapsed
    }

    /// Words per minute over the last 30 seconds.
    #[must_use]
    pub fn rolling_wpm(&self) -> Fixed {
        let words = Fixed::from_num(self.events.len()) / Fixed::from_num(LETTERS_PER_WORD);
        words * Fixed::from_num(60) / Fixed::from_num(ROLLING_WINDOW_SECS)
    }

    /// Consecutive correct keystrokes.
    #[must_use]
    pub const fn combo(&self) -> u32 {
        self.combo
    }

    /// Best combo so far.
    #[must_use]
    pub const fn max_combo(&self) -> u32 {
        self.max_combo
    }

    /// Seconds of simulated time tracked.
    #[must_use]
    pub const fn elapsed(&self) -> Fixed {
        self.elapsed
    }

    /// Tower cooldown multiplier. Below 1 fires faster.
    #[must_use]
    pub fn rate_multiplier(&self) -> Fixed {
        let acc = self.accuracy();
        let wpm = self.wpm();
        if wpm >= Fixed::from_num(40) && acc >= Fixed::from_num(0.9) {
            return Fixed::from_num(0.9);
        }
        if wpm < Fixed::from_num(20) || acc < Fixed::from_num(0.6) {
            return Fixed::from_num(1.2);
        }
        if self.combo >= 5 {
            Fixed::from_num(0.85)
        } else {
            Fixed::ONE
        }
    }

    /// Reward multiplier for kills.
    #[must_use]
    pub fn score_multiplier(&self) -> Fixed {
        let acc = self.accuracy();
        let wpm = self.wpm();
        if wpm >= Fixed::from_num(60) && acc >= Fixed::from_num(0.95) {
            Fixed::from_num(2)
        } else if wpm >= Fixed::from_num(40) && acc >= Fixed::from_num(0.9) {
            Fixed::from_num(1.5)
        } else if wpm < Fixed::from_num(20) || acc < Fixed::from_num(0.6) {
            Fixed::from_num(0.5)
        } else {
            Fixed::ONE
        }
    }
}
