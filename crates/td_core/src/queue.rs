//! The global typing queue.
//!
//! Producers push words onto the tail; the player consumes the head one
//! letter at a time. When the queue grows past its backlog threshold it
//! starts damaging the base once per second.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::math::{fixed_serde, Fixed};

/// Default number of queued words tolerated before back-pressure damage.
pub const DEFAULT_BACKLOG_THRESHOLD: usize = 5;

/// Identifies the producer that emitted a word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProducerId(pub u32);

/// What a completed word is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WordFamily {
    /// Resource-gathering producers.
    Gathering,
    /// Unit-training producers.
    Military,
}

/// A word waiting in the queue.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Word {
    /// Letters to type.
    pub text: String,
    /// Producer that emitted the word.
    pub source: ProducerId,
    /// Category tag used to route the completion.
    pub family: WordFamily,
}

impl Word {
    /// Create a new word.
    #[must_use]
    pub fn new(text: impl Into<String>, source: ProducerId, family: WordFamily) -> Self {
        Self {
            text: text.into(),
            source,
            family,
        }
    }
}

/// Outcome of a single keystroke against the queue head.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LetterResult {
    /// Nothing queued.
    Empty,
    /// Wrong letter. Progress on the head word was reset.
    Mismatch {
        /// The letter that was expected.
        expected: char,
    },
    /// Correct letter; the word is not finished yet.
    Matched {
        /// Letters typed so far on the head word.
        progress: usize,
    },
    /// The head word was finished and removed.
    Completed(Word),
}

/// Receives back-pressure damage from an overfull queue.
pub trait DamageSink {
    /// Apply `amount` points of damage.
    fn take_damage(&mut self, amount: u32);
}

/// FIFO of words plus letter progress on the head.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypingQueue {
    words: VecDeque<Word>,
    progress: usize,
    backlog_threshold: usize,
    #[serde(with = "fixed_serde")]
    backlog_timer: Fixed,
}

impl Default for TypingQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl TypingQueue {
    /// Create an empty queue with the default backlog threshold.
    #[must_use]
    pub fn new() -> Self {
        Self {
            words: VecDeque::new(),
            progress: 0,
            backlog_threshold: DEFAULT_BACKLOG_THRESHOLD,
            backlog_timer: Fixed::ZERO,
        }
    }

    /// Builder: override the backlog threshold.
    #[must_use]
    pub fn with_backlog_threshold(mut self, threshold: usize) -> Self {
        self.backlog_threshold = threshold;
        self
    }

    /// Append a word to the tail. Empty words are rejected.
    pub fn enqueue(&mut self, word: Word) -> bool {
        if word.text.is_empty() {
            warn!(source = word.source.0, "Rejected empty word");
            return false;
        }
        self.words.push_back(word);
        true
    }

    /// The word currently being typed.
    #[must_use]
    pub fn peek(&self) -> Option<&Word> {
        self.words.front()
    }

    /// Type one letter against the head word (case-insensitive).
    pub fn try_letter(&mut self, ch: char) -> LetterResult {
        let Some(head) = self.words.front() else {
            return LetterResult::Empty;
        };

        let Some(expected) = head.text.chars().nth(self.progress) else {
            // Progress can only run past the end if the head was swapped under us.
            self.progress = 0;
            return LetterResult::Empty;
        };

        if !expected.to_lowercase().eq(ch.to_lowercase()) {
            self.progress = 0;
            return LetterResult::Mismatch { expected };
        }

        self.progress += 1;
        if self.progress < head.text.chars().count() {
            return LetterResult::Matched {
                progress: self.progress,
            };
        }

        self.progress = 0;
        match self.words.pop_front() {
            Some(word) => LetterResult::Completed(word),
            None => LetterResult::Empty,
        }
    }

    /// Submit a whole word. Only an exact, case-sensitive match of the head
    /// is accepted.
    pub fn try_dequeue(&mut self, text: &str) -> Option<Word> {
        if self.words.front()?.text != text {
            return None;
        }
        self.progress = 0;
        self.words.pop_front()
    }

    /// Accumulate back-pressure while the queue is over threshold.
    ///
    /// Deals one damage to `sink` per whole second spent over the threshold.
    /// The accumulator is cleared as soon as the backlog drains. Returns the
    /// damage applied this call.
    pub fn update(&mut self, dt: Fixed, sink: &mut impl DamageSink) -> u32 {
        if self.words.len() <= self.backlog_threshold {
            self.backlog_timer = Fixed::ZERO;
            return 0;
        }

        self.backlog_timer += dt;
        let mut damage = 0;
        while self.backlog_timer >= Fixed::ONE {
            self.backlog_timer -= Fixed::ONE;
            damage += 1;
        }

        if damage > 0 {
            warn!(
                backlog = self.words.len(),
                damage, "Typing backlog is damaging the base"
            );
            sink.take_damage(damage);
        }
        damage
    }

    /// Letters typed on the head word.
    #[must_use]
    pub const fn progress(&self) -> usize {
        self.progress
    }

    /// Head-word completion as a fraction in `[0, 1]`.
    #[must_use]
    pub fn progress_ratio(&self) -> Fixed {
        match self.words.front() {
            Some(word) if !word.text.is_empty() => {
                Fixed::from_num(self.progress) / Fixed::from_num(word.text.chars().count())
            }
            _ => Fixed::ZERO,
        }
    }

    /// Drop progress on the head word.
    pub fn reset_progress(&mut self) {
        self.progress = 0;
    }

    /// Number of queued words.
    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// True when nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Queued words, head first.
    pub fn words(&self) -> impl Iterator<Item = &Word> {
        self.words.iter()
    }

    /// Back-pressure threshold.
    #[must_use]
    pub const fn backlog_threshold(&self) -> usize {
        self.backlog_threshold
    }
}
