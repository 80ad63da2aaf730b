//! Production buildings.
//!
//! Every producer runs the same cycle:
//!
//! ```text
//! Cooling --timer expires--> AwaitingCompletion --word typed--> Cooling
//! ```
//!
//! The cooldown restarts only after the emitted word is typed, so output is
//! paced by the player rather than by the clock alone. A producer never has
//! more than one word in the queue.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::combat::UnitStats;
use crate::economy::{ResourceAmount, ResourceKind, ResourcePool};
use crate::error::{GameError, Result};
use crate::math::{Fixed, Vec2Fixed};
use crate::queue::{ProducerId, TypingQueue, Word, WordFamily};
use crate::tech::LetterStages;
use crate::timer::CooldownTimer;

/// The four building types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProducerKind {
    /// Gold and food.
    Farmer,
    /// Gold and wood.
    Lumberjack,
    /// Gold, stone and iron.
    Miner,
    /// Trains footmen.
    Barracks,
}

impl ProducerKind {
    /// Word family tag for words this kind emits.
    #[must_use]
    pub const fn family(self) -> WordFamily {
        match self {
            Self::Farmer | Self::Lumberjack | Self::Miner => WordFamily::Gathering,
            Self::Barracks => WordFamily::Military,
        }
    }

    /// Display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Farmer => "Farmer",
            Self::Lumberjack => "Lumberjack",
            Self::Miner => "Miner",
            Self::Barracks => "Barracks",
        }
    }
}

/// What completing a producer's word yields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Payoff {
    /// Credit these resources.
    Resources(Vec<ResourceAmount>),
    /// Train a unit with these stats.
    TrainUnit(UnitStats),
}

impl Payoff {
    /// Default payoff for a building kind.
    #[must_use]
    pub fn default_for(kind: ProducerKind) -> Self {
        let gold = ResourceAmount::new(ResourceKind::Gold, 1);
        match kind {
            ProducerKind::Farmer => {
                Self::Resources(vec![gold, ResourceAmount::new(ResourceKind::Food, 1)])
            }
            ProducerKind::Lumberjack => {
                Self::Resources(vec![gold, ResourceAmount::new(ResourceKind::Wood, 1)])
            }
            ProducerKind::Miner => Self::Resources(vec![
                gold,
                ResourceAmount::new(ResourceKind::Stone, 1),
                ResourceAmount::new(ResourceKind::Iron, 1),
            ]),
            ProducerKind::Barracks => Self::TrainUnit(UnitStats::footman()),
        }
    }
}

/// Result of a successful word completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// Resources were credited to the pool.
    Resources(Vec<ResourceAmount>),
    /// A unit should be spawned.
    Unit {
        /// Stats for the new unit.
        stats: UnitStats,
        /// Where it appears.
        spawn_point: Vec2Fixed,
    },
}

/// Static producer configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProducerConfig {
    /// Building type.
    pub kind: ProducerKind,
    /// Cooldown between completion and the next word, in seconds.
    pub interval: Fixed,
    /// Starting letters.
    pub letter_pool: Vec<char>,
    /// Shortest word.
    pub word_len_min: usize,
    /// Longest word.
    pub word_len_max: usize,
    /// Completion reward.
    pub payoff: Payoff,
    /// Spawn point for trained units.
    pub spawn_point: Vec2Fixed,
}

impl ProducerConfig {
    /// Defaults for a building kind, starting with the home-row letters.
    #[must_use]
    pub fn for_kind(kind: ProducerKind) -> Self {
        let (interval_secs, word_len_min, word_len_max) = match kind {
            ProducerKind::Farmer => (7, 4, 6),
            ProducerKind::Lumberjack => (8, 4, 6),
            ProducerKind::Miner => (10, 4, 6),
            ProducerKind::Barracks => (15, 2, 3),
        };
        Self {
            kind,
            interval: Fixed::from_num(interval_secs),
            letter_pool: vec!['f', 'j'],
            word_len_min,
            word_len_max,
            payoff: Payoff::default_for(kind),
            spawn_point: Vec2Fixed::ZERO,
        }
    }

    /// Reject configurations that could never generate a word.
    pub fn validate(&self) -> Result<()> {
        if self.letter_pool.is_empty() {
            return Err(GameError::EmptyLetterPool(self.kind.name().to_string()));
        }
        if self.word_len_min == 0 || self.word_len_min > self.word_len_max {
            return Err(GameError::InvalidWordLength {
                producer: self.kind.name().to_string(),
                min: self.word_len_min,
                max: self.word_len_max,
            });
        }
        if self.interval < Fixed::ZERO {
            return Err(GameError::InvalidConfig(format!(
                "{} has a negative interval",
                self.kind.name()
            )));
        }
        Ok(())
    }
}

/// A production building.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Producer {
    id: ProducerId,
    kind: ProducerKind,
    timer: CooldownTimer,
    letter_pool: Vec<char>,
    word_len_min: usize,
    word_len_max: usize,
    pending_word: Option<String>,
    last_word: Option<String>,
    active: bool,
    unlock_stage: usize,
    payoff: Payoff,
    spawn_point: Vec2Fixed,
}

impl Producer {
    /// Build a producer from validated configuration.
    pub fn new(id: ProducerId, config: ProducerConfig) -> Result<Self> {
        config.validate()?;
        let mut letter_pool = Vec::with_capacity(config.letter_pool.len());
        for letter in config.letter_pool {
            if !letter_pool.contains(&letter) {
                letter_pool.push(letter);
            }
        }
        Ok(Self {
            id,
            kind: config.kind,
            timer: CooldownTimer::new(config.interval),
            letter_pool,
            word_len_min: config.word_len_min,
            word_len_max: config.word_len_max,
            pending_word: None,
            last_word: None,
            active: true,
            unlock_stage: 0,
            payoff: config.payoff,
            spawn_point: config.spawn_point,
        })
    }

    /// Advance the cooldown and emit a word when it expires.
    ///
    /// Returns the emitted word. Does nothing while inactive or while a
    /// previous word is still waiting to be typed.
    pub fn update(&mut self, dt: Fixed, queue: &mut TypingQueue, rng: &mut impl Rng) -> Option<String> {
        if !self.active || self.pending_word.is_some() {
            return None;
        }
        if !self.timer.tick(dt) {
            return None;
        }

        let text = self.generate_word(rng);
        if !queue.enqueue(Word::new(text.clone(), self.id, self.kind.family())) {
            return None;
        }
        debug!(producer = self.id.0, kind = self.kind.name(), word = %text, "Word emitted");
        self.pending_word = Some(text.clone());
        self.last_word = Some(text.clone());
        Some(text)
    }

    fn generate_word(&self, rng: &mut impl Rng) -> String {
        debug_assert!(!self.letter_pool.is_empty(), "letter pool validated at construction");
        let len = rng.gen_range(self.word_len_min..=self.word_len_max);
        (0..len)
            .map(|_| self.letter_pool[rng.gen_range(0..self.letter_pool.len())])
            .collect()
    }

    /// Handle a typed word. Only the pending word is accepted.
    ///
    /// Clears the pending word, restarts the cooldown, and either credits
    /// `pool` or describes the unit to train.
    pub fn on_word_completed(&mut self, text: &str, pool: &mut ResourcePool) -> Option<Completion> {
        if self.pending_word.as_deref() != Some(text) {
            return None;
        }
        self.pending_word = None;
        self.timer.reset();

        match &self.payoff {
            Payoff::Resources(amounts) => {
                pool.credit_all(amounts);
                Some(Completion::Resources(amounts.clone()))
            }
            Payoff::TrainUnit(stats) => Some(Completion::Unit {
                stats: *stats,
                spawn_point: self.spawn_point,
            }),
        }
    }

    /// King's-Point cost of the next letter stage, if any remain.
    #[must_use]
    pub fn next_unlock_cost(&self, stages: &LetterStages) -> Option<u32> {
        stages.stage(self.unlock_stage + 1).map(|stage| stage.cost)
    }

    /// Buy the next letter stage with King's Points.
    pub fn unlock_next(&mut self, stages: &LetterStages, pool: &mut ResourcePool) -> bool {
        let next = self.unlock_stage + 1;
        let Some(stage) = stages.stage(next) else {
            return false;
        };
        if !pool.spend_kings_points(stage.cost) {
            return false;
        }
        self.unlock_stage = next;
        self.grant_letters(&stage.letters);
        debug!(
            producer = self.id.0,
            stage = next,
            cost = stage.cost,
            "Letter stage unlocked"
        );
        true
    }

    /// Replay letter stages up to `stage` without spending anything.
    pub fn restore_stage(&mut self, stages: &LetterStages, stage: usize) {
        for index in 1..=stage {
            if let Some(entry) = stages.stage(index) {
                self.grant_letters(&entry.letters);
            }
        }
        self.unlock_stage = self.unlock_stage.max(stage.min(stages.len().saturating_sub(1)));
    }

    /// Union letters into the pool, skipping any already present.
    pub fn grant_letters(&mut self, letters: &[char]) {
        for letter in letters {
            if !self.letter_pool.contains(letter) {
                self.letter_pool.push(*letter);
            }
        }
    }

    /// Enable or disable word production.
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Change the cooldown interval.
    pub fn set_interval(&mut self, interval: Fixed) {
        self.timer.set_interval(interval);
    }

    /// Overwrite time left on the cooldown.
    pub fn set_remaining(&mut self, remaining: Fixed) {
        self.timer.set_remaining(remaining);
    }

    /// Replace the letter pool. An empty pool is rejected.
    pub fn set_letter_pool(&mut self, letters: Vec<char>) -> Result<()> {
        if letters.is_empty() {
            return Err(GameError::EmptyLetterPool(self.kind.name().to_string()));
        }
        self.letter_pool.clear();
        self.grant_letters(&letters);
        Ok(())
    }

    /// Producer id.
    #[must_use]
    pub const fn id(&self) -> ProducerId {
        self.id
    }

    /// Building type.
    #[must_use]
    pub const fn kind(&self) -> ProducerKind {
        self.kind
    }

    /// Whether the producer emits words.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Word waiting to be typed, if any.
    #[must_use]
    pub fn pending_word(&self) -> Option<&str> {
        self.pending_word.as_deref()
    }

    /// Most recently emitted word.
    #[must_use]
    pub fn last_word(&self) -> Option<&str> {
        self.last_word.as_deref()
    }

    /// Letters words are drawn from.
    #[must_use]
    pub fn letter_pool(&self) -> &[char] {
        &self.letter_pool
    }

    /// Letter stages bought so far.
    #[must_use]
    pub const fn unlock_stage(&self) -> usize {
        self.unlock_stage
    }

    /// Cooldown progress in `[0, 1]`.
    #[must_use]
    pub fn cooldown_progress(&self) -> Fixed {
        self.timer.progress()
    }

    /// Seconds until the next word.
    #[must_use]
    pub const fn cooldown_remaining(&self) -> Fixed {
        self.timer.remaining()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn quick_farmer() -> Producer {
        let config = ProducerConfig {
            interval: Fixed::from_num(0.1),
            letter_pool: vec!['f', 'j'],
            word_len_min: 2,
            word_len_max: 2,
            ..ProducerConfig::for_kind(ProducerKind::Farmer)
        };
        Producer::new(ProducerId(1), config).expect("valid config")
    }

    #[test]
    fn test_word_emitted_on_expiry() {
        let mut producer = quick_farmer();
        let mut queue = TypingQueue::new();
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        let word = producer
            .update(Fixed::from_num(0.11), &mut queue, &mut rng)
            .expect("timer expired");
        assert_eq!(word.len(), 2);
        assert!(word.chars().all(|c| c == 'f' || c == 'j'));
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.peek().map(|w| w.family), Some(WordFamily::Gathering));
        assert_eq!(queue.peek().map(|w| w.source), Some(ProducerId(1)));
    }

    #[test]
    fn test_no_second_word_while_pending() {
        let mut producer = quick_farmer();
        let mut queue = TypingQueue::new();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut pool = ResourcePool::new();

        let word = producer
            .update(Fixed::from_num(0.11), &mut queue, &mut rng)
            .expect("timer expired");
        for _ in 0..20 {
            assert_eq!(producer.update(Fixed::from_num(0.11), &mut queue, &mut rng), None);
        }
        assert_eq!(queue.len(), 1);

        assert!(producer.on_word_completed(&word, &mut pool).is_some());
        assert_eq!(producer.pending_word(), None);
    }

    #[test]
    fn test_cooldown_restarts_after_completion() {
        let mut producer = quick_farmer();
        let mut queue = TypingQueue::new();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut pool = ResourcePool::new();

        let word = producer
            .update(Fixed::from_num(0.11), &mut queue, &mut rng)
            .expect("timer expired");
        producer.on_word_completed(&word, &mut pool);
        assert_eq!(producer.cooldown_remaining(), Fixed::from_num(0.1));

        assert_eq!(producer.update(Fixed::from_num(0.05), &mut queue, &mut rng), None);
        assert!(producer
            .update(Fixed::from_num(0.06), &mut queue, &mut rng)
            .is_some());
    }

    #[test]
    fn test_completion_credits_pool() {
        let mut producer = quick_farmer();
        let mut queue = TypingQueue::new();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut pool = ResourcePool::new();

        let word = producer
            .update(Fixed::ONE, &mut queue, &mut rng)
            .expect("timer expired");
        let completion = producer.on_word_completed(&word, &mut pool);

        assert!(matches!(completion, Some(Completion::Resources(_))));
        assert_eq!(pool.amount(ResourceKind::Gold), 1);
        assert_eq!(pool.amount(ResourceKind::Food), 1);
    }

    #[test]
    fn test_wrong_word_ignored() {
        let mut producer = quick_farmer();
        let mut queue = TypingQueue::new();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut pool = ResourcePool::new();

        producer.update(Fixed::ONE, &mut queue, &mut rng);
        assert_eq!(producer.on_word_completed("zz", &mut pool), None);
        assert!(producer.pending_word().is_some());
        assert_eq!(pool, ResourcePool::new());
    }

    #[test]
    fn test_barracks_trains_unit() {
        let config = ProducerConfig {
            interval: Fixed::ONE,
            spawn_point: Vec2Fixed::from_ints(10, 20),
            ..ProducerConfig::for_kind(ProducerKind::Barracks)
        };
        let mut barracks = Producer::new(ProducerId(4), config).expect("valid config");
        let mut queue = TypingQueue::new();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut pool = ResourcePool::new();

        let word = barracks
            .update(Fixed::ONE, &mut queue, &mut rng)
            .expect("timer expired");
        assert!((2..=3).contains(&word.len()));
        assert_eq!(queue.peek().map(|w| w.family), Some(WordFamily::Military));

        match barracks.on_word_completed(&word, &mut pool) {
            Some(Completion::Unit { stats, spawn_point }) => {
                assert_eq!(stats, UnitStats::footman());
                assert_eq!(spawn_point, Vec2Fixed::from_ints(10, 20));
            }
            other => panic!("expected unit, got {other:?}"),
        }
        assert_eq!(pool, ResourcePool::new());
    }

    #[test]
    fn test_inactive_producer_is_idle() {
        let mut producer = quick_farmer();
        let mut queue = TypingQueue::new();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        producer.set_active(false);
        assert_eq!(producer.update(Fixed::from_num(10), &mut queue, &mut rng), None);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_unlock_next_spends_and_adds_letters() {
        let mut producer = quick_farmer();
        let stages = LetterStages::default();
        let mut pool = ResourcePool::new();

        // Stage 1 (d, k) costs 20
        pool.add_kings_points(19);
        assert!(!producer.unlock_next(&stages, &mut pool));
        assert_eq!(producer.unlock_stage(), 0);

        pool.add_kings_points(1);
        assert!(producer.unlock_next(&stages, &mut pool));
        assert_eq!(pool.kings_points(), 0);
        assert_eq!(producer.unlock_stage(), 1);
        assert_eq!(producer.letter_pool(), &['f', 'j', 'd', 'k']);
    }

    #[test]
    fn test_unlock_past_last_stage_fails() {
        let mut producer = quick_farmer();
        let stages = LetterStages::new(vec![]);
        let mut pool = ResourcePool::new();
        pool.add_kings_points(1000);
        assert!(!producer.unlock_next(&stages, &mut pool));
        assert_eq!(pool.kings_points(), 1000);
    }

    #[test]
    fn test_restore_stage_is_free() {
        let mut producer = quick_farmer();
        let stages = LetterStages::default();
        producer.restore_stage(&stages, 2);
        assert_eq!(producer.unlock_stage(), 2);
        assert_eq!(producer.letter_pool(), &['f', 'j', 'd', 'k', 's', 'l']);
    }

    #[test]
    fn test_config_validation() {
        let empty = ProducerConfig {
            letter_pool: vec![],
            ..ProducerConfig::for_kind(ProducerKind::Miner)
        };
        assert!(matches!(
            Producer::new(ProducerId(0), empty),
            Err(GameError::EmptyLetterPool(_))
        ));

        let inverted = ProducerConfig {
            word_len_min: 5,
            word_len_max: 3,
            ..ProducerConfig::for_kind(ProducerKind::Miner)
        };
        assert!(matches!(
            Producer::new(ProducerId(0), inverted),
            Err(GameError::InvalidWordLength { .. })
        ));

        let zero = ProducerConfig {
            word_len_min: 0,
            ..ProducerConfig::for_kind(ProducerKind::Miner)
        };
        assert!(Producer::new(ProducerId(0), zero).is_err());
    }
}
