//! Tower ammunition, reload typing and firing.
//!
//! Each tower keeps two queues: `ammo_slots` (loaded or empty) and
//! `reload_queue` (letters the player must type to refill empty slots).
//! A wrong reload letter jams the tower until the player undoes; a jammed
//! tower keeps firing what it has but cannot reload.

use std::collections::VecDeque;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::combat::{CombatUnit, UnitId};
use crate::error::{GameError, Result};
use crate::math::{fixed_serde, millis, scale_u32, Fixed, Vec2Fixed};
use crate::modifiers::TowerModifiers;
use crate::timer::CooldownTimer;

/// Foresight can never preview more than this many reload letters.
pub const MAX_FORESIGHT: usize = 10;

/// Highest tower level.
pub const MAX_LEVEL: u32 = 5;

/// Unique identifier for a tower.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TowerId(pub u32);

/// Tower variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TowerKind {
    /// Balanced.
    #[default]
    Basic,
    /// Long range, heavy hits, slow, small magazine.
    Sniper,
    /// Short range, light hits, fast, large magazine.
    Rapid,
}

/// Base tower configuration shared by all kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TowerConfig {
    /// Damage per shot.
    pub damage: u32,
    /// Targeting radius.
    pub range: Fixed,
    /// Seconds between volleys before the typing multiplier.
    pub fire_interval: Fixed,
    /// Ammo slots.
    pub ammo_capacity: usize,
    /// Shots per volley.
    pub projectiles: u32,
    /// Reload letters previewed.
    pub foresight: usize,
    /// Letters drawn at random for reloads.
    pub reload_alphabet: Vec<char>,
    /// Optional fixed cycle of reload letters. Overrides the alphabet.
    pub reload_sequence: Vec<char>,
    /// Word typed to win the bonus.
    pub challenge_word: String,
    /// Percent chance per refill that a challenge starts on a full tower.
    pub challenge_chance_percent: u32,
    /// Bonus window after a challenge, in seconds.
    pub bonus_duration: Fixed,
    /// Extra damage per shot during the bonus window.
    pub damage_bonus: u32,
}

impl Default for TowerConfig {
    fn default() -> Self {
        Self {
            damage: 1,
            range: Fixed::from_num(500),
            fire_interval: millis(1600),
            ammo_capacity: 5,
            projectiles: 1,
            foresight: 5,
            reload_alphabet: vec!['f', 'j'],
            reload_sequence: Vec::new(),
            challenge_word: "bonus".to_string(),
            challenge_chance_percent: 5,
            bonus_duration: Fixed::from_num(5),
            damage_bonus: 1,
        }
    }
}

impl TowerConfig {
    /// Reject unusable tower configuration.
    pub fn validate(&self) -> Result<()> {
        if self.ammo_capacity == 0 {
            return Err(GameError::InvalidConfig(
                "tower ammo capacity must be at least 1".to_string(),
            ));
        }
        if self.reload_alphabet.is_empty() && self.reload_sequence.is_empty() {
            return Err(GameError::InvalidConfig(
                "tower needs a reload alphabet or sequence".to_string(),
            ));
        }
        if self.challenge_chance_percent > 100 {
            return Err(GameError::InvalidConfig(format!(
                "challenge chance {}% exceeds 100%",
                self.challenge_chance_percent
            )));
        }
        Ok(())
    }
}

/// Outcome of a reload keystroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadResult {
    /// Nothing to reload.
    Idle,
    /// A slot was loaded.
    Loaded {
        /// Reload letters still queued.
        remaining: usize,
    },
    /// Wrong letter; the tower is now jammed.
    Jammed {
        /// The letter that was expected.
        expected: char,
    },
    /// The tower was already jammed; nothing changed.
    StillJammed,
    /// A challenge is running; reloads are suspended.
    Blocked,
}

/// Outcome of a challenge keystroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChallengeResult {
    /// No challenge running.
    Inactive,
    /// Correct letter.
    Progress {
        /// Letters typed so far.
        typed: usize,
    },
    /// Wrong letter; challenge progress restarts.
    Mismatch,
    /// Challenge finished; the bonus window is open.
    Completed,
}

/// A projectile fired this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shot {
    /// Firing tower.
    pub tower: TowerId,
    /// Target unit.
    pub target: UnitId,
    /// Damage carried.
    pub damage: u32,
}

/// HUD view of the reload state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReloadStatus {
    /// True while reload letters are queued.
    pub reloading: bool,
    /// Letter to type next; the preserved letter while jammed.
    pub current_letter: Option<char>,
    /// Up to `foresight` upcoming letters.
    pub preview: Vec<char>,
    /// Jam flag.
    pub jammed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Challenge {
    word: Vec<char>,
    typed: usize,
}

/// A defensive tower.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tower {
    id: TowerId,
    kind: TowerKind,
    level: u32,
    /// World position.
    pub position: Vec2Fixed,
    damage: u32,
    #[serde(with = "fixed_serde")]
    range: Fixed,
    #[serde(with = "fixed_serde")]
    base_interval: Fixed,
    projectiles: u32,
    cooldown: CooldownTimer,
    ammo_slots: Vec<bool>,
    reload_queue: VecDeque<char>,
    jammed: bool,
    jammed_letter: Option<char>,
    foresight: usize,
    reload_alphabet: Vec<char>,
    reload_sequence: Vec<char>,
    reload_index: usize,
    challenge: Option<Challenge>,
    challenge_word: String,
    challenge_chance_percent: u32,
    bonus_timer: CooldownTimer,
    damage_bonus: u32,
}

impl Tower {
    /// Build a tower of `kind` at `level` (clamped to `1..=5`).
    pub fn new(
        id: TowerId,
        position: Vec2Fixed,
        kind: TowerKind,
        level: u32,
        config: &TowerConfig,
    ) -> Result<Self> {
        config.validate()?;
        let level = level.clamp(1, MAX_LEVEL);

        let mut damage = config.damage;
        let mut range = config.range;
        let mut interval = config.fire_interval;
        let mut capacity = config.ammo_capacity;
        match kind {
            TowerKind::Basic => {}
            TowerKind::Sniper => {
                damage = damage.saturating_mul(3);
                range = range.saturating_mul(Fixed::from_num(2));
                interval = interval.saturating_mul(Fixed::from_num(2.5));
                capacity = 3;
            }
            TowerKind::Rapid => {
                if damage > 1 {
                    damage /= 2;
                }
                range *= Fixed::from_num(0.7);
                interval *= Fixed::from_num(0.4);
                capacity = 6;
            }
        }

        let bonus_levels = level - 1;
        damage = damage.saturating_add(bonus_levels);
        range = range.saturating_add(Fixed::from_num(50 * bonus_levels));
        interval *= Fixed::ONE - Fixed::from_num(bonus_levels) / Fixed::from_num(10);
        capacity += bonus_levels as usize;

        // Bonus timer starts expired: no bonus until a challenge is won.
        let mut bonus_timer = CooldownTimer::new(config.bonus_duration);
        bonus_timer.set_remaining(Fixed::ZERO);

        Ok(Self {
            id,
            kind,
            level,
            position,
            damage,
            range,
            base_interval: interval,
            projectiles: config.projectiles,
            cooldown: CooldownTimer::new(interval),
            ammo_slots: vec![true; capacity],
            reload_queue: VecDeque::new(),
            jammed: false,
            jammed_letter: None,
            foresight: config.foresight.min(MAX_FORESIGHT),
            reload_alphabet: config.reload_alphabet.clone(),
            reload_sequence: config.reload_sequence.clone(),
            reload_index: 0,
            challenge: None,
            challenge_word: config.challenge_word.clone(),
            challenge_chance_percent: config.challenge_chance_percent,
            bonus_timer,
            damage_bonus: config.damage_bonus,
        })
    }

    fn next_reload_letter(&mut self, rng: &mut impl Rng) -> char {
        if !self.reload_sequence.is_empty() {
            let letter = self.reload_sequence[self.reload_index % self.reload_sequence.len()];
            self.reload_index += 1;
            return letter;
        }
        debug_assert!(!self.reload_alphabet.is_empty(), "validated at construction");
        self.reload_alphabet[rng.gen_range(0..self.reload_alphabet.len())]
    }

    /// Number of empty ammo slots.
    #[must_use]
    pub fn empty_slots(&self) -> usize {
        self.ammo_slots.iter().filter(|loaded| !**loaded).count()
    }

    /// Number of loaded ammo slots.
    #[must_use]
    pub fn loaded_ammo(&self) -> usize {
        self.ammo_slots.iter().filter(|loaded| **loaded).count()
    }

    /// Queue one reload letter per empty slot that lacks one.
    ///
    /// A fully-loaded tower may roll a bonus challenge.
    pub fn fill_reload_queue(&mut self, rng: &mut impl Rng) {
        let empty = self.empty_slots();
        while self.reload_queue.len() < empty {
            let letter = self.next_reload_letter(rng);
            self.reload_queue.push_back(letter);
        }

        if self.challenge.is_none()
            && self.reload_queue.is_empty()
            && self.challenge_chance_percent > 0
            && rng.gen_range(0..100) < self.challenge_chance_percent
        {
            let word = self.challenge_word.clone();
            self.start_challenge(&word);
        }
        self.debug_check();
    }

    /// Type a reload letter (case-insensitive).
    pub fn type_reload_letter(&mut self, ch: char) -> ReloadResult {
        if self.challenge.is_some() {
            return ReloadResult::Blocked;
        }
        if self.jammed {
            return ReloadResult::StillJammed;
        }
        let Some(&expected) = self.reload_queue.front() else {
            return ReloadResult::Idle;
        };

        if !expected.to_lowercase().eq(ch.to_lowercase()) {
            self.jammed = true;
            self.jammed_letter = Some(expected);
            debug!(tower = self.id.0, %expected, typed = %ch, "Tower jammed");
            return ReloadResult::Jammed { expected };
        }

        self.reload_queue.pop_front();
        if let Some(slot) = self.ammo_slots.iter_mut().find(|loaded| !**loaded) {
            *slot = true;
        }
        self.debug_check();
        ReloadResult::Loaded {
            remaining: self.reload_queue.len(),
        }
    }

    /// Clear the jam. Queue contents are left untouched.
    pub fn clear_jam(&mut self) {
        self.jammed = false;
    }

    /// Begin a challenge. Empty words are ignored.
    pub fn start_challenge(&mut self, word: &str) {
        if word.is_empty() {
            return;
        }
        self.challenge = Some(Challenge {
            word: word.chars().collect(),
            typed: 0,
        });
        debug!(tower = self.id.0, word, "Reload challenge started");
    }

    /// Type a challenge letter (case-insensitive).
    pub fn type_challenge_letter(&mut self, ch: char) -> ChallengeResult {
        let Some(challenge) = self.challenge.as_mut() else {
            return ChallengeResult::Inactive;
        };
        let Some(&expected) = challenge.word.get(challenge.typed) else {
            self.challenge = None;
            return ChallengeResult::Inactive;
        };

        if !expected.to_lowercase().eq(ch.to_lowercase()) {
            challenge.typed = 0;
            return ChallengeResult::Mismatch;
        }

        challenge.typed += 1;
        if challenge.typed < challenge.word.len() {
            return ChallengeResult::Progress {
                typed: challenge.typed,
            };
        }

        self.challenge = None;
        self.bonus_timer.reset();
        debug!(tower = self.id.0, "Reload challenge completed");
        ChallengeResult::Completed
    }

    /// Advance timers, refill the reload queue and fire.
    ///
    /// `targets` are candidate enemies; dead or out-of-range units are
    /// skipped. `rate_multiplier` scales the cooldown set after a volley.
    pub fn update(
        &mut self,
        dt: Fixed,
        targets: &[CombatUnit],
        rate_multiplier: Fixed,
        rng: &mut impl Rng,
    ) -> Vec<Shot> {
        self.bonus_timer.tick(dt);
        if self.challenge.is_some() {
            return Vec::new();
        }

        self.cooldown.tick(dt);
        self.fill_reload_queue(rng);

        if !self.cooldown.is_ready() || self.loaded_ammo() == 0 {
            return Vec::new();
        }

        let range_sq = self.range.saturating_mul(self.range);
        let mut in_range: Vec<(Fixed, &CombatUnit)> = targets
            .iter()
            .filter(|unit| unit.is_alive())
            .map(|unit| (self.position.distance_squared(unit.position), unit))
            .filter(|(dist_sq, _)| *dist_sq < range_sq)
            .collect();
        if in_range.is_empty() {
            return Vec::new();
        }
        // Stable: equal distances keep list order
        in_range.sort_by_key(|(dist_sq, _)| *dist_sq);

        let shots = (self.projectiles.max(1) as usize)
            .min(self.loaded_ammo())
            .min(in_range.len());
        let damage = self.shot_damage();

        let mut fired = Vec::with_capacity(shots);
        for (_, target) in in_range.into_iter().take(shots) {
            if self.consume_ammo() {
                fired.push(Shot {
                    tower: self.id,
                    target: target.id,
                    damage,
                });
            }
        }

        if !fired.is_empty() {
            self.cooldown
                .set_interval(self.base_interval * rate_multiplier.max(Fixed::ZERO));
            self.cooldown.reset();
        }
        self.debug_check();
        fired
    }

    fn consume_ammo(&mut self) -> bool {
        match self.ammo_slots.iter_mut().find(|loaded| **loaded) {
            Some(slot) => {
                *slot = false;
                true
            }
            None => false,
        }
    }

    /// Damage per shot including any active bonus.
    #[must_use]
    pub fn shot_damage(&self) -> u32 {
        if self.bonus_active() {
            self.damage.saturating_add(self.damage_bonus)
        } else {
            self.damage
        }
    }

    /// True during the post-challenge bonus window.
    #[must_use]
    pub fn bonus_active(&self) -> bool {
        !self.bonus_timer.is_ready()
    }

    /// Apply tech modifiers.
    pub fn apply_modifiers(&mut self, modifiers: &TowerModifiers) {
        if modifiers.damage_mult != Fixed::ZERO {
            self.damage = scale_u32(self.damage, modifiers.damage_mult);
        }
        if modifiers.range_mult != Fixed::ZERO {
            self.range = self.range.saturating_mul(modifiers.range_mult);
        }
        if modifiers.fire_rate_mult != Fixed::ZERO {
            let floor = Fixed::from_num(0.01);
            self.base_interval = (self.base_interval * modifiers.fire_rate_mult).max(floor);
            self.cooldown.set_interval(self.base_interval);
        }
        if modifiers.ammo_add != 0 {
            let capacity = (self.ammo_slots.len() as i64 + i64::from(modifiers.ammo_add)).max(1);
            self.resize_ammo(capacity as usize);
        }
    }

    /// Add ammo slots. New slots start loaded.
    pub fn upgrade_ammo_capacity(&mut self, increase: usize) {
        if increase > 0 {
            self.resize_ammo(self.ammo_slots.len() + increase);
        }
    }

    fn resize_ammo(&mut self, capacity: usize) {
        self.ammo_slots.resize(capacity, true);
        let empty = self.empty_slots();
        self.reload_queue.truncate(empty);
        self.debug_check();
    }

    /// Preview more reload letters, up to the cap.
    pub fn upgrade_foresight(&mut self, increase: usize) {
        self.foresight = (self.foresight + increase).min(MAX_FORESIGHT);
    }

    /// `(loaded, capacity)`.
    #[must_use]
    pub fn ammo_status(&self) -> (usize, usize) {
        (self.loaded_ammo(), self.ammo_slots.len())
    }

    /// HUD view of reload progress.
    #[must_use]
    pub fn reload_status(&self) -> ReloadStatus {
        let current_letter = if self.jammed {
            self.jammed_letter
        } else {
            self.reload_queue.front().copied()
        };
        ReloadStatus {
            reloading: !self.reload_queue.is_empty(),
            current_letter,
            preview: self.reload_queue.iter().take(self.foresight).copied().collect(),
            jammed: self.jammed,
        }
    }

    /// Tower id.
    #[must_use]
    pub const fn id(&self) -> TowerId {
        self.id
    }

    /// Tower variant.
    #[must_use]
    pub const fn kind(&self) -> TowerKind {
        self.kind
    }

    /// Tower level.
    #[must_use]
    pub const fn level(&self) -> u32 {
        self.level
    }

    /// Damage per shot without bonus.
    #[must_use]
    pub const fn damage(&self) -> u32 {
        self.damage
    }

    /// Targeting radius.
    #[must_use]
    pub const fn range(&self) -> Fixed {
        self.range
    }

    /// Fire interval before the typing multiplier.
    #[must_use]
    pub const fn base_interval(&self) -> Fixed {
        self.base_interval
    }

    /// Seconds until the next volley.
    #[must_use]
    pub const fn cooldown_remaining(&self) -> Fixed {
        self.cooldown.remaining()
    }

    /// Jam flag.
    #[must_use]
    pub const fn is_jammed(&self) -> bool {
        self.jammed
    }

    /// Letter preserved when the jam happened.
    #[must_use]
    pub const fn jammed_letter(&self) -> Option<char> {
        self.jammed_letter
    }

    /// Whether a challenge is running.
    #[must_use]
    pub const fn challenge_active(&self) -> bool {
        self.challenge.is_some()
    }

    /// Reload letters foresight reveals.
    #[must_use]
    pub const fn foresight(&self) -> usize {
        self.foresight
    }

    /// Ammo slots, first to last.
    #[must_use]
    pub fn ammo_slots(&self) -> &[bool] {
        &self.ammo_slots
    }

    /// Pending reload letters, head first.
    pub fn reload_queue(&self) -> impl Iterator<Item = &char> {
        self.reload_queue.iter()
    }

    fn debug_check(&self) {
        debug_assert!(
            self.reload_queue.len() <= self.empty_slots(),
            "reload queue longer than empty slots"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::{Side, UnitStats};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn config(capacity: usize) -> TowerConfig {
        TowerConfig {
            ammo_capacity: capacity,
            fire_interval: Fixed::ONE,
            challenge_chance_percent: 0,
            ..TowerConfig::default()
        }
    }

    fn tower(capacity: usize) -> Tower {
        Tower::new(TowerId(1), Vec2Fixed::ZERO, TowerKind::Basic, 1, &config(capacity))
            .expect("valid tower")
    }

    fn enemy(id: u32, x: i32) -> CombatUnit {
        CombatUnit::new(
            UnitId(id),
            Side::Enemy,
            Vec2Fixed::from_ints(x, 0),
            UnitStats::orc_grunt(),
        )
    }

    #[test]
    fn test_single_shot_consumes_one_slot() {
        let mut tower = tower(3);
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        let shots = tower.update(Fixed::ONE, &[enemy(7, 100)], Fixed::ONE, &mut rng);

        assert_eq!(shots.len(), 1);
        assert_eq!(shots[0].target, UnitId(7));
        assert_eq!(tower.ammo_status(), (2, 3));
        tower.fill_reload_queue(&mut rng);
        assert_eq!(tower.reload_queue().count(), 1);
    }

    #[test]
    fn test_no_fire_before_cooldown() {
        let mut tower = tower(3);
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let shots = tower.update(Fixed::from_num(0.5), &[enemy(1, 10)], Fixed::ONE, &mut rng);
        assert!(shots.is_empty());
        assert_eq!(tower.ammo_status(), (3, 3));
    }

    #[test]
    fn test_out_of_range_and_dead_targets_ignored() {
        let mut tower = tower(3);
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut corpse = enemy(2, 10);
        corpse.apply_damage(100);
        let shots = tower.update(Fixed::ONE, &[enemy(1, 600), corpse], Fixed::ONE, &mut rng);
        assert!(shots.is_empty());
    }

    #[test]
    fn test_nearest_targets_first_with_stable_ties() {
        let cfg = TowerConfig {
            projectiles: 2,
            ..config(5)
        };
        let mut tower = Tower::new(TowerId(1), Vec2Fixed::ZERO, TowerKind::Basic, 1, &cfg)
            .expect("valid tower");
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let targets = [enemy(1, 300), enemy(2, 50), enemy(3, -50), enemy(4, 20)];

        let shots = tower.update(Fixed::ONE, &targets, Fixed::ONE, &mut rng);
        let ids: Vec<u32> = shots.iter().map(|s| s.target.0).collect();
        assert_eq!(ids, vec![4, 2]);

        // Equal distances keep list order
        let mut tower = Tower::new(TowerId(1), Vec2Fixed::ZERO, TowerKind::Basic, 1, &cfg)
            .expect("valid tower");
        let shots = tower.update(
            Fixed::ONE,
            &[enemy(9, 50), enemy(8, -50), enemy(7, 50)],
            Fixed::ONE,
            &mut rng,
        );
        let ids: Vec<u32> = shots.iter().map(|s| s.target.0).collect();
        assert_eq!(ids, vec![9, 8]);
    }

    #[test]
    fn test_shots_limited_by_ammo() {
        let cfg = TowerConfig {
            projectiles: 5,
            ..config(2)
        };
        let mut tower = Tower::new(TowerId(1), Vec2Fixed::ZERO, TowerKind::Basic, 1, &cfg)
            .expect("valid tower");
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let targets = [enemy(1, 10), enemy(2, 20), enemy(3, 30)];
        assert_eq!(tower.update(Fixed::ONE, &targets, Fixed::ONE, &mut rng).len(), 2);
        assert_eq!(tower.loaded_ammo(), 0);
        // Empty magazine: no more shots even when ready
        assert!(tower.update(Fixed::from_num(5), &targets, Fixed::ONE, &mut rng).is_empty());
    }

    #[test]
    fn test_cooldown_scaled_by_rate_multiplier() {
        let mut tower = tower(5);
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        tower.update(Fixed::ONE, &[enemy(1, 10)], Fixed::from_num(0.5), &mut rng);
        assert_eq!(tower.cooldown_remaining(), Fixed::from_num(0.5));
        // Does not compound across volleys
        tower.update(Fixed::ONE, &[enemy(1, 10)], Fixed::from_num(0.5), &mut rng);
        assert_eq!(tower.cooldown_remaining(), Fixed::from_num(0.5));
    }

    #[test]
    fn test_reload_correct_letter_loads_slot() {
        let cfg = TowerConfig {
            reload_sequence: vec!['d', 'k'],
            ..config(3)
        };
        let mut tower = Tower::new(TowerId(1), Vec2Fixed::ZERO, TowerKind::Basic, 1, &cfg)
            .expect("valid tower");
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let targets = [enemy(1, 10)];
        tower.update(Fixed::ONE, &targets, Fixed::ONE, &mut rng);
        tower.update(Fixed::ONE, &targets, Fixed::ONE, &mut rng);
        tower.fill_reload_queue(&mut rng);
        assert_eq!(tower.reload_queue().copied().collect::<Vec<_>>(), vec!['d', 'k']);

        assert_eq!(tower.type_reload_letter('D'), ReloadResult::Loaded { remaining: 1 });
        assert_eq!(tower.ammo_status(), (2, 3));
    }

    #[test]
    fn test_wrong_letter_jams_and_preserves_queue() {
        let cfg = TowerConfig {
            reload_sequence: vec!['f'],
            ..config(3)
        };
        let mut tower = Tower::new(TowerId(1), Vec2Fixed::ZERO, TowerKind::Basic, 1, &cfg)
            .expect("valid tower");
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        tower.update(Fixed::ONE, &[enemy(1, 10)], Fixed::ONE, &mut rng);
        tower.fill_reload_queue(&mut rng);

        assert_eq!(tower.type_reload_letter('x'), ReloadResult::Jammed { expected: 'f' });
        assert!(tower.is_jammed());
        assert_eq!(tower.jammed_letter(), Some('f'));
        // Correct letter is refused while jammed
        assert_eq!(tower.type_reload_letter('f'), ReloadResult::StillJammed);
        assert_eq!(tower.reload_queue().count(), 1);

        let status = tower.reload_status();
        assert!(status.jammed);
        assert_eq!(status.current_letter, Some('f'));

        tower.clear_jam();
        assert_eq!(tower.reload_queue().count(), 1);
        assert_eq!(tower.type_reload_letter('f'), ReloadResult::Loaded { remaining: 0 });
    }

    #[test]
    fn test_jammed_tower_still_fires() {
        let cfg = TowerConfig {
            reload_sequence: vec!['f'],
            ..config(3)
        };
        let mut tower = Tower::new(TowerId(1), Vec2Fixed::ZERO, TowerKind::Basic, 1, &cfg)
            .expect("valid tower");
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        tower.update(Fixed::ONE, &[enemy(1, 10)], Fixed::ONE, &mut rng);
        tower.fill_reload_queue(&mut rng);
        tower.type_reload_letter('x');

        let shots = tower.update(Fixed::ONE, &[enemy(1, 10)], Fixed::ONE, &mut rng);
        assert_eq!(shots.len(), 1);
        assert_eq!(tower.ammo_status(), (1, 3));
    }

    #[test]
    fn test_challenge_blocks_firing_and_grants_bonus() {
        let mut tower = tower(3);
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        tower.start_challenge("ok");

        assert!(tower.update(Fixed::ONE, &[enemy(1, 10)], Fixed::ONE, &mut rng).is_empty());
        assert_eq!(tower.type_reload_letter('f'), ReloadResult::Blocked);
        assert_eq!(tower.type_challenge_letter('o'), ChallengeResult::Progress { typed: 1 });
        assert_eq!(tower.type_challenge_letter('x'), ChallengeResult::Mismatch);
        assert_eq!(tower.type_challenge_letter('o'), ChallengeResult::Progress { typed: 1 });
        assert_eq!(tower.type_challenge_letter('K'), ChallengeResult::Completed);
        assert!(tower.bonus_active());

        let shots = tower.update(Fixed::ONE, &[enemy(1, 10)], Fixed::ONE, &mut rng);
        assert_eq!(shots.len(), 1);
        assert_eq!(shots[0].damage, 2);

        // Bonus expires after its window
        tower.update(Fixed::from_num(5), &[], Fixed::ONE, &mut rng);
        assert!(!tower.bonus_active());
        assert_eq!(tower.shot_damage(), 1);
    }

    #[test]
    fn test_apply_modifiers() {
        let mut tower = tower(3);
        tower.apply_modifiers(&TowerModifiers {
            damage_mult: Fixed::from_num(2),
            range_mult: Fixed::from_num(1.5),
            fire_rate_mult: Fixed::from_num(0.5),
            ammo_add: 2,
        });
        assert_eq!(tower.damage(), 2);
        assert_eq!(tower.range(), Fixed::from_num(750));
        assert_eq!(tower.base_interval(), Fixed::from_num(0.5));
        assert_eq!(tower.ammo_status(), (5, 5));
    }

    #[test]
    fn test_negative_ammo_add_keeps_one_slot() {
        let mut tower = tower(3);
        tower.apply_modifiers(&TowerModifiers {
            ammo_add: -10,
            ..TowerModifiers::default()
        });
        assert_eq!(tower.ammo_status(), (1, 1));
    }

    #[test]
    fn test_upgrades() {
        let mut tower = tower(3);
        tower.upgrade_ammo_capacity(2);
        assert_eq!(tower.ammo_status(), (5, 5));
        tower.upgrade_foresight(20);
        assert_eq!(tower.foresight(), MAX_FORESIGHT);
    }

    #[test]
    fn test_kind_and_level_adjust_stats() {
        let base = config(5);
        let sniper = Tower::new(TowerId(1), Vec2Fixed::ZERO, TowerKind::Sniper, 1, &base)
            .expect("valid tower");
        assert_eq!(sniper.damage(), 3);
        assert_eq!(sniper.range(), Fixed::from_num(1000));
        assert_eq!(sniper.ammo_status(), (3, 3));

        let rapid = Tower::new(TowerId(2), Vec2Fixed::ZERO, TowerKind::Rapid, 3, &base)
            .expect("valid tower");
        assert_eq!(rapid.damage(), 3);
        assert_eq!(rapid.ammo_status(), (8, 8));
        assert_eq!(rapid.level(), 3);
    }

    #[test]
    fn test_extreme_stats_saturate() {
        let huge = TowerConfig {
            damage: u32::MAX,
            range: Fixed::MAX,
            damage_bonus: u32::MAX,
            ..config(3)
        };
        let mut sniper = Tower::new(TowerId(1), Vec2Fixed::ZERO, TowerKind::Sniper, 5, &huge)
            .expect("valid tower");
        assert_eq!(sniper.damage(), u32::MAX);
        assert_eq!(sniper.range(), Fixed::MAX);
        assert_eq!(sniper.shot_damage(), u32::MAX);

        sniper.apply_modifiers(&TowerModifiers {
            damage_mult: Fixed::from_num(4),
            range_mult: Fixed::from_num(4),
            ..TowerModifiers::default()
        });
        assert_eq!(sniper.damage(), u32::MAX);
        assert_eq!(sniper.range(), Fixed::MAX);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert!(Tower::new(TowerId(1), Vec2Fixed::ZERO, TowerKind::Basic, 1, &config(0)).is_err());
    }

    #[test]
    fn test_full_tower_rolls_challenge() {
        let cfg = TowerConfig {
            challenge_chance_percent: 100,
            ..config(3)
        };
        let mut tower = Tower::new(TowerId(1), Vec2Fixed::ZERO, TowerKind::Basic, 1, &cfg)
            .expect("valid tower");
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        tower.fill_reload_queue(&mut rng);
        assert!(tower.challenge_active());
    }
}
