//! Core simulation loop.
//!
//! One [`Simulation`] owns every piece of game state: the typing queue,
//! resource pool, producers, army, enemies, towers, tech graph and base.
//! There are no process-wide singletons; independent simulations share
//! nothing.
//!
//! # Determinism
//!
//! - No floating-point math (uses fixed-point via [`Fixed`])
//! - Randomness comes from a seeded ChaCha RNG owned by the simulation
//! - Typing statistics run on the simulation clock, not the wall clock
//! - Same config, seed and inputs always produce the same state hash
//!
//! # Example
//!
//! ```
//! use td_core::data::SimConfig;
//! use td_core::math::Fixed;
//! use td_core::simulation::{Simulation, TickInput};
//!
//! let mut sim = Simulation::new(&SimConfig::default()).unwrap();
//! let events = sim.tick(TickInput::new(Fixed::from_num(8)));
//! assert!(!events.words_emitted.is_empty());
//! ```

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use crate::base::Base;
use crate::combat::{CombatEvent, CombatUnit, Military, Side, UnitId, UnitStats};
use crate::data::SimConfig;
use crate::economy::{ResourceAmount, ResourceKind, ResourcePool};
use crate::error::{GameError, Result};
use crate::math::{scale_u32, Fixed, Vec2Fixed};
use crate::modifiers::{TowerModifiers, UnitModifiers};
use crate::producer::{Completion, Producer};
use crate::queue::{DamageSink, LetterResult, ProducerId, TypingQueue, Word, WordFamily};
use crate::snapshot::{ProgressionStep, Snapshot, SNAPSHOT_VERSION};
use crate::tech::{LetterStages, TechEffects, TechGraph};
use crate::tower::{ChallengeResult, ReloadResult, Shot, Tower, TowerId};
use crate::typing_stats::TypingStats;

/// Damage an enemy deals when it walks into the base.
pub const BREACH_DAMAGE: u32 = 1;

/// A keystroke or command from the input layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// A letter typed against the word queue.
    Letter(char),
    /// A whole word submitted at once (exact, case-sensitive).
    SubmitWord(String),
    /// A letter typed at a tower's reload or challenge prompt.
    Reload {
        /// Target tower.
        tower: TowerId,
        /// Letter typed.
        letter: char,
    },
    /// Backspace: clears the queue jam and every tower jam.
    Undo,
}

/// An unlock the player asked for this tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnlockRequest {
    /// Paid tech node.
    Tech(String),
    /// Paid skill node with a typing requirement.
    Skill(String),
    /// Next letter stage for one producer.
    ProducerLetters(ProducerId),
    /// Free next node of the fixed progression.
    NextInSequence,
}

/// An enemy delivered by the wave system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnemySpawn {
    /// Spawn position.
    pub position: Vec2Fixed,
    /// Template stats.
    pub stats: UnitStats,
}

/// Everything the outside world feeds into one tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Seconds to advance.
    pub dt: Fixed,
    /// Keystrokes and commands, in the order they happened.
    pub events: Vec<InputEvent>,
    /// Enemies arriving this tick.
    pub spawned_enemies: Vec<EnemySpawn>,
    /// Unlocks to attempt after combat.
    pub unlock_requests: Vec<UnlockRequest>,
}

impl TickInput {
    /// Input that only advances time.
    #[must_use]
    pub fn new(dt: Fixed) -> Self {
        Self {
            dt,
            ..Self::default()
        }
    }

    /// Builder: append an input event.
    #[must_use]
    pub fn with_event(mut self, event: InputEvent) -> Self {
        self.events.push(event);
        self
    }

    /// Builder: type each character of `text` as a letter.
    #[must_use]
    pub fn with_letters(mut self, text: &str) -> Self {
        self.events.extend(text.chars().map(InputEvent::Letter));
        self
    }

    /// Builder: spawn an enemy.
    #[must_use]
    pub fn with_enemy(mut self, position: Vec2Fixed, stats: UnitStats) -> Self {
        self.spawned_enemies.push(EnemySpawn { position, stats });
        self
    }

    /// Builder: request an unlock.
    #[must_use]
    pub fn with_unlock(mut self, request: UnlockRequest) -> Self {
        self.unlock_requests.push(request);
        self
    }
}

/// Result of an unlock request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnlockEvent {
    /// A paid tech or skill node was unlocked.
    Tech(String),
    /// A producer bought its next letter stage.
    ProducerLetters {
        /// Producer.
        producer: ProducerId,
        /// Stage now reached.
        stage: usize,
    },
    /// The fixed progression advanced.
    Sequence(String),
    /// The request was refused; nothing changed.
    Denied(UnlockRequest),
}

/// Events generated during a simulation tick.
///
/// These events can be used by the game layer to trigger effects,
/// sounds, animations, etc.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickEvents {
    /// Words producers pushed onto the queue.
    pub words_emitted: Vec<(ProducerId, String)>,
    /// Per-letter queue results, in input order.
    pub letters: Vec<LetterResult>,
    /// Letters dropped because the queue was jammed.
    pub ignored_letters: u32,
    /// Words finished this tick, by any path.
    pub words_completed: Vec<Word>,
    /// Tower reload keystroke results.
    pub reloads: Vec<(TowerId, ReloadResult)>,
    /// Tower challenge keystroke results.
    pub challenges: Vec<(TowerId, ChallengeResult)>,
    /// Producer completion payoffs.
    pub completions: Vec<(ProducerId, Completion)>,
    /// Friendly units trained this tick.
    pub units_trained: Vec<UnitId>,
    /// Damage the base took from the word backlog.
    pub backlog_damage: u32,
    /// Damage the base took from enemies walking in.
    pub breach_damage: u32,
    /// Melee hits and deaths.
    pub combat: Vec<CombatEvent>,
    /// Tower shots.
    pub shots: Vec<Shot>,
    /// Enemies killed by units or towers.
    pub enemies_killed: Vec<UnitId>,
    /// Unlock outcomes, in request order.
    pub unlocks: Vec<UnlockEvent>,
}

/// The core game simulation.
///
/// # System Execution Order
///
/// Each tick runs, in this order:
/// 1. **Producers** - cooldowns advance, expired ones emit words
/// 2. **Input** - letters, whole words, reload letters and undo
/// 3. **Completions** - typed words pay out or train units
/// 4. **Backlog** - an overfull queue damages the base
/// 5. **Combat** - enemies advance, melee resolves, towers fire
/// 6. **Unlocks** - tech, skill and letter-stage purchases
#[derive(Debug, Clone)]
pub struct Simulation {
    tick: u64,
    rng: ChaCha8Rng,
    queue: TypingQueue,
    queue_jammed: bool,
    pool: ResourcePool,
    producers: Vec<Producer>,
    military: Military,
    enemies: Vec<CombatUnit>,
    towers: Vec<Tower>,
    tech: TechGraph,
    letter_stages: LetterStages,
    progression: Vec<ProgressionStep>,
    typing: TypingStats,
    base: Base,
    tower_modifiers: TowerModifiers,
    unit_modifiers: UnitModifiers,
    next_unit_id: u32,
    kill_reward_gold: u32,
    kill_reward_kings_points: u32,
    score: u64,
}

impl Simulation {
    /// Build a simulation from validated configuration.
    pub fn new(config: &SimConfig) -> Result<Self> {
        config.validate()?;

        let tech = config.tech_graph()?;
        let letter_stages = config.letter_stages(&tech);

        let mut producers = Vec::with_capacity(config.producers.len());
        for (index, data) in config.producers.iter().enumerate() {
            let mut producer = Producer::new(ProducerId(index as u32), config.producer_config(data)?)?;
            producer.set_active(data.active);
            producers.push(producer);
        }

        let tower_config = config.tower_stats.to_config();
        let mut towers = Vec::with_capacity(config.towers.len());
        for (index, data) in config.towers.iter().enumerate() {
            towers.push(Tower::new(
                TowerId(index as u32),
                data.position(),
                data.kind,
                data.level,
                &tower_config,
            )?);
        }

        let mut pool = ResourcePool::new();
        for (kind, amount) in &config.starting_resources {
            pool.add(*kind, *amount);
        }

        info!(
            seed = config.seed,
            producers = producers.len(),
            towers = towers.len(),
            tech_nodes = tech.len(),
            "Simulation created"
        );

        Ok(Self {
            tick: 0,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            queue: TypingQueue::new().with_backlog_threshold(config.backlog_threshold),
            queue_jammed: false,
            pool,
            producers,
            military: Military::new(),
            enemies: Vec::new(),
            towers,
            tech,
            letter_stages,
            progression: Vec::new(),
            typing: TypingStats::new(),
            base: Base::new(
                Vec2Fixed::from_ints(config.base_x, config.base_y),
                config.base_health,
            ),
            tower_modifiers: TowerModifiers::default(),
            unit_modifiers: UnitModifiers::default(),
            next_unit_id: 0,
            kill_reward_gold: config.kill_reward_gold,
            kill_reward_kings_points: config.kill_reward_kings_points,
            score: 0,
        })
    }

    /// Get the current tick number.
    #[must_use]
    pub const fn get_tick(&self) -> u64 {
        self.tick
    }

    /// Advance the simulation by one tick.
    pub fn tick(&mut self, input: TickInput) -> TickEvents {
        let mut events = TickEvents::default();
        let dt = input.dt.max(Fixed::ZERO);

        self.typing.advance(dt);

        // 1. Producers
        for producer in &mut self.producers {
            if let Some(word) = producer.update(dt, &mut self.queue, &mut self.rng) {
                events.words_emitted.push((producer.id(), word));
            }
        }

        // 2. Input
        for event in input.events {
            self.handle_input(event, &mut events);
        }

        // 3. Completions
        let completed = events.words_completed.clone();
        for word in &completed {
            self.dispatch_completion(word, &mut events);
        }

        // 4. Backlog
        events.backlog_damage = self.queue.update(dt, &mut self.base);

        // 5. Combat
        self.run_combat(dt, input.spawned_enemies, &mut events);

        // 6. Unlocks
        for request in input.unlock_requests {
            let outcome = self.handle_unlock(request);
            events.unlocks.push(outcome);
        }

        self.tick += 1;

        if !self.base.is_alive() && (events.backlog_damage > 0 || events.breach_damage > 0) {
            warn!(tick = self.tick, "Base destroyed");
        }

        #[cfg(feature = "debug-validation")]
        self.validate_invariants();

        #[cfg(debug_assertions)]
        {
            let hash = self.state_hash();
            debug!(tick = self.tick, state_hash = hash, "Simulation state hash");
        }

        events
    }

    fn handle_input(&mut self, event: InputEvent, events: &mut TickEvents) {
        match event {
            InputEvent::Letter(ch) => {
                if self.queue_jammed {
                    events.ignored_letters += 1;
                    return;
                }
                let result = self.queue.try_letter(ch);
                match &result {
                    LetterResult::Empty => {}
                    LetterResult::Mismatch { expected } => {
                        self.typing.record(false);
                        self.queue_jammed = true;
                        debug!(%expected, typed = %ch, "Queue jammed");
                    }
                    LetterResult::Matched { .. } => self.typing.record(true),
                    LetterResult::Completed(word) => {
                        self.typing.record(true);
                        events.words_completed.push(word.clone());
                    }
                }
                events.letters.push(result);
            }
            InputEvent::SubmitWord(text) => {
                if self.queue_jammed {
                    events.ignored_letters += text.chars().count() as u32;
                    return;
                }
                match self.queue.try_dequeue(&text) {
                    Some(word) => {
                        for _ in word.text.chars() {
                            self.typing.record(true);
                        }
                        events.words_completed.push(word);
                    }
                    None => self.typing.record(false),
                }
            }
            InputEvent::Reload { tower, letter } => {
                let Some(target) = self.towers.iter_mut().find(|t| t.id() == tower) else {
                    return;
                };
                if target.challenge_active() {
                    let result = target.type_challenge_letter(letter);
                    self.typing.record(result != ChallengeResult::Mismatch);
                    events.challenges.push((tower, result));
                } else {
                    let result = target.type_reload_letter(letter);
                    match result {
                        ReloadResult::Loaded { .. } => self.typing.record(true),
                        ReloadResult::Jammed { .. } => self.typing.record(false),
                        ReloadResult::Idle | ReloadResult::StillJammed | ReloadResult::Blocked => {}
                    }
                    events.reloads.push((tower, result));
                }
            }
            InputEvent::Undo => {
                self.queue_jammed = false;
                for tower in &mut self.towers {
                    tower.clear_jam();
                }
            }
        }
    }

    fn dispatch_completion(&mut self, word: &Word, events: &mut TickEvents) {
        let Some(producer) = self.producers.iter_mut().find(|p| p.id() == word.source) else {
            warn!(source = word.source.0, "Completed word from unknown producer");
            return;
        };
        let Some(completion) = producer.on_word_completed(&word.text, &mut self.pool) else {
            return;
        };

        match (&completion, word.family) {
            (Completion::Resources(amounts), WordFamily::Gathering) => {
                debug!(producer = word.source.0, ?amounts, "Resources gathered");
            }
            (Completion::Unit { stats, spawn_point }, WordFamily::Military) => {
                let id = self.spawn_friendly(*spawn_point, *stats);
                events.units_trained.push(id);
            }
            (Completion::Resources(_), WordFamily::Military)
            | (Completion::Unit { .. }, WordFamily::Gathering) => {
                warn!(producer = word.source.0, "Word family does not match producer payoff");
            }
        }
        events.completions.push((word.source, completion));
    }

    fn allocate_unit_id(&mut self) -> UnitId {
        let id = UnitId(self.next_unit_id);
        self.next_unit_id += 1;
        id
    }

    fn spawn_friendly(&mut self, position: Vec2Fixed, stats: UnitStats) -> UnitId {
        let id = self.allocate_unit_id();
        let stats = stats.with_modifiers(self.unit_modifiers);
        self.military
            .add_unit(CombatUnit::new(id, Side::Friendly, position, stats));
        debug!(unit = id.0, "Unit trained");
        id
    }

    /// Add an enemy outside of a tick. Returns its id.
    pub fn spawn_enemy(&mut self, position: Vec2Fixed, stats: UnitStats) -> UnitId {
        let id = self.allocate_unit_id();
        self.enemies
            .push(CombatUnit::new(id, Side::Enemy, position, stats));
        id
    }

    fn run_combat(&mut self, dt: Fixed, spawns: Vec<EnemySpawn>, events: &mut TickEvents) {
        for spawn in spawns {
            self.spawn_enemy(spawn.position, spawn.stats);
        }

        // Enemies march; any that reach the base strike it and are spent.
        let base_x = self.base.position.x;
        for enemy in &mut self.enemies {
            enemy.advance(dt);
            if enemy.is_alive() && enemy.position.x <= base_x {
                self.base.take_damage(BREACH_DAMAGE);
                events.breach_damage += BREACH_DAMAGE;
                enemy.apply_damage(enemy.health());
            }
        }
        self.enemies.retain(CombatUnit::is_alive);

        let enemies = std::mem::take(&mut self.enemies);
        let outcome = self.military.update(dt, enemies);
        self.enemies = outcome.survivors;
        for event in &outcome.events {
            if let CombatEvent::Killed {
                unit,
                side: Side::Enemy,
            } = event
            {
                events.enemies_killed.push(*unit);
            }
        }
        events.combat = outcome.events;

        let rate = self.typing.rate_multiplier();
        for tower in &mut self.towers {
            let shots = tower.update(dt, &self.enemies, rate, &mut self.rng);
            for shot in shots {
                if let Some(target) = self.enemies.iter_mut().find(|e| e.id == shot.target) {
                    if target.apply_damage(shot.damage) {
                        events.enemies_killed.push(target.id);
                    }
                }
                events.shots.push(shot);
            }
        }
        self.enemies.retain(CombatUnit::is_alive);

        for _ in &events.enemies_killed {
            self.credit_kill();
        }
    }

    fn credit_kill(&mut self) {
        let gold = scale_u32(self.kill_reward_gold, self.typing.score_multiplier()).max(1);
        self.pool.add(ResourceKind::Gold, gold);
        self.pool.add_kings_points(self.kill_reward_kings_points);
        self.score = self.score.saturating_add(u64::from(gold));
    }

    fn handle_unlock(&mut self, request: UnlockRequest) -> UnlockEvent {
        match &request {
            UnlockRequest::Tech(id) => {
                if self.tech.unlock(id, &mut self.pool) {
                    self.apply_node_effects(id);
                    self.progression.push(ProgressionStep::Tech(id.clone()));
                    return UnlockEvent::Tech(id.clone());
                }
            }
            UnlockRequest::Skill(id) => {
                if self.tech.unlock_with_stats(id, &mut self.pool, &self.typing) {
                    self.apply_node_effects(id);
                    self.progression.push(ProgressionStep::Tech(id.clone()));
                    return UnlockEvent::Tech(id.clone());
                }
            }
            UnlockRequest::ProducerLetters(producer_id) => {
                if let Some(producer) = self.producers.iter_mut().find(|p| p.id() == *producer_id) {
                    if producer.unlock_next(&self.letter_stages, &mut self.pool) {
                        let stage = producer.unlock_stage();
                        self.progression
                            .push(ProgressionStep::ProducerStage(*producer_id));
                        return UnlockEvent::ProducerLetters {
                            producer: *producer_id,
                            stage,
                        };
                    }
                }
            }
            UnlockRequest::NextInSequence => {
                if let Some(node) = self.tech.unlock_next_in_sequence() {
                    let id = node.id.clone();
                    let effects = node.effects.clone();
                    self.apply_effects(&effects);
                    self.progression.push(ProgressionStep::Tech(id.clone()));
                    return UnlockEvent::Sequence(id);
                }
            }
        }
        debug!(?request, "Unlock denied");
        UnlockEvent::Denied(request)
    }

    fn apply_node_effects(&mut self, id: &str) {
        if let Some(effects) = self.tech.node(id).map(|node| node.effects.clone()) {
            self.apply_effects(&effects);
        }
    }

    fn apply_effects(&mut self, effects: &TechEffects) {
        if !effects.letters.is_empty() {
            for producer in &mut self.producers {
                producer.grant_letters(&effects.letters);
            }
        }
        if !effects.tower.is_identity() {
            for tower in &mut self.towers {
                tower.apply_modifiers(&effects.tower);
            }
            self.tower_modifiers = self.tower_modifiers.merge(effects.tower);
        }
        self.unit_modifiers = self.unit_modifiers.merge(effects.unit);
    }

    /// Capture progression state for persistence.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            version: SNAPSHOT_VERSION,
            resources: self.pool,
            progression: self.progression.clone(),
            sequence_stage: self.tech.sequence_stage(),
        }
    }

    /// Progression purchases so far, in order.
    #[must_use]
    pub fn progression(&self) -> &[ProgressionStep] {
        &self.progression
    }

    /// Restore progression state, replaying every purchase in its original
    /// order so letter pools come back in the same order.
    pub fn restore(&mut self, snapshot: &Snapshot) -> Result<()> {
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(GameError::InvalidState(format!(
                "Unsupported snapshot version {}",
                snapshot.version
            )));
        }

        self.pool = snapshot.resources;
        for step in &snapshot.progression {
            match step {
                ProgressionStep::Tech(id) => {
                    for applied in self.tech.restore_unlocked(std::slice::from_ref(id)) {
                        self.apply_node_effects(&applied);
                        self.progression.push(ProgressionStep::Tech(applied));
                    }
                }
                ProgressionStep::ProducerStage(producer_id) => {
                    let Some(producer) =
                        self.producers.iter_mut().find(|p| p.id() == *producer_id)
                    else {
                        warn!(producer = producer_id.0, "Snapshot names unknown producer");
                        continue;
                    };
                    let next = producer.unlock_stage() + 1;
                    if self.letter_stages.stage(next).is_some() {
                        producer.restore_stage(&self.letter_stages, next);
                        self.progression.push(step.clone());
                    }
                }
            }
        }
        self.tech.restore_sequence_stage(snapshot.sequence_stage);
        info!(
            steps = snapshot.progression.len(),
            sequence_stage = snapshot.sequence_stage,
            "Snapshot restored"
        );
        Ok(())
    }

    /// Calculate a hash of the current simulation state.
    ///
    /// Used for determinism verification. Two simulations
    /// with identical state will produce identical hashes.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();

        self.tick.hash(&mut hasher);
        self.pool.hash(&mut hasher);
        self.base.hash(&mut hasher);
        self.queue_jammed.hash(&mut hasher);
        self.queue.progress().hash(&mut hasher);
        for word in self.queue.words() {
            word.hash(&mut hasher);
        }
        for producer in &self.producers {
            producer.pending_word().hash(&mut hasher);
            producer.unlock_stage().hash(&mut hasher);
            producer.cooldown_remaining().to_bits().hash(&mut hasher);
            producer.letter_pool().hash(&mut hasher);
        }
        self.military.units().hash(&mut hasher);
        self.enemies.hash(&mut hasher);
        for tower in &self.towers {
            tower.ammo_slots().hash(&mut hasher);
            for letter in tower.reload_queue() {
                letter.hash(&mut hasher);
            }
            tower.is_jammed().hash(&mut hasher);
            tower.cooldown_remaining().to_bits().hash(&mut hasher);
            tower.damage().hash(&mut hasher);
        }
        self.tech.unlocked_ids().hash(&mut hasher);
        self.tech.sequence_stage().hash(&mut hasher);
        self.typing.total().hash(&mut hasher);
        self.typing.combo().hash(&mut hasher);
        self.score.hash(&mut hasher);

        hasher.finish()
    }

    #[cfg(feature = "debug-validation")]
    fn validate_invariants(&self) {
        for tower in &self.towers {
            let empty = tower.ammo_slots().iter().filter(|loaded| !**loaded).count();
            assert!(
                tower.reload_queue().count() <= empty,
                "tower {} has more reload letters than empty slots",
                tower.id().0
            );
        }
        for unit in self.military.units().iter().chain(self.enemies.iter()) {
            assert!(unit.is_alive(), "dead unit {} left in play", unit.id.0);
            assert_eq!(unit.is_alive(), unit.health() > 0);
        }
        for producer in &self.producers {
            let queued = self
                .queue
                .words()
                .filter(|word| word.source == producer.id())
                .count();
            assert!(queued <= 1, "producer {} has {queued} words queued", producer.id().0);
            if producer.pending_word().is_none() {
                assert_eq!(queued, 0, "producer {} lost track of its word", producer.id().0);
            }
        }
    }

    /// The word queue.
    #[must_use]
    pub fn queue(&self) -> &TypingQueue {
        &self.queue
    }

    /// Whether a mistyped letter is blocking the queue.
    #[must_use]
    pub const fn queue_jammed(&self) -> bool {
        self.queue_jammed
    }

    /// Resource balances.
    #[must_use]
    pub const fn pool(&self) -> &ResourcePool {
        &self.pool
    }

    /// Credit resources from outside the tick (rewards, cheats, tests).
    pub fn grant(&mut self, amount: ResourceAmount) {
        self.pool.add(amount.kind, amount.amount);
    }

    /// Production buildings.
    #[must_use]
    pub fn producers(&self) -> &[Producer] {
        &self.producers
    }

    /// Look up a producer.
    #[must_use]
    pub fn producer(&self, id: ProducerId) -> Option<&Producer> {
        self.producers.iter().find(|p| p.id() == id)
    }

    /// The player's army.
    #[must_use]
    pub const fn military(&self) -> &Military {
        &self.military
    }

    /// Living enemies.
    #[must_use]
    pub fn enemies(&self) -> &[CombatUnit] {
        &self.enemies
    }

    /// Towers.
    #[must_use]
    pub fn towers(&self) -> &[Tower] {
        &self.towers
    }

    /// Look up a tower.
    #[must_use]
    pub fn tower(&self, id: TowerId) -> Option<&Tower> {
        self.towers.iter().find(|t| t.id() == id)
    }

    /// Tech graph and unlock state.
    #[must_use]
    pub const fn tech(&self) -> &TechGraph {
        &self.tech
    }

    /// Letter progression used for producer unlocks.
    #[must_use]
    pub const fn letter_stages(&self) -> &LetterStages {
        &self.letter_stages
    }

    /// Typing performance.
    #[must_use]
    pub const fn typing_stats(&self) -> &TypingStats {
        &self.typing
    }

    /// Player base.
    #[must_use]
    pub const fn base(&self) -> &Base {
        &self.base
    }

    /// True once the base has no health left.
    #[must_use]
    pub const fn is_defeated(&self) -> bool {
        !self.base.is_alive()
    }

    /// Accumulated tower modifiers from unlocks.
    #[must_use]
    pub const fn tower_modifiers(&self) -> &TowerModifiers {
        &self.tower_modifiers
    }

    /// Accumulated unit bonuses from unlocks.
    #[must_use]
    pub const fn unit_modifiers(&self) -> &UnitModifiers {
        &self.unit_modifiers
    }

    /// Gold earned from kills.
    #[must_use]
    pub const fn score(&self) -> u64 {
        self.score
    }
}
