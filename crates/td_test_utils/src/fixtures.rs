//! Test fixtures and helpers.
//!
//! Pre-built configurations and scripted players
//! for consistent testing.

use fixed::types::I32F32;
use td_core::combat::UnitStats;
use td_core::data::{ProducerData, SimConfig, TowerData, TowerStatsData};
use td_core::math::{Fixed, Vec2Fixed};
use td_core::producer::ProducerKind;
use td_core::simulation::{InputEvent, Simulation, TickInput};
use td_core::tower::TowerKind;

/// Create a fixed-point number from an integer.
#[must_use]
pub fn fixed(n: i32) -> I32F32 {
    I32F32::from_num(n)
}

/// Create a fixed-point number from a float (for tests only).
///
/// Note: In real simulation code, never use floats.
/// This is only for convenient test setup.
#[must_use]
pub fn fixed_f(n: f64) -> I32F32 {
    I32F32::from_num(n)
}

/// One 60 Hz frame in seconds.
#[must_use]
pub fn frame() -> Fixed {
    Fixed::ONE / Fixed::from_num(60)
}

/// Where scripted waves spawn enemies.
#[must_use]
pub fn enemy_spawn_point() -> Vec2Fixed {
    Vec2Fixed::from_ints(800, 200)
}

/// A single farmer emitting two-letter `fj` words every 100 ms. No towers.
#[must_use]
pub fn fast_farmer_config(seed: u64) -> SimConfig {
    SimConfig {
        seed,
        producers: vec![ProducerData {
            interval_ms: 100,
            word_len_min: 2,
            word_len_max: 2,
            ..ProducerData::for_kind(ProducerKind::Farmer)
        }],
        towers: vec![],
        ..SimConfig::default()
    }
}

/// The default economy plus a sniper and a rapid tower.
///
/// Challenges are disabled so tower behaviour depends only on reload input.
#[must_use]
pub fn defended_config(seed: u64) -> SimConfig {
    let base = SimConfig::default();
    let mut towers = base.towers.clone();
    towers.push(TowerData {
        kind: TowerKind::Sniper,
        level: 1,
        x: 100,
        y: 240,
    });
    towers.push(TowerData {
        kind: TowerKind::Rapid,
        level: 2,
        x: 140,
        y: 200,
    });
    SimConfig {
        seed,
        towers,
        tower_stats: TowerStatsData {
            challenge_chance_percent: 0,
            ..TowerStatsData::default()
        },
        ..base
    }
}

/// Enemy that never moves, for tower tests.
#[must_use]
pub fn stationary_enemy(health: u32) -> UnitStats {
    UnitStats {
        health,
        speed: Fixed::ZERO,
        ..UnitStats::orc_grunt()
    }
}

/// A perfect typist: submits the head word and answers every reload prompt.
#[must_use]
pub fn typist_input(sim: &Simulation, dt: Fixed) -> TickInput {
    let mut input = TickInput::new(dt);
    if let Some(word) = sim.queue().peek() {
        input = input.with_event(InputEvent::SubmitWord(word.text.clone()));
    }
    for tower in sim.towers() {
        for letter in tower.reload_queue() {
            input = input.with_event(InputEvent::Reload {
                tower: tower.id(),
                letter: *letter,
            });
        }
    }
    input
}

/// [`typist_input`] plus an orc grunt every `every` ticks.
#[must_use]
pub fn wave_input(sim: &Simulation, dt: Fixed, every: u64) -> TickInput {
    let input = typist_input(sim, dt);
    if every > 0 && sim.get_tick() % every == 0 {
        input.with_enemy(enemy_spawn_point(), UnitStats::orc_grunt())
    } else {
        input
    }
}

/// A small but complete configuration in RON.
pub const SAMPLE_CONFIG_RON: &str = r#"SimConfig(
    seed: 42,
    backlog_threshold: 5,
    base_health: 10,
    base_x: 0,
    base_y: 200,
    starting_resources: [(Gold, 5)],
    units: [
        UnitData(id: "footman", health: 10, melee_damage: 1, speed: 50),
        UnitData(id: "orc_grunt", health: 5, melee_damage: 1, speed: 20),
    ],
    producers: [
        ProducerData(
            kind: Farmer,
            interval_ms: 7000,
            letters: "fj",
            word_len_min: 4,
            word_len_max: 6,
            payoff: Resources([(Gold, 1), (Food, 1)]),
        ),
        ProducerData(
            kind: Barracks,
            interval_ms: 15000,
            letters: "fj",
            word_len_min: 2,
            word_len_max: 3,
            payoff: TrainUnit("footman"),
            spawn_x: 40,
            spawn_y: 200,
        ),
    ],
    towers: [TowerData(kind: Basic, level: 1, x: 60, y: 160)],
    tech: [
        TechNodeData(id: "letters_fj", name: "Home Row F J", category: Letters, cost: 0, letters: "fj"),
        TechNodeData(id: "letters_dk", name: "Home Row D K", category: Letters, cost: 20, prereqs: ["letters_fj"], letters: "dk"),
    ],
)"#;
