//! Headless auto-typist runs.
//!
//! Plays a configuration with a perfect typist at 60 Hz while a steady
//! stream of orc grunts walks in from the right, then reports what happened.

use serde::Serialize;
use td_core::combat::UnitStats;
use td_core::data::SimConfig;
use td_core::economy::ResourceKind;
use td_core::math::{Fixed, Vec2Fixed};
use td_core::simulation::{InputEvent, Simulation, TickInput};
use tracing::info;

use crate::Result;

/// Where auto-run waves enter the map.
const WAVE_SPAWN_X: i32 = 800;

/// Knobs for an auto-typist run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    /// Ticks to simulate.
    pub ticks: u64,
    /// Overrides the config seed when set.
    pub seed: Option<u64>,
    /// Spawn one enemy every this many ticks. Zero disables waves.
    pub wave_every: u64,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            ticks: 60 * 60,
            seed: None,
            wave_every: 300,
        }
    }
}

/// What an auto-typist run produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Ticks actually simulated (stops early on defeat).
    pub ticks: u64,
    /// Seed used.
    pub seed: u64,
    /// Words typed.
    pub words_completed: usize,
    /// Friendly units trained.
    pub units_trained: usize,
    /// Enemies sent in.
    pub enemies_spawned: usize,
    /// Enemies killed.
    pub enemies_killed: usize,
    /// Tower shots fired.
    pub shots: usize,
    /// Base health at the end.
    pub base_health: u32,
    /// Whether the base fell.
    pub defeated: bool,
    /// Final balances.
    pub resources: Vec<(ResourceKind, u32)>,
    /// Final state hash.
    pub state_hash: u64,
}

/// Input for a perfect typist: the head word plus every pending reload letter.
fn auto_typist(sim: &Simulation, dt: Fixed) -> TickInput {
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

/// Run `config` headless with a perfect typist.
pub fn run_auto_typist(config: &SimConfig, options: RunOptions) -> Result<RunSummary> {
    let mut config = config.clone();
    if let Some(seed) = options.seed {
        config.seed = seed;
    }
    let mut sim = Simulation::new(&config)?;
    let dt = Fixed::ONE / Fixed::from_num(60);
    let spawn = Vec2Fixed::from_ints(WAVE_SPAWN_X, config.base_y);

    let mut summary = RunSummary {
        ticks: 0,
        seed: config.seed,
        words_completed: 0,
        units_trained: 0,
        enemies_spawned: 0,
        enemies_killed: 0,
        shots: 0,
        base_health: 0,
        defeated: false,
        resources: Vec::new(),
        state_hash: 0,
    };

    for tick in 0..options.ticks {
        let mut input = auto_typist(&sim, dt);
        if options.wave_every > 0 && tick % options.wave_every == 0 {
            input = input.with_enemy(spawn, UnitStats::orc_grunt());
            summary.enemies_spawned += 1;
        }

        let events = sim.tick(input);
        summary.ticks += 1;
        summary.words_completed += events.words_completed.len();
        summary.units_trained += events.units_trained.len();
        summary.enemies_killed += events.enemies_killed.len();
        summary.shots += events.shots.len();

        if sim.is_defeated() {
            break;
        }
    }

    summary.base_health = sim.base().health();
    summary.defeated = sim.is_defeated();
    summary.resources = sim.pool().iter().collect();
    summary.state_hash = sim.state_hash();
    info!(
        ticks = summary.ticks,
        words = summary.words_completed,
        kills = summary.enemies_killed,
        "Auto-typist run finished"
    );
    Ok(summary)
}
