//! Determinism testing utilities.
//!
//! Provides a harness for verifying that the simulation
//! produces identical results given identical inputs.
//!
//! # Testing Strategy
//!
//! A seeded run must be reproducible so balance runs, save files and
//! recorded sessions mean the same thing every time. Sources of
//! non-determinism include:
//!
//! - **Floating-point math**: We use fixed-point arithmetic via
//!   [`td_core::math::Fixed`] throughout.
//!
//! - **HashMap iteration order**: Rust's default hasher is randomized.
//!   The tech graph uses `BTreeMap`, and everything else is a `Vec`.
//!
//! - **System randomness**: Word and reload letters come from the
//!   simulation's own seeded ChaCha RNG.
//!
//! - **Wall-clock time**: Typing speed is measured on the simulation clock.
//!
//! # Test Levels
//!
//! 1. **Unit tests**: Individual component determinism (queue, towers, combat)
//! 2. **Property tests**: Random inputs must still produce deterministic outputs
//! 3. **Integration tests**: Full scripted sessions are reproducible
//! 4. **Parallel tests**: Running N simulations in parallel all match

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::thread;

use td_core::math::Fixed;
use td_core::simulation::{Simulation, TickInput};

/// Result of a determinism test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeterminismResult {
    /// Whether all runs produced identical results.
    pub is_deterministic: bool,
    /// Hashes from each run.
    pub hashes: Vec<u64>,
    /// Number of ticks simulated.
    pub ticks: u64,
}

impl DeterminismResult {
    /// Get all unique hashes (should be 1 for deterministic simulation).
    #[must_use]
    pub fn unique_hashes(&self) -> Vec<u64> {
        let mut unique: Vec<u64> = self.hashes.clone();
        unique.sort_unstable();
        unique.dedup();
        unique
    }

    /// Assert that the simulation was deterministic, with a detailed error message.
    ///
    /// # Panics
    ///
    /// Panics if the simulation produced different hashes across runs.
    pub fn assert_deterministic(&self) {
        if !self.is_deterministic {
            let unique = self.unique_hashes();
            panic!(
                "Simulation is non-deterministic!\n\
                 Runs: {}\n\
                 Ticks: {}\n\
                 Unique hashes: {} (expected 1)\n\
                 All hashes: {:?}",
                self.hashes.len(),
                self.ticks,
                unique.len(),
                self.hashes
            );
        }
    }
}

/// Run a simulation multiple times and verify determinism.
///
/// # Arguments
///
/// * `runs` - Number of times to run the simulation
/// * `ticks` - Number of ticks to simulate per run
/// * `setup` - Function to create initial simulation state
/// * `step` - Function to advance simulation by one tick
/// * `hash` - Function to compute state hash
///
/// # Example
///
/// ```
/// use td_test_utils::determinism::verify_determinism;
///
/// let result = verify_determinism(3, 10, || 0u64, |n| *n += 1, |n| *n);
/// result.assert_deterministic();
/// ```
pub fn verify_determinism<S, Setup, Step, HashFn>(
    runs: usize,
    ticks: u64,
    setup: Setup,
    step: Step,
    hash: HashFn,
) -> DeterminismResult
where
    Setup: Fn() -> S,
    Step: Fn(&mut S),
    HashFn: Fn(&S) -> u64,
{
    let mut hashes = Vec::with_capacity(runs);

    for _ in 0..runs {
        let mut state = setup();

        for _ in 0..ticks {
            step(&mut state);
        }

        hashes.push(hash(&state));
    }

    let is_deterministic = hashes.windows(2).all(|w| w[0] == w[1]);

    DeterminismResult {
        is_deterministic,
        hashes,
        ticks,
    }
}

/// Run a simulation twice with the same setup and input script and compare
/// final state hashes.
///
/// `script` builds each tick's input from the current state, so scripted
/// players (see [`crate::fixtures::typist_input`]) replay identically.
///
/// # Example
///
/// ```
/// use td_core::data::SimConfig;
/// use td_core::simulation::Simulation;
/// use td_test_utils::determinism::verify_simulation_determinism;
/// use td_test_utils::fixtures::{frame, typist_input};
///
/// let is_deterministic = verify_simulation_determinism(
///     || Simulation::new(&SimConfig::default()).unwrap(),
///     |sim| typist_input(sim, frame()),
///     600,
/// );
/// assert!(is_deterministic);
/// ```
pub fn verify_simulation_determinism<F, Script>(setup_fn: F, script: Script, num_ticks: u64) -> bool
where
    F: Fn() -> Simulation,
    Script: Fn(&Simulation) -> TickInput,
{
    let result = verify_determinism(
        2,
        num_ticks,
        &setup_fn,
        |sim| {
            let input = script(sim);
            sim.tick(input);
        },
        Simulation::state_hash,
    );
    result.is_deterministic
}

/// Run N simulations on scoped threads with a fixed timestep and compare
/// final hashes.
///
/// Independent simulations share no state, so every thread must agree.
///
/// # Panics
///
/// Panics if a simulation thread panics.
pub fn run_parallel_simulations_scoped<F>(
    setup_fn: F,
    dt: Fixed,
    num_sims: usize,
    num_ticks: u64,
) -> DeterminismResult
where
    F: Fn() -> Simulation + Sync,
{
    let hashes: Vec<u64> = thread::scope(|s| {
        let handles: Vec<_> = (0..num_sims)
            .map(|_| {
                s.spawn(|| {
                    let mut sim = setup_fn();
                    for _ in 0..num_ticks {
                        sim.tick(TickInput::new(dt));
                    }
                    sim.state_hash()
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|h| h.join().expect("simulation thread panicked"))
            .collect()
    });

    DeterminismResult {
        is_deterministic: hashes.windows(2).all(|w| w[0] == w[1]),
        hashes,
        ticks: num_ticks,
    }
}

/// Compare two simulation runs tick-by-tick, finding first divergence.
///
/// Useful for debugging non-determinism by finding exactly when
/// simulations start to differ.
///
/// # Returns
///
/// `None` if simulations are deterministic, `Some(tick)` if they diverge
/// at that tick.
pub fn find_first_divergence<F, Script>(setup_fn: F, script: Script, num_ticks: u64) -> Option<u64>
where
    F: Fn() -> Simulation,
    Script: Fn(&Simulation) -> TickInput,
{
    let mut sim1 = setup_fn();
    let mut sim2 = setup_fn();

    // Check initial state
    if sim1.state_hash() != sim2.state_hash() {
        return Some(0);
    }

    for tick in 1..=num_ticks {
        let input1 = script(&sim1);
        let input2 = script(&sim2);
        sim1.tick(input1);
        sim2.tick(input2);

        if sim1.state_hash() != sim2.state_hash() {
            return Some(tick);
        }
    }

    None
}

/// Verify that a snapshot round-trip through bytes restores progression.
///
/// Runs `setup_fn` for `num_ticks` fixed steps, snapshots, encodes and
/// decodes the snapshot, restores it into a fresh simulation from
/// `fresh_fn`, and compares resources, unlocks and producer letter pools.
pub fn verify_snapshot_round_trip<F, Fresh>(
    setup_fn: F,
    fresh_fn: Fresh,
    dt: Fixed,
    num_ticks: u64,
) -> bool
where
    F: Fn() -> Simulation,
    Fresh: Fn() -> Simulation,
{
    let mut sim = setup_fn();
    for _ in 0..num_ticks {
        sim.tick(TickInput::new(dt));
    }

    let Ok(bytes) = sim.snapshot().to_bytes() else {
        return false;
    };
    let Ok(snapshot) = td_core::snapshot::Snapshot::from_bytes(&bytes) else {
        return false;
    };

    let mut restored = fresh_fn();
    if restored.restore(&snapshot).is_err() {
        return false;
    }

    restored.pool() == sim.pool()
        && restored.tech().unlocked_ids() == sim.tech().unlocked_ids()
        && restored.tech().sequence_stage() == sim.tech().sequence_stage()
        && restored.progression() == sim.progression()
        && restored
            .producers()
            .iter()
            .zip(sim.producers())
            .all(|(a, b)| a.letter_pool() == b.letter_pool() && a.unlock_stage() == b.unlock_stage())
}

/// Compute a simple hash for any hashable value.
pub fn compute_hash<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{
        defended_config, fast_farmer_config, fixed_f, frame, stationary_enemy, typist_input,
        wave_input,
    };
    use crate::strategies::arb_input_script;
    use proptest::prelude::*;
    use td_core::data::SimConfig;
    use td_core::economy::{ResourceAmount, ResourceKind};
    use td_core::math::Vec2Fixed;
    use td_core::simulation::UnlockRequest;

    // =========================================================================
    // Basic determinism tests
    // =========================================================================

    #[test]
    fn test_verify_determinism_simple() {
        let result = verify_determinism(3, 100, || 0u64, |n| *n += 1, |n| *n);

        assert!(result.is_deterministic);
        assert_eq!(result.hashes, vec![100, 100, 100]);
    }

    #[test]
    fn test_idle_simulation_determinism() {
        assert!(verify_simulation_determinism(
            || Simulation::new(&SimConfig::default()).expect("valid config"),
            |_| TickInput::new(frame()),
            600,
        ));
    }

    #[test]
    fn test_typist_session_determinism() {
        assert!(verify_simulation_determinism(
            || Simulation::new(&defended_config(9)).expect("valid config"),
            |sim| wave_input(sim, frame(), 90),
            1200,
        ));
    }

    #[test]
    fn test_different_seeds_emit_different_words() {
        let words = |seed| {
            let mut sim = Simulation::new(&fast_farmer_config(seed)).expect("valid config");
            let mut emitted = Vec::new();
            for _ in 0..40 {
                let input = typist_input(&sim, fixed_f(0.2));
                let events = sim.tick(input);
                emitted.extend(events.words_emitted.into_iter().map(|(_, w)| w));
            }
            emitted
        };
        assert_eq!(words(1), words(1));
        assert_ne!(words(1), words(2));
    }

    #[test]
    fn test_find_divergence_on_deterministic_sim() {
        let divergence = find_first_divergence(
            || {
                let mut sim = Simulation::new(&defended_config(4)).expect("valid config");
                sim.spawn_enemy(Vec2Fixed::from_ints(300, 200), stationary_enemy(50));
                sim
            },
            |sim| typist_input(sim, frame()),
            300,
        );
        assert!(divergence.is_none(), "Expected no divergence");
    }

    // =========================================================================
    // Snapshot tests
    // =========================================================================

    #[test]
    fn test_snapshot_round_trip_fresh_sim() {
        assert!(verify_snapshot_round_trip(
            || Simulation::new(&SimConfig::default()).expect("valid config"),
            || Simulation::new(&SimConfig::default()).expect("valid config"),
            frame(),
            0,
        ));
    }

    #[test]
    fn test_snapshot_round_trip_after_unlocks() {
        let setup = || {
            let mut sim = Simulation::new(&SimConfig::default()).expect("valid config");
            sim.grant(ResourceAmount::new(ResourceKind::KingsPoints, 200));
            sim.tick(
                TickInput::new(frame())
                    .with_unlock(UnlockRequest::Tech("letters_fj".to_string()))
                    .with_unlock(UnlockRequest::Tech("letters_dk".to_string()))
                    .with_unlock(UnlockRequest::Tech("sharpened_bolts".to_string()))
                    .with_unlock(UnlockRequest::ProducerLetters(td_core::queue::ProducerId(1))),
            );
            sim
        };
        assert!(verify_snapshot_round_trip(
            setup,
            || Simulation::new(&SimConfig::default()).expect("valid config"),
            frame(),
            120,
        ));
    }

    // =========================================================================
    // Parallel tests
    // =========================================================================

    #[test]
    fn test_parallel_simulations_match() {
        let result = run_parallel_simulations_scoped(
            || Simulation::new(&defended_config(11)).expect("valid config"),
            frame(),
            4,
            600,
        );
        result.assert_deterministic();
    }

    #[test]
    fn test_compute_hash_is_stable() {
        assert_eq!(compute_hash(&"fjdk"), compute_hash(&"fjdk"));
    }

    // =========================================================================
    // Property-based tests using proptest
    // =========================================================================

    proptest! {
        /// Any keystroke script replays to the same state.
        #[test]
        fn prop_input_scripts_are_replayable(
            seed in 0u64..1000,
            script in arb_input_script(60),
        ) {
            let run = || {
                let mut sim = Simulation::new(&fast_farmer_config(seed)).expect("valid config");
                for input in &script {
                    sim.tick(input.clone());
                }
                sim.state_hash()
            };
            prop_assert_eq!(run(), run());
        }
    }

    // =========================================================================
    // Stress tests (only run explicitly with --ignored)
    // =========================================================================

    #[test]
    #[ignore = "Long-running stress test"]
    fn stress_test_long_session() {
        let result = verify_determinism(
            3,
            36_000,
            || Simulation::new(&defended_config(5)).expect("valid config"),
            |s| {
                let input = wave_input(s, frame(), 30);
                s.tick(input);
            },
            Simulation::state_hash,
        );
        result.assert_deterministic();
    }
}
