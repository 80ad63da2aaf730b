//! Simulation benchmarks for td_core.
//!
//! Run with: `cargo bench -p td_core`

// Benchmark binaries don't need docs on macro-generated functions
#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use td_core::combat::UnitStats;
use td_core::data::SimConfig;
use td_core::math::{Fixed, Vec2Fixed};
use td_core::queue::{ProducerId, TypingQueue, Word, WordFamily};
use td_core::simulation::{InputEvent, Simulation, TickInput};

/// 60 Hz frame.
fn frame() -> Fixed {
    Fixed::ONE / Fixed::from_num(60)
}

/// Runs one simulated minute with a steady enemy stream and a perfect typist.
pub fn simulation_benchmark(c: &mut Criterion) {
    let config = SimConfig {
        seed: 7,
        ..SimConfig::default()
    };

    c.bench_function("simulate_one_minute", |b| {
        b.iter(|| {
            let Ok(mut sim) = Simulation::new(&config) else {
                return 0;
            };
            for tick in 0..3600_u32 {
                let mut input = TickInput::new(frame());
                if let Some(word) = sim.queue().peek() {
                    input = input.with_event(InputEvent::SubmitWord(word.text.clone()));
                }
                if tick % 120 == 0 {
                    input = input.with_enemy(Vec2Fixed::from_ints(800, 200), UnitStats::orc_grunt());
                }
                black_box(sim.tick(input));
            }
            sim.state_hash()
        });
    });

    c.bench_function("queue_type_word", |b| {
        b.iter(|| {
            let mut queue = TypingQueue::new();
            queue.enqueue(Word::new("fjfjdk", ProducerId(0), WordFamily::Gathering));
            for ch in "fjfjdk".chars() {
                black_box(queue.try_letter(ch));
            }
        });
    });
}

criterion_group!(benches, simulation_benchmark);
criterion_main!(benches);
