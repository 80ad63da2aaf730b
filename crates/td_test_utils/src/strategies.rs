//! Proptest strategies.
//!
//! These strategies generate random but reproducible inputs for
//! property-based testing of the queue, economy, tech graph and combat.

use proptest::prelude::*;
use td_core::combat::UnitStats;
use td_core::economy::{ResourceAmount, ResourceKind, ResourcePool};
use td_core::math::{Fixed, Vec2Fixed};
use td_core::queue::{ProducerId, Word, WordFamily};
use td_core::simulation::{InputEvent, TickInput};
use td_core::tech::{TechCategory, TechNode};

/// Generate a fixed-point number in a reasonable range for positions.
///
/// Range: -1000 to 1000 (a few screens either way)
pub fn arb_fixed_position() -> impl Strategy<Value = Fixed> {
    (-1000i32..1000i32).prop_map(Fixed::from_num)
}

/// Generate a fixed-point 2D vector for positions.
pub fn arb_vec2_position() -> impl Strategy<Value = Vec2Fixed> {
    (arb_fixed_position(), arb_fixed_position()).prop_map(|(x, y)| Vec2Fixed::new(x, y))
}

/// Generate a timestep between 0 and 2 seconds in millisecond steps.
pub fn arb_dt() -> impl Strategy<Value = Fixed> {
    (0u32..2000).prop_map(td_core::math::millis)
}

/// Generate health values (1-100).
pub fn arb_health() -> impl Strategy<Value = u32> {
    1u32..100u32
}

/// Generate damage values (0-20).
pub fn arb_damage() -> impl Strategy<Value = u32> {
    0u32..20u32
}

/// Generate a lowercase letter.
pub fn arb_letter() -> impl Strategy<Value = char> {
    (b'a'..=b'z').prop_map(char::from)
}

/// Generate a non-empty lowercase word.
pub fn arb_word_text(max_len: usize) -> impl Strategy<Value = String> {
    proptest::collection::vec(arb_letter(), 1..=max_len.max(1))
        .prop_map(|letters| letters.into_iter().collect())
}

/// Generate a queued word from a gathering producer.
pub fn arb_word() -> impl Strategy<Value = Word> {
    (arb_word_text(8), 0u32..4)
        .prop_map(|(text, source)| Word::new(text, ProducerId(source), WordFamily::Gathering))
}

/// Generate any resource kind.
pub fn arb_resource_kind() -> impl Strategy<Value = ResourceKind> {
    proptest::sample::select(ResourceKind::ALL.to_vec())
}

/// Generate a resource amount.
pub fn arb_resource_amount() -> impl Strategy<Value = ResourceAmount> {
    (arb_resource_kind(), 0u32..200).prop_map(|(kind, amount)| ResourceAmount::new(kind, amount))
}

/// Generate a cost list, possibly naming a kind more than once.
pub fn arb_cost(max_len: usize) -> impl Strategy<Value = Vec<ResourceAmount>> {
    proptest::collection::vec(arb_resource_amount(), 0..max_len)
}

/// Generate a pool with modest balances.
pub fn arb_resource_pool() -> impl Strategy<Value = ResourcePool> {
    proptest::collection::vec(0u32..300, ResourceKind::ALL.len()).prop_map(|amounts| {
        ResourceKind::ALL
            .iter()
            .zip(amounts)
            .fold(ResourcePool::new(), |pool, (kind, amount)| pool.with(*kind, amount))
    })
}

/// Generate melee unit stats with a non-zero footprint.
pub fn arb_unit_stats() -> impl Strategy<Value = UnitStats> {
    (arb_health(), arb_damage(), 0u32..100, 0u32..2000).prop_map(
        |(health, melee_damage, speed, attack_ms)| UnitStats {
            health,
            melee_damage,
            speed: Fixed::from_num(speed),
            size: Vec2Fixed::from_ints(16, 16),
            attack_interval: td_core::math::millis(attack_ms),
        },
    )
}

/// Generate an acyclic tech graph of up to `max_nodes` nodes.
///
/// Node `i` may only require nodes with a smaller index; the list is then
/// shuffled so construction order says nothing about dependency order.
pub fn arb_tech_dag(max_nodes: usize) -> impl Strategy<Value = Vec<TechNode>> {
    (1..=max_nodes.max(1))
        .prop_flat_map(|n| {
            let prereq_masks = proptest::collection::vec(any::<u32>(), n);
            let costs = proptest::collection::vec(0u32..50, n);
            (prereq_masks, costs)
        })
        .prop_map(|(masks, costs)| {
            masks
                .iter()
                .zip(&costs)
                .enumerate()
                .map(|(i, (mask, cost))| {
                    let mut node = TechNode::new(format!("node_{i:02}"), TechCategory::Utility, *cost);
                    for j in 0..i.min(32) {
                        if mask & (1 << j) != 0 {
                            node = node.with_prereq(format!("node_{j:02}"));
                        }
                    }
                    node
                })
                .collect::<Vec<_>>()
        })
        .prop_shuffle()
}

/// Generate a keystroke against the word queue or the first tower.
pub fn arb_input_event() -> impl Strategy<Value = InputEvent> {
    prop_oneof![
        6 => proptest::sample::select(vec!['f', 'j', 'd', 'k', 'x']).prop_map(InputEvent::Letter),
        1 => Just(InputEvent::Undo),
        1 => arb_word_text(3).prop_map(InputEvent::SubmitWord),
    ]
}

/// Generate up to `max_ticks` ticks of random typing.
pub fn arb_input_script(max_ticks: usize) -> impl Strategy<Value = Vec<TickInput>> {
    proptest::collection::vec(
        (arb_dt(), proptest::collection::vec(arb_input_event(), 0..4)),
        0..max_ticks,
    )
    .prop_map(|ticks| {
        ticks
            .into_iter()
            .map(|(dt, events)| TickInput {
                dt,
                events,
                ..TickInput::default()
            })
            .collect()
    })
}
