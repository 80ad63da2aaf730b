//! # TD Core
//!
//! Deterministic simulation core for Type Defense, a typing-driven
//! tower-defense game.
//!
//! This crate contains **only** deterministic logic:
//! - No rendering
//! - No IO beyond parsing configuration text
//! - No system randomness
//! - No floating-point math (uses fixed-point)
//!
//! This separation enables:
//! - Headless simulation and balance runs
//! - Save/restore of progression
//! - Determinism testing
//!
//! ## Crate Structure
//!
//! - [`queue`] - Shared word queue and typing matcher
//! - [`producer`] - Word-emitting production buildings
//! - [`tower`] - Typed-reload towers
//! - [`combat`] - Melee resolution between armies
//! - [`tech`] - Tech graph and letter progression
//! - [`simulation`] - Core simulation loop
//! - [`data`] - RON-backed configuration
//! - [`math`] - Fixed-point math utilities

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod base;
pub mod combat;
pub mod data;
pub mod economy;
pub mod error;
pub mod math;
pub mod modifiers;
pub mod producer;
pub mod queue;
pub mod simulation;
pub mod snapshot;
pub mod tech;
pub mod timer;
pub mod tower;
pub mod typing_stats;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::base::Base;
    pub use crate::combat::{CombatEvent, CombatUnit, Military, Side, UnitId, UnitStats};
    pub use crate::data::SimConfig;
    pub use crate::economy::{ResourceAmount, ResourceKind, ResourcePool};
    pub use crate::error::{GameError, Result};
    pub use crate::math::{Fixed, Vec2Fixed};
    pub use crate::modifiers::{TowerModifiers, UnitModifiers};
    pub use crate::producer::{Completion, Producer, ProducerConfig, ProducerKind};
    pub use crate::queue::{LetterResult, ProducerId, TypingQueue, Word, WordFamily};
    pub use crate::simulation::{
        InputEvent, Simulation, TickEvents, TickInput, UnlockEvent, UnlockRequest,
    };
    pub use crate::snapshot::{ProgressionStep, Snapshot};
    pub use crate::tech::{LetterStages, TechCategory, TechGraph, TechNode};
    pub use crate::timer::CooldownTimer;
    pub use crate::tower::{ReloadResult, Tower, TowerConfig, TowerId, TowerKind};
    pub use crate::typing_stats::TypingStats;
}
