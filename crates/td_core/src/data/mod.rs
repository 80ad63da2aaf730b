//! Data structures for simulation configuration.
//!
//! This module contains pure data structures that define producers,
//! towers, units and the tech tree. All structs are designed to be
//! deserialized from RON files.
//!
//! **Note:** This module contains no IO - it only defines data types.
//! File loading is handled by `td_tools`.

mod producer_data;
mod sim_config;
mod tech_data;
mod tower_data;
mod unit_data;

pub use producer_data::{PayoffData, ProducerData};
pub use sim_config::{LetterStageData, SimConfig, MAX_CONFIG_VALUE};
pub use tech_data::{TechNodeData, TowerModifierData, TypingRequirementData};
pub use tower_data::{TowerData, TowerStatsData};
pub use unit_data::UnitData;
