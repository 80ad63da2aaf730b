//! Production building definitions.

use serde::{Deserialize, Serialize};

use crate::economy::{ResourceAmount, ResourceKind};
use crate::math::{millis, Fixed, Vec2Fixed};
use crate::producer::ProducerKind;

/// What a producer yields, as written in data files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PayoffData {
    /// `(kind, amount)` pairs credited on completion.
    Resources(Vec<(ResourceKind, u32)>),
    /// Id of a [`super::UnitData`] to train.
    TrainUnit(String),
}

impl PayoffData {
    /// Resource amounts, if this is a resource payoff.
    #[must_use]
    pub fn resource_amounts(&self) -> Option<Vec<ResourceAmount>> {
        match self {
            Self::Resources(pairs) => Some(
                pairs
                    .iter()
                    .map(|(kind, amount)| ResourceAmount::new(*kind, *amount))
                    .collect(),
            ),
            Self::TrainUnit(_) => None,
        }
    }
}

/// Data-driven producer definition.
///
/// # Example RON
///
/// ```ron
/// ProducerData(
///     kind: Farmer,
///     interval_ms: 7000,
///     letters: "fj",
///     word_len_min: 4,
///     word_len_max: 6,
///     payoff: Resources([(Gold, 1), (Food, 1)]),
/// )
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProducerData {
    /// Building type.
    pub kind: ProducerKind,
    /// Cooldown after each completed word, in milliseconds.
    pub interval_ms: u32,
    /// Starting letter pool.
    pub letters: String,
    /// Shortest generated word.
    pub word_len_min: usize,
    /// Longest generated word.
    pub word_len_max: usize,
    /// Completion reward.
    pub payoff: PayoffData,
    /// Spawn point x for trained units.
    #[serde(default)]
    pub spawn_x: i32,
    /// Spawn point y for trained units.
    #[serde(default)]
    pub spawn_y: i32,
    /// Whether the building starts producing immediately.
    #[serde(default = "default_active")]
    pub active: bool,
}

const fn default_active() -> bool {
    true
}

impl ProducerData {
    /// Defaults for a building kind.
    #[must_use]
    pub fn for_kind(kind: ProducerKind) -> Self {
        let (interval_ms, word_len_min, word_len_max, payoff) = match kind {
            ProducerKind::Farmer => (
                7000,
                4,
                6,
                PayoffData::Resources(vec![(ResourceKind::Gold, 1), (ResourceKind::Food, 1)]),
            ),
            ProducerKind::Lumberjack => (
                8000,
                4,
                6,
                PayoffData::Resources(vec![(ResourceKind::Gold, 1), (ResourceKind::Wood, 1)]),
            ),
            ProducerKind::Miner => (
                10000,
                4,
                6,
                PayoffData::Resources(vec![
                    (ResourceKind::Gold, 1),
                    (ResourceKind::Stone, 1),
                    (ResourceKind::Iron, 1),
                ]),
            ),
            ProducerKind::Barracks => (15000, 2, 3, PayoffData::TrainUnit("footman".to_string())),
        };
        Self {
            kind,
            interval_ms,
            letters: "fj".to_string(),
            word_len_min,
            word_len_max,
            payoff,
            spawn_x: 0,
            spawn_y: 0,
            active: true,
        }
    }

    /// Spawn point for trained units.
    #[must_use]
    pub fn spawn_point(&self) -> Vec2Fixed {
        Vec2Fixed::from_ints(self.spawn_x, self.spawn_y)
    }

    /// Cooldown in fixed-point seconds.
    #[must_use]
    pub fn interval(&self) -> Fixed {
        millis(self.interval_ms)
    }
}
