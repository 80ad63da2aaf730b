//! Unit templates.

use serde::{Deserialize, Serialize};

use crate::combat::UnitStats;
use crate::math::{millis, Fixed, Vec2Fixed};

/// Data-driven unit template.
///
/// # Example RON
///
/// ```ron
/// UnitData(
///     id: "footman",
///     health: 10,
///     melee_damage: 1,
///     speed: 50,
///     width: 16,
///     height: 16,
/// )
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitData {
    /// Unique identifier referenced by producers.
    pub id: String,
    /// Starting health.
    pub health: u32,
    /// Damage per strike.
    pub melee_damage: u32,
    /// Movement speed in whole units per second.
    pub speed: u32,
    /// Hitbox width.
    #[serde(default = "default_size")]
    pub width: u32,
    /// Hitbox height.
    #[serde(default = "default_size")]
    pub height: u32,
    /// Milliseconds between strikes. Zero strikes every tick.
    #[serde(default)]
    pub attack_interval_ms: u32,
}

const fn default_size() -> u32 {
    16
}

impl UnitData {
    /// Convert into runtime stats.
    #[must_use]
    pub fn to_stats(&self) -> UnitStats {
        UnitStats {
            health: self.health,
            melee_damage: self.melee_damage,
            speed: Fixed::saturating_from_num(self.speed),
            size: Vec2Fixed::new(
                Fixed::saturating_from_num(self.width),
                Fixed::saturating_from_num(self.height),
            ),
            attack_interval: millis(self.attack_interval_ms),
        }
    }

    /// The barracks footman.
    #[must_use]
    pub fn footman() -> Self {
        Self {
            id: "footman".to_string(),
            health: 10,
            melee_damage: 1,
            speed: 50,
            width: 16,
            height: 16,
            attack_interval_ms: 0,
        }
    }

    /// The basic invading grunt.
    #[must_use]
    pub fn orc_grunt() -> Self {
        Self {
            id: "orc_grunt".to_string(),
            health: 5,
            melee_damage: 1,
            speed: 20,
            width: 16,
            height: 16,
            attack_interval_ms: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_runtime_templates() {
        assert_eq!(UnitData::footman().to_stats(), UnitStats::footman());
        assert_eq!(UnitData::orc_grunt().to_stats(), UnitStats::orc_grunt());
    }

    #[test]
    fn test_parse_with_defaults() {
        let ron = r#"UnitData(id: "knight", health: 20, melee_damage: 3, speed: 40)"#;
        let unit: UnitData = ron::from_str(ron).expect("valid RON");
        assert_eq!(unit.width, 16);
        assert_eq!(unit.attack_interval_ms, 0);
        assert_eq!(unit.to_stats().speed, Fixed::from_num(40));
    }
}
