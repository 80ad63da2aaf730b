//! Tower definitions.

use serde::{Deserialize, Serialize};

use crate::math::{millis, Fixed, Vec2Fixed};
use crate::tower::{TowerConfig, TowerKind};

/// Base stats shared by every tower, before kind and level adjustments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TowerStatsData {
    /// Damage per shot.
    pub damage: u32,
    /// Targeting radius in whole units.
    pub range: u32,
    /// Milliseconds between volleys.
    pub fire_interval_ms: u32,
    /// Ammo slots.
    pub ammo_capacity: usize,
    /// Shots per volley.
    pub projectiles: u32,
    /// Reload letters previewed.
    #[serde(default = "default_foresight")]
    pub foresight: usize,
    /// Alphabet for random reload letters.
    #[serde(default = "default_reload_letters")]
    pub reload_letters: String,
    /// Fixed reload cycle. Empty means random.
    #[serde(default)]
    pub reload_sequence: String,
    /// Bonus challenge word.
    #[serde(default = "default_challenge_word")]
    pub challenge_word: String,
    /// Percent chance a full tower starts a challenge on refill.
    #[serde(default = "default_challenge_chance_percent")]
    pub challenge_chance_percent: u32,
    /// Bonus window in milliseconds.
    #[serde(default = "default_bonus_duration_ms")]
    pub bonus_duration_ms: u32,
    /// Extra damage during the bonus window.
    #[serde(default = "default_damage_bonus")]
    pub damage_bonus: u32,
}

const fn default_foresight() -> usize {
    5
}

fn default_reload_letters() -> String {
    "fj".to_string()
}

fn default_challenge_word() -> String {
    "bonus".to_string()
}

const fn default_challenge_chance_percent() -> u32 {
    5
}

const fn default_bonus_duration_ms() -> u32 {
    5000
}

const fn default_damage_bonus() -> u32 {
    1
}

impl Default for TowerStatsData {
    fn default() -> Self {
        Self {
            damage: 1,
            range: 500,
            fire_interval_ms: 1600,
            ammo_capacity: 5,
            projectiles: 1,
            foresight: default_foresight(),
            reload_letters: default_reload_letters(),
            reload_sequence: String::new(),
            challenge_word: default_challenge_word(),
            challenge_chance_percent: default_challenge_chance_percent(),
            bonus_duration_ms: default_bonus_duration_ms(),
            damage_bonus: default_damage_bonus(),
        }
    }
}

impl TowerStatsData {
    /// Convert into a runtime tower configuration.
    #[must_use]
    pub fn to_config(&self) -> TowerConfig {
        TowerConfig {
            damage: self.damage,
            range: Fixed::saturating_from_num(self.range),
            fire_interval: millis(self.fire_interval_ms),
            ammo_capacity: self.ammo_capacity,
            projectiles: self.projectiles,
            foresight: self.foresight,
            reload_alphabet: self.reload_letters.chars().collect(),
            reload_sequence: self.reload_sequence.chars().collect(),
            challenge_word: self.challenge_word.clone(),
            challenge_chance_percent: self.challenge_chance_percent,
            bonus_duration: millis(self.bonus_duration_ms),
            damage_bonus: self.damage_bonus,
        }
    }
}

/// A placed tower.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TowerData {
    /// Variant.
    #[serde(default)]
    pub kind: TowerKind,
    /// Level, 1 to 5.
    #[serde(default = "default_level")]
    pub level: u32,
    /// World x.
    pub x: i32,
    /// World y.
    pub y: i32,
}

const fn default_level() -> u32 {
    1
}

impl TowerData {
    /// World position.
    #[must_use]
    pub fn position(&self) -> Vec2Fixed {
        Vec2Fixed::from_ints(self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_stats_match_runtime_defaults() {
        assert_eq!(TowerStatsData::default().to_config(), TowerConfig::default());
    }

    #[test]
    fn test_parse_tower_with_defaults() {
        let tower: TowerData = ron::from_str("TowerData(x: 100, y: 40)").expect("valid RON");
        assert_eq!(tower.kind, TowerKind::Basic);
        assert_eq!(tower.level, 1);
    }
}
