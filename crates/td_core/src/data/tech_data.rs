//! Tech tree data structures for data-driven unlock definitions.

use serde::{Deserialize, Serialize};

use crate::math::{percent_multiplier, Fixed};
use crate::modifiers::{TowerModifiers, UnitModifiers};
use crate::tech::{TechCategory, TechEffects, TechNode, TypingRequirement};

/// Tower modifiers expressed in percent (`-20` fire rate = 20 % shorter interval).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TowerModifierData {
    /// Damage change in percent.
    #[serde(default)]
    pub damage_percent: i32,
    /// Range change in percent.
    #[serde(default)]
    pub range_percent: i32,
    /// Fire interval change in percent.
    #[serde(default)]
    pub fire_rate_percent: i32,
    /// Extra ammo slots.
    #[serde(default)]
    pub ammo_add: i32,
}

impl TowerModifierData {
    /// Convert into runtime multipliers.
    #[must_use]
    pub fn to_modifiers(self) -> TowerModifiers {
        TowerModifiers {
            damage_mult: percent_multiplier(self.damage_percent),
            range_mult: percent_multiplier(self.range_percent),
            fire_rate_mult: percent_multiplier(self.fire_rate_percent),
            ammo_add: self.ammo_add,
        }
    }
}

/// Typing gate for a skill node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypingRequirementData {
    /// Minimum session words per minute.
    pub min_wpm: u32,
    /// Minimum accuracy in percent.
    pub min_accuracy_percent: u32,
}

/// Data-driven tech or skill node.
///
/// # Example RON
///
/// ```ron
/// TechNodeData(
///     id: "sharpened_bolts",
///     name: "Sharpened Bolts",
///     category: Offense,
///     cost: 40,
///     prereqs: ["letters_dk"],
///     tower: Some(TowerModifierData(damage_percent: 100)),
/// )
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechNodeData {
    /// Unique identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Menu grouping.
    pub category: TechCategory,
    /// King's-Point cost.
    pub cost: u32,
    /// Required node ids.
    #[serde(default)]
    pub prereqs: Vec<String>,
    /// Letters granted.
    #[serde(default)]
    pub letters: String,
    /// Tower stat changes.
    #[serde(default)]
    pub tower: Option<TowerModifierData>,
    /// Unit bonuses.
    #[serde(default)]
    pub unit: Option<UnitModifiers>,
    /// Typing gate.
    #[serde(default)]
    pub requirement: Option<TypingRequirementData>,
}

impl TechNodeData {
    /// A letter-stage node.
    #[must_use]
    pub fn letters(id: &str, letters: &str, cost: u32, prereq: Option<&str>) -> Self {
        Self {
            id: id.to_string(),
            name: format!("Letters {}", letters.to_uppercase()),
            category: TechCategory::Letters,
            cost,
            prereqs: prereq.map(str::to_string).into_iter().collect(),
            letters: letters.to_string(),
            tower: None,
            unit: None,
            requirement: None,
        }
    }

    /// Convert into a runtime node.
    #[must_use]
    pub fn to_node(&self) -> TechNode {
        TechNode {
            id: self.id.clone(),
            name: self.name.clone(),
            category: self.category,
            cost: self.cost,
            prereqs: self.prereqs.clone(),
            effects: TechEffects {
                letters: self.letters.chars().collect(),
                tower: self.tower.map(TowerModifierData::to_modifiers).unwrap_or_default(),
                unit: self.unit.unwrap_or_default(),
            },
            requirement: self.requirement.map(|req| TypingRequirement {
                min_wpm: Fixed::saturating_from_num(req.min_wpm),
                min_accuracy: Fixed::saturating_from_num(req.min_accuracy_percent)
                    / Fixed::from_num(100),
            }),
        }
    }
}
