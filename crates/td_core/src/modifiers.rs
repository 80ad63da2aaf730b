//! Stat modifiers granted by tech and skill unlocks.

use serde::{Deserialize, Serialize};

use crate::math::{fixed_serde, Fixed};

/// Tower stat adjustments.
///
/// Multipliers compose multiplicatively; a zero multiplier is treated as
/// "no change" so partially-filled data never zeroes a stat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TowerModifiers {
    /// Damage multiplier.
    #[serde(with = "fixed_serde")]
    pub damage_mult: Fixed,
    /// Range multiplier.
    #[serde(with = "fixed_serde")]
    pub range_mult: Fixed,
    /// Fire interval multiplier. Values below 1 fire faster.
    #[serde(with = "fixed_serde")]
    pub fire_rate_mult: Fixed,
    /// Extra ammo slots.
    pub ammo_add: i32,
}

impl Default for TowerModifiers {
    fn default() -> Self {
        Self {
            damage_mult: Fixed::ONE,
            range_mult: Fixed::ONE,
            fire_rate_mult: Fixed::ONE,
            ammo_add: 0,
        }
    }
}

fn effective(mult: Fixed) -> Fixed {
    if mult == Fixed::ZERO {
        Fixed::ONE
    } else {
        mult
    }
}

impl TowerModifiers {
    /// Combine two modifier sets.
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        Self {
            damage_mult: effective(self.damage_mult).saturating_mul(effective(other.damage_mult)),
            range_mult: effective(self.range_mult).saturating_mul(effective(other.range_mult)),
            fire_rate_mult: effective(self.fire_rate_mult)
                .saturating_mul(effective(other.fire_rate_mult)),
            ammo_add: self.ammo_add.saturating_add(other.ammo_add),
        }
    }

    /// True when applying these modifiers would change nothing.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        effective(self.damage_mult) == Fixed::ONE
            && effective(self.range_mult) == Fixed::ONE
            && effective(self.fire_rate_mult) == Fixed::ONE
            && self.ammo_add == 0
    }
}

/// Flat bonuses for units trained after the unlock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct UnitModifiers {
    /// Extra melee damage.
    pub damage_add: u32,
    /// Extra starting health.
    pub health_add: u32,
}

impl UnitModifiers {
    /// Combine two modifier sets.
    #[must_use]
    pub const fn merge(self, other: Self) -> Self {
        Self {
            damage_add: self.damage_add.saturating_add(other.damage_add),
            health_add: self.health_add.saturating_add(other.health_add),
        }
    }
}
