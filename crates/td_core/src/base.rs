//! The player's base: the thing every failure mode eventually damages.

use serde::{Deserialize, Serialize};

use crate::math::Vec2Fixed;
use crate::queue::DamageSink;

/// Starting health of a fresh base.
pub const BASE_STARTING_HEALTH: u32 = 10;

/// Player base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Base {
    /// World position. Enemies that walk past its x coordinate strike it.
    pub position: Vec2Fixed,
    health: u32,
    max_health: u32,
}

impl Default for Base {
    fn default() -> Self {
        Self::new(Vec2Fixed::ZERO, BASE_STARTING_HEALTH)
    }
}

impl Base {
    /// Create a base with full health.
    #[must_use]
    pub const fn new(position: Vec2Fixed, health: u32) -> Self {
        Self {
            position,
            health,
            max_health: health,
        }
    }

    /// Remaining health.
    #[must_use]
    pub const fn health(&self) -> u32 {
        self.health
    }

    /// Starting health.
    #[must_use]
    pub const fn max_health(&self) -> u32 {
        self.max_health
    }

    /// True while health remains.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.health > 0
    }
}

impl DamageSink for Base {
    fn take_damage(&mut self, amount: u32) {
        self.health = self.health.saturating_sub(amount);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_damage_saturates() {
        let mut base = Base::default();
        base.take_damage(3);
        assert_eq!(base.health(), 7);
        base.take_damage(100);
        assert_eq!(base.health(), 0);
        assert!(!base.is_alive());
    }
}
