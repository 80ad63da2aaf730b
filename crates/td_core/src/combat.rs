//! Melee units and the simultaneous-resolution combat pass.
//!
//! Combat is resolved in one pass per tick:
//! - liveness is snapshotted before anyone strikes
//! - only units alive at the start of the tick deal or receive damage
//! - both sides of an overlapping pair strike in the same pass
//! - dead units are compacted out afterwards with a stable `retain`

use serde::{Deserialize, Serialize};

use crate::math::{fixed_serde, Fixed, Rect, Vec2Fixed};
use crate::modifiers::UnitModifiers;
use crate::timer::CooldownTimer;

/// Unique identifier for a combat unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UnitId(pub u32);

/// Which army a unit fights for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Player units. March to the right.
    Friendly,
    /// Invaders. March to the left, towards the base.
    Enemy,
}

impl Side {
    fn direction(self) -> Fixed {
        match self {
            Self::Friendly => Fixed::ONE,
            Self::Enemy => -Fixed::ONE,
        }
    }
}

/// Template stats for spawning a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnitStats {
    /// Starting health.
    pub health: u32,
    /// Damage per strike.
    pub melee_damage: u32,
    /// Movement speed in units per second.
    #[serde(with = "fixed_serde")]
    pub speed: Fixed,
    /// Hitbox size.
    pub size: Vec2Fixed,
    /// Seconds between strikes. Zero strikes every tick.
    #[serde(with = "fixed_serde")]
    pub attack_interval: Fixed,
}

impl UnitStats {
    /// The barracks-trained footman.
    #[must_use]
    pub fn footman() -> Self {
        Self {
            health: 10,
            melee_damage: 1,
            speed: Fixed::from_num(50),
            size: Vec2Fixed::from_ints(16, 16),
            attack_interval: Fixed::ZERO,
        }
    }

    /// The basic invading grunt.
    #[must_use]
    pub fn orc_grunt() -> Self {
        Self {
            health: 5,
            melee_damage: 1,
            speed: Fixed::from_num(20),
            size: Vec2Fixed::from_ints(16, 16),
            attack_interval: Fixed::ZERO,
        }
    }

    /// Apply flat unit bonuses.
    #[must_use]
    pub fn with_modifiers(mut self, modifiers: UnitModifiers) -> Self {
        self.health = self.health.saturating_add(modifiers.health_add);
        self.melee_damage = self.melee_damage.saturating_add(modifiers.damage_add);
        self
    }
}

/// A unit on the battlefield.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CombatUnit {
    /// Identifier, unique within the simulation.
    pub id: UnitId,
    /// Allegiance.
    pub side: Side,
    /// Top-left of the hitbox.
    pub position: Vec2Fixed,
    /// Hitbox size.
    pub size: Vec2Fixed,
    health: u32,
    max_health: u32,
    /// Damage per strike.
    pub melee_damage: u32,
    /// Movement speed in units per second.
    #[serde(with = "fixed_serde")]
    pub speed: Fixed,
    /// Strike cadence.
    pub attack_timer: CooldownTimer,
    alive: bool,
}

impl CombatUnit {
    /// Spawn a unit from template stats.
    #[must_use]
    pub fn new(id: UnitId, side: Side, position: Vec2Fixed, stats: UnitStats) -> Self {
        Self {
            id,
            side,
            position,
            size: stats.size,
            health: stats.health,
            max_health: stats.health,
            melee_damage: stats.melee_damage,
            speed: stats.speed,
            attack_timer: CooldownTimer::ready(stats.attack_interval),
            alive: stats.health > 0,
        }
    }

    /// Current health.
    #[must_use]
    pub const fn health(&self) -> u32 {
        self.health
    }

    /// Health at spawn.
    #[must_use]
    pub const fn max_health(&self) -> u32 {
        self.max_health
    }

    /// Whether the unit is still fighting.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.alive
    }

    /// Apply damage. Returns true if this hit killed the unit.
    ///
    /// Damage to a dead unit is ignored.
    pub fn apply_damage(&mut self, amount: u32) -> bool {
        if !self.alive {
            return false;
        }
        self.health = self.health.saturating_sub(amount);
        self.alive = self.health > 0;
        !self.alive
    }

    /// Move along the unit's marching direction.
    pub fn advance(&mut self, dt: Fixed) {
        if self.alive {
            self.position.x += self.side.direction() * self.speed * dt;
        }
    }

    /// Hitbox in world space.
    #[must_use]
    pub fn hitbox(&self) -> Rect {
        Rect::new(self.position, self.size)
    }
}

/// Something that happened during a combat pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombatEvent {
    /// A strike landed.
    Hit {
        /// Striking unit.
        attacker: UnitId,
        /// Struck unit.
        target: UnitId,
        /// Damage dealt.
        damage: u32,
    },
    /// A unit died.
    Killed {
        /// The unit that died.
        unit: UnitId,
        /// Its side.
        side: Side,
    },
}

/// Result of a combat pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CombatOutcome {
    /// Enemies still alive, in their original order.
    pub survivors: Vec<CombatUnit>,
    /// Hits and kills, in resolution order.
    pub events: Vec<CombatEvent>,
}

/// The player's army.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Military {
    units: Vec<CombatUnit>,
}

impl Military {
    /// Create an empty army.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a trained unit.
    pub fn add_unit(&mut self, unit: CombatUnit) {
        debug_assert_eq!(unit.side, Side::Friendly, "enemies do not join the army");
        self.units.push(unit);
    }

    /// Living units, in training order.
    #[must_use]
    pub fn units(&self) -> &[CombatUnit] {
        &self.units
    }

    /// Number of living units.
    #[must_use]
    pub fn count(&self) -> usize {
        self.units.len()
    }

    /// Run one combat pass against `enemies`.
    pub fn update(&mut self, dt: Fixed, mut enemies: Vec<CombatUnit>) -> CombatOutcome {
        let friendly_alive: Vec<bool> = self.units.iter().map(CombatUnit::is_alive).collect();
        let enemy_alive: Vec<bool> = enemies.iter().map(CombatUnit::is_alive).collect();

        for unit in self.units.iter_mut().filter(|u| u.alive) {
            unit.advance(dt);
            unit.attack_timer.tick(dt);
        }
        for enemy in enemies.iter_mut().filter(|e| e.alive) {
            enemy.attack_timer.tick(dt);
        }

        let friendly_ready: Vec<bool> = self
            .units
            .iter()
            .map(|u| u.attack_timer.is_ready())
            .collect();
        let enemy_ready: Vec<bool> = enemies
            .iter()
            .map(|e| e.attack_timer.is_ready())
            .collect();
        let mut friendly_struck = vec![false; self.units.len()];
        let mut enemy_struck = vec![false; enemies.len()];
        let mut events = Vec::new();

        for (i, unit) in self.units.iter_mut().enumerate() {
            if !friendly_alive[i] {
                continue;
            }
            for (j, enemy) in enemies.iter_mut().enumerate() {
                if !enemy_alive[j] || !unit.hitbox().intersects(&enemy.hitbox()) {
                    continue;
                }
                if friendly_ready[i] {
                    friendly_struck[i] = true;
                    strike(unit, enemy, &mut events);
                }
                if enemy_ready[j] {
                    enemy_struck[j] = true;
                    strike(enemy, unit, &mut events);
                }
            }
        }

        for (unit, struck) in self.units.iter_mut().zip(friendly_struck) {
            if struck {
                unit.attack_timer.reset();
            }
        }
        for (enemy, struck) in enemies.iter_mut().zip(enemy_struck) {
            if struck {
                enemy.attack_timer.reset();
            }
        }

        self.units.retain(CombatUnit::is_alive);
        enemies.retain(CombatUnit::is_alive);

        CombatOutcome {
            survivors: enemies,
            events,
        }
    }
}

fn strike(attacker: &CombatUnit, target: &mut CombatUnit, events: &mut Vec<CombatEvent>) {
    if !target.alive {
        return;
    }
    events.push(CombatEvent::Hit {
        attacker: attacker.id,
        target: target.id,
        damage: attacker.melee_damage,
    });
    if target.apply_damage(attacker.melee_damage) {
        events.push(CombatEvent::Killed {
            unit: target.id,
            side: target.side,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(id: u32, side: Side, x: i32, health: u32, damage: u32) -> CombatUnit {
        let stats = UnitStats {
            health,
            melee_damage: damage,
            speed: Fixed::ZERO,
            size: Vec2Fixed::from_ints(16, 16),
            attack_interval: Fixed::ZERO,
        };
        CombatUnit::new(UnitId(id), side, Vec2Fixed::from_ints(x, 0), stats)
    }

    #[test]
    fn test_apply_damage_keeps_alive_in_sync() {
        let mut grunt = unit(1, Side::Enemy, 0, 3, 1);
        assert!(!grunt.apply_damage(2));
        assert!(grunt.is_alive());
        assert!(grunt.apply_damage(5));
        assert_eq!(grunt.health(), 0);
        assert!(!grunt.is_alive());
        // Further damage is ignored
        assert!(!grunt.apply_damage(1));
    }

    #[test]
    fn test_mutual_lethal_combat_kills_both() {
        let mut military = Military::new();
        military.add_unit(unit(1, Side::Friendly, 0, 1, 1));
        let enemies = vec![unit(2, Side::Enemy, 8, 1, 1)];

        let outcome = military.update(Fixed::ZERO, enemies);

        assert_eq!(military.count(), 0);
        assert!(outcome.survivors.is_empty());
        let kills = outcome
            .events
            .iter()
            .filter(|e| matches!(e, CombatEvent::Killed { .. }))
            .count();
        assert_eq!(kills, 2);
    }

    #[test]
    fn test_dead_unit_deals_no_damage() {
        let mut military = Military::new();
        military.add_unit(unit(1, Side::Friendly, 0, 10, 1));
        let mut corpse = unit(2, Side::Enemy, 8, 1, 5);
        corpse.apply_damage(1);

        let outcome = military.update(Fixed::ZERO, vec![corpse]);

        assert_eq!(military.units()[0].health(), 10);
        assert!(outcome.survivors.is_empty());
        assert!(outcome.events.is_empty());
    }

    #[test]
    fn test_unit_killed_this_tick_still_strikes() {
        // Two footmen overlap one grunt; the grunt dies to the first
        // footman but still strikes both since it was alive at tick start.
        let mut military = Military::new();
        military.add_unit(unit(1, Side::Friendly, 0, 5, 3));
        military.add_unit(unit(2, Side::Friendly, 4, 5, 3));
        let enemies = vec![unit(3, Side::Enemy, 8, 3, 2)];

        let outcome = military.update(Fixed::ZERO, enemies);

        assert!(outcome.survivors.is_empty());
        assert_eq!(military.count(), 2);
        assert_eq!(military.units()[0].health(), 3);
        assert_eq!(military.units()[1].health(), 3);
    }

    #[test]
    fn test_non_overlapping_units_ignore_each_other() {
        let mut military = Military::new();
        military.add_unit(unit(1, Side::Friendly, 0, 5, 1));
        let enemies = vec![unit(2, Side::Enemy, 100, 5, 1)];

        let outcome = military.update(Fixed::ZERO, enemies);

        assert_eq!(outcome.survivors.len(), 1);
        assert_eq!(outcome.survivors[0].health(), 5);
        assert!(outcome.events.is_empty());
    }

    #[test]
    fn test_compaction_preserves_order() {
        let mut military = Military::new();
        military.add_unit(unit(1, Side::Friendly, 0, 1, 1));
        military.add_unit(unit(2, Side::Friendly, 200, 5, 1));
        military.add_unit(unit(3, Side::Friendly, 400, 5, 1));
        let enemies = vec![
            unit(10, Side::Enemy, 8, 5, 1),
            unit(11, Side::Enemy, 1000, 5, 1),
            unit(12, Side::Enemy, 1200, 5, 1),
        ];

        let outcome = military.update(Fixed::ZERO, enemies);

        let ids: Vec<u32> = military.units().iter().map(|u| u.id.0).collect();
        assert_eq!(ids, vec![2, 3]);
        let enemy_ids: Vec<u32> = outcome.survivors.iter().map(|u| u.id.0).collect();
        assert_eq!(enemy_ids, vec![10, 11, 12]);
    }

    #[test]
    fn test_attack_interval_limits_strikes() {
        let stats = UnitStats {
            attack_interval: Fixed::ONE,
            speed: Fixed::ZERO,
            ..UnitStats::footman()
        };
        let mut military = Military::new();
        military.add_unit(CombatUnit::new(
            UnitId(1),
            Side::Friendly,
            Vec2Fixed::ZERO,
            stats,
        ));
        let mut enemies = vec![unit(2, Side::Enemy, 8, 10, 0)];

        // First strike is immediate, then the timer gates the next one
        enemies = military.update(Fixed::from_num(0.25), enemies).survivors;
        assert_eq!(enemies[0].health(), 9);
        enemies = military.update(Fixed::from_num(0.25), enemies).survivors;
        assert_eq!(enemies[0].health(), 9);
        enemies = military.update(Fixed::from_num(0.75), enemies).survivors;
        assert_eq!(enemies[0].health(), 8);
    }

    #[test]
    fn test_friendly_advances_right_enemy_left() {
        let mut footman = CombatUnit::new(
            UnitId(1),
            Side::Friendly,
            Vec2Fixed::ZERO,
            UnitStats::footman(),
        );
        let mut grunt = CombatUnit::new(
            UnitId(2),
            Side::Enemy,
            Vec2Fixed::from_ints(100, 0),
            UnitStats::orc_grunt(),
        );
        footman.advance(Fixed::ONE);
        grunt.advance(Fixed::ONE);
        assert_eq!(footman.position.x, Fixed::from_num(50));
        assert_eq!(grunt.position.x, Fixed::from_num(80));
    }
}
