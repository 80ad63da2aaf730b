//! Resource pool shared by producers, towers and the tech graph.
//!
//! Amounts are unsigned integers so a pool can never go negative;
//! every spend is a test-and-decrement.

use serde::{Deserialize, Serialize};

/// The six resource counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    /// Gold, earned by every producer and by kills.
    Gold,
    /// Wood from lumberjacks.
    Wood,
    /// Stone from miners.
    Stone,
    /// Iron from miners.
    Iron,
    /// Food from farmers.
    Food,
    /// King's Points, the currency for letter and tech unlocks.
    KingsPoints,
}

impl ResourceKind {
    /// All kinds in storage order.
    pub const ALL: [Self; 6] = [
        Self::Gold,
        Self::Wood,
        Self::Stone,
        Self::Iron,
        Self::Food,
        Self::KingsPoints,
    ];

    const fn index(self) -> usize {
        match self {
            Self::Gold => 0,
            Self::Wood => 1,
            Self::Stone => 2,
            Self::Iron => 3,
            Self::Food => 4,
            Self::KingsPoints => 5,
        }
    }
}

/// A quantity of one resource kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceAmount {
    /// Which counter.
    pub kind: ResourceKind,
    /// How much.
    pub amount: u32,
}

impl ResourceAmount {
    /// Create a new amount.
    #[must_use]
    pub const fn new(kind: ResourceKind, amount: u32) -> Self {
        Self { kind, amount }
    }
}

/// Player resource counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ResourcePool {
    amounts: [u32; 6],
}

impl ResourcePool {
    /// Create an empty pool.
    #[must_use]
    pub const fn new() -> Self {
        Self { amounts: [0; 6] }
    }

    /// Builder: start with `amount` of `kind`.
    #[must_use]
    pub fn with(mut self, kind: ResourceKind, amount: u32) -> Self {
        self.set(kind, amount);
        self
    }

    /// Current amount of `kind`.
    #[must_use]
    pub const fn amount(&self, kind: ResourceKind) -> u32 {
        self.amounts[kind.index()]
    }

    /// Credit `amount` of `kind`.
    pub fn add(&mut self, kind: ResourceKind, amount: u32) {
        let slot = &mut self.amounts[kind.index()];
        *slot = slot.saturating_add(amount);
    }

    /// Overwrite a counter. Used when restoring a snapshot.
    pub fn set(&mut self, kind: ResourceKind, amount: u32) {
        self.amounts[kind.index()] = amount;
    }

    /// Check whether `amount` of `kind` is available.
    #[must_use]
    pub const fn can_afford(&self, kind: ResourceKind, amount: u32) -> bool {
        self.amounts[kind.index()] >= amount
    }

    /// Spend resources if available.
    ///
    /// Returns true if the transaction succeeded. On failure nothing changes.
    pub fn spend(&mut self, kind: ResourceKind, amount: u32) -> bool {
        if self.can_afford(kind, amount) {
            self.amounts[kind.index()] -= amount;
            true
        } else {
            false
        }
    }

    /// Check a multi-resource cost.
    #[must_use]
    pub fn can_afford_all(&self, costs: &[ResourceAmount]) -> bool {
        let mut needed = [0u64; 6];
        for cost in costs {
            needed[cost.kind.index()] += u64::from(cost.amount);
        }
        needed
            .iter()
            .zip(self.amounts.iter())
            .all(|(need, have)| *need <= u64::from(*have))
    }

    /// Spend a multi-resource cost. All-or-nothing.
    pub fn spend_all(&mut self, costs: &[ResourceAmount]) -> bool {
        if !self.can_afford_all(costs) {
            return false;
        }
        for cost in costs {
            self.amounts[cost.kind.index()] -= cost.amount;
        }
        true
    }

    /// Credit every amount in `gains`.
    pub fn credit_all(&mut self, gains: &[ResourceAmount]) {
        for gain in gains {
            self.add(gain.kind, gain.amount);
        }
    }

    /// King's Points balance.
    #[must_use]
    pub const fn kings_points(&self) -> u32 {
        self.amount(ResourceKind::KingsPoints)
    }

    /// Credit King's Points.
    pub fn add_kings_points(&mut self, amount: u32) {
        self.add(ResourceKind::KingsPoints, amount);
    }

    /// Spend King's Points if available.
    pub fn spend_kings_points(&mut self, amount: u32) -> bool {
        self.spend(ResourceKind::KingsPoints, amount)
    }

    /// Iterate `(kind, amount)` pairs in storage order.
    pub fn iter(&self) -> impl Iterator<Item = (ResourceKind, u32)> + '_ {
        ResourceKind::ALL
            .iter()
            .map(move |kind| (*kind, self.amount(*kind)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spend_success() {
        let mut pool = ResourcePool::new().with(ResourceKind::Gold, 100);
        assert!(pool.spend(ResourceKind::Gold, 30));
        assert_eq!(pool.amount(ResourceKind::Gold), 70);
    }

    #[test]
    fn test_spend_insufficient_leaves_pool_untouched() {
        let mut pool = ResourcePool::new().with(ResourceKind::Wood, 10);
        assert!(!pool.spend(ResourceKind::Wood, 11));
        assert_eq!(pool.amount(ResourceKind::Wood), 10);
    }

    #[test]
    fn test_spend_all_is_atomic() {
        let mut pool = ResourcePool::new()
            .with(ResourceKind::Gold, 50)
            .with(ResourceKind::Iron, 2);

        let costs = [
            ResourceAmount::new(ResourceKind::Gold, 20),
            ResourceAmount::new(ResourceKind::Iron, 5),
        ];
        assert!(!pool.spend_all(&costs));
        // Gold must not be partially deducted
        assert_eq!(pool.amount(ResourceKind::Gold), 50);

        pool.add(ResourceKind::Iron, 3);
        assert!(pool.spend_all(&costs));
        assert_eq!(pool.amount(ResourceKind::Gold), 30);
        assert_eq!(pool.amount(ResourceKind::Iron), 0);
    }

    #[test]
    fn test_spend_all_sums_repeated_kinds() {
        let mut pool = ResourcePool::new().with(ResourceKind::Gold, 15);
        let costs = [
            ResourceAmount::new(ResourceKind::Gold, 10),
            ResourceAmount::new(ResourceKind::Gold, 10),
        ];
        assert!(!pool.spend_all(&costs));
        assert_eq!(pool.amount(ResourceKind::Gold), 15);
    }

    #[test]
    fn test_kings_points_helpers() {
        let mut pool = ResourcePool::new();
        pool.add_kings_points(25);
        assert!(!pool.spend_kings_points(30));
        assert!(pool.spend_kings_points(20));
        assert_eq!(pool.kings_points(), 5);
    }

    #[test]
    fn test_add_saturates() {
        let mut pool = ResourcePool::new().with(ResourceKind::Food, u32::MAX - 1);
        pool.add(ResourceKind::Food, 10);
        assert_eq!(pool.amount(ResourceKind::Food), u32::MAX);
    }
}
