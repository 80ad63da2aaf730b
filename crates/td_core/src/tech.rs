//! Tech and skill unlock graph.
//!
//! Nodes form a prerequisite DAG that is validated once at construction:
//! every prerequisite must exist and the graph must be acyclic. Two unlock
//! paths share the graph:
//!
//! - [`TechGraph::unlock`] is paid and prerequisite-checked
//! - [`TechGraph::unlock_next_in_sequence`] is free and walks only the
//!   `Letters` nodes, in topological order, with a monotonic cursor

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::economy::ResourcePool;
use crate::error::{GameError, Result};
use crate::math::{fixed_serde, Fixed};
use crate::modifiers::{TowerModifiers, UnitModifiers};
use crate::typing_stats::TypingStats;

/// Grouping used by menus and by letter-stage derivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TechCategory {
    /// Grants new letters.
    Letters,
    /// Tower damage and fire rate.
    Offense,
    /// Tower range, ammo and unit toughness.
    Defense,
    /// Typing-skill gated bonuses.
    Typing,
    /// Automated helpers.
    Automation,
    /// Everything else.
    Utility,
}

/// Minimum typing performance to unlock a skill node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypingRequirement {
    /// Session words per minute.
    #[serde(with = "fixed_serde")]
    pub min_wpm: Fixed,
    /// Keystroke accuracy in `[0, 1]`.
    #[serde(with = "fixed_serde")]
    pub min_accuracy: Fixed,
}

impl TypingRequirement {
    /// Whether `stats` meet this requirement.
    #[must_use]
    pub fn is_met(&self, stats: &TypingStats) -> bool {
        stats.wpm() >= self.min_wpm && stats.accuracy() >= self.min_accuracy
    }
}

/// What unlocking a node grants.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TechEffects {
    /// Letters added to every producer's pool.
    pub letters: Vec<char>,
    /// Tower stat changes.
    pub tower: TowerModifiers,
    /// Bonuses for newly trained units.
    pub unit: UnitModifiers,
}

/// One unlockable node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TechNode {
    /// Unique id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Menu grouping.
    pub category: TechCategory,
    /// King's-Point cost for the paid path.
    pub cost: u32,
    /// Ids that must be unlocked first.
    pub prereqs: Vec<String>,
    /// Granted effects.
    pub effects: TechEffects,
    /// Skill nodes additionally gate on typing performance.
    pub requirement: Option<TypingRequirement>,
}

impl TechNode {
    /// Create a node with no prerequisites or effects.
    #[must_use]
    pub fn new(id: impl Into<String>, category: TechCategory, cost: u32) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            category,
            cost,
            prereqs: Vec::new(),
            effects: TechEffects::default(),
            requirement: None,
        }
    }

    /// Builder: set the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Builder: add a prerequisite.
    #[must_use]
    pub fn with_prereq(mut self, prereq: impl Into<String>) -> Self {
        self.prereqs.push(prereq.into());
        self
    }

    /// Builder: set granted letters.
    #[must_use]
    pub fn with_letters(mut self, letters: &[char]) -> Self {
        self.effects.letters = letters.to_vec();
        self
    }

    /// Builder: set tower modifiers.
    #[must_use]
    pub fn with_tower_modifiers(mut self, modifiers: TowerModifiers) -> Self {
        self.effects.tower = modifiers;
        self
    }

    /// Builder: set unit modifiers.
    #[must_use]
    pub fn with_unit_modifiers(mut self, modifiers: UnitModifiers) -> Self {
        self.effects.unit = modifiers;
        self
    }

    /// Builder: gate on typing performance.
    #[must_use]
    pub fn with_requirement(mut self, requirement: TypingRequirement) -> Self {
        self.requirement = Some(requirement);
        self
    }
}

/// Validated prerequisite graph with unlock state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TechGraph {
    nodes: BTreeMap<String, TechNode>,
    order: Vec<String>,
    unlocked: BTreeSet<String>,
    unlock_log: Vec<String>,
    sequence: Vec<String>,
    cursor: usize,
}

impl TechGraph {
    /// Validate `nodes` and compute the topological unlock order.
    pub fn new(nodes: Vec<TechNode>) -> Result<Self> {
        let mut map = BTreeMap::new();
        for node in nodes {
            if map.contains_key(&node.id) {
                return Err(GameError::DuplicateNode(node.id));
            }
            map.insert(node.id.clone(), node);
        }

        for node in map.values() {
            for prereq in &node.prereqs {
                if !map.contains_key(prereq) {
                    return Err(GameError::MissingPrerequisite {
                        node: node.id.clone(),
                        prereq: prereq.clone(),
                    });
                }
            }
        }

        let mut visited = BTreeSet::new();
        let mut stack = BTreeSet::new();
        let mut order = Vec::with_capacity(map.len());
        for id in map.keys() {
            visit(&map, id, &mut visited, &mut stack, &mut order)?;
        }

        let sequence = order
            .iter()
            .filter(|id| {
                map.get(*id).is_some_and(|node| {
                    node.category == TechCategory::Letters && node.requirement.is_none()
                })
            })
            .cloned()
            .collect();

        Ok(Self {
            nodes: map,
            order,
            unlocked: BTreeSet::new(),
            unlock_log: Vec::new(),
            sequence,
            cursor: 0,
        })
    }

    /// Look up a node.
    #[must_use]
    pub fn node(&self, id: &str) -> Option<&TechNode> {
        self.nodes.get(id)
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True for an empty graph.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Every node after all of its prerequisites.
    #[must_use]
    pub fn unlock_order(&self) -> &[String] {
        &self.order
    }

    /// Direct prerequisites of `id`.
    #[must_use]
    pub fn prerequisites(&self, id: &str) -> Option<&[String]> {
        self.nodes.get(id).map(|node| node.prereqs.as_slice())
    }

    /// Nodes of one category, in unlock order.
    #[must_use]
    pub fn nodes_by_category(&self, category: TechCategory) -> Vec<&TechNode> {
        self.ordered_nodes()
            .filter(|node| node.category == category)
            .collect()
    }

    fn ordered_nodes(&self) -> impl Iterator<Item = &TechNode> {
        self.order.iter().filter_map(|id| self.nodes.get(id))
    }

    /// Whether `id` has been unlocked.
    #[must_use]
    pub fn is_unlocked(&self, id: &str) -> bool {
        self.unlocked.contains(id)
    }

    /// Unlocked ids in the order they were unlocked.
    #[must_use]
    pub fn unlocked_ids(&self) -> &[String] {
        &self.unlock_log
    }

    fn prereqs_met(&self, node: &TechNode) -> bool {
        node.prereqs.iter().all(|p| self.unlocked.contains(p))
    }

    fn purchasable(&self, id: &str, pool: &ResourcePool) -> Option<&TechNode> {
        let node = self.nodes.get(id)?;
        if self.unlocked.contains(id) || !self.prereqs_met(node) {
            return None;
        }
        (pool.kings_points() >= node.cost).then_some(node)
    }

    /// True if `id` exists, is still locked, has every prerequisite unlocked,
    /// and `pool` covers its cost. Skill nodes with a typing requirement
    /// need [`TechGraph::can_unlock_with_stats`].
    #[must_use]
    pub fn can_unlock(&self, id: &str, pool: &ResourcePool) -> bool {
        self.purchasable(id, pool)
            .is_some_and(|node| node.requirement.is_none())
    }

    /// [`TechGraph::can_unlock`] plus the node's typing requirement.
    #[must_use]
    pub fn can_unlock_with_stats(&self, id: &str, pool: &ResourcePool, stats: &TypingStats) -> bool {
        self.purchasable(id, pool)
            .is_some_and(|node| node.requirement.map_or(true, |req| req.is_met(stats)))
    }

    /// Pay for and unlock `id`. Nothing changes on failure.
    pub fn unlock(&mut self, id: &str, pool: &mut ResourcePool) -> bool {
        if !self.can_unlock(id, pool) {
            return false;
        }
        self.pay_and_mark(id, pool)
    }

    /// Pay for and unlock a skill node that may carry a typing requirement.
    pub fn unlock_with_stats(&mut self, id: &str, pool: &mut ResourcePool, stats: &TypingStats) -> bool {
        if !self.can_unlock_with_stats(id, pool, stats) {
            return false;
        }
        self.pay_and_mark(id, pool)
    }

    fn pay_and_mark(&mut self, id: &str, pool: &mut ResourcePool) -> bool {
        let Some(cost) = self.nodes.get(id).map(|node| node.cost) else {
            return false;
        };
        if !pool.spend_kings_points(cost) {
            return false;
        }
        self.mark_unlocked(id);
        info!(node = id, cost, "Tech unlocked");
        true
    }

    fn mark_unlocked(&mut self, id: &str) {
        if self.unlocked.insert(id.to_string()) {
            self.unlock_log.push(id.to_string());
        }
    }

    /// Free, ordered unlock of the next locked `Letters` node.
    ///
    /// Paid categories and typing-gated nodes are never handed out here.
    /// The cursor only moves forward; nodes unlocked through the paid path
    /// are skipped. A node whose prerequisites are still locked holds the
    /// cursor in place. Returns `None` once the sequence is exhausted.
    pub fn unlock_next_in_sequence(&mut self) -> Option<&TechNode> {
        while let Some(id) = self.sequence.get(self.cursor).cloned() {
            if self.unlocked.contains(&id) {
                self.cursor += 1;
                continue;
            }
            let node = self.nodes.get(&id)?;
            if !self.prereqs_met(node) {
                debug!(node = %id, "Sequential unlock waiting on prerequisites");
                return None;
            }
            self.cursor += 1;
            self.mark_unlocked(&id);
            info!(node = %id, stage = self.cursor, "Sequential unlock");
            return self.nodes.get(&id);
        }
        None
    }

    /// Ids handed out by [`TechGraph::unlock_next_in_sequence`], in order.
    #[must_use]
    pub fn sequence(&self) -> &[String] {
        &self.sequence
    }

    /// Position of the sequential cursor.
    #[must_use]
    pub const fn sequence_stage(&self) -> usize {
        self.cursor
    }

    /// Move the sequential cursor to a saved position, clamped to the
    /// sequence length. Nothing is unlocked.
    pub fn restore_sequence_stage(&mut self, stage: usize) {
        self.cursor = stage.min(self.sequence.len());
    }

    /// Nodes that could be bought right now.
    #[must_use]
    pub fn available(&self, pool: &ResourcePool) -> Vec<&TechNode> {
        self.ordered_nodes()
            .filter(|node| self.can_unlock(&node.id, pool))
            .collect()
    }

    /// Replay unlocks without cost, in the given order.
    ///
    /// Unknown or already-unlocked ids are skipped. Returns the ids that were
    /// applied so the caller can re-derive their effects.
    pub fn restore_unlocked(&mut self, ids: &[String]) -> Vec<String> {
        let mut applied = Vec::new();
        for id in ids {
            if self.nodes.contains_key(id) && !self.unlocked.contains(id) {
                self.mark_unlocked(id);
                applied.push(id.clone());
            }
        }
        debug!(count = applied.len(), "Tech unlocks restored");
        applied
    }
}

fn visit(
    nodes: &BTreeMap<String, TechNode>,
    id: &str,
    visited: &mut BTreeSet<String>,
    stack: &mut BTreeSet<String>,
    order: &mut Vec<String>,
) -> Result<()> {
    if stack.contains(id) {
        return Err(GameError::CycleDetected {
            node: id.to_string(),
        });
    }
    if visited.contains(id) {
        return Ok(());
    }
    stack.insert(id.to_string());
    if let Some(node) = nodes.get(id) {
        for prereq in &node.prereqs {
            visit(nodes, prereq, visited, stack, order)?;
        }
    }
    stack.remove(id);
    visited.insert(id.to_string());
    order.push(id.to_string());
    Ok(())
}

/// One purchasable batch of letters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LetterStage {
    /// Letters granted.
    pub letters: Vec<char>,
    /// King's-Point cost.
    pub cost: u32,
}

/// Ordered letter progression. Stage 0 holds the free starting letters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LetterStages {
    stages: Vec<LetterStage>,
}

impl Default for LetterStages {
    /// Home-row outward keyboard progression.
    fn default() -> Self {
        const TABLE: [(&str, u32); 13] = [
            ("fj", 0),
            ("dk", 20),
            ("sl", 40),
            ("a", 60),
            ("gh", 90),
            ("qp", 120),
            ("ei", 150),
            ("ru", 180),
            ("ty", 210),
            ("wo", 240),
            ("cm", 270),
            ("vn", 310),
            ("xz", 350),
        ];
        Self::new(
            TABLE
                .iter()
                .map(|(letters, cost)| LetterStage {
                    letters: letters.chars().collect(),
                    cost: *cost,
                })
                .collect(),
        )
    }
}

impl LetterStages {
    /// Build from an explicit table.
    #[must_use]
    pub fn new(stages: Vec<LetterStage>) -> Self {
        Self { stages }
    }

    /// Derive stages from the graph's `Letters` nodes, in unlock order.
    #[must_use]
    pub fn from_graph(graph: &TechGraph) -> Self {
        Self::new(
            graph
                .nodes_by_category(TechCategory::Letters)
                .into_iter()
                .map(|node| LetterStage {
                    letters: node.effects.letters.clone(),
                    cost: node.cost,
                })
                .collect(),
        )
    }

    /// Stage at `index`.
    #[must_use]
    pub fn stage(&self, index: usize) -> Option<&LetterStage> {
        self.stages.get(index)
    }

    /// Number of stages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// True when there are no stages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Letters of stage 0.
    #[must_use]
    pub fn starting_letters(&self) -> &[char] {
        self.stages
            .first()
            .map_or(&[][..], |stage| stage.letters.as_slice())
    }
}
