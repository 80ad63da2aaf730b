//! Top-level simulation configuration.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::producer_data::{PayoffData, ProducerData};
use super::tech_data::{TechNodeData, TowerModifierData};
use super::tower_data::{TowerData, TowerStatsData};
use super::unit_data::UnitData;
use crate::economy::ResourceKind;
use crate::error::{GameError, Result};
use crate::producer::{Payoff, ProducerConfig, ProducerKind};
use crate::queue::DEFAULT_BACKLOG_THRESHOLD;
use crate::tech::{LetterStage, LetterStages, TechCategory, TechGraph};
use crate::tower::TowerKind;

/// One purchasable batch of letters, as written in data files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LetterStageData {
    /// Letters granted.
    pub letters: String,
    /// King's-Point cost.
    pub cost: u32,
}

/// Everything needed to build a [`crate::simulation::Simulation`].
///
/// All values are integers so files stay human-editable; conversion to
/// fixed-point happens when the simulation is built.
///
/// # Example RON
///
/// ```ron
/// SimConfig(
///     seed: 42,
///     units: [UnitData(id: "footman", health: 10, melee_damage: 1, speed: 50)],
///     producers: [ProducerData(kind: Farmer, interval_ms: 7000, letters: "fj",
///         word_len_min: 4, word_len_max: 6, payoff: Resources([(Gold, 1), (Food, 1)]))],
/// )
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimConfig {
    /// RNG seed for word and reload letter generation.
    #[serde(default)]
    pub seed: u64,
    /// Queue length tolerated before the base takes damage.
    #[serde(default = "default_backlog_threshold")]
    pub backlog_threshold: usize,
    /// Starting base health.
    #[serde(default = "default_base_health")]
    pub base_health: u32,
    /// Base x. Enemies reaching it strike the base.
    #[serde(default)]
    pub base_x: i32,
    /// Base y.
    #[serde(default)]
    pub base_y: i32,
    /// Opening balances.
    #[serde(default)]
    pub starting_resources: Vec<(ResourceKind, u32)>,
    /// Gold per enemy killed, scaled by the typing score multiplier.
    #[serde(default = "default_kill_reward_gold")]
    pub kill_reward_gold: u32,
    /// King's Points per enemy killed.
    #[serde(default = "default_kill_reward_kings_points")]
    pub kill_reward_kings_points: u32,
    /// Unit templates.
    #[serde(default)]
    pub units: Vec<UnitData>,
    /// Production buildings.
    #[serde(default)]
    pub producers: Vec<ProducerData>,
    /// Base tower stats.
    #[serde(default)]
    pub tower_stats: TowerStatsData,
    /// Placed towers.
    #[serde(default)]
    pub towers: Vec<TowerData>,
    /// Tech and skill nodes.
    #[serde(default)]
    pub tech: Vec<TechNodeData>,
    /// Explicit letter progression. When empty, derived from `Letters`
    /// tech nodes, falling back to the built-in keyboard progression.
    #[serde(default)]
    pub letter_stages: Vec<LetterStageData>,
}

/// Largest value accepted for any stat, timing or reward in a data file.
pub const MAX_CONFIG_VALUE: u32 = 1_000_000;

fn check_bound(field: &str, value: u32) -> Result<()> {
    if value > MAX_CONFIG_VALUE {
        return Err(GameError::InvalidConfig(format!(
            "{field} = {value} exceeds {MAX_CONFIG_VALUE}"
        )));
    }
    Ok(())
}

const fn default_backlog_threshold() -> usize {
    DEFAULT_BACKLOG_THRESHOLD
}

const fn default_base_health() -> u32 {
    crate::base::BASE_STARTING_HEALTH
}

const fn default_kill_reward_gold() -> u32 {
    1
}

const fn default_kill_reward_kings_points() -> u32 {
    5
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            backlog_threshold: DEFAULT_BACKLOG_THRESHOLD,
            base_health: default_base_health(),
            base_x: 0,
            base_y: 200,
            starting_resources: Vec::new(),
            kill_reward_gold: default_kill_reward_gold(),
            kill_reward_kings_points: default_kill_reward_kings_points(),
            units: vec![UnitData::footman(), UnitData::orc_grunt()],
            producers: vec![
                ProducerData::for_kind(ProducerKind::Farmer),
                ProducerData::for_kind(ProducerKind::Lumberjack),
                ProducerData::for_kind(ProducerKind::Miner),
                ProducerData {
                    spawn_x: 40,
                    spawn_y: 200,
                    ..ProducerData::for_kind(ProducerKind::Barracks)
                },
            ],
            tower_stats: TowerStatsData::default(),
            towers: vec![TowerData {
                kind: TowerKind::Basic,
                level: 1,
                x: 60,
                y: 160,
            }],
            tech: default_tech_tree(),
            letter_stages: Vec::new(),
        }
    }
}

/// Keyboard letter progression plus a few tower upgrades.
fn default_tech_tree() -> Vec<TechNodeData> {
    const LETTERS: [(&str, u32); 13] = [
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

    let mut nodes = Vec::with_capacity(LETTERS.len() + 3);
    let mut previous: Option<String> = None;
    for (letters, cost) in LETTERS {
        let id = format!("letters_{letters}");
        nodes.push(TechNodeData::letters(&id, letters, cost, previous.as_deref()));
        previous = Some(id);
    }

    nodes.push(TechNodeData {
        id: "sharpened_bolts".to_string(),
        name: "Sharpened Bolts".to_string(),
        category: TechCategory::Offense,
        cost: 40,
        prereqs: vec!["letters_dk".to_string()],
        letters: String::new(),
        tower: Some(TowerModifierData {
            damage_percent: 100,
            ..TowerModifierData::default()
        }),
        unit: None,
        requirement: None,
    });
    nodes.push(TechNodeData {
        id: "extended_magazine".to_string(),
        name: "Extended Magazine".to_string(),
        category: TechCategory::Defense,
        cost: 60,
        prereqs: vec!["letters_sl".to_string()],
        letters: String::new(),
        tower: Some(TowerModifierData {
            ammo_add: 2,
            ..TowerModifierData::default()
        }),
        unit: None,
        requirement: None,
    });
    nodes.push(TechNodeData {
        id: "rapid_reload".to_string(),
        name: "Rapid Reload".to_string(),
        category: TechCategory::Typing,
        cost: 80,
        prereqs: vec!["sharpened_bolts".to_string()],
        letters: String::new(),
        tower: Some(TowerModifierData {
            fire_rate_percent: -20,
            ..TowerModifierData::default()
        }),
        unit: None,
        requirement: Some(super::tech_data::TypingRequirementData {
            min_wpm: 30,
            min_accuracy_percent: 90,
        }),
    });
    nodes
}

impl SimConfig {
    /// Parse RON text. `source` labels errors (usually the file path).
    pub fn from_ron(source: &str, text: &str) -> Result<Self> {
        ron::from_str(text).map_err(|e| GameError::DataParseError {
            path: source.to_string(),
            message: e.to_string(),
        })
    }

    /// Serialize to pretty RON.
    pub fn to_ron(&self) -> Result<String> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| GameError::InvalidState(format!("Failed to serialize config: {e}")))
    }

    /// Look up a unit template.
    #[must_use]
    pub fn unit(&self, id: &str) -> Option<&UnitData> {
        self.units.iter().find(|unit| unit.id == id)
    }

    /// Runtime configuration for one producer.
    pub fn producer_config(&self, data: &ProducerData) -> Result<ProducerConfig> {
        let payoff = match &data.payoff {
            PayoffData::Resources(_) => {
                Payoff::Resources(data.payoff.resource_amounts().unwrap_or_default())
            }
            PayoffData::TrainUnit(unit_id) => {
                let unit = self.unit(unit_id).ok_or_else(|| {
                    GameError::InvalidConfig(format!(
                        "{} trains unknown unit '{unit_id}'",
                        data.kind.name()
                    ))
                })?;
                Payoff::TrainUnit(unit.to_stats())
            }
        };
        let config = ProducerConfig {
            kind: data.kind,
            interval: data.interval(),
            letter_pool: data.letters.chars().collect(),
            word_len_min: data.word_len_min,
            word_len_max: data.word_len_max,
            payoff,
            spawn_point: data.spawn_point(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Build and validate the tech graph.
    pub fn tech_graph(&self) -> Result<TechGraph> {
        TechGraph::new(self.tech.iter().map(TechNodeData::to_node).collect())
    }

    /// Letter progression: explicit table, else derived from the graph,
    /// else the built-in default.
    #[must_use]
    pub fn letter_stages(&self, graph: &TechGraph) -> LetterStages {
        if !self.letter_stages.is_empty() {
            return LetterStages::new(
                self.letter_stages
                    .iter()
                    .map(|stage| LetterStage {
                        letters: stage.letters.chars().collect(),
                        cost: stage.cost,
                    })
                    .collect(),
            );
        }
        let derived = LetterStages::from_graph(graph);
        if derived.is_empty() {
            LetterStages::default()
        } else {
            derived
        }
    }

    /// Check every configuration error that would prevent startup.
    pub fn validate(&self) -> Result<()> {
        self.check_bounds()?;
        let mut unit_ids = BTreeSet::new();
        for unit in &self.units {
            if !unit_ids.insert(unit.id.as_str()) {
                return Err(GameError::InvalidConfig(format!(
                    "duplicate unit id '{}'",
                    unit.id
                )));
            }
        }
        for producer in &self.producers {
            self.producer_config(producer)?;
        }
        self.tower_stats.to_config().validate()?;
        self.tech_graph()?;
        Ok(())
    }

    fn check_bounds(&self) -> Result<()> {
        check_bound("base_health", self.base_health)?;
        check_bound("kill_reward_gold", self.kill_reward_gold)?;
        check_bound("kill_reward_kings_points", self.kill_reward_kings_points)?;
        for unit in &self.units {
            check_bound("unit health", unit.health)?;
            check_bound("unit melee_damage", unit.melee_damage)?;
            check_bound("unit speed", unit.speed)?;
            check_bound("unit width", unit.width)?;
            check_bound("unit height", unit.height)?;
        }
        for producer in &self.producers {
            check_bound("producer interval_ms", producer.interval_ms)?;
        }
        let stats = &self.tower_stats;
        check_bound("tower damage", stats.damage)?;
        check_bound("tower range", stats.range)?;
        check_bound("tower damage_bonus", stats.damage_bonus)?;
        check_bound("tower projectiles", stats.projectiles)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        SimConfig::default().validate().expect("default config valid");
    }

    #[test]
    fn test_default_stages_match_builtin() {
        let config = SimConfig::default();
        let graph = config.tech_graph().expect("valid graph");
        assert_eq!(config.letter_stages(&graph), LetterStages::default());
    }

    #[test]
    fn test_round_trip_ron() {
        let config = SimConfig::default();
        let text = config.to_ron().expect("serializable");
        let parsed = SimConfig::from_ron("inline", &text).expect("parsable");
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_minimal_ron_uses_defaults() {
        let config = SimConfig::from_ron("inline", "SimConfig(seed: 7)").expect("parsable");
        assert_eq!(config.seed, 7);
        assert_eq!(config.backlog_threshold, 5);
        assert_eq!(config.base_health, 10);
        assert!(config.producers.is_empty());
        config.validate().expect("empty config is valid");
    }

    #[test]
    fn test_parse_error_names_source() {
        let err = SimConfig::from_ron("broken.ron", "SimConfig(seed: )").unwrap_err();
        assert!(matches!(err, GameError::DataParseError { ref path, .. } if path == "broken.ron"));
    }

    #[test]
    fn test_empty_letter_pool_rejected() {
        let mut config = SimConfig::default();
        config.producers[0].letters.clear();
        assert!(matches!(config.validate(), Err(GameError::EmptyLetterPool(_))));
    }

    #[test]
    fn test_unknown_unit_rejected() {
        let mut config = SimConfig::default();
        config.units.retain(|u| u.id != "footman");
        assert!(matches!(config.validate(), Err(GameError::InvalidConfig(_))));
    }

    #[test]
    fn test_tech_cycle_rejected() {
        let mut config = SimConfig::default();
        config.tech[0].prereqs.push("letters_xz".to_string());
        assert!(matches!(config.validate(), Err(GameError::CycleDetected { .. })));
    }

    #[test]
    fn test_out_of_range_values_rejected() {
        let mut config = SimConfig::default();
        config.kill_reward_gold = u32::MAX;
        assert!(matches!(config.validate(), Err(GameError::InvalidConfig(_))));

        let mut config = SimConfig::default();
        config.tower_stats.range = MAX_CONFIG_VALUE + 1;
        assert!(matches!(config.validate(), Err(GameError::InvalidConfig(_))));

        let mut config = SimConfig::default();
        config.units[0].speed = u32::MAX;
        assert!(matches!(config.validate(), Err(GameError::InvalidConfig(_))));

        let mut config = SimConfig::default();
        config.tower_stats.damage = MAX_CONFIG_VALUE;
        config.validate().expect("bound is inclusive");
    }

    #[test]
    fn test_zero_tower_capacity_rejected() {
        let mut config = SimConfig::default();
        config.tower_stats.ammo_capacity = 0;
        assert!(config.validate().is_err());
    }
}
