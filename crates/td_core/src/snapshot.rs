//! Persistence snapshot.
//!
//! Only source-of-truth values are stored: resource balances, every
//! progression purchase in the order it happened, and the position of the
//! free letter sequence. Derived state (letter pools, tower modifiers) is
//! rebuilt on restore by replaying the purchases.

use serde::{Deserialize, Serialize};

use crate::economy::ResourcePool;
use crate::error::{GameError, Result};
use crate::queue::ProducerId;

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 2;

/// One progression purchase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProgressionStep {
    /// A tech or skill node, paid or sequential.
    Tech(String),
    /// The next letter stage of one producer.
    ProducerStage(ProducerId),
}

/// Saved progression state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Format version.
    pub version: u32,
    /// Resource balances.
    pub resources: ResourcePool,
    /// Tech unlocks and producer letter stages, interleaved as they happened.
    pub progression: Vec<ProgressionStep>,
    /// Cursor of the free letter sequence.
    pub sequence_stage: usize,
}

impl Snapshot {
    /// Tech ids in unlock order.
    pub fn unlocked_tech(&self) -> impl Iterator<Item = &str> {
        self.progression.iter().filter_map(|step| match step {
            ProgressionStep::Tech(id) => Some(id.as_str()),
            ProgressionStep::ProducerStage(_) => None,
        })
    }

    /// Encode with bincode.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        bincode::serialize(self)
            .map_err(|e| GameError::InvalidState(format!("Failed to serialize snapshot: {e}")))
    }

    /// Decode with bincode, rejecting unknown versions.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let snapshot: Self = bincode::deserialize(data)
            .map_err(|e| GameError::InvalidState(format!("Failed to deserialize snapshot: {e}")))?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(GameError::InvalidState(format!(
                "Unsupported snapshot version {}",
                snapshot.version
            )));
        }
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::economy::ResourceKind;

    fn sample() -> Snapshot {
        Snapshot {
            version: SNAPSHOT_VERSION,
            resources: ResourcePool::new()
                .with(ResourceKind::Gold, 12)
                .with(ResourceKind::KingsPoints, 3),
            progression: vec![
                ProgressionStep::Tech("letters_fj".to_string()),
                ProgressionStep::ProducerStage(ProducerId(0)),
                ProgressionStep::Tech("letters_dk".to_string()),
            ],
            sequence_stage: 1,
        }
    }

    #[test]
    fn test_bytes_round_trip() {
        let snapshot = sample();
        let bytes = snapshot.to_bytes().expect("serializable");
        assert_eq!(Snapshot::from_bytes(&bytes).expect("decodable"), snapshot);
    }

    #[test]
    fn test_unlocked_tech_skips_producer_stages() {
        let snapshot = sample();
        let tech: Vec<_> = snapshot.unlocked_tech().collect();
        assert_eq!(tech, vec!["letters_fj", "letters_dk"]);
    }

    #[test]
    fn test_wrong_version_rejected() {
        let snapshot = Snapshot {
            version: 99,
            ..sample()
        };
        let bytes = snapshot.to_bytes().expect("serializable");
        assert!(Snapshot::from_bytes(&bytes).is_err());
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(Snapshot::from_bytes(&[1, 2, 3]).is_err());
    }
}
