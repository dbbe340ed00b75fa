use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::battle::BattleRecord;
use super::collective::CollectiveState;
use super::soul::Soul;

/// The full persisted unit: every soul ever spawned, the collective
/// counters, and the historical outcome list.
///
/// Round-trips losslessly through `serde_json`; every field defaults so
/// older snapshots load forward-compatibly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArenaSnapshot {
    /// All souls keyed by id, dead ones included
    #[serde(default)]
    pub souls: HashMap<Uuid, Soul>,

    /// Cumulative tournament state
    #[serde(default)]
    pub collective: CollectiveState,

    /// Historical outcome list, oldest first
    #[serde(default)]
    pub battles: Vec<BattleRecord>,
}

impl ArenaSnapshot {
    /// Seed a fresh snapshot from an initial population.
    pub fn seeded(souls: Vec<Soul>) -> Self {
        Self {
            souls: souls.into_iter().map(|s| (s.id, s)).collect(),
            collective: CollectiveState::default(),
            battles: Vec::new(),
        }
    }

    /// Clone out the currently alive souls.
    pub fn alive_souls(&self) -> Vec<Soul> {
        self.souls.values().filter(|s| s.alive).cloned().collect()
    }

    /// Number of souls still in the tournament.
    pub fn alive_count(&self) -> usize {
        self.souls.values().filter(|s| s.alive).count()
    }
}
