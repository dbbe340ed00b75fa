use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Record of one resolved contest. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleRecord {
    /// Unique record identifier
    pub id: Uuid,

    /// When the outcome was applied
    pub timestamp: DateTime<Utc>,

    /// Contest-type label drawn from the configured catalog
    pub kind: String,

    /// First participant
    pub soul_a: Uuid,

    /// Second participant
    pub soul_b: Uuid,

    /// The surviving participant
    pub winner: Uuid,

    /// The eliminated participant
    pub loser: Uuid,

    /// Short judge rationale (or the fixed fallback line)
    pub verdict: String,

    /// Raw generated text for participant A
    pub output_a: String,

    /// Raw generated text for participant B
    pub output_b: String,

    /// Sequential elimination number this outcome claimed
    pub kill_number: u64,
}
