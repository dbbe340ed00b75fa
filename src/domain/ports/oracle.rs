//! Oracle port.
//!
//! Abstracts the external text-generation service that fuels matches:
//! one generation call per contestant, one judgment call per match.
//! The core must tolerate failure of either without crashing.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Which corner of a match the judge picked. Never a tie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Corner {
    A,
    B,
}

/// A parsed judgment: exactly one winner plus a short rationale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    /// The winning corner
    pub winner: Corner,

    /// One-line judge rationale
    pub reason: String,
}

/// Request for one contestant's generated text.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Full persona context for the speaking contestant
    pub persona_context: String,

    /// Short descriptor of the opponent (name and trait)
    pub opponent: String,

    /// Contest-type label for this match
    pub battle_kind: String,

    /// Per-match seed, shared by both sides of the match
    pub seed: u64,
}

/// Request for a judgment over both contestants' outputs.
#[derive(Debug, Clone)]
pub struct JudgmentRequest {
    /// Contest-type label for this match
    pub battle_kind: String,

    /// Display name of contestant A
    pub label_a: String,

    /// Display name of contestant B
    pub label_b: String,

    /// Raw generated text for contestant A
    pub output_a: String,

    /// Raw generated text for contestant B
    pub output_b: String,
}

/// Error types for oracle operations
#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    #[error("oracle unavailable: {0}")]
    Unavailable(String),

    #[error("oracle call failed: {0}")]
    Failed(String),

    #[error("oracle timed out after {0}s")]
    Timeout(u64),

    #[error("malformed verdict: {0}")]
    MalformedVerdict(String),
}

/// Port trait for the external text-generation oracle.
///
/// Implementations must be `Send + Sync`; matches call them concurrently
/// from many tokio tasks.
#[async_trait]
pub trait Oracle: Send + Sync {
    /// Generate a contestant's text for one side of a match.
    async fn generate(&self, request: GenerationRequest) -> Result<String, OracleError>;

    /// Judge both outputs and return exactly one winner.
    async fn judge(&self, request: JudgmentRequest) -> Result<Verdict, OracleError>;
}
