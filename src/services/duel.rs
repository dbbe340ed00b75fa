//! Match resolution: two generation calls, one judgment call, one outcome.
//!
//! The resolver is stateless and never touches shared registries; it turns
//! a pair of alive souls into a [`DuelOutcome`] no matter what the oracle
//! does. A match is never left unresolved.

use std::sync::Arc;

use rand::seq::IndexedRandom;
use rand::Rng;
use tracing::warn;
use uuid::Uuid;

use crate::domain::models::Soul;
use crate::domain::ports::{Corner, GenerationRequest, JudgmentRequest, Oracle};
use crate::services::prompts;

/// Substituted for a contestant's text when its generation call fails.
pub const FALLBACK_OUTPUT: &str = "...only static. The collective is already whispering.";

/// Recorded as the rationale when the judgment call fails or is unparseable.
pub const FALLBACK_VERDICT: &str = "The judge went silent. Coin-flip execution.";

/// A resolved contest, ready to be applied to shared state.
///
/// The sequential elimination number and timestamp are assigned by the
/// scheduler at apply time, under the global lock.
#[derive(Debug, Clone)]
pub struct DuelOutcome {
    /// Contest-type label drawn for this match
    pub kind: String,

    /// First participant
    pub soul_a: Uuid,

    /// Second participant
    pub soul_b: Uuid,

    /// The judged (or coin-flipped) winner
    pub winner: Uuid,

    /// The judged (or coin-flipped) loser
    pub loser: Uuid,

    /// Judge rationale, or [`FALLBACK_VERDICT`]
    pub verdict: String,

    /// Raw generated text for A, or [`FALLBACK_OUTPUT`]
    pub output_a: String,

    /// Raw generated text for B, or [`FALLBACK_OUTPUT`]
    pub output_b: String,
}

/// Stateless match resolver over an [`Oracle`].
pub struct DuelRunner {
    oracle: Arc<dyn Oracle>,
    battle_kinds: Vec<String>,
}

impl DuelRunner {
    /// Create a resolver drawing contest types from `battle_kinds`.
    pub fn new(oracle: Arc<dyn Oracle>, battle_kinds: Vec<String>) -> Self {
        Self {
            oracle,
            battle_kinds,
        }
    }

    /// Resolve one match between two alive souls.
    ///
    /// `context_a`/`context_b` are the persona contexts snapshotted by the
    /// scheduler at pairing time. Both generation calls share one seed.
    pub async fn resolve(
        &self,
        a: &Soul,
        b: &Soul,
        context_a: String,
        context_b: String,
    ) -> DuelOutcome {
        let (kind, seed) = {
            let mut rng = rand::rng();
            let kind = self
                .battle_kinds
                .choose(&mut rng)
                .cloned()
                .unwrap_or_else(|| "duel".to_string());
            (kind, rng.random_range(0..1_000_000_000_u64))
        };

        let output_a = self
            .call_soul(context_a, prompts::opponent_descriptor(b), &kind, seed, a)
            .await;
        let output_b = self
            .call_soul(context_b, prompts::opponent_descriptor(a), &kind, seed, b)
            .await;

        let (winner_corner, verdict) = match self
            .oracle
            .judge(JudgmentRequest {
                battle_kind: kind.clone(),
                label_a: a.name.clone(),
                label_b: b.name.clone(),
                output_a: output_a.clone(),
                output_b: output_b.clone(),
            })
            .await
        {
            Ok(verdict) => (verdict.winner, verdict.reason),
            Err(err) => {
                warn!(
                    soul_a = %a.name,
                    soul_b = %b.name,
                    kind = %kind,
                    error = %err,
                    "judgment failed; falling back to random winner"
                );
                let corner = if rand::rng().random_bool(0.5) {
                    Corner::A
                } else {
                    Corner::B
                };
                (corner, FALLBACK_VERDICT.to_string())
            }
        };

        let (winner, loser) = match winner_corner {
            Corner::A => (a.id, b.id),
            Corner::B => (b.id, a.id),
        };

        DuelOutcome {
            kind,
            soul_a: a.id,
            soul_b: b.id,
            winner,
            loser,
            verdict,
            output_a,
            output_b,
        }
    }

    async fn call_soul(
        &self,
        persona_context: String,
        opponent: String,
        kind: &str,
        seed: u64,
        soul: &Soul,
    ) -> String {
        match self
            .oracle
            .generate(GenerationRequest {
                persona_context,
                opponent,
                battle_kind: kind.to_string(),
                seed,
            })
            .await
        {
            Ok(text) => text,
            Err(err) => {
                warn!(
                    soul = %soul.name,
                    kind = %kind,
                    error = %err,
                    "generation failed; substituting fallback output"
                );
                FALLBACK_OUTPUT.to_string()
            }
        }
    }
}
