//! Service layer: the tournament core.

pub mod arena;
pub mod duel;
pub mod prompts;
pub mod roster;

pub use arena::{Arena, ArenaPhase, RoundReport};
pub use duel::{DuelOutcome, DuelRunner, FALLBACK_OUTPUT, FALLBACK_VERDICT};
pub use roster::{CatalogError, PersonaCatalog};
