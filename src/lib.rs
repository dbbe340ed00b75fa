//! Gauntlet - Self-Running Persona Elimination Tournament
//!
//! Gauntlet runs an automated single-elimination tournament among a fixed
//! population of generated personas ("souls"). Pairwise matches are judged
//! by an external text-generation oracle; losers are absorbed into a
//! persistent shared narrative ("the collective") until a fixed target of
//! eliminations is reached.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): models and the ports the outside world plugs into
//! - **Service Layer** (`services`): the tournament core: roster, match
//!   resolution, and the scheduler state machine
//! - **Infrastructure Layer** (`infrastructure`): oracle HTTP client,
//!   JSON snapshot persistence, posting sink, config, logging
//! - **CLI Layer** (`cli`): `run` and `status` commands
//!
//! # Example
//!
//! ```ignore
//! use gauntlet::services::Arena;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // Assemble an Arena and drive it to completion
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::models::{
    ArenaConfig, ArenaSnapshot, BattleRecord, CollectiveState, Config, Soul,
};
pub use domain::ports::{
    Corner, NullNotifier, Oracle, OracleError, SnapshotStore, TrophyNotifier, Verdict,
};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{Arena, ArenaPhase, DuelRunner, PersonaCatalog, RoundReport};
