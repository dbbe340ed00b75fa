//! Ports: trait seams between the tournament core and the outside world.

pub mod notifier;
pub mod oracle;
pub mod snapshot_store;

pub use notifier::{NotifierError, NullNotifier, TrophyNotifier};
pub use oracle::{Corner, GenerationRequest, JudgmentRequest, Oracle, OracleError, Verdict};
pub use snapshot_store::{SnapshotError, SnapshotStore};
