//! Posting sink port.
//!
//! Best-effort, fire-and-forget: the scheduler logs and swallows every
//! error. A no-op implementation is selected at startup when posting is
//! disabled, so the core never branches on its presence.

use std::path::Path;

use async_trait::async_trait;

use crate::domain::models::BattleRecord;

/// Error types for the posting sink
#[derive(Debug, thiserror::Error)]
pub enum NotifierError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("post rejected ({status}): {body}")]
    Rejected { status: u16, body: String },
}

/// Port trait for the external posting sink.
#[async_trait]
pub trait TrophyNotifier: Send + Sync {
    /// Post one resolved elimination, with optional rendered card artifact.
    async fn post(
        &self,
        outcome: &BattleRecord,
        text: &str,
        artifact: Option<&Path>,
    ) -> Result<(), NotifierError>;

    /// Whether this sink actually delivers anywhere.
    fn enabled(&self) -> bool {
        true
    }
}

/// No-op sink used when posting is disabled.
pub struct NullNotifier;

#[async_trait]
impl TrophyNotifier for NullNotifier {
    async fn post(
        &self,
        _outcome: &BattleRecord,
        _text: &str,
        _artifact: Option<&Path>,
    ) -> Result<(), NotifierError> {
        Ok(())
    }

    fn enabled(&self) -> bool {
        false
    }
}
