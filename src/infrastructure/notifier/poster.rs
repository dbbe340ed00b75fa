//! X API v2 posting sink.
//!
//! Strictly best-effort: the scheduler logs and swallows every error this
//! adapter returns. Card-image attachment is accepted at the interface but
//! not uploaded here; rendering lives outside the tournament core.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, info};

use crate::domain::models::BattleRecord;
use crate::domain::ports::{NotifierError, TrophyNotifier};

const POST_ENDPOINT: &str = "https://api.x.com/2/tweets";

/// [`TrophyNotifier`] that posts eliminations to X.
pub struct XPoster {
    http_client: reqwest::Client,
    bearer_token: String,
    endpoint: String,
}

impl XPoster {
    /// Create a poster with the given bearer token.
    pub fn new(bearer_token: String) -> Result<Self, NotifierError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        info!("trophy posting enabled");

        Ok(Self {
            http_client,
            bearer_token,
            endpoint: POST_ENDPOINT.to_string(),
        })
    }

    /// Override the API endpoint (tests, proxies).
    pub fn with_endpoint(mut self, endpoint: String) -> Self {
        self.endpoint = endpoint;
        self
    }
}

#[async_trait]
impl TrophyNotifier for XPoster {
    async fn post(
        &self,
        outcome: &BattleRecord,
        text: &str,
        artifact: Option<&Path>,
    ) -> Result<(), NotifierError> {
        if let Some(path) = artifact {
            debug!(card = %path.display(), "card attachment skipped; text-only post");
        }

        let response = self
            .http_client
            .post(&self.endpoint)
            .bearer_auth(&self.bearer_token)
            .json(&json!({ "text": text }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read error body".to_string());
            return Err(NotifierError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        debug!(kill_number = outcome.kill_number, "trophy posted");
        Ok(())
    }
}
