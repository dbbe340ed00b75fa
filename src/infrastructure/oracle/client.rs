//! HTTP client for the Ollama chat API, implementing the oracle port.
//!
//! Connection pooling, per-request timeout, error classification and
//! exponential-backoff retry for transient failures. Both the contestant
//! and judge calls land on `/api/chat`; only model and temperature differ.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::domain::models::OracleConfig;
use crate::domain::ports::{Corner, GenerationRequest, JudgmentRequest, Oracle, OracleError, Verdict};

use super::error::OracleApiError;
use super::retry::RetryPolicy;
use super::types::{ChatMessage, ChatOptions, ChatRequest, ChatResponse};

/// System prompt for judgment calls. The contract is strict: exactly one
/// winner, JSON only, so the resolver can parse without heuristics.
const JUDGE_SYSTEM: &str = "You are the arena judge. One contestant must fall. Never tie. \
     Output ONLY JSON: {\"winner\":\"A\" or \"B\",\"reason\":\"one brutal line\"}";

/// Rationale used when the judge returns valid JSON without a reason.
const DEFAULT_REASON: &str = "No mercy.";

/// HTTP client for the Ollama chat API
pub struct OllamaClient {
    http_client: reqwest::Client,
    config: OracleConfig,
    retry_policy: RetryPolicy,
}

impl OllamaClient {
    /// Create a new client from oracle configuration.
    pub fn new(config: OracleConfig) -> Result<Self, OracleApiError> {
        info!(
            base_url = %config.base_url,
            contestant_model = %config.contestant_model,
            judge_model = %config.judge_model,
            timeout_secs = config.timeout_secs,
            "initializing oracle client"
        );

        let http_client = reqwest::Client::builder()
            .pool_max_idle_per_host(10)
            .timeout(Duration::from_secs(config.timeout_secs))
            .tcp_nodelay(true)
            .build()
            .map_err(OracleApiError::NetworkError)?;

        let retry_policy = RetryPolicy::new(
            config.retry.max_retries,
            config.retry.initial_backoff_ms,
            config.retry.max_backoff_ms,
        );

        Ok(Self {
            http_client,
            config,
            retry_policy,
        })
    }

    /// Send one chat request and return the assistant's text.
    async fn execute_chat(&self, request: &ChatRequest) -> Result<String, OracleApiError> {
        let url = format!("{}/api/chat", self.config.base_url);
        debug!(model = %request.model, "POST {url}");

        let response = self
            .http_client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    OracleApiError::Timeout
                } else {
                    OracleApiError::NetworkError(err)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read error body".to_string());
            warn!(%status, "oracle returned an error response");
            return Err(OracleApiError::from_status(status, body));
        }

        let chat: ChatResponse = response.json().await.map_err(OracleApiError::NetworkError)?;
        Ok(chat.message.content)
    }

    async fn chat_with_retry(&self, request: &ChatRequest) -> Result<String, OracleApiError> {
        self.retry_policy
            .execute(|| self.execute_chat(request))
            .await
    }

    /// Parse the judge's reply into a [`Verdict`].
    ///
    /// Tolerates markdown code fences around the JSON; anything else
    /// (missing winner, a third value, prose) is a malformed verdict.
    fn parse_verdict(raw: &str) -> Result<Verdict, OracleApiError> {
        #[derive(Deserialize)]
        struct RawVerdict {
            winner: String,
            #[serde(default)]
            reason: Option<String>,
        }

        let cleaned = strip_fences(raw);
        let parsed: RawVerdict = serde_json::from_str(cleaned)
            .map_err(|_| OracleApiError::MalformedVerdict(preview(raw)))?;

        let winner = match parsed.winner.trim().to_ascii_uppercase().as_str() {
            "A" => Corner::A,
            "B" => Corner::B,
            _ => return Err(OracleApiError::MalformedVerdict(preview(raw))),
        };

        Ok(Verdict {
            winner,
            reason: parsed
                .reason
                .filter(|r| !r.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_REASON.to_string()),
        })
    }

    fn to_port_error(&self, err: OracleApiError) -> OracleError {
        match err {
            OracleApiError::Timeout => OracleError::Timeout(self.config.timeout_secs),
            OracleApiError::MalformedVerdict(raw) => OracleError::MalformedVerdict(raw),
            OracleApiError::NetworkError(ref inner) if inner.is_connect() => {
                OracleError::Unavailable(err.to_string())
            }
            other => OracleError::Failed(other.to_string()),
        }
    }
}

#[async_trait]
impl Oracle for OllamaClient {
    async fn generate(&self, request: GenerationRequest) -> Result<String, OracleError> {
        let chat_request = ChatRequest {
            model: self.config.contestant_model.clone(),
            messages: vec![
                ChatMessage::system(request.persona_context),
                ChatMessage::user(format!(
                    "Contest: {}. Opponent: {}. Leave nothing of them standing. Seed: {}",
                    request.battle_kind, request.opponent, request.seed
                )),
            ],
            stream: false,
            options: Some(ChatOptions {
                temperature: Some(self.config.temperature_contestant),
                seed: Some(request.seed),
            }),
        };

        self.chat_with_retry(&chat_request)
            .await
            .map_err(|err| self.to_port_error(err))
    }

    async fn judge(&self, request: JudgmentRequest) -> Result<Verdict, OracleError> {
        let chat_request = ChatRequest {
            model: self.config.judge_model.clone(),
            messages: vec![
                ChatMessage::system(JUDGE_SYSTEM),
                ChatMessage::user(format!(
                    "Contest: {}\nA ({}): {}\nB ({}): {}",
                    request.battle_kind,
                    request.label_a,
                    request.output_a,
                    request.label_b,
                    request.output_b
                )),
            ],
            stream: false,
            options: Some(ChatOptions {
                temperature: Some(self.config.temperature_judge),
                seed: None,
            }),
        };

        let raw = self
            .chat_with_retry(&chat_request)
            .await
            .map_err(|err| self.to_port_error(err))?;

        Self::parse_verdict(&raw).map_err(|err| self.to_port_error(err))
    }
}

/// Strip a surrounding markdown code fence, if any.
fn strip_fences(raw: &str) -> &str {
    let s = raw.trim();
    let s = s
        .strip_prefix("```json")
        .or_else(|| s.strip_prefix("```"))
        .unwrap_or(s);
    let s = s.strip_suffix("```").unwrap_or(s);
    s.trim()
}

/// Short preview of an unparseable reply for error messages.
fn preview(raw: &str) -> String {
    const MAX: usize = 120;
    if raw.len() <= MAX {
        raw.to_string()
    } else {
        let cut = raw
            .char_indices()
            .take_while(|(i, _)| *i < MAX)
            .last()
            .map_or(0, |(i, c)| i + c.len_utf8());
        format!("{}...", &raw[..cut])
    }
}
