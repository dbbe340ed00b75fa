use serde::{Deserialize, Serialize};

/// Main configuration structure for Gauntlet
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Tournament settings
    #[serde(default)]
    pub arena: ArenaConfig,

    /// Oracle (text generation and judging) settings
    #[serde(default)]
    pub oracle: OracleConfig,

    /// Snapshot persistence settings
    #[serde(default)]
    pub persistence: PersistenceConfig,

    /// Persona catalog settings
    #[serde(default)]
    pub personas: PersonasConfig,

    /// Posting sink settings
    #[serde(default)]
    pub notifier: NotifierConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Tournament settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ArenaConfig {
    /// Fixed elimination target; the tournament completes when reached
    #[serde(default = "default_target_souls")]
    pub target_souls: u64,

    /// Population size for each spawn wave
    #[serde(default = "default_souls_per_generation")]
    pub souls_per_generation: usize,

    /// Maximum simultaneously in-flight matches
    #[serde(default = "default_max_parallel_battles")]
    pub max_parallel_battles: usize,

    /// Contest-type catalog, drawn uniformly per match
    #[serde(default = "default_battle_kinds")]
    pub battle_kinds: Vec<String>,

    /// Rolling narrative log entry cap; oldest entries are trimmed
    #[serde(default = "default_essence_cap")]
    pub essence_cap: usize,
}

const fn default_target_souls() -> u64 {
    101
}

const fn default_souls_per_generation() -> usize {
    101
}

const fn default_max_parallel_battles() -> usize {
    8
}

fn default_battle_kinds() -> Vec<String> {
    [
        "roast_battle",
        "meme_execution",
        "fur_vs_fur",
        "puppy_tears_duel",
        "fashion_disaster_off",
        "villain_monologue_clash",
        "coat_spot_stealing",
        "ego_skinning_ceremony",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

const fn default_essence_cap() -> usize {
    40
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            target_souls: default_target_souls(),
            souls_per_generation: default_souls_per_generation(),
            max_parallel_battles: default_max_parallel_battles(),
            battle_kinds: default_battle_kinds(),
            essence_cap: default_essence_cap(),
        }
    }
}

/// Oracle settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct OracleConfig {
    /// Base URL of the Ollama server
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model used for contestant generation calls
    #[serde(default = "default_contestant_model")]
    pub contestant_model: String,

    /// Model used for judgment calls
    #[serde(default = "default_judge_model")]
    pub judge_model: String,

    /// Sampling temperature for contestant calls
    #[serde(default = "default_temperature_contestant")]
    pub temperature_contestant: f32,

    /// Sampling temperature for judgment calls
    #[serde(default = "default_temperature_judge")]
    pub temperature_judge: f32,

    /// Request timeout in seconds
    #[serde(default = "default_oracle_timeout_secs")]
    pub timeout_secs: u64,

    /// Retry policy for transient oracle errors
    #[serde(default)]
    pub retry: RetryConfig,
}

fn default_base_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_contestant_model() -> String {
    "qwen2.5-coder:14b".to_string()
}

fn default_judge_model() -> String {
    "qwen2.5-coder:7b".to_string()
}

const fn default_temperature_contestant() -> f32 {
    1.65
}

const fn default_temperature_judge() -> f32 {
    1.0
}

const fn default_oracle_timeout_secs() -> u64 {
    120
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            contestant_model: default_contestant_model(),
            judge_model: default_judge_model(),
            temperature_contestant: default_temperature_contestant(),
            temperature_judge: default_temperature_judge(),
            timeout_secs: default_oracle_timeout_secs(),
            retry: RetryConfig::default(),
        }
    }
}

/// Retry policy configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RetryConfig {
    /// Maximum number of retry attempts
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Initial backoff delay in milliseconds
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,

    /// Maximum backoff delay in milliseconds
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
}

const fn default_max_retries() -> u32 {
    2
}

const fn default_initial_backoff_ms() -> u64 {
    500
}

const fn default_max_backoff_ms() -> u64 {
    10_000
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
        }
    }
}

/// Snapshot persistence settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PersistenceConfig {
    /// Path of the canonical snapshot file
    #[serde(default = "default_snapshot_path")]
    pub path: String,
}

fn default_snapshot_path() -> String {
    "state/arena.json".to_string()
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            path: default_snapshot_path(),
        }
    }
}

/// Persona catalog settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PersonasConfig {
    /// Path of the JSON catalog of persona trait lines
    #[serde(default = "default_catalog_path")]
    pub path: String,
}

fn default_catalog_path() -> String {
    "personas/catalog.json".to_string()
}

impl Default for PersonasConfig {
    fn default() -> Self {
        Self {
            path: default_catalog_path(),
        }
    }
}

/// Posting sink settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct NotifierConfig {
    /// Enable posting eliminations externally
    #[serde(default)]
    pub enabled: bool,

    /// Bearer token (can also be set via `GAUNTLET_NOTIFIER__BEARER_TOKEN`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bearer_token: Option<String>,

    /// Hashtag appended to every post
    #[serde(default = "default_hashtag")]
    pub hashtag: String,
}

fn default_hashtag() -> String {
    "#Gauntlet".to_string()
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            bearer_token: None,
            hashtag: default_hashtag(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}
