use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::Config;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid target_souls: {0}. Must be at least 1")]
    InvalidTarget(u64),

    #[error("Invalid souls_per_generation: {0}. Must be at least 2")]
    InvalidWaveSize(usize),

    #[error("Invalid max_parallel_battles: {0}. Must be between 1 and 256")]
    InvalidParallelism(usize),

    #[error("battle_kinds catalog cannot be empty")]
    EmptyBattleKinds,

    #[error("Invalid essence_cap: {0}. Must be at least 1")]
    InvalidEssenceCap(usize),

    #[error("Oracle base_url cannot be empty")]
    EmptyBaseUrl,

    #[error("Invalid temperature: {0}. Must be within 0.0..=2.0")]
    InvalidTemperature(f32),

    #[error("Invalid oracle timeout: {0}. Must be at least 1 second")]
    InvalidTimeout(u64),

    #[error(
        "Invalid backoff configuration: initial_backoff_ms ({0}) must be less than max_backoff_ms ({1})"
    )]
    InvalidBackoff(u64, u64),

    #[error("Persistence path cannot be empty")]
    EmptyPersistencePath,

    #[error("Persona catalog path cannot be empty")]
    EmptyCatalogPath,

    #[error("Notifier is enabled but no bearer_token is configured")]
    MissingBearerToken,

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. gauntlet.yaml (project config)
    /// 3. gauntlet.local.yaml (local overrides, optional)
    /// 4. Environment variables (`GAUNTLET_*` prefix, highest priority)
    pub fn load() -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file("gauntlet.yaml"))
            .merge(Yaml::file("gauntlet.local.yaml"))
            .merge(Env::prefixed("GAUNTLET_").split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .merge(Env::prefixed("GAUNTLET_").split("__"))
            .extract()
            .context(format!(
                "Failed to load config from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.arena.target_souls == 0 {
            return Err(ConfigError::InvalidTarget(config.arena.target_souls));
        }

        if config.arena.souls_per_generation < 2 {
            return Err(ConfigError::InvalidWaveSize(
                config.arena.souls_per_generation,
            ));
        }

        if config.arena.max_parallel_battles == 0 || config.arena.max_parallel_battles > 256 {
            return Err(ConfigError::InvalidParallelism(
                config.arena.max_parallel_battles,
            ));
        }

        if config.arena.battle_kinds.is_empty() {
            return Err(ConfigError::EmptyBattleKinds);
        }

        if config.arena.essence_cap == 0 {
            return Err(ConfigError::InvalidEssenceCap(config.arena.essence_cap));
        }

        if config.oracle.base_url.is_empty() {
            return Err(ConfigError::EmptyBaseUrl);
        }

        for temperature in [
            config.oracle.temperature_contestant,
            config.oracle.temperature_judge,
        ] {
            if !(0.0..=2.0).contains(&temperature) {
                return Err(ConfigError::InvalidTemperature(temperature));
            }
        }

        if config.oracle.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout(config.oracle.timeout_secs));
        }

        if config.oracle.retry.initial_backoff_ms >= config.oracle.retry.max_backoff_ms {
            return Err(ConfigError::InvalidBackoff(
                config.oracle.retry.initial_backoff_ms,
                config.oracle.retry.max_backoff_ms,
            ));
        }

        if config.persistence.path.is_empty() {
            return Err(ConfigError::EmptyPersistencePath);
        }

        if config.personas.path.is_empty() {
            return Err(ConfigError::EmptyCatalogPath);
        }

        if config.notifier.enabled
            && config
                .notifier
                .bearer_token
                .as_deref()
                .is_none_or(str::is_empty)
        {
            return Err(ConfigError::MissingBearerToken);
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        Ok(())
    }
}
