//! Persona catalog loading and wave spawning.
//!
//! The catalog is the immutable source of truth for contestant batches:
//! a JSON array of trait lines, loaded once at startup. Every wave
//! (initial seeding and each regeneration) is cut from the same catalog,
//! tagged with its generation number.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::domain::models::Soul;

/// Error types for persona catalog loading. All of these are fatal at
/// startup: without a valid catalog no population can be seeded.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("persona catalog not found at {0}")]
    Missing(PathBuf),

    #[error("failed to read persona catalog {path}: {source}")]
    Unreadable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("persona catalog {path} must be a JSON array of strings: {source}")]
    InvalidShape {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("persona catalog {0} is empty")]
    Empty(PathBuf),
}

/// Immutable list of persona trait lines.
#[derive(Debug, Clone)]
pub struct PersonaCatalog {
    traits: Vec<String>,
}

impl PersonaCatalog {
    /// Load and validate the catalog file.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        if !path.is_file() {
            return Err(CatalogError::Missing(path.to_path_buf()));
        }

        let raw = fs::read_to_string(path).map_err(|source| CatalogError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;

        let traits: Vec<String> =
            serde_json::from_str(&raw).map_err(|source| CatalogError::InvalidShape {
                path: path.to_path_buf(),
                source,
            })?;

        if traits.is_empty() {
            return Err(CatalogError::Empty(path.to_path_buf()));
        }

        Ok(Self { traits })
    }

    /// Build a catalog from in-memory trait lines (tests, embedding).
    pub fn from_traits(traits: Vec<String>) -> Self {
        Self { traits }
    }

    /// Number of trait lines available.
    pub fn len(&self) -> usize {
        self.traits.len()
    }

    /// Whether the catalog holds no trait lines.
    pub fn is_empty(&self) -> bool {
        self.traits.is_empty()
    }

    /// Spawn a fresh wave of souls tagged with `generation`.
    ///
    /// A catalog shorter than `count` spawns what it has (with a warning);
    /// extra entries are simply not used this wave. Every returned soul is
    /// brand new; regeneration never resurrects the dead.
    pub fn spawn_wave(&self, count: usize, generation: u32) -> Vec<Soul> {
        if self.traits.len() < count {
            warn!(
                available = self.traits.len(),
                requested = count,
                "persona catalog is short; spawning a reduced wave"
            );
        }

        self.traits
            .iter()
            .take(count)
            .enumerate()
            .map(|(i, trait_line)| {
                let base_name = trait_line
                    .split(" – ")
                    .next()
                    .unwrap_or(trait_line)
                    .trim()
                    .to_string();
                let slot = i + 1;
                let name = if generation == 1 {
                    format!("{base_name} [{slot:03}]")
                } else {
                    format!("{base_name} [G{generation}-{slot:03}]")
                };
                let essence = if generation == 1 {
                    format!("Prime fragment. Trait: {trait_line}. First of its line.")
                } else {
                    format!(
                        "Respawned shard of wave {generation}. \
                         Carries hazy memories of absorbed kin."
                    )
                };
                Soul::new(name, trait_line.clone(), generation, essence)
            })
            .collect()
    }
}
