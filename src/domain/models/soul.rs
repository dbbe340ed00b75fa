use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single contestant in the arena.
///
/// Souls are created at initial seeding or when a new wave spawns; they are
/// never deleted, only marked dead, so lineage references stay resolvable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Soul {
    /// Unique soul identifier
    pub id: Uuid,

    /// Display name, including the slot tag (e.g. `"The Archivist [007]"`)
    pub name: String,

    /// The catalog trait line this soul was spawned from
    pub trait_line: String,

    /// Spawn wave this soul belongs to
    #[serde(default = "default_generation")]
    pub generation: u32,

    /// Ids of the souls this one has eliminated, in order
    #[serde(default)]
    pub lineage: Vec<Uuid>,

    /// Number of eliminations scored
    #[serde(default)]
    pub kills: u32,

    /// Whether the soul is still in the tournament
    #[serde(default = "default_alive")]
    pub alive: bool,

    /// Free-text backstory carried into generation prompts
    #[serde(default)]
    pub essence: String,

    /// When the soul was eliminated, if it has been
    #[serde(default)]
    pub absorbed_at: Option<DateTime<Utc>>,
}

const fn default_generation() -> u32 {
    1
}

const fn default_alive() -> bool {
    true
}

impl Soul {
    /// Create a fresh, alive soul for the given wave.
    pub fn new(name: String, trait_line: String, generation: u32, essence: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            trait_line,
            generation,
            lineage: Vec::new(),
            kills: 0,
            alive: true,
            essence,
            absorbed_at: None,
        }
    }

    /// Mark this soul dead at `at`.
    ///
    /// Returns `false` if the soul was already dead; the alive→dead
    /// transition happens at most once and never reverses.
    pub fn absorb(&mut self, at: DateTime<Utc>) -> bool {
        if !self.alive {
            return false;
        }
        self.alive = false;
        self.absorbed_at = Some(at);
        true
    }

    /// Credit an elimination to this soul and append the loser to its lineage.
    ///
    /// Kills only accrue while the soul is alive; a dead winner (possible
    /// only through snapshot tampering) is left untouched.
    pub fn credit_kill(&mut self, loser: Uuid) {
        if !self.alive {
            return;
        }
        self.kills += 1;
        self.lineage.push(loser);
    }
}
