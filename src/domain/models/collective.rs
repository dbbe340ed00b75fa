use serde::{Deserialize, Serialize};

/// Cumulative tournament progress shared by every match.
///
/// Counters are monotonic: `souls_absorbed` never decreases and never
/// exceeds the configured target, and completion is set exactly once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectiveState {
    /// Eliminations applied so far, bounded above by the target
    #[serde(default)]
    pub souls_absorbed: u64,

    /// Every resolved contest, including stale outcomes that were discarded
    #[serde(default)]
    pub total_battles: u64,

    /// Current spawn wave number
    #[serde(default = "default_generation")]
    pub current_generation: u32,

    /// Rolling narrative log, newest last, oldest trimmed
    #[serde(default)]
    pub essence: Vec<String>,

    /// Human-readable status line
    #[serde(default = "default_tagline")]
    pub tagline: String,

    /// Whether the target has been reached
    #[serde(default)]
    pub complete: bool,

    /// Why the tournament completed (empty until it does)
    #[serde(default)]
    pub complete_reason: String,
}

const fn default_generation() -> u32 {
    1
}

fn default_tagline() -> String {
    "The collective stirs.".to_string()
}

impl Default for CollectiveState {
    fn default() -> Self {
        Self {
            souls_absorbed: 0,
            total_battles: 0,
            current_generation: default_generation(),
            essence: Vec::new(),
            tagline: default_tagline(),
            complete: false,
            complete_reason: String::new(),
        }
    }
}

impl CollectiveState {
    /// Record one applied elimination: bump the counter, append the
    /// narrative entry, trim the log to `essence_cap`, refresh the tagline.
    pub fn record_absorption(&mut self, entry: String, essence_cap: usize, target: u64) {
        self.souls_absorbed += 1;
        self.essence.push(entry);
        while self.essence.len() > essence_cap {
            self.essence.remove(0);
        }
        self.tagline = format!(
            "{}/{} souls absorbed; the collective grows.",
            self.souls_absorbed, target
        );
    }

    /// Count a resolved contest, applied or discarded.
    pub fn record_battle(&mut self) {
        self.total_battles += 1;
    }

    /// Whether the elimination target has been reached.
    pub fn target_reached(&self, target: u64) -> bool {
        self.souls_absorbed >= target
    }

    /// Set the completion fields. Returns `true` only on the first call;
    /// re-application has no effect.
    pub fn mark_complete(&mut self, reason: String) -> bool {
        if self.complete {
            return false;
        }
        self.complete = true;
        self.complete_reason = reason;
        self.tagline = "The collective is complete.".to_string();
        true
    }

    /// Advance to the next spawn wave and return its number.
    pub fn next_generation(&mut self) -> u32 {
        self.current_generation += 1;
        self.current_generation
    }

    /// Most recent narrative entries, newest last, capped at `limit`.
    pub fn recent_essence(&self, limit: usize) -> &[String] {
        let start = self.essence.len().saturating_sub(limit);
        &self.essence[start..]
    }
}
