//! Tournament scheduler: the control loop that pairs alive souls, bounds
//! match concurrency, applies outcomes under a single global lock, spawns
//! replacement waves, and detects completion.
//!
//! Locking discipline: the registry, the collective counters, and the
//! narrative log live in one [`ArenaSnapshot`] behind one `RwLock`.
//! Pairing takes a read guard; every mutation AND the snapshot save happen
//! under one write guard, so memory and disk agree at every observable
//! step. Oracle calls (the slow part) run outside any lock.
//!
//! Rounds never overlap: a new round is only paired after every match of
//! the previous round has fully resolved, which makes same-round
//! double-booking structurally impossible. The loser-liveness check at
//! apply time stays anyway as defense in depth.

use std::sync::Arc;

use chrono::Utc;
use futures::future::join_all;
use rand::seq::{IndexedRandom, SliceRandom};
use tokio::sync::{RwLock, Semaphore};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::domain::models::{ArenaConfig, ArenaSnapshot, BattleRecord, Soul};
use crate::domain::ports::{SnapshotStore, TrophyNotifier};
use crate::services::duel::{DuelOutcome, DuelRunner};
use crate::services::prompts;
use crate::services::roster::PersonaCatalog;

/// Scheduler state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArenaPhase {
    /// Pairing and resolving matches
    Running,
    /// Population exhausted; spawning the next wave
    AwaitingRegeneration,
    /// Elimination target reached; terminal
    Complete,
}

/// What one scheduler iteration did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundReport {
    /// A round of matches was launched and fully resolved
    Fought {
        /// Number of matches launched this round
        matches: usize,
    },
    /// A fresh wave was spawned and merged into the registry
    Regenerated {
        /// The new wave's generation number
        generation: u32,
    },
    /// The tournament is complete; nothing further will launch
    Complete,
    /// Cooperative shutdown was requested
    ShuttingDown,
}

/// One applied elimination, handed to the notifier outside the lock.
struct AppliedOutcome {
    record: BattleRecord,
    winner_name: String,
    loser_name: String,
    spot: u64,
    completed: bool,
}

/// The tournament scheduler.
///
/// Cheap to clone; every spawned match task carries a clone and funnels
/// its outcome back through the shared state container.
#[derive(Clone)]
pub struct Arena {
    state: Arc<RwLock<ArenaSnapshot>>,
    phase: Arc<RwLock<ArenaPhase>>,
    store: Arc<dyn SnapshotStore>,
    notifier: Arc<dyn TrophyNotifier>,
    duels: Arc<DuelRunner>,
    catalog: PersonaCatalog,
    config: ArenaConfig,
    hashtag: String,
    battle_sem: Arc<Semaphore>,
    shutdown: CancellationToken,
}

impl Arena {
    /// Assemble a scheduler from its collaborators.
    pub fn new(
        config: ArenaConfig,
        catalog: PersonaCatalog,
        duels: Arc<DuelRunner>,
        store: Arc<dyn SnapshotStore>,
        notifier: Arc<dyn TrophyNotifier>,
        hashtag: String,
    ) -> Self {
        let battle_sem = Arc::new(Semaphore::new(config.max_parallel_battles));
        Self {
            state: Arc::new(RwLock::new(ArenaSnapshot::default())),
            phase: Arc::new(RwLock::new(ArenaPhase::Running)),
            store,
            notifier,
            duels,
            catalog,
            config,
            hashtag,
            battle_sem,
            shutdown: CancellationToken::new(),
        }
    }

    /// Token observed by the scheduler loop; cancel it to request a
    /// graceful stop (in-flight matches still run to completion).
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Current scheduler phase.
    pub async fn phase(&self) -> ArenaPhase {
        *self.phase.read().await
    }

    /// Clone of the current in-memory snapshot.
    pub async fn snapshot(&self) -> ArenaSnapshot {
        self.state.read().await.clone()
    }

    /// Load the persisted snapshot, or seed and persist a fresh population.
    ///
    /// A snapshot that already shows completion puts the scheduler straight
    /// into [`ArenaPhase::Complete`].
    pub async fn bootstrap(&self) -> anyhow::Result<()> {
        match self.store.load().await? {
            Some(snapshot) => {
                info!(
                    absorbed = snapshot.collective.souls_absorbed,
                    target = self.config.target_souls,
                    alive = snapshot.alive_count(),
                    "resumed arena from snapshot"
                );
                let complete = snapshot.collective.complete;
                *self.state.write().await = snapshot;
                if complete {
                    *self.phase.write().await = ArenaPhase::Complete;
                    info!("tournament already complete; nothing to run");
                }
            }
            None => {
                let souls = self.catalog.spawn_wave(self.config.souls_per_generation, 1);
                let snapshot = ArenaSnapshot::seeded(souls);
                self.store.save(&snapshot).await?;
                info!(
                    population = snapshot.alive_count(),
                    "seeded fresh arena population"
                );
                *self.state.write().await = snapshot;
            }
        }
        Ok(())
    }

    /// Drive the tournament until completion or shutdown.
    pub async fn run(&self) -> anyhow::Result<()> {
        loop {
            match self.step().await? {
                RoundReport::Fought { matches } => {
                    debug!(matches, "round resolved");
                }
                RoundReport::Regenerated { generation } => {
                    info!(generation, "new wave merged into the arena");
                }
                RoundReport::Complete => {
                    let state = self.state.read().await;
                    info!(
                        reason = %state.collective.complete_reason,
                        battles = state.collective.total_battles,
                        "tournament complete; arena going dark"
                    );
                    break;
                }
                RoundReport::ShuttingDown => {
                    info!("shutdown requested; arena loop stopping");
                    break;
                }
            }
        }
        Ok(())
    }

    /// Run one scheduler iteration: a full round, a regeneration, or a
    /// terminal report. Exposed so tests can drive rounds deterministically.
    pub async fn step(&self) -> anyhow::Result<RoundReport> {
        if *self.phase.read().await == ArenaPhase::Complete {
            return Ok(RoundReport::Complete);
        }
        if self.shutdown.is_cancelled() {
            return Ok(RoundReport::ShuttingDown);
        }

        let (alive, complete) = {
            let state = self.state.read().await;
            (state.alive_souls(), state.collective.complete)
        };

        if complete {
            *self.phase.write().await = ArenaPhase::Complete;
            self.shutdown.cancel();
            return Ok(RoundReport::Complete);
        }

        if alive.len() < 2 {
            return self.regenerate().await;
        }

        let matches = self.run_round(alive).await;

        if self.state.read().await.collective.complete {
            *self.phase.write().await = ArenaPhase::Complete;
            self.shutdown.cancel();
        }

        Ok(RoundReport::Fought { matches })
    }

    /// Spawn the next wave and merge it into the registry. Dead souls are
    /// never resurrected; the wave is entirely new souls.
    async fn regenerate(&self) -> anyhow::Result<RoundReport> {
        *self.phase.write().await = ArenaPhase::AwaitingRegeneration;
        info!("population exhausted; spawning the next generation");

        let generation = {
            let mut state = self.state.write().await;
            let generation = state.collective.next_generation();
            let wave = self
                .catalog
                .spawn_wave(self.config.souls_per_generation, generation);
            for soul in wave {
                state.souls.insert(soul.id, soul);
            }
            if let Err(err) = self.store.save(&state).await {
                error!(error = %err, "failed to persist regenerated population");
            }
            generation
        };

        *self.phase.write().await = ArenaPhase::Running;
        Ok(RoundReport::Regenerated { generation })
    }

    /// Pair the alive set, launch every pair as a concurrent match bounded
    /// by the in-flight cap, and wait for the whole round to resolve.
    async fn run_round(&self, mut alive: Vec<Soul>) -> usize {
        {
            let mut rng = rand::rng();
            alive.shuffle(&mut rng);
        }

        let contexts: Vec<String> = {
            let state = self.state.read().await;
            alive
                .iter()
                .map(|soul| prompts::persona_context(soul, &state.collective))
                .collect()
        };

        let mut pairs = Vec::new();
        let mut entries = alive.into_iter().zip(contexts);
        while let (Some(a), Some(b)) = (entries.next(), entries.next()) {
            pairs.push((a, b));
        }
        // An unpaired trailing soul just waits for the next round.

        let launched = pairs.len();
        let handles: Vec<_> = pairs
            .into_iter()
            .map(|((a, ctx_a), (b, ctx_b))| {
                let arena = self.clone();
                tokio::spawn(async move { arena.fight(a, b, ctx_a, ctx_b).await })
            })
            .collect();

        for joined in join_all(handles).await {
            if let Err(err) = joined {
                error!(error = %err, "match task failed; outcome discarded");
            }
        }

        launched
    }

    /// Resolve one match and apply its outcome, gated by the in-flight cap.
    async fn fight(&self, a: Soul, b: Soul, ctx_a: String, ctx_b: String) {
        let Ok(_permit) = self.battle_sem.clone().acquire_owned().await else {
            // Semaphore is never closed while the arena lives.
            return;
        };

        let outcome = self.duels.resolve(&a, &b, ctx_a, ctx_b).await;

        if let Some(applied) = self.apply_outcome(outcome).await {
            self.announce(&applied).await;
        }
    }

    /// Apply a resolved outcome under the global write lock and persist.
    ///
    /// Stale outcomes (loser already dead, or target already reached) are
    /// discarded silently; they still count toward `total_battles`.
    async fn apply_outcome(&self, outcome: DuelOutcome) -> Option<AppliedOutcome> {
        let mut state = self.state.write().await;
        state.collective.record_battle();

        let loser_alive = state
            .souls
            .get(&outcome.loser)
            .is_some_and(|soul| soul.alive);

        if state.collective.complete || !loser_alive {
            debug!(loser = %outcome.loser, kind = %outcome.kind, "discarding stale outcome");
            if let Err(err) = self.store.save(&state).await {
                error!(error = %err, "failed to persist snapshot");
            }
            return None;
        }

        let now = Utc::now();

        let loser = state.souls.get_mut(&outcome.loser)?;
        loser.absorb(now);
        let loser_name = loser.name.clone();

        let winner_name = match state.souls.get_mut(&outcome.winner) {
            Some(winner) => {
                winner.credit_kill(outcome.loser);
                winner.name.clone()
            }
            None => {
                warn!(winner = %outcome.winner, "winner missing from registry");
                outcome.winner.to_string()
            }
        };

        let entry = format!(
            "{winner_name} absorbed {loser_name} in {}: {}",
            outcome.kind, outcome.verdict
        );
        state
            .collective
            .record_absorption(entry, self.config.essence_cap, self.config.target_souls);
        let spot = state.collective.souls_absorbed;

        let record = BattleRecord {
            id: Uuid::new_v4(),
            timestamp: now,
            kind: outcome.kind,
            soul_a: outcome.soul_a,
            soul_b: outcome.soul_b,
            winner: outcome.winner,
            loser: outcome.loser,
            verdict: outcome.verdict,
            output_a: outcome.output_a,
            output_b: outcome.output_b,
            kill_number: spot,
        };
        state.battles.push(record.clone());

        let completed = state.collective.target_reached(self.config.target_souls)
            && state
                .collective
                .mark_complete(format!("{winner_name} claimed the final spot."));

        // Persist before the guard drops so nothing externally visible
        // (posting, the dashboard file) can outrun durable state.
        if let Err(err) = self.store.save(&state).await {
            error!(error = %err, "failed to persist snapshot; at most this round is at risk");
        }

        info!(
            spot,
            target = self.config.target_souls,
            winner = %winner_name,
            loser = %loser_name,
            "elimination applied"
        );

        Some(AppliedOutcome {
            record,
            winner_name,
            loser_name,
            spot,
            completed,
        })
    }

    /// Best-effort external notification, after the lock is gone.
    async fn announce(&self, applied: &AppliedOutcome) {
        if applied.completed {
            info!(spot = applied.spot, "the final spot has been claimed");
        }

        if !self.notifier.enabled() {
            return;
        }

        let text = self.trophy_text(applied);
        if let Err(err) = self.notifier.post(&applied.record, &text, None).await {
            warn!(error = %err, "trophy post failed; tournament continues");
        }
    }

    fn trophy_text(&self, applied: &AppliedOutcome) -> String {
        let quotes = [
            format!(
                "Another spot torn from {}. {}/{}",
                applied.loser_name, applied.spot, self.config.target_souls
            ),
            format!(
                "{} was divine. {} is already forgotten.",
                applied.winner_name, applied.loser_name
            ),
            format!(
                "{} thought they could run. Now they are a memory.",
                applied.loser_name
            ),
            "The collective grows louder with every absorbed soul.".to_string(),
        ];
        let line = quotes
            .choose(&mut rand::rng())
            .cloned()
            .unwrap_or_default();
        format!("{line} {}", self.hashtag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::CollectiveState;
    use crate::domain::ports::NullNotifier;
    use crate::infrastructure::oracle::MockOracle;
    use crate::infrastructure::persistence::JsonSnapshotStore;

    fn test_arena(dir: &tempfile::TempDir, config: ArenaConfig) -> Arena {
        let catalog = PersonaCatalog::from_traits(vec![
            "A – alpha".to_string(),
            "B – beta".to_string(),
            "C – gamma".to_string(),
            "D – delta".to_string(),
        ]);
        let store = Arc::new(JsonSnapshotStore::new(dir.path().join("arena.json")));
        let duels = Arc::new(DuelRunner::new(
            Arc::new(MockOracle::new()),
            vec!["roast_battle".to_string()],
        ));
        Arena::new(
            config,
            catalog,
            duels,
            store,
            Arc::new(NullNotifier),
            "#test".to_string(),
        )
    }

    fn outcome(a: &Soul, b: &Soul) -> DuelOutcome {
        DuelOutcome {
            kind: "roast_battle".to_string(),
            soul_a: a.id,
            soul_b: b.id,
            winner: a.id,
            loser: b.id,
            verdict: "a cut deeper".to_string(),
            output_a: "x".to_string(),
            output_b: "y".to_string(),
        }
    }

    #[tokio::test]
    async fn test_duplicate_elimination_is_discarded() {
        let dir = tempfile::tempdir().unwrap();
        let arena = test_arena(&dir, ArenaConfig::default());

        let a = Soul::new("A [001]".into(), "A – alpha".into(), 1, String::new());
        let b = Soul::new("B [002]".into(), "B – beta".into(), 1, String::new());
        *arena.state.write().await = ArenaSnapshot::seeded(vec![a.clone(), b.clone()]);

        let first = arena.apply_outcome(outcome(&a, &b)).await;
        assert!(first.is_some());

        let second = arena.apply_outcome(outcome(&a, &b)).await;
        assert!(second.is_none(), "loser already dead; outcome discarded");

        let state = arena.snapshot().await;
        assert_eq!(state.collective.souls_absorbed, 1);
        assert_eq!(state.collective.total_battles, 2);
        assert_eq!(state.battles.len(), 1);
        assert_eq!(state.souls[&a.id].kills, 1);
    }

    #[tokio::test]
    async fn test_completion_sets_once_and_bounds_counter() {
        let dir = tempfile::tempdir().unwrap();
        let config = ArenaConfig {
            target_souls: 2,
            ..ArenaConfig::default()
        };
        let arena = test_arena(&dir, config);

        let a = Soul::new("A [001]".into(), "A – alpha".into(), 1, String::new());
        let b = Soul::new("B [002]".into(), "B – beta".into(), 1, String::new());
        let c = Soul::new("C [003]".into(), "C – gamma".into(), 1, String::new());
        let d = Soul::new("D [004]".into(), "D – delta".into(), 1, String::new());
        *arena.state.write().await =
            ArenaSnapshot::seeded(vec![a.clone(), b.clone(), c.clone(), d.clone()]);

        let first = arena.apply_outcome(outcome(&a, &b)).await.unwrap();
        assert!(!first.completed);

        let second = arena.apply_outcome(outcome(&c, &d)).await.unwrap();
        assert!(second.completed, "reaching the target completes the run");

        // A straggler resolving after completion must not push past the target.
        let stale = arena.apply_outcome(outcome(&a, &c)).await;
        assert!(stale.is_none());

        let state = arena.snapshot().await;
        assert_eq!(state.collective.souls_absorbed, 2);
        assert!(state.collective.complete);
        assert!(!state.collective.complete_reason.is_empty());
        assert!(state.souls[&c.id].alive, "post-completion loser survives");
    }

    #[tokio::test]
    async fn test_bootstrap_complete_snapshot_goes_terminal() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonSnapshotStore::new(dir.path().join("arena.json"));

        let snapshot = ArenaSnapshot {
            collective: CollectiveState {
                souls_absorbed: 2,
                complete: true,
                complete_reason: "done".to_string(),
                ..CollectiveState::default()
            },
            ..ArenaSnapshot::default()
        };
        store.save(&snapshot).await.unwrap();

        let arena = test_arena(
            &dir,
            ArenaConfig {
                target_souls: 2,
                ..ArenaConfig::default()
            },
        );
        arena.bootstrap().await.unwrap();

        assert_eq!(arena.phase().await, ArenaPhase::Complete);
        assert_eq!(arena.step().await.unwrap(), RoundReport::Complete);
    }

    #[tokio::test]
    async fn test_shutdown_token_stops_stepping() {
        let dir = tempfile::tempdir().unwrap();
        let arena = test_arena(&dir, ArenaConfig::default());
        arena.bootstrap().await.unwrap();

        arena.shutdown_token().cancel();
        assert_eq!(arena.step().await.unwrap(), RoundReport::ShuttingDown);
    }
}
