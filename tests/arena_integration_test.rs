//! End-to-end scheduler scenarios driven round by round with a scripted
//! oracle and a real file-backed snapshot store.

use std::sync::Arc;

use gauntlet::domain::models::ArenaConfig;
use gauntlet::infrastructure::oracle::MockOracle;
use gauntlet::infrastructure::persistence::JsonSnapshotStore;
use gauntlet::services::{FALLBACK_OUTPUT, FALLBACK_VERDICT};
use gauntlet::{Arena, ArenaPhase, DuelRunner, NullNotifier, PersonaCatalog, RoundReport};

fn traits(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("Soul {i} – archetype {i}")).collect()
}

fn build_arena(dir: &tempfile::TempDir, oracle: MockOracle, config: ArenaConfig) -> Arena {
    let catalog = PersonaCatalog::from_traits(traits(config.souls_per_generation));
    let store = Arc::new(JsonSnapshotStore::new(dir.path().join("arena.json")));
    let duels = Arc::new(DuelRunner::new(
        Arc::new(oracle),
        vec!["roast_battle".to_string(), "meme_execution".to_string()],
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

fn config(souls: usize, target: u64) -> ArenaConfig {
    ArenaConfig {
        target_souls: target,
        souls_per_generation: souls,
        max_parallel_battles: 4,
        ..ArenaConfig::default()
    }
}

#[tokio::test]
async fn test_four_souls_one_round_applies_exactly_two_eliminations() {
    let dir = tempfile::tempdir().unwrap();
    let arena = build_arena(&dir, MockOracle::new(), config(4, 101));
    arena.bootstrap().await.unwrap();

    let report = arena.step().await.unwrap();
    assert_eq!(report, RoundReport::Fought { matches: 2 });

    let snapshot = arena.snapshot().await;
    assert_eq!(snapshot.collective.souls_absorbed, 2);
    assert_eq!(snapshot.collective.total_battles, 2);
    assert_eq!(snapshot.battles.len(), 2);
    assert_eq!(snapshot.alive_count(), 2);
    assert_eq!(
        snapshot.souls.values().filter(|s| !s.alive).count(),
        2,
        "exactly the two losers are dead"
    );
}

#[tokio::test]
async fn test_odd_population_leaves_trailing_soul_for_next_round() {
    let dir = tempfile::tempdir().unwrap();
    let arena = build_arena(&dir, MockOracle::new(), config(5, 101));
    arena.bootstrap().await.unwrap();

    let report = arena.step().await.unwrap();
    assert_eq!(report, RoundReport::Fought { matches: 2 });

    let snapshot = arena.snapshot().await;
    assert_eq!(snapshot.alive_count(), 3, "unpaired soul just waits");
    assert_eq!(snapshot.collective.souls_absorbed, 2);
}

#[tokio::test]
async fn test_dead_oracle_still_resolves_every_match() {
    let dir = tempfile::tempdir().unwrap();
    let arena = build_arena(&dir, MockOracle::failing(), config(4, 101));
    arena.bootstrap().await.unwrap();

    let report = arena.step().await.unwrap();
    assert_eq!(report, RoundReport::Fought { matches: 2 });

    let snapshot = arena.snapshot().await;
    assert_eq!(snapshot.collective.souls_absorbed, 2);
    for battle in &snapshot.battles {
        assert_eq!(battle.verdict, FALLBACK_VERDICT);
        assert_eq!(battle.output_a, FALLBACK_OUTPUT);
        assert_eq!(battle.output_b, FALLBACK_OUTPUT);
        assert!(
            battle.winner == battle.soul_a || battle.winner == battle.soul_b,
            "winner is never a third value"
        );
        assert_ne!(battle.winner, battle.loser);
    }
}

#[tokio::test]
async fn test_reaching_target_completes_exactly_once() {
    let dir = tempfile::tempdir().unwrap();
    let arena = build_arena(&dir, MockOracle::new(), config(4, 3));
    arena.bootstrap().await.unwrap();

    // Round one: two eliminations, one short of the target.
    assert_eq!(
        arena.step().await.unwrap(),
        RoundReport::Fought { matches: 2 }
    );
    let snapshot = arena.snapshot().await;
    assert_eq!(snapshot.collective.souls_absorbed, 2);
    assert!(!snapshot.collective.complete);

    // Round two: the final elimination lands.
    assert_eq!(
        arena.step().await.unwrap(),
        RoundReport::Fought { matches: 1 }
    );
    let snapshot = arena.snapshot().await;
    assert_eq!(snapshot.collective.souls_absorbed, 3);
    assert!(snapshot.collective.complete);
    assert!(!snapshot.collective.complete_reason.is_empty());

    // No further rounds launch.
    assert_eq!(arena.step().await.unwrap(), RoundReport::Complete);
    assert_eq!(arena.phase().await, ArenaPhase::Complete);
    let after = arena.snapshot().await;
    assert_eq!(after.collective.souls_absorbed, 3, "counter stays at target");
}

#[tokio::test]
async fn test_exhausted_population_regenerates_next_wave() {
    let dir = tempfile::tempdir().unwrap();
    let arena = build_arena(&dir, MockOracle::new(), config(4, 101));
    arena.bootstrap().await.unwrap();

    // 4 -> 2 -> 1 alive: two fighting rounds exhaust the population.
    assert_eq!(
        arena.step().await.unwrap(),
        RoundReport::Fought { matches: 2 }
    );
    assert_eq!(
        arena.step().await.unwrap(),
        RoundReport::Fought { matches: 1 }
    );
    assert_eq!(arena.snapshot().await.alive_count(), 1);

    let report = arena.step().await.unwrap();
    assert_eq!(report, RoundReport::Regenerated { generation: 2 });

    let snapshot = arena.snapshot().await;
    assert_eq!(snapshot.collective.current_generation, 2);
    assert_eq!(snapshot.alive_count(), 5, "survivor plus a fresh wave of 4");
    assert_eq!(
        snapshot
            .souls
            .values()
            .filter(|s| s.generation == 2)
            .count(),
        4
    );
    for soul in snapshot.souls.values().filter(|s| s.absorbed_at.is_some()) {
        assert!(!soul.alive, "no dead soul is ever resurrected");
    }
}

#[tokio::test]
async fn test_state_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let arena = build_arena(&dir, MockOracle::new(), config(4, 101));
    arena.bootstrap().await.unwrap();
    arena.step().await.unwrap();
    let before = arena.snapshot().await;

    // A second scheduler over the same store resumes where the first left off.
    let resumed = build_arena(&dir, MockOracle::new(), config(4, 101));
    resumed.bootstrap().await.unwrap();
    assert_eq!(resumed.snapshot().await, before);
    assert_eq!(resumed.phase().await, ArenaPhase::Running);
}

#[tokio::test]
async fn test_completed_snapshot_restarts_terminal() {
    let dir = tempfile::tempdir().unwrap();
    let arena = build_arena(&dir, MockOracle::new(), config(2, 1));
    arena.bootstrap().await.unwrap();
    assert_eq!(
        arena.step().await.unwrap(),
        RoundReport::Fought { matches: 1 }
    );
    assert!(arena.snapshot().await.collective.complete);

    let resumed = build_arena(&dir, MockOracle::new(), config(2, 1));
    resumed.bootstrap().await.unwrap();
    assert_eq!(resumed.phase().await, ArenaPhase::Complete);
    assert_eq!(resumed.step().await.unwrap(), RoundReport::Complete);
}

#[tokio::test]
async fn test_run_drives_to_completion() {
    let dir = tempfile::tempdir().unwrap();
    let arena = build_arena(&dir, MockOracle::new(), config(4, 5));
    arena.bootstrap().await.unwrap();

    arena.run().await.unwrap();

    let snapshot = arena.snapshot().await;
    assert_eq!(snapshot.collective.souls_absorbed, 5);
    assert!(snapshot.collective.complete);
    assert_eq!(arena.phase().await, ArenaPhase::Complete);
}

#[tokio::test]
async fn test_cancellation_stops_the_loop_between_rounds() {
    let dir = tempfile::tempdir().unwrap();
    let arena = build_arena(&dir, MockOracle::new(), config(4, 101));
    arena.bootstrap().await.unwrap();

    arena.shutdown_token().cancel();
    arena.run().await.unwrap();

    let snapshot = arena.snapshot().await;
    assert_eq!(
        snapshot.collective.souls_absorbed, 0,
        "no round launches after cancellation"
    );
}
