//! Property-based tests over the state invariants the scheduler relies on.

use chrono::Utc;
use gauntlet::{CollectiveState, Soul};
use proptest::prelude::*;
use uuid::Uuid;

proptest! {
    /// The elimination counter only ever moves forward, and the narrative
    /// log never exceeds its cap.
    #[test]
    fn prop_absorption_counters_are_monotonic(
        entries in proptest::collection::vec("[a-z ]{0,24}", 1..60),
        cap in 1usize..50,
        target in 1u64..200,
    ) {
        let mut collective = CollectiveState::default();
        let mut last = 0;

        for entry in entries {
            collective.record_absorption(entry, cap, target);
            prop_assert!(collective.souls_absorbed == last + 1);
            prop_assert!(collective.essence.len() <= cap);
            last = collective.souls_absorbed;
        }
    }

    /// Completion transitions exactly once no matter how often it is
    /// re-applied, and the first reason sticks.
    #[test]
    fn prop_completion_sets_at_most_once(
        reasons in proptest::collection::vec("[a-z]{1,12}", 1..12),
    ) {
        let mut collective = CollectiveState::default();
        let first = reasons[0].clone();
        let mut transitions = 0;

        for reason in reasons {
            if collective.mark_complete(reason) {
                transitions += 1;
            }
        }

        prop_assert_eq!(transitions, 1);
        prop_assert!(collective.complete);
        prop_assert_eq!(collective.complete_reason, first);
    }

    /// A soul dies at most once, and its kill count always matches its
    /// lineage length regardless of the order of events.
    #[test]
    fn prop_soul_lifecycle(events in proptest::collection::vec(any::<bool>(), 1..40)) {
        let mut soul = Soul::new(
            "Subject [001]".to_string(),
            "Subject – under test".to_string(),
            1,
            String::new(),
        );
        let mut deaths = 0;

        for is_kill in events {
            if is_kill {
                soul.credit_kill(Uuid::new_v4());
            } else if soul.absorb(Utc::now()) {
                deaths += 1;
            }
        }

        prop_assert!(deaths <= 1);
        prop_assert_eq!(soul.kills as usize, soul.lineage.len());
        prop_assert_eq!(soul.alive, deaths == 0);
        if !soul.alive {
            prop_assert!(soul.absorbed_at.is_some());
        }
    }
}
