//! PROPERTY-BASED TESTS: delivery order and display buffering
//!
//! Key invariants:
//! 1. However state messages are reordered or duplicated, a mirror ends on
//!    the newest state the authority sent
//! 2. A discarded message never changes mirror state
//! 3. The displayed progress never overshoots its target

use proptest::prelude::*;
use tether_shared::SyncOutcome;
use tether_test::{FrameEvent, Health, ProgressBar, TestHarness};

proptest! {
    #[test]
    fn prop_mirror_ends_on_newest_state(
        values in prop::collection::vec(-1000i64..1000, 1..20),
        seed in any::<u64>(),
        duplicate in any::<bool>(),
    ) {
        let mut harness = TestHarness::default();
        let mirror = harness.add_client();
        let owner = harness.spawn_shared_owner(1);

        for value in &values {
            harness.server_fragment::<Health>(&owner).hp = *value;
            harness.server.sync::<Health>(&owner).unwrap();
        }
        if duplicate {
            harness.network.duplicate_to_client(&mirror);
        }
        harness.network.shuffle_to_client(&mirror, &fastrand::Rng::with_seed(seed));

        let report = harness.exchange();
        let applied = report
            .outcomes_for(&mirror)
            .into_iter()
            .filter(|outcome| *outcome == SyncOutcome::Applied)
            .count();
        let sent = values.len() * if duplicate { 2 } else { 1 };

        prop_assert!(applied >= 1 && applied <= values.len());
        prop_assert_eq!(applied + report.client_errors.len(), sent);
        prop_assert_eq!(
            harness.client_fragment::<Health>(&mirror, &owner).hp,
            *values.last().unwrap()
        );
    }

    #[test]
    fn prop_display_moves_toward_progress_without_overshoot(
        steps in prop::collection::vec((0.0f64..=1.0, 0.0f64..2.0), 1..40),
        seed in any::<u64>(),
    ) {
        let mut harness = TestHarness::default();
        let owner = harness.spawn_shared_owner(1);
        let data = harness.server.owner_mut(&owner).unwrap();
        data.get::<ProgressBar>().unwrap().reseed(seed);
        data.post(FrameEvent { dt: 0.0 });

        for (progress, dt) in steps {
            let before = {
                let bar = data.get::<ProgressBar>().unwrap();
                bar.progress = progress;
                bar.progress_display
            };
            data.post(FrameEvent { dt });

            let bar = data.get::<ProgressBar>().unwrap();
            let after = bar.progress_display;
            let low = before.min(progress) - 1e-9;
            let high = before.max(progress) + 1e-9;
            prop_assert!(after >= low && after <= high);
            prop_assert!((after - before).abs() <= dt * bar.max_delta + 1e-9);
            prop_assert!((0.0..=1.0).contains(&bar.displayed()));
            prop_assert!(bar.fluctuation().abs() <= 0.5 * bar.fluct_region + 1e-9);
        }
    }
}
