//! Mirrors keep asking for unsynced fragments every `query_interval_ticks`
//! and stop once state arrives.

use tether_client::ClientConfig;
use tether_server::ServerConfig;
use tether_shared::{OwnerKey, SyncOutcome};
use tether_test::{Health, TestHarness};

fn harness_with_interval(ticks: u16) -> TestHarness {
    TestHarness::new(
        ServerConfig::default(),
        ClientConfig {
            query_interval_ticks: ticks,
        },
    )
}

#[test]
fn queries_repeat_until_the_owner_exists() {
    let mut harness = harness_with_interval(3);
    let mirror = harness.add_client();

    // the server does not know this owner yet
    let owner = OwnerKey::from_u64(9);
    harness.client_mut(&mirror).track_owner(owner).unwrap();
    harness.client_fragment::<Health>(&mirror, &owner);

    let report = harness.tick_and_exchange_n(7);
    assert_eq!(
        report.server_outcomes,
        vec![(mirror, SyncOutcome::OwnerMissing); 3]
    );
    assert!(!harness.client(&mirror).is_synced::<Health>(&owner));

    harness.server.spawn_owner(owner).unwrap();
    harness.server_fragment::<Health>(&owner).hp = 5;

    // ticks 8 and 9 are quiet, tick 10 queries again
    let report = harness.tick_and_exchange_n(3);
    assert_eq!(report.server_outcomes, vec![(mirror, SyncOutcome::Requested)]);
    assert!(harness.client(&mirror).is_synced::<Health>(&owner));
    assert_eq!(harness.client_fragment::<Health>(&mirror, &owner).hp, 5);

    let report = harness.tick_and_exchange_n(10);
    assert!(report.server_outcomes.is_empty());
}

#[test]
fn unmaterialized_fragments_are_never_queried() {
    let mut harness = harness_with_interval(1);
    let _mirror = harness.add_client();
    harness.spawn_shared_owner(1);

    let report = harness.tick_and_exchange_n(5);
    assert_eq!(report.delivered, 0);
}

#[test]
fn explicit_request_goes_out_immediately() {
    let mut harness = harness_with_interval(100);
    let mirror = harness.add_client();
    let owner = harness.spawn_shared_owner(1);
    harness.server_fragment::<Health>(&owner).hp = 8;

    harness.client_mut(&mirror).request::<Health>(&owner).unwrap();
    let report = harness.exchange();

    assert_eq!(report.server_outcomes, vec![(mirror, SyncOutcome::Requested)]);
    assert_eq!(harness.client_fragment::<Health>(&mirror, &owner).hp, 8);
}
