//! State reaches mirrors without an explicit sync: on materialization and
//! when a mirror starts observing.

use tether_client::ClientConfig;
use tether_server::ServerConfig;
use tether_shared::{Fragment, OwnerKey};
use tether_test::{Health, Mana, TestHarness};

#[test]
fn materialized_fragment_is_pushed_on_next_tick() {
    let mut harness = TestHarness::default();
    let mirror = harness.add_client();
    let owner = harness.spawn_shared_owner(1);

    harness.server_fragment::<Mana>(&owner).mp = 3;
    assert!(harness.network.is_idle());

    let report = harness.tick_and_exchange();
    assert!(!report.has_errors(), "{:?}", report);

    let client = harness.client(&mirror);
    let mana = client.owner(&owner).and_then(|data| data.peek::<Mana>());
    assert_eq!(mana.map(|mana| mana.mp), Some(3));
    assert!(client.is_synced::<Mana>(&owner));
}

#[test]
fn late_observer_receives_existing_state() {
    let mut harness = TestHarness::default();
    let owner = harness.spawn_shared_owner(1);
    harness.server_fragment::<Health>(&owner).hp = 20;
    harness.server_fragment::<Mana>(&owner).mp = 9;
    harness.tick_and_exchange();

    let mirror = harness.add_client();
    harness.client_mut(&mirror).track_owner(owner).unwrap();
    harness.server.add_observer(owner, mirror).unwrap();

    let report = harness.exchange();
    assert!(!report.has_errors(), "{:?}", report);
    assert_eq!(harness.client_fragment::<Health>(&mirror, &owner).hp, 20);
    assert_eq!(harness.client_fragment::<Mana>(&mirror, &owner).mp, 9);
}

#[test]
fn initial_sync_can_be_turned_off() {
    let config = ServerConfig {
        initial_sync: false,
        ..Default::default()
    };
    let mut harness = TestHarness::new(config, ClientConfig::default());
    let mirror = harness.add_client();
    let owner = harness.spawn_shared_owner(1);

    harness.server_fragment::<Mana>(&owner).mp = 3;
    harness.server.tick();
    assert!(harness.network.is_idle());

    let client = harness.client(&mirror);
    assert!(!client.owner(&owner).unwrap().is_materialized("mana"));
}

#[test]
fn requested_sync_is_flushed_on_tick() {
    let mut harness = TestHarness::default();
    let mirror = harness.add_client();
    let owner = harness.spawn_shared_owner(1);
    harness.tick_and_exchange();

    let mana = harness.server_fragment::<Mana>(&owner);
    mana.mp = 11;
    mana.base_mut().request_sync();
    harness.tick_and_exchange();

    assert_eq!(harness.client_fragment::<Mana>(&mirror, &owner).mp, 11);
}

#[test]
fn observer_of_unknown_owner_is_an_error() {
    let mut harness = TestHarness::default();
    let mirror = harness.add_client();
    assert!(harness
        .server
        .add_observer(OwnerKey::from_u64(99), mirror)
        .is_err());
}
