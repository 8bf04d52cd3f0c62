//! Owner reset and save/load on the authoritative side

use tether_shared::{OwnerKey, OwnerSnapshot, StateBlob};
use tether_test::{Health, Mana, Preference, TestHarness};

#[test]
fn reset_drops_only_cleared_fragments() {
    let mut harness = TestHarness::default();
    let owner = harness.spawn_shared_owner(1);
    harness.server_fragment::<Health>(&owner).hp = 20;
    harness.server_fragment::<Mana>(&owner).mp = 5;

    let cleared = harness.server.reset_owner(&owner).unwrap();
    assert_eq!(cleared, vec!["health"]);

    let data = harness.server.owner(&owner).unwrap();
    assert!(!data.is_materialized("health"));
    assert!(data.is_materialized("mana"));

    // recreated fresh on next access
    assert_eq!(harness.server_fragment::<Health>(&owner).hp, 0);
    assert_eq!(harness.server_fragment::<Mana>(&owner).mp, 5);
}

#[test]
fn reset_fragment_resyncs_to_mirrors() {
    let mut harness = TestHarness::default();
    let mirror = harness.add_client();
    let owner = harness.spawn_shared_owner(1);
    harness.server_fragment::<Health>(&owner).hp = 20;
    harness.tick_and_exchange();
    assert_eq!(harness.client_fragment::<Health>(&mirror, &owner).hp, 20);

    harness.server.reset_owner(&owner).unwrap();
    harness.server_fragment::<Health>(&owner);
    let report = harness.tick_and_exchange();

    assert!(!report.has_errors(), "{:?}", report);
    assert_eq!(harness.client_fragment::<Health>(&mirror, &owner).hp, 0);
}

#[test]
fn reset_of_unknown_owner_is_an_error() {
    let mut harness = TestHarness::default();
    assert!(harness.server.reset_owner(&OwnerKey::from_u64(4)).is_err());
}

#[test]
fn saved_state_survives_a_respawn() {
    let mut harness = TestHarness::default();
    let owner = harness.spawn_shared_owner(1);
    harness.server_fragment::<Health>(&owner).hp = 20;
    harness.server_fragment::<Mana>(&owner).mp = 7;
    harness.server_fragment::<Preference>(&owner).volume = 80;

    let bytes = harness.server.save_owner(&owner).unwrap().to_bytes().unwrap();
    assert!(harness.server.despawn_owner(&owner));

    harness.server.spawn_owner(owner).unwrap();
    let snapshot = OwnerSnapshot::from_bytes(&bytes).unwrap();
    harness.server.load_owner(&owner, snapshot).unwrap();

    // held back until first access
    let data = harness.server.owner(&owner).unwrap();
    assert!(!data.is_materialized("health"));
    assert!(data.has_saved_state("health"));

    assert_eq!(harness.server_fragment::<Health>(&owner).hp, 20);
    assert_eq!(harness.server_fragment::<Mana>(&owner).mp, 7);
    assert_eq!(harness.server_fragment::<Preference>(&owner).volume, 80);
    assert!(!harness.server.owner(&owner).unwrap().has_saved_state("health"));
}

#[test]
fn save_keeps_state_that_never_materialized() {
    let mut harness = TestHarness::default();
    let owner = harness.spawn_shared_owner(1);

    let mut snapshot = OwnerSnapshot::new();
    snapshot.insert("health", StateBlob::new().with("hp", 33));
    snapshot.insert("retired_fragment", StateBlob::new().with("x", 1));
    harness.server.load_owner(&owner, snapshot).unwrap();

    let saved = harness.server.save_owner(&owner).unwrap();
    assert_eq!(saved.get("health").and_then(|state| state.get_int("hp")), Some(33));
    assert!(saved.contains("retired_fragment"));
}

#[test]
fn load_into_materialized_fragment_applies_immediately() {
    let mut harness = TestHarness::default();
    let owner = harness.spawn_shared_owner(1);
    harness.server_fragment::<Mana>(&owner).mp = 1;

    let mut snapshot = OwnerSnapshot::new();
    snapshot.insert("mana", StateBlob::new().with("mp", 12).with("regen", 2.5));
    harness.server.load_owner(&owner, snapshot).unwrap();

    let mana = harness.server_fragment::<Mana>(&owner);
    assert_eq!(mana.mp, 12);
    assert_eq!(mana.regen, 2.5);
}

#[test]
fn load_with_mismatched_state_is_an_error() {
    let mut harness = TestHarness::default();
    let owner = harness.spawn_shared_owner(1);
    harness.server_fragment::<Mana>(&owner);

    let mut snapshot = OwnerSnapshot::new();
    snapshot.insert("mana", StateBlob::new().with("mp", "lots"));
    assert!(harness.server.load_owner(&owner, snapshot).is_err());
}
