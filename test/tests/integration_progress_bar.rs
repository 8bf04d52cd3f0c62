//! ProgressBar eases its displayed value toward the target on frame events

use tether_shared::{FragmentType, OwnerData, PrototypeCloner, SchemaCache};
use tether_test::{FrameEvent, ProgressBar, TestHarness};

const EPSILON: f64 = 1e-9;

fn frame(data: &mut OwnerData, dt: f64) -> f64 {
    data.post(FrameEvent { dt });
    data.get::<ProgressBar>().unwrap().progress_display
}

#[test]
fn display_snaps_on_first_frame_then_buffers() {
    let mut harness = TestHarness::default();
    let owner = harness.spawn_shared_owner(1);
    let data = harness.server.owner_mut(&owner).unwrap();
    data.get::<ProgressBar>().unwrap().reseed(7);

    assert!(data.get::<ProgressBar>().unwrap().progress_display < 0.0);
    assert_eq!(frame(data, 0.016), 0.0);

    data.get::<ProgressBar>().unwrap().progress = 1.0;
    assert!((frame(data, 0.5) - 0.25).abs() < EPSILON);
    assert!((frame(data, 1.0) - 0.75).abs() < EPSILON);

    // never overshoots
    assert!((frame(data, 10.0) - 1.0).abs() < EPSILON);
    assert_eq!(data.get::<ProgressBar>().unwrap().displayed(), 1.0);

    data.get::<ProgressBar>().unwrap().progress = 0.5;
    assert!((frame(data, 0.2) - 0.9).abs() < EPSILON);
}

#[test]
fn oversized_frames_are_capped() {
    let mut harness = TestHarness::default();
    let owner = harness.spawn_shared_owner(1);
    let data = harness.server.owner_mut(&owner).unwrap();

    frame(data, 0.0);
    let bar = data.get::<ProgressBar>().unwrap();
    bar.progress = 1.0;
    bar.max_delta = 0.01;

    // ten seconds at most per frame
    assert!((frame(data, 1000.0) - 0.1).abs() < EPSILON);
}

#[test]
fn progress_syncs_but_display_stays_local() {
    let mut harness = TestHarness::default();
    let mirror = harness.add_client();
    let owner = harness.spawn_shared_owner(1);

    let bar = harness.server_fragment::<ProgressBar>(&owner);
    bar.progress = 0.6;
    harness.tick_and_exchange();

    let bar = harness.client_fragment::<ProgressBar>(&mirror, &owner);
    assert_eq!(bar.progress, 0.6);
    assert_eq!(bar.max_delta, 0.5);
}

#[test]
fn opaque_and_display_fields_are_excluded() {
    let schema = SchemaCache::global().schema_of::<ProgressBar>();
    assert!(schema.is_eligible("progress"));
    assert!(!schema.is_eligible("direction"));
    assert!(!schema.is_eligible("progress_display"));
    assert_eq!(schema.excluded().len(), 2);
    assert_eq!(schema.type_name(), ProgressBar::NAME);
}

#[test]
fn clone_resets_display_state() {
    let mut source = ProgressBar::default();
    source.progress = 0.3;
    source.progress_display = 0.2;
    source.max_delta = 2.0;

    let copy = PrototypeCloner::clone_typed(&source).unwrap();
    assert_eq!(copy.progress, 0.3);
    assert_eq!(copy.max_delta, 2.0);
    assert!(copy.progress_display < 0.0);
}
