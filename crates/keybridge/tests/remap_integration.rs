//! End-to-end tests of the remap pipeline over mock adapters.
//!
//! Each test wires a `ConnectionSupervisor` and/or `RemapEngine` exactly the
//! way `main` does, but against the scriptable mock transport, store, sink,
//! and indicator, then drives raw report bytes through the whole path.

use std::sync::Arc;
use std::time::Duration;

use keybridge::application::{ConnectionSupervisor, DeviceInfo, LayoutManager, RemapEngine};
use keybridge::infrastructure::indicator::mock::MockIndicator;
use keybridge::infrastructure::output::mock::{MockOutputSink, SinkEvent};
use keybridge::infrastructure::storage::mock::MockLayoutStore;
use keybridge::infrastructure::transport::mock::{MockTransport, ReadOutcome};
use keybridge_core::{Layout, OutputKey, Rgb};

const SWAP: u8 = 0x30;
const TIMEOUT: Duration = Duration::from_millis(10);

fn keyboard() -> DeviceInfo {
    DeviceInfo {
        vendor_id: 0x04d9,
        product_id: 0x0169,
        bus: 1,
        address: 7,
        interface: 0,
        endpoint: 0x81,
    }
}

fn raw(mask: u8, codes: &[u8]) -> Vec<u8> {
    let mut report = vec![mask, 0, 0, 0, 0, 0, 0, 0];
    report[2..2 + codes.len()].copy_from_slice(codes);
    report
}

/// Builds an engine over the given layouts with a recording sink.
fn engine(layouts: Vec<Layout>, default: &str) -> (RemapEngine, Arc<MockOutputSink>) {
    let store = MockLayoutStore::new();
    let available: Vec<String> = layouts.iter().map(|l| l.name.clone()).collect();
    for layout in layouts {
        store.insert(layout);
    }
    let manager = LayoutManager::new(
        default,
        available,
        SWAP,
        1.0,
        Box::new(store),
        Arc::new(MockIndicator::new()),
    )
    .expect("valid configuration")
    .with_flicker(Duration::ZERO);
    let sink = Arc::new(MockOutputSink::new());
    (RemapEngine::new(manager, sink.clone()), sink)
}

/// Drives scripted reports through a supervisor into an engine, the way the
/// daemon's poll loop does.
fn pump(supervisor: &mut ConnectionSupervisor, engine: &mut RemapEngine, polls: usize) {
    for _ in 0..polls {
        let report = supervisor.poll();
        let attached = supervisor.is_attached();
        if !attached {
            engine.release_all().expect("mock sink never fails here");
        }
        if let Some(report) = report {
            engine.process_frame(&report).expect("mock sink never fails here");
        }
    }
}

#[test]
fn full_pipeline_remaps_a_keystroke() {
    // Arrange: a layout that turns A into F1, fed through the transport
    let mut layout = Layout::passthrough("fn_row");
    layout.mapping.insert(0x04, OutputKey::F1);
    let (mut engine, sink) = engine(vec![layout], "fn_row");

    let transport = MockTransport::new();
    transport.add_device(
        keyboard(),
        vec![
            ReadOutcome::Report(raw(0, &[0x04])),
            ReadOutcome::Report(raw(0, &[])),
        ],
    );
    let mut supervisor = ConnectionSupervisor::new(Box::new(transport), TIMEOUT);

    // Act
    pump(&mut supervisor, &mut engine, 2);

    // Assert
    assert_eq!(
        sink.events(),
        vec![SinkEvent::Press(OutputKey::F1), SinkEvent::Release(OutputKey::F1)]
    );
}

#[test]
fn modifiers_and_keys_arrive_in_stable_order() {
    let (mut engine, sink) = engine(vec![Layout::passthrough("base")], "base");

    let transport = MockTransport::new();
    transport.add_device(
        keyboard(),
        vec![
            // shift+ctrl plus two keys at once, then all released
            ReadOutcome::Report(raw(0x03, &[0x05, 0x04])),
            ReadOutcome::Report(raw(0x00, &[])),
        ],
    );
    let mut supervisor = ConnectionSupervisor::new(Box::new(transport), TIMEOUT);

    pump(&mut supervisor, &mut engine, 2);

    assert_eq!(
        sink.events(),
        vec![
            SinkEvent::Press(OutputKey::ControlLeft),
            SinkEvent::Press(OutputKey::ShiftLeft),
            SinkEvent::Press(OutputKey::KeyA),
            SinkEvent::Press(OutputKey::KeyB),
            SinkEvent::Release(OutputKey::ControlLeft),
            SinkEvent::Release(OutputKey::ShiftLeft),
            SinkEvent::Release(OutputKey::KeyA),
            SinkEvent::Release(OutputKey::KeyB),
        ]
    );
}

#[test]
fn swap_key_cycles_through_the_whole_rotation_and_wraps() {
    let mut second = Layout::passthrough("two");
    second.indicator_color = Rgb { r: 0, g: 0, b: 255 };
    let (mut engine, sink) = engine(
        vec![Layout::passthrough("one"), second, Layout::passthrough("three")],
        "one",
    );

    // Three full press+release swap cycles bring the rotation back around.
    for expected in ["two", "three", "one"] {
        engine
            .process_frame(&keybridge_core::BootReport {
                modifier_mask: 0,
                scan_codes: [SWAP, 0, 0, 0, 0, 0],
            })
            .unwrap();
        engine
            .process_frame(&keybridge_core::BootReport {
                modifier_mask: 0,
                scan_codes: [0; 6],
            })
            .unwrap();
        assert_eq!(engine.active_layout(), expected);
    }

    // The swap key itself never reached the sink.
    assert!(sink.events().is_empty());
}

#[test]
fn layout_switch_mid_hold_resolves_release_under_new_layout() {
    // Arrange: A maps to F1 in the first layout and to B in the second.
    let mut first = Layout::passthrough("first");
    first.mapping.insert(0x04, OutputKey::F1);
    let mut second = Layout::passthrough("second");
    second.mapping.insert(0x04, OutputKey::KeyB);
    let (mut engine, sink) = engine(vec![first, second], "first");

    let frame = |codes: [u8; 6]| keybridge_core::BootReport {
        modifier_mask: 0,
        scan_codes: codes,
    };

    // Act: hold A, tap swap while holding, then release A.
    engine.process_frame(&frame([0x04, 0, 0, 0, 0, 0])).unwrap();
    engine.process_frame(&frame([0x04, SWAP, 0, 0, 0, 0])).unwrap();
    engine.process_frame(&frame([0x04, 0, 0, 0, 0, 0])).unwrap();
    engine.process_frame(&frame([0; 6])).unwrap();

    // Assert: the release resolves under the new layout, which is why the
    // press (F1) and release (B) differ.  The physical key was held across
    // the switch, so no spurious edge fired in between.
    assert_eq!(engine.active_layout(), "second");
    assert_eq!(
        sink.events(),
        vec![SinkEvent::Press(OutputKey::F1), SinkEvent::Release(OutputKey::KeyB)]
    );
}

#[test]
fn failed_layout_load_keeps_remapping_with_the_old_table() {
    // Arrange: rotation lists a layout with no resource behind it.
    let store = MockLayoutStore::new();
    let mut base = Layout::passthrough("base");
    base.mapping.insert(0x04, OutputKey::F1);
    store.insert(base);
    let manager = LayoutManager::new(
        "base",
        vec!["base".to_string(), "missing".to_string()],
        SWAP,
        1.0,
        Box::new(store),
        Arc::new(MockIndicator::new()),
    )
    .unwrap()
    .with_flicker(Duration::ZERO);
    let sink = Arc::new(MockOutputSink::new());
    let mut engine = RemapEngine::new(manager, sink.clone());

    let frame = |codes: [u8; 6]| keybridge_core::BootReport {
        modifier_mask: 0,
        scan_codes: codes,
    };

    // Act: switch onto the missing layout, then type.
    engine.process_frame(&frame([SWAP, 0, 0, 0, 0, 0])).unwrap();
    engine.process_frame(&frame([0; 6])).unwrap();
    engine.process_frame(&frame([0x04, 0, 0, 0, 0, 0])).unwrap();
    engine.process_frame(&frame([0; 6])).unwrap();

    // Assert: the old mapping survived the failed switch.
    assert_eq!(
        sink.events(),
        vec![SinkEvent::Press(OutputKey::F1), SinkEvent::Release(OutputKey::F1)]
    );
}

#[test]
fn emission_failure_retries_the_same_edges_next_poll() {
    let (mut engine, sink) = engine(vec![Layout::passthrough("base")], "base");

    let frame = keybridge_core::BootReport {
        modifier_mask: 0x02,
        scan_codes: [0x04, 0, 0, 0, 0, 0],
    };

    // First attempt fails mid-frame and commits nothing.
    sink.set_should_fail(true);
    assert!(engine.process_frame(&frame).is_err());

    // The daemon keeps polling; the keyboard still reports the same state.
    sink.set_should_fail(false);
    engine.process_frame(&frame).unwrap();

    assert_eq!(
        sink.events(),
        vec![
            SinkEvent::Press(OutputKey::ShiftLeft),
            SinkEvent::Press(OutputKey::KeyA),
        ]
    );
}

#[test]
fn detach_releases_held_keys_and_replug_recovers() {
    // Arrange: the keyboard delivers one press then dies; a replacement
    // appears with a fresh session.
    let (mut engine, sink) = engine(vec![Layout::passthrough("base")], "base");

    let transport = MockTransport::new();
    transport.add_device(
        keyboard(),
        vec![ReadOutcome::Report(raw(0, &[0x04])), ReadOutcome::Fail],
    );
    let devices = transport.device_handle();
    let mut supervisor = ConnectionSupervisor::new(Box::new(transport), TIMEOUT);

    // Act: press arrives, then the read failure drops the session (the
    // supervisor re-attaches to whatever is enumerable, which right now is
    // nothing).
    let report = supervisor.poll().expect("first report");
    engine.process_frame(&report).unwrap();
    assert!(supervisor.poll().is_none());
    assert!(!supervisor.is_attached());

    // The daemon loop notices the detach and releases held keys.
    engine.release_all().unwrap();

    // Replug: the keyboard comes back and types again.
    devices.plug(keyboard(), vec![ReadOutcome::Report(raw(0, &[0x05]))]);
    let report = supervisor.poll().expect("report after replug");
    engine.process_frame(&report).unwrap();

    // Assert
    assert_eq!(
        sink.events(),
        vec![
            SinkEvent::Press(OutputKey::KeyA),
            SinkEvent::ReleaseAll,
            SinkEvent::Press(OutputKey::KeyB),
        ]
    );
}

#[test]
fn idle_polling_produces_no_events() {
    let (_engine, sink) = engine(vec![Layout::passthrough("base")], "base");

    let transport = MockTransport::new();
    transport.add_device(
        keyboard(),
        vec![ReadOutcome::Timeout, ReadOutcome::Timeout, ReadOutcome::Timeout],
    );
    let mut supervisor = ConnectionSupervisor::new(Box::new(transport), TIMEOUT);

    for _ in 0..3 {
        assert!(supervisor.poll().is_none());
        assert!(supervisor.is_attached());
    }

    assert!(sink.events().is_empty());
}
