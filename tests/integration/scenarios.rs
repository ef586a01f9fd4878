//! End-to-end tracing scenarios
//!
//! Each test drives the reference circuit through a surface toggle, as a
//! diagram UI would, and checks what the monitor recorded.

use wiretrace::circuit::Circuit;
use wiretrace::foundation::{BitVector, Cid, EventSource, Mailbox, SurfaceId, Tick, WireId};
use wiretrace::monitor::{Monitor, MonitorEvent};

fn cid(s: &str) -> Cid {
    Cid::new(s).unwrap()
}

/// A circuit with one attached surface that a fresh monitor already listens on.
fn session() -> (Circuit, Monitor, SurfaceId) {
    let mut circuit = Circuit::new();
    let mut monitor = Monitor::new(&circuit);
    let surface = circuit.attach_surface();
    monitor.pump(&mut circuit, &mut ());
    (circuit, monitor, surface)
}

fn samples(monitor: &Monitor, identity: &str) -> Vec<(Tick, String)> {
    monitor
        .registry()
        .get(identity)
        .unwrap()
        .history()
        .iter()
        .map(|s| (s.tick, s.value.to_string()))
        .collect()
}

fn toggle(circuit: &mut Circuit, monitor: &mut Monitor, surface: SurfaceId, wire: WireId) {
    circuit.toggle_track(surface, wire).unwrap();
    monitor.pump(circuit, &mut ());
}

// =============================================================================
// Recording
// =============================================================================

#[test]
fn top_level_wire_records_seed_and_change() {
    let (mut circuit, mut monitor, surface) = session();
    let a = circuit.add_named_wire(circuit.root(), cid("w1"), 1).unwrap();
    circuit.set_signal(a, BitVector::bit(false)).unwrap();

    toggle(&mut circuit, &mut monitor, surface, a);
    assert_eq!(samples(&monitor, "w1"), vec![(0, "0".to_string())]);

    circuit.advance_by(3);
    circuit.set_signal(a, BitVector::bit(true)).unwrap();
    monitor.pump(&mut circuit, &mut ());
    assert_eq!(
        samples(&monitor, "w1"),
        vec![(0, "0".to_string()), (3, "1".to_string())]
    );
}

#[test]
fn nested_wire_is_keyed_by_path() {
    let (mut circuit, mut monitor, surface) = session();
    let (_, body) = circuit
        .add_named_subcircuit(circuit.root(), cid("sc2"))
        .unwrap();
    let b = circuit.add_named_wire(body, cid("w5"), 1).unwrap();

    toggle(&mut circuit, &mut monitor, surface, b);
    assert!(monitor.registry().contains("sc2.w5"));
}

#[test]
fn multibit_values_are_recorded_whole() {
    let (mut circuit, mut monitor, surface) = session();
    let bus = circuit.add_named_wire(circuit.root(), cid("data"), 4).unwrap();
    toggle(&mut circuit, &mut monitor, surface, bus);

    circuit.set_signal(bus, "10x1".parse().unwrap()).unwrap();
    circuit.advance();
    circuit.set_signal(bus, BitVector::from_u64(4, 0xA).unwrap()).unwrap();
    monitor.pump(&mut circuit, &mut ());

    assert_eq!(
        samples(&monitor, "data"),
        vec![
            (0, "xxxx".to_string()),
            (0, "10x1".to_string()),
            (1, "1010".to_string()),
        ]
    );
}

// =============================================================================
// Lifecycle
// =============================================================================

#[test]
fn double_toggle_tracks_once() {
    let (mut circuit, mut monitor, surface) = session();
    let a = circuit.add_named_wire(circuit.root(), cid("w1"), 1).unwrap();
    let mailbox = Mailbox::new();
    let _sub = mailbox.subscribe_to(monitor.registry());

    toggle(&mut circuit, &mut monitor, surface, a);
    toggle(&mut circuit, &mut monitor, surface, a);

    assert_eq!(monitor.registry().len(), 1);
    let events = mailbox.drain();
    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], MonitorEvent::Added { .. }));
}

#[test]
fn untrack_of_untracked_wire_is_silent() {
    let (mut circuit, mut monitor, _) = session();
    let a = circuit.add_wire(circuit.root(), 1).unwrap();
    let mailbox = Mailbox::new();
    let _sub = mailbox.subscribe_to(monitor.registry());

    assert!(!monitor.untrack(&circuit, a));
    assert!(mailbox.is_empty());
}

#[test]
fn change_queued_before_untrack_is_never_recorded() {
    let (mut circuit, mut monitor, surface) = session();
    let a = circuit.add_named_wire(circuit.root(), cid("w1"), 1).unwrap();
    toggle(&mut circuit, &mut monitor, surface, a);

    // The change is queued but not yet pumped when tracking stops.
    circuit.set_signal(a, BitVector::bit(true)).unwrap();
    assert!(monitor.untrack(&circuit, a));
    assert_eq!(monitor.pump(&mut circuit, &mut ()), 0);
    assert!(circuit.next_event().is_none());
    assert!(monitor.registry().is_empty());
}

#[test]
fn retrack_records_from_current_tick() {
    let (mut circuit, mut monitor, surface) = session();
    let a = circuit.add_named_wire(circuit.root(), cid("w1"), 1).unwrap();
    toggle(&mut circuit, &mut monitor, surface, a);
    monitor.untrack(&circuit, a);

    circuit.advance_by(5);
    circuit.set_signal(a, BitVector::bit(true)).unwrap();
    toggle(&mut circuit, &mut monitor, surface, a);

    assert_eq!(samples(&monitor, "w1"), vec![(5, "1".to_string())]);
}
