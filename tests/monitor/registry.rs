//! Trace registry lifecycle tests

use std::cell::RefCell;
use std::rc::Rc;

use wiretrace_circuit::Circuit;
use wiretrace_foundation::{BitVector, Cid, Mailbox, Observable, WireId};
use wiretrace_monitor::{MonitorEvent, SignalIdentity, TraceRegistry};

fn cid(s: &str) -> Cid {
    Cid::new(s).unwrap()
}

fn named(circuit: &mut Circuit, name: &str) -> WireId {
    let root = circuit.root();
    circuit.add_named_wire(root, cid(name), 1).unwrap()
}

// =============================================================================
// Notifications
// =============================================================================

#[test]
fn added_carries_wire_and_identity() {
    let mut circuit = Circuit::new();
    let w = named(&mut circuit, "w1");
    let mut registry = TraceRegistry::new();
    let mailbox = Mailbox::new();
    let _sub = mailbox.subscribe_to(&registry);

    registry.track(&circuit, w);
    assert_eq!(
        mailbox.drain(),
        vec![MonitorEvent::Added {
            wire: w,
            identity: SignalIdentity::parse("w1").unwrap()
        }]
    );
}

#[test]
fn every_observer_is_notified() {
    let mut circuit = Circuit::new();
    let w = named(&mut circuit, "w1");
    let mut registry = TraceRegistry::new();
    let first = Mailbox::new();
    let second = Mailbox::new();
    let _a = first.subscribe_to(&registry);
    let _b = second.subscribe_to(&registry);

    registry.track(&circuit, w);
    registry.untrack(&circuit, w);
    assert_eq!(first.len(), 2);
    assert_eq!(second.len(), 2);
}

#[test]
fn released_observer_is_not_notified() {
    let mut circuit = Circuit::new();
    let w = named(&mut circuit, "w1");
    let mut registry = TraceRegistry::new();
    let count = Rc::new(RefCell::new(0));
    let hits = Rc::clone(&count);
    let sub = registry.subscribe(Box::new(move |_: &MonitorEvent| *hits.borrow_mut() += 1));

    registry.track(&circuit, w);
    drop(sub);
    registry.untrack(&circuit, w);
    assert_eq!(*count.borrow(), 1);
}

#[test]
fn event_wire_accessor() {
    let event = MonitorEvent::Removed {
        wire: WireId::new(4),
        identity: SignalIdentity::parse("x").unwrap(),
    };
    assert_eq!(event.wire(), WireId::new(4));
}

// =============================================================================
// Entries
// =============================================================================

#[test]
fn retrack_after_untrack_starts_fresh_history() {
    let mut circuit = Circuit::new();
    let w = named(&mut circuit, "w1");
    circuit.set_signal(w, BitVector::bit(false)).unwrap();
    let mut registry = TraceRegistry::new();

    registry.track(&circuit, w);
    registry.untrack(&circuit, w);
    circuit.advance_by(7);
    circuit.set_signal(w, BitVector::bit(true)).unwrap();
    registry.track(&circuit, w);

    let history = registry.get("w1").unwrap().history();
    assert_eq!(history.len(), 1);
    assert_eq!(history.first().unwrap().tick, 7);
    assert_eq!(history.first().unwrap().value, BitVector::bit(true));
}

#[test]
fn history_is_seeded_with_undefined_value() {
    let mut circuit = Circuit::new();
    let w = circuit.add_wire(circuit.root(), 3).unwrap();
    let mut registry = TraceRegistry::new();
    registry.track(&circuit, w);

    let history = registry.entry_for(w).unwrap().history();
    assert_eq!(history.bits(), 3);
    assert_eq!(history.first().unwrap().value.to_string(), "xxx");
}

#[test]
fn snapshot_preserves_order_and_is_send() {
    fn assert_send<T: Send>(_: &T) {}

    let mut circuit = Circuit::new();
    let b = named(&mut circuit, "b");
    let a = named(&mut circuit, "a");
    let mut registry = TraceRegistry::new();
    registry.track(&circuit, b);
    registry.track(&circuit, a);

    let snapshot = registry.snapshot();
    assert_send(&snapshot);
    let ids: Vec<_> = snapshot.iter().map(|e| e.identity.as_str()).collect();
    assert_eq!(ids, vec!["b", "a"]);

    let handle = std::thread::spawn(move || snapshot.len());
    assert_eq!(handle.join().unwrap(), 2);
}

#[test]
fn reparented_wire_keeps_one_entry() {
    let mut circuit = Circuit::new();
    let root = circuit.root();
    let (sc, sc_body) = circuit.add_named_subcircuit(root, cid("sc")).unwrap();
    let (_, top_body) = circuit.add_named_subcircuit(root, cid("top")).unwrap();
    let w = circuit.add_named_wire(sc_body, cid("w"), 1).unwrap();
    let mut registry = TraceRegistry::new();
    registry.track(&circuit, w);

    circuit.move_subcircuit(sc, top_body).unwrap();
    // Tracking again under the new identity re-keys instead of duplicating.
    assert!(!registry.track(&circuit, w));
    assert_eq!(registry.len(), 1);
    assert!(registry.contains("top.sc.w"));
}
