//! Property tests for identity and history invariants

use std::collections::{BTreeSet, HashSet};

use proptest::prelude::*;
use wiretrace_circuit::Circuit;
use wiretrace_foundation::{BitVector, Cid, GraphId, Mailbox, WireId};
use wiretrace_monitor::{Monitor, MonitorEvent, SignalIdentity, TraceRegistry, resolve};

/// One step of building a random hierarchy.
#[derive(Clone, Debug)]
enum Build {
    Wire { parent: usize, name: u8 },
    Subcircuit { parent: usize, name: u8 },
}

fn build_step() -> impl Strategy<Value = Build> {
    prop_oneof![
        3 => (any::<usize>(), 0u8..6).prop_map(|(parent, name)| Build::Wire { parent, name }),
        1 => (any::<usize>(), 0u8..6).prop_map(|(parent, name)| Build::Subcircuit { parent, name }),
    ]
}

/// Builds a random hierarchy, skipping steps whose name is already taken.
fn build(steps: &[Build]) -> (Circuit, Vec<WireId>) {
    let mut circuit = Circuit::new();
    let mut graphs: Vec<GraphId> = vec![circuit.root()];
    let mut wires = Vec::new();
    for step in steps {
        match step {
            Build::Wire { parent, name } => {
                let graph = graphs[parent % graphs.len()];
                let cid = Cid::new(format!("n{name}")).unwrap();
                if let Ok(wire) = circuit.add_named_wire(graph, cid, 1) {
                    wires.push(wire);
                }
            }
            Build::Subcircuit { parent, name } => {
                let graph = graphs[parent % graphs.len()];
                let cid = Cid::new(format!("n{name}")).unwrap();
                if let Ok((_, body)) = circuit.add_named_subcircuit(graph, cid) {
                    graphs.push(body);
                }
            }
        }
    }
    (circuit, wires)
}

/// One step of driving a tracked wire.
#[derive(Clone, Debug)]
enum Drive {
    Advance(u8),
    Set(bool),
    Pump,
}

fn drive_step() -> impl Strategy<Value = Drive> {
    prop_oneof![
        (0u8..4).prop_map(Drive::Advance),
        any::<bool>().prop_map(Drive::Set),
        Just(Drive::Pump),
    ]
}

proptest! {
    #[test]
    fn distinct_wires_have_distinct_identities(steps in prop::collection::vec(build_step(), 1..60)) {
        let (circuit, wires) = build(&steps);
        let identities: HashSet<_> = wires.iter().map(|w| resolve(&circuit, *w)).collect();
        prop_assert_eq!(identities.len(), wires.len());
    }

    #[test]
    fn resolved_identities_parse_back(steps in prop::collection::vec(build_step(), 1..40)) {
        let (circuit, wires) = build(&steps);
        for wire in wires {
            let identity = resolve(&circuit, wire);
            prop_assert_eq!(SignalIdentity::parse(identity.as_str()).unwrap(), identity);
        }
    }

    #[test]
    fn history_ticks_never_decrease(steps in prop::collection::vec(drive_step(), 0..80)) {
        let mut circuit = Circuit::new();
        let w = circuit.add_wire(circuit.root(), 1).unwrap();
        let mut monitor = Monitor::new(&circuit);
        monitor.track(&circuit, w);

        let mut changes = 0;
        for step in &steps {
            match step {
                Drive::Advance(n) => { circuit.advance_by(u64::from(*n)); }
                Drive::Set(v) => {
                    if circuit.set_signal(w, BitVector::bit(*v)).unwrap() {
                        changes += 1;
                    }
                }
                Drive::Pump => { monitor.pump(&mut circuit, &mut ()); }
            }
        }
        monitor.pump(&mut circuit, &mut ());

        let history = monitor.registry().entry_for(w).unwrap().history();
        prop_assert_eq!(history.len(), 1 + changes);
        let ticks: Vec<_> = history.iter().map(|s| s.tick).collect();
        prop_assert!(ticks.windows(2).all(|pair| pair[0] <= pair[1]));
        prop_assert_eq!(&history.last().unwrap().value, circuit_signal(&circuit, w));
    }

    #[test]
    fn lifecycle_matches_set_model(ops in prop::collection::vec((any::<bool>(), 0usize..5), 0..50)) {
        let mut circuit = Circuit::new();
        let root = circuit.root();
        let wires: Vec<_> = (0..5).map(|_| circuit.add_wire(root, 1).unwrap()).collect();
        let mut registry = TraceRegistry::new();
        let mailbox = Mailbox::new();
        let _sub = mailbox.subscribe_to(&registry);

        let mut model = BTreeSet::new();
        let (mut added, mut removed) = (0, 0);
        for (track, index) in ops {
            let wire = wires[index];
            if track {
                let created = registry.track(&circuit, wire);
                prop_assert_eq!(created, model.insert(wire));
                added += usize::from(created);
            } else {
                let existed = registry.untrack(&circuit, wire);
                prop_assert_eq!(existed, model.remove(&wire));
                removed += usize::from(existed);
            }
        }

        prop_assert_eq!(registry.len(), model.len());
        let events = mailbox.drain();
        let seen_added = events.iter().filter(|e| matches!(e, MonitorEvent::Added { .. })).count();
        let seen_removed = events.iter().filter(|e| matches!(e, MonitorEvent::Removed { .. })).count();
        prop_assert_eq!(seen_added, added);
        prop_assert_eq!(seen_removed, removed);
        prop_assert_eq!(circuit.bus().subscription_count(), model.len());
    }
}

fn circuit_signal(circuit: &Circuit, wire: WireId) -> &BitVector {
    use wiretrace_foundation::Simulation;
    circuit.signal(wire)
}
