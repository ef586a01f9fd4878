//! Scope hierarchy tests

use wiretrace_circuit::Circuit;
use wiretrace_foundation::{Cid, ErrorKind, Hierarchy};

fn cid(s: &str) -> Cid {
    Cid::new(s).unwrap()
}

// =============================================================================
// Construction
// =============================================================================

#[test]
fn root_has_no_enclosing_cell() {
    let circuit = Circuit::new();
    assert_eq!(circuit.graph_subcircuit(circuit.root()), None);
}

#[test]
fn subcircuit_body_points_back_to_its_cell() {
    let mut circuit = Circuit::new();
    let root = circuit.root();
    let (cell, body) = circuit.add_named_subcircuit(root, cid("sc2")).unwrap();

    assert_eq!(circuit.graph_subcircuit(body), Some(cell));
    assert_eq!(circuit.cell_graph(cell), root);
    assert_eq!(circuit.cell_cid(cell).as_str(), "sc2");
}

#[test]
fn duplicate_cid_in_same_graph_is_rejected() {
    let mut circuit = Circuit::new();
    let root = circuit.root();
    circuit.add_named_wire(root, cid("w1"), 1).unwrap();

    let err = circuit.add_named_wire(root, cid("w1"), 1).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::DuplicateCid { .. }));
}

#[test]
fn same_cid_in_different_graphs_is_allowed() {
    let mut circuit = Circuit::new();
    let root = circuit.root();
    let (_, body) = circuit.add_named_subcircuit(root, cid("sc")).unwrap();
    circuit.add_named_wire(root, cid("w1"), 1).unwrap();
    assert!(circuit.add_named_wire(body, cid("w1"), 1).is_ok());
}

#[test]
fn generated_cids_are_unique_within_graph() {
    let mut circuit = Circuit::new();
    let root = circuit.root();
    let a = circuit.add_wire(root, 1).unwrap();
    let b = circuit.add_wire(root, 1).unwrap();
    assert_ne!(circuit.wire_cid(a), circuit.wire_cid(b));
}

#[test]
fn zero_width_wire_is_rejected() {
    let mut circuit = Circuit::new();
    let err = circuit.add_wire(circuit.root(), 0).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::ZeroWidth));
}

// =============================================================================
// Moves
// =============================================================================

#[test]
fn move_wire_changes_graph() {
    let mut circuit = Circuit::new();
    let root = circuit.root();
    let (_, body) = circuit.add_named_subcircuit(root, cid("sc")).unwrap();
    let w = circuit.add_named_wire(root, cid("w1"), 1).unwrap();

    circuit.move_wire(w, body).unwrap();
    assert_eq!(circuit.wire_graph(w), body);

    // The old name is free again.
    assert!(circuit.add_named_wire(root, cid("w1"), 1).is_ok());
}

#[test]
fn move_wire_into_taken_name_fails() {
    let mut circuit = Circuit::new();
    let root = circuit.root();
    let (_, body) = circuit.add_named_subcircuit(root, cid("sc")).unwrap();
    let w = circuit.add_named_wire(root, cid("w1"), 1).unwrap();
    circuit.add_named_wire(body, cid("w1"), 1).unwrap();

    assert!(circuit.move_wire(w, body).is_err());
    assert_eq!(circuit.wire_graph(w), root);
}

#[test]
fn subcircuit_cannot_move_into_itself() {
    let mut circuit = Circuit::new();
    let root = circuit.root();
    let (outer, outer_body) = circuit.add_named_subcircuit(root, cid("outer")).unwrap();
    let (_, inner_body) = circuit.add_named_subcircuit(outer_body, cid("inner")).unwrap();

    let err = circuit.move_subcircuit(outer, inner_body).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::ScopeCycle { .. }));
    let err = circuit.move_subcircuit(outer, outer_body).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::ScopeCycle { .. }));
}
