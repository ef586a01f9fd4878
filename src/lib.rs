//! Wiretrace - Signal tracing for digital-circuit simulation
//!
//! This crate re-exports all layers of the wiretrace system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 2: wiretrace_monitor    - Identity, trace registry, histories, binding, view model
//! Layer 1: wiretrace_circuit    - Reference simulation and event bus
//! Layer 0: wiretrace_foundation - Core types (Cid, BitVector, handles, Error, Subscription)
//! ```

pub use wiretrace_circuit as circuit;
pub use wiretrace_foundation as foundation;
pub use wiretrace_monitor as monitor;
