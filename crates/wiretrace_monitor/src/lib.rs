//! Signal trace recording for wiretrace.
//!
//! This crate provides:
//! - [`resolve`] - Hierarchical identity of a wire, computed from the live
//!   scope graph
//! - [`TraceRegistry`] - The tracked-signal map and its add/remove lifecycle
//! - [`ValueHistory`] - Append-only `(tick, value)` history of one wire
//! - [`SimulationBinding`] - Forwards simulation events into the registry
//! - [`MonitorView`] - Headless row and viewport bookkeeping for a renderer
//! - [`Monitor`] - Registry and binding bundled for embedding
//!
//! # Example
//!
//! ```
//! # use wiretrace_circuit::Circuit;
//! # use wiretrace_foundation::{BitVector, Cid};
//! # use wiretrace_monitor::Monitor;
//! # fn main() -> wiretrace_foundation::Result<()> {
//! let mut circuit = Circuit::new();
//! let wire = circuit.add_named_wire(circuit.root(), Cid::new("w1")?, 1)?;
//! let mut monitor = Monitor::new(&circuit);
//!
//! let surface = circuit.attach_surface();
//! monitor.pump(&mut circuit, &mut ()); // binding attaches to surface
//! circuit.toggle_track(surface, wire)?;
//! monitor.pump(&mut circuit, &mut ()); // wire is now tracked
//! circuit.set_signal(wire, BitVector::bit(true))?;
//! monitor.pump(&mut circuit, &mut ()); // change appended to history
//!
//! let history = monitor.registry().get("w1").map(|e| e.history().len());
//! assert_eq!(history, Some(2));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod binding;
pub mod config;
pub mod history;
pub mod identity;
pub mod monitor;
pub mod registry;
pub mod view;

pub use binding::{SettleObserver, SimulationBinding};
pub use config::MonitorConfig;
pub use history::{HistorySink, Sample, ValueHistory};
pub use identity::{SignalIdentity, resolve};
pub use monitor::Monitor;
pub use registry::{MonitorEvent, SnapshotEntry, TraceEntry, TraceRegistry, TraceSnapshot};
pub use view::{MonitorView, Row, Viewport, WaveformRenderer};
