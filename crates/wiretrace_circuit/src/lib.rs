//! Reference in-memory circuit simulation for wiretrace.
//!
//! This crate provides:
//! - [`Circuit`] - Nested scope graphs, wires, a tick counter and rendering
//!   surfaces, implementing every collaborator trait the monitor consumes
//! - [`EventBus`] - The subscription table and delivery queue behind it
//!
//! It does not evaluate gates: hosts drive it by setting wire values and
//! advancing the clock.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod bus;
pub mod circuit;

pub use bus::{EventBus, Topic};
pub use circuit::Circuit;
