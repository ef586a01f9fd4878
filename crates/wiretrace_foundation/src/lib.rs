//! Core types, signal values, and collaborator contracts for wiretrace.
//!
//! This crate provides:
//! - [`Tick`] - The simulator's logical clock unit
//! - [`Cid`] - Scope-local client identities
//! - [`Logic`] and [`BitVector`] - Three-valued signal values
//! - [`WireId`], [`CellId`], [`GraphId`], [`SurfaceId`] - Simulation handles
//! - [`Error`] - Error types with context
//! - [`Subscription`], [`Listeners`], [`Mailbox`] - Observer primitives
//! - [`sim`] - The interfaces a simulation exposes to the monitor

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod cid;
pub mod error;
pub mod ids;
pub mod observe;
pub mod sim;
pub mod value;

pub use cid::Cid;
pub use error::{Error, ErrorContext, ErrorKind, Result};
pub use ids::{CellId, GraphId, SurfaceId, WireId};
pub use observe::{Listeners, Mailbox, Observable, Subscription, SubscriptionId};
pub use sim::{Clock, Delivery, EventSource, Hierarchy, SimEvent, Simulation};
pub use value::{BitVector, Logic};

/// The simulator's discrete logical time unit.
pub type Tick = u64;
