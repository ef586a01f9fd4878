//! Interfaces a simulation exposes to the monitor.
//!
//! The monitor never owns circuit state. It reads the clock and the scope
//! hierarchy through [`Clock`] and [`Hierarchy`], registers interest through
//! [`Simulation::watch_signal`] and [`EventSource`], and receives every
//! notification as an explicit [`Delivery`] pulled from the simulation's
//! event queue.
//!
//! Handles passed to these methods must have been minted by the same
//! simulation. Implementations may panic on foreign handles.

use crate::Tick;
use crate::cid::Cid;
use crate::ids::{CellId, GraphId, SurfaceId, WireId};
use crate::observe::{Subscription, SubscriptionId};
use crate::value::BitVector;

/// The simulation's monotonic logical clock.
pub trait Clock {
    /// Returns the current tick.
    fn tick(&self) -> Tick;
}

/// The nesting structure of a circuit.
///
/// Every wire and cell lives in exactly one scope graph. A graph that is the
/// body of a subcircuit names the cell that instantiates it; the root graph
/// names none.
pub trait Hierarchy {
    /// Returns the wire's client identity within its graph.
    fn wire_cid(&self, wire: WireId) -> &Cid;

    /// Returns the graph the wire currently lives in.
    fn wire_graph(&self, wire: WireId) -> GraphId;

    /// Returns the subcircuit cell instantiating `graph`, if it is nested.
    fn graph_subcircuit(&self, graph: GraphId) -> Option<CellId>;

    /// Returns the cell's client identity within its graph.
    fn cell_cid(&self, cell: CellId) -> &Cid;

    /// Returns the graph the cell currently lives in.
    fn cell_graph(&self, cell: CellId) -> GraphId;
}

/// Signal access for a running simulation.
pub trait Simulation: Hierarchy + Clock {
    /// Returns the wire's current value.
    fn signal(&self, wire: WireId) -> &BitVector;

    /// Returns the wire's bit-width.
    fn bits(&self, wire: WireId) -> usize;

    /// Registers interest in the wire's value changes.
    ///
    /// Each change is queued as [`SimEvent::SignalChanged`] addressed to the
    /// returned subscription. Dropping the subscription also discards any of
    /// its changes still waiting in the queue.
    fn watch_signal(&self, wire: WireId) -> Subscription;
}

/// A notification raised by the simulation or its UI.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SimEvent {
    /// A rendering surface became available.
    SurfaceAttached(SurfaceId),
    /// The user toggled tracking of a wire on a surface.
    TrackToggled {
        /// The surface the toggle came from.
        surface: SurfaceId,
        /// The wire to track.
        wire: WireId,
    },
    /// A watched wire settled to a new value.
    SignalChanged {
        /// The wire that changed.
        wire: WireId,
        /// The clock reading when the change settled.
        tick: Tick,
        /// The new value.
        value: BitVector,
    },
    /// A tick finished updating gates.
    PostTick(Tick),
}

/// An event addressed to one subscription.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Delivery {
    /// The subscription the event is addressed to.
    pub subscription: SubscriptionId,
    /// The event itself.
    pub event: SimEvent,
}

/// Subscription points for simulation-level notifications.
pub trait EventSource {
    /// Registers interest in newly attached rendering surfaces.
    fn on_surface_attached(&self) -> Subscription;

    /// Registers interest in tracking toggles raised on `surface`.
    fn on_track_toggled(&self, surface: SurfaceId) -> Subscription;

    /// Registers interest in tick completion.
    fn on_post_tick(&self) -> Subscription;

    /// Pops the oldest pending delivery for a live subscription.
    fn next_event(&mut self) -> Option<Delivery>;
}
