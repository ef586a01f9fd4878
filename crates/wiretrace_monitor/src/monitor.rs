//! The embeddable monitor: a registry and the binding that feeds it.

use wiretrace_foundation::{EventSource, Hierarchy, Simulation, WireId};

use crate::binding::{SettleObserver, SimulationBinding};
use crate::registry::{TraceRegistry, TraceSnapshot};

/// Records traces of the wires a user toggles on any attached surface.
#[derive(Debug)]
pub struct Monitor {
    registry: TraceRegistry,
    binding: SimulationBinding,
}

impl Monitor {
    /// Creates a monitor listening on `source`.
    #[must_use]
    pub fn new<E: EventSource + ?Sized>(source: &E) -> Self {
        tracing::debug!("monitor created");
        Self {
            registry: TraceRegistry::new(),
            binding: SimulationBinding::new(source),
        }
    }

    /// Handles every queued simulation event. Returns the number handled.
    pub fn pump<S>(&mut self, sim: &mut S, observer: &mut dyn SettleObserver) -> usize
    where
        S: Simulation + EventSource + ?Sized,
    {
        self.binding.pump(sim, &mut self.registry, observer)
    }

    /// Tracks `wire` directly, bypassing surface toggles.
    pub fn track<S: Simulation + ?Sized>(&mut self, sim: &S, wire: WireId) -> bool {
        self.registry.track(sim, wire)
    }

    /// Stops tracking `wire`.
    pub fn untrack<H: Hierarchy + ?Sized>(&mut self, hierarchy: &H, wire: WireId) -> bool {
        self.registry.untrack(hierarchy, wire)
    }

    /// Captures the current traces.
    #[must_use]
    pub fn snapshot(&self) -> TraceSnapshot {
        self.registry.snapshot()
    }

    /// Returns the registry.
    #[must_use]
    pub fn registry(&self) -> &TraceRegistry {
        &self.registry
    }

    /// Returns the registry mutably.
    pub fn registry_mut(&mut self) -> &mut TraceRegistry {
        &mut self.registry
    }

    /// Returns the binding.
    #[must_use]
    pub fn binding(&self) -> &SimulationBinding {
        &self.binding
    }
}
