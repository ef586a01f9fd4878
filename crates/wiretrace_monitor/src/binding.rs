//! Simulation binding.
//!
//! Listens to the simulation's surface, toggle and settle events and turns
//! them into registry calls. Holds nothing but subscriptions.

use std::collections::HashMap;

use wiretrace_foundation::{
    Delivery, EventSource, SimEvent, Simulation, Subscription, SubscriptionId, SurfaceId, Tick,
};

use crate::registry::TraceRegistry;

/// Receives post-tick settle notifications.
///
/// Settles are a rendering concern; the registry never sees them.
pub trait SettleObserver {
    /// Called once a tick has fully settled.
    fn settled(&mut self, tick: Tick, registry: &TraceRegistry);
}

impl SettleObserver for () {
    fn settled(&mut self, _tick: Tick, _registry: &TraceRegistry) {}
}

/// Routes simulation events into a [`TraceRegistry`].
pub struct SimulationBinding {
    surfaces_attached: Subscription,
    post_tick: Subscription,
    surfaces: HashMap<SubscriptionId, (SurfaceId, Subscription)>,
}

impl SimulationBinding {
    /// Subscribes to surface attachment and post-tick settle on `source`.
    #[must_use]
    pub fn new<E: EventSource + ?Sized>(source: &E) -> Self {
        Self {
            surfaces_attached: source.on_surface_attached(),
            post_tick: source.on_post_tick(),
            surfaces: HashMap::new(),
        }
    }

    /// Starts listening for track toggles on `surface`.
    ///
    /// Returns `false` if the surface was already attached.
    pub fn attach_to<E: EventSource + ?Sized>(&mut self, source: &E, surface: SurfaceId) -> bool {
        if self.surfaces.values().any(|(s, _)| *s == surface) {
            return false;
        }
        let subscription = source.on_track_toggled(surface);
        tracing::debug!(%surface, "listening for track toggles");
        self.surfaces
            .insert(subscription.id(), (surface, subscription));
        true
    }

    /// Returns the surfaces this binding listens on.
    pub fn surfaces(&self) -> impl Iterator<Item = SurfaceId> + '_ {
        self.surfaces.values().map(|(surface, _)| *surface)
    }

    /// Handles one delivery. Returns `false` if it was not addressed to the
    /// binding or to a registry entry.
    pub fn dispatch<S>(
        &mut self,
        sim: &S,
        registry: &mut TraceRegistry,
        observer: &mut dyn SettleObserver,
        delivery: Delivery,
    ) -> bool
    where
        S: Simulation + EventSource + ?Sized,
    {
        let Delivery {
            subscription,
            event,
        } = delivery;
        match event {
            SimEvent::SurfaceAttached(surface) if subscription == self.surfaces_attached.id() => {
                self.attach_to(sim, surface);
                true
            }
            SimEvent::TrackToggled { surface, wire } if self.surfaces.contains_key(&subscription) => {
                tracing::trace!(%surface, %wire, "track toggled");
                registry.track(sim, wire);
                true
            }
            SimEvent::SignalChanged { wire, tick, value }
                if registry.owns_subscription(subscription) =>
            {
                registry.on_change(sim, wire, tick, value);
                true
            }
            SimEvent::PostTick(tick) if subscription == self.post_tick.id() => {
                observer.settled(tick, registry);
                true
            }
            other => {
                tracing::trace!(?subscription, event = ?other, "delivery not addressed to monitor");
                false
            }
        }
    }

    /// Drains the simulation's event queue. Returns the number of deliveries
    /// handled.
    pub fn pump<S>(
        &mut self,
        sim: &mut S,
        registry: &mut TraceRegistry,
        observer: &mut dyn SettleObserver,
    ) -> usize
    where
        S: Simulation + EventSource + ?Sized,
    {
        let mut handled = 0;
        while let Some(delivery) = sim.next_event() {
            if self.dispatch(&*sim, registry, observer, delivery) {
                handled += 1;
            }
        }
        handled
    }
}

impl std::fmt::Debug for SimulationBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulationBinding")
            .field("surfaces", &self.surfaces().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}
