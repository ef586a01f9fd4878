//! The tracked-signal registry.
//!
//! Owns one [`TraceEntry`] per tracked identity. Each entry owns the
//! subscription to its wire's change notifications, so removing the entry is
//! what stops the flow of changes.
//!
//! Lifecycle notifications are asymmetric: `Added` is emitted after the entry
//! is in place, `Removed` before it is torn down. Observers therefore always
//! see the entry present when they are notified.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use wiretrace_foundation::{
    BitVector, Hierarchy, Listeners, Observable, Simulation, Subscription, SubscriptionId, Tick,
    WireId,
};

use crate::history::{HistorySink, ValueHistory};
use crate::identity::{SignalIdentity, resolve};

// =============================================================================
// Monitor Event
// =============================================================================

/// A change to the tracked set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MonitorEvent {
    /// A wire started being tracked.
    Added {
        /// The tracked wire.
        wire: WireId,
        /// Its identity at the time it was added.
        identity: SignalIdentity,
    },
    /// A wire is about to stop being tracked. Its entry is still present.
    Removed {
        /// The wire being removed.
        wire: WireId,
        /// Its identity as stored in the registry.
        identity: SignalIdentity,
    },
    /// A tracked wire's scope was moved, so its identity changed.
    Moved {
        /// The wire that moved.
        wire: WireId,
        /// The identity it was stored under.
        from: SignalIdentity,
        /// The identity it is stored under now.
        to: SignalIdentity,
    },
}

impl MonitorEvent {
    /// Returns the wire the event is about.
    #[must_use]
    pub fn wire(&self) -> WireId {
        match self {
            Self::Added { wire, .. } | Self::Removed { wire, .. } | Self::Moved { wire, .. } => {
                *wire
            }
        }
    }
}

// =============================================================================
// Trace Entry
// =============================================================================

/// One tracked wire and its recorded history.
pub struct TraceEntry {
    wire: WireId,
    identity: SignalIdentity,
    history: ValueHistory,
    seq: u64,
    subscription: Subscription,
}

impl TraceEntry {
    /// Returns the tracked wire.
    #[must_use]
    pub fn wire(&self) -> WireId {
        self.wire
    }

    /// Returns the identity the entry is stored under.
    #[must_use]
    pub fn identity(&self) -> &SignalIdentity {
        &self.identity
    }

    /// Returns the recorded history.
    #[must_use]
    pub fn history(&self) -> &ValueHistory {
        &self.history
    }

    /// Returns the id of the change subscription this entry owns.
    #[must_use]
    pub fn subscription_id(&self) -> SubscriptionId {
        self.subscription.id()
    }
}

impl fmt::Debug for TraceEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TraceEntry")
            .field("wire", &self.wire)
            .field("identity", &self.identity)
            .field("samples", &self.history.len())
            .field("subscription", &self.subscription.id())
            .finish()
    }
}

// =============================================================================
// Trace Snapshot
// =============================================================================

/// A tracked wire as captured by [`TraceRegistry::snapshot`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SnapshotEntry {
    /// Identity at snapshot time.
    pub identity: SignalIdentity,
    /// The wire handle.
    pub wire: WireId,
    /// History at snapshot time.
    pub history: ValueHistory,
}

/// An immutable copy of the tracked set, in registry order.
///
/// Histories are shared with the registry, not copied, and later appends are
/// not visible through the snapshot. Snapshots are `Send`, so a renderer on
/// another thread can read them while the simulation keeps running.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TraceSnapshot {
    entries: im::Vector<SnapshotEntry>,
}

impl TraceSnapshot {
    /// Returns the number of captured entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing was tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the captured entries in registry order.
    pub fn iter(&self) -> impl Iterator<Item = &SnapshotEntry> {
        self.entries.iter()
    }

    /// Looks up a captured entry by identity.
    #[must_use]
    pub fn get(&self, identity: &str) -> Option<&SnapshotEntry> {
        self.entries.iter().find(|e| e.identity.as_str() == identity)
    }
}

// =============================================================================
// Trace Registry
// =============================================================================

/// The set of tracked wires and their histories.
///
/// Enumeration follows the order in which wires were first tracked.
pub struct TraceRegistry {
    entries: HashMap<SignalIdentity, TraceEntry>,
    order: BTreeMap<u64, SignalIdentity>,
    by_wire: HashMap<WireId, SignalIdentity>,
    by_subscription: HashMap<SubscriptionId, WireId>,
    next_seq: u64,
    listeners: Listeners<MonitorEvent>,
}

impl TraceRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            order: BTreeMap::new(),
            by_wire: HashMap::new(),
            by_subscription: HashMap::new(),
            next_seq: 0,
            listeners: Listeners::new(),
        }
    }

    // -------------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------------

    /// Starts tracking `wire`.
    ///
    /// Seeds the history with the wire's current value at the current tick,
    /// subscribes to its changes, stores the entry, then emits `Added`.
    /// Returns `false` if the wire is already tracked; its entry is only
    /// re-keyed if its scope moved.
    ///
    /// If the identity is still held by another wire whose scope moved since
    /// its last change, that entry is re-keyed to its live identity first.
    pub fn track<S: Simulation + ?Sized>(&mut self, sim: &S, wire: WireId) -> bool {
        let identity = resolve(sim, wire);
        if let Some(stored) = self.key_of(wire) {
            if stored == identity {
                tracing::trace!(%identity, "already tracked");
            } else {
                self.rekey(&stored, identity);
            }
            return false;
        }
        if let Some(holder) = self.entries.get(&identity).map(|e| e.wire) {
            if self.rekey(&identity, resolve(sim, holder)) == identity {
                tracing::warn!(%identity, %wire, "identity still held by another wire; not tracked");
                return false;
            }
        }

        let tick = sim.tick();
        let history = ValueHistory::seeded(sim.bits(wire), tick, sim.signal(wire).clone());
        let subscription = sim.watch_signal(wire);
        let seq = self.next_seq;
        self.next_seq += 1;

        self.order.insert(seq, identity.clone());
        self.by_wire.insert(wire, identity.clone());
        self.by_subscription.insert(subscription.id(), wire);
        self.entries.insert(
            identity.clone(),
            TraceEntry {
                wire,
                identity: identity.clone(),
                history,
                seq,
                subscription,
            },
        );
        tracing::debug!(%identity, %wire, tick, "signal tracked");

        self.listeners.emit(&MonitorEvent::Added { wire, identity });
        true
    }

    /// Stops tracking `wire`.
    ///
    /// Emits `Removed` while the entry is still present, then releases the
    /// change subscription and deletes the entry. Returns `false` without
    /// side effects if the wire is not tracked.
    pub fn untrack<H: Hierarchy + ?Sized>(&mut self, hierarchy: &H, wire: WireId) -> bool {
        let Some(identity) = self.locate(hierarchy, wire) else {
            tracing::trace!(%wire, "untrack of untracked wire ignored");
            return false;
        };
        self.remove_entry(&identity);
        true
    }

    /// Untracks every wire, in registry order.
    pub fn clear(&mut self) {
        let identities: Vec<SignalIdentity> = self.order.values().cloned().collect();
        for identity in &identities {
            self.remove_entry(identity);
        }
    }

    /// Records a value change of a tracked wire.
    ///
    /// The identity is recomputed from the current hierarchy. If the wire's
    /// scope was moved since it was last seen, the entry is re-keyed under its
    /// new identity and `Moved` is emitted before the sample is appended.
    ///
    /// # Panics
    ///
    /// Panics if no entry tracks `wire`. Changes only arrive through
    /// subscriptions owned by entries, so this means the subscription
    /// bookkeeping is broken.
    pub fn on_change<H: Hierarchy + ?Sized>(
        &mut self,
        hierarchy: &H,
        wire: WireId,
        tick: Tick,
        value: BitVector,
    ) {
        let Some(identity) = self.locate(hierarchy, wire) else {
            panic!(
                "change notification for untracked wire {wire} ({})",
                resolve(hierarchy, wire)
            );
        };
        let Some(entry) = self.entries.get_mut(&identity) else {
            unreachable!("located identity {identity} has no entry");
        };

        debug_assert!(
            entry.history.last_tick().is_none_or(|last| last <= tick),
            "tick went backwards for {identity}: {:?} then {tick}",
            entry.history.last_tick(),
        );
        tracing::trace!(%identity, tick, %value, "sample recorded");
        entry.history.push(tick, value);
    }

    // -------------------------------------------------------------------------
    // Read access
    // -------------------------------------------------------------------------

    /// Returns the number of tracked wires.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns true if an entry is stored under `identity`.
    #[must_use]
    pub fn contains(&self, identity: &str) -> bool {
        self.entries.contains_key(identity)
    }

    /// Returns true if `wire` is tracked, under whatever identity.
    #[must_use]
    pub fn is_tracked(&self, wire: WireId) -> bool {
        self.by_wire.contains_key(&wire)
    }

    /// Looks up an entry by identity.
    #[must_use]
    pub fn get(&self, identity: &str) -> Option<&TraceEntry> {
        self.entries.get(identity)
    }

    /// Looks up the entry tracking `wire`.
    #[must_use]
    pub fn entry_for(&self, wire: WireId) -> Option<&TraceEntry> {
        self.by_wire
            .get(&wire)
            .and_then(|identity| self.entries.get(identity))
    }

    /// Returns true if `id` is the change subscription of some entry.
    #[must_use]
    pub fn owns_subscription(&self, id: SubscriptionId) -> bool {
        self.by_subscription.contains_key(&id)
    }

    /// Returns the entries in the order they were tracked.
    pub fn entries(&self) -> impl Iterator<Item = &TraceEntry> {
        self.order
            .values()
            .filter_map(|identity| self.entries.get(identity))
    }

    /// Returns the stored identities in the order they were tracked.
    pub fn identities(&self) -> impl Iterator<Item = &SignalIdentity> {
        self.order.values()
    }

    /// Captures the tracked set for reading elsewhere.
    #[must_use]
    pub fn snapshot(&self) -> TraceSnapshot {
        TraceSnapshot {
            entries: self
                .entries()
                .map(|e| SnapshotEntry {
                    identity: e.identity.clone(),
                    wire: e.wire,
                    history: e.history.clone(),
                })
                .collect(),
        }
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    /// Returns the key currently storing the entry for `wire`, moving it
    /// under its recomputed identity first if the two differ.
    fn locate<H: Hierarchy + ?Sized>(&mut self, hierarchy: &H, wire: WireId) -> Option<SignalIdentity> {
        let stored = self.key_of(wire)?;
        Some(self.rekey(&stored, resolve(hierarchy, wire)))
    }

    fn key_of(&self, wire: WireId) -> Option<SignalIdentity> {
        self.by_wire.get(&wire).cloned()
    }

    /// Moves the entry stored under `from` to `to`. Keeps the old key if `to`
    /// is taken. Returns the key the entry ends up under.
    fn rekey(&mut self, from: &SignalIdentity, to: SignalIdentity) -> SignalIdentity {
        if *from == to {
            return to;
        }
        if self.entries.contains_key(&to) {
            tracing::warn!(%from, %to, "moved wire collides with a tracked identity; keeping old key");
            return from.clone();
        }
        let Some(mut entry) = self.entries.remove(from) else {
            return from.clone();
        };
        entry.identity = to.clone();
        self.order.insert(entry.seq, to.clone());
        let wire = entry.wire;
        self.by_wire.insert(wire, to.clone());
        self.entries.insert(to.clone(), entry);
        tracing::debug!(%from, %to, %wire, "tracked wire moved");

        self.listeners.emit(&MonitorEvent::Moved {
            wire,
            from: from.clone(),
            to: to.clone(),
        });
        to
    }

    fn remove_entry(&mut self, identity: &SignalIdentity) {
        let Some(wire) = self.entries.get(identity).map(|e| e.wire) else {
            return;
        };
        self.listeners.emit(&MonitorEvent::Removed {
            wire,
            identity: identity.clone(),
        });
        if let Some(entry) = self.entries.remove(identity) {
            self.order.remove(&entry.seq);
            self.by_wire.remove(&wire);
            self.by_subscription.remove(&entry.subscription.id());
            tracing::debug!(%identity, %wire, samples = entry.history.len(), "signal untracked");
            // Dropping the entry releases its change subscription.
            drop(entry);
        }
    }
}

impl Default for TraceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Observable<MonitorEvent> for TraceRegistry {
    fn subscribe(&self, handler: Box<dyn FnMut(&MonitorEvent)>) -> Subscription {
        self.listeners.add(handler)
    }
}

impl fmt::Debug for TraceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TraceRegistry")
            .field("entries", &self.order.values().collect::<Vec<_>>())
            .field("observers", &self.listeners.len())
            .finish()
    }
}
