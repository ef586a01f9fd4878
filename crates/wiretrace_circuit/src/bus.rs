//! Subscription table and delivery queue.
//!
//! Events are queued per subscriber at publish time and handed out in
//! publish order. A delivery whose subscription was released after it was
//! queued is discarded, never returned.

use std::cell::RefCell;
use std::collections::{BTreeMap, VecDeque};
use std::fmt;
use std::rc::{Rc, Weak};

use wiretrace_foundation::{Delivery, SimEvent, Subscription, SubscriptionId, SurfaceId, WireId};

// =============================================================================
// Topic
// =============================================================================

/// What a subscription listens to.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Topic {
    /// New rendering surfaces.
    SurfaceAttached,
    /// Tracking toggles raised on one surface.
    TrackToggled(SurfaceId),
    /// Tick completion.
    PostTick,
    /// Value changes of one wire.
    Signal(WireId),
}

// =============================================================================
// Event Bus
// =============================================================================

#[derive(Default)]
struct Table {
    next_id: u64,
    topics: BTreeMap<SubscriptionId, Topic>,
}

/// Subscription table plus the queue of undelivered events.
pub struct EventBus {
    table: Rc<RefCell<Table>>,
    pending: VecDeque<Delivery>,
}

impl EventBus {
    /// Creates an empty bus.
    #[must_use]
    pub fn new() -> Self {
        Self {
            table: Rc::new(RefCell::new(Table::default())),
            pending: VecDeque::new(),
        }
    }

    /// Registers a subscriber for `topic`.
    pub fn subscribe(&self, topic: Topic) -> Subscription {
        let id = {
            let mut table = self.table.borrow_mut();
            let id = SubscriptionId::new(table.next_id);
            table.next_id += 1;
            table.topics.insert(id, topic);
            id
        };
        let weak: Weak<RefCell<Table>> = Rc::downgrade(&self.table);
        Subscription::new(id, move |id| {
            if let Some(table) = weak.upgrade() {
                table.borrow_mut().topics.remove(&id);
            }
        })
    }

    /// Queues `event` for every live subscriber of `topic`, oldest
    /// subscription first. Returns the number of deliveries queued.
    pub fn publish(&mut self, topic: Topic, event: &SimEvent) -> usize {
        let table = self.table.borrow();
        let mut queued = 0;
        for (id, _) in table.topics.iter().filter(|(_, t)| **t == topic) {
            self.pending.push_back(Delivery {
                subscription: *id,
                event: event.clone(),
            });
            queued += 1;
        }
        queued
    }

    /// Pops the oldest delivery whose subscription is still live.
    pub fn next(&mut self) -> Option<Delivery> {
        while let Some(delivery) = self.pending.pop_front() {
            if self.is_live(delivery.subscription) {
                return Some(delivery);
            }
            tracing::trace!(subscription = %delivery.subscription, "discarding delivery for released subscription");
        }
        None
    }

    /// Returns true if the subscription has not been released.
    #[must_use]
    pub fn is_live(&self, id: SubscriptionId) -> bool {
        self.table.borrow().topics.contains_key(&id)
    }

    /// Returns true if anyone listens to `topic`.
    #[must_use]
    pub fn has_subscribers(&self, topic: Topic) -> bool {
        self.table.borrow().topics.values().any(|t| *t == topic)
    }

    /// Returns the number of live subscriptions.
    #[must_use]
    pub fn subscription_count(&self) -> usize {
        self.table.borrow().topics.len()
    }

    /// Returns the number of queued deliveries, including ones that will be
    /// discarded.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriptions", &self.subscription_count())
            .field("pending", &self.pending.len())
            .finish()
    }
}
