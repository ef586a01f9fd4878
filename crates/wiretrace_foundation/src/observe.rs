//! Observer primitives.
//!
//! A [`Subscription`] is the explicit, bounded-lifetime handle for one
//! registered interest. Dropping it detaches the interest immediately, so
//! whoever stores the handle controls exactly how long notifications flow.
//!
//! [`Listeners`] is a synchronous callback list used for in-process
//! notifications; [`Mailbox`] buffers events for a consumer that handles
//! them later, outside the emitter's call stack.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::{Rc, Weak};

// =============================================================================
// Subscription
// =============================================================================

/// Identifier of a subscription, unique within the source that issued it.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Creates an identifier from a raw value.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sub#{}", self.0)
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Subscription({})", self.0)
    }
}

/// A registered interest in some notification.
///
/// Released on drop. The detach hook runs exactly once.
#[must_use = "dropping a Subscription detaches it immediately"]
pub struct Subscription {
    id: SubscriptionId,
    detach: Option<Box<dyn FnOnce(SubscriptionId)>>,
}

impl Subscription {
    /// Creates a subscription that calls `detach` when released.
    pub fn new(id: SubscriptionId, detach: impl FnOnce(SubscriptionId) + 'static) -> Self {
        Self {
            id,
            detach: Some(Box::new(detach)),
        }
    }

    /// Returns the identifier assigned by the issuing source.
    #[must_use]
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Releases the subscription now.
    pub fn cancel(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(detach) = self.detach.take() {
            detach(self.id);
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Subscription").field(&self.id).finish()
    }
}

// =============================================================================
// Observable
// =============================================================================

/// Capability of emitting events of type `E` to registered observers.
pub trait Observable<E> {
    /// Registers `handler`; it is called synchronously for every event until
    /// the returned subscription is dropped.
    fn subscribe(&self, handler: Box<dyn FnMut(&E)>) -> Subscription;
}

// =============================================================================
// Listeners
// =============================================================================

type Handler<E> = Rc<RefCell<Box<dyn FnMut(&E)>>>;

struct Slots<E> {
    next_id: u64,
    handlers: Vec<(SubscriptionId, Handler<E>)>,
}

impl<E> Slots<E> {
    fn contains(&self, id: SubscriptionId) -> bool {
        self.handlers.iter().any(|(slot, _)| *slot == id)
    }

    fn remove(&mut self, id: SubscriptionId) {
        self.handlers.retain(|(slot, _)| *slot != id);
    }
}

/// A synchronous list of event handlers.
///
/// Handlers run in subscription order. A handler may subscribe or release
/// subscriptions while an event is being emitted: a handler released during
/// an emit is not called for the rest of it. A handler must not re-emit into
/// the list it is being called from.
pub struct Listeners<E> {
    slots: Rc<RefCell<Slots<E>>>,
}

impl<E: 'static> Listeners<E> {
    /// Creates an empty handler list.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: Rc::new(RefCell::new(Slots {
                next_id: 0,
                handlers: Vec::new(),
            })),
        }
    }

    /// Registers a handler.
    pub fn add(&self, handler: Box<dyn FnMut(&E)>) -> Subscription {
        let id = {
            let mut slots = self.slots.borrow_mut();
            let id = SubscriptionId::new(slots.next_id);
            slots.next_id += 1;
            slots.handlers.push((id, Rc::new(RefCell::new(handler))));
            id
        };
        let weak: Weak<RefCell<Slots<E>>> = Rc::downgrade(&self.slots);
        Subscription::new(id, move |id| {
            if let Some(slots) = weak.upgrade() {
                slots.borrow_mut().remove(id);
            }
        })
    }

    /// Calls every live handler with `event`.
    pub fn emit(&self, event: &E) {
        let snapshot: Vec<(SubscriptionId, Handler<E>)> = self
            .slots
            .borrow()
            .handlers
            .iter()
            .map(|(id, handler)| (*id, Rc::clone(handler)))
            .collect();

        for (id, handler) in snapshot {
            if !self.slots.borrow().contains(id) {
                continue;
            }
            let mut handler = handler.borrow_mut();
            (&mut **handler)(event);
        }
    }

    /// Returns the number of live handlers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.borrow().handlers.len()
    }

    /// Returns true if no handler is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.borrow().handlers.is_empty()
    }
}

impl<E: 'static> Default for Listeners<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: 'static> Observable<E> for Listeners<E> {
    fn subscribe(&self, handler: Box<dyn FnMut(&E)>) -> Subscription {
        self.add(handler)
    }
}

impl<E> fmt::Debug for Listeners<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("handlers", &self.slots.borrow().handlers.len())
            .finish()
    }
}

// =============================================================================
// Mailbox
// =============================================================================

/// A FIFO of events copied out of an [`Observable`] for later handling.
#[derive(Clone)]
pub struct Mailbox<E> {
    queue: Rc<RefCell<VecDeque<E>>>,
}

impl<E: Clone + 'static> Mailbox<E> {
    /// Creates an empty mailbox.
    #[must_use]
    pub fn new() -> Self {
        Self {
            queue: Rc::new(RefCell::new(VecDeque::new())),
        }
    }

    /// Subscribes this mailbox to `source`.
    pub fn subscribe_to(&self, source: &(impl Observable<E> + ?Sized)) -> Subscription {
        let queue = Rc::clone(&self.queue);
        source.subscribe(Box::new(move |event: &E| {
            queue.borrow_mut().push_back(event.clone());
        }))
    }

    /// Removes and returns every buffered event, oldest first.
    pub fn drain(&self) -> Vec<E> {
        self.queue.borrow_mut().drain(..).collect()
    }

    /// Returns the number of buffered events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Returns true if nothing is buffered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.borrow().is_empty()
    }
}

impl<E: Clone + 'static> Default for Mailbox<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for Mailbox<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mailbox")
            .field("pending", &self.queue.borrow().len())
            .finish()
    }
}
