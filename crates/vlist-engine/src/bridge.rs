//! External event bridge.
//!
//! Two directions cross here. Outbound, the engine publishes
//! [`EngineEvent`]s to in-process subscribers through an [`EventBus`].
//! Inbound, other components steer the list by pushing [`ScrollRequest`]s
//! into a named channel held by a [`ChannelRegistry`]; the engine drains
//! its inbox on the next tick. The registry holds only weak references, so
//! an unmounted engine's channel goes dead instead of keeping it alive.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::rc::{Rc, Weak};

use vlist_core::{Alignment, ScrollSnapshot};

/// Events published by the engine after render and scroll transitions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EngineEvent {
    /// The materialized range changed; carries the new scroll state.
    RangeChanged(ScrollSnapshot),
    /// The collection's last item just became materialized.
    ///
    /// Fires only on the transition into visibility, not on every render
    /// while the bottom stays in view. Hosts use it for tail loading.
    LastItemVisible,
}

/// Handle identifying a bus subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

/// Single-threaded fan-out of [`EngineEvent`]s.
#[derive(Default)]
pub struct EventBus {
    next_id: u64,
    subscribers: Vec<(SubscriberId, Box<dyn FnMut(&EngineEvent)>)>,
}

impl EventBus {
    /// Register a callback; the returned id unsubscribes it later.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriberId
    where
        F: FnMut(&EngineEvent) + 'static,
    {
        let id = SubscriberId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Remove a subscription. Returns `false` for an unknown id.
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    /// Deliver `event` to every subscriber in registration order.
    pub fn emit(&mut self, event: &EngineEvent) {
        for (_, callback) in &mut self.subscribers {
            callback(event);
        }
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    /// Whether the bus has no subscribers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

/// A request to scroll an item into view, pushed through a named channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollRequest {
    /// Item index to bring into view. Out-of-range indexes are dropped by
    /// the engine when the request is drained.
    pub index: usize,
    /// Where the item should land in the viewport.
    pub alignment: Alignment,
}

impl ScrollRequest {
    /// Request `index` aligned to the viewport top.
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self {
            index,
            alignment: Alignment::Start,
        }
    }

    /// Override the alignment.
    #[must_use]
    pub const fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }
}

/// Inbox an engine drains for externally triggered scroll requests.
pub type ScrollInbox = Rc<RefCell<VecDeque<ScrollRequest>>>;

/// Named scroll channels shared by multiple list instances on a page.
///
/// Holds [`Weak`] inboxes: unmounting an engine drops the strong side and
/// the channel dies with it, so a stale id can never reach a torn-down
/// instance.
#[derive(Debug, Default)]
pub struct ChannelRegistry {
    channels: HashMap<String, Weak<RefCell<VecDeque<ScrollRequest>>>>,
}

impl ChannelRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `id` to an engine's inbox, replacing any previous binding.
    ///
    /// An empty id is ignored: such instances are reachable only through
    /// direct API calls.
    pub fn register(&mut self, id: impl Into<String>, inbox: &ScrollInbox) {
        let id = id.into();
        if id.is_empty() {
            return;
        }
        tracing::debug!(channel = %id, "scroll channel registered");
        self.channels.insert(id, Rc::downgrade(inbox));
    }

    /// Drop the binding for `id`, if any.
    pub fn unregister(&mut self, id: &str) {
        if self.channels.remove(id).is_some() {
            tracing::debug!(channel = %id, "scroll channel unregistered");
        }
    }

    /// Push a request into the channel `id`.
    ///
    /// Returns `false` when the channel is unknown or its engine is gone;
    /// a dead channel is pruned on the spot.
    pub fn trigger(&mut self, id: &str, request: ScrollRequest) -> bool {
        match self.channels.get(id).and_then(Weak::upgrade) {
            Some(inbox) => {
                inbox.borrow_mut().push_back(request);
                true
            }
            None => {
                if self.channels.remove(id).is_some() {
                    tracing::debug!(channel = %id, "scroll channel target gone, pruned");
                }
                false
            }
        }
    }

    /// Number of registered channels, dead or alive.
    #[must_use]
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    /// Whether no channels are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}
