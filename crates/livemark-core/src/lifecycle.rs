//! Lifecycle hooks.
//!
//! Three channels bracket every render:
//!
//! - [`LifecycleEvent::BeforeRender`] fires before segmentation begins;
//! - [`LifecycleEvent::Render`] fires after the new output was committed to the display surface;
//! - [`LifecycleEvent::Change`] fires whenever the buffer actually changed, before the render.
//!
//! Subscriptions are persistent ([`LifecycleHub::on`]) or one-shot ([`LifecycleHub::once`]), and
//! can be removed with [`LifecycleHub::off`]. Callbacks run in subscription order.

use crate::edits::EditQueue;
use std::fmt;

/// A hook channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleEvent {
    /// Before segmentation starts.
    BeforeRender,
    /// After the output was committed.
    Render,
    /// After a content change, before its render.
    Change,
}

/// Handle returned by [`LifecycleHub::on`] and [`LifecycleHub::once`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

/// Payload passed to hook callbacks.
#[derive(Debug, Clone, Copy)]
pub struct HookEvent<'a> {
    /// The channel that fired.
    pub event: LifecycleEvent,
    /// Buffer content at the time of firing (the new content for [`LifecycleEvent::Change`]).
    pub content: &'a str,
}

/// Hook callback type.
pub type HookCallback = Box<dyn FnMut(&HookEvent<'_>, &mut EditQueue)>;

struct Subscription {
    id: SubscriptionId,
    event: LifecycleEvent,
    once: bool,
    callback: HookCallback,
}

/// Ordered hook registry.
#[derive(Default)]
pub struct LifecycleHub {
    next_id: u64,
    subscriptions: Vec<Subscription>,
}

impl LifecycleHub {
    /// Create an empty hub.
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe until removed with [`LifecycleHub::off`].
    pub fn on<F>(&mut self, event: LifecycleEvent, callback: F) -> SubscriptionId
    where
        F: FnMut(&HookEvent<'_>, &mut EditQueue) + 'static,
    {
        self.subscribe(event, false, Box::new(callback))
    }

    /// Subscribe for the next firing only.
    pub fn once<F>(&mut self, event: LifecycleEvent, callback: F) -> SubscriptionId
    where
        F: FnMut(&HookEvent<'_>, &mut EditQueue) + 'static,
    {
        self.subscribe(event, true, Box::new(callback))
    }

    fn subscribe(
        &mut self,
        event: LifecycleEvent,
        once: bool,
        callback: HookCallback,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscriptions.push(Subscription {
            id,
            event,
            once,
            callback,
        });
        id
    }

    /// Remove a subscription. Returns `false` if it was already gone.
    pub fn off(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|sub| sub.id != id);
        self.subscriptions.len() != before
    }

    /// Number of live subscriptions on `event`.
    pub fn subscriber_count(&self, event: LifecycleEvent) -> usize {
        self.subscriptions
            .iter()
            .filter(|sub| sub.event == event)
            .count()
    }

    /// Fire `event`; one-shot subscriptions are removed after running.
    pub fn emit(&mut self, event: LifecycleEvent, content: &str, queue: &mut EditQueue) {
        let hook = HookEvent { event, content };
        self.subscriptions.retain_mut(|sub| {
            if sub.event != event {
                return true;
            }
            (sub.callback)(&hook, queue);
            !sub.once
        });
    }
}

impl fmt::Debug for LifecycleHub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LifecycleHub")
            .field("subscriptions", &self.subscriptions.len())
            .finish()
    }
}
