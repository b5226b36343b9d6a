//! Listener plumbing shared by the retry runner and the balance gate.
//!
//! Components report what they did as events. Suites subscribe when the
//! component is built and decide what to do with them: log them, count them
//! or attach them to a report.

use std::fmt;
use std::marker::PhantomData;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

/// Something a harness component reports.
pub trait HarnessEvent: fmt::Debug + Send + Sync {
    /// Variant name, such as `"Retry"` or `"Blocked"`.
    fn event_type(&self) -> &'static str;

    fn timestamp(&self) -> Instant;

    /// Name of the retry configuration or gate that emitted the event.
    fn source_name(&self) -> &str;
}

/// Receives events of type `E`.
pub trait EventListener<E: HarnessEvent>: Send + Sync {
    fn on_event(&self, event: &E);
}

/// Listeners subscribed to one component instance.
pub struct EventListeners<E: HarnessEvent> {
    subscribers: Vec<Arc<dyn EventListener<E>>>,
}

impl<E: HarnessEvent> EventListeners<E> {
    pub fn new() -> Self {
        Self {
            subscribers: Vec::new(),
        }
    }

    /// Subscribes `listener`.
    pub fn add<L>(&mut self, listener: L)
    where
        L: EventListener<E> + 'static,
    {
        self.subscribers.push(Arc::new(listener));
    }

    /// Delivers `event` to every subscriber in subscription order and
    /// returns how many handled it.
    ///
    /// A subscriber that panics is not counted; the others still receive the
    /// event and the emitting component carries on.
    pub fn emit(&self, event: &E) -> usize {
        self.subscribers
            .iter()
            .filter(|subscriber| {
                panic::catch_unwind(AssertUnwindSafe(|| subscriber.on_event(event))).is_ok()
            })
            .count()
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}

impl<E: HarnessEvent> Clone for EventListeners<E> {
    fn clone(&self) -> Self {
        Self {
            subscribers: self.subscribers.clone(),
        }
    }
}

impl<E: HarnessEvent> Default for EventListeners<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: HarnessEvent> fmt::Debug for EventListeners<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EventListeners({} subscribed)", self.subscribers.len())
    }
}

/// Adapts a closure into an [`EventListener`].
pub struct FnListener<E, F> {
    callback: F,
    event: PhantomData<fn(&E)>,
}

impl<E, F> FnListener<E, F>
where
    F: Fn(&E) + Send + Sync,
{
    pub fn new(callback: F) -> Self {
        Self {
            callback,
            event: PhantomData,
        }
    }
}

impl<E, F> EventListener<E> for FnListener<E, F>
where
    E: HarnessEvent,
    F: Fn(&E) + Send + Sync,
{
    fn on_event(&self, event: &E) {
        (self.callback)(event);
    }
}
