// Copyright 2026 the Stagecraft Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-node event subscriptions.
//!
//! Handlers are bound to an [`EventKind`] and invoked synchronously, in
//! subscription order, each time a matching [`NodeEvent`] is triggered.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use crate::id::NodeId;

/// Event categories a handler can subscribe to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// The simulation tick.
    Update,
    /// A collision target started overlapping.
    CollisionEnter,
    /// A collision target is overlapping (fired every tick, including the
    /// entering one).
    Collision,
    /// A collision target stopped overlapping.
    CollisionExit,
    /// A sprite-sheet animation wrapped from its last frame to its first.
    AnimationEnd,
}

/// An event delivered to node handlers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeEvent {
    /// The simulation tick.
    Update,
    /// `target` started overlapping.
    CollisionEnter(NodeId),
    /// `target` is overlapping.
    Collision(NodeId),
    /// `target` stopped overlapping.
    CollisionExit(NodeId),
    /// The running animation wrapped.
    AnimationEnd,
}

impl NodeEvent {
    /// Returns the subscription category of this event.
    #[must_use]
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::Update => EventKind::Update,
            Self::CollisionEnter(_) => EventKind::CollisionEnter,
            Self::Collision(_) => EventKind::Collision,
            Self::CollisionExit(_) => EventKind::CollisionExit,
            Self::AnimationEnd => EventKind::AnimationEnd,
        }
    }
}

type Handler = Box<dyn FnMut(&NodeEvent)>;

/// An ordered list of event handlers.
#[derive(Default)]
pub struct EventHandlers {
    handlers: Vec<(EventKind, Handler)>,
}

impl fmt::Debug for EventHandlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventHandlers")
            .field("len", &self.handlers.len())
            .finish_non_exhaustive()
    }
}

impl EventHandlers {
    /// Subscribes `handler` to events of `kind`.
    pub fn bind(&mut self, kind: EventKind, handler: impl FnMut(&NodeEvent) + 'static) {
        self.handlers.push((kind, Box::new(handler)));
    }

    /// Removes every handler bound to `kind`.
    pub fn unbind(&mut self, kind: EventKind) {
        self.handlers.retain(|(k, _)| *k != kind);
    }

    /// Invokes every handler subscribed to the event's kind, in order.
    pub fn trigger(&mut self, event: &NodeEvent) {
        let kind = event.kind();
        for (k, handler) in &mut self.handlers {
            if *k == kind {
                handler(event);
            }
        }
    }

    /// Number of bound handlers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Whether no handlers are bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use alloc::vec;
    use core::cell::RefCell;

    #[test]
    fn handlers_run_in_subscription_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut handlers = EventHandlers::default();
        for tag in [1, 2, 3] {
            let log = log.clone();
            handlers.bind(EventKind::Update, move |_| log.borrow_mut().push(tag));
        }
        handlers.trigger(&NodeEvent::Update);
        assert_eq!(*log.borrow(), vec![1, 2, 3]);
    }

    #[test]
    fn only_matching_kind_fires() {
        let hits = Rc::new(RefCell::new(0));
        let mut handlers = EventHandlers::default();
        let h = hits.clone();
        handlers.bind(EventKind::AnimationEnd, move |_| *h.borrow_mut() += 1);
        handlers.trigger(&NodeEvent::Update);
        handlers.trigger(&NodeEvent::AnimationEnd);
        assert_eq!(*hits.borrow(), 1);
    }

    #[test]
    fn unbind_removes_kind() {
        let mut handlers = EventHandlers::default();
        handlers.bind(EventKind::Update, |_| {});
        handlers.bind(EventKind::Collision, |_| {});
        handlers.unbind(EventKind::Update);
        assert_eq!(handlers.len(), 1);
    }
}
