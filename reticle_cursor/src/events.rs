// Copyright 2025 the Reticle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cursor notifications and the observer registry that delivers them.
//!
//! Each [`Reconciler`](crate::reconcile::Reconciler) owns its own [`Subscribers`];
//! there is no global event bus. Listeners are called synchronously, in subscription
//! order, for every event of a frame, and events are emitted in frame order:
//! hover stop, then hover start, then the move notification.
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use reticle_cursor::events::{CursorEvent, Subscribers};
//!
//! let seen = Rc::new(RefCell::new(Vec::new()));
//! let mut subs: Subscribers<u32> = Subscribers::new();
//! let sink = Rc::clone(&seen);
//! let id = subs.subscribe(move |e: &CursorEvent<u32>| {
//!     if let CursorEvent::HoverStop { target } = e {
//!         sink.borrow_mut().push(*target);
//!     }
//! });
//!
//! subs.emit(&CursorEvent::HoverStop { target: 9 });
//! assert!(subs.unsubscribe(id));
//! subs.emit(&CursorEvent::HoverStop { target: 10 });
//! assert_eq!(*seen.borrow(), vec![9]);
//! ```

use std::fmt;

use crate::types::{ControllerRay, CursorPose, PreciseHit, RaycastDetail};

/// A notification from one frame of the cursor.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum CursorEvent<K> {
    /// Emitted every frame, after any hover transitions.
    Moved {
        /// Controller ray used this frame.
        ray: ControllerRay,
        /// Final cursor pose.
        pose: CursorPose,
        /// Which raycast placed the cursor; `None` on a miss.
        detail: Option<RaycastDetail<K>>,
    },
    /// The cursor started hovering `target`.
    HoverStart {
        /// Newly hovered object.
        target: K,
        /// Cursor pose on the object.
        pose: CursorPose,
        /// The precise hit that started the hover.
        hit: PreciseHit<K>,
    },
    /// The cursor stopped hovering `target`.
    HoverStop {
        /// Previously hovered object.
        target: K,
    },
}

/// Handle returned by [`Subscribers::subscribe`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

type Listener<K> = Box<dyn FnMut(&CursorEvent<K>)>;

/// Ordered set of event listeners.
pub struct Subscribers<K> {
    listeners: Vec<(SubscriptionId, Listener<K>)>,
    next_id: u64,
}

impl<K> Default for Subscribers<K> {
    fn default() -> Self {
        Self {
            listeners: Vec::new(),
            next_id: 0,
        }
    }
}

impl<K> Subscribers<K> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener`; it is called after all earlier listeners.
    pub fn subscribe(&mut self, listener: impl FnMut(&CursorEvent<K>) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns `false` if `id` was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(i, _)| *i != id);
        self.listeners.len() != before
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Whether no listener is registered.
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Deliver `event` to every listener. A no-op with no listeners.
    pub fn emit(&mut self, event: &CursorEvent<K>) {
        for (_, listener) in &mut self.listeners {
            listener(event);
        }
    }
}

impl<K> fmt::Debug for Subscribers<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscribers")
            .field("len", &self.listeners.len())
            .field("next_id", &self.next_id)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn stop(target: u32) -> CursorEvent<u32> {
        CursorEvent::HoverStop { target }
    }

    #[test]
    fn emit_without_listeners_is_noop() {
        let mut subs: Subscribers<u32> = Subscribers::new();
        assert!(subs.is_empty());
        subs.emit(&stop(1));
    }

    #[test]
    fn listeners_run_in_subscription_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut subs: Subscribers<u32> = Subscribers::new();
        for tag in ["a", "b", "c"] {
            let log = Rc::clone(&log);
            subs.subscribe(move |_| log.borrow_mut().push(tag));
        }
        subs.emit(&stop(1));
        assert_eq!(*log.borrow(), ["a", "b", "c"]);
        assert_eq!(subs.len(), 3);
    }

    #[test]
    fn unsubscribe_is_targeted() {
        let count = Rc::new(RefCell::new(0_u32));
        let mut subs: Subscribers<u32> = Subscribers::new();
        let c1 = Rc::clone(&count);
        let first = subs.subscribe(move |_| *c1.borrow_mut() += 1);
        let c2 = Rc::clone(&count);
        let second = subs.subscribe(move |_| *c2.borrow_mut() += 10);
        assert_ne!(first, second);

        assert!(subs.unsubscribe(first));
        assert!(!subs.unsubscribe(first), "already removed");
        subs.emit(&stop(2));
        assert_eq!(*count.borrow(), 10);
    }

    #[test]
    fn ids_are_not_reused() {
        let mut subs: Subscribers<u32> = Subscribers::new();
        let a = subs.subscribe(|_| {});
        subs.unsubscribe(a);
        let b = subs.subscribe(|_| {});
        assert_ne!(a, b);
    }
}
