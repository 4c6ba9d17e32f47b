// Copyright 2025 the Reticle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Single-target hover tracking.
//!
//! A spatial cursor hovers at most one object at a time. [`HoverState`] remembers
//! which, compares by identity, and turns a new frame's target into the transitions
//! needed to get there. When the target changes, the stop for the old target always
//! comes before the start for the new one, so listeners never see two active targets.
//!
//! ```
//! use reticle_cursor::hover::{HoverState, HoverTransition};
//! let mut h: HoverState<u32> = HoverState::new();
//! assert_eq!(h.update(Some(1)), vec![HoverTransition::Start(1)]);
//! assert_eq!(h.update(Some(1)), vec![]);
//! assert_eq!(h.update(Some(2)), vec![HoverTransition::Stop(1), HoverTransition::Start(2)]);
//! assert_eq!(h.update(None), vec![HoverTransition::Stop(2)]);
//! ```

/// Tracks the currently hovered target, if any.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HoverState<K: Copy + Eq> {
    current: Option<K>,
}

impl<K: Copy + Eq> Default for HoverState<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// A hover transition, returned by [`HoverState::update`] in emission order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HoverTransition<K> {
    /// The cursor left the given target.
    Stop(K),
    /// The cursor entered the given target.
    Start(K),
}

impl<K: Copy + Eq> HoverState<K> {
    /// Create a state with nothing hovered.
    pub fn new() -> Self {
        Self { current: None }
    }

    /// The hovered target, if any.
    pub fn current(&self) -> Option<K> {
        self.current
    }

    /// Forget the current target, returning its stop transition if there was one.
    pub fn clear(&mut self) -> Option<HoverTransition<K>> {
        self.current.take().map(HoverTransition::Stop)
    }

    /// Move to `target` and return the transitions required, stop before start.
    ///
    /// Returns nothing when `target` equals the current target.
    pub fn update(&mut self, target: Option<K>) -> Vec<HoverTransition<K>> {
        if self.current == target {
            return Vec::new();
        }
        let mut out = Vec::with_capacity(2);
        out.extend(self.clear());
        if let Some(next) = target {
            self.current = Some(next);
            out.push(HoverTransition::Start(next));
        }
        out
    }
}
