// Copyright 2025 the Reticle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Single-slot, latest-value-wins mailbox for environment raycast results.
//!
//! The raycast service delivers on its own thread; the frame loop reads on another.
//! Each delivery replaces the slot with a fresh `Arc` in one atomic swap, so a reader
//! always sees a complete result (possibly stale, possibly absent) and never blocks.
//!
//! ```
//! use reticle_cursor::mailbox::ResultMailbox;
//! use reticle_cursor::types::{EnvironmentHit, EnvironmentStatus};
//!
//! let mailbox = ResultMailbox::new();
//! assert!(mailbox.latest().is_none());
//!
//! let writer = mailbox.clone();
//! writer.deliver(EnvironmentHit::empty(EnvironmentStatus::NoCollision));
//! writer.deliver(EnvironmentHit::empty(EnvironmentStatus::Failed));
//! assert_eq!(mailbox.latest().unwrap().status, EnvironmentStatus::Failed);
//! ```

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use arc_swap::ArcSwapOption;

use crate::types::EnvironmentHit;

/// Shared handle to the latest environment result. Cloning shares the slot.
#[derive(Clone, Default)]
pub struct ResultMailbox {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    slot: ArcSwapOption<EnvironmentHit>,
    closed: AtomicBool,
    delivered: AtomicU64,
}

impl ResultMailbox {
    /// Create an empty, open mailbox.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the stored result. Returns `false` and drops `hit` once closed.
    pub fn deliver(&self, hit: EnvironmentHit) -> bool {
        if self.inner.closed.load(Ordering::SeqCst) {
            return false;
        }
        self.inner.slot.store(Some(Arc::new(hit)));
        // A close that raced the check above may have cleared the slot before our store.
        if self.inner.closed.load(Ordering::SeqCst) {
            self.inner.slot.store(None);
            return false;
        }
        self.inner.delivered.fetch_add(1, Ordering::Relaxed);
        true
    }

    /// Snapshot of the most recent result, if any has arrived.
    pub fn latest(&self) -> Option<EnvironmentHit> {
        self.inner.slot.load().as_deref().copied()
    }

    /// Number of results accepted so far.
    pub fn deliveries(&self) -> u64 {
        self.inner.delivered.load(Ordering::Relaxed)
    }

    /// Refuse further deliveries and drop the stored result.
    pub fn close(&self) {
        self.inner.closed.store(true, Ordering::SeqCst);
        self.inner.slot.store(None);
    }

    /// Whether [`close`](Self::close) has been called on any clone.
    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::Acquire)
    }
}

impl fmt::Debug for ResultMailbox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResultMailbox")
            .field("latest", &self.latest())
            .field("deliveries", &self.deliveries())
            .field("closed", &self.is_closed())
            .finish()
    }
}
