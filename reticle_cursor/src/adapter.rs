// Copyright 2025 the Reticle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Environment raycast adapter.
//!
//! Wraps a black-box asynchronous [`RaycastService`]: requests go out through
//! [`EnvironmentRaycaster::submit`], results come back whenever the service chooses by
//! writing into a shared [`ResultMailbox`]. The adapter makes no decisions; it only
//! forwards requests and exposes the latest result.
//!
//! ## Minimal example
//!
//! ```
//! use glam::Vec3;
//! use reticle_cursor::adapter::{EnvironmentRaycaster, RaycastParams, RaycastRequest, RaycastService};
//! use reticle_cursor::mailbox::ResultMailbox;
//! use reticle_cursor::types::{EnvironmentHit, EnvironmentStatus};
//!
//! // A service that answers immediately on the caller's thread.
//! struct Instant;
//! impl RaycastService for Instant {
//!     fn is_available(&self) -> bool { true }
//!     fn request(&self, req: RaycastRequest, reply: ResultMailbox) -> bool {
//!         reply.deliver(EnvironmentHit::hit(
//!             EnvironmentStatus::HitObserved,
//!             req.origin + req.direction * 3.0,
//!             -req.direction,
//!             3.0,
//!             0.9,
//!         ))
//!     }
//!     fn cancel_pending(&self) {}
//! }
//!
//! let mut caster = EnvironmentRaycaster::new(Instant);
//! assert!(caster.latest_result().is_none());
//! assert!(caster.submit(Vec3::ZERO, Vec3::NEG_Z, &RaycastParams::default()));
//! assert_eq!(caster.latest_result().unwrap().distance, 3.0);
//!
//! caster.shutdown();
//! caster.shutdown();
//! assert!(caster.latest_result().is_none());
//! ```

use glam::Vec3;
use tracing::{debug, trace};

use crate::config::CursorConfig;
use crate::mailbox::ResultMailbox;
use crate::types::EnvironmentHit;

/// Per-request parameters that do not change with the controller pose.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RaycastParams {
    /// Controller up direction.
    pub up: Vec3,
    /// Horizontal ray count.
    pub width: u32,
    /// Vertical ray count.
    pub height: u32,
    /// Horizontal field of view in degrees.
    pub horizontal_fov_degrees: f32,
    /// Report hits on unobserved surfaces.
    pub collide_with_unobserved: bool,
}

impl Default for RaycastParams {
    fn default() -> Self {
        Self::from_config(&CursorConfig::default(), Vec3::Y)
    }
}

impl RaycastParams {
    /// Take the request shape from `config` and the up vector from the controller.
    pub fn from_config(config: &CursorConfig, up: Vec3) -> Self {
        Self {
            up,
            width: config.width,
            height: config.height,
            horizontal_fov_degrees: config.horizontal_fov_degrees,
            collide_with_unobserved: config.collide_with_unobserved,
        }
    }
}

/// A fully specified request handed to the service.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RaycastRequest {
    /// Ray origin.
    pub origin: Vec3,
    /// Unit ray direction.
    pub direction: Vec3,
    /// Controller up direction.
    pub up: Vec3,
    /// Horizontal ray count.
    pub width: u32,
    /// Vertical ray count.
    pub height: u32,
    /// Horizontal field of view in degrees.
    pub horizontal_fov_degrees: f32,
    /// Report hits on unobserved surfaces.
    pub collide_with_unobserved: bool,
}

/// Asynchronous environment-mesh raycast service.
///
/// Implementations answer by calling [`ResultMailbox::deliver`] on the supplied handle,
/// from any thread and at any later time. They may also never answer.
pub trait RaycastService: Send + Sync {
    /// Whether requests can currently be served.
    fn is_available(&self) -> bool;

    /// Schedule `request`; return `false` if it was not accepted.
    fn request(&self, request: RaycastRequest, reply: ResultMailbox) -> bool;

    /// Abandon any request still in flight.
    fn cancel_pending(&self);
}

impl<S: RaycastService + ?Sized> RaycastService for Box<S> {
    fn is_available(&self) -> bool {
        (**self).is_available()
    }

    fn request(&self, request: RaycastRequest, reply: ResultMailbox) -> bool {
        (**self).request(request, reply)
    }

    fn cancel_pending(&self) {
        (**self).cancel_pending();
    }
}

/// The raycast source adapter.
///
/// Owns the result mailbox. Dropping the adapter shuts it down.
#[derive(Debug)]
pub struct EnvironmentRaycaster<S: RaycastService> {
    service: S,
    mailbox: ResultMailbox,
    shut_down: bool,
}

impl<S: RaycastService> EnvironmentRaycaster<S> {
    /// Wrap `service` with a fresh, empty mailbox.
    pub fn new(service: S) -> Self {
        Self {
            service,
            mailbox: ResultMailbox::new(),
            shut_down: false,
        }
    }

    /// Request a raycast. Silently does nothing (returns `false`) if the adapter is
    /// shut down, the service is unavailable or refuses, or the ray is degenerate.
    pub fn submit(&self, origin: Vec3, direction: Vec3, params: &RaycastParams) -> bool {
        if self.shut_down {
            debug!("environment raycast submitted after shutdown; ignored");
            return false;
        }
        if !origin.is_finite() {
            debug!(?origin, "non-finite raycast origin; ignored");
            return false;
        }
        let Some(direction) = direction.try_normalize() else {
            debug!(?direction, "degenerate raycast direction; ignored");
            return false;
        };
        if !self.service.is_available() {
            trace!("environment raycast service unavailable");
            return false;
        }
        let request = RaycastRequest {
            origin,
            direction,
            up: params.up,
            width: params.width,
            height: params.height,
            horizontal_fov_degrees: params.horizontal_fov_degrees,
            collide_with_unobserved: params.collide_with_unobserved,
        };
        self.service.request(request, self.mailbox.clone())
    }

    /// Most recent result, or `None` before the first arrives and after shutdown.
    pub fn latest_result(&self) -> Option<EnvironmentHit> {
        self.mailbox.latest()
    }

    /// Cancel pending work and stop accepting results. Idempotent.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.shut_down = true;
        self.service.cancel_pending();
        self.mailbox.close();
        debug!(
            deliveries = self.mailbox.deliveries(),
            "environment raycaster shut down"
        );
    }

    /// Whether [`shutdown`](Self::shutdown) has run.
    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    /// The mailbox results are delivered into.
    pub fn mailbox(&self) -> &ResultMailbox {
        &self.mailbox
    }

    /// The wrapped service.
    pub fn service(&self) -> &S {
        &self.service
    }
}

impl<S: RaycastService> Drop for EnvironmentRaycaster<S> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EnvironmentStatus;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    /// Holds requests until the test completes them, like a real async service.
    #[derive(Default)]
    struct Deferred {
        available: AtomicBool,
        pending: Mutex<Vec<(RaycastRequest, ResultMailbox)>>,
        cancels: AtomicUsize,
    }

    impl Deferred {
        fn up() -> Self {
            let s = Self::default();
            s.available.store(true, Ordering::SeqCst);
            s
        }

        fn complete_all(&self, status: EnvironmentStatus) -> usize {
            let pending = std::mem::take(&mut *self.pending.lock().unwrap());
            pending
                .into_iter()
                .filter(|(req, reply)| {
                    reply.deliver(EnvironmentHit::hit(
                        status,
                        req.origin + req.direction * 4.0,
                        -req.direction,
                        4.0,
                        0.5,
                    ))
                })
                .count()
        }
    }

    impl RaycastService for Deferred {
        fn is_available(&self) -> bool {
            self.available.load(Ordering::SeqCst)
        }

        fn request(&self, request: RaycastRequest, reply: ResultMailbox) -> bool {
            self.pending.lock().unwrap().push((request, reply));
            true
        }

        fn cancel_pending(&self) {
            self.cancels.fetch_add(1, Ordering::SeqCst);
            self.pending.lock().unwrap().clear();
        }
    }

    #[test]
    fn result_arrives_later() {
        let caster = EnvironmentRaycaster::new(Deferred::up());
        assert!(caster.submit(Vec3::ZERO, Vec3::new(0.0, 0.0, -2.0), &RaycastParams::default()));
        assert!(caster.latest_result().is_none(), "nothing before callback");
        assert_eq!(caster.service().complete_all(EnvironmentStatus::HitObserved), 1);
        let hit = caster.latest_result().unwrap();
        assert_eq!(hit.status, EnvironmentStatus::HitObserved);
        assert!((hit.point - Vec3::new(0.0, 0.0, -4.0)).length() < 1e-5);
    }

    #[test]
    fn request_carries_params() {
        let caster = EnvironmentRaycaster::new(Deferred::up());
        let config = CursorConfig {
            width: 3,
            height: 2,
            horizontal_fov_degrees: 30.0,
            collide_with_unobserved: true,
            ..CursorConfig::default()
        };
        let params = RaycastParams::from_config(&config, Vec3::X);
        caster.submit(Vec3::ONE, Vec3::Z, &params);
        let pending = caster.service().pending.lock().unwrap();
        let (req, _) = &pending[0];
        assert_eq!(req.up, Vec3::X);
        assert_eq!((req.width, req.height), (3, 2));
        assert_eq!(req.horizontal_fov_degrees, 30.0);
        assert!(req.collide_with_unobserved);
    }

    #[test]
    fn unavailable_or_degenerate_is_noop() {
        let caster = EnvironmentRaycaster::new(Deferred::default());
        assert!(!caster.submit(Vec3::ZERO, Vec3::NEG_Z, &RaycastParams::default()));

        let caster = EnvironmentRaycaster::new(Deferred::up());
        assert!(!caster.submit(Vec3::ZERO, Vec3::ZERO, &RaycastParams::default()));
        assert!(!caster.submit(Vec3::splat(f32::NAN), Vec3::Z, &RaycastParams::default()));
        assert!(caster.service().pending.lock().unwrap().is_empty());
    }

    #[test]
    fn shutdown_is_idempotent_and_drops_late_results() {
        let mut caster = EnvironmentRaycaster::new(Deferred::up());
        caster.submit(Vec3::ZERO, Vec3::NEG_Z, &RaycastParams::default());
        // Keep a handle to the reply so a late callback can be simulated.
        let late = caster.service().pending.lock().unwrap()[0].1.clone();

        caster.shutdown();
        caster.shutdown();
        assert!(caster.is_shut_down());
        assert_eq!(caster.service().cancels.load(Ordering::SeqCst), 1);

        assert!(!late.deliver(EnvironmentHit::empty(EnvironmentStatus::NoCollision)));
        assert!(caster.latest_result().is_none());
        assert!(!caster.submit(Vec3::ZERO, Vec3::NEG_Z, &RaycastParams::default()));
    }

    #[test]
    fn boxed_service() {
        let caster: EnvironmentRaycaster<Box<dyn RaycastService>> =
            EnvironmentRaycaster::new(Box::new(Deferred::up()));
        assert!(caster.submit(Vec3::ZERO, Vec3::X, &RaycastParams::default()));
    }
}
