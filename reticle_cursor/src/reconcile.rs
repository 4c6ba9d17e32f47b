// Copyright 2025 the Reticle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cursor reconciliation: fuse the environment raycast with a precise scene cast.
//!
//! [`Reconciler::advance`] runs once per frame:
//!
//! 1. A baseline comes from the latest environment result. A hit places the cursor on
//!    the surface facing along its normal; anything else places it `default_distance`
//!    along the ray, facing back at the controller. Close hits shrink the cursor.
//! 2. A precise cast runs along the same ray, bounded by the distance to the baseline.
//!    A hit there overrides the baseline pose, scale and feedback.
//! 3. The outcome (object hit, world-mesh hit, or miss) drives hover bookkeeping and
//!    events: hover stop, then hover start, then a move notification.
//!
//! A miss additionally pulls the cursor in to `miss_distance` so it stays visible.
//!
//! ## Minimal example
//!
//! ```
//! use glam::Vec3;
//! use reticle_cursor::config::CursorConfig;
//! use reticle_cursor::reconcile::{Reconciler, SceneRaycaster};
//! use reticle_cursor::types::{ControllerRay, Outcome, PreciseHit};
//!
//! // A scene with one object, "door" (id 7), 0.3 units ahead.
//! struct Door;
//! impl SceneRaycaster<u32> for Door {
//!     fn cast_ray(&self, ray: &ControllerRay, max: f32) -> Option<PreciseHit<u32>> {
//!         (0.3 <= max).then(|| PreciseHit {
//!             target: 7,
//!             point: ray.at(0.3),
//!             normal: -ray.direction(),
//!             distance: 0.3,
//!         })
//!     }
//! }
//!
//! let mut cursor = Reconciler::new(CursorConfig::default()).unwrap();
//! let ray = ControllerRay::new(Vec3::ZERO, Vec3::NEG_Z).unwrap();
//! let frame = cursor.advance(&Door, ray, None);
//! assert_eq!(frame.outcome, Outcome::ObjectHit);
//! assert_eq!(frame.pose.scale, Vec3::splat(0.3));
//! assert_eq!(cursor.hovered(), Some(7));
//! ```

use core::fmt;

use glam::Vec3;
use tracing::{debug, trace};

use crate::config::CursorConfig;
use crate::error::CursorError;
use crate::events::{CursorEvent, SubscriptionId, Subscribers};
use crate::hover::{HoverState, HoverTransition};
use crate::types::{
    ControllerRay, CursorPose, EnvironmentHit, EnvironmentStatus, Frame, LineSegment, Outcome,
    PreciseHit, RaycastDetail, VisualFeedback,
};

/// Synchronous precise raycast against scene objects.
///
/// Implementations must not report hits farther than `max_distance`; the reconciler
/// also discards any that are.
pub trait SceneRaycaster<K> {
    /// Nearest hit along `ray` within `max_distance`.
    fn cast_ray(&self, ray: &ControllerRay, max_distance: f32) -> Option<PreciseHit<K>>;
}

impl<K, T: SceneRaycaster<K> + ?Sized> SceneRaycaster<K> for &T {
    fn cast_ray(&self, ray: &ControllerRay, max_distance: f32) -> Option<PreciseHit<K>> {
        (**self).cast_ray(ray, max_distance)
    }
}

/// A scene with nothing in it.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoScene;

impl<K> SceneRaycaster<K> for NoScene {
    fn cast_ray(&self, _: &ControllerRay, _: f32) -> Option<PreciseHit<K>> {
        None
    }
}

/// The cursor reconciliation state machine.
///
/// Owns the hover target, the event subscribers and the last computed frame.
pub struct Reconciler<K: Copy + Eq> {
    config: CursorConfig,
    hover: HoverState<K>,
    subscribers: Subscribers<K>,
    last: Option<Frame<K>>,
}

impl<K: Copy + Eq + fmt::Debug> fmt::Debug for Reconciler<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reconciler")
            .field("config", &self.config)
            .field("hover", &self.hover)
            .field("subscribers", &self.subscribers)
            .field("last", &self.last)
            .finish()
    }
}

impl<K: Copy + Eq + fmt::Debug> Reconciler<K> {
    /// Create a reconciler after validating `config`.
    pub fn new(config: CursorConfig) -> Result<Self, CursorError> {
        config.validate()?;
        Ok(Self {
            config,
            hover: HoverState::new(),
            subscribers: Subscribers::new(),
            last: None,
        })
    }

    /// Active configuration.
    pub fn config(&self) -> &CursorConfig {
        &self.config
    }

    /// Currently hovered target.
    pub fn hovered(&self) -> Option<K> {
        self.hover.current()
    }

    /// Result of the most recent [`advance`](Self::advance), if any.
    pub fn last_frame(&self) -> Option<&Frame<K>> {
        self.last.as_ref()
    }

    /// Register an event listener.
    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&CursorEvent<K>) + 'static,
    ) -> SubscriptionId {
        self.subscribers.subscribe(listener)
    }

    /// Remove an event listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    /// Run one frame.
    ///
    /// `environment` is the latest environment result, however stale; `None` is treated
    /// the same as [`EnvironmentStatus::NoCollision`]. Events are delivered to listeners
    /// before this returns and are also recorded on the returned frame.
    pub fn advance<S: SceneRaycaster<K> + ?Sized>(
        &mut self,
        scene: &S,
        ray: ControllerRay,
        environment: Option<&EnvironmentHit>,
    ) -> &Frame<K> {
        let origin = ray.origin();
        let env_hit = environment.filter(|e| e.status.is_hit());

        // Baseline from the environment.
        let (mut pose, mut feedback) = match env_hit {
            Some(e) => {
                let mut pose = CursorPose::facing(e.point, e.normal);
                pose.scale = self.close_scale(e.distance);
                let feedback = if e.status == EnvironmentStatus::HitObserved {
                    VisualFeedback::ObservedHit
                } else {
                    VisualFeedback::UnobservedHit
                };
                (pose, feedback)
            }
            None => {
                let end = ray.at(self.config.default_distance);
                (CursorPose::facing(end, origin - end), VisualFeedback::Miss)
            }
        };
        let baseline_end = pose.position;

        // Precise override, never farther than the baseline.
        let max_distance = origin.distance(baseline_end);
        let precise = scene
            .cast_ray(&ray, max_distance)
            .filter(|h| h.distance <= max_distance);
        if let Some(hit) = &precise {
            pose = CursorPose::facing(hit.point, hit.normal);
            pose.scale = self.close_scale(hit.distance);
            feedback = VisualFeedback::ObjectHit;
        }

        let outcome = match (&precise, env_hit) {
            (Some(_), _) => Outcome::ObjectHit,
            (None, Some(_)) => Outcome::WorldMesh,
            (None, None) => Outcome::Miss,
        };

        let line = LineSegment {
            start: origin,
            end: precise.as_ref().map_or(baseline_end, |h| h.point),
            width: self.config.line_width,
        };

        if outcome == Outcome::Miss {
            pose.position = ray.at(self.config.miss_distance);
        }

        let mut events = Vec::with_capacity(3);
        for transition in self.hover.update(precise.as_ref().map(|h| h.target)) {
            match transition {
                HoverTransition::Stop(target) => {
                    debug!(?target, "hover stop");
                    events.push(CursorEvent::HoverStop { target });
                }
                HoverTransition::Start(target) => {
                    // Start only follows a precise hit on `target`.
                    let Some(hit) = precise else { continue };
                    debug!(?target, distance = hit.distance, "hover start");
                    events.push(CursorEvent::HoverStart { target, pose, hit });
                }
            }
        }
        let detail = match outcome {
            Outcome::ObjectHit => precise.map(RaycastDetail::Precise),
            Outcome::WorldMesh => env_hit.copied().map(RaycastDetail::Environment),
            Outcome::Miss => None,
        };
        events.push(CursorEvent::Moved { ray, pose, detail });

        trace!(
            ?outcome,
            ?feedback,
            position = ?pose.position,
            env_status = ?environment.map(|e| e.status),
            "cursor frame"
        );

        for event in &events {
            self.subscribers.emit(event);
        }

        self.last.insert(Frame {
            pose,
            feedback,
            tint: feedback.tint(&self.config.palette),
            line,
            outcome,
            hovered: self.hover.current(),
            events,
        })
    }

    fn close_scale(&self, distance: f32) -> Vec3 {
        if self.config.scale_when_close && distance < self.config.close_scale_threshold {
            Vec3::splat(distance)
        } else {
            Vec3::ONE
        }
    }
}
