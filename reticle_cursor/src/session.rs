// Copyright 2025 the Reticle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-frame driver wiring the collaborators together.
//!
//! A [`CursorSession`] samples the controller, submits an environment raycast for the
//! current pose, reconciles against the latest result that has arrived, and hands the
//! frame to a [`CursorSink`]. Build one with [`SessionBuilder`]; a missing controller
//! or raycast service is reported at build time, never mid-frame.
//!
//! When the controller pose is unavailable or degenerate, the frame still runs: the
//! last good ray is reused against an empty scene with no environment result, which
//! lands in the miss branch and releases any hover.

use core::fmt;

use tracing::{debug, warn};

use crate::adapter::{EnvironmentRaycaster, RaycastParams, RaycastService};
use crate::config::CursorConfig;
use crate::error::CursorError;
use crate::events::{CursorEvent, SubscriptionId};
use crate::reconcile::{NoScene, Reconciler, SceneRaycaster};
use crate::types::{ControllerPose, ControllerRay, Frame};

/// Supplies the controller pose each frame.
pub trait ControllerSource {
    /// Current pose, or `None` if tracking is lost.
    fn pose(&self) -> Option<ControllerPose>;
}

impl<F: Fn() -> Option<ControllerPose>> ControllerSource for F {
    fn pose(&self) -> Option<ControllerPose> {
        self()
    }
}

/// Receives each frame's render state.
pub trait CursorSink<K> {
    /// Draw `frame`.
    fn present(&mut self, frame: &Frame<K>);
}

/// A sink that draws nothing.
#[derive(Copy, Clone, Debug, Default)]
pub struct NullSink;

impl<K> CursorSink<K> for NullSink {
    fn present(&mut self, _: &Frame<K>) {}
}

/// Builder for [`CursorSession`].
pub struct SessionBuilder<C, S, R = NullSink> {
    config: CursorConfig,
    controller: Option<C>,
    service: Option<S>,
    sink: R,
}

impl<C, S> Default for SessionBuilder<C, S> {
    fn default() -> Self {
        Self {
            config: CursorConfig::default(),
            controller: None,
            service: None,
            sink: NullSink,
        }
    }
}

impl<C, S> SessionBuilder<C, S> {
    /// Start with the default configuration and no collaborators.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C, S, R> SessionBuilder<C, S, R> {
    /// Replace the configuration.
    pub fn config(mut self, config: CursorConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the controller pose source. Required.
    pub fn controller(mut self, controller: C) -> Self {
        self.controller = Some(controller);
        self
    }

    /// Set the environment raycast service. Required.
    pub fn service(mut self, service: S) -> Self {
        self.service = Some(service);
        self
    }

    /// Set the render sink. Defaults to [`NullSink`].
    pub fn sink<R2>(self, sink: R2) -> SessionBuilder<C, S, R2> {
        SessionBuilder {
            config: self.config,
            controller: self.controller,
            service: self.service,
            sink,
        }
    }
}

impl<C: ControllerSource, S: RaycastService, R> SessionBuilder<C, S, R> {
    /// Validate the configuration and collaborators and build the session.
    pub fn build<K: Copy + Eq + fmt::Debug>(self) -> Result<CursorSession<K, C, S, R>, CursorError>
    where
        R: CursorSink<K>,
    {
        let controller = self
            .controller
            .ok_or(CursorError::MissingCollaborator("controller source"))?;
        let service = self
            .service
            .ok_or(CursorError::MissingCollaborator("environment raycast service"))?;
        let reconciler = Reconciler::new(self.config)?;
        Ok(CursorSession {
            controller,
            raycaster: EnvironmentRaycaster::new(service),
            reconciler,
            sink: self.sink,
            last_ray: ControllerRay::default(),
            tracking: true,
        })
    }
}

impl<C, S, R> fmt::Debug for SessionBuilder<C, S, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionBuilder")
            .field("config", &self.config)
            .field("controller", &self.controller.is_some())
            .field("service", &self.service.is_some())
            .finish_non_exhaustive()
    }
}

/// Frame loop over a controller, an environment raycaster, a reconciler and a sink.
pub struct CursorSession<K: Copy + Eq, C, S: RaycastService, R> {
    controller: C,
    raycaster: EnvironmentRaycaster<S>,
    reconciler: Reconciler<K>,
    sink: R,
    last_ray: ControllerRay,
    tracking: bool,
}

impl<K, C, S, R> CursorSession<K, C, S, R>
where
    K: Copy + Eq + fmt::Debug,
    C: ControllerSource,
    S: RaycastService,
    R: CursorSink<K>,
{
    /// Run one frame against `scene` and present it.
    pub fn tick<T: SceneRaycaster<K> + ?Sized>(&mut self, scene: &T) -> &Frame<K> {
        let sample = self
            .controller
            .pose()
            .map(|pose| pose.ray().map(|ray| (pose, ray)));
        match sample {
            Some(Ok((pose, ray))) => {
                if !self.tracking {
                    debug!("controller tracking restored");
                    self.tracking = true;
                }
                let params = RaycastParams::from_config(self.reconciler.config(), pose.up);
                self.raycaster
                    .submit(ray.origin(), ray.direction(), &params);
                self.last_ray = ray;
                let environment = self.raycaster.latest_result();
                let frame = self.reconciler.advance(scene, ray, environment.as_ref());
                self.sink.present(frame);
                frame
            }
            failure => {
                if self.tracking {
                    match failure {
                        Some(Err(err)) => warn!(%err, "unusable controller pose"),
                        _ => debug!("controller pose unavailable"),
                    }
                    self.tracking = false;
                }
                let frame = self.reconciler.advance(&NoScene, self.last_ray, None);
                self.sink.present(frame);
                frame
            }
        }
    }

    /// Register an event listener on the reconciler.
    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&CursorEvent<K>) + 'static,
    ) -> SubscriptionId {
        self.reconciler.subscribe(listener)
    }

    /// Remove an event listener.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.reconciler.unsubscribe(id)
    }

    /// Stop the environment raycaster. Idempotent; later ticks see no environment.
    pub fn shutdown(&mut self) {
        self.raycaster.shutdown();
    }

    /// The reconciler.
    pub fn reconciler(&self) -> &Reconciler<K> {
        &self.reconciler
    }

    /// The environment raycast adapter.
    pub fn raycaster(&self) -> &EnvironmentRaycaster<S> {
        &self.raycaster
    }

    /// The render sink.
    pub fn sink(&self) -> &R {
        &self.sink
    }
}

impl<K: Copy + Eq + fmt::Debug, C, S: RaycastService, R> fmt::Debug for CursorSession<K, C, S, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CursorSession")
            .field("reconciler", &self.reconciler)
            .field("shut_down", &self.raycaster.is_shut_down())
            .field("last_ray", &self.last_ray)
            .field("tracking", &self.tracking)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::RaycastRequest;
    use crate::mailbox::ResultMailbox;
    use crate::types::{EnvironmentHit, EnvironmentStatus, Outcome, PreciseHit};
    use glam::Vec3;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Answers every request synchronously with a wall `distance` ahead.
    struct Wall {
        distance: f32,
    }

    impl RaycastService for Wall {
        fn is_available(&self) -> bool {
            true
        }

        fn request(&self, req: RaycastRequest, reply: ResultMailbox) -> bool {
            reply.deliver(EnvironmentHit::hit(
                EnvironmentStatus::HitObserved,
                req.origin + req.direction * self.distance,
                -req.direction,
                self.distance,
                1.0,
            ))
        }

        fn cancel_pending(&self) {}
    }

    /// Controller whose pose can be toggled from the test.
    #[derive(Clone, Default)]
    struct Handheld(Rc<Cell<Option<ControllerPose>>>);

    impl ControllerSource for Handheld {
        fn pose(&self) -> Option<ControllerPose> {
            self.0.get()
        }
    }

    #[derive(Default)]
    struct Recorder(Vec<Outcome>);

    impl CursorSink<u32> for Recorder {
        fn present(&mut self, frame: &Frame<u32>) {
            self.0.push(frame.outcome);
        }
    }

    struct Box1;

    impl SceneRaycaster<u32> for Box1 {
        fn cast_ray(&self, ray: &ControllerRay, max: f32) -> Option<PreciseHit<u32>> {
            (1.0 <= max).then(|| PreciseHit {
                target: 1,
                point: ray.at(1.0),
                normal: -ray.direction(),
                distance: 1.0,
            })
        }
    }

    fn pointing_forward() -> ControllerPose {
        ControllerPose {
            position: Vec3::ZERO,
            forward: Vec3::NEG_Z,
            up: Vec3::Y,
        }
    }

    #[test]
    fn build_requires_collaborators() {
        let missing_controller = SessionBuilder::<Handheld, Wall>::new()
            .service(Wall { distance: 3.0 })
            .build::<u32>();
        assert!(matches!(
            missing_controller,
            Err(CursorError::MissingCollaborator("controller source"))
        ));

        let missing_service = SessionBuilder::<Handheld, Wall>::new()
            .controller(Handheld::default())
            .build::<u32>();
        assert!(matches!(
            missing_service,
            Err(CursorError::MissingCollaborator(_))
        ));
    }

    #[test]
    fn build_validates_config() {
        let result = SessionBuilder::new()
            .config(CursorConfig {
                width: 0,
                ..CursorConfig::default()
            })
            .controller(Handheld::default())
            .service(Wall { distance: 3.0 })
            .build::<u32>();
        assert!(matches!(result, Err(CursorError::Config(_))));
    }

    #[test]
    fn tick_runs_full_pipeline() {
        let hand = Handheld::default();
        hand.0.set(Some(pointing_forward()));
        let mut session = SessionBuilder::new()
            .controller(hand.clone())
            .service(Wall { distance: 3.0 })
            .sink(Recorder::default())
            .build::<u32>()
            .unwrap();

        assert_eq!(session.tick(&Box1).outcome, Outcome::ObjectHit);
        assert_eq!(session.tick(&NoScene).outcome, Outcome::WorldMesh);
        assert_eq!(session.sink().0, [Outcome::ObjectHit, Outcome::WorldMesh]);
        assert_eq!(session.raycaster().mailbox().deliveries(), 2);
    }

    #[test]
    fn lost_tracking_degrades_to_miss() {
        let hand = Handheld::default();
        hand.0.set(Some(pointing_forward()));
        let mut session = SessionBuilder::new()
            .controller(hand.clone())
            .service(Wall { distance: 3.0 })
            .build::<u32>()
            .unwrap();
        let stops = Rc::new(Cell::new(0));
        let counter = Rc::clone(&stops);
        session.subscribe(move |e| {
            if matches!(e, CursorEvent::HoverStop { .. }) {
                counter.set(counter.get() + 1);
            }
        });

        session.tick(&Box1);
        assert_eq!(session.reconciler().hovered(), Some(1));

        hand.0.set(None);
        let frame = session.tick(&Box1);
        assert_eq!(frame.outcome, Outcome::Miss);
        // Reuses the last good ray.
        assert!((frame.pose.position - Vec3::new(0.0, 0.0, -2.0)).length() < 1e-4);
        assert_eq!(stops.get(), 1);
        assert_eq!(session.reconciler().hovered(), None);

        hand.0.set(Some(ControllerPose {
            forward: Vec3::ZERO,
            ..pointing_forward()
        }));
        assert_eq!(session.tick(&Box1).outcome, Outcome::Miss);
    }

    #[test]
    fn shutdown_stops_environment() {
        let hand = Handheld::default();
        hand.0.set(Some(pointing_forward()));
        let mut session = SessionBuilder::new()
            .controller(hand)
            .service(Wall { distance: 3.0 })
            .build::<u32>()
            .unwrap();
        assert_eq!(session.tick(&NoScene).outcome, Outcome::WorldMesh);
        session.shutdown();
        session.shutdown();
        assert_eq!(session.tick(&NoScene).outcome, Outcome::Miss);
    }

    #[test]
    fn closures_are_controller_sources() {
        let mut session = SessionBuilder::new()
            .controller(|| Some(pointing_forward()))
            .service(Wall { distance: 0.5 })
            .build::<u32>()
            .unwrap();
        let frame = session.tick(&NoScene);
        assert_eq!(frame.pose.scale, Vec3::splat(0.5));
    }
}
