// Copyright 2025 the Reticle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reticle Cursor: a per-frame spatial pointer for augmented reality.
//!
//! ## Overview
//!
//! A spatial cursor has two ways to find out what the user is pointing at:
//!
//! - an environment raycast against the reconstructed world mesh, which is coarse,
//!   carries a confidence status and answers asynchronously, and
//! - a precise raycast against known scene objects, answered in the same frame.
//!
//! This crate fuses the two into one authoritative cursor pose, a visual feedback
//! state, a pointer line, and hover events tracked by object identity.
//!
//! ## Pieces
//!
//! - [`adapter::EnvironmentRaycaster`] wraps a black-box [`adapter::RaycastService`].
//!   Results land in a [`mailbox::ResultMailbox`], a single atomic slot where the latest
//!   result wins, so the frame loop never blocks and never sees a torn value.
//! - [`reconcile::Reconciler`] is the state machine. Call
//!   [`advance`](reconcile::Reconciler::advance) once per frame with the controller
//!   ray, the latest environment result, and anything implementing
//!   [`reconcile::SceneRaycaster`].
//! - [`events::Subscribers`] is the per-reconciler observer registry. Listeners see
//!   `HoverStop` before `HoverStart`, and a `Moved` notification every frame.
//! - [`session::CursorSession`] runs the whole frame: sample the controller, submit
//!   a raycast, reconcile, present.
//!
//! ## Ordering
//!
//! Within a frame, outcomes are classified in priority order: object hit, then
//! world-mesh hit, then miss. The precise cast is bounded by the distance to the
//! environment baseline, so an object can only win if it is at least as close.
//! There is no hysteresis: one frame's outcome fully determines the hover target.
//!
//! ## Minimal example
//!
//! ```
//! use glam::Vec3;
//! use reticle_cursor::config::CursorConfig;
//! use reticle_cursor::events::CursorEvent;
//! use reticle_cursor::reconcile::{NoScene, Reconciler};
//! use reticle_cursor::types::{ControllerRay, EnvironmentHit, EnvironmentStatus, VisualFeedback};
//!
//! let mut cursor: Reconciler<u32> = Reconciler::new(CursorConfig::default()).unwrap();
//! cursor.subscribe(|e: &CursorEvent<u32>| {
//!     if let CursorEvent::Moved { pose, .. } = e {
//!         assert!(pose.position.is_finite());
//!     }
//! });
//!
//! let ray = ControllerRay::new(Vec3::ZERO, Vec3::NEG_Z).unwrap();
//! let wall = EnvironmentHit::hit(
//!     EnvironmentStatus::HitObserved,
//!     Vec3::new(0.0, 0.0, -0.5),
//!     Vec3::Z,
//!     0.5,
//!     0.9,
//! );
//! let frame = cursor.advance(&NoScene, ray, Some(&wall));
//! assert_eq!(frame.feedback, VisualFeedback::ObservedHit);
//! assert_eq!(frame.pose.scale, Vec3::splat(0.5));
//! ```
//!
//! ## Features
//!
//! - `scene_adapter`: implement [`reconcile::SceneRaycaster`] for `reticle_scene::Scene`.

pub mod adapter;
pub mod adapters;
pub mod config;
pub mod error;
pub mod events;
pub mod hover;
pub mod mailbox;
pub mod reconcile;
pub mod session;
pub mod types;

pub use config::CursorConfig;
pub use error::{ConfigError, CursorError};
pub use reconcile::{NoScene, Reconciler, SceneRaycaster};
pub use types::{ControllerRay, CursorPose, EnvironmentHit, Frame, VisualFeedback};
