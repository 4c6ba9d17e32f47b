// Copyright 2025 the Reticle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reticle Scene: a generational arena of collidable objects with synchronous ray casts.
//!
//! Reticle Scene is the "precise" half of a spatial pointer: it answers
//! "what is the nearest scene object along this ray, no farther than this?"
//! in the same frame the question is asked.
//!
//! - Insert, update, and remove objects, each with a [`Collider`], a world [`Isometry`], and [`Layers`].
//! - Refer to objects through [`ObjectId`], a copyable generational handle that never aliases a
//!   different object after its slot is reused.
//! - Cast rays with [`Scene::cast_ray`] (nearest hit) or [`Scene::cast_ray_all`] (every hit, nearest first),
//!   bounded by a maximum distance and restricted by a [`LayerFilter`] predicate.
//!
//! ## Layer policy
//!
//! Which layers a cast may see is explicit data rather than a magic bitmask.
//! [`LayerFilter::default`] accepts objects on [`Layers::DEFAULT`] that are not also on
//! [`Layers::UNOBSERVED`]; [`Layers::IGNORE_RAYCAST`] is never reported.
//! Attach a custom predicate with [`LayerFilter::with_predicate`] for environment-specific rules.
//!
//! ## Minimal usage
//!
//! ```
//! use reticle_scene::{Collider, Isometry, LayerFilter, Ray, Scene, SceneObject};
//! use glam::Vec3;
//!
//! let mut scene = Scene::new();
//! let door = scene.insert(SceneObject::new(
//!     Collider::Cuboid { half_extents: Vec3::new(0.5, 1.0, 0.05) },
//!     Isometry::from_translation(Vec3::new(0.0, 0.0, -3.0)),
//! ));
//!
//! let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z).unwrap();
//! let hit = scene.cast_ray(&ray, 9.0, &LayerFilter::default()).unwrap();
//! assert_eq!(hit.object, door);
//! assert!((hit.distance - 2.95).abs() < 1e-4);
//!
//! // Nothing is reported beyond the distance bound.
//! assert!(scene.cast_ray(&ray, 2.0, &LayerFilter::default()).is_none());
//! ```
//!
//! This crate is `no_std` and uses `alloc`. Enable either the `std` (default) or the `libm` feature.

#![no_std]

#[cfg(not(any(feature = "std", feature = "libm")))]
compile_error!("reticle_scene requires either the `std` or `libm` feature");

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod ray;
pub mod scene;
pub mod types;

pub use ray::{Ray, RayHit};
pub use scene::Scene;
pub use types::{Collider, Isometry, LayerFilter, Layers, ObjectId, SceneObject};
