// Copyright 2025 the Reticle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Adapter for Reticle Scene.
//!
//! ## Feature
//!
//! Enable with `scene_adapter`.
//!
//! ## Notes
//!
//! A [`Scene`] can be passed straight to
//! [`Reconciler::advance`](crate::reconcile::Reconciler::advance); it casts with
//! [`LayerFilter::default`]. Wrap it in a [`ScenePicker`] to use another layer policy.

use reticle_scene::{LayerFilter, ObjectId, Ray, RayHit, Scene};

use crate::reconcile::SceneRaycaster;
use crate::types::{ControllerRay, PreciseHit};

/// A scene borrowed together with the layer policy to cast with.
#[derive(Clone, Copy, Debug)]
pub struct ScenePicker<'a> {
    scene: &'a Scene,
    filter: LayerFilter,
}

impl<'a> ScenePicker<'a> {
    /// Cast against `scene`, reporting only objects accepted by `filter`.
    pub fn new(scene: &'a Scene, filter: LayerFilter) -> Self {
        Self { scene, filter }
    }

    /// The layer policy in use.
    pub fn filter(&self) -> &LayerFilter {
        &self.filter
    }
}

impl SceneRaycaster<ObjectId> for ScenePicker<'_> {
    fn cast_ray(&self, ray: &ControllerRay, max_distance: f32) -> Option<PreciseHit<ObjectId>> {
        cast(self.scene, ray, max_distance, &self.filter)
    }
}

impl SceneRaycaster<ObjectId> for Scene {
    fn cast_ray(&self, ray: &ControllerRay, max_distance: f32) -> Option<PreciseHit<ObjectId>> {
        cast(self, ray, max_distance, &LayerFilter::default())
    }
}

fn cast(
    scene: &Scene,
    ray: &ControllerRay,
    max_distance: f32,
    filter: &LayerFilter,
) -> Option<PreciseHit<ObjectId>> {
    let ray = Ray::new(ray.origin(), ray.direction())?;
    scene
        .cast_ray(&ray, max_distance, filter)
        .map(|hit: RayHit| PreciseHit {
            target: hit.object,
            point: hit.point,
            normal: hit.normal,
            distance: hit.distance,
        })
}
