// Copyright 2025 the Reticle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core scene implementation: object storage, updates, ray queries.

use alloc::vec::Vec;

use crate::ray::{Ray, RayHit, intersect};
use crate::types::{Collider, Isometry, LayerFilter, Layers, ObjectId, SceneObject};

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

/// Arena of collidable scene objects.
pub struct Scene {
    objects: Vec<Option<Entry>>, // slots
    generations: Vec<u32>,       // last generation per slot (persists across frees)
    free_list: Vec<usize>,
}

impl core::fmt::Debug for Scene {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.objects.len();
        let alive = self.objects.iter().filter(|n| n.is_some()).count();
        f.debug_struct("Scene")
            .field("slots_total", &total)
            .field("objects_alive", &alive)
            .field("free_list", &self.free_list.len())
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug)]
struct Entry {
    generation: u32,
    object: SceneObject,
}

impl Scene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
        }
    }

    /// Insert an object and return its handle.
    pub fn insert(&mut self, object: SceneObject) -> ObjectId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.objects[idx] = Some(Entry { generation, object });
            (idx, generation)
        } else {
            let generation = 1_u32;
            self.objects.push(Some(Entry { generation, object }));
            self.generations.push(generation);
            (self.objects.len() - 1, generation)
        };
        #[allow(
            clippy::cast_possible_truncation,
            reason = "ObjectId stores 32-bit slot indices."
        )]
        ObjectId::new(idx as u32, generation)
    }

    /// Remove an object. Stale ids are ignored.
    ///
    /// Returns the removed object data.
    pub fn remove(&mut self, id: ObjectId) -> Option<SceneObject> {
        if !self.is_alive(id) {
            return None;
        }
        let entry = self.objects[id.idx()].take()?;
        self.free_list.push(id.idx());
        Some(entry.object)
    }

    /// Returns true if `id` refers to a live object.
    ///
    /// An `ObjectId` is considered live if its slot exists and its generation matches
    /// the current generation stored in that slot.
    pub fn is_alive(&self, id: ObjectId) -> bool {
        self.objects
            .get(id.idx())
            .and_then(|n| n.as_ref())
            .is_some_and(|n| n.generation == id.1)
    }

    /// Object data for a live id.
    pub fn get(&self, id: ObjectId) -> Option<&SceneObject> {
        self.entry(id).map(|e| &e.object)
    }

    /// Number of live objects.
    pub fn len(&self) -> usize {
        self.objects.len() - self.free_list.len()
    }

    /// Whether the scene has no live objects.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate live objects with their ids, in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, &SceneObject)> + '_ {
        self.objects.iter().enumerate().filter_map(|(i, slot)| {
            let e = slot.as_ref()?;
            #[allow(
                clippy::cast_possible_truncation,
                reason = "ObjectId stores 32-bit slot indices."
            )]
            Some((ObjectId::new(i as u32, e.generation), &e.object))
        })
    }

    /// Update world placement.
    pub fn set_transform(&mut self, id: ObjectId, transform: Isometry) {
        if let Some(e) = self.entry_mut(id) {
            e.object.transform = transform;
        }
    }

    /// Update layer membership.
    pub fn set_layers(&mut self, id: ObjectId, layers: Layers) {
        if let Some(e) = self.entry_mut(id) {
            e.object.layers = layers;
        }
    }

    /// Update collision shape.
    pub fn set_collider(&mut self, id: ObjectId, collider: Collider) {
        if let Some(e) = self.entry_mut(id) {
            e.object.collider = collider;
        }
    }

    /// Cast a ray and return the nearest hit within `max_distance`.
    ///
    /// Only objects accepted by `filter` are considered. A hit exactly at
    /// `max_distance` is reported. If two objects are struck at the same distance,
    /// the newer [`ObjectId`] wins. This tie-break is deterministic.
    pub fn cast_ray(&self, ray: &Ray, max_distance: f32, filter: &LayerFilter) -> Option<RayHit> {
        let mut best: Option<(ObjectId, f32, glam::Vec3)> = None;
        for (id, t, n) in self.candidates(ray, max_distance, filter) {
            match best {
                None => best = Some((id, t, n)),
                Some((best_id, t_best, _)) => {
                    if t < t_best || (t == t_best && id.is_newer_than(best_id)) {
                        best = Some((id, t, n));
                    }
                }
            }
        }
        best.map(|(object, distance, normal)| RayHit {
            object,
            point: ray.at(distance),
            normal,
            distance,
        })
    }

    /// Cast a ray and return every hit within `max_distance`, nearest first.
    ///
    /// Equal distances are ordered newer id first, matching [`Scene::cast_ray`].
    pub fn cast_ray_all(&self, ray: &Ray, max_distance: f32, filter: &LayerFilter) -> Vec<RayHit> {
        let mut out: Vec<RayHit> = self
            .candidates(ray, max_distance, filter)
            .map(|(object, distance, normal)| RayHit {
                object,
                point: ray.at(distance),
                normal,
                distance,
            })
            .collect();
        out.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(core::cmp::Ordering::Equal)
                .then_with(|| {
                    if a.object.is_newer_than(b.object) {
                        core::cmp::Ordering::Less
                    } else if b.object.is_newer_than(a.object) {
                        core::cmp::Ordering::Greater
                    } else {
                        core::cmp::Ordering::Equal
                    }
                })
        });
        out
    }

    // --- internals ---

    fn candidates<'a>(
        &'a self,
        ray: &'a Ray,
        max_distance: f32,
        filter: &'a LayerFilter,
    ) -> impl Iterator<Item = (ObjectId, f32, glam::Vec3)> + 'a {
        self.iter().filter_map(move |(id, obj)| {
            if !filter.accepts(obj.layers) {
                return None;
            }
            let (t, n) = intersect(ray, &obj.collider, &obj.transform)?;
            (t <= max_distance).then_some((id, t, n))
        })
    }

    fn entry(&self, id: ObjectId) -> Option<&Entry> {
        let e = self.objects.get(id.idx())?.as_ref()?;
        (e.generation == id.1).then_some(e)
    }

    fn entry_mut(&mut self, id: ObjectId) -> Option<&mut Entry> {
        let e = self.objects.get_mut(id.idx())?.as_mut()?;
        if e.generation != id.1 {
            return None;
        }
        Some(e)
    }
}
