// Copyright 2025 the Reticle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the scene: object identifiers, collision layers, colliders, and placement.

use glam::{Quat, Vec2, Vec3};

/// Identifier for an object in the scene.
///
/// This is a small, copyable handle that stays stable across updates but becomes
/// invalid when the underlying slot is reused.
/// It consists of a slot index and a generation counter.
///
/// ## Semantics
///
/// - On insert, a fresh slot is allocated with generation `1`.
/// - On remove, the slot is freed; any existing `ObjectId` that pointed to that slot is now stale.
/// - On reuse of a freed slot, its generation is incremented, producing a new, distinct `ObjectId`.
///
/// Two ids compare equal only if both slot and generation match, so hover
/// tracking keyed on `ObjectId` follows object identity rather than position.
///
/// ### Newer
///
/// An `ObjectId` is considered newer than another when it has a higher generation.
/// If generations are equal, the one with the higher slot index is considered newer.
/// This total order is used only for deterministic tie-breaks in
/// [ray casts](crate::Scene::cast_ray).
///
/// ### Liveness
///
/// Use [`Scene::is_alive`](crate::Scene::is_alive) to check whether an `ObjectId` still refers to a live object.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ObjectId(pub(crate) u32, pub(crate) u32);

impl ObjectId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }

    /// Slot index of this id.
    pub const fn slot(self) -> u32 {
        self.0
    }

    /// Generation of this id.
    pub const fn generation(self) -> u32 {
        self.1
    }

    /// Whether `self` is newer than `other` (see the type docs).
    #[inline]
    pub fn is_newer_than(self, other: Self) -> bool {
        (self.1 > other.1) || (self.1 == other.1 && self.0 > other.0)
    }
}

bitflags::bitflags! {
    /// Collision layers an object belongs to.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Layers: u32 {
        /// Regular scene content; the only layer precise cursor casts consider by default.
        const DEFAULT        = 0b0000_0001;
        /// Content standing in for unobserved or inferred surroundings.
        const UNOBSERVED     = 0b0000_0010;
        /// Interface panels and widgets.
        const UI             = 0b0000_0100;
        /// Never reported by ray casts, whatever the filter says.
        const IGNORE_RAYCAST = 0b0000_1000;
    }
}

impl Default for Layers {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Predicate deciding which objects a ray cast may report.
///
/// An object passes when its layers intersect `include`, do not intersect
/// `exclude`, and satisfy the optional custom `predicate`.
/// [`Layers::IGNORE_RAYCAST`] objects never pass.
#[derive(Clone, Copy, Debug)]
pub struct LayerFilter {
    /// At least one of these layers must be present.
    pub include: Layers,
    /// None of these layers may be present.
    pub exclude: Layers,
    /// Extra environment-specific policy, evaluated last.
    pub predicate: Option<fn(Layers) -> bool>,
}

impl Default for LayerFilter {
    /// Default layer only; unobserved content is excluded.
    fn default() -> Self {
        Self {
            include: Layers::DEFAULT,
            exclude: Layers::UNOBSERVED,
            predicate: None,
        }
    }
}

impl LayerFilter {
    /// A filter accepting every raycast-visible object.
    pub const ALL: Self = Self {
        include: Layers::all(),
        exclude: Layers::empty(),
        predicate: None,
    };

    /// Create a filter from include and exclude sets.
    pub const fn new(include: Layers, exclude: Layers) -> Self {
        Self {
            include,
            exclude,
            predicate: None,
        }
    }

    /// Attach a custom predicate.
    pub const fn with_predicate(mut self, predicate: fn(Layers) -> bool) -> Self {
        self.predicate = Some(predicate);
        self
    }

    /// Whether an object on `layers` passes this filter.
    pub fn accepts(&self, layers: Layers) -> bool {
        if layers.contains(Layers::IGNORE_RAYCAST) {
            return false;
        }
        if !layers.intersects(self.include) || layers.intersects(self.exclude) {
            return false;
        }
        self.predicate.is_none_or(|p| p(layers))
    }
}

/// Collision shape in object-local space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Collider {
    /// Sphere centered on the object origin.
    Sphere {
        /// Radius; must be positive.
        radius: f32,
    },
    /// Box centered on the object origin, oriented by the object's rotation.
    Cuboid {
        /// Half size along each local axis.
        half_extents: Vec3,
    },
    /// Flat rectangle in the local XY plane (normal along local +Z), hittable from both sides.
    Quad {
        /// Half size along local X and Y.
        half_size: Vec2,
    },
}

/// Rigid placement of an object: rotation followed by translation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Isometry {
    /// World-space position of the object origin.
    pub translation: Vec3,
    /// World-space orientation. Must be unit length; [`Isometry::new`] normalizes it.
    pub rotation: Quat,
}

impl Default for Isometry {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Isometry {
    /// No rotation, no translation.
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    /// Translation only.
    pub const fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            rotation: Quat::IDENTITY,
        }
    }

    /// Rotation and translation.
    ///
    /// `rotation` is normalized; a zero or non-finite quaternion becomes the identity.
    pub fn new(translation: Vec3, rotation: Quat) -> Self {
        let rotation = rotation.normalize();
        Self {
            translation,
            rotation: if rotation.is_finite() {
                rotation
            } else {
                Quat::IDENTITY
            },
        }
    }

    /// Map a world-space point into local space.
    pub fn inverse_transform_point(&self, p: Vec3) -> Vec3 {
        self.rotation.inverse() * (p - self.translation)
    }

    /// Map a world-space direction into local space.
    pub fn inverse_transform_vector(&self, v: Vec3) -> Vec3 {
        self.rotation.inverse() * v
    }

    /// Map a local-space direction into world space.
    pub fn transform_vector(&self, v: Vec3) -> Vec3 {
        self.rotation * v
    }
}

/// Per-object data stored in the scene.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneObject {
    /// Collision shape, in local space.
    pub collider: Collider,
    /// World placement.
    pub transform: Isometry,
    /// Layers used by [`LayerFilter`].
    pub layers: Layers,
}

impl SceneObject {
    /// An object on the default layer.
    pub fn new(collider: Collider, transform: Isometry) -> Self {
        Self {
            collider,
            transform,
            layers: Layers::DEFAULT,
        }
    }

    /// Replace the layer set.
    pub fn with_layers(mut self, layers: Layers) -> Self {
        self.layers = layers;
        self
    }
}
