// Copyright 2025 the Reticle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rays and ray-vs-collider intersection.
//!
//! All tests run in the collider's local space: the ray is pulled back through the
//! object's [`Isometry`], intersected against the canonical shape, and the hit is
//! mapped forward again. Rotation preserves length, so the local parameter `t` is
//! also the world-space distance.
//!
//! Rays that start inside a solid collider (sphere or cuboid) do not report it.

use glam::Vec3;

use crate::types::{Collider, Isometry, ObjectId};

const PARALLEL_EPSILON: f32 = 1e-8;

/// A half-line with a unit-length direction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    /// Start point.
    pub origin: Vec3,
    /// Unit direction.
    pub direction: Vec3,
}

impl Ray {
    /// Create a ray, normalizing `direction`.
    ///
    /// Returns `None` for zero-length or non-finite directions, or a non-finite origin.
    pub fn new(origin: Vec3, direction: Vec3) -> Option<Self> {
        if !origin.is_finite() {
            return None;
        }
        let direction = direction.try_normalize()?;
        Some(Self { origin, direction })
    }

    /// Point at distance `t` along the ray.
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Result of a successful ray cast against one object.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    /// The object struck.
    pub object: ObjectId,
    /// World-space contact point.
    pub point: Vec3,
    /// World-space unit surface normal, facing back toward the ray origin.
    pub normal: Vec3,
    /// Distance from the ray origin to `point`.
    pub distance: f32,
}

/// Intersect `ray` with a collider placed at `transform`.
///
/// Returns the distance and world-space normal of the nearest entry point.
pub fn intersect(ray: &Ray, collider: &Collider, transform: &Isometry) -> Option<(f32, Vec3)> {
    let o = transform.inverse_transform_point(ray.origin);
    let d = transform.inverse_transform_vector(ray.direction);
    let (t, n_local) = match *collider {
        Collider::Sphere { radius } => intersect_sphere(o, d, radius)?,
        Collider::Cuboid { half_extents } => intersect_cuboid(o, d, half_extents)?,
        Collider::Quad { half_size } => intersect_quad(o, d, half_size.x, half_size.y)?,
    };
    Some((t, transform.transform_vector(n_local).normalize()))
}

fn intersect_sphere(o: Vec3, d: Vec3, radius: f32) -> Option<(f32, Vec3)> {
    let c = o.dot(o) - radius * radius;
    if c <= 0.0 {
        // Origin inside or on the surface.
        return None;
    }
    let b = o.dot(d);
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let t = -b - disc.sqrt_f();
    if t < 0.0 {
        return None;
    }
    let n = (o + d * t).try_normalize()?;
    Some((t, n))
}

fn intersect_cuboid(o: Vec3, d: Vec3, h: Vec3) -> Option<(f32, Vec3)> {
    let mut t_near = f32::NEG_INFINITY;
    let mut t_far = f32::INFINITY;
    let mut near_axis = 0_usize;
    for axis in 0..3 {
        let (oa, da, ha) = (o[axis], d[axis], h[axis]);
        if da.abs_f() < PARALLEL_EPSILON {
            if oa < -ha || oa > ha {
                return None;
            }
            continue;
        }
        let inv = 1.0 / da;
        let mut t0 = (-ha - oa) * inv;
        let mut t1 = (ha - oa) * inv;
        if t0 > t1 {
            core::mem::swap(&mut t0, &mut t1);
        }
        if t0 > t_near {
            t_near = t0;
            near_axis = axis;
        }
        t_far = t_far.min(t1);
        if t_near > t_far {
            return None;
        }
    }
    if t_near < 0.0 {
        // Either behind the ray or the origin is inside the box.
        return None;
    }
    let mut n = Vec3::ZERO;
    n[near_axis] = if d[near_axis] > 0.0 { -1.0 } else { 1.0 };
    Some((t_near, n))
}

fn intersect_quad(o: Vec3, d: Vec3, hx: f32, hy: f32) -> Option<(f32, Vec3)> {
    if d.z.abs_f() < PARALLEL_EPSILON {
        return None;
    }
    let t = -o.z / d.z;
    if t < 0.0 {
        return None;
    }
    let p = o + d * t;
    if p.x < -hx || p.x > hx || p.y < -hy || p.y > hy {
        return None;
    }
    let n = if d.z > 0.0 { Vec3::NEG_Z } else { Vec3::Z };
    Some((t, n))
}

/// Scalar helpers that work in both `std` and `libm` builds.
trait FloatFuncs {
    fn sqrt_f(self) -> Self;
    fn abs_f(self) -> Self;
}

impl FloatFuncs for f32 {
    #[cfg(feature = "std")]
    #[inline]
    fn sqrt_f(self) -> Self {
        self.sqrt()
    }

    #[cfg(not(feature = "std"))]
    #[inline]
    fn sqrt_f(self) -> Self {
        libm::sqrtf(self)
    }

    #[inline]
    fn abs_f(self) -> Self {
        if self < 0.0 { -self } else { self }
    }
}
