// Copyright 2025 the Reticle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core types for the cursor: controller input, raycast results, pose, and feedback.
//!
//! ## Overview
//!
//! These types describe what flows into a frame ([`ControllerRay`], [`EnvironmentHit`],
//! [`PreciseHit`]) and what flows out ([`CursorPose`], [`VisualFeedback`], [`LineSegment`]).
//! [`Frame`] bundles one frame's output for the rendering sink.
//! They are consumed by the [`reconcile`](crate::reconcile) state machine and
//! referenced by [`events`](crate::events).

use glam::{Mat3, Quat, Vec3};

use crate::config::{Palette, Tint};
use crate::error::CursorError;
use crate::events::CursorEvent;

/// Raw controller sample for one frame.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ControllerPose {
    /// Controller position in world space.
    pub position: Vec3,
    /// Pointing direction. Need not be normalized.
    pub forward: Vec3,
    /// Controller up direction, forwarded to the environment raycast.
    pub up: Vec3,
}

impl ControllerPose {
    /// Build the pointing ray, rejecting degenerate directions.
    pub fn ray(&self) -> Result<ControllerRay, CursorError> {
        ControllerRay::new(self.position, self.forward)
    }
}

/// Pointing ray with a validated unit direction.
///
/// Construct with [`ControllerRay::new`]; zero-length and non-finite inputs are rejected
/// so every downstream computation sees a usable direction.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ControllerRay {
    origin: Vec3,
    direction: Vec3,
}

impl Default for ControllerRay {
    /// Origin at zero, pointing down −Z.
    fn default() -> Self {
        Self {
            origin: Vec3::ZERO,
            direction: Vec3::NEG_Z,
        }
    }
}

impl ControllerRay {
    /// Create a ray, normalizing `direction`.
    pub fn new(origin: Vec3, direction: Vec3) -> Result<Self, CursorError> {
        if !origin.is_finite() {
            return Err(CursorError::DegenerateDirection);
        }
        let direction = direction
            .try_normalize()
            .ok_or(CursorError::DegenerateDirection)?;
        Ok(Self { origin, direction })
    }

    /// Ray origin.
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Unit direction.
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Point at distance `t` along the ray.
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Status reported by the environment raycast service.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EnvironmentStatus {
    /// The request could not be served.
    Failed,
    /// The ray left the reconstructed mesh without touching it.
    NoCollision,
    /// Hit a scanned and confirmed surface.
    HitObserved,
    /// Hit an inferred, not yet observed surface.
    HitUnobserved,
}

impl EnvironmentStatus {
    /// Whether this status carries a usable hit point.
    pub fn is_hit(self) -> bool {
        matches!(self, Self::HitObserved | Self::HitUnobserved)
    }
}

/// One asynchronous environment raycast result.
///
/// `point`, `normal` and `distance` are only meaningful when
/// [`status.is_hit()`](EnvironmentStatus::is_hit).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct EnvironmentHit {
    /// Outcome of the request.
    pub status: EnvironmentStatus,
    /// World-space hit point.
    pub point: Vec3,
    /// World-space surface normal.
    pub normal: Vec3,
    /// Distance from the request origin.
    pub distance: f32,
    /// Service confidence in `[0, 1]`.
    pub confidence: f32,
}

impl EnvironmentHit {
    /// A successful hit.
    pub fn hit(
        status: EnvironmentStatus,
        point: Vec3,
        normal: Vec3,
        distance: f32,
        confidence: f32,
    ) -> Self {
        Self {
            status,
            point,
            normal,
            distance,
            confidence,
        }
    }

    /// A result without a hit (`Failed` or `NoCollision`).
    pub fn empty(status: EnvironmentStatus) -> Self {
        Self {
            status,
            point: Vec3::ZERO,
            normal: Vec3::ZERO,
            distance: 0.0,
            confidence: 0.0,
        }
    }
}

/// Result of the synchronous scene cast. Valid for the current frame only.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PreciseHit<K> {
    /// Identity of the struck object.
    pub target: K,
    /// World-space contact point.
    pub point: Vec3,
    /// World-space surface normal.
    pub normal: Vec3,
    /// Distance from the ray origin.
    pub distance: f32,
}

/// Renderable cursor transform, fully recomputed every frame.
///
/// The cursor's local +Z axis points along the facing direction it was built with.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CursorPose {
    /// World-space position.
    pub position: Vec3,
    /// World-space orientation.
    pub orientation: Quat,
    /// Per-axis scale.
    pub scale: Vec3,
}

impl CursorPose {
    /// A unit-scale pose at `position` whose +Z axis faces `facing`, with world +Y as up.
    pub fn facing(position: Vec3, facing: Vec3) -> Self {
        Self {
            position,
            orientation: look_rotation(facing, Vec3::Y),
            scale: Vec3::ONE,
        }
    }
}

/// Rotation taking local +Z to `forward`, keeping local +Y as close to `up` as possible.
///
/// Falls back to the shortest arc when `forward` is parallel to `up`, and to identity
/// when `forward` is degenerate.
pub fn look_rotation(forward: Vec3, up: Vec3) -> Quat {
    let Some(f) = forward.try_normalize() else {
        return Quat::IDENTITY;
    };
    match up.cross(f).try_normalize() {
        Some(r) => {
            let u = f.cross(r);
            Quat::from_mat3(&Mat3::from_cols(r, u, f))
        }
        None => Quat::from_rotation_arc(Vec3::Z, f),
    }
}

/// Visual state the renderer should show this frame.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum VisualFeedback {
    /// Resting on a confirmed environment surface.
    ObservedHit,
    /// Resting on an inferred environment surface.
    UnobservedHit,
    /// Resting on a scene object.
    ObjectHit,
    /// Nothing was hit.
    Miss,
}

impl VisualFeedback {
    /// Map feedback to cursor and line colors.
    ///
    /// Object and world hits use the active tint, misses the inactive one. The line
    /// is highlighted on object hits and uses the secondary tint on world hits;
    /// the cursor itself switches to the secondary tint on unobserved surfaces.
    pub fn tint(self, palette: &Palette) -> Tint {
        match self {
            Self::ObjectHit => Tint {
                cursor: palette.active,
                line: palette.highlight,
            },
            Self::ObservedHit => Tint {
                cursor: palette.active,
                line: palette.secondary,
            },
            Self::UnobservedHit => Tint {
                cursor: palette.secondary,
                line: palette.secondary,
            },
            Self::Miss => Tint {
                cursor: palette.inactive,
                line: palette.inactive,
            },
        }
    }
}

/// Mutually exclusive classification of a frame, in priority order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// The precise cast struck a scene object.
    ObjectHit,
    /// Only the environment mesh was hit.
    WorldMesh,
    /// Neither source hit anything.
    Miss,
}

/// Pointer line from the controller to where the cursor rests.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LineSegment {
    /// Controller end.
    pub start: Vec3,
    /// Precise hit point when present, else the environment baseline endpoint.
    pub end: Vec3,
    /// Rendered width.
    pub width: f32,
}

/// Which raycast produced the pose reported in a move notification.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum RaycastDetail<K> {
    /// The precise scene cast.
    Precise(PreciseHit<K>),
    /// The environment raycast.
    Environment(EnvironmentHit),
}

/// Everything one call to [`Reconciler::advance`](crate::reconcile::Reconciler::advance)
/// produces: the render state for the sink and the events dispatched this frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame<K> {
    /// Where and how the cursor is drawn.
    pub pose: CursorPose,
    /// Feedback state driving the cursor material.
    pub feedback: VisualFeedback,
    /// Colors derived from `feedback` and the configured palette.
    pub tint: Tint,
    /// Pointer line from the controller.
    pub line: LineSegment,
    /// Classification of this frame.
    pub outcome: Outcome,
    /// Hover target after this frame.
    pub hovered: Option<K>,
    /// Events emitted this frame, in dispatch order.
    pub events: Vec<CursorEvent<K>>,
}
