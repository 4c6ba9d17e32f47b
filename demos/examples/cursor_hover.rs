// Copyright 2025 the Reticle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hover events as the controller sweeps across two objects.
//!
//! Prints the event sequence for each frame: hover stop before hover start,
//! and a move notification every frame.
//!
//! Run:
//! - `RUST_LOG=reticle_cursor=debug cargo run -p reticle_demos --example cursor_hover`

use glam::Vec3;
use reticle_cursor::config::CursorConfig;
use reticle_cursor::events::CursorEvent;
use reticle_cursor::reconcile::Reconciler;
use reticle_cursor::types::{ControllerRay, EnvironmentHit, EnvironmentStatus};
use reticle_scene::{Collider, Isometry, ObjectId, Scene, SceneObject};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut scene = Scene::new();
    let left = scene.insert(SceneObject::new(
        Collider::Cuboid {
            half_extents: Vec3::splat(0.3),
        },
        Isometry::from_translation(Vec3::new(-1.0, 0.0, -3.0)),
    ));
    let right = scene.insert(SceneObject::new(
        Collider::Sphere { radius: 0.4 },
        Isometry::from_translation(Vec3::new(1.0, 0.0, -3.0)),
    ));
    println!("left={left:?} right={right:?}");

    let mut cursor = Reconciler::<ObjectId>::new(CursorConfig::default())?;
    cursor.subscribe(|e| match e {
        CursorEvent::HoverStart { target, hit, .. } => {
            println!("    hover start {target:?} at {:.2}", hit.distance);
        }
        CursorEvent::HoverStop { target } => println!("    hover stop  {target:?}"),
        CursorEvent::Moved { pose, .. } => println!("    moved to {:.2}", pose.position),
    });

    // A far wall behind both objects.
    let wall = EnvironmentHit::hit(
        EnvironmentStatus::HitObserved,
        Vec3::new(0.0, 0.0, -5.0),
        Vec3::Z,
        5.0,
        0.8,
    );

    for step in 0..=8 {
        let x = -1.6 + 0.4 * step as f32;
        let ray = ControllerRay::new(Vec3::ZERO, Vec3::new(x, 0.0, -3.0))?;
        println!("frame {step}: aim x={x:+.1}");
        let frame = cursor.advance(&scene, ray, Some(&wall));
        println!(
            "  -> {:?} / {:?}, hovered={:?}",
            frame.outcome, frame.feedback, frame.hovered
        );
    }

    // Losing the wall turns empty space into a miss.
    let ray = ControllerRay::new(Vec3::ZERO, Vec3::new(0.0, 1.0, -1.0))?;
    let frame = cursor.advance(&scene, ray, None);
    println!("sky: {:?}, cursor at {:.2}", frame.outcome, frame.pose.position);
    Ok(())
}
