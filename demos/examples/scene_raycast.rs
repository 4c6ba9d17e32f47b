// Copyright 2025 the Reticle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Precise ray casts against a small scene.
//!
//! Shows nearest-hit selection, the distance bound, layer filtering, and
//! generational ids surviving slot reuse.
//!
//! Run:
//! - `cargo run -p reticle_demos --example scene_raycast`

use glam::{Quat, Vec2, Vec3};
use reticle_scene::{Collider, Isometry, LayerFilter, Layers, Ray, Scene, SceneObject};

fn main() -> anyhow::Result<()> {
    let mut scene = Scene::new();

    let door = scene.insert(SceneObject::new(
        Collider::Cuboid {
            half_extents: Vec3::new(0.5, 1.0, 0.05),
        },
        Isometry::from_translation(Vec3::new(0.0, 0.0, -3.0)),
    ));
    let lamp = scene.insert(SceneObject::new(
        Collider::Sphere { radius: 0.25 },
        Isometry::from_translation(Vec3::new(0.0, 0.0, -1.5)),
    ));
    let poster = scene.insert(
        SceneObject::new(
            Collider::Quad {
                half_size: Vec2::new(0.4, 0.6),
            },
            Isometry::new(
                Vec3::new(0.0, 0.0, -2.0),
                Quat::from_rotation_y(0.3),
            ),
        )
        .with_layers(Layers::DEFAULT | Layers::UNOBSERVED),
    );

    let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z).ok_or_else(|| anyhow::anyhow!("degenerate ray"))?;
    let filter = LayerFilter::default();

    println!("objects: door={door:?} lamp={lamp:?} poster={poster:?}");

    match scene.cast_ray(&ray, 9.0, &filter) {
        Some(hit) => println!("nearest: {:?} at {:.3}", hit.object, hit.distance),
        None => println!("nearest: none"),
    }

    println!("all hits (default filter):");
    for hit in scene.cast_ray_all(&ray, 9.0, &filter) {
        println!("  {:?} at {:.3} normal={:?}", hit.object, hit.distance, hit.normal);
    }

    println!("all hits (every layer):");
    for hit in scene.cast_ray_all(&ray, 9.0, &LayerFilter::ALL) {
        println!("  {:?} at {:.3}", hit.object, hit.distance);
    }

    // The lamp is 1.25 away; a tighter bound hides it.
    println!(
        "within 1.0: {:?}",
        scene.cast_ray(&ray, 1.0, &filter).map(|h| h.object)
    );

    scene.remove(lamp);
    let vase = scene.insert(SceneObject::new(
        Collider::Sphere { radius: 0.2 },
        Isometry::from_translation(Vec3::new(0.0, 0.0, -1.0)),
    ));
    println!(
        "after replacing lamp: vase={vase:?}, lamp alive={}, nearest={:?}",
        scene.is_alive(lamp),
        scene.cast_ray(&ray, 9.0, &filter).map(|h| h.object)
    );
    Ok(())
}
