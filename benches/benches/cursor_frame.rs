// Copyright 2025 the Reticle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use glam::{Quat, Vec2, Vec3};
use reticle_cursor::config::CursorConfig;
use reticle_cursor::reconcile::Reconciler;
use reticle_cursor::types::{ControllerRay, EnvironmentHit, EnvironmentStatus};
use reticle_scene::{Collider, Isometry, LayerFilter, ObjectId, Ray, Scene, SceneObject};

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f32(&mut self) -> f32 {
        let v = self.next_u64() >> 40;
        (v as f32) / ((1u64 << 24) as f32)
    }
    fn range(&mut self, lo: f32, hi: f32) -> f32 {
        lo + (hi - lo) * self.next_f32()
    }
}

/// `n` mixed colliders scattered in a 20 m cube in front of the origin.
fn gen_scene(n: usize, seed: u64) -> Scene {
    let mut rng = Rng::new(seed);
    let mut scene = Scene::new();
    for i in 0..n {
        let translation = Vec3::new(
            rng.range(-10.0, 10.0),
            rng.range(-10.0, 10.0),
            rng.range(-20.0, -0.5),
        );
        let rotation = Quat::from_rotation_y(rng.range(0.0, core::f32::consts::TAU));
        let collider = match i % 3 {
            0 => Collider::Sphere {
                radius: rng.range(0.1, 1.0),
            },
            1 => Collider::Cuboid {
                half_extents: Vec3::new(
                    rng.range(0.1, 1.0),
                    rng.range(0.1, 1.0),
                    rng.range(0.1, 1.0),
                ),
            },
            _ => Collider::Quad {
                half_size: Vec2::new(rng.range(0.2, 1.5), rng.range(0.2, 1.5)),
            },
        };
        scene.insert(SceneObject::new(collider, Isometry::new(translation, rotation)));
    }
    scene
}

fn gen_rays(count: usize, seed: u64) -> Vec<ControllerRay> {
    let mut rng = Rng::new(seed);
    (0..count)
        .filter_map(|_| {
            let dir = Vec3::new(rng.range(-0.5, 0.5), rng.range(-0.5, 0.5), -1.0);
            ControllerRay::new(Vec3::ZERO, dir).ok()
        })
        .collect()
}

fn bench_scene_cast(c: &mut Criterion) {
    let mut group = c.benchmark_group("scene_cast_ray");
    let rays = gen_rays(256, 7);
    for &n in &[16_usize, 256, 4096] {
        let scene = gen_scene(n, 0xC0FFEE);
        let filter = LayerFilter::default();
        group.throughput(Throughput::Elements(rays.len() as u64));
        group.bench_function(format!("nearest_n{}", n), |b| {
            b.iter(|| {
                let mut hits = 0_usize;
                for r in &rays {
                    if let Some(ray) = Ray::new(r.origin(), r.direction()) {
                        hits += usize::from(
                            scene.cast_ray(&ray, 20.0, &filter).is_some(),
                        );
                    }
                }
                black_box(hits)
            });
        });
    }
    group.finish();
}

fn bench_advance(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconciler_advance");
    let rays = gen_rays(256, 11);
    let scene = gen_scene(256, 0xBEEF);
    let wall = EnvironmentHit::hit(
        EnvironmentStatus::HitObserved,
        Vec3::new(0.0, 0.0, -12.0),
        Vec3::Z,
        12.0,
        0.9,
    );
    group.throughput(Throughput::Elements(rays.len() as u64));
    group.bench_function("scene_n256_with_wall", |b| {
        let mut cursor = Reconciler::<ObjectId>::new(CursorConfig::default())
            .expect("default config is valid");
        cursor.subscribe(|e| {
            black_box(e);
        });
        b.iter(|| {
            for r in &rays {
                black_box(cursor.advance(&scene, *r, Some(&wall)).outcome);
            }
        });
    });
    group.bench_function("miss_only", |b| {
        let mut cursor = Reconciler::<ObjectId>::new(CursorConfig::default())
            .expect("default config is valid");
        let empty = Scene::new();
        b.iter(|| {
            for r in &rays {
                black_box(cursor.advance(&empty, *r, None).outcome);
            }
        });
    });
    group.finish();
}

criterion_group!(benches, bench_scene_cast, bench_advance);
criterion_main!(benches);
