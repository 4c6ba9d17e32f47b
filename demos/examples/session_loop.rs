// Copyright 2025 the Reticle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A full frame loop with an environment raycast service on its own thread.
//!
//! The fake service answers each request a few milliseconds later from a worker
//! thread, so the cursor always reconciles against a slightly stale result.
//! The controller loses tracking for a few frames mid-run.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p reticle_demos --example session_loop`

use std::cell::Cell;
use std::rc::Rc;
use std::sync::Mutex;
use std::sync::mpsc::{self, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use glam::Vec3;
use reticle_cursor::adapter::{RaycastRequest, RaycastService};
use reticle_cursor::config::CursorConfig;
use reticle_cursor::mailbox::ResultMailbox;
use reticle_cursor::session::{CursorSink, SessionBuilder};
use reticle_cursor::types::{ControllerPose, EnvironmentHit, EnvironmentStatus, Frame};
use reticle_scene::{Collider, Isometry, ObjectId, Scene, SceneObject};
use tracing::info;
use tracing_subscriber::EnvFilter;

enum Job {
    Cast(RaycastRequest, ResultMailbox),
    Stop,
}

/// Floor plane at y = -1.5, observed within 4 m of the origin, inferred beyond.
struct FloorService {
    jobs: Mutex<Sender<Job>>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl FloorService {
    fn spawn() -> Self {
        let (tx, rx) = mpsc::channel::<Job>();
        let worker = thread::spawn(move || {
            while let Ok(Job::Cast(req, reply)) = rx.recv() {
                thread::sleep(Duration::from_millis(3));
                reply.deliver(Self::answer(&req));
            }
        });
        Self {
            jobs: Mutex::new(tx),
            worker: Mutex::new(Some(worker)),
        }
    }

    fn answer(req: &RaycastRequest) -> EnvironmentHit {
        if req.direction.y >= -1e-3 {
            return EnvironmentHit::empty(EnvironmentStatus::NoCollision);
        }
        let t = (-1.5 - req.origin.y) / req.direction.y;
        let point = req.origin + req.direction * t;
        let status = if point.length() < 4.0 {
            EnvironmentStatus::HitObserved
        } else if req.collide_with_unobserved {
            EnvironmentStatus::HitUnobserved
        } else {
            return EnvironmentHit::empty(EnvironmentStatus::NoCollision);
        };
        EnvironmentHit::hit(status, point, Vec3::Y, t, 0.7)
    }
}

impl RaycastService for FloorService {
    fn is_available(&self) -> bool {
        self.worker.lock().map(|w| w.is_some()).unwrap_or(false)
    }

    fn request(&self, request: RaycastRequest, reply: ResultMailbox) -> bool {
        self.jobs
            .lock()
            .map(|tx| tx.send(Job::Cast(request, reply)).is_ok())
            .unwrap_or(false)
    }

    fn cancel_pending(&self) {
        if let Ok(tx) = self.jobs.lock() {
            let _ = tx.send(Job::Stop);
        }
        if let Some(handle) = self.worker.lock().ok().and_then(|mut w| w.take()) {
            let _ = handle.join();
        }
    }
}

struct PrintSink;

impl CursorSink<ObjectId> for PrintSink {
    fn present(&mut self, frame: &Frame<ObjectId>) {
        info!(
            outcome = ?frame.outcome,
            feedback = ?frame.feedback,
            position = %format_args!("{:.2}", frame.pose.position),
            scale = frame.pose.scale.x,
            "present"
        );
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut scene = Scene::new();
    let chair = scene.insert(SceneObject::new(
        Collider::Cuboid {
            half_extents: Vec3::new(0.3, 0.5, 0.3),
        },
        Isometry::from_translation(Vec3::new(0.0, -1.0, -2.0)),
    ));
    info!(?chair, "scene ready");

    let frame_no = Rc::new(Cell::new(0_u32));
    let clock = Rc::clone(&frame_no);
    let controller = move || {
        let n = clock.get();
        if (20..24).contains(&n) {
            return None;
        }
        // Sweep from the floor up to the horizon.
        let pitch = -0.9 + 0.03 * n as f32;
        Some(ControllerPose {
            position: Vec3::ZERO,
            forward: Vec3::new(0.0, pitch, -1.0),
            up: Vec3::Y,
        })
    };

    let config = CursorConfig {
        collide_with_unobserved: true,
        ..CursorConfig::default()
    };
    let mut session = SessionBuilder::new()
        .config(config)
        .controller(controller)
        .service(FloorService::spawn())
        .sink(PrintSink)
        .build::<ObjectId>()?;

    session.subscribe(|e| info!(event = ?e, "event"));

    for n in 0..40 {
        frame_no.set(n);
        session.tick(&scene);
        thread::sleep(Duration::from_millis(5));
    }

    session.shutdown();
    info!(
        deliveries = session.raycaster().mailbox().deliveries(),
        "session finished"
    );
    Ok(())
}
