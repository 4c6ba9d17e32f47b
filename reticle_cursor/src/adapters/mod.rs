// Copyright 2025 the Reticle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Adapters to integrate with other Reticle crates.
//!
//! Enabled via feature flags so the core does not depend on any particular scene.

#[cfg(feature = "scene_adapter")]
pub mod scene;
