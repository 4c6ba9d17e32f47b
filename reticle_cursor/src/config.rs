// Copyright 2025 the Reticle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cursor configuration.
//!
//! Pure data consumed at construction. Loadable from TOML; every field has a default,
//! so a partial file only overrides what it names:
//!
//! ```
//! use reticle_cursor::config::CursorConfig;
//!
//! let cfg = CursorConfig::from_toml_str("default_distance = 4.5\nscale_when_close = false").unwrap();
//! assert_eq!(cfg.default_distance, 4.5);
//! assert!(!cfg.scale_when_close);
//! assert_eq!(cfg.width, 1);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Construction-time settings for the environment raycast and the reconciler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CursorConfig {
    /// Horizontal ray count requested from the environment service.
    pub width: u32,
    /// Vertical ray count requested from the environment service.
    pub height: u32,
    /// Horizontal field of view of the request, in degrees.
    pub horizontal_fov_degrees: f32,
    /// Let the environment service report hits on unobserved surfaces.
    pub collide_with_unobserved: bool,
    /// Cursor distance along the ray when the environment reports no hit.
    pub default_distance: f32,
    /// Shrink the cursor with distance when closer than `close_scale_threshold`.
    pub scale_when_close: bool,
    /// Distance below which close scaling applies.
    pub close_scale_threshold: f32,
    /// Where the cursor is drawn along the ray on a miss.
    pub miss_distance: f32,
    /// Width of the pointer line.
    pub line_width: f32,
    /// Colors for each feedback state.
    pub palette: Palette,
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self {
            width: 1,
            height: 1,
            horizontal_fov_degrees: 0.0,
            collide_with_unobserved: false,
            default_distance: 9.0,
            scale_when_close: true,
            close_scale_threshold: 1.0,
            miss_distance: 2.0,
            line_width: 0.01,
            palette: Palette::default(),
        }
    }
}

impl CursorConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Serialize to TOML.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string(self)?)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 {
            return Err(invalid("width", "must be at least 1"));
        }
        if self.height == 0 {
            return Err(invalid("height", "must be at least 1"));
        }
        if !(0.0..180.0).contains(&self.horizontal_fov_degrees) {
            return Err(invalid("horizontal_fov_degrees", "must be in [0, 180)"));
        }
        positive("default_distance", self.default_distance)?;
        positive("close_scale_threshold", self.close_scale_threshold)?;
        positive("miss_distance", self.miss_distance)?;
        if !self.line_width.is_finite() || self.line_width < 0.0 {
            return Err(invalid("line_width", "must be finite and non-negative"));
        }
        Ok(())
    }
}

fn positive(field: &'static str, v: f32) -> Result<(), ConfigError> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, "must be finite and positive"))
    }
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.to_owned(),
    }
}

/// Linear RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    /// Red.
    pub r: f32,
    /// Green.
    pub g: f32,
    /// Blue.
    pub b: f32,
    /// Alpha.
    pub a: f32,
}

impl Rgba {
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    /// Opaque yellow.
    pub const YELLOW: Self = Self::rgb(1.0, 0.92, 0.016);
    /// Opaque green.
    pub const GREEN: Self = Self::rgb(0.0, 1.0, 0.0);
    /// Opaque red.
    pub const RED: Self = Self::rgb(1.0, 0.0, 0.0);

    /// Opaque color from components.
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }
}

/// Colors used by [`VisualFeedback::tint`](crate::types::VisualFeedback::tint).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    /// Cursor on any hit with a confirmed surface.
    pub active: Rgba,
    /// Unobserved surfaces; also the line on world-mesh hits.
    pub secondary: Rgba,
    /// Line while hovering an object.
    pub highlight: Rgba,
    /// Everything on a miss.
    pub inactive: Rgba,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            active: Rgba::WHITE,
            secondary: Rgba::YELLOW,
            highlight: Rgba::GREEN,
            inactive: Rgba::RED,
        }
    }
}

/// Cursor and line colors for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tint {
    /// Cursor color.
    pub cursor: Rgba,
    /// Pointer line color.
    pub line: Rgba,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let cfg = CursorConfig::default();
        cfg.validate().unwrap();
        assert_eq!(cfg.default_distance, 9.0);
        assert!(cfg.scale_when_close);
        assert!(!cfg.collide_with_unobserved);
    }

    #[test]
    fn empty_document_yields_defaults() {
        assert_eq!(
            CursorConfig::from_toml_str("").unwrap(),
            CursorConfig::default()
        );
    }

    #[test]
    fn palette_overrides_are_partial() {
        let cfg = CursorConfig::from_toml_str(
            r#"
            [palette.highlight]
            r = 0.0
            g = 0.5
            b = 1.0
            a = 1.0
            "#,
        )
        .unwrap();
        assert_eq!(cfg.palette.highlight, Rgba::rgb(0.0, 0.5, 1.0));
        assert_eq!(cfg.palette.inactive, Rgba::RED);
    }

    #[test]
    fn rejects_out_of_range() {
        for (doc, field) in [
            ("width = 0", "width"),
            ("height = 0", "height"),
            ("horizontal_fov_degrees = 180.0", "horizontal_fov_degrees"),
            ("default_distance = 0.0", "default_distance"),
            ("miss_distance = -2.0", "miss_distance"),
            ("close_scale_threshold = nan", "close_scale_threshold"),
            ("line_width = -0.1", "line_width"),
        ] {
            match CursorConfig::from_toml_str(doc) {
                Err(ConfigError::Invalid { field: f, .. }) => assert_eq!(f, field, "{doc}"),
                other => panic!("{doc}: expected Invalid, got {other:?}"),
            }
        }
    }

    #[test]
    fn rejects_malformed_toml() {
        assert!(matches!(
            CursorConfig::from_toml_str("width = \"wide\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn load_round_trips_through_file() {
        let cfg = CursorConfig {
            width: 4,
            height: 3,
            horizontal_fov_degrees: 40.0,
            collide_with_unobserved: true,
            ..CursorConfig::default()
        };
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(cfg.to_toml_string().unwrap().as_bytes())
            .unwrap();
        assert_eq!(CursorConfig::load(file.path()).unwrap(), cfg);
    }

    #[test]
    fn load_reports_missing_file() {
        let err = CursorConfig::load("/nonexistent/reticle.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
