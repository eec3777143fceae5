//! Camera letterboxing, safe-area handling and wall bounds
//!
//! The playfield is authored for a 9:16 portrait screen. Narrower screens
//! grow the orthographic size so the side walls stay visible, and the
//! platform's safe-area insets shrink the viewport before anything else is
//! computed.

use serde::{Deserialize, Serialize};

use crate::config::ViewportConfig;
use crate::platform::SafeAreaInsets;

fn usable(v: f32) -> bool {
    v.is_finite() && v > 0.0
}

/// Wall positions every obstacle is placed relative to
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WallBounds {
    /// |x| of the left/right walls
    pub side_wall_x: f32,
    /// |y| of the top/bottom walls
    pub top_bottom_y: f32,
}

impl WallBounds {
    /// Both walls at a finite, positive distance from the origin
    pub fn is_usable(&self) -> bool {
        usable(self.side_wall_x) && usable(self.top_bottom_y)
    }
}

/// Normalized viewport rectangle (0-1, origin bottom-left)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Default for ViewportRect {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: 1.0,
            height: 1.0,
        }
    }
}

impl ViewportRect {
    /// Viewport that avoids the given insets (device pixels)
    pub fn from_insets(insets: &SafeAreaInsets, screen_width: f32, screen_height: f32) -> Self {
        let (left, right) = (insets.left as f32, insets.right as f32);
        let (top, bottom) = (insets.top as f32, insets.bottom as f32);
        let rect = Self {
            x: left / screen_width,
            y: bottom / screen_height,
            width: (screen_width - left - right) / screen_width,
            height: (screen_height - top - bottom) / screen_height,
        };
        if !usable(rect.width) || !usable(rect.height) || !rect.x.is_finite() || !rect.y.is_finite()
        {
            log::warn!("Safe area insets {:?} leave no viewport, ignoring", insets);
            return Self::default();
        }
        rect
    }
}

/// Resolved camera for the current screen
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraFrame {
    /// Half-height of the visible area in world units
    pub ortho_size: f32,
    /// Visible width / height
    pub aspect: f32,
    /// Vertical camera offset from the stretch settings
    pub center_y: f32,
}

/// Screen, safe area and camera settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Viewport {
    pub config: ViewportConfig,
    pub rect: ViewportRect,
}

impl Viewport {
    pub fn new(config: ViewportConfig) -> Self {
        Self {
            config,
            rect: ViewportRect::default(),
        }
    }

    /// Apply platform safe-area insets (already in device pixels)
    pub fn apply_safe_area(&mut self, insets: &SafeAreaInsets) {
        self.rect =
            ViewportRect::from_insets(insets, self.config.screen_width, self.config.screen_height);
        log::info!("Camera viewport adjusted to safe area: {:?}", self.rect);
    }

    /// Returns false (and keeps the old size) for empty or non-finite sizes
    pub fn resize(&mut self, screen_width: f32, screen_height: f32) -> bool {
        if !usable(screen_width) || !usable(screen_height) {
            log::warn!(
                "Ignoring screen size {}x{}",
                screen_width,
                screen_height
            );
            return false;
        }
        self.config.screen_width = screen_width;
        self.config.screen_height = screen_height;
        true
    }

    /// Letterbox the authored camera into the current viewport
    pub fn camera(&self) -> CameraFrame {
        let c = &self.config;
        let target_aspect = c.target_width / c.target_height;
        let pixel_width = c.screen_width * self.rect.width;
        let pixel_height = c.screen_height * self.rect.height;
        let current_aspect = pixel_width / pixel_height;

        let base_size = if current_aspect < target_aspect {
            c.initial_ortho_size * (target_aspect / current_aspect)
        } else {
            c.initial_ortho_size
        };

        let total_height = base_size * 2.0 + c.top_stretch + c.bottom_stretch;
        CameraFrame {
            ortho_size: total_height / 2.0,
            aspect: current_aspect,
            center_y: (c.top_stretch - c.bottom_stretch) / 2.0,
        }
    }

    /// Wall positions for the current camera, unless fixed by config
    pub fn wall_bounds(&self) -> WallBounds {
        let camera = self.camera();
        WallBounds {
            side_wall_x: self
                .config
                .fixed_side_wall_x
                .map(f32::abs)
                .unwrap_or(camera.ortho_size * camera.aspect),
            top_bottom_y: self
                .config
                .fixed_top_bottom_y
                .map(f32::abs)
                .unwrap_or(camera.ortho_size),
        }
    }
}
