use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Allowed camera distance range for a view mode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomBand {
    pub min: f32,
    pub max: f32,
}

impl ZoomBand {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn clamp(&self, distance: f32) -> f32 {
        distance.clamp(self.min, self.max.max(self.min))
    }

    pub fn contains(&self, distance: f32) -> bool {
        distance >= self.min && distance <= self.max
    }
}

/// Perspective camera looking at the orbit-controls target. Projection
/// parameters live on the renderer side; only the eye position is driven
/// from here.
#[derive(Debug, Clone)]
pub struct PerspectiveCamera {
    pub position: Vec3,
}

impl PerspectiveCamera {
    pub fn new(position: Vec3) -> Self {
        Self { position }
    }
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 40.0, 120.0))
    }
}

/// Orbit-style user controls: a look-at target, an input gate, and the
/// distance limits the user's own zooming is held to.
#[derive(Debug, Clone)]
pub struct OrbitControls {
    pub target: Vec3,
    /// When false, user input must not move the camera.
    pub enabled: bool,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl OrbitControls {
    pub fn new(band: ZoomBand) -> Self {
        Self {
            target: Vec3::ZERO,
            enabled: true,
            min_distance: band.min,
            max_distance: band.max,
        }
    }

    pub fn apply_band(&mut self, band: ZoomBand) {
        self.min_distance = band.min;
        self.max_distance = band.max;
    }

    /// Current camera-to-target distance.
    pub fn distance(&self, camera: &PerspectiveCamera) -> f32 {
        camera.position.distance(self.target)
    }
}
