use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::api::error::OrreryError;
use crate::api::types::canonical_name;
use crate::extensions::easing::Easing;
use crate::renderer::camera::ZoomBand;

/// Seconds per Earth day.
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Earth's sidereal period in days.
pub const EARTH_PERIOD_DAYS: f64 = 365.256;

/// Time-warp factor under which Earth completes one revolution in ~60 s.
pub const DEFAULT_TIME_WARP: f64 = EARTH_PERIOD_DAYS * SECONDS_PER_DAY / 60.0;

/// Top-level configuration. Loaded from JSON at runtime; every section
/// falls back to the built-in defaults when omitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OrreryConfig {
    /// Name of the distinguished star (never cloned).
    pub star: String,
    pub bodies: Vec<BodyDesc>,
    pub comparison: ComparisonConfig,
    pub orbit: OrbitConfig,
}

/// One body in the catalogue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BodyDesc {
    pub name: String,
    /// Visual radius in Earth radii.
    pub radius: f32,
    pub color: [f32; 3],
    #[serde(default)]
    pub emissive: f32,
    #[serde(default)]
    pub ring: Option<RingDesc>,
    /// Present only for bodies that circle the star in orbit mode.
    #[serde(default)]
    pub orbit: Option<OrbitDesc>,
}

/// Flat ring, in multiples of the body radius.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RingDesc {
    pub inner: f32,
    pub outer: f32,
}

/// Orbit-mode parameters for one body.
///
/// Radius and display scale are chosen for legibility, not derived from
/// physical values: true sizes and true distances cannot share one view.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OrbitDesc {
    /// Real orbital period in Earth days. Negative means retrograde.
    pub period_days: f64,
    /// Orbit radius in scene units.
    pub radius: f32,
    /// Display scale while in orbit mode.
    pub scale: f32,
}

/// Comparison-mode constants, shared by layout and camera framing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparisonConfig {
    /// Point the two bodies are laid out around.
    pub anchor: Vec3,
    /// Axis the two bodies are separated along (left = negative).
    pub side_axis: Vec3,
    /// Direction bodies leave and arrive from.
    pub exit_axis: Vec3,
    pub exit_offset: f32,
    /// Gap between the two bounding spheres.
    pub margin: f32,
    /// Multiplier on the larger radius added to the camera distance.
    pub camera_margin: f32,
    /// Exit and enter animation duration (seconds).
    pub transition_duration: f32,
    /// Duration of the settle-into-layout animation. Keep it no longer than
    /// `transition_duration`.
    pub layout_duration: f32,
    pub camera_duration: f32,
    pub exit_easing: Easing,
    pub enter_easing: Easing,
    /// Scale applied once to the star when it enters a comparison slot.
    pub star_scale: f32,
    /// Camera distance band for the solar-system and comparison views.
    pub zoom: ZoomBand,
}

/// Orbit-mode constants.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitConfig {
    /// Multiplier on real angular speed.
    pub time_warp: f64,
    pub center: Vec3,
    /// Star display scale in orbit mode.
    pub star_scale: f32,
    /// Dashed orbit line pattern (scene units).
    pub line_dash: f32,
    pub line_gap: f32,
    /// Seed for initial orbit angles.
    pub seed: u64,
    pub camera_distance: f32,
    pub camera_duration: f32,
    pub zoom: ZoomBand,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            anchor: Vec3::ZERO,
            side_axis: Vec3::X,
            exit_axis: Vec3::NEG_Y,
            exit_offset: 30.0,
            margin: 2.0,
            camera_margin: 2.5,
            transition_duration: 0.8,
            layout_duration: 0.6,
            camera_duration: 1.0,
            exit_easing: Easing::QuadIn,
            enter_easing: Easing::QuadOut,
            star_scale: 0.2,
            zoom: ZoomBand::new(2.0, 400.0),
        }
    }
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            time_warp: DEFAULT_TIME_WARP,
            center: Vec3::ZERO,
            star_scale: 0.1,
            line_dash: 1.5,
            line_gap: 1.0,
            seed: 0x5EED_0F_0B17,
            camera_distance: 260.0,
            camera_duration: 1.2,
            zoom: ZoomBand::new(30.0, 600.0),
        }
    }
}

fn body(name: &str, radius: f32, color: [f32; 3], orbit: Option<(f64, f32, f32)>) -> BodyDesc {
    BodyDesc {
        name: name.to_string(),
        radius,
        color,
        emissive: 0.0,
        ring: None,
        orbit: orbit.map(|(period_days, radius, scale)| OrbitDesc { period_days, radius, scale }),
    }
}

impl Default for OrreryConfig {
    fn default() -> Self {
        let mut sun = body("sun", 109.2, [1.0, 0.9, 0.5], None);
        sun.emissive = 3.5;
        let mut saturn = body("saturn", 9.45, [0.85, 0.75, 0.50], Some((10759.22, 108.0, 0.55)));
        saturn.ring = Some(RingDesc { inner: 1.2, outer: 2.3 });

        Self {
            star: "sun".to_string(),
            bodies: vec![
                sun,
                body("mercury", 0.383, [0.60, 0.55, 0.50], Some((87.97, 20.0, 1.6))),
                body("venus", 0.949, [0.90, 0.75, 0.40], Some((224.70, 30.0, 1.8))),
                body("earth", 1.0, [0.20, 0.40, 0.80], Some((EARTH_PERIOD_DAYS, 42.0, 2.0))),
                body("mars", 0.532, [0.80, 0.30, 0.15], Some((686.98, 54.0, 1.7))),
                body("jupiter", 11.21, [0.80, 0.70, 0.50], Some((4332.59, 80.0, 0.55))),
                saturn,
                body("uranus", 4.01, [0.50, 0.75, 0.85], Some((30688.5, 132.0, 0.8))),
                body("neptune", 3.88, [0.25, 0.35, 0.80], Some((60182.0, 152.0, 0.8))),
                body("pluto", 0.187, [0.70, 0.60, 0.50], Some((90560.0, 170.0, 3.0))),
                body("moon", 0.273, [0.70, 0.70, 0.70], None),
            ],
            comparison: ComparisonConfig::default(),
            orbit: OrbitConfig::default(),
        }
    }
}

impl OrreryConfig {
    /// Parse a configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, OrreryError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, OrreryError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Case-insensitive catalogue lookup.
    pub fn body(&self, name: &str) -> Option<&BodyDesc> {
        let name = canonical_name(name);
        self.bodies.iter().find(|b| canonical_name(&b.name) == name)
    }

    /// Bodies that circle the star in orbit mode (the star itself excluded).
    pub fn orbiting(&self) -> impl Iterator<Item = (&BodyDesc, &OrbitDesc)> {
        let star = canonical_name(&self.star);
        self.bodies
            .iter()
            .filter(move |b| canonical_name(&b.name) != star)
            .filter_map(|b| b.orbit.as_ref().map(|o| (b, o)))
    }
}
