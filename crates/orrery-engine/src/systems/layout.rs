//! Side-by-side layout for two bodies.
//!
//! Pure functions of the inputs: the same spheres always produce the same
//! framing, bit for bit, so re-running a layout is always safe.

use glam::Vec3;

use crate::api::types::Slot;
use crate::assets::config::ComparisonConfig;
use crate::components::node::{BoundingSphere, Node};

/// Where two bodies and the camera should end up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Framing {
    /// Midpoint of the two sphere centers.
    pub center: Vec3,
    /// Rest position of the first (left) body.
    pub target_a: Vec3,
    /// Rest position of the second (right) body.
    pub target_b: Vec3,
    /// Distance between the two rest positions.
    pub separation: f32,
    /// Camera distance from `center`, already clamped to the zoom band.
    pub camera_distance: f32,
}

impl Framing {
    pub fn target(&self, slot: Slot) -> Vec3 {
        match slot {
            Slot::Left => self.target_a,
            Slot::Right => self.target_b,
        }
    }
}

fn side_axis(config: &ComparisonConfig) -> Vec3 {
    config.side_axis.try_normalize().unwrap_or(Vec3::X)
}

/// Frame two bodies using their current world-space bounding spheres.
pub fn compute_framing(a: &Node, b: &Node, config: &ComparisonConfig) -> Framing {
    frame_spheres(a.bounding_sphere(), b.bounding_sphere(), config)
}

/// Frame two bounding spheres: `a` goes on the negative side of the side
/// axis, `b` on the positive side.
pub fn frame_spheres(a: BoundingSphere, b: BoundingSphere, config: &ComparisonConfig) -> Framing {
    let axis = side_axis(config);
    let center = (a.center + b.center) * 0.5;
    let separation = a.radius + b.radius + config.margin;
    let half = axis * (separation * 0.5);
    let camera_distance =
        config.zoom.clamp(separation + config.camera_margin * a.radius.max(b.radius));

    Framing {
        center,
        target_a: center - half,
        target_b: center + half,
        separation,
        camera_distance,
    }
}

/// Rest position for a body about to enter `slot`.
///
/// Both spheres are placed on the anchor before framing, so the pair is
/// always laid out symmetrically about it. Without a partner the body sits
/// on its own side of the anchor.
pub fn entry_target(
    slot: Slot,
    incoming: BoundingSphere,
    partner: Option<BoundingSphere>,
    config: &ComparisonConfig,
) -> Vec3 {
    let anchor = config.anchor;
    match partner {
        Some(partner) => {
            let incoming = incoming.moved_to(anchor);
            let partner = partner.moved_to(anchor);
            let framing = match slot {
                Slot::Left => frame_spheres(incoming, partner, config),
                Slot::Right => frame_spheres(partner, incoming, config),
            };
            framing.target(slot)
        }
        None => solo_target(slot, incoming.radius, config),
    }
}

/// Rest position for a body with no partner.
pub fn solo_target(slot: Slot, radius: f32, config: &ComparisonConfig) -> Vec3 {
    config.anchor + side_axis(config) * (slot.side_sign() * (radius + config.margin * 0.5))
}

/// Camera distance for a single body.
pub fn solo_camera_distance(radius: f32, config: &ComparisonConfig) -> f32 {
    config.zoom.clamp(radius * 2.0 + config.camera_margin * radius + config.margin)
}
