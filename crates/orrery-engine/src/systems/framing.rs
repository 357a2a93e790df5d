use std::collections::HashSet;

use glam::Vec3;

use crate::core::stage::Stage;
use crate::extensions::easing::Easing;
use crate::extensions::tween::{Animator, Tween, TweenId};
use crate::renderer::camera::ZoomBand;

/// Default viewing direction (from focus toward camera) when the current
/// one is degenerate: slightly above the ecliptic.
const FALLBACK_VIEW_AXIS: Vec3 = Vec3::new(0.0, 0.25, 1.0);

/// Animated camera moves shared by comparison and orbit mode.
///
/// User input is disabled for the duration of a move and re-enabled only
/// when the newest move finishes.
#[derive(Debug)]
pub struct CameraRig {
    /// Completion of the newest camera move.
    pending: Option<TweenId>,
    /// Completions of moves a newer one replaced.
    retired: HashSet<TweenId>,
    pub easing: Easing,
}

impl CameraRig {
    pub fn new() -> Self {
        Self {
            pending: None,
            retired: HashSet::new(),
            easing: Easing::CubicInOut,
        }
    }

    /// Move the camera to look at `focus` from `distance` along the current
    /// view axis. `distance` is clamped to `band`, and the band is also
    /// applied to the user controls. Returns the distance actually used.
    pub fn frame_on(
        &mut self,
        stage: &mut Stage,
        animator: &mut dyn Animator,
        focus: Vec3,
        distance: f32,
        band: ZoomBand,
        duration: f32,
    ) -> f32 {
        let distance = band.clamp(distance);
        let axis = (stage.camera.position - stage.controls.target)
            .try_normalize()
            .unwrap_or_else(|| FALLBACK_VIEW_AXIS.normalize());

        stage.controls.enabled = false;
        stage.controls.apply_band(band);

        let done = animator.animate(
            Tween::camera_position(focus + axis * distance, duration, self.easing).notify(),
        );
        animator.animate(Tween::controls_target(focus, duration, self.easing));

        if let Some(previous) = self.pending.replace(done) {
            self.retired.insert(previous);
        }
        log::debug!("camera: framing {focus:?} at distance {distance:.2}");
        distance
    }

    /// Handle a tween completion. Returns true when the id belonged to a
    /// camera move (current or retired).
    pub fn on_complete(&mut self, id: TweenId, stage: &mut Stage) -> bool {
        if self.pending == Some(id) {
            self.pending = None;
            stage.controls.enabled = true;
            return true;
        }
        self.retired.remove(&id)
    }

    pub fn is_animating(&self) -> bool {
        self.pending.is_some()
    }
}

impl Default for CameraRig {
    fn default() -> Self {
        Self::new()
    }
}
