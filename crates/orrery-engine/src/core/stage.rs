use crate::core::scene::Scene;
use crate::renderer::camera::{OrbitControls, PerspectiveCamera, ZoomBand};

/// Everything an animation can write to: the scene graph, the camera,
/// and the orbit controls.
pub struct Stage {
    pub scene: Scene,
    pub camera: PerspectiveCamera,
    pub controls: OrbitControls,
}

impl Stage {
    pub fn new(band: ZoomBand) -> Self {
        Self {
            scene: Scene::new(),
            camera: PerspectiveCamera::default(),
            controls: OrbitControls::new(band),
        }
    }

    /// Camera-to-target distance.
    pub fn camera_distance(&self) -> f32 {
        self.controls.distance(&self.camera)
    }
}
