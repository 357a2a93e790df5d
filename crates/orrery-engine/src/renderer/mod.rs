pub mod camera;
pub mod instance;

pub use camera::{OrbitControls, PerspectiveCamera, ZoomBand};
pub use instance::{CameraBlock, NodeInstance, RenderBuffer};
