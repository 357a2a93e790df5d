pub mod api;
pub mod core;
pub mod components;
pub mod systems;
pub mod renderer;
pub mod assets;
pub mod extensions;

// Re-export key types at crate root for convenience
pub use api::context::EngineContext;
pub use api::error::OrreryError;
pub use api::orrery::Orrery;
pub use api::types::{canonical_name, NodeId, Notice, Slot, ViewMode};
pub use assets::config::{
    BodyDesc, ComparisonConfig, OrbitConfig, OrbitDesc, OrreryConfig, RingDesc, DEFAULT_TIME_WARP,
};
pub use assets::loader::{BodyLoader, CatalogLoader, Prototype};
pub use assets::registry::{BodyInstance, BodyRegistry, BodyTemplate};
pub use components::node::{BoundingSphere, Geometry, Material, Mesh, Node, NodeKind};
pub use core::scene::Scene;
pub use core::stage::Stage;
pub use renderer::camera::{OrbitControls, PerspectiveCamera, ZoomBand};
pub use renderer::instance::{CameraBlock, NodeInstance, RenderBuffer};
pub use systems::comparison::{ComparisonOrchestrator, ComparisonSnapshot, SlotPhase};
pub use systems::framing::CameraRig;
pub use systems::layout::{compute_framing, Framing};
pub use systems::orbit::{angular_speed, OrbitEngine, OrbitEntry};

// Extensions: animation primitives
pub use extensions::{Animator, Easing, Tween, TweenAnimator, TweenId, TweenTarget};
