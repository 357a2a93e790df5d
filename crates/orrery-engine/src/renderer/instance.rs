use bytemuck::{Pod, Zeroable};

use crate::assets::registry::BodyRegistry;
use crate::components::node::{Node, NodeKind};
use crate::core::stage::Stage;

/// Instance kind tags written into `NodeInstance::kind`.
pub const KIND_BODY: f32 = 0.0;
pub const KIND_ORBIT_LINE: f32 = 1.0;

/// Per-node render data read by the browser renderer.
/// Must match the TypeScript protocol: 12 floats = 48 bytes stride.
///
/// For orbit lines, `r`/`g` carry the dash and gap lengths instead of a color.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct NodeInstance {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    /// Uniform scale.
    pub scale: f32,
    /// 0.0 = invisible, 1.0 = opaque.
    pub opacity: f32,
    /// 1.0 when visible.
    pub visible: f32,
    /// `KIND_BODY` or `KIND_ORBIT_LINE`.
    pub kind: f32,
    /// Model index of the body (registration order); -1 when unknown.
    pub body_index: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    /// Local radius: sphere radius for bodies, circle radius for lines.
    pub radius: f32,
}

impl NodeInstance {
    pub const FLOATS: usize = 12;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;

    fn from_node(node: &Node, registry: &BodyRegistry) -> Self {
        let (kind, color, radius) = match node.kind {
            NodeKind::Body => {
                let color = node.meshes.first().map_or([1.0; 3], |m| m.material.color);
                (KIND_BODY, color, node.local_bounds().radius)
            }
            NodeKind::OrbitLine { radius, dash, gap } => (KIND_ORBIT_LINE, [dash, gap, 0.0], radius),
        };
        let body_name = node.name.strip_prefix("orbit:").unwrap_or(&node.name);
        let body_index = registry.template(body_name).map_or(-1.0, |t| t.index as f32);

        Self {
            x: node.position.x,
            y: node.position.y,
            z: node.position.z,
            scale: node.scale,
            opacity: node.opacity(),
            visible: if node.visible { 1.0 } else { 0.0 },
            kind,
            body_index,
            r: color[0],
            g: color[1],
            b: color[2],
            radius,
        }
    }
}

/// Camera state for the renderer: 8 floats.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct CameraBlock {
    pub position: [f32; 3],
    pub target: [f32; 3],
    /// 1.0 when user input may move the camera.
    pub enabled: f32,
    pub distance: f32,
}

impl CameraBlock {
    pub const FLOATS: usize = 8;
}

/// Snapshot of the scene, rebuilt every frame.
pub struct RenderBuffer {
    pub instances: Vec<NodeInstance>,
    pub camera: CameraBlock,
}

impl RenderBuffer {
    pub fn new() -> Self {
        Self {
            instances: Vec::with_capacity(64),
            camera: CameraBlock::default(),
        }
    }

    pub fn clear(&mut self) {
        self.instances.clear();
    }

    /// Rebuild from the stage. Hidden nodes are still written so the
    /// renderer can fade them out.
    pub fn build(&mut self, stage: &Stage, registry: &BodyRegistry) {
        self.clear();
        stage
            .scene
            .traverse(|node| self.instances.push(NodeInstance::from_node(node, registry)));
        self.camera = CameraBlock {
            position: stage.camera.position.to_array(),
            target: stage.controls.target.to_array(),
            enabled: if stage.controls.enabled { 1.0 } else { 0.0 },
            distance: stage.camera_distance(),
        };
    }

    pub fn instance_count(&self) -> u32 {
        self.instances.len() as u32
    }

    /// Raw pointer to instance data for the JS side.
    pub fn instances_ptr(&self) -> *const f32 {
        self.instances.as_ptr() as *const f32
    }

    pub fn camera_ptr(&self) -> *const f32 {
        &self.camera as *const CameraBlock as *const f32
    }

    /// Instance data as a flat float slice.
    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.instances)
    }
}

impl Default for RenderBuffer {
    fn default() -> Self {
        Self::new()
    }
}
