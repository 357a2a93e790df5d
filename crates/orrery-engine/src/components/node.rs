use std::sync::Arc;

use glam::Vec3;

use crate::api::types::NodeId;

/// Shared mesh geometry. Clones of a body share the same `Arc`.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    /// UV sphere of the given local radius.
    Sphere { radius: f32 },
    /// Flat ring in the XZ plane (e.g. Saturn).
    Ring { inner: f32, outer: f32 },
}

impl Geometry {
    /// Radius of the smallest origin-centered sphere enclosing the geometry.
    pub fn extent(&self) -> f32 {
        match *self {
            Geometry::Sphere { radius } => radius,
            Geometry::Ring { outer, .. } => outer,
        }
    }
}

/// Per-instance surface parameters. Cloned per instance so that opacity
/// animation on one instance never leaks into another.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub color: [f32; 3],
    pub opacity: f32,
    pub transparent: bool,
    /// HDR glow multiplier (0.0 for planets).
    pub emissive: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            color: [0.6, 0.6, 0.8],
            opacity: 1.0,
            transparent: false,
            emissive: 0.0,
        }
    }
}

/// A renderable piece of a body.
#[derive(Debug, Clone)]
pub struct Mesh {
    /// Name used for downstream visibility filtering.
    pub name: String,
    pub geometry: Arc<Geometry>,
    pub material: Material,
    /// Offset from the owning node's origin, in local units.
    pub offset: Vec3,
}

impl Mesh {
    pub fn new(geometry: Geometry, material: Material) -> Self {
        Self {
            name: String::new(),
            geometry: Arc::new(geometry),
            material,
            offset: Vec3::ZERO,
        }
    }

    /// Copy with shared geometry and an independent material.
    pub fn instance(&self) -> Self {
        Self {
            name: self.name.clone(),
            geometry: Arc::clone(&self.geometry),
            material: self.material,
            offset: self.offset,
        }
    }
}

/// What a node represents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeKind {
    /// A celestial body.
    Body,
    /// Static dashed reference circle drawn in orbit mode.
    OrbitLine { radius: f32, dash: f32, gap: f32 },
}

/// World-space bounding sphere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingSphere {
    pub center: Vec3,
    pub radius: f32,
}

impl BoundingSphere {
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Same sphere moved to `center`.
    pub fn moved_to(self, center: Vec3) -> Self {
        Self { center, ..self }
    }
}

/// A node in the scene: a body instance or a helper visual.
#[derive(Debug, Clone)]
pub struct Node {
    pub id: NodeId,
    /// Canonical body name (or helper label).
    pub name: String,
    pub kind: NodeKind,
    pub position: Vec3,
    /// Uniform scale.
    pub scale: f32,
    pub visible: bool,
    pub meshes: Vec<Mesh>,
    /// Whether opacity can be animated. Decided once when the node is built.
    pub opacity_channel: bool,
}

impl Node {
    /// Create a body node from a set of meshes.
    pub fn body(id: NodeId, name: impl Into<String>, meshes: Vec<Mesh>) -> Self {
        let opacity_channel = !meshes.is_empty();
        Self {
            id,
            name: name.into(),
            kind: NodeKind::Body,
            position: Vec3::ZERO,
            scale: 1.0,
            visible: true,
            meshes,
            opacity_channel,
        }
    }

    /// Create a dashed orbit reference circle.
    pub fn orbit_line(id: NodeId, name: impl Into<String>, radius: f32, dash: f32, gap: f32) -> Self {
        Self {
            id,
            name: name.into(),
            kind: NodeKind::OrbitLine { radius, dash, gap },
            position: Vec3::ZERO,
            scale: 1.0,
            visible: true,
            meshes: Vec::new(),
            opacity_channel: false,
        }
    }

    // -- Builder pattern --

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// Assign `name` to the node and every mesh it carries.
    pub fn rename(&mut self, name: &str) {
        self.name = name.to_string();
        for mesh in &mut self.meshes {
            mesh.name = name.to_string();
        }
    }

    /// Current opacity (first mesh wins; nodes without meshes are opaque).
    pub fn opacity(&self) -> f32 {
        self.meshes.first().map_or(1.0, |m| m.material.opacity)
    }

    /// Set the opacity of every mesh. No-op without an opacity channel.
    pub fn set_opacity(&mut self, opacity: f32) {
        if !self.opacity_channel {
            return;
        }
        let opacity = opacity.clamp(0.0, 1.0);
        for mesh in &mut self.meshes {
            mesh.material.opacity = opacity;
            mesh.material.transparent = opacity < 1.0;
        }
    }

    /// Bounding sphere in local space (before position/scale).
    pub fn local_bounds(&self) -> BoundingSphere {
        match self.kind {
            NodeKind::OrbitLine { radius, .. } => BoundingSphere::new(Vec3::ZERO, radius),
            NodeKind::Body => {
                let radius = self
                    .meshes
                    .iter()
                    .map(|m| m.offset.length() + m.geometry.extent())
                    .fold(0.0_f32, f32::max);
                BoundingSphere::new(Vec3::ZERO, radius)
            }
        }
    }

    /// Bounding sphere in world space.
    pub fn bounding_sphere(&self) -> BoundingSphere {
        let local = self.local_bounds();
        BoundingSphere::new(
            self.position + local.center * self.scale,
            local.radius * self.scale,
        )
    }
}
