use crate::api::error::OrreryError;
use crate::api::types::canonical_name;
use crate::assets::config::BodyDesc;
use crate::components::node::{Geometry, Material, Mesh};

/// Opaque renderable graph returned by a loader: named meshes plus a base
/// scale. Its bounding volume is computable from the meshes.
#[derive(Debug, Clone)]
pub struct Prototype {
    pub name: String,
    pub meshes: Vec<Mesh>,
    pub scale: f32,
}

impl Prototype {
    /// Local radius of the enclosing sphere at scale 1.
    pub fn base_radius(&self) -> f32 {
        self.meshes
            .iter()
            .map(|m| m.offset.length() + m.geometry.extent())
            .fold(0.0_f32, f32::max)
    }
}

/// Source of body prototypes. Model decoding lives behind this trait.
pub trait BodyLoader {
    fn load(&mut self, name: &str) -> Result<Prototype, OrreryError>;
}

/// Builds sphere proxies (and rings) straight from the configured catalogue.
/// The browser renderer swaps in real models keyed by body name.
pub struct CatalogLoader {
    bodies: Vec<BodyDesc>,
}

impl CatalogLoader {
    pub fn new(bodies: &[BodyDesc]) -> Self {
        Self { bodies: bodies.to_vec() }
    }
}

impl BodyLoader for CatalogLoader {
    fn load(&mut self, name: &str) -> Result<Prototype, OrreryError> {
        let wanted = canonical_name(name);
        let desc = self
            .bodies
            .iter()
            .find(|b| canonical_name(&b.name) == wanted)
            .ok_or_else(|| OrreryError::not_found(&wanted))?;

        let material = Material {
            color: desc.color,
            emissive: desc.emissive,
            ..Default::default()
        };
        let mut meshes = vec![Mesh::new(Geometry::Sphere { radius: desc.radius }, material)];
        if let Some(ring) = desc.ring {
            meshes.push(Mesh::new(
                Geometry::Ring {
                    inner: desc.radius * ring.inner,
                    outer: desc.radius * ring.outer,
                },
                Material { opacity: 0.8, transparent: true, ..material },
            ));
        }

        Ok(Prototype { name: wanted, meshes, scale: 1.0 })
    }
}
