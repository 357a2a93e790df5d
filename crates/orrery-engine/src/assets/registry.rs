use std::collections::HashMap;

use glam::Vec3;

use crate::api::error::OrreryError;
use crate::api::types::{canonical_name, NodeId};
use crate::assets::loader::{BodyLoader, Prototype};
use crate::components::node::{Mesh, Node};
use crate::core::scene::Scene;

/// Immutable description of a body, created once at startup.
#[derive(Debug)]
pub struct BodyTemplate {
    pub name: String,
    pub prototype: Prototype,
    /// Registration order; doubles as the renderer's model index.
    pub index: usize,
    pub is_star: bool,
    /// Star only: the comparison-mode scale has been applied.
    comparison_scaled: bool,
}

impl BodyTemplate {
    pub fn base_radius(&self) -> f32 {
        self.prototype.base_radius() * self.prototype.scale
    }
}

/// Exclusive handle to a live, scene-attached body.
///
/// Not `Clone`: whoever holds it owns the instance and must hand it back
/// through `BodyRegistry::release`. The star's handle is one lease on a
/// shared node.
#[derive(Debug)]
pub struct BodyInstance {
    node: NodeId,
    name: String,
    shared: bool,
}

impl BodyInstance {
    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// True for the star, whose node is shared between holders.
    pub fn is_shared(&self) -> bool {
        self.shared
    }
}

/// The star's single node and who is holding it.
#[derive(Debug, Default)]
struct StarState {
    id: Option<NodeId>,
    /// Detached node kept for reuse; never destroyed.
    parked: Option<Node>,
    leases: u32,
}

/// Name → template cache with clone-on-demand spawning.
pub struct BodyRegistry {
    templates: HashMap<String, BodyTemplate>,
    star_name: String,
    star: StarState,
    comparison_star_scale: f32,
    live: HashMap<String, Vec<NodeId>>,
}

impl BodyRegistry {
    pub fn new(star_name: &str, comparison_star_scale: f32) -> Self {
        Self {
            templates: HashMap::new(),
            star_name: canonical_name(star_name),
            star: StarState::default(),
            comparison_star_scale,
            live: HashMap::new(),
        }
    }

    /// Register a prototype under its canonical name.
    pub fn register(&mut self, prototype: Prototype) {
        let name = canonical_name(&prototype.name);
        let index = self
            .templates
            .get(&name)
            .map_or(self.templates.len(), |t| t.index);
        let is_star = name == self.star_name;
        self.templates.insert(
            name.clone(),
            BodyTemplate {
                name,
                prototype,
                index,
                is_star,
                comparison_scaled: false,
            },
        );
    }

    /// Load and register every name. Names the loader cannot supply are
    /// logged and skipped. Returns how many templates were registered.
    pub fn load_all<'a>(
        &mut self,
        loader: &mut dyn BodyLoader,
        names: impl IntoIterator<Item = &'a str>,
    ) -> usize {
        let mut loaded = 0;
        for name in names {
            match loader.load(name) {
                Ok(prototype) => {
                    self.register(prototype);
                    loaded += 1;
                }
                Err(err) => log::warn!("skipping body `{name}`: {err}"),
            }
        }
        log::info!("body registry: {loaded} templates loaded");
        loaded
    }

    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(&canonical_name(name))
    }

    pub fn template(&self, name: &str) -> Option<&BodyTemplate> {
        self.templates.get(&canonical_name(name))
    }

    pub fn is_star(&self, name: &str) -> bool {
        canonical_name(name) == self.star_name
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Attach a live instance of `name` to the scene.
    ///
    /// Ordinary bodies get a fresh clone with shared geometry and private
    /// materials. The star returns its one shared node; the comparison
    /// scale is applied to it at most once.
    pub fn spawn(&mut self, name: &str, scene: &mut Scene) -> Result<BodyInstance, OrreryError> {
        let name = canonical_name(name);
        let template = self
            .templates
            .get_mut(&name)
            .ok_or_else(|| OrreryError::not_found(&name))?;

        if template.is_star {
            let id = *self.star.id.get_or_insert_with(|| scene.alloc_id());
            if self.star.leases == 0 || !scene.contains(id) {
                let mut node = self
                    .star
                    .parked
                    .take()
                    .unwrap_or_else(|| build_node(id, template));
                node.visible = true;
                scene.add(node);
            }
            if !template.comparison_scaled {
                if let Some(node) = scene.get_mut(id) {
                    node.scale = template.prototype.scale * self.comparison_star_scale;
                }
                template.comparison_scaled = true;
            }
            self.star.leases += 1;
            log::debug!("spawned star `{name}` (leases: {})", self.star.leases);
            return Ok(BodyInstance { node: id, name, shared: true });
        }

        let id = scene.alloc_id();
        scene.add(build_node(id, template));
        self.live.entry(name.clone()).or_default().push(id);
        log::debug!("spawned `{name}` as {id:?}");
        Ok(BodyInstance { node: id, name, shared: false })
    }

    /// Detach an instance. Clones are dropped; the star is parked once its
    /// last holder lets go, with visibility and position reset.
    pub fn release(&mut self, instance: BodyInstance, scene: &mut Scene) {
        if instance.shared {
            self.star.leases = self.star.leases.saturating_sub(1);
            if self.star.leases == 0 {
                if let Some(mut node) = scene.remove(instance.node) {
                    node.visible = false;
                    node.position = Vec3::ZERO;
                    self.star.parked = Some(node);
                }
            }
            log::debug!("released star (leases: {})", self.star.leases);
            return;
        }

        scene.remove(instance.node);
        if let Some(ids) = self.live.get_mut(&instance.name) {
            ids.retain(|&id| id != instance.node);
        }
        log::debug!("released `{}` ({:?})", instance.name, instance.node);
    }

    /// Forget that the comparison scale was applied, after some other mode
    /// overwrote the star's scale.
    pub fn invalidate_star_scale(&mut self) {
        if let Some(template) = self.templates.get_mut(&self.star_name) {
            template.comparison_scaled = false;
        }
    }

    /// World radius an instance of `name` will have in a comparison slot.
    pub fn comparison_radius(&self, name: &str) -> Option<f32> {
        let template = self.template(name)?;
        let star_factor = if template.is_star { self.comparison_star_scale } else { 1.0 };
        Some(template.prototype.base_radius() * template.prototype.scale * star_factor)
    }

    /// Number of live instances of `name` attached to the scene.
    pub fn live_count(&self, name: &str) -> usize {
        let name = canonical_name(name);
        if name == self.star_name {
            return usize::from(self.star.leases > 0);
        }
        self.live.get(&name).map_or(0, Vec::len)
    }

    pub fn star_leases(&self) -> u32 {
        self.star.leases
    }
}

fn build_node(id: NodeId, template: &BodyTemplate) -> Node {
    let meshes = template.prototype.meshes.iter().map(Mesh::instance).collect();
    let mut node = Node::body(id, template.name.clone(), meshes).with_scale(template.prototype.scale);
    node.rename(&template.name);
    node
}
