use crate::api::types::NodeId;
use crate::components::node::Node;

/// Simple node storage using a flat Vec.
/// Designed for small scenes (dozens of bodies, not millions).
pub struct Scene {
    nodes: Vec<Node>,
    next_id: u32,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            nodes: Vec::with_capacity(64),
            next_id: 1,
        }
    }

    /// Hand out a fresh node id. Ids are never reused.
    pub fn alloc_id(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Attach a node. A node already attached under the same id is replaced.
    pub fn add(&mut self, node: Node) -> NodeId {
        let id = node.id;
        if let Some(existing) = self.get_mut(id) {
            *existing = node;
        } else {
            self.nodes.push(node);
        }
        id
    }

    /// Detach a node by ID. Returns the removed node if it was attached.
    pub fn remove(&mut self, id: NodeId) -> Option<Node> {
        let idx = self.nodes.iter().position(|n| n.id == id)?;
        Some(self.nodes.swap_remove(idx))
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.iter().any(|n| n.id == id)
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    /// Find the first node with the given name.
    pub fn get_by_name(&self, name: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.name == name)
    }

    /// Find all nodes with the given name.
    pub fn find_all_by_name(&self, name: &str) -> Vec<&Node> {
        self.nodes.iter().filter(|n| n.name == name).collect()
    }

    /// Visit every attached node.
    pub fn traverse(&self, mut visitor: impl FnMut(&Node)) {
        for node in &self.nodes {
            visitor(node);
        }
    }

    /// Visit every attached node mutably.
    pub fn traverse_mut(&mut self, mut visitor: impl FnMut(&mut Node)) {
        for node in &mut self.nodes {
            visitor(node);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn add_and_get() {
        let mut scene = Scene::new();
        let id = scene.alloc_id();
        scene.add(Node::body(id, "earth", Vec::new()).with_position(Vec3::new(1.0, 2.0, 3.0)));
        assert_eq!(scene.get(id).unwrap().position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(scene.get_by_name("earth").unwrap().id, id);
    }

    #[test]
    fn remove_detaches_node() {
        let mut scene = Scene::new();
        let id = scene.alloc_id();
        scene.add(Node::body(id, "mars", Vec::new()));
        assert!(scene.remove(id).is_some());
        assert!(scene.is_empty());
        assert!(scene.remove(id).is_none());
    }

    #[test]
    fn ids_are_not_reused() {
        let mut scene = Scene::new();
        let a = scene.alloc_id();
        scene.add(Node::body(a, "a", Vec::new()));
        scene.remove(a);
        let b = scene.alloc_id();
        assert_ne!(a, b);
    }

    #[test]
    fn re_adding_same_id_replaces() {
        let mut scene = Scene::new();
        let id = scene.alloc_id();
        scene.add(Node::body(id, "sun", Vec::new()));
        scene.add(Node::body(id, "sun", Vec::new()).with_scale(2.0));
        assert_eq!(scene.len(), 1);
        assert_eq!(scene.get(id).unwrap().scale, 2.0);
    }

    #[test]
    fn traverse_visits_all() {
        let mut scene = Scene::new();
        for name in ["a", "b", "a"] {
            let id = scene.alloc_id();
            scene.add(Node::body(id, name, Vec::new()));
        }
        let mut count = 0;
        scene.traverse(|_| count += 1);
        assert_eq!(count, 3);
        assert_eq!(scene.find_all_by_name("a").len(), 2);
    }
}
