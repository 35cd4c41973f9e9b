// scene.rs     Scene graph
//
// Copyright (c) 2024  Douglas Lau
//
use crate::error::Result;
use crate::gltf;
use crate::material::MaterialId;
use crate::shape::Shape;
use crate::table::PrimitiveSpec;
use crate::xform::Transform;
use glam::Affine3A;
use std::io::Write;

/// Scene node identifier
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct NodeId(usize);

/// Renderable primitive: a shape drawn with a palette material
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Primitive {
    /// Shape with parameters
    pub shape: Shape,

    /// Palette material
    pub material: MaterialId,
}

/// Node content
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Content {
    /// Grouping node
    Group,

    /// Mesh node
    Mesh(Primitive),
}

/// Scene graph node
#[derive(Clone, Debug)]
pub struct Node {
    /// Node name
    name: Option<String>,

    /// Local transform
    pub xform: Transform,

    /// Node content
    content: Content,

    /// Parent node
    parent: Option<NodeId>,

    /// Child nodes (in order)
    children: Vec<NodeId>,

    /// Node this one was cloned from
    cloned_from: Option<NodeId>,
}

/// Scene graph
///
/// Nodes are owned by the scene and live as long as it does.  A node is
/// either a root, a child of exactly one parent, or detached.
///
/// ```rust
/// # use protagonist::{Scene, Transform};
/// # use glam::Vec3;
/// let mut scene = Scene::default();
/// let root = scene.add_group("root");
/// scene.add_root(root);
/// let arm = scene.add_group("arm");
/// scene.node_mut(arm).xform = Transform::from_translation(Vec3::X);
/// scene.attach(root, arm);
/// assert_eq!(scene.parent(arm), Some(root));
/// ```
#[derive(Clone, Debug, Default)]
pub struct Scene {
    /// All nodes
    nodes: Vec<Node>,

    /// Root nodes
    roots: Vec<NodeId>,
}

impl Node {
    /// Create a new node
    fn new(name: Option<String>, content: Content, xform: Transform) -> Self {
        Node {
            name,
            xform,
            content,
            parent: None,
            children: Vec::new(),
            cloned_from: None,
        }
    }

    /// Get the node name
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Get the node content
    pub fn content(&self) -> &Content {
        &self.content
    }

    /// Get the primitive (mesh nodes only)
    pub fn primitive(&self) -> Option<&Primitive> {
        match &self.content {
            Content::Mesh(prim) => Some(prim),
            Content::Group => None,
        }
    }

    /// Get the parent node
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Get the child nodes
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Get the node this was cloned from
    pub fn cloned_from(&self) -> Option<NodeId> {
        self.cloned_from
    }
}

impl Scene {
    /// Get the count of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the scene is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get the root nodes
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Get a node
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Get a mutable node
    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    /// Get the parent of a node
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// Get the children of a node
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    /// Push a new detached node
    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Add a detached group node
    pub fn add_group(&mut self, name: impl Into<String>) -> NodeId {
        let node =
            Node::new(Some(name.into()), Content::Group, Transform::default());
        self.push(node)
    }

    /// Add a detached mesh node
    pub fn add_mesh(&mut self, prim: Primitive, xform: Transform) -> NodeId {
        self.push(Node::new(None, Content::Mesh(prim), xform))
    }

    /// Add a detached mesh node from a table row
    pub fn add_spec(&mut self, spec: &PrimitiveSpec) -> NodeId {
        let prim = Primitive {
            shape: spec.shape,
            material: spec.material,
        };
        self.add_mesh(prim, spec.transform())
    }

    /// Detach a node from its parent (or the root list)
    fn detach(&mut self, id: NodeId) {
        match self.nodes[id.0].parent.take() {
            Some(parent) => self.nodes[parent.0].children.retain(|c| *c != id),
            None => self.roots.retain(|r| *r != id),
        }
    }

    /// Add a node to the root list
    pub fn add_root(&mut self, id: NodeId) {
        self.detach(id);
        self.roots.push(id);
    }

    /// Attach a node as the last child of `parent`
    ///
    /// The node is first detached from any previous parent.
    ///
    /// # Panics
    ///
    /// This function will panic if `child` is `parent` or one of its
    /// ancestors.
    pub fn attach(&mut self, parent: NodeId, child: NodeId) {
        assert!(
            parent != child && !self.is_descendant(parent, child),
            "Attach would create a cycle"
        );
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    /// Check whether `id` is a descendant of `ancestor`
    pub fn is_descendant(&self, id: NodeId, ancestor: NodeId) -> bool {
        let mut node = self.parent(id);
        while let Some(n) = node {
            if n == ancestor {
                return true;
            }
            node = self.parent(n);
        }
        false
    }

    /// Get all descendants of a node (depth-first, pre-order)
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut stack: Vec<NodeId> =
            self.children(id).iter().rev().copied().collect();
        while let Some(n) = stack.pop() {
            found.push(n);
            stack.extend(self.children(n).iter().rev());
        }
        found
    }

    /// Clone a node with all its descendants
    ///
    /// The copy is detached; each copied node records its source.
    pub fn clone_subtree(&mut self, id: NodeId) -> NodeId {
        let src = self.node(id);
        let mut node = Node::new(src.name.clone(), src.content, src.xform);
        node.cloned_from = Some(id);
        let children = src.children.clone();
        let copy = self.push(node);
        for child in children {
            let c = self.clone_subtree(child);
            self.attach(copy, c);
        }
        copy
    }

    /// Find the first node with a name (depth-first from roots)
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.roots.iter().find_map(|root| {
            std::iter::once(*root)
                .chain(self.descendants(*root))
                .find(|n| self.node(*n).name() == Some(name))
        })
    }

    /// Get the local-to-world transform of a node
    pub fn world_affine(&self, id: NodeId) -> Affine3A {
        let mut affine = self.node(id).xform.affine();
        let mut node = self.parent(id);
        while let Some(n) = node {
            affine = self.node(n).xform.affine() * affine;
            node = self.parent(n);
        }
        affine
    }

    /// Write scene as [glTF] `.glb`
    ///
    /// [gltf]: https://en.wikipedia.org/wiki/GlTF
    pub fn write_gltf<W: Write>(&self, writer: W) -> Result<()> {
        gltf::export(writer, self)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use glam::{Quat, Vec3};

    fn cube() -> Primitive {
        Primitive {
            shape: Shape::Cuboid {
                width: 1.0,
                height: 1.0,
                depth: 1.0,
            },
            material: MaterialId::BLUE,
        }
    }

    #[test]
    fn attach_moves_node() {
        let mut scene = Scene::default();
        let a = scene.add_group("a");
        let b = scene.add_group("b");
        let m = scene.add_mesh(cube(), Transform::default());
        scene.add_root(a);
        scene.add_root(b);
        scene.attach(a, m);
        scene.attach(b, m);
        assert!(scene.children(a).is_empty());
        assert_eq!(scene.children(b), &[m]);
        assert_eq!(scene.parent(m), Some(b));
        scene.attach(a, b);
        assert_eq!(scene.roots(), &[a]);
        assert!(scene.is_descendant(m, a));
        assert_eq!(scene.descendants(a), vec![b, m]);
    }

    #[test]
    #[should_panic]
    fn attach_cycle() {
        let mut scene = Scene::default();
        let a = scene.add_group("a");
        let b = scene.add_group("b");
        scene.attach(a, b);
        scene.attach(b, a);
    }

    #[test]
    fn clone_subtree() {
        let mut scene = Scene::default();
        let a = scene.add_group("a");
        let m = scene.add_mesh(cube(), Transform::from_translation(Vec3::Y));
        scene.attach(a, m);
        let c = scene.clone_subtree(a);
        assert_eq!(scene.len(), 4);
        assert_eq!(scene.parent(c), None);
        assert_eq!(scene.node(c).cloned_from(), Some(a));
        assert_eq!(scene.node(c).name(), Some("a"));
        let cm = scene.children(c)[0];
        assert_ne!(cm, m);
        assert_eq!(scene.node(cm).cloned_from(), Some(m));
        assert_eq!(scene.node(cm).xform, scene.node(m).xform);
        assert_eq!(scene.node(cm).primitive(), Some(&cube()));
        // original untouched
        assert_eq!(scene.children(a), &[m]);
    }

    #[test]
    fn find_by_name() {
        let mut scene = Scene::default();
        let a = scene.add_group("a");
        let b = scene.add_group("b");
        scene.add_root(a);
        scene.attach(a, b);
        assert_eq!(scene.find("b"), Some(b));
        assert_eq!(scene.find("c"), None);
    }

    #[test]
    fn world_affine() {
        let mut scene = Scene::default();
        let a = scene.add_group("a");
        let b = scene.add_group("b");
        scene.attach(a, b);
        scene.node_mut(a).xform.rotation = Quat::from_rotation_y(1.0);
        scene.node_mut(a).xform.scale = Vec3::splat(2.0);
        scene.node_mut(b).xform.translation = Vec3::new(0.0, 3.0, 0.0);
        let p = scene.world_affine(b).transform_point3(Vec3::ZERO);
        assert!(p.abs_diff_eq(Vec3::new(0.0, 6.0, 0.0), 1e-6));
    }
}
