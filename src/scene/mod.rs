//! Arena scene graph: flat node storage, explicit roles, layer tags.
//!
//! The surrounding editor populates this graph when it tessellates
//! model geometry; the picking core only reads it during a query.
//! Nodes live in a flat `Vec` and reference each other by stable
//! [`NodeId`] indices, so the resolver's parent walk terminates by
//! role lookup instead of speculative downcasting.

mod entity;
mod node;

pub use entity::{Entity, EntityKind};
pub use node::{
    GridTable, GroupKind, LayerMask, LinePrimitive, MeshPrimitive, Node,
    NodeId, NodeRole, OwnerKind, PointsPrimitive, Primitive,
};

// ---------------------------------------------------------------------------
// SceneGraph
// ---------------------------------------------------------------------------

/// The drawable ownership hierarchy, stored as an arena.
#[derive(Debug, Default)]
pub struct SceneGraph {
    nodes: Vec<Node>,
}

impl SceneGraph {
    /// Create an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    fn push(&mut self, parent: Option<NodeId>, layers: LayerMask, role: NodeRole) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            parent,
            visible: true,
            layers,
            role,
        });
        id
    }

    /// Add a grouping node. Groups carry no layer tags of their own;
    /// eligibility is decided at the drawable.
    pub fn add_group(&mut self, parent: Option<NodeId>, kind: GroupKind) -> NodeId {
        self.push(parent, LayerMask::NONE, NodeRole::Group(kind))
    }

    /// Add an entity-owner node.
    pub fn add_owner(&mut self, parent: Option<NodeId>, kind: OwnerKind) -> NodeId {
        self.push(parent, LayerMask::NONE, NodeRole::Owner(kind))
    }

    /// Add a drawable leaf under `parent` carrying `layers` tags.
    pub fn add_drawable(
        &mut self,
        parent: NodeId,
        layers: LayerMask,
        primitive: Primitive,
    ) -> NodeId {
        self.push(Some(parent), layers, NodeRole::Drawable(primitive))
    }

    /// Borrow a node.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// Parent of a node, if any.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].parent
    }

    /// Show or hide a node. Hiding a node hides its whole subtree for
    /// picking purposes.
    pub fn set_visible(&mut self, id: NodeId, visible: bool) {
        self.nodes[id.index()].visible = visible;
    }

    /// Whether `id` and every ancestor up to the root are visible.
    #[must_use]
    pub fn chain_visible(&self, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = &self.nodes[node_id.index()];
            if !node.visible {
                return false;
            }
            current = node.parent;
        }
        true
    }

    /// Number of nodes in the graph.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph holds no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
