use glam::Vec3;

// ---------------------------------------------------------------------------
// NodeId
// ---------------------------------------------------------------------------

/// Stable index of a node within a [`SceneGraph`](super::SceneGraph)
/// arena.
///
/// Ids are only handed out by the owning graph, so an id is always in
/// bounds for the graph that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Position of this node in the arena's backing storage.
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

// ---------------------------------------------------------------------------
// LayerMask
// ---------------------------------------------------------------------------

/// Bit-flag layer tags attached to drawables and to the resolver's
/// active filter.
///
/// A drawable is eligible for picking iff its mask intersects the
/// active filter and every ancestor up to the root is visible. The
/// [`XRAY`](Self::XRAY) tag additionally marks a drawable as
/// inspectable through occluding geometry during hit ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LayerMask(u32);

impl LayerMask {
    /// No layers; never matches a filter.
    pub const NONE: Self = Self(0);
    /// Solid topology (faces and edges of solids).
    pub const SOLID: Self = Self(1);
    /// Free-standing curves.
    pub const CURVE: Self = Self(1 << 1);
    /// Planar trimmed regions.
    pub const REGION: Self = Self(1 << 2);
    /// Curve control points.
    pub const CONTROL_POINT: Self = Self(1 << 3);
    /// Selectable through occluding geometry.
    pub const XRAY: Self = Self(1 << 4);
    /// Every layer.
    pub const ALL: Self = Self(0x1F);

    /// Whether any bit is shared with `other`.
    #[must_use]
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// Whether every bit of `other` is set in `self`.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Mask with the bits of both operands.
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

impl std::ops::BitOr for LayerMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

// ---------------------------------------------------------------------------
// Node roles
// ---------------------------------------------------------------------------

/// What a node *is* in the ownership hierarchy.
///
/// The entity resolver terminates its bounded parent walk by looking at
/// role tags rather than downcasting, so every node declares its role
/// explicitly.
#[derive(Debug, Clone)]
pub enum NodeRole {
    /// Interior node grouping children without owning an entity.
    Group(GroupKind),
    /// Node owning a logical entity (or, for solids, an aggregate of
    /// topology items).
    Owner(OwnerKind),
    /// Leaf node holding tessellated geometry.
    Drawable(Primitive),
}

/// Flavors of grouping node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKind {
    /// Plain structural grouping (detail levels, style variants).
    Plain,
    /// Groups the segment primitives that together draw one curve.
    CurveSegments,
    /// Groups a point cluster; its points resolve by index.
    ControlPoints {
        /// Number of control points in the group.
        count: u32,
    },
}

/// Entity kinds a node can own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnerKind {
    /// A solid body. Not itself selectable: drawables owned directly
    /// by a solid are aggregates resolving to faces/edges via their
    /// grid table.
    Solid,
    /// A bounded face of a solid.
    Face,
    /// A boundary edge of a solid.
    Edge,
    /// A planar trimmed region.
    Region,
    /// A free-standing curve.
    Curve,
}

// ---------------------------------------------------------------------------
// Drawable primitives
// ---------------------------------------------------------------------------

/// Tessellated geometry carried by a drawable leaf.
#[derive(Debug, Clone)]
pub enum Primitive {
    /// Indexed triangle soup.
    Mesh(MeshPrimitive),
    /// Polyline vertex strip, drawn as connected segments.
    Lines(LinePrimitive),
    /// Point cluster (control points).
    Points(PointsPrimitive),
}

/// Indexed triangle mesh, optionally partitioned into grids.
#[derive(Debug, Clone)]
pub struct MeshPrimitive {
    /// Vertex positions in world space.
    pub positions: Vec<Vec3>,
    /// Triangles as index triples into `positions`.
    pub triangles: Vec<[u32; 3]>,
    /// Present when this mesh aggregates many topology items of one
    /// solid; absent for a mesh owned by a single face/edge/region.
    pub grids: Option<GridTable>,
}

/// Maps the triangles of an aggregate mesh back to the topology nodes
/// they tessellate.
#[derive(Debug, Clone)]
pub struct GridTable {
    /// Grid index of each triangle, parallel to the mesh's `triangles`.
    pub triangle_grid: Vec<u32>,
    /// Owning topology node (a face or edge owner) of each grid.
    pub owners: Vec<NodeId>,
}

/// Polyline drawn as a strip of connected segments.
#[derive(Debug, Clone)]
pub struct LinePrimitive {
    /// Polyline vertices in world space; each consecutive pair is one
    /// segment.
    pub points: Vec<Vec3>,
}

/// Point-sprite cluster.
#[derive(Debug, Clone)]
pub struct PointsPrimitive {
    /// Point positions in world space; slot `i` is point index `i`.
    pub positions: Vec<Vec3>,
}

// ---------------------------------------------------------------------------
// Node
// ---------------------------------------------------------------------------

/// One node of the scene-graph arena: parent link, visibility, layer
/// tags, and role.
#[derive(Debug, Clone)]
pub struct Node {
    pub(super) parent: Option<NodeId>,
    pub(super) visible: bool,
    pub(super) layers: LayerMask,
    pub(super) role: NodeRole,
}

impl Node {
    /// Parent node, if any.
    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Whether this node itself is visible (ancestors not considered).
    #[must_use]
    pub fn visible(&self) -> bool {
        self.visible
    }

    /// Layer tags of this node.
    #[must_use]
    pub fn layers(&self) -> LayerMask {
        self.layers
    }

    /// Role of this node in the ownership hierarchy.
    #[must_use]
    pub fn role(&self) -> &NodeRole {
        &self.role
    }
}
