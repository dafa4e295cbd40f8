use super::NodeId;

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A domain-meaningful CAD object resolved from a drawable primitive.
///
/// Identity is the owning scene-graph node (plus the index, for
/// control points), so the variant is cheap to copy and hashes into
/// downstream selection sets directly. One entity is typically drawn
/// by several primitives — all of them resolve back to the same
/// `Entity` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entity {
    /// A curve control point: its group node plus index within the
    /// group.
    ControlPoint {
        /// The control-point group node.
        group: NodeId,
        /// Index of the point within the group.
        index: u32,
    },
    /// A free-standing curve (drawn as one or more segment
    /// primitives).
    Curve(NodeId),
    /// A boundary edge of a solid.
    Edge(NodeId),
    /// A planar trimmed region.
    Region(NodeId),
    /// A bounded face of a solid.
    Face(NodeId),
}

impl Entity {
    /// The kind tag of this entity.
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        match self {
            Self::ControlPoint { .. } => EntityKind::ControlPoint,
            Self::Curve(_) => EntityKind::Curve,
            Self::Edge(_) => EntityKind::Edge,
            Self::Region(_) => EntityKind::Region,
            Self::Face(_) => EntityKind::Face,
        }
    }

    /// Tie-break priority of this entity; lower sorts first.
    #[must_use]
    pub const fn priority(&self) -> u8 {
        self.kind().priority()
    }
}

// ---------------------------------------------------------------------------
// EntityKind
// ---------------------------------------------------------------------------

/// Kind tag over the closed set of logical entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum EntityKind {
    /// Curve control point.
    ControlPoint = 0,
    /// Free-standing curve.
    Curve = 1,
    /// Solid boundary edge.
    Edge = 2,
    /// Planar trimmed region.
    Region = 3,
    /// Solid face.
    Face = 4,
}

/// Tie-break priorities indexed by kind tag. Smaller, more specific
/// entities outrank larger ones when hits are otherwise coincident.
const PRIORITY: [u8; 5] = [0, 1, 2, 3, 4];

impl EntityKind {
    /// Tie-break priority; lower sorts first within a distance
    /// cluster. Never used as a depth substitute.
    #[must_use]
    pub const fn priority(self) -> u8 {
        PRIORITY[self as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::{Entity, EntityKind, NodeId};

    #[test]
    fn priority_orders_specific_before_general() {
        assert!(
            EntityKind::ControlPoint.priority() < EntityKind::Curve.priority()
        );
        assert!(EntityKind::Curve.priority() < EntityKind::Edge.priority());
        assert!(EntityKind::Edge.priority() < EntityKind::Region.priority());
        assert!(EntityKind::Region.priority() < EntityKind::Face.priority());
    }

    #[test]
    fn entity_kind_matches_variant() {
        let node = NodeId(7);
        assert_eq!(Entity::Face(node).kind(), EntityKind::Face);
        assert_eq!(
            Entity::ControlPoint {
                group: node,
                index: 2
            }
            .kind(),
            EntityKind::ControlPoint
        );
    }

    #[test]
    fn control_points_with_distinct_indices_are_distinct() {
        let group = NodeId(3);
        let a = Entity::ControlPoint { group, index: 0 };
        let b = Entity::ControlPoint { group, index: 1 };
        assert_ne!(a, b);
        assert_eq!(a, Entity::ControlPoint { group, index: 0 });
    }
}
