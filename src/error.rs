//! Crate-level error types.

use std::fmt;

use crate::scene::NodeId;

/// A structural invariant of the scene graph was violated during
/// entity resolution.
///
/// This is always a defect in the producer of the scene graph (the
/// tessellation/rendering layer), never a user-facing condition. A
/// query that trips one of these aborts loudly; silently recovering
/// would let the UI select the wrong entity, which is worse than a
/// visible failure during development. "Nothing was hit" is an empty
/// result, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedSceneGraph {
    /// Resolution was requested for a node that is not a drawable leaf.
    NotADrawable {
        /// The offending node.
        node: NodeId,
    },
    /// A drawable's ancestor chain contains no recognized owner role
    /// within the bounded walk.
    NoRecognizedOwner {
        /// The drawable whose ancestry is broken.
        drawable: NodeId,
    },
    /// A point primitive is not parented to a control-point group.
    MissingControlPointGroup {
        /// The orphaned point drawable.
        drawable: NodeId,
    },
    /// A point-cluster hit carried no point index to resolve through.
    MissingPointIndex {
        /// The point drawable.
        drawable: NodeId,
    },
    /// An indexed control-point lookup fell outside its group.
    PointIndexOutOfRange {
        /// The control-point group.
        group: NodeId,
        /// The requested index.
        index: u32,
        /// Number of points the group actually holds.
        count: u32,
    },
    /// A solid-owned drawable carries no grid table, or the hit record
    /// carries no grid index to resolve through.
    MissingGridTable {
        /// The aggregate drawable.
        drawable: NodeId,
    },
    /// A grid index fell outside the aggregate's owner table.
    GridOutOfRange {
        /// The aggregate drawable.
        drawable: NodeId,
        /// The out-of-range grid index.
        grid: u32,
    },
    /// A grid's owner entry names a node that is not a face or edge.
    InvalidGridOwner {
        /// The aggregate drawable.
        drawable: NodeId,
        /// The node the grid table pointed at.
        owner: NodeId,
    },
}

impl fmt::Display for MalformedSceneGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotADrawable { node } => {
                write!(f, "node {node:?} is not a drawable")
            }
            Self::NoRecognizedOwner { drawable } => {
                write!(
                    f,
                    "drawable {drawable:?} has no recognized owner ancestor"
                )
            }
            Self::MissingControlPointGroup { drawable } => {
                write!(
                    f,
                    "point drawable {drawable:?} is not under a \
                     control-point group"
                )
            }
            Self::MissingPointIndex { drawable } => {
                write!(
                    f,
                    "point-cluster hit on {drawable:?} carried no point index"
                )
            }
            Self::PointIndexOutOfRange {
                group,
                index,
                count,
            } => {
                write!(
                    f,
                    "point index {index} out of range for group {group:?} \
                     of {count} points"
                )
            }
            Self::MissingGridTable { drawable } => {
                write!(
                    f,
                    "solid-owned drawable {drawable:?} has no grid table \
                     or the hit carried no grid index"
                )
            }
            Self::GridOutOfRange { drawable, grid } => {
                write!(
                    f,
                    "grid {grid} out of range for aggregate {drawable:?}"
                )
            }
            Self::InvalidGridOwner { drawable, owner } => {
                write!(
                    f,
                    "grid owner {owner:?} of aggregate {drawable:?} is not \
                     a face or edge"
                )
            }
        }
    }
}

impl std::error::Error for MalformedSceneGraph {}
