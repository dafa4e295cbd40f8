//! Drawable-to-entity resolution and pickability filtering.

use crate::error::MalformedSceneGraph;
use crate::scene::{
    Entity, GroupKind, LayerMask, MeshPrimitive, NodeId, NodeRole, OwnerKind,
    Primitive, SceneGraph,
};

/// Maps raw drawable primitives to the logical entities they
/// tessellate, and answers eligibility queries.
///
/// Resolution is a stateless transform over the ambient scene graph:
/// it walks parent links a bounded, known number of steps (one to
/// three, depending on entity kind) and terminates by role lookup. A
/// drawable with no recognized owner within that walk is a
/// tessellation-layer bug and resolves to [`MalformedSceneGraph`] —
/// loud failure, never silent recovery.
#[derive(Debug, Clone)]
pub struct EntityResolver {
    filter: LayerMask,
}

impl Default for EntityResolver {
    fn default() -> Self {
        Self::new(LayerMask::ALL)
    }
}

impl EntityResolver {
    /// Create a resolver with the given pickable-layer filter.
    #[must_use]
    pub fn new(filter: LayerMask) -> Self {
        Self { filter }
    }

    /// Replace the active pickable-layer filter.
    pub fn set_filter(&mut self, filter: LayerMask) {
        self.filter = filter;
    }

    /// The active pickable-layer filter.
    #[must_use]
    pub fn filter(&self) -> LayerMask {
        self.filter
    }

    /// Whether `drawable` is currently eligible for picking: its layer
    /// tags intersect the active filter and every node from the
    /// drawable up to the root is visible. Pure predicate; no side
    /// effects.
    #[must_use]
    pub fn is_pickable(&self, scene: &SceneGraph, drawable: NodeId) -> bool {
        scene.node(drawable).layers().intersects(self.filter)
            && scene.chain_visible(drawable)
    }

    /// Resolve a drawable (plus, for point clusters and aggregate
    /// meshes, the hit's sub-index) to exactly one logical entity.
    ///
    /// # Errors
    ///
    /// [`MalformedSceneGraph`] when the drawable's ancestry matches no
    /// recognized shape, or an indexed lookup is out of range.
    pub fn resolve(
        &self,
        scene: &SceneGraph,
        drawable: NodeId,
        sub: Option<u32>,
    ) -> Result<Entity, MalformedSceneGraph> {
        let node = scene.node(drawable);
        let NodeRole::Drawable(primitive) = node.role() else {
            return Err(MalformedSceneGraph::NotADrawable { node: drawable });
        };

        match primitive {
            Primitive::Points(_) => {
                Self::resolve_control_point(scene, drawable, sub)
            }
            Primitive::Mesh(mesh) => {
                Self::resolve_owned(scene, drawable, Some(mesh), sub)
            }
            Primitive::Lines(_) => {
                Self::resolve_owned(scene, drawable, None, sub)
            }
        }
    }

    /// Point primitives resolve to the indexed control point of their
    /// parent group (indexed lookup, not iteration order).
    fn resolve_control_point(
        scene: &SceneGraph,
        drawable: NodeId,
        sub: Option<u32>,
    ) -> Result<Entity, MalformedSceneGraph> {
        let group = scene
            .parent(drawable)
            .ok_or(MalformedSceneGraph::MissingControlPointGroup {
                drawable,
            })?;
        let count = match scene.node(group).role() {
            NodeRole::Group(GroupKind::ControlPoints { count }) => *count,
            _ => {
                return Err(MalformedSceneGraph::MissingControlPointGroup {
                    drawable,
                })
            }
        };
        let index = sub
            .ok_or(MalformedSceneGraph::MissingPointIndex { drawable })?;
        if index >= count {
            return Err(MalformedSceneGraph::PointIndexOutOfRange {
                group,
                index,
                count,
            });
        }
        Ok(Entity::ControlPoint { group, index })
    }

    /// Mesh and line primitives resolve through their immediate owning
    /// ancestor.
    fn resolve_owned(
        scene: &SceneGraph,
        drawable: NodeId,
        mesh: Option<&MeshPrimitive>,
        sub: Option<u32>,
    ) -> Result<Entity, MalformedSceneGraph> {
        let parent = scene
            .parent(drawable)
            .ok_or(MalformedSceneGraph::NoRecognizedOwner { drawable })?;

        match scene.node(parent).role() {
            NodeRole::Owner(OwnerKind::Face) => Ok(Entity::Face(parent)),
            NodeRole::Owner(OwnerKind::Edge) => Ok(Entity::Edge(parent)),
            NodeRole::Owner(OwnerKind::Region) => Ok(Entity::Region(parent)),
            NodeRole::Owner(OwnerKind::Solid) => {
                Self::resolve_grid(scene, drawable, mesh, sub)
            }
            NodeRole::Group(GroupKind::CurveSegments) => {
                // curves draw as several segment primitives; the
                // logical curve is the segment group's grandparent
                let curve = scene
                    .parent(parent)
                    .and_then(|n| scene.parent(n))
                    .ok_or(MalformedSceneGraph::NoRecognizedOwner {
                        drawable,
                    })?;
                if matches!(
                    scene.node(curve).role(),
                    NodeRole::Owner(OwnerKind::Curve)
                ) {
                    Ok(Entity::Curve(curve))
                } else {
                    Err(MalformedSceneGraph::NoRecognizedOwner { drawable })
                }
            }
            _ => Err(MalformedSceneGraph::NoRecognizedOwner { drawable }),
        }
    }

    /// A solid-owned drawable is an aggregate: the hit's grid index
    /// names the topology item within it.
    fn resolve_grid(
        scene: &SceneGraph,
        drawable: NodeId,
        mesh: Option<&MeshPrimitive>,
        sub: Option<u32>,
    ) -> Result<Entity, MalformedSceneGraph> {
        let table = mesh
            .and_then(|m| m.grids.as_ref())
            .ok_or(MalformedSceneGraph::MissingGridTable { drawable })?;
        let grid =
            sub.ok_or(MalformedSceneGraph::MissingGridTable { drawable })?;
        let owner = table
            .owners
            .get(grid as usize)
            .copied()
            .ok_or(MalformedSceneGraph::GridOutOfRange { drawable, grid })?;

        match scene.node(owner).role() {
            NodeRole::Owner(OwnerKind::Face) => Ok(Entity::Face(owner)),
            NodeRole::Owner(OwnerKind::Edge) => Ok(Entity::Edge(owner)),
            _ => Err(MalformedSceneGraph::InvalidGridOwner {
                drawable,
                owner,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::EntityResolver;
    use crate::error::MalformedSceneGraph;
    use crate::scene::{
        Entity, GridTable, GroupKind, LayerMask, LinePrimitive,
        MeshPrimitive, OwnerKind, PointsPrimitive, Primitive, SceneGraph,
    };

    fn quad() -> MeshPrimitive {
        MeshPrimitive {
            positions: vec![
                Vec3::new(-1.0, -1.0, 0.0),
                Vec3::new(1.0, -1.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
                Vec3::new(-1.0, 1.0, 0.0),
            ],
            triangles: vec![[0, 1, 2], [0, 2, 3]],
            grids: None,
        }
    }

    #[test]
    fn face_mesh_resolves_to_its_owner() {
        let mut scene = SceneGraph::new();
        let solid = scene.add_owner(None, OwnerKind::Solid);
        let face = scene.add_owner(Some(solid), OwnerKind::Face);
        let drawable = scene.add_drawable(
            face,
            LayerMask::SOLID,
            Primitive::Mesh(quad()),
        );

        let resolver = EntityResolver::default();
        assert_eq!(
            resolver.resolve(&scene, drawable, None),
            Ok(Entity::Face(face))
        );
    }

    #[test]
    fn curve_segments_resolve_to_one_curve() {
        let mut scene = SceneGraph::new();
        let curve = scene.add_owner(None, OwnerKind::Curve);
        let lod = scene.add_group(Some(curve), GroupKind::Plain);
        let segments = scene.add_group(Some(lod), GroupKind::CurveSegments);
        let seg_a = scene.add_drawable(
            segments,
            LayerMask::CURVE,
            Primitive::Lines(LinePrimitive {
                points: vec![Vec3::ZERO, Vec3::X],
            }),
        );
        let seg_b = scene.add_drawable(
            segments,
            LayerMask::CURVE,
            Primitive::Lines(LinePrimitive {
                points: vec![Vec3::X, Vec3::new(2.0, 0.0, 0.0)],
            }),
        );

        let resolver = EntityResolver::default();
        assert_eq!(
            resolver.resolve(&scene, seg_a, None),
            Ok(Entity::Curve(curve))
        );
        assert_eq!(
            resolver.resolve(&scene, seg_b, None),
            Ok(Entity::Curve(curve))
        );
    }

    #[test]
    fn control_point_lookup_is_indexed() {
        let mut scene = SceneGraph::new();
        let group = scene
            .add_group(None, GroupKind::ControlPoints { count: 5 });
        let cloud = scene.add_drawable(
            group,
            LayerMask::CONTROL_POINT,
            Primitive::Points(PointsPrimitive {
                positions: vec![Vec3::ZERO; 5],
            }),
        );

        let resolver = EntityResolver::default();
        assert_eq!(
            resolver.resolve(&scene, cloud, Some(3)),
            Ok(Entity::ControlPoint { group, index: 3 })
        );
        assert_eq!(
            resolver.resolve(&scene, cloud, Some(7)),
            Err(MalformedSceneGraph::PointIndexOutOfRange {
                group,
                index: 7,
                count: 5
            })
        );
    }

    #[test]
    fn aggregate_grid_resolves_through_table() {
        let mut scene = SceneGraph::new();
        let solid = scene.add_owner(None, OwnerKind::Solid);
        let face_a = scene.add_owner(Some(solid), OwnerKind::Face);
        let edge = scene.add_owner(Some(solid), OwnerKind::Edge);
        let mut mesh = quad();
        mesh.grids = Some(GridTable {
            triangle_grid: vec![0, 1],
            owners: vec![face_a, edge],
        });
        let aggregate = scene.add_drawable(
            solid,
            LayerMask::SOLID,
            Primitive::Mesh(mesh),
        );

        let resolver = EntityResolver::default();
        assert_eq!(
            resolver.resolve(&scene, aggregate, Some(0)),
            Ok(Entity::Face(face_a))
        );
        assert_eq!(
            resolver.resolve(&scene, aggregate, Some(1)),
            Ok(Entity::Edge(edge))
        );
        assert_eq!(
            resolver.resolve(&scene, aggregate, Some(2)),
            Err(MalformedSceneGraph::GridOutOfRange {
                drawable: aggregate,
                grid: 2
            })
        );
    }

    #[test]
    fn solid_owned_mesh_without_grids_is_malformed() {
        let mut scene = SceneGraph::new();
        let solid = scene.add_owner(None, OwnerKind::Solid);
        let aggregate = scene.add_drawable(
            solid,
            LayerMask::SOLID,
            Primitive::Mesh(quad()),
        );

        let resolver = EntityResolver::default();
        assert_eq!(
            resolver.resolve(&scene, aggregate, Some(0)),
            Err(MalformedSceneGraph::MissingGridTable {
                drawable: aggregate
            })
        );
    }

    #[test]
    fn unrecognized_ancestry_fails_loud() {
        let mut scene = SceneGraph::new();
        let group = scene.add_group(None, GroupKind::Plain);
        let orphan = scene.add_drawable(
            group,
            LayerMask::CURVE,
            Primitive::Lines(LinePrimitive {
                points: vec![Vec3::ZERO, Vec3::X],
            }),
        );

        let resolver = EntityResolver::default();
        assert_eq!(
            resolver.resolve(&scene, orphan, None),
            Err(MalformedSceneGraph::NoRecognizedOwner { drawable: orphan })
        );
    }

    #[test]
    fn resolution_of_a_non_drawable_is_malformed() {
        let mut scene = SceneGraph::new();
        let face = scene.add_owner(None, OwnerKind::Face);
        let resolver = EntityResolver::default();
        assert_eq!(
            resolver.resolve(&scene, face, None),
            Err(MalformedSceneGraph::NotADrawable { node: face })
        );
    }

    #[test]
    fn layer_filter_and_visibility_gate_pickability() {
        let mut scene = SceneGraph::new();
        let curve = scene.add_owner(None, OwnerKind::Curve);
        let lod = scene.add_group(Some(curve), GroupKind::Plain);
        let segments = scene.add_group(Some(lod), GroupKind::CurveSegments);
        let drawable = scene.add_drawable(
            segments,
            LayerMask::CURVE,
            Primitive::Lines(LinePrimitive {
                points: vec![Vec3::ZERO, Vec3::X],
            }),
        );

        let mut resolver = EntityResolver::default();
        assert!(resolver.is_pickable(&scene, drawable));

        resolver.set_filter(LayerMask::SOLID | LayerMask::REGION);
        assert!(!resolver.is_pickable(&scene, drawable));

        resolver.set_filter(LayerMask::ALL);
        scene.set_visible(curve, false);
        assert!(!resolver.is_pickable(&scene, drawable));
    }

    #[test]
    fn resolver_never_mutates_the_scene() {
        let mut scene = SceneGraph::new();
        let face = scene.add_owner(None, OwnerKind::Face);
        let drawable = scene.add_drawable(
            face,
            LayerMask::SOLID,
            Primitive::Mesh(quad()),
        );
        let before = scene.len();

        let resolver = EntityResolver::default();
        let _ = resolver.resolve(&scene, drawable, None);
        let _ = resolver.is_pickable(&scene, drawable);
        assert_eq!(scene.len(), before);
    }
}
