//! Pick coordination: ray queries, coincidence clustering, ordering,
//! deduplication.

use std::cmp::Ordering;

use glam::{Mat4, Vec2, Vec3};
use rustc_hash::FxHashSet;

use super::EntityResolver;
use crate::camera::Camera;
use crate::error::MalformedSceneGraph;
use crate::options::PickOptions;
use crate::raycast::{self, Intersection, Ray};
use crate::scene::{
    Entity, GridTable, LayerMask, MeshPrimitive, NodeId, NodeRole,
    Primitive, SceneGraph,
};

/// Hits closer together along the ray than this are treated as
/// visually coincident (an edge lying exactly on a face, a curve on a
/// surface) and ordered by entity priority instead of floating-point
/// distance noise. World units.
pub const CLUSTER_EPSILON: f32 = 1e-2;

/// One ordered pick result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickHit {
    /// The resolved logical entity.
    pub entity: Entity,
    /// World-space point where the ray hit its drawable.
    pub point: Vec3,
}

/// Screen-space selection rectangle in normalized device coordinates.
#[derive(Debug, Clone, Copy)]
pub struct ScreenRect {
    /// Lower-left corner.
    pub min: Vec2,
    /// Upper-right corner.
    pub max: Vec2,
}

impl ScreenRect {
    /// Build a rectangle from two drag corners in any order.
    #[must_use]
    pub fn from_corners(a: Vec2, b: Vec2) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Whether `p` lies inside the rectangle.
    #[must_use]
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
    }
}

// ---------------------------------------------------------------------------
// GeometryPicker
// ---------------------------------------------------------------------------

/// The pick coordinator: casts the current ray against a candidate
/// set of drawables and produces an ordered, deduplicated sequence of
/// logical-entity hits (point picking), or an unordered set (box
/// selection).
///
/// Queries are synchronous and complete within one call. The picker
/// holds no scene state; intersection scratch buffers are reused
/// across calls so hover-frequency queries stay allocation-light.
#[derive(Debug, Default)]
pub struct GeometryPicker {
    resolver: EntityResolver,
    options: PickOptions,
    ray: Option<Ray>,
    scratch: Vec<Intersection>,
    ranked: Vec<(Intersection, Entity)>,
    seen: FxHashSet<Entity>,
}

impl GeometryPicker {
    /// Create a picker with the default layer filter and thresholds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the active pickable-layer filter and proximity thresholds.
    /// Pure configuration; no query is performed.
    pub fn configure(&mut self, filter: LayerMask, options: PickOptions) {
        self.resolver.set_filter(filter);
        self.options = options;
    }

    /// The resolver this picker filters and resolves through.
    #[must_use]
    pub fn resolver(&self) -> &EntityResolver {
        &self.resolver
    }

    /// Derive and store the pick ray from a normalized device
    /// coordinate and the active camera. Must precede
    /// [`pick_point`](Self::pick_point).
    pub fn set_ray_from_screen_point(&mut self, ndc: Vec2, camera: &Camera) {
        let ray = camera.ray_from_ndc(ndc);
        log::trace!(
            "pick ray: origin {:?} dir {:?}",
            ray.origin,
            ray.dir
        );
        self.ray = Some(ray);
    }

    /// Cast the current ray against `candidates` and return the
    /// ordered entity hits.
    ///
    /// Outside X-ray mode only the cluster of hits coincident with the
    /// globally nearest one survives; within a cluster, entity
    /// priority decides (smaller, more specific entities win). In
    /// X-ray mode every hit survives, and X-ray-tagged drawables of
    /// equal-or-better priority outrank anything in front of them.
    ///
    /// An empty candidate set or a ray that hits nothing returns an
    /// empty sequence, not an error.
    ///
    /// # Errors
    ///
    /// [`MalformedSceneGraph`] when a hit drawable cannot be resolved;
    /// the query aborts (renderer/model consistency bug, fail loud).
    pub fn pick_point(
        &mut self,
        scene: &SceneGraph,
        candidates: &[NodeId],
        xray_mode: bool,
    ) -> Result<Vec<PickHit>, MalformedSceneGraph> {
        let Some(ray) = self.ray else {
            log::warn!("pick_point called before set_ray_from_screen_point");
            return Ok(Vec::new());
        };

        self.scratch.clear();
        for &id in candidates {
            let NodeRole::Drawable(primitive) = scene.node(id).role() else {
                continue;
            };
            if !self.resolver.is_pickable(scene, id) {
                continue;
            }
            raycast::intersect_primitive(
                &ray,
                id,
                primitive,
                &self.options,
                &mut self.scratch,
            );
        }
        let raw = self.scratch.len();
        if raw == 0 {
            return Ok(Vec::new());
        }

        self.scratch
            .sort_by(|a, b| a.distance.total_cmp(&b.distance));
        if !xray_mode {
            // keep only hits visually coincident with the nearest so
            // priority, not distance noise, decides the winner
            let nearest = self.scratch[0].distance;
            self.scratch
                .retain(|i| (i.distance - nearest).abs() < CLUSTER_EPSILON);
        }

        // resolve before ordering: aggregate hits take their priority
        // from the sub-entity, not the solid's mesh
        self.ranked.clear();
        for record in &self.scratch {
            let entity =
                self.resolver.resolve(scene, record.drawable, record.sub)?;
            self.ranked.push((*record, entity));
        }
        self.ranked.sort_by(|a, b| compare(scene, a, b));

        self.seen.clear();
        let mut hits = Vec::with_capacity(self.ranked.len());
        for (record, entity) in &self.ranked {
            if self.seen.insert(*entity) {
                hits.push(PickHit {
                    entity: *entity,
                    point: record.point,
                });
            }
        }

        log::debug!(
            "pick_point: {} raw hits, {} ranked, {} entities",
            raw,
            self.ranked.len(),
            hits.len()
        );
        Ok(hits)
    }

    /// Test `candidates` against a screen-space rectangle and return
    /// the set of entities touched (box/lasso selection).
    ///
    /// Crossing semantics: any projected vertex inside the rectangle
    /// marks its drawable hit. Aggregate meshes are tested per grid,
    /// so a box over one solid can select a subset of its faces. Order
    /// is irrelevant; only set membership matters.
    ///
    /// # Errors
    ///
    /// [`MalformedSceneGraph`] when a hit drawable cannot be resolved.
    pub fn pick_region(
        &mut self,
        scene: &SceneGraph,
        candidates: &[NodeId],
        rect: &ScreenRect,
        camera: &Camera,
    ) -> Result<FxHashSet<Entity>, MalformedSceneGraph> {
        let view_proj = camera.view_projection();
        let mut result = FxHashSet::default();

        for &id in candidates {
            let NodeRole::Drawable(primitive) = scene.node(id).role() else {
                continue;
            };
            if !self.resolver.is_pickable(scene, id) {
                continue;
            }
            match primitive {
                Primitive::Mesh(mesh) => {
                    if let Some(table) = &mesh.grids {
                        for grid in
                            grids_in_rect(&view_proj, rect, mesh, table)
                        {
                            let entity = self
                                .resolver
                                .resolve(scene, id, Some(grid))?;
                            let _ = result.insert(entity);
                        }
                    } else if any_vertex_in_rect(
                        &view_proj,
                        rect,
                        &mesh.positions,
                    ) {
                        let entity =
                            self.resolver.resolve(scene, id, None)?;
                        let _ = result.insert(entity);
                    }
                }
                Primitive::Lines(lines) => {
                    if any_vertex_in_rect(&view_proj, rect, &lines.points) {
                        let entity =
                            self.resolver.resolve(scene, id, None)?;
                        let _ = result.insert(entity);
                    }
                }
                Primitive::Points(points) => {
                    for (i, &p) in points.positions.iter().enumerate() {
                        if point_in_rect(&view_proj, rect, p) {
                            let entity = self.resolver.resolve(
                                scene,
                                id,
                                Some(i as u32),
                            )?;
                            let _ = result.insert(entity);
                        }
                    }
                }
            }
        }

        log::debug!("pick_region: {} entities", result.len());
        Ok(result)
    }
}

// ---------------------------------------------------------------------------
// Hit ordering
// ---------------------------------------------------------------------------

/// Total order over resolved hit records.
///
/// X-ray-tagged drawables of equal-or-better priority win outright
/// regardless of distance, letting users pick referenced sketch
/// geometry through occluding solids. Otherwise distance dominates
/// outside the coincidence cluster and priority decides within it.
fn compare(
    scene: &SceneGraph,
    a: &(Intersection, Entity),
    b: &(Intersection, Entity),
) -> Ordering {
    let (ra, ea) = a;
    let (rb, eb) = b;
    let pa = ea.priority();
    let pb = eb.priority();
    let a_xray =
        scene.node(ra.drawable).layers().intersects(LayerMask::XRAY);
    let b_xray =
        scene.node(rb.drawable).layers().intersects(LayerMask::XRAY);

    match (a_xray, b_xray) {
        (true, false) if pa <= pb => return Ordering::Less,
        (false, true) if pb <= pa => return Ordering::Greater,
        (true, true) if pa != pb => return pa.cmp(&pb),
        _ => {}
    }

    let delta = ra.distance - rb.distance;
    if delta.abs() >= CLUSTER_EPSILON {
        return ra.distance.total_cmp(&rb.distance);
    }
    match pa.cmp(&pb) {
        Ordering::Equal => edge_tie_break(ra, rb, ea, eb),
        ord => ord,
    }
}

/// Two edges tying on priority and distance distinguish by how close
/// each hit lies to its own centerline (thick drawn lines overlap on
/// screen). The offset is recorded only on line-primitive hits;
/// anything else keeps stable input order.
fn edge_tie_break(
    ra: &Intersection,
    rb: &Intersection,
    ea: &Entity,
    eb: &Entity,
) -> Ordering {
    if matches!(ea, Entity::Edge(_)) && matches!(eb, Entity::Edge(_)) {
        if let (Some(da), Some(db)) = (ra.offset_sq, rb.offset_sq) {
            return da.total_cmp(&db);
        }
    }
    Ordering::Equal
}

// ---------------------------------------------------------------------------
// Region helpers
// ---------------------------------------------------------------------------

fn point_in_rect(view_proj: &Mat4, rect: &ScreenRect, p: Vec3) -> bool {
    raycast::project_ndc(view_proj, p).is_some_and(|ndc| rect.contains(ndc))
}

fn any_vertex_in_rect(
    view_proj: &Mat4,
    rect: &ScreenRect,
    vertices: &[Vec3],
) -> bool {
    vertices.iter().any(|&p| point_in_rect(view_proj, rect, p))
}

/// Grids of an aggregate mesh with at least one vertex inside the
/// rectangle.
fn grids_in_rect(
    view_proj: &Mat4,
    rect: &ScreenRect,
    mesh: &MeshPrimitive,
    table: &GridTable,
) -> Vec<u32> {
    let mut grids: Vec<u32> = Vec::new();
    for (i, tri) in mesh.triangles.iter().enumerate() {
        let Some(&grid) = table.triangle_grid.get(i) else {
            continue;
        };
        if grids.contains(&grid) {
            continue;
        }
        let inside = tri.iter().any(|&v| {
            mesh.positions
                .get(v as usize)
                .is_some_and(|&p| point_in_rect(view_proj, rect, p))
        });
        if inside {
            grids.push(grid);
        }
    }
    grids
}
