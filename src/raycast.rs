//! CPU ray/primitive intersection over tessellated geometry.
//!
//! Meshes get exact ray/triangle tests (Möller–Trumbore); polylines
//! and point clouds get tolerance-based proximity tests, since an
//! exact test against a 1px-wide drawn line would be unusably strict.
//! All tests run in world space against geometry the tessellator
//! already produced; nothing analytic happens here.

use glam::{Mat4, Vec2, Vec3};

use crate::options::PickOptions;
use crate::scene::{
    LinePrimitive, MeshPrimitive, NodeId, PointsPrimitive, Primitive,
};

// ---------------------------------------------------------------------------
// Ray & intersection record
// ---------------------------------------------------------------------------

/// World-space ray with normalized direction.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// Ray origin.
    pub origin: Vec3,
    /// Normalized ray direction.
    pub dir: Vec3,
}

/// One ray/drawable intersection.
#[derive(Debug, Clone, Copy)]
pub struct Intersection {
    /// The drawable that was hit.
    pub drawable: NodeId,
    /// World-space hit point.
    pub point: Vec3,
    /// Distance along the ray to the hit.
    pub distance: f32,
    /// Grid index within an aggregate mesh, or point index within a
    /// point cluster. `None` for single-entity drawables.
    pub sub: Option<u32>,
    /// Squared perpendicular offset of the ray from the polyline
    /// centerline. Recorded only for line primitives; consumed by the
    /// edge/edge tie-break.
    pub offset_sq: Option<f32>,
}

// ---------------------------------------------------------------------------
// Per-primitive intersection
// ---------------------------------------------------------------------------

/// Intersect `ray` with one drawable's primitive, appending any hits
/// to `out`.
pub(crate) fn intersect_primitive(
    ray: &Ray,
    drawable: NodeId,
    primitive: &Primitive,
    options: &PickOptions,
    out: &mut Vec<Intersection>,
) {
    match primitive {
        Primitive::Mesh(mesh) => intersect_mesh(ray, drawable, mesh, out),
        Primitive::Lines(lines) => {
            intersect_lines(ray, drawable, lines, options.line_threshold, out);
        }
        Primitive::Points(points) => {
            intersect_points(
                ray,
                drawable,
                points,
                options.point_threshold,
                out,
            );
        }
    }
}

/// Nearest triangle hit per grid for aggregates, or per mesh
/// otherwise.
fn intersect_mesh(
    ray: &Ray,
    drawable: NodeId,
    mesh: &MeshPrimitive,
    out: &mut Vec<Intersection>,
) {
    // (grid, distance, point); grids per mesh are few, linear scan is
    // fine
    let mut best: Vec<(u32, f32, Vec3)> = Vec::new();

    for (i, tri) in mesh.triangles.iter().enumerate() {
        // tessellator-produced arrays are trusted; skip any truncated
        // triangle
        let (Some(&a), Some(&b), Some(&c)) = (
            mesh.positions.get(tri[0] as usize),
            mesh.positions.get(tri[1] as usize),
            mesh.positions.get(tri[2] as usize),
        ) else {
            continue;
        };
        let Some(t) = ray_triangle(ray, a, b, c) else {
            continue;
        };
        let grid = match &mesh.grids {
            Some(table) => match table.triangle_grid.get(i) {
                Some(&g) => g,
                None => continue,
            },
            None => 0,
        };
        let point = ray.origin + ray.dir * t;
        match best.iter_mut().find(|(g, _, _)| *g == grid) {
            Some(slot) if t < slot.1 => {
                slot.1 = t;
                slot.2 = point;
            }
            Some(_) => {}
            None => best.push((grid, t, point)),
        }
    }

    for (grid, distance, point) in best {
        out.push(Intersection {
            drawable,
            point,
            distance,
            sub: mesh.grids.as_ref().map(|_| grid),
            offset_sq: None,
        });
    }
}

/// Nearest accepted segment approach for a polyline.
fn intersect_lines(
    ray: &Ray,
    drawable: NodeId,
    lines: &LinePrimitive,
    threshold: f32,
    out: &mut Vec<Intersection>,
) {
    let threshold_sq = threshold * threshold;
    let mut best: Option<(f32, Vec3, f32)> = None;

    for segment in lines.points.windows(2) {
        let Some((t, point, offset_sq)) =
            ray_segment(ray, segment[0], segment[1])
        else {
            continue;
        };
        if offset_sq > threshold_sq {
            continue;
        }
        if best.is_none_or(|(bt, _, _)| t < bt) {
            best = Some((t, point, offset_sq));
        }
    }

    if let Some((distance, point, offset_sq)) = best {
        out.push(Intersection {
            drawable,
            point,
            distance,
            sub: None,
            offset_sq: Some(offset_sq),
        });
    }
}

/// One indexed hit per point within the acceptance radius.
fn intersect_points(
    ray: &Ray,
    drawable: NodeId,
    points: &PointsPrimitive,
    threshold: f32,
    out: &mut Vec<Intersection>,
) {
    let threshold_sq = threshold * threshold;
    for (i, &p) in points.positions.iter().enumerate() {
        let to_point = p - ray.origin;
        let t = to_point.dot(ray.dir);
        if t <= 0.0 {
            continue;
        }
        let offset_sq = (to_point - ray.dir * t).length_squared();
        if offset_sq <= threshold_sq {
            out.push(Intersection {
                drawable,
                point: p,
                distance: t,
                sub: Some(i as u32),
                offset_sq: None,
            });
        }
    }
}

// ---------------------------------------------------------------------------
// Geometric kernels
// ---------------------------------------------------------------------------

/// Möller–Trumbore ray/triangle intersection. Returns the distance
/// along the ray, or `None` on miss (backfaces are hits).
fn ray_triangle(ray: &Ray, a: Vec3, b: Vec3, c: Vec3) -> Option<f32> {
    const EPSILON: f32 = 1e-7;

    let edge1 = b - a;
    let edge2 = c - a;
    let h = ray.dir.cross(edge2);
    let det = edge1.dot(h);
    if det.abs() < EPSILON {
        // ray parallel to triangle plane
        return None;
    }

    let inv_det = 1.0 / det;
    let s = ray.origin - a;
    let u = s.dot(h) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = ray.dir.dot(q) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = edge2.dot(q) * inv_det;
    (t > EPSILON).then_some(t)
}

/// Closest approach between a ray and a segment. Returns the distance
/// along the ray, the closest point on the segment, and the squared
/// distance between ray and segment at that approach. `None` when the
/// approach lies behind the ray origin.
fn ray_segment(ray: &Ray, a: Vec3, b: Vec3) -> Option<(f32, Vec3, f32)> {
    let seg = b - a;
    let w = a - ray.origin;

    let b_rs = ray.dir.dot(seg);
    let c_ss = seg.dot(seg);
    let d_rw = ray.dir.dot(w);
    let e_sw = seg.dot(w);

    // Unclamped closest parameter on the segment; the denominator
    // vanishes when ray and segment are parallel.
    let denom = c_ss - b_rs * b_rs;
    let s = if denom.abs() > f32::EPSILON {
        ((d_rw * b_rs - e_sw) / denom).clamp(0.0, 1.0)
    } else {
        0.0
    };

    let t = d_rw + s * b_rs;
    if t <= 0.0 {
        return None;
    }

    let seg_point = a + seg * s;
    let ray_point = ray.origin + ray.dir * t;
    Some((t, seg_point, (ray_point - seg_point).length_squared()))
}

// ---------------------------------------------------------------------------
// Screen-space projection (box selection)
// ---------------------------------------------------------------------------

/// Project a world-space point to normalized device coordinates.
/// Returns `None` for points behind the near plane.
pub(crate) fn project_ndc(view_proj: &Mat4, point: Vec3) -> Option<Vec2> {
    let clip = *view_proj * point.extend(1.0);
    if clip.w <= 0.0 {
        return None;
    }
    Some(Vec2::new(clip.x / clip.w, clip.y / clip.w))
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::{ray_segment, ray_triangle, Ray};
    use crate::options::PickOptions;
    use crate::scene::{NodeId, PointsPrimitive};

    fn down_z() -> Ray {
        Ray {
            origin: Vec3::new(0.0, 0.0, 5.0),
            dir: Vec3::NEG_Z,
        }
    }

    #[test]
    fn triangle_hit_reports_distance() {
        let ray = down_z();
        let t = ray_triangle(
            &ray,
            Vec3::new(-1.0, -1.0, 0.0),
            Vec3::new(2.0, -1.0, 0.0),
            Vec3::new(0.0, 2.0, 0.0),
        )
        .unwrap();
        assert!((t - 5.0).abs() < 1e-5);
    }

    #[test]
    fn triangle_miss_outside_bounds() {
        let ray = Ray {
            origin: Vec3::new(10.0, 10.0, 5.0),
            dir: Vec3::NEG_Z,
        };
        let t = ray_triangle(
            &ray,
            Vec3::new(-1.0, -1.0, 0.0),
            Vec3::new(2.0, -1.0, 0.0),
            Vec3::new(0.0, 2.0, 0.0),
        );
        assert!(t.is_none());
    }

    #[test]
    fn segment_approach_reports_offset() {
        let ray = down_z();
        // segment along x at z=0, passing 0.1 away from the ray in y
        let (t, point, offset_sq) = ray_segment(
            &ray,
            Vec3::new(-1.0, 0.1, 0.0),
            Vec3::new(1.0, 0.1, 0.0),
        )
        .unwrap();
        assert!((t - 5.0).abs() < 1e-4);
        assert!((point - Vec3::new(0.0, 0.1, 0.0)).length() < 1e-4);
        assert!((offset_sq - 0.01).abs() < 1e-5);
    }

    #[test]
    fn segment_behind_origin_is_rejected() {
        let ray = down_z();
        assert!(ray_segment(
            &ray,
            Vec3::new(-1.0, 0.0, 10.0),
            Vec3::new(1.0, 0.0, 10.0)
        )
        .is_none());
    }

    #[test]
    fn points_yield_one_indexed_record_each() {
        let ray = down_z();
        let points = PointsPrimitive {
            positions: vec![
                Vec3::new(0.0, 0.0, 0.0),   // on the ray
                Vec3::new(0.05, 0.0, 1.0),  // within threshold
                Vec3::new(5.0, 0.0, 0.0),   // far off
            ],
        };
        let mut out = Vec::new();
        super::intersect_points(&ray, NodeId(0), &points, 0.2, &mut out);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].sub, Some(0));
        assert_eq!(out[1].sub, Some(1));
        assert!(out.iter().all(|i| i.offset_sq.is_none()));
    }

    #[test]
    fn line_threshold_comes_from_options() {
        let ray = down_z();
        let lines = crate::scene::LinePrimitive {
            points: vec![
                Vec3::new(-1.0, 0.5, 0.0),
                Vec3::new(1.0, 0.5, 0.0),
            ],
        };
        let mut out = Vec::new();
        let tight = PickOptions {
            line_threshold: 0.1,
            ..PickOptions::default()
        };
        super::intersect_lines(
            &ray,
            NodeId(0),
            &lines,
            tight.line_threshold,
            &mut out,
        );
        assert!(out.is_empty());

        super::intersect_lines(&ray, NodeId(0), &lines, 1.0, &mut out);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].offset_sq, Some(0.25));
    }

    #[test]
    fn projection_rejects_points_behind_camera() {
        let camera = crate::camera::Camera {
            eye: Vec3::new(0.0, 0.0, 10.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect: 1.0,
            fovy: 45.0,
            znear: 0.1,
            zfar: 100.0,
        };
        let view_proj = camera.view_projection();
        let center = super::project_ndc(&view_proj, Vec3::ZERO).unwrap();
        assert!(center.length() < 1e-5);
        assert!(
            super::project_ndc(&view_proj, Vec3::new(0.0, 0.0, 20.0))
                .is_none()
        );
    }
}
