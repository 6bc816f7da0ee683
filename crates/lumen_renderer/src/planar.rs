//! Planar primitives: quads, triangles, disks and rings.
//!
//! Every shape is described by a corner `q` and two edge vectors `u` and `v`
//! spanning a plane. A hit point is expressed in the planar coordinates
//! `(alpha, beta)` with `p = q + alpha * u + beta * v`, and the shape decides
//! whether that coordinate lies inside it:
//!
//! - Quad: the ray passes on the same side of all four corner-to-corner edges.
//!   Edges are tested in ray-relative form from the stored corners, so quads
//!   sharing two corners evaluate the shared edge to exactly opposite values.
//!   A ray landing exactly on an edge belongs to the quad whose edge direction
//!   is lexicographically positive, which makes closed meshes watertight.
//! - Triangle: `alpha > 0`, `beta > 0`, `alpha + beta < 1`.
//! - Disk / ring: centered at `q + (u + v) / 2`, with radii measured in
//!   half-edge units so a radius of 1 touches the parallelogram's edges.

use std::sync::Arc;

use lumen_math::{near_zero, Aabb, Interval, Point3, Ray, Vec3};
use rand::RngCore;

use crate::{HitRecord, Hittable, HittableList, Material};

/// Rays more parallel to the plane than this are treated as misses.
const PARALLEL_EPSILON: f64 = 1e-8;

/// Interior test applied to planar coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlanarShape {
    Quad,
    Triangle,
    Disk { radius: f64 },
    Ring { outer: f64, inner: f64 },
}

impl PlanarShape {
    /// Fraction of the `u`/`v` edges the shape's footprint spans.
    fn extent(&self) -> f64 {
        match *self {
            PlanarShape::Quad | PlanarShape::Triangle => 1.0,
            PlanarShape::Disk { radius } => radius,
            PlanarShape::Ring { outer, .. } => outer,
        }
    }
}

fn centered_radius_sq(alpha: f64, beta: f64) -> f64 {
    let a = (alpha - 0.5) * 2.0;
    let b = (beta - 0.5) * 2.0;
    a * a + b * b
}

/// Signed volume spanned by the ray direction and the edge `a -> b`, both
/// taken relative to the ray origin. Swapping `a` and `b` negates the result
/// exactly.
fn edge_function(ray: &Ray, a: Point3, b: Point3) -> f64 {
    let a = a - ray.origin;
    let b = b - ray.origin;
    let d = ray.direction;
    d.x * (a.y * b.z - a.z * b.y)
        + d.y * (a.z * b.x - a.x * b.z)
        + d.z * (a.x * b.y - a.y * b.x)
}

/// Tie-break for rays exactly on an edge: the edge belongs to the quad that
/// walks it in the positive lexicographic direction.
fn owns_edge(direction: Vec3) -> bool {
    if direction.x != 0.0 {
        direction.x > 0.0
    } else if direction.y != 0.0 {
        direction.y > 0.0
    } else {
        direction.z > 0.0
    }
}

/// A flat shape lying in the plane spanned by `u` and `v` through `q`.
pub struct Planar {
    q: Point3,
    u: Vec3,
    v: Vec3,
    /// `q`, `q + u`, `q + u + v`, `q + v`
    corners: [Point3; 4],
    /// `n / (n . n)` for the unnormalized normal, used to solve for alpha and beta
    w: Vec3,
    normal: Vec3,
    d: f64,
    shape: PlanarShape,
    material: Arc<dyn Material>,
    bbox: Aabb,
}

impl Planar {
    pub fn new(
        q: Point3,
        u: Vec3,
        v: Vec3,
        shape: PlanarShape,
        material: Arc<dyn Material>,
    ) -> Self {
        Self::with_corners([q, q + u, q + u + v, q + v], u, v, shape, material)
    }

    /// Quad through four corners given in winding order.
    ///
    /// The corners are kept exactly as passed, so quads built from the same
    /// corner points share their edges bit for bit.
    pub fn quad_from_corners(corners: [Point3; 4], material: Arc<dyn Material>) -> Self {
        let [q, b, _, d] = corners;
        Self::with_corners(corners, b - q, d - q, PlanarShape::Quad, material)
    }

    fn with_corners(
        corners: [Point3; 4],
        u: Vec3,
        v: Vec3,
        shape: PlanarShape,
        material: Arc<dyn Material>,
    ) -> Self {
        let q = corners[0];
        let shape = match shape {
            PlanarShape::Disk { radius } => PlanarShape::Disk {
                radius: radius.max(0.0),
            },
            PlanarShape::Ring { outer, inner } => {
                let outer = outer.max(0.0);
                PlanarShape::Ring {
                    outer,
                    inner: inner.clamp(0.0, outer),
                }
            }
            other => other,
        };

        let n = u.cross(v);
        if near_zero(n) {
            log::warn!("Degenerate planar shape at {:?}: edges are parallel", q);
        }

        let normal = n.normalize_or_zero();
        let d = normal.dot(q);
        let w = if near_zero(n) { Vec3::ZERO } else { n / n.dot(n) };

        Self {
            q,
            u,
            v,
            corners,
            w,
            normal,
            d,
            shape,
            material,
            bbox: Self::footprint_box(q, u, v, shape.extent()),
        }
    }

    pub fn quad(q: Point3, u: Vec3, v: Vec3, material: Arc<dyn Material>) -> Self {
        Self::new(q, u, v, PlanarShape::Quad, material)
    }

    /// Triangle with vertices `q`, `q + u`, `q + v`.
    pub fn triangle(q: Point3, u: Vec3, v: Vec3, material: Arc<dyn Material>) -> Self {
        Self::new(q, u, v, PlanarShape::Triangle, material)
    }

    pub fn disk(q: Point3, u: Vec3, v: Vec3, radius: f64, material: Arc<dyn Material>) -> Self {
        Self::new(q, u, v, PlanarShape::Disk { radius }, material)
    }

    pub fn ring(
        q: Point3,
        u: Vec3,
        v: Vec3,
        outer: f64,
        inner: f64,
        material: Arc<dyn Material>,
    ) -> Self {
        Self::new(q, u, v, PlanarShape::Ring { outer, inner }, material)
    }

    pub fn shape(&self) -> PlanarShape {
        self.shape
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    /// Whether the planar coordinate, or for quads the ray itself, is inside.
    fn contains(&self, ray: &Ray, alpha: f64, beta: f64) -> bool {
        match self.shape {
            PlanarShape::Quad => self.encloses(ray),
            PlanarShape::Triangle => alpha > 0.0 && beta > 0.0 && alpha + beta < 1.0,
            PlanarShape::Disk { radius } => centered_radius_sq(alpha, beta) < radius * radius,
            PlanarShape::Ring { outer, inner } => {
                let r_sq = centered_radius_sq(alpha, beta);
                r_sq < outer * outer && r_sq > inner * inner
            }
        }
    }

    /// All nonzero edge functions agree in sign and every zero edge is owned.
    fn encloses(&self, ray: &Ray) -> bool {
        let mut side = None;

        for i in 0..4 {
            let a = self.corners[i];
            let b = self.corners[(i + 1) % 4];
            let edge = edge_function(ray, a, b);

            if edge == 0.0 {
                if !owns_edge(b - a) {
                    return false;
                }
                continue;
            }

            let positive = edge > 0.0;
            match side {
                None => side = Some(positive),
                Some(s) if s != positive => return false,
                Some(_) => {}
            }
        }

        side.is_some()
    }

    /// Box around the parallelogram scaled by `extent` about its center.
    fn footprint_box(q: Point3, u: Vec3, v: Vec3, extent: f64) -> Aabb {
        let origin = q + (0.5 - extent * 0.5) * (u + v);
        let u = extent * u;
        let v = extent * v;

        let diagonal1 = Aabb::from_points(origin, origin + u + v);
        let diagonal2 = Aabb::from_points(origin + u, origin + v);
        Aabb::surrounding(&diagonal1, &diagonal2)
    }
}

impl Hittable for Planar {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        _rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        let denom = self.normal.dot(ray.direction);

        // Parallel to the plane, or degenerate edges
        if denom.abs() < PARALLEL_EPSILON {
            return None;
        }

        let t = (self.d - self.normal.dot(ray.origin)) / denom;
        if !ray_t.contains(t) {
            return None;
        }

        let planar_hit = ray.at(t) - self.q;
        let alpha = self.w.dot(planar_hit.cross(self.v));
        let beta = self.w.dot(self.u.cross(planar_hit));

        if !self.contains(ray, alpha, beta) {
            return None;
        }

        Some(HitRecord::new(
            ray,
            t,
            self.normal,
            (alpha, beta),
            self.material.as_ref(),
        ))
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

/// Six outward-facing quads enclosing the box with opposite corners `a` and `b`.
///
/// All faces are built from the same eight corner points, so every edge of
/// the box is reported by exactly one of the two faces meeting there.
pub fn cuboid(a: Point3, b: Point3, material: Arc<dyn Material>) -> HittableList {
    let mut sides = HittableList::new();

    let (x0, y0, z0) = a.min(b).into();
    let (x1, y1, z1) = a.max(b).into();
    let p = Vec3::new;

    let faces = [
        [p(x0, y0, z1), p(x1, y0, z1), p(x1, y1, z1), p(x0, y1, z1)], // front
        [p(x1, y0, z1), p(x1, y0, z0), p(x1, y1, z0), p(x1, y1, z1)], // right
        [p(x1, y0, z0), p(x0, y0, z0), p(x0, y1, z0), p(x1, y1, z0)], // back
        [p(x0, y0, z0), p(x0, y0, z1), p(x0, y1, z1), p(x0, y1, z0)], // left
        [p(x0, y1, z1), p(x1, y1, z1), p(x1, y1, z0), p(x0, y1, z0)], // top
        [p(x0, y0, z0), p(x1, y0, z0), p(x1, y0, z1), p(x0, y0, z1)], // bottom
    ];

    for corners in faces {
        sides.add(Arc::new(Planar::quad_from_corners(corners, material.clone())));
    }

    sides
}
