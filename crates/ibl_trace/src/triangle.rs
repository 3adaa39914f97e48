//! Triangle occluder.
//!
//! Uses the Möller-Trumbore algorithm for ray-triangle intersection.

use crate::hittable::{convex_coverage, HitRecord, Hittable};
use crate::{Beam, BeamVisibility};
use ibl_math::{Aabb, Interval, Ray, Vec3};

/// A triangle primitive.
pub struct Triangle {
    v0: Vec3,
    v1: Vec3,
    v2: Vec3,
    /// Pre-computed face normal (unit length)
    normal: Vec3,
    bbox: Aabb,
}

impl Triangle {
    /// Create a new triangle from three vertices.
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3) -> Self {
        let normal = (v1 - v0).cross(v2 - v0).normalize_or_zero();

        // from_points pads thin dimensions, so axis-aligned triangles keep a
        // non-degenerate box
        let min = v0.min(v1).min(v2);
        let max = v0.max(v1).max(v2);
        let bbox = Aabb::from_points(min, max);

        Self {
            v0,
            v1,
            v2,
            normal,
            bbox,
        }
    }

    /// Two triangles covering the parallelogram `corner`, `corner + u`,
    /// `corner + u + v`, `corner + v`.
    pub fn quad(corner: Vec3, u: Vec3, v: Vec3) -> [Triangle; 2] {
        [
            Triangle::new(corner, corner + u, corner + u + v),
            Triangle::new(corner, corner + u + v, corner + v),
        ]
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }
}

impl Hittable for Triangle {
    /// Möller-Trumbore ray-triangle intersection algorithm.
    fn hit(&self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord) -> bool {
        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;

        let h = ray.direction().cross(edge2);
        let a = edge1.dot(h);

        // Ray is parallel to triangle
        if a.abs() < 1e-8 {
            return false;
        }

        let f = 1.0 / a;
        let s = ray.origin() - self.v0;
        let u = f * s.dot(h);
        if !(0.0..=1.0).contains(&u) {
            return false;
        }

        let q = s.cross(edge1);
        let v = f * ray.direction().dot(q);
        if v < 0.0 || u + v > 1.0 {
            return false;
        }

        let t = f * edge2.dot(q);
        if !ray_t.contains(t) {
            return false;
        }

        rec.t = t;
        rec.p = ray.at(t);
        rec.set_face_normal(ray, self.normal);

        true
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    fn beam_coverage(&self, beam: &Beam) -> BeamVisibility {
        if beam.excludes_polygon(&[self.v0, self.v1, self.v2], self.normal) {
            return BeamVisibility::FullyVisible;
        }
        convex_coverage(self, beam)
    }
}
