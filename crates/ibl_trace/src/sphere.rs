//! Sphere occluder.

use crate::hittable::{convex_coverage, HitRecord, Hittable};
use crate::{Beam, BeamVisibility};
use ibl_math::{Aabb, Interval, Ray, Vec3};

/// A sphere primitive.
pub struct Sphere {
    center: Vec3,
    radius: f32,
    bbox: Aabb,
}

impl Sphere {
    /// Create a new sphere. Negative radii are clamped to zero.
    pub fn new(center: Vec3, radius: f32) -> Self {
        let radius = radius.max(0.0);
        let rvec = Vec3::splat(radius);
        let bbox = Aabb::from_points(center - rvec, center + rvec);

        Self {
            center,
            radius,
            bbox,
        }
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Returns true if `p` is strictly inside the sphere.
    pub fn contains(&self, p: Vec3) -> bool {
        (p - self.center).length_squared() < self.radius * self.radius
    }
}

impl Hittable for Sphere {
    fn hit(&self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord) -> bool {
        let oc = self.center - ray.origin();
        let a = ray.direction().length_squared();
        let h = ray.direction().dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return false;
        }

        let sqrtd = discriminant.sqrt();

        // Find the nearest root in the acceptable range
        let mut root = (h - sqrtd) / a;
        if !ray_t.surrounds(root) {
            root = (h + sqrtd) / a;
            if !ray_t.surrounds(root) {
                return false;
            }
        }

        rec.t = root;
        rec.p = ray.at(rec.t);
        let outward_normal = (rec.p - self.center) / self.radius;
        rec.set_face_normal(ray, outward_normal);

        true
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    fn beam_coverage(&self, beam: &Beam) -> BeamVisibility {
        // Seen from inside, every direction hits the shell.
        if self.contains(beam.origin()) {
            return BeamVisibility::FullyOccluded;
        }
        if beam.excludes_sphere(self.center, self.radius) {
            return BeamVisibility::FullyVisible;
        }
        convex_coverage(self, beam)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn beam_towards(dir: Vec3, spread: f32) -> Beam {
        let basis = ibl_math::OrthoBasis::from_normal(dir.normalize());
        let corner = |a: f32, b: f32| basis.to_world(Vec3::new(a * spread, b * spread, 1.0));
        Beam::new(
            Vec3::ZERO,
            [
                corner(-1.0, -1.0),
                corner(1.0, -1.0),
                corner(-1.0, 1.0),
                corner(1.0, 1.0),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_sphere_hit() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5);
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let mut rec = HitRecord::default();

        assert!(sphere.hit(&ray, Interval::forward(0.001), &mut rec));
        assert!((rec.t - 0.5).abs() < 0.001);
        assert!(rec.front_face);
    }

    #[test]
    fn test_sphere_miss() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5);
        let ray = Ray::new(Vec3::ZERO, Vec3::Y);
        let mut rec = HitRecord::default();

        assert!(!sphere.hit(&ray, Interval::forward(0.001), &mut rec));
    }

    #[test]
    fn test_hit_from_inside() {
        let sphere = Sphere::new(Vec3::ZERO, 10.0);
        let ray = Ray::new(Vec3::new(0.0, 0.01, 0.0), Vec3::X);
        let mut rec = HitRecord::default();

        assert!(sphere.hit(&ray, Interval::forward(0.001), &mut rec));
        assert!(!rec.front_face);
    }

    #[test]
    fn test_beam_coverage() {
        let sphere = Sphere::new(Vec3::new(0.0, 10.0, 0.0), 2.0);

        let narrow = beam_towards(Vec3::Y, 0.05);
        assert_eq!(sphere.beam_coverage(&narrow), BeamVisibility::FullyOccluded);

        let wide = beam_towards(Vec3::Y, 1.0);
        assert_eq!(sphere.beam_coverage(&wide), BeamVisibility::PartiallyVisible);

        let away = beam_towards(-Vec3::Y, 0.05);
        assert_eq!(sphere.beam_coverage(&away), BeamVisibility::FullyVisible);
    }

    #[test]
    fn test_beam_inside_bounding_box_but_clear_of_sphere() {
        let sphere = Sphere::new(Vec3::new(0.0, 10.0, 0.0), 2.0);
        // Aimed at the bounding box corner region, outside the ball
        let beam = beam_towards(Vec3::new(1.9, 10.0, 1.9), 0.01);

        assert!(beam.intersects_aabb(&sphere.bounding_box()));
        assert_eq!(sphere.beam_coverage(&beam), BeamVisibility::FullyVisible);
    }

    #[test]
    fn test_enclosing_sphere_blocks_everything() {
        let shell = Sphere::new(Vec3::ZERO, 100.0);

        for dir in [Vec3::Y, -Vec3::Y, Vec3::X, Vec3::new(1.0, 1.0, 1.0)] {
            assert_eq!(shell.beam_coverage(&beam_towards(dir, 0.3)), BeamVisibility::FullyOccluded);
        }
    }
}
