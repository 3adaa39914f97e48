//! Hittable trait and HitRecord for ray-object intersection.

use crate::{Beam, BeamVisibility, SHADOW_EPSILON};
use ibl_math::{Aabb, Interval, Ray, Vec3};

/// Record of a ray-object intersection.
#[derive(Debug, Clone, Copy, Default)]
pub struct HitRecord {
    /// Point of intersection
    pub p: Vec3,
    /// Surface normal at intersection (always points against ray)
    pub normal: Vec3,
    /// Parameter t where the intersection occurs
    pub t: f32,
    /// Whether the ray hit the front face (outside) of the surface
    pub front_face: bool,
}

impl HitRecord {
    /// Set the face normal based on ray direction and outward normal.
    pub fn set_face_normal(&mut self, ray: &Ray, outward_normal: Vec3) {
        self.front_face = ray.direction().dot(outward_normal) < 0.0;
        self.normal = if self.front_face {
            outward_normal
        } else {
            -outward_normal
        };
    }
}

/// Trait for objects that can be hit by rays.
pub trait Hittable: Send + Sync {
    /// Test if a ray hits this object within the given interval.
    ///
    /// Returns true if hit, and fills in the hit record.
    fn hit(&self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord) -> bool;

    /// Get the axis-aligned bounding box of this object.
    fn bounding_box(&self) -> Aabb;

    /// Conservative beam classification against this object alone.
    ///
    /// The default only knows the bounding box: a beam that misses the box
    /// is clear, anything else is partial.
    fn beam_coverage(&self, beam: &Beam) -> BeamVisibility {
        if beam.intersects_aabb(&self.bounding_box()) {
            BeamVisibility::PartiallyVisible
        } else {
            BeamVisibility::FullyVisible
        }
    }
}

/// Beam classification for a convex object seen from outside.
///
/// The directions from an external point that reach a convex body form a
/// convex cone, so when all four corner rays hit, every direction between
/// them hits too.
pub(crate) fn convex_coverage<H: Hittable + ?Sized>(object: &H, beam: &Beam) -> BeamVisibility {
    if !beam.intersects_aabb(&object.bounding_box()) {
        return BeamVisibility::FullyVisible;
    }

    let mut rec = HitRecord::default();
    let all_corners_hit = (0..4).all(|i| {
        object.hit(
            &beam.corner_ray(i),
            Interval::forward(SHADOW_EPSILON),
            &mut rec,
        )
    });

    if all_corners_hit {
        BeamVisibility::FullyOccluded
    } else {
        BeamVisibility::PartiallyVisible
    }
}

/// A list of hittable objects.
pub struct HittableList {
    objects: Vec<Box<dyn Hittable>>,
    bbox: Aabb,
}

impl HittableList {
    /// Create a new empty hittable list.
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            bbox: Aabb::EMPTY,
        }
    }

    /// Add an object to the list.
    pub fn add(&mut self, object: Box<dyn Hittable>) {
        self.bbox = Aabb::surrounding(&self.bbox, &object.bounding_box());
        self.objects.push(object);
    }

    /// Get the number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl Default for HittableList {
    fn default() -> Self {
        Self::new()
    }
}

impl Hittable for HittableList {
    fn hit(&self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord) -> bool {
        let mut hit_anything = false;
        let mut closest_so_far = ray_t.max;

        for object in &self.objects {
            let interval = Interval::new(ray_t.min, closest_so_far);
            if object.hit(ray, interval, rec) {
                hit_anything = true;
                closest_so_far = rec.t;
            }
        }

        hit_anything
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    fn beam_coverage(&self, beam: &Beam) -> BeamVisibility {
        let mut verdict = BeamVisibility::FullyVisible;
        for object in &self.objects {
            verdict = verdict.union(object.beam_coverage(beam));
            if verdict == BeamVisibility::FullyOccluded {
                break;
            }
        }
        verdict
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Sphere;

    #[test]
    fn test_set_face_normal() {
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        let mut rec = HitRecord::default();

        rec.set_face_normal(&ray, -Vec3::Z);
        assert!(rec.front_face);
        assert_eq!(rec.normal, -Vec3::Z);

        rec.set_face_normal(&ray, Vec3::Z);
        assert!(!rec.front_face);
        assert_eq!(rec.normal, -Vec3::Z);
    }

    #[test]
    fn test_list_reports_closest_hit() {
        let mut list = HittableList::new();
        list.add(Box::new(Sphere::new(Vec3::new(0.0, 0.0, 10.0), 1.0)));
        list.add(Box::new(Sphere::new(Vec3::new(0.0, 0.0, 5.0), 1.0)));
        assert_eq!(list.len(), 2);

        let mut rec = HitRecord::default();
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        assert!(list.hit(&ray, Interval::forward(0.001), &mut rec));
        assert!((rec.t - 4.0).abs() < 1e-4);
    }

    #[test]
    fn test_list_beam_coverage_takes_full_occluder() {
        let beam = Beam::new(
            Vec3::ZERO,
            [
                Vec3::new(-0.01, 1.0, -0.01),
                Vec3::new(0.01, 1.0, -0.01),
                Vec3::new(-0.01, 1.0, 0.01),
                Vec3::new(0.01, 1.0, 0.01),
            ],
        )
        .unwrap();

        let mut list = HittableList::new();
        // Overlaps one side of the beam without covering it.
        list.add(Box::new(Sphere::new(Vec3::new(0.55, 5.0, 0.0), 0.55)));
        assert_eq!(list.beam_coverage(&beam), BeamVisibility::PartiallyVisible);

        list.add(Box::new(Sphere::new(Vec3::new(0.0, 10.0, 0.0), 2.0)));
        assert_eq!(list.beam_coverage(&beam), BeamVisibility::FullyOccluded);
    }
}
