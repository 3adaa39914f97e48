//! Bounding Volume Hierarchy (BVH) over occluders.
//!
//! Binary tree with median splits. Answers both single-ray and beam
//! queries; beam traversal stops at the first subtree that blocks the
//! whole beam.

use crate::{Beam, BeamVisibility, HitRecord, Hittable};
use ibl_math::{Aabb, Interval, Ray};

/// Maximum primitives per leaf node before splitting.
const LEAF_MAX_SIZE: usize = 4;

/// BVH node - either a branch with two children or a leaf with primitives.
pub enum BvhNode {
    /// Internal node with two children.
    Branch {
        left: Box<BvhNode>,
        right: Box<BvhNode>,
        bbox: Aabb,
    },
    /// Leaf node with a small number of primitives.
    Leaf {
        objects: Vec<Box<dyn Hittable>>,
        bbox: Aabb,
    },
    /// Empty node (scene without occluders).
    Empty,
}

impl BvhNode {
    /// Create a BVH from a list of hittable objects.
    pub fn new(objects: Vec<Box<dyn Hittable>>) -> Self {
        if objects.is_empty() {
            return BvhNode::Empty;
        }
        let count = objects.len();
        let node = Self::build(objects);
        log::debug!("Built occluder BVH over {} primitives", count);
        node
    }

    /// Recursive BVH construction.
    ///
    /// Sort objects by centroid on the longest axis of the centroid bounds,
    /// split in half, recurse.
    fn build(mut objects: Vec<Box<dyn Hittable>>) -> Self {
        let n = objects.len();

        let bounds = objects.iter().fold(Aabb::EMPTY, |acc, o| {
            Aabb::surrounding(&acc, &o.bounding_box())
        });

        if n <= LEAF_MAX_SIZE {
            return BvhNode::Leaf {
                objects,
                bbox: bounds,
            };
        }

        let centroid_bounds = objects.iter().fold(Aabb::EMPTY, |acc, obj| {
            let c = obj.bounding_box().centroid();
            Aabb::surrounding(&acc, &Aabb::from_points(c, c))
        });
        let axis = centroid_bounds.longest_axis();

        objects.sort_unstable_by(|a, b| {
            let a_val = a.bounding_box().centroid()[axis];
            let b_val = b.bounding_box().centroid()[axis];
            a_val
                .partial_cmp(&b_val)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let right_objects = objects.split_off(n / 2);
        let left = Self::build(objects);
        let right = Self::build(right_objects);

        BvhNode::Branch {
            left: Box::new(left),
            right: Box::new(right),
            bbox: bounds,
        }
    }
}

impl Hittable for BvhNode {
    fn hit(&self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord) -> bool {
        match self {
            BvhNode::Empty => false,

            BvhNode::Leaf { objects, bbox } => {
                if !bbox.hit(ray, ray_t) {
                    return false;
                }

                let mut hit_anything = false;
                let mut closest = ray_t.max;

                for obj in objects {
                    let interval = Interval::new(ray_t.min, closest);
                    if obj.hit(ray, interval, rec) {
                        hit_anything = true;
                        closest = rec.t;
                    }
                }
                hit_anything
            }

            BvhNode::Branch { left, right, bbox } => {
                if !bbox.hit(ray, ray_t) {
                    return false;
                }

                let hit_left = left.hit(ray, ray_t, rec);

                // Only check right up to closest hit
                let right_max = if hit_left { rec.t } else { ray_t.max };
                let hit_right = right.hit(ray, Interval::new(ray_t.min, right_max), rec);

                hit_left || hit_right
            }
        }
    }

    fn bounding_box(&self) -> Aabb {
        match self {
            BvhNode::Empty => Aabb::EMPTY,
            BvhNode::Leaf { bbox, .. } => *bbox,
            BvhNode::Branch { bbox, .. } => *bbox,
        }
    }

    fn beam_coverage(&self, beam: &Beam) -> BeamVisibility {
        match self {
            BvhNode::Empty => BeamVisibility::FullyVisible,

            BvhNode::Leaf { objects, bbox } => {
                if !beam.intersects_aabb(bbox) {
                    return BeamVisibility::FullyVisible;
                }

                let mut verdict = BeamVisibility::FullyVisible;
                for obj in objects {
                    verdict = verdict.union(obj.beam_coverage(beam));
                    if verdict == BeamVisibility::FullyOccluded {
                        break;
                    }
                }
                verdict
            }

            BvhNode::Branch { left, right, bbox } => {
                if !beam.intersects_aabb(bbox) {
                    return BeamVisibility::FullyVisible;
                }

                let left_verdict = left.beam_coverage(beam);
                if left_verdict == BeamVisibility::FullyOccluded {
                    return left_verdict;
                }
                left_verdict.union(right.beam_coverage(beam))
            }
        }
    }
}
