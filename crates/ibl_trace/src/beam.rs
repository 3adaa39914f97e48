//! Beams: four-cornered bundles of rays sharing one origin.
//!
//! A beam stands for every direction inside the pyramid spanned by its four
//! corner directions. Corners are ordered like the patch they come from:
//!
//! ```text
//! 0 ---- 1        ----> phi
//! |      |        |
//! |      |        v
//! 2 ---- 3        theta
//! ```

use ibl_math::{Aabb, Ray, Vec3};
use thiserror::Error;

/// Squared length below which a direction or axis is treated as zero.
const DEGENERATE_LENGTH_SQ: f32 = 1.0e-12;

/// Corner/axis dot products closer to zero than this count as zero.
const AXIS_EPSILON: f32 = 1.0e-6;

/// Corner pairs walking around the pyramid's rim.
const RIM: [(usize, usize); 4] = [(0, 1), (1, 3), (3, 2), (2, 0)];

/// Errors raised when a beam cannot be built.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum BeamError {
    #[error("Beam origin is not finite: {0}")]
    NonFiniteOrigin(Vec3),

    #[error("Beam corner {index} has a degenerate direction: {direction}")]
    DegenerateCorner { index: usize, direction: Vec3 },
}

/// A generalized ray with four corner directions.
#[derive(Debug, Clone, Copy)]
pub struct Beam {
    origin: Vec3,
    /// Unit corner directions.
    corners: [Vec3; 4],
    /// Normals of the four side planes, pointing into the beam.
    /// Zero where two corners (nearly) coincide.
    sides: [Vec3; 4],
}

impl Beam {
    /// Build a beam, normalizing the corner directions.
    pub fn new(origin: Vec3, corners: [Vec3; 4]) -> Result<Self, BeamError> {
        if !origin.is_finite() {
            return Err(BeamError::NonFiniteOrigin(origin));
        }

        let mut unit = [Vec3::ZERO; 4];
        for (index, direction) in corners.into_iter().enumerate() {
            if !direction.is_finite() || direction.length_squared() < DEGENERATE_LENGTH_SQ {
                return Err(BeamError::DegenerateCorner { index, direction });
            }
            unit[index] = direction.normalize();
        }

        let center = unit.iter().copied().sum::<Vec3>();
        let mut sides = [Vec3::ZERO; 4];
        for (side, (a, b)) in sides.iter_mut().zip(RIM) {
            let n = unit[a].cross(unit[b]);
            if n.length_squared() < DEGENERATE_LENGTH_SQ {
                continue;
            }
            let n = n.normalize();
            *side = if n.dot(center) < 0.0 { -n } else { n };
        }

        Ok(Self {
            origin,
            corners: unit,
            sides,
        })
    }

    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    #[inline]
    pub fn corners(&self) -> &[Vec3; 4] {
        &self.corners
    }

    /// Ray along corner `index` (0..4).
    #[inline]
    pub fn corner_ray(&self, index: usize) -> Ray {
        Ray::new(self.origin, self.corners[index])
    }

    /// Normalized mean of the corner directions.
    pub fn central_direction(&self) -> Vec3 {
        self.corners.iter().copied().sum::<Vec3>().normalize_or_zero()
    }

    /// Returns true unless the box provably lies outside the beam's pyramid.
    ///
    /// Separating-axis test between the box and the infinite pyramid with
    /// apex at the origin: box face normals, pyramid side normals, and the
    /// cross products of the box axes with the corner directions.
    pub fn intersects_aabb(&self, bbox: &Aabb) -> bool {
        if bbox.is_empty() {
            return false;
        }

        for axis in [Vec3::X, Vec3::Y, Vec3::Z] {
            if self.separated_along(axis, bbox) {
                return false;
            }
        }

        for side in self.sides {
            if self.separated_along(side, bbox) {
                return false;
            }
        }

        for corner in self.corners {
            for axis in [Vec3::X, Vec3::Y, Vec3::Z] {
                if self.separated_along(corner.cross(axis), bbox) {
                    return false;
                }
            }
        }

        true
    }

    /// Returns true if the ball lies entirely outside one of the pyramid's
    /// bounding planes.
    ///
    /// Exact for balls beyond a side; conservative near the pyramid's edges.
    pub fn excludes_sphere(&self, center: Vec3, radius: f32) -> bool {
        let offset = center - self.origin;
        self.bounding_planes().any(|n| n.dot(offset) < -radius)
    }

    /// Returns true if the planar convex polygon cannot meet the pyramid:
    /// either every vertex is outside one bounding plane, or no direction of
    /// the beam moves towards the polygon's plane.
    pub fn excludes_polygon(&self, vertices: &[Vec3], normal: Vec3) -> bool {
        let Some(&anchor) = vertices.first() else {
            return true;
        };

        let apex_side = normal.dot(self.origin - anchor);
        if apex_side != 0.0
            && self
                .corners
                .iter()
                .all(|c| normal.dot(*c) * apex_side.signum() >= 0.0)
        {
            return true;
        }

        self.bounding_planes()
            .any(|n| vertices.iter().all(|v| n.dot(*v - self.origin) < 0.0))
    }

    /// Inward normals of planes through the apex that contain the pyramid:
    /// the usable sides, plus the plane facing the central direction when
    /// every corner lies in front of it.
    fn bounding_planes(&self) -> impl Iterator<Item = Vec3> + '_ {
        let axis = self.central_direction();
        let front = self.corners.iter().all(|c| c.dot(axis) > AXIS_EPSILON);
        self.sides
            .iter()
            .copied()
            .filter(|n| *n != Vec3::ZERO)
            .chain(front.then_some(axis))
    }

    /// The pyramid projects onto `axis` as a half-line starting at the apex
    /// (or the whole line when corners point both ways along it).
    fn separated_along(&self, axis: Vec3, bbox: &Aabb) -> bool {
        if axis.length_squared() < DEGENERATE_LENGTH_SQ {
            return false;
        }

        let apex = self.origin.dot(axis);
        let mut forward = false;
        let mut backward = false;
        for corner in self.corners {
            let s = corner.dot(axis);
            if s > AXIS_EPSILON {
                forward = true;
            } else if s < -AXIS_EPSILON {
                backward = true;
            }
        }

        let projected = bbox.project(axis);
        match (forward, backward) {
            (true, true) => false,
            (true, false) => projected.max < apex,
            (false, true) => projected.min > apex,
            (false, false) => projected.max < apex || projected.min > apex,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Narrow beam around +Y from the origin.
    fn upward_beam(spread: f32) -> Beam {
        Beam::new(
            Vec3::ZERO,
            [
                Vec3::new(-spread, 1.0, -spread),
                Vec3::new(spread, 1.0, -spread),
                Vec3::new(-spread, 1.0, spread),
                Vec3::new(spread, 1.0, spread),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_corners_are_normalized() {
        let beam = upward_beam(0.5);
        for c in beam.corners() {
            assert!((c.length() - 1.0).abs() < 1e-6);
        }
        assert!((beam.central_direction() - Vec3::Y).length() < 1e-6);
    }

    #[test]
    fn test_degenerate_corner_is_rejected() {
        let err = Beam::new(Vec3::ZERO, [Vec3::Y, Vec3::ZERO, Vec3::Y, Vec3::Y]).unwrap_err();
        assert!(matches!(err, BeamError::DegenerateCorner { index: 1, .. }));

        let err = Beam::new(Vec3::ZERO, [Vec3::Y, Vec3::Y, Vec3::NAN, Vec3::Y]).unwrap_err();
        assert!(matches!(err, BeamError::DegenerateCorner { index: 2, .. }));

        let err = Beam::new(Vec3::splat(f32::INFINITY), [Vec3::Y; 4]).unwrap_err();
        assert!(matches!(err, BeamError::NonFiniteOrigin(_)));
    }

    #[test]
    fn test_box_inside_beam_intersects() {
        let beam = upward_beam(0.5);
        let bbox = Aabb::from_points(Vec3::new(-0.1, 4.0, -0.1), Vec3::new(0.1, 5.0, 0.1));

        assert!(beam.intersects_aabb(&bbox));
    }

    #[test]
    fn test_box_beside_beam_is_separated() {
        let beam = upward_beam(0.1);
        let bbox = Aabb::from_points(Vec3::new(2.0, 1.0, -0.5), Vec3::new(3.0, 2.0, 0.5));

        assert!(!beam.intersects_aabb(&bbox));
    }

    #[test]
    fn test_box_behind_apex_is_separated() {
        let beam = upward_beam(0.5);
        let bbox = Aabb::from_points(Vec3::new(-1.0, -3.0, -1.0), Vec3::new(1.0, -2.0, 1.0));

        assert!(!beam.intersects_aabb(&bbox));
    }

    #[test]
    fn test_wide_floor_below_grazing_beam_is_separated() {
        // A beam skimming just above the horizon must not see a huge floor
        // slab lying under its apex.
        let origin = Vec3::new(0.0, 0.01, 0.0);
        let beam = Beam::new(
            origin,
            [
                Vec3::new(-0.1, 0.05, 1.0),
                Vec3::new(0.1, 0.05, 1.0),
                Vec3::new(-0.1, 0.01, 1.0),
                Vec3::new(0.1, 0.01, 1.0),
            ],
        )
        .unwrap();
        let floor = Aabb::from_points(Vec3::new(-100.0, 0.0, -100.0), Vec3::new(100.0, 0.0, 100.0));

        assert!(!beam.intersects_aabb(&floor));
    }

    #[test]
    fn test_box_containing_origin_intersects() {
        let beam = upward_beam(0.5);
        let bbox = Aabb::from_points(Vec3::splat(-1.0), Vec3::splat(1.0));

        assert!(beam.intersects_aabb(&bbox));
        assert!(!beam.intersects_aabb(&Aabb::EMPTY));
    }

    #[test]
    fn test_sphere_exclusion() {
        let beam = upward_beam(0.1);

        assert!(beam.excludes_sphere(Vec3::new(3.0, 5.0, 0.0), 0.5));
        assert!(beam.excludes_sphere(Vec3::new(0.0, -5.0, 0.0), 1.0));
        assert!(!beam.excludes_sphere(Vec3::new(0.0, 5.0, 0.0), 0.1));
        // Touching the side plane from outside
        assert!(!beam.excludes_sphere(Vec3::new(1.0, 5.0, 0.0), 1.0));
    }

    #[test]
    fn test_polygon_exclusion() {
        let beam = upward_beam(0.1);
        let above = [
            Vec3::new(-1.0, 2.0, -1.0),
            Vec3::new(1.0, 2.0, -1.0),
            Vec3::new(0.0, 2.0, 1.0),
        ];
        assert!(!beam.excludes_polygon(&above, Vec3::Y));

        // Same plane, shifted sideways out of the beam
        let beside = above.map(|v| v + Vec3::new(5.0, 0.0, 0.0));
        assert!(beam.excludes_polygon(&beside, Vec3::Y));

        // Below the apex: the beam moves away from the plane
        let below = above.map(|v| v - Vec3::new(0.0, 4.0, 0.0));
        assert!(beam.excludes_polygon(&below, Vec3::Y));
        assert!(beam.excludes_polygon(&[], Vec3::Y));
    }

    #[test]
    fn test_corner_ray() {
        let beam = upward_beam(0.0);
        let ray = beam.corner_ray(3);

        assert_eq!(ray.origin(), Vec3::ZERO);
        assert!((ray.direction() - Vec3::Y).length() < 1e-6);
    }
}
