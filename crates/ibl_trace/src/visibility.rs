//! The visibility oracle the IBL integrators query.

use crate::{Beam, BvhNode, HitRecord, Hittable, HittableList};
use ibl_math::{Interval, Ray};

/// Nearest hit distance accepted for shadow rays.
pub const SHADOW_EPSILON: f32 = 1.0e-4;

/// How much of a beam reaches the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BeamVisibility {
    /// Every direction in the beam hits geometry.
    FullyOccluded,
    /// No direction in the beam hits geometry.
    FullyVisible,
    /// Some directions may hit and some may escape.
    PartiallyVisible,
}

impl BeamVisibility {
    /// Merge the verdicts for two parts of the same scene.
    ///
    /// One part blocking the whole beam blocks it for the union; otherwise
    /// any doubt in either part leaves the union partial.
    pub fn union(self, other: Self) -> Self {
        use BeamVisibility::*;
        match (self, other) {
            (FullyOccluded, _) | (_, FullyOccluded) => FullyOccluded,
            (PartiallyVisible, _) | (_, PartiallyVisible) => PartiallyVisible,
            (FullyVisible, FullyVisible) => FullyVisible,
        }
    }
}

/// Occlusion queries against an immutable scene.
///
/// `classify_beam` must be conservative: when it cannot prove a beam is
/// fully blocked or fully clear it has to answer `PartiallyVisible`.
pub trait VisibilityOracle: Send + Sync {
    /// Classify every direction of `beam` at once.
    fn classify_beam(&self, beam: &Beam) -> BeamVisibility;

    /// Returns true if `ray` hits geometry in front of its origin.
    fn occluded(&self, ray: &Ray) -> bool;
}

fn any_hit(world: &dyn Hittable, ray: &Ray) -> bool {
    let mut rec = HitRecord::default();
    world.hit(ray, Interval::forward(SHADOW_EPSILON), &mut rec)
}

impl VisibilityOracle for BvhNode {
    fn classify_beam(&self, beam: &Beam) -> BeamVisibility {
        self.beam_coverage(beam)
    }

    fn occluded(&self, ray: &Ray) -> bool {
        any_hit(self, ray)
    }
}

impl VisibilityOracle for HittableList {
    fn classify_beam(&self, beam: &Beam) -> BeamVisibility {
        self.beam_coverage(beam)
    }

    fn occluded(&self, ray: &Ray) -> bool {
        any_hit(self, ray)
    }
}
