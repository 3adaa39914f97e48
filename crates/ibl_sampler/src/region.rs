//! Angular regions of the direction sphere.

use std::f32::consts::{FRAC_PI_2, TAU};

use ibl_math::{SphericalMapping, Vec3};

/// An axis-aligned patch in `(theta, phi)`, one node of the sweep's
/// quad-tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HemisphereRegion {
    /// Polar angle of the top edge
    pub theta: f32,
    /// Azimuth of the leading edge
    pub phi: f32,
    pub theta_step: f32,
    pub phi_step: f32,
    /// Number of splits from the initial grid
    pub depth: u32,
}

impl HemisphereRegion {
    pub fn new(theta: f32, phi: f32, theta_step: f32, phi_step: f32, depth: u32) -> Self {
        Self {
            theta,
            phi,
            theta_step,
            phi_step,
            depth,
        }
    }

    /// The depth-0 grid covering the whole sphere.
    ///
    /// Two polar bands (above and below the equator) times four azimuth
    /// quarters give eight octants, each cut into `strata x strata` cells
    /// of `pi / (2 strata)` by `2pi / (4 strata)`.
    pub fn initial(strata: u32) -> Vec<Self> {
        let theta_step = FRAC_PI_2 / strata as f32;
        let phi_step = TAU / (4 * strata) as f32;
        let mut regions = Vec::with_capacity((8 * strata * strata) as usize);

        for band in 0..2 {
            for quarter in 0..4 {
                let theta0 = band as f32 * FRAC_PI_2;
                let phi0 = quarter as f32 * (TAU / 4.0);
                for j in 0..strata {
                    for i in 0..strata {
                        regions.push(Self::new(
                            theta0 + j as f32 * theta_step,
                            phi0 + i as f32 * phi_step,
                            theta_step,
                            phi_step,
                            0,
                        ));
                    }
                }
            }
        }
        regions
    }

    #[inline]
    pub fn theta_end(&self) -> f32 {
        self.theta + self.theta_step
    }

    #[inline]
    pub fn phi_end(&self) -> f32 {
        self.phi + self.phi_step
    }

    /// True when either side has shrunk below `min_angle`.
    pub fn is_finer_than(&self, min_angle: f32) -> bool {
        self.theta_step < min_angle || self.phi_step < min_angle
    }

    /// Quarter the region. Children come theta-major: top-left, top-right,
    /// bottom-left, bottom-right.
    pub fn split(&self) -> [Self; 4] {
        let theta_step = self.theta_step * 0.5;
        let phi_step = self.phi_step * 0.5;
        let depth = self.depth + 1;
        let child = |j: u32, i: u32| {
            Self::new(
                self.theta + j as f32 * theta_step,
                self.phi + i as f32 * phi_step,
                theta_step,
                phi_step,
                depth,
            )
        };
        [child(0, 0), child(0, 1), child(1, 0), child(1, 1)]
    }

    /// Directions through the four corners, pulled `eps` inside the region.
    ///
    /// Order is `(top, leading)`, `(top, trailing)`, `(bottom, leading)`,
    /// `(bottom, trailing)`, the corner order [`ibl_trace::Beam`] expects.
    pub fn corner_directions(&self, eps: f32) -> [Vec3; 4] {
        let t0 = self.theta + eps;
        let t1 = self.theta_end() - eps;
        let p0 = self.phi + eps;
        let p1 = self.phi_end() - eps;
        [
            SphericalMapping::to_direction(t0, p0),
            SphericalMapping::to_direction(t0, p1),
            SphericalMapping::to_direction(t1, p0),
            SphericalMapping::to_direction(t1, p1),
        ]
    }

    /// Solid angle of the region in steradians.
    pub fn solid_angle(&self) -> f32 {
        self.phi_step * (self.theta.cos() - self.theta_end().cos())
    }
}
