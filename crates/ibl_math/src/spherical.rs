//! Polar/azimuth parameterisation of directions and longitude-latitude texels.
//!
//! Angles are measured in the environment map's frame: `theta` is the polar
//! angle from +Y (the scene's up axis) and `phi` the azimuth around it,
//! starting at +Z and turning towards +X:
//!
//! ```text
//! x = sin(phi) * sin(theta)
//! y = cos(theta)
//! z = cos(phi) * sin(theta)
//! ```
//!
//! Texel `u` covers `phi` in `[u, u + 1) * 2pi / width`, texel `v` covers
//! `theta` in `[v, v + 1) * pi / height`. Row 0 is the +Y pole.

use std::f32::consts::{PI, TAU};
use std::ops::Range;

use crate::Vec3;

/// Slack, in texels, absorbed before flooring a boundary angle.
///
/// Region edges are produced by repeated halving in f32 and land a few ULPs
/// either side of the exact texel boundary. Snapping both neighbours the
/// same way keeps their texel ranges adjacent.
const TEXEL_SNAP: f32 = 1.0e-3;

/// Maps between angles, directions and texels of a `width x height`
/// longitude-latitude image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SphericalMapping {
    pub width: u32,
    pub height: u32,
}

impl SphericalMapping {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Unit direction for polar angle `theta` and azimuth `phi`.
    #[inline]
    pub fn to_direction(theta: f32, phi: f32) -> Vec3 {
        let (sin_theta, cos_theta) = theta.sin_cos();
        let (sin_phi, cos_phi) = phi.sin_cos();
        Vec3::new(sin_phi * sin_theta, cos_theta, cos_phi * sin_theta)
    }

    /// Inverse of [`SphericalMapping::to_direction`]: `(theta, phi)` with
    /// `theta` in `[0, pi]` and `phi` in `[0, 2pi)`.
    ///
    /// `dir` must be unit length.
    pub fn to_angles(dir: Vec3) -> (f32, f32) {
        let theta = dir.y.clamp(-1.0, 1.0).acos();
        let mut phi = dir.x.atan2(dir.z);
        if phi < 0.0 {
            phi += TAU;
        }
        if phi >= TAU {
            phi = 0.0;
        }
        (theta, phi)
    }

    /// Texel containing `(phi, theta)`. Indices are clamped to the image.
    pub fn to_texel(&self, phi: f32, theta: f32) -> (u32, u32) {
        let u = Self::texel_index(phi / TAU, self.width);
        let v = Self::texel_index(theta / PI, self.height);
        (u, v)
    }

    /// Columns whose left edge lies in `[phi_start, phi_end)`.
    pub fn column_range(&self, phi_start: f32, phi_end: f32) -> Range<u32> {
        Self::span(phi_start / TAU, phi_end / TAU, self.width)
    }

    /// Rows whose top edge lies in `[theta_start, theta_end)`.
    pub fn row_range(&self, theta_start: f32, theta_end: f32) -> Range<u32> {
        Self::span(theta_start / PI, theta_end / PI, self.height)
    }

    /// `(theta, phi)` at the centre of texel `(u, v)`.
    #[inline]
    pub fn texel_center(&self, u: u32, v: u32) -> (f32, f32) {
        let theta = (v as f32 + 0.5) / self.height as f32 * PI;
        let phi = (u as f32 + 0.5) / self.width as f32 * TAU;
        (theta, phi)
    }

    /// Angular height of one texel row.
    pub fn row_angle(&self) -> f32 {
        PI / self.height as f32
    }

    fn texel_index(t: f32, resolution: u32) -> u32 {
        let i = (t * resolution as f32).floor().max(0.0) as u32;
        i.min(resolution.saturating_sub(1))
    }

    fn span(start: f32, end: f32, resolution: u32) -> Range<u32> {
        let snap = |t: f32| {
            let i = (t * resolution as f32 + TEXEL_SNAP).floor().max(0.0) as u32;
            i.min(resolution)
        };
        let s = snap(start);
        let e = snap(end).max(s);
        s..e
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_pole_and_equator_directions() {
        let pole = SphericalMapping::to_direction(0.0, 1.234);
        assert!((pole - Vec3::Y).length() < 1e-6);

        let front = SphericalMapping::to_direction(FRAC_PI_2, 0.0);
        assert!((front - Vec3::Z).length() < 1e-6);

        let right = SphericalMapping::to_direction(FRAC_PI_2, FRAC_PI_2);
        assert!((right - Vec3::X).length() < 1e-6);
    }

    #[test]
    fn test_directions_are_unit_length() {
        for i in 0..16 {
            for j in 0..32 {
                let theta = i as f32 / 15.0 * PI;
                let phi = j as f32 / 32.0 * TAU;
                let d = SphericalMapping::to_direction(theta, phi);
                assert!((d.length() - 1.0).abs() < 1e-5);
            }
        }
    }

    #[test]
    fn test_to_angles_inverts_to_direction() {
        for (theta, phi) in [(0.3, 0.1), (1.2, 3.0), (2.9, 5.5), (FRAC_PI_2, 4.0)] {
            let (t, p) = SphericalMapping::to_angles(SphericalMapping::to_direction(theta, phi));
            assert!((t - theta).abs() < 1e-4, "theta {theta} -> {t}");
            assert!((p - phi).abs() < 1e-4, "phi {phi} -> {p}");
        }
    }

    #[test]
    fn test_to_texel_is_linear_and_clamped() {
        let mapping = SphericalMapping::new(128, 64);

        assert_eq!(mapping.to_texel(0.0, 0.0), (0, 0));
        assert_eq!(mapping.to_texel(PI, FRAC_PI_2), (64, 32));
        assert_eq!(mapping.to_texel(TAU, PI), (127, 63));
        assert_eq!(mapping.to_texel(-1.0, -1.0), (0, 0));
    }

    #[test]
    fn test_adjacent_ranges_tile_without_gaps() {
        let mapping = SphericalMapping::new(128, 64);
        let step = TAU / 40.0;

        let mut next = 0;
        for i in 0..40 {
            let start = i as f32 * step;
            let range = mapping.column_range(start, start + step);
            assert_eq!(range.start, next);
            next = range.end;
        }
        assert_eq!(next, 128);
    }

    #[test]
    fn test_range_end_reaches_last_texel() {
        let mapping = SphericalMapping::new(128, 64);

        assert_eq!(mapping.column_range(TAU * 0.75, TAU), 96..128);
        assert_eq!(mapping.row_range(FRAC_PI_2, PI), 32..64);
    }

    #[test]
    fn test_sub_texel_range_may_be_empty() {
        let mapping = SphericalMapping::new(16, 8);
        let texel = TAU / 16.0;

        let range = mapping.column_range(texel * 0.2, texel * 0.6);
        assert!(range.is_empty());
    }

    #[test]
    fn test_texel_center_lies_inside_texel() {
        let mapping = SphericalMapping::new(128, 64);
        let (theta, phi) = mapping.texel_center(10, 20);

        assert_eq!(mapping.to_texel(phi, theta), (10, 20));
    }
}
