//! Orthonormal frame around a surface normal.

use crate::Vec3;

/// Tangent, bitangent and normal of a right-handed local frame.
///
/// Local coordinates use the normal as the third (z) axis, so a local
/// direction `(x, y, z)` has `z = cos(theta)` with respect to the normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrthoBasis {
    pub tangent: Vec3,
    pub bitangent: Vec3,
    pub normal: Vec3,
}

impl OrthoBasis {
    /// Build a frame around `n`. `n` is expected to be unit length.
    ///
    /// The tangent choice is arbitrary but deterministic: it is derived from
    /// world +Y unless the normal is nearly parallel to it, then from +X.
    pub fn from_normal(n: Vec3) -> Self {
        let up = if n.y.abs() < 0.999 { Vec3::Y } else { Vec3::X };
        let tangent = up.cross(n).normalize();
        let bitangent = n.cross(tangent);
        Self {
            tangent,
            bitangent,
            normal: n,
        }
    }

    /// Transform a local-frame vector to world space.
    #[inline]
    pub fn to_world(&self, local: Vec3) -> Vec3 {
        self.tangent * local.x + self.bitangent * local.y + self.normal * local.z
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_orthonormal(basis: &OrthoBasis) {
        assert!((basis.tangent.length() - 1.0).abs() < 1e-5);
        assert!((basis.bitangent.length() - 1.0).abs() < 1e-5);
        assert!(basis.tangent.dot(basis.bitangent).abs() < 1e-5);
        assert!(basis.tangent.dot(basis.normal).abs() < 1e-5);
        assert!(basis.bitangent.dot(basis.normal).abs() < 1e-5);
    }

    #[test]
    fn test_basis_is_orthonormal() {
        for n in [
            Vec3::Y,
            -Vec3::Y,
            Vec3::X,
            Vec3::new(1.0, 1.0, 0.0).normalize(),
            Vec3::new(-0.3, 0.2, 0.9).normalize(),
        ] {
            let basis = OrthoBasis::from_normal(n);
            assert_orthonormal(&basis);
        }
    }

    #[test]
    fn test_local_z_maps_to_normal() {
        let n = Vec3::new(0.2, -0.5, 0.7).normalize();
        let basis = OrthoBasis::from_normal(n);

        assert!((basis.to_world(Vec3::Z) - n).length() < 1e-5);
    }

    #[test]
    fn test_frame_is_orthonormal_and_right_handed() {
        let basis = OrthoBasis::from_normal(Vec3::new(0.0, 0.6, 0.8));
        let t = basis.to_world(Vec3::X);
        let b = basis.to_world(Vec3::Y);
        let n = basis.to_world(Vec3::Z);

        assert!((t.length() - 1.0).abs() < 1e-5);
        assert!((b.length() - 1.0).abs() < 1e-5);
        assert!(t.dot(b).abs() < 1e-5 && t.dot(n).abs() < 1e-5 && b.dot(n).abs() < 1e-5);
        assert!((t.cross(b) - n).length() < 1e-5);
    }
}
