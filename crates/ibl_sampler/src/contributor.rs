//! Writes cosine-weighted radiance for visible regions into the product map.

use ibl_core::{Color, EnvironmentMap, ProductMap};
use ibl_math::{SphericalMapping, Vec3};

use crate::HemisphereRegion;

/// Fills product-map texels for one shading normal.
///
/// Each texel centre in a region gets `L * max(0, dir . n) * sin(theta)`.
/// The `sin(theta)` factor is the texel's solid angle up to the constant
/// `2pi/W * pi/H` that [`crate::integrate`] applies, so a uniform white map
/// integrates to 1.
pub struct RadianceContributor<'a> {
    env: &'a EnvironmentMap,
    mapping: SphericalMapping,
    normal: Vec3,
}

impl<'a> RadianceContributor<'a> {
    /// `normal` must be unit length.
    pub fn new(env: &'a EnvironmentMap, normal: Vec3) -> Self {
        Self {
            env,
            mapping: env.mapping(),
            normal,
        }
    }

    /// Write every texel the region covers, overwriting previous values.
    /// Returns the number of texels written.
    pub fn contribute(&self, region: &HemisphereRegion, product: &mut ProductMap) -> usize {
        let rows = self.mapping.row_range(region.theta, region.theta_end());
        let columns = self.mapping.column_range(region.phi, region.phi_end());

        for v in rows.clone() {
            for u in columns.clone() {
                let (theta, phi) = self.mapping.texel_center(u, v);
                let dir = SphericalMapping::to_direction(theta, phi);
                let weight = dir.dot(self.normal).max(0.0) * theta.sin();
                let radiance: Color = self.env.texel(u, v);
                product.set(u, v, radiance * weight);
            }
        }

        rows.len() * columns.len()
    }
}
