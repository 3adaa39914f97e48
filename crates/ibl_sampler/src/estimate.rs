//! Beam-swept IBL estimate for a single shading point.

use ibl_core::{Color, EnvironmentMap, ProductMap};
use ibl_math::Vec3;
use ibl_trace::VisibilityOracle;

use crate::{integrate, BeamSamplerConfig, HemisphereSubdivider, SampleResult};

/// Outgoing radiance at `origin` from the environment light, computed by
/// sweeping beams over the hemisphere around `normal`.
///
/// `product` is cleared first and holds the per-texel products on return,
/// which is handy for debugging with [`ProductMap::save_debug_image`].
pub fn sample_ibl_beam<O: VisibilityOracle + ?Sized>(
    oracle: &O,
    env: &EnvironmentMap,
    product: &mut ProductMap,
    origin: Vec3,
    normal: Vec3,
    config: &BeamSamplerConfig,
) -> SampleResult<Color> {
    product.clear();
    let stats = HemisphereSubdivider::new(oracle, env, config).sample(origin, normal, product)?;
    let radiance = integrate(product);

    log::trace!(
        "Beam IBL at {origin}: {radiance} ({} of {} regions contributed)",
        stats.contributed,
        stats.regions
    );
    Ok(radiance)
}
