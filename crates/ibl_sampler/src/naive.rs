//! Stratified cosine-weighted Monte Carlo reference estimator.

use std::f32::consts::TAU;

use ibl_core::{Color, EnvironmentMap};
use ibl_math::{OrthoBasis, Ray, Vec3};
use ibl_trace::VisibilityOracle;
use rand::{Rng, RngCore};

use crate::error::validate_shading_point;
use crate::{NaiveSamplerConfig, SampleError, SampleResult};

/// Outgoing radiance at `origin` estimated with one shadow ray per sample.
///
/// Samples are jittered on a `theta_samples x phi_samples` grid over the
/// unit square and mapped to the hemisphere with a cosine-weighted
/// (Malley) warp, so each unoccluded sample contributes `L(w)` and the
/// estimate is the mean of the contributions. Converges to the same value
/// as [`crate::sample_ibl_beam`].
pub fn sample_ibl_naive<O: VisibilityOracle + ?Sized>(
    oracle: &O,
    env: &EnvironmentMap,
    origin: Vec3,
    normal: Vec3,
    config: &NaiveSamplerConfig,
    rng: &mut dyn RngCore,
) -> SampleResult<Color> {
    let normal = validate_shading_point(origin, normal)?;
    config.validate()?;
    if env.is_empty() {
        return Err(SampleError::EmptyEnvironment);
    }

    let basis = OrthoBasis::from_normal(normal);
    let theta_samples = config.theta_samples as f32;
    let phi_samples = config.phi_samples as f32;

    let mut power = Color::ZERO;
    let mut unoccluded = 0u32;
    for v in 0..config.phi_samples {
        for u in 0..config.theta_samples {
            let z0 = (u as f32 + rng.gen::<f32>()) / theta_samples;
            let z1 = (v as f32 + rng.gen::<f32>()) / phi_samples;
            let direction = basis.to_world(cosine_direction(z0, z1));

            let shadow = Ray::offset_from(origin, normal, config.origin_offset, direction);
            if !oracle.occluded(&shadow) {
                power += env.fetch(direction);
                unoccluded += 1;
            }
        }
    }

    // L cos / pdf = pi L; the outgoing (1/pi) factor cancels it.
    let radiance = power / config.sample_count() as f32;
    log::trace!(
        "Naive IBL at {origin}: {radiance} ({unoccluded} of {} rays escaped)",
        config.sample_count()
    );
    Ok(radiance)
}

/// Map a point of the unit square to a local-frame direction with density
/// `cos(theta) / pi`.
fn cosine_direction(z0: f32, z1: f32) -> Vec3 {
    let r = z0.sqrt();
    let phi = TAU * z1;
    let (sin_phi, cos_phi) = phi.sin_cos();
    Vec3::new(cos_phi * r, sin_phi * r, (1.0 - z0).max(0.0).sqrt())
}
