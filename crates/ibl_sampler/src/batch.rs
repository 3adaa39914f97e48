//! Parallel evaluation of many shading points.
//!
//! Shading points are independent, so they are spread over rayon's thread
//! pool. Every worker owns its scratch product map; the environment map
//! and the occluder scene are shared read-only.

use std::time::Instant;

use ibl_core::{Color, EnvironmentMap, ProductMap};
use ibl_math::Vec3;
use ibl_trace::VisibilityOracle;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;

use crate::{
    sample_ibl_beam, sample_ibl_naive, BeamSamplerConfig, NaiveSamplerConfig, SampleResult,
};

/// A surface point to light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadingPoint {
    pub position: Vec3,
    pub normal: Vec3,
}

impl ShadingPoint {
    pub fn new(position: Vec3, normal: Vec3) -> Self {
        Self { position, normal }
    }
}

/// Beam estimate for every point, in input order.
///
/// Fails with the first error any point reports.
pub fn sample_ibl_beam_batch<O: VisibilityOracle + ?Sized>(
    oracle: &O,
    env: &EnvironmentMap,
    points: &[ShadingPoint],
    config: &BeamSamplerConfig,
) -> SampleResult<Vec<Color>> {
    config.validate()?;
    let start = Instant::now();

    let results = points
        .par_iter()
        .map_init(
            || ProductMap::for_environment(env),
            |product, point| {
                sample_ibl_beam(oracle, env, product, point.position, point.normal, config)
            },
        )
        .collect::<SampleResult<Vec<Color>>>()?;

    log::info!(
        "Beam IBL: {} points in {:.2?}",
        points.len(),
        start.elapsed()
    );
    Ok(results)
}

/// Monte Carlo estimate for every point, in input order.
///
/// Point `i` draws from its own `StdRng` seeded with `seed + i`, so the
/// result does not depend on how rayon schedules the work.
pub fn sample_ibl_naive_batch<O: VisibilityOracle + ?Sized>(
    oracle: &O,
    env: &EnvironmentMap,
    points: &[ShadingPoint],
    config: &NaiveSamplerConfig,
    seed: u64,
) -> SampleResult<Vec<Color>> {
    config.validate()?;
    let start = Instant::now();

    let results = points
        .par_iter()
        .enumerate()
        .map(|(i, point)| {
            let mut rng = StdRng::seed_from_u64(seed.wrapping_add(i as u64));
            sample_ibl_naive(oracle, env, point.position, point.normal, config, &mut rng)
        })
        .collect::<SampleResult<Vec<Color>>>()?;

    log::info!(
        "Naive IBL: {} points x {} rays in {:.2?}",
        points.len(),
        config.sample_count(),
        start.elapsed()
    );
    Ok(results)
}
