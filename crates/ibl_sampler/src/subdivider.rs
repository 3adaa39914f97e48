//! Recursive beam sweep over the direction sphere.

use ibl_core::{EnvironmentMap, ProductMap};
use ibl_math::Vec3;
use ibl_trace::{Beam, BeamVisibility, VisibilityOracle};

use crate::error::validate_shading_point;
use crate::{BeamSamplerConfig, HemisphereRegion, RadianceContributor, SampleError, SampleResult};

/// Counters collected during one sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepStats {
    /// Regions entered, dropped ones included
    pub regions: u32,
    /// Regions entirely below the surface
    pub culled: u32,
    /// Splits caused by a region straddling the surface plane
    pub horizon_splits: u32,
    /// Beams handed to the visibility oracle
    pub oracle_queries: u32,
    pub occluded: u32,
    pub partial_splits: u32,
    /// Regions written into the product map
    pub contributed: u32,
    /// Regions discarded at the depth or angle cutoff.
    /// The angle cutoff never applies to the starting grid.
    pub dropped: u32,
    /// Deepest level that was examined
    pub max_depth_reached: u32,
}

/// Walks the quad-tree of angular regions around a shading point and fills
/// the product map with the radiance of every region proven visible.
///
/// Regions still undecided at the cutoff are dropped, so the sweep may
/// underestimate the light passing close to occluder silhouettes and the
/// horizon.
pub struct HemisphereSubdivider<'a, O: VisibilityOracle + ?Sized> {
    oracle: &'a O,
    env: &'a EnvironmentMap,
    config: &'a BeamSamplerConfig,
    min_angle: f32,
}

/// Per-sweep state threaded through the recursion.
struct Sweep<'s, 'a> {
    normal: Vec3,
    beam_origin: Vec3,
    contributor: RadianceContributor<'a>,
    product: &'s mut ProductMap,
    stats: SweepStats,
}

impl<'a, O: VisibilityOracle + ?Sized> HemisphereSubdivider<'a, O> {
    pub fn new(oracle: &'a O, env: &'a EnvironmentMap, config: &'a BeamSamplerConfig) -> Self {
        Self {
            oracle,
            env,
            config,
            min_angle: config.min_angle_for(env),
        }
    }

    /// Sweep the sphere around `origin` and write the visible, cosine
    /// weighted radiance into `product`.
    ///
    /// `product` must match the environment map and should be cleared
    /// beforehand; texels of regions that are not visible keep whatever
    /// they held.
    pub fn sample(
        &self,
        origin: Vec3,
        normal: Vec3,
        product: &mut ProductMap,
    ) -> SampleResult<SweepStats> {
        let normal = validate_shading_point(origin, normal)?;
        self.config.validate()?;
        if self.env.is_empty() {
            return Err(SampleError::EmptyEnvironment);
        }
        if !product.matches(self.env) {
            return Err(SampleError::ProductMapMismatch {
                product_width: product.width(),
                product_height: product.height(),
                env_width: self.env.width(),
                env_height: self.env.height(),
            });
        }

        let mut sweep = Sweep {
            normal,
            beam_origin: origin + normal * self.config.origin_offset,
            contributor: RadianceContributor::new(self.env, normal),
            product,
            stats: SweepStats::default(),
        };

        for region in HemisphereRegion::initial(self.config.strata) {
            self.subdivide(&mut sweep, region)?;
        }

        let stats = sweep.stats;
        log::debug!(
            "Sweep at {origin}: {} regions, {} queries, {} occluded, {} lit, {} dropped, depth {}",
            stats.regions,
            stats.oracle_queries,
            stats.occluded,
            stats.contributed,
            stats.dropped,
            stats.max_depth_reached
        );
        Ok(stats)
    }

    fn subdivide(&self, sweep: &mut Sweep<'_, 'a>, region: HemisphereRegion) -> SampleResult<()> {
        sweep.stats.regions += 1;

        // The starting grid is always examined, however coarse the map.
        let too_fine = region.depth > 0 && region.is_finer_than(self.min_angle);
        if region.depth > self.config.max_depth || too_fine {
            sweep.stats.dropped += 1;
            return Ok(());
        }
        sweep.stats.max_depth_reached = sweep.stats.max_depth_reached.max(region.depth);

        let corners = region.corner_directions(self.config.corner_epsilon);
        let below = corners
            .iter()
            .filter(|dir| dir.dot(sweep.normal) < 0.0)
            .count();

        match below {
            4 => {
                sweep.stats.culled += 1;
                return Ok(());
            }
            0 => {}
            _ => {
                sweep.stats.horizon_splits += 1;
                return self.split(sweep, region);
            }
        }

        let beam = Beam::new(sweep.beam_origin, corners)?;
        sweep.stats.oracle_queries += 1;

        let verdict = self.oracle.classify_beam(&beam);
        log::trace!(
            "Region theta {:.4}+{:.4} phi {:.4}+{:.4} at depth {}: {verdict:?}",
            region.theta,
            region.theta_step,
            region.phi,
            region.phi_step,
            region.depth
        );

        match verdict {
            BeamVisibility::FullyOccluded => {
                sweep.stats.occluded += 1;
            }
            BeamVisibility::PartiallyVisible => {
                sweep.stats.partial_splits += 1;
                self.split(sweep, region)?;
            }
            BeamVisibility::FullyVisible => {
                sweep.stats.contributed += 1;
                sweep.contributor.contribute(&region, sweep.product);
            }
        }
        Ok(())
    }

    fn split(&self, sweep: &mut Sweep<'_, 'a>, region: HemisphereRegion) -> SampleResult<()> {
        for child in region.split() {
            self.subdivide(sweep, child)?;
        }
        Ok(())
    }
}
