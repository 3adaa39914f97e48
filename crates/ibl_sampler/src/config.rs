//! Tunables for both estimators.
//!
//! Both configs deserialize from JSON with every field optional, so a
//! scene description only has to name what it overrides:
//!
//! ```ignore
//! let config = BeamSamplerConfig::from_json_str(r#"{ "max_depth": 5 }"#)?;
//! ```

use ibl_core::EnvironmentMap;
use serde::{Deserialize, Serialize};

use crate::{SampleError, SampleResult};

/// Configuration for the beam sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BeamSamplerConfig {
    /// Initial subdivisions per octant along each angle
    pub strata: u32,
    /// Deepest split level a region may reach
    pub max_depth: u32,
    /// Smallest angular step worth refining, in radians.
    /// `None` uses one environment row (`pi / height`). The starting grid
    /// is examined regardless.
    pub min_angle: Option<f32>,
    /// Inset of beam corners from the region edges, in radians
    pub corner_epsilon: f32,
    /// Distance the beam apex is lifted off the surface along the normal
    pub origin_offset: f32,
}

impl Default for BeamSamplerConfig {
    fn default() -> Self {
        Self {
            strata: 2,
            max_depth: 7,
            min_angle: None,
            corner_epsilon: 1.0e-5,
            origin_offset: 0.01,
        }
    }
}

impl BeamSamplerConfig {
    pub fn from_json_str(json: &str) -> SampleResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> SampleResult<()> {
        if self.strata == 0 {
            return Err(SampleError::InvalidConfig("strata must be at least 1".into()));
        }
        if let Some(angle) = self.min_angle {
            if !(angle.is_finite() && angle > 0.0) {
                return Err(SampleError::InvalidConfig(format!(
                    "min_angle must be positive, got {angle}"
                )));
            }
        }
        let octant_step = std::f32::consts::FRAC_PI_2 / self.strata as f32;
        if !(self.corner_epsilon >= 0.0 && self.corner_epsilon * 2.0 < octant_step) {
            return Err(SampleError::InvalidConfig(format!(
                "corner_epsilon {} does not fit in a {octant_step} rad region",
                self.corner_epsilon
            )));
        }
        if !(self.origin_offset.is_finite() && self.origin_offset >= 0.0) {
            return Err(SampleError::InvalidConfig(format!(
                "origin_offset must be non-negative, got {}",
                self.origin_offset
            )));
        }
        Ok(())
    }

    /// Resolve the refinement cutoff for `env`.
    pub fn min_angle_for(&self, env: &EnvironmentMap) -> f32 {
        self.min_angle
            .unwrap_or_else(|| env.mapping().row_angle())
    }
}

/// Configuration for the stratified Monte Carlo reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NaiveSamplerConfig {
    /// Strata along the radial (polar) sample coordinate
    pub theta_samples: u32,
    /// Strata along the azimuth
    pub phi_samples: u32,
    /// Distance shadow rays start off the surface along the normal
    pub origin_offset: f32,
}

impl Default for NaiveSamplerConfig {
    fn default() -> Self {
        Self {
            theta_samples: 16,
            phi_samples: 16,
            origin_offset: 1.0e-5,
        }
    }
}

impl NaiveSamplerConfig {
    pub fn new(theta_samples: u32, phi_samples: u32) -> Self {
        Self {
            theta_samples,
            phi_samples,
            ..Self::default()
        }
    }

    pub fn from_json_str(json: &str) -> SampleResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> SampleResult<()> {
        let empty = self.theta_samples == 0 || self.phi_samples == 0;
        if empty || self.theta_samples.checked_mul(self.phi_samples).is_none() {
            return Err(SampleError::InvalidSampleCount {
                theta: self.theta_samples,
                phi: self.phi_samples,
            });
        }
        if !(self.origin_offset.is_finite() && self.origin_offset >= 0.0) {
            return Err(SampleError::InvalidConfig(format!(
                "origin_offset must be non-negative, got {}",
                self.origin_offset
            )));
        }
        Ok(())
    }

    /// Rays per point. Saturates for configs that would fail `validate`.
    pub fn sample_count(&self) -> u32 {
        self.theta_samples.saturating_mul(self.phi_samples)
    }
}
