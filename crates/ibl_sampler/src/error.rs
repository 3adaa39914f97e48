//! Errors reported by the IBL estimators.

use ibl_math::Vec3;
use ibl_trace::BeamError;
use thiserror::Error;

/// Precondition failures at the estimator entry points.
#[derive(Error, Debug)]
pub enum SampleError {
    #[error("Shading normal must be finite and non-zero, got {0}")]
    InvalidNormal(Vec3),

    #[error("Shading point must be finite, got {0}")]
    InvalidOrigin(Vec3),

    #[error("Sample counts must be positive, got {theta}x{phi}")]
    InvalidSampleCount { theta: u32, phi: u32 },

    #[error("Environment map is empty")]
    EmptyEnvironment,

    #[error(
        "Product map is {product_width}x{product_height}, environment is {env_width}x{env_height}"
    )]
    ProductMapMismatch {
        product_width: u32,
        product_height: u32,
        env_width: u32,
        env_height: u32,
    },

    #[error("Invalid sampler configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to parse sampler configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("Degenerate beam: {0}")]
    Beam(#[from] BeamError),
}

pub type SampleResult<T> = Result<T, SampleError>;

/// Check a shading point and return its unit normal.
pub(crate) fn validate_shading_point(origin: Vec3, normal: Vec3) -> SampleResult<Vec3> {
    if !origin.is_finite() {
        return Err(SampleError::InvalidOrigin(origin));
    }
    if !normal.is_finite() {
        return Err(SampleError::InvalidNormal(normal));
    }
    normal
        .try_normalize()
        .ok_or(SampleError::InvalidNormal(normal))
}
