//! IBL Sampler - outgoing radiance from distant environment light.
//!
//! Two estimators for `(1/pi) * integral of L(w) cos(w, n) dw` over the
//! hemisphere above a shading point, with scene occlusion:
//!
//! - **Beam sweep** ([`sample_ibl_beam`]): walks a quad-tree of angular
//!   regions, asks the scene whether each region's beam is blocked, clear
//!   or mixed, and integrates the environment texels of the clear regions.
//! - **Naive** ([`sample_ibl_naive`]): stratified cosine-weighted Monte
//!   Carlo with one shadow ray per sample. Used as the reference.
//!
//! ```ignore
//! use ibl_sampler::{sample_ibl_beam, BeamSamplerConfig};
//!
//! let mut product = ProductMap::for_environment(&env);
//! let lo = sample_ibl_beam(&bvh, &env, &mut product, p, n, &BeamSamplerConfig::default())?;
//! ```

mod batch;
mod config;
mod contributor;
mod convolver;
mod error;
mod estimate;
mod naive;
mod region;
mod subdivider;

pub use batch::{sample_ibl_beam_batch, sample_ibl_naive_batch, ShadingPoint};
pub use config::{BeamSamplerConfig, NaiveSamplerConfig};
pub use contributor::RadianceContributor;
pub use convolver::integrate;
pub use error::{SampleError, SampleResult};
pub use estimate::sample_ibl_beam;
pub use naive::sample_ibl_naive;
pub use region::HemisphereRegion;
pub use subdivider::{HemisphereSubdivider, SweepStats};

pub use ibl_core::{Color, EnvironmentMap, ProductMap};
pub use ibl_trace::{BeamVisibility, VisibilityOracle};
