//! IBL Core - radiance images for image-based lighting.
//!
//! This crate provides:
//!
//! - **`EnvironmentMap`**: a read-only longitude-latitude radiance image
//!   with texel access and bilinear direction lookups
//! - **`ProductMap`**: the per-texel scratch buffer the beam sampler fills
//!   with cosine-weighted radiance before integrating it
//!
//! # Example
//!
//! ```ignore
//! use ibl_core::{EnvironmentMap, ProductMap};
//!
//! let env = EnvironmentMap::load("sky.hdr")?;
//! let mut product = ProductMap::for_environment(&env);
//! ```

pub mod environment;
pub mod product;

pub use environment::{EnvMapError, EnvMapResult, EnvironmentMap};
pub use product::ProductMap;

use ibl_math::Vec3;

/// Linear RGB radiance.
pub type Color = Vec3;
