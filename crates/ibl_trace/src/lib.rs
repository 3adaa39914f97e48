//! IBL Trace - occlusion queries for image-based lighting.
//!
//! Answers the two questions the lighting integrators ask of the scene:
//! does a single ray escape to the environment, and does a whole beam of
//! directions escape, get blocked, or only partly get through.

mod beam;
mod bvh;
mod hittable;
mod sphere;
mod triangle;
mod visibility;

pub use beam::{Beam, BeamError};
pub use bvh::BvhNode;
pub use hittable::{HitRecord, Hittable, HittableList};
pub use sphere::Sphere;
pub use triangle::Triangle;
pub use visibility::{BeamVisibility, VisibilityOracle, SHADOW_EPSILON};

/// Re-export Vec3 and common math types from ibl_math
pub use ibl_math::{Aabb, Interval, Ray, Vec3};
