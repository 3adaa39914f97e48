// Re-export glam for convenience
pub use glam::*;

// IBL math types
mod aabb;
mod basis;
mod interval;
mod ray;
mod spherical;

pub use aabb::Aabb;
pub use basis::OrthoBasis;
pub use interval::Interval;
pub use ray::Ray;
pub use spherical::SphericalMapping;
