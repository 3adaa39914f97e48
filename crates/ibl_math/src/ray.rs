use crate::Vec3;

/// A ray in 3D space with an origin and a direction.
///
/// Visibility queries only care about whether anything is hit along the
/// ray, so there is no time or medium attached. The direction does not
/// have to be normalized.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Create a new ray.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Create a ray whose origin is pushed `offset` along `normal`.
    ///
    /// Used to leave a surface without hitting it again.
    pub fn offset_from(point: Vec3, normal: Vec3, offset: f32, direction: Vec3) -> Self {
        Self::new(point + normal * offset, direction)
    }

    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

impl Default for Ray {
    fn default() -> Self {
        Self {
            origin: Vec3::ZERO,
            direction: Vec3::Y,
        }
    }
}
