//! Per-texel product buffer filled during a beam sweep.

use std::path::Path;

use crate::{Color, EnvMapResult, EnvironmentMap};

/// Scratch buffer holding `radiance * cos * solid-angle weight` per texel.
///
/// Same resolution and layout as the [`EnvironmentMap`] it is paired with,
/// four channels per texel with the fourth left at zero. The sampler
/// overwrites texels and never clears the buffer itself: call
/// [`ProductMap::clear`] before every sweep.
#[derive(Clone, Debug)]
pub struct ProductMap {
    width: u32,
    height: u32,
    texels: Vec<[f32; 4]>,
}

impl ProductMap {
    /// Create a zeroed buffer.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            texels: vec![[0.0; 4]; width as usize * height as usize],
        }
    }

    /// Create a zeroed buffer matching `env`'s resolution.
    pub fn for_environment(env: &EnvironmentMap) -> Self {
        Self::new(env.width(), env.height())
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns true if this buffer can be paired with `env`.
    pub fn matches(&self, env: &EnvironmentMap) -> bool {
        self.width == env.width() && self.height == env.height()
    }

    /// Reset every texel to zero.
    pub fn clear(&mut self) {
        self.texels.fill([0.0; 4]);
    }

    #[inline]
    pub fn get(&self, u: u32, v: u32) -> Color {
        let t = self.texels[self.index(u, v)];
        Color::new(t[0], t[1], t[2])
    }

    /// Overwrite the RGB channels of texel `(u, v)`.
    #[inline]
    pub fn set(&mut self, u: u32, v: u32, value: Color) {
        let i = self.index(u, v);
        let t = &mut self.texels[i];
        t[0] = value.x;
        t[1] = value.y;
        t[2] = value.z;
    }

    pub fn texels(&self) -> &[[f32; 4]] {
        &self.texels
    }

    /// Texels as a flat `[r, g, b, pad, r, g, b, pad, ...]` slice.
    pub fn as_flat(&self) -> &[f32] {
        bytemuck::cast_slice(&self.texels)
    }

    /// Write the buffer to an 8-bit image, scaled so the brightest channel
    /// maps to white. Debugging aid for inspecting which texels a sweep
    /// reached.
    pub fn save_debug_image(&self, path: impl AsRef<Path>) -> EnvMapResult<()> {
        let peak = self
            .as_flat()
            .iter()
            .copied()
            .fold(0.0f32, f32::max)
            .max(f32::MIN_POSITIVE);

        let img = image::RgbaImage::from_fn(self.width, self.height, |u, v| {
            let c = self.get(u, v) / peak;
            let to_byte = |x: f32| (x.clamp(0.0, 1.0) * 255.0) as u8;
            image::Rgba([to_byte(c.x), to_byte(c.y), to_byte(c.z), 255])
        });
        img.save(path.as_ref())?;

        log::debug!(
            "Saved product map {}x{} to {} (peak {:.4})",
            self.width,
            self.height,
            path.as_ref().display(),
            peak
        );
        Ok(())
    }

    #[inline]
    fn index(&self, u: u32, v: u32) -> usize {
        (v * self.width + u) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_zeroed() {
        let product = ProductMap::new(8, 4);

        assert_eq!(product.texels().len(), 32);
        assert!(product.as_flat().iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_set_overwrites_rgb_only() {
        let mut product = ProductMap::new(4, 2);
        product.set(3, 1, Color::new(1.0, 2.0, 3.0));
        product.set(3, 1, Color::new(0.5, 0.5, 0.5));

        assert_eq!(product.get(3, 1), Color::splat(0.5));
        assert_eq!(product.texels()[7], [0.5, 0.5, 0.5, 0.0]);
    }

    #[test]
    fn test_flat_layout_has_four_channels() {
        let mut product = ProductMap::new(2, 1);
        product.set(1, 0, Color::new(4.0, 5.0, 6.0));

        assert_eq!(product.as_flat(), &[0.0, 0.0, 0.0, 0.0, 4.0, 5.0, 6.0, 0.0]);
    }

    #[test]
    fn test_clear_and_matches() {
        let env = EnvironmentMap::constant(8, 4, Color::ONE);
        let mut product = ProductMap::for_environment(&env);
        assert!(product.matches(&env));
        assert!(!ProductMap::new(4, 4).matches(&env));

        product.set(0, 0, Color::ONE);
        product.clear();
        assert_eq!(product.get(0, 0), Color::ZERO);
    }

    #[test]
    fn test_debug_image_reloads_as_environment() {
        let mut product = ProductMap::new(8, 4);
        product.set(2, 1, Color::new(4.0, 2.0, 0.0));
        product.set(5, 3, Color::splat(1.0));

        let path = std::env::temp_dir().join("ibl_core_product_debug_image.png");
        product.save_debug_image(&path).unwrap();
        let loaded = EnvironmentMap::load(&path);
        let _ = std::fs::remove_file(&path);
        let loaded = loaded.unwrap();

        assert_eq!((loaded.width(), loaded.height()), (8, 4));
        // Peak channel maps to white, zero stays black.
        let peak = loaded.texel(2, 1);
        assert!((peak.x - 1.0).abs() < 1e-3);
        assert!(peak.y > 0.0 && peak.y < peak.x);
        assert_eq!(peak.z, 0.0);
        assert_eq!(loaded.texel(0, 0), Color::ZERO);
        assert!(loaded.texel(5, 3).x > 0.0);
    }
}
