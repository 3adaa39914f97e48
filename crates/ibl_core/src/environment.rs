//! Longitude-latitude environment maps.
//!
//! Radiance is stored in linear RGB(A) float format, row-major, with row 0
//! at the +Y pole. The angular layout is the one of
//! [`ibl_math::SphericalMapping`].

use std::f32::consts::{PI, TAU};
use std::path::Path;

use ibl_math::{SphericalMapping, Vec3};
use image::DynamicImage;
use thiserror::Error;

use crate::Color;

/// Errors that can occur while building or loading an environment map.
#[derive(Error, Debug)]
pub enum EnvMapError {
    #[error("Failed to load environment map: {0}")]
    LoadError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Environment map has no texels ({width}x{height})")]
    Empty { width: u32, height: u32 },

    #[error("Pixel buffer holds {actual} texels, expected {expected}")]
    SizeMismatch { expected: usize, actual: usize },
}

pub type EnvMapResult<T> = Result<T, EnvMapError>;

/// A read-only radiance image in longitude-latitude layout.
#[derive(Clone, Debug)]
pub struct EnvironmentMap {
    width: u32,
    height: u32,
    /// [R, G, B, A] per texel; alpha is carried but never read.
    pixels: Vec<[f32; 4]>,
    /// Source file path (for debugging)
    path: String,
}

impl EnvironmentMap {
    /// Create an environment map from raw pixel data.
    pub fn from_pixels(
        width: u32,
        height: u32,
        pixels: Vec<[f32; 4]>,
        path: impl Into<String>,
    ) -> EnvMapResult<Self> {
        if width == 0 || height == 0 {
            return Err(EnvMapError::Empty { width, height });
        }
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(EnvMapError::SizeMismatch {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
            path: path.into(),
        })
    }

    /// A map with the same radiance in every direction.
    pub fn constant(width: u32, height: u32, radiance: Color) -> Self {
        Self::from_fn(width, height, |_, _| radiance)
    }

    /// Build a map by evaluating `radiance(theta, phi)` at every texel centre.
    pub fn from_fn(width: u32, height: u32, radiance: impl Fn(f32, f32) -> Color) -> Self {
        let mapping = SphericalMapping::new(width, height);
        let mut pixels = Vec::with_capacity(width as usize * height as usize);
        for v in 0..height {
            for u in 0..width {
                let (theta, phi) = mapping.texel_center(u, v);
                let c = radiance(theta, phi);
                pixels.push([c.x, c.y, c.z, 1.0]);
            }
        }
        Self {
            width,
            height,
            pixels,
            path: "<procedural>".to_string(),
        }
    }

    /// Load an environment map from an image file.
    ///
    /// Float formats (HDR, EXR) are taken as linear radiance; 8-bit formats
    /// are decoded from sRGB.
    pub fn load(path: impl AsRef<Path>) -> EnvMapResult<Self> {
        let path = path.as_ref();
        let img = image::open(path).map_err(|e| {
            EnvMapError::LoadError(format!("Failed to open {}: {}", path.display(), e))
        })?;
        let (width, height) = (img.width(), img.height());

        let pixels: Vec<[f32; 4]> = match &img {
            DynamicImage::ImageRgb32F(_) | DynamicImage::ImageRgba32F(_) => {
                img.to_rgba32f().pixels().map(|p| p.0).collect()
            }
            _ => img
                .to_rgba8()
                .pixels()
                .map(|p| {
                    [
                        srgb_to_linear(p[0]),
                        srgb_to_linear(p[1]),
                        srgb_to_linear(p[2]),
                        p[3] as f32 / 255.0,
                    ]
                })
                .collect(),
        };

        if width != 2 * height {
            log::warn!(
                "Environment map {} is {}x{}, expected a 2:1 longitude-latitude image",
                path.display(),
                width,
                height
            );
        }

        let map = Self::from_pixels(width, height, pixels, path.to_string_lossy())?;
        log::info!(
            "Loaded environment map: {} ({}x{}, {:.1} KB)",
            map.path,
            map.width,
            map.height,
            map.size_bytes() as f32 / 1024.0
        );
        Ok(map)
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns true if the map has no texels.
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Angle/texel mapping for this map's resolution.
    pub fn mapping(&self) -> SphericalMapping {
        SphericalMapping::new(self.width, self.height)
    }

    /// Radiance stored at texel `(u, v)`.
    #[inline]
    pub fn texel(&self, u: u32, v: u32) -> Color {
        let p = self.pixels[(v * self.width + u) as usize];
        Color::new(p[0], p[1], p[2])
    }

    /// Bilinearly filtered radiance arriving from `direction`.
    ///
    /// Filtering wraps around in azimuth and clamps at the poles.
    pub fn fetch(&self, direction: Vec3) -> Color {
        let (theta, phi) = SphericalMapping::to_angles(direction.normalize_or_zero());

        let x = phi / TAU * self.width as f32 - 0.5;
        let y = theta / PI * self.height as f32 - 0.5;
        let fx = x - x.floor();
        let fy = y - y.floor();

        let w = self.width as i64;
        let h = self.height as i64;
        let u0 = (x.floor() as i64).rem_euclid(w);
        let u1 = (u0 + 1) % w;
        let v0 = (y.floor() as i64).clamp(0, h - 1);
        let v1 = (y.floor() as i64 + 1).clamp(0, h - 1);

        let p00 = self.texel(u0 as u32, v0 as u32);
        let p10 = self.texel(u1 as u32, v0 as u32);
        let p01 = self.texel(u0 as u32, v1 as u32);
        let p11 = self.texel(u1 as u32, v1 as u32);

        let top = p00.lerp(p10, fx);
        let bottom = p01.lerp(p11, fx);
        top.lerp(bottom, fy)
    }

    /// Get total size in bytes (approximate).
    pub fn size_bytes(&self) -> usize {
        self.pixels.len() * std::mem::size_of::<[f32; 4]>()
    }
}

/// Convert sRGB byte value to linear float.
fn srgb_to_linear(value: u8) -> f32 {
    let v = value as f32 / 255.0;
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}
