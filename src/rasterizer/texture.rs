//! Textures and the per-material texture set

use std::path::Path;

use log::{info, warn};

use super::math::Vec2;
use super::types::{Color, ColorRGB};
use crate::error::Result;

/// Decoded image (row-major array of colors)
#[derive(Debug, Clone)]
pub struct Texture {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<Color>,
    pub name: String,
}

impl Texture {
    /// Single-color texture
    pub fn solid(width: usize, height: usize, color: Color) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; width * height],
            name: String::new(),
        }
    }

    pub fn from_pixels(width: usize, height: usize, pixels: Vec<Color>, name: String) -> Self {
        debug_assert_eq!(pixels.len(), width * height);
        Self { width, height, pixels, name }
    }

    /// Load texture from an image file (PNG, JPEG or BMP)
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let img = image::open(path)?;

        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();

        let tex = Self::from_image(img, name);
        info!("Loaded texture: {} ({}x{})", tex.name, tex.width, tex.height);
        Ok(tex)
    }

    /// Load texture from raw encoded bytes
    pub fn from_bytes(bytes: &[u8], name: String) -> Result<Self> {
        let img = image::load_from_memory(bytes)?;
        Ok(Self::from_image(img, name))
    }

    fn from_image(img: image::DynamicImage, name: String) -> Self {
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();

        let pixels: Vec<Color> = rgba
            .pixels()
            .map(|p| Color::with_alpha(p[0], p[1], p[2], p[3]))
            .collect();

        Self {
            width: width as usize,
            height: height as usize,
            pixels,
            name,
        }
    }

    /// Sample at UV coordinates, clamped to [0, 1] (nearest texel, no filtering)
    pub fn sample(&self, uv: Vec2) -> ColorRGB {
        if self.pixels.is_empty() {
            return ColorRGB::BLACK;
        }
        let u = uv.x.clamp(0.0, 1.0);
        let v = uv.y.clamp(0.0, 1.0);
        let tx = ((u * self.width as f32) as usize).min(self.width - 1);
        let ty = ((v * self.height as f32) as usize).min(self.height - 1);
        self.pixels[ty * self.width + tx].into()
    }
}

/// Surface textures used by the pixel shader; any of them may be absent
#[derive(Debug, Clone, Default)]
pub struct Materials {
    pub diffuse: Option<Texture>,
    pub normal: Option<Texture>,
    pub gloss: Option<Texture>,
    pub specular: Option<Texture>,
}

impl Materials {
    /// Load whichever of the four texture paths are given. A file that
    /// fails to load is logged and left out.
    pub fn load(
        diffuse: Option<&Path>,
        normal: Option<&Path>,
        gloss: Option<&Path>,
        specular: Option<&Path>,
    ) -> Self {
        let load = |path: Option<&Path>| {
            let path = path?;
            match Texture::from_file(path) {
                Ok(tex) => Some(tex),
                Err(e) => {
                    warn!("Failed to load {}: {}", path.display(), e);
                    None
                }
            }
        };
        Self {
            diffuse: load(diffuse),
            normal: load(normal),
            gloss: load(gloss),
            specular: load(specular),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_by_two() -> Texture {
        Texture::from_pixels(
            2,
            2,
            vec![Color::BLACK, Color::new(255, 255, 255), Color::new(255, 0, 0), Color::new(0, 0, 255)],
            "quad".to_string(),
        )
    }

    #[test]
    fn test_sample_corners() {
        let tex = two_by_two();
        assert_eq!(tex.sample(Vec2::new(0.0, 0.0)), ColorRGB::BLACK);
        assert_eq!(tex.sample(Vec2::new(0.9, 0.1)), ColorRGB::WHITE);
        assert_eq!(tex.sample(Vec2::new(0.1, 0.9)), ColorRGB::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_sample_clamps_out_of_range() {
        let tex = two_by_two();
        assert_eq!(tex.sample(Vec2::new(1.0, 1.0)), ColorRGB::new(0.0, 0.0, 1.0));
        assert_eq!(tex.sample(Vec2::new(5.0, -3.0)), ColorRGB::WHITE);
    }

    #[test]
    fn test_from_bytes_rejects_garbage() {
        assert!(Texture::from_bytes(&[0, 1, 2, 3], "junk".to_string()).is_err());
    }

    #[test]
    fn test_missing_files_are_skipped() {
        let m = Materials::load(Some(Path::new("does/not/exist.png")), None, None, None);
        assert!(m.diffuse.is_none());
    }
}
