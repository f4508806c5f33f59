use std::path::Path;

use crate::color::Color;
use crate::geometry::Fp;

/// Texture bitmap sampled by normalized UV coordinates.
#[derive(Clone, Debug)]
pub struct Texture {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl Texture {
    pub fn new(width: u32, height: u32, pixels: Vec<Color>) -> Texture {
        Texture {
            width,
            height,
            pixels,
        }
    }

    pub fn load(path: &Path) -> Result<Texture, image::ImageError> {
        let bitmap = image::open(path)?.into_rgb8();
        let (width, height) = bitmap.dimensions();
        let pixels = bitmap
            .pixels()
            .map(|p| Color::new(p.0[0], p.0[1], p.0[2]))
            .collect();
        Ok(Texture::new(width, height, pixels))
    }

    /// Nearest-pixel lookup with wrap-around addressing.
    pub fn color_at(&self, u: Fp, v: Fp) -> Color {
        let u = u - u.floor();
        let v = v - v.floor();
        let x = (u * (self.width - 1) as Fp) as u32;
        let y = (v * (self.height - 1) as Fp) as u32;
        self.pixels[(y * self.width + x) as usize]
    }
}

/// Surface reflectance parameters. Color components are normalized floats
/// in [0, 1]; a present texture supersedes `diffuse_color` for base-color
/// lookups.
#[derive(Clone, Debug)]
pub struct Material {
    pub ks: Fp,
    pub kd: Fp,
    pub specular_exponent: Fp,
    pub diffuse_color: [Fp; 3],
    pub specular_color: [Fp; 3],
    pub is_reflective: bool,
    pub reflectivity: Fp,
    pub is_refractive: bool,
    pub refractive_index: Fp,
    pub texture: Option<Texture>,
}

impl Default for Material {
    fn default() -> Material {
        Material {
            ks: 0.0,
            kd: 0.0,
            specular_exponent: 0.0,
            diffuse_color: [0.0; 3],
            specular_color: [0.0; 3],
            is_reflective: false,
            reflectivity: 0.0,
            is_refractive: false,
            refractive_index: 1.0,
            texture: None,
        }
    }
}
