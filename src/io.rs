use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::warn;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::camera::Camera;
use crate::color::Color;
use crate::geometry::{normalize_or_zero, Fp, Primitive, Shape3D, Vec3f};
use crate::material::{Material, Texture};
use crate::rendering::{RenderMode, Renderer};
use crate::scene::{Light, Scene};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read scene file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed scene description: {0}")]
    Json(#[from] serde_json::Error),
    #[error("missing required field '{0}'")]
    MissingField(&'static str),
    #[error("unknown render mode '{0}' (expected 'binary' or 'phong')")]
    UnknownRenderMode(String),
}

#[derive(Deserialize)]
struct SceneFile {
    #[serde(default)]
    nbounces: u32,
    rendermode: String,
    camera: CameraConfig,
    scene: SceneConfig,
}

#[derive(Deserialize)]
struct CameraConfig {
    width: u32,
    height: u32,
    position: [Fp; 3],
    #[serde(rename = "lookAt")]
    look_at: [Fp; 3],
    #[serde(rename = "upVector")]
    up_vector: [Fp; 3],
    fov: Fp,
    exposure: Fp,
}

#[derive(Deserialize)]
struct SceneConfig {
    backgroundcolor: [Fp; 3],
    #[serde(default)]
    lightsources: Vec<Value>,
    shapes: Vec<Value>,
}

#[derive(Deserialize)]
struct MaterialConfig {
    ks: Fp,
    kd: Fp,
    specularexponent: Fp,
    diffusecolor: [Fp; 3],
    specularcolor: [Fp; 3],
    isreflective: bool,
    reflectivity: Fp,
    isrefractive: bool,
    refractiveindex: Fp,
    #[serde(rename = "hasTexture", default)]
    has_texture: bool,
    #[serde(rename = "textureFilename", default)]
    texture_filename: String,
}

#[derive(Deserialize)]
struct SphereConfig {
    center: [Fp; 3],
    radius: Fp,
    material: Option<MaterialConfig>,
}

#[derive(Deserialize)]
struct CylinderConfig {
    center: [Fp; 3],
    axis: [Fp; 3],
    radius: Fp,
    height: Fp,
    material: Option<MaterialConfig>,
}

#[derive(Deserialize)]
struct TriangleConfig {
    v0: [Fp; 3],
    v1: [Fp; 3],
    v2: [Fp; 3],
    material: Option<MaterialConfig>,
}

#[derive(Deserialize)]
struct PointLightConfig {
    position: [Fp; 3],
    intensity: [Fp; 3],
}

fn vec3(components: [Fp; 3]) -> Vec3f {
    Vec3f::new(components[0], components[1], components[2])
}

/// Loads a renderer from a JSON scene description on disk. Texture
/// filenames resolve relative to the scene file's directory.
pub fn load_renderer(path: &Path, use_bvh: bool) -> Result<Renderer, LoadError> {
    let content = fs::read_to_string(path)?;
    let texture_root = path.parent().unwrap_or_else(|| Path::new("."));
    parse_renderer(&content, texture_root, use_bvh)
}

pub fn parse_renderer(
    content: &str,
    texture_root: &Path,
    use_bvh: bool,
) -> Result<Renderer, LoadError> {
    let file: SceneFile = serde_json::from_str(content)?;
    let mode = parse_render_mode(&file.rendermode)?;

    let camera = Camera {
        width: file.camera.width,
        height: file.camera.height,
        position: vec3(file.camera.position),
        look_at: vec3(file.camera.look_at),
        up_vector: vec3(file.camera.up_vector),
        fov: file.camera.fov,
        exposure: file.camera.exposure,
    };

    let lights = parse_lights(&file.scene.lightsources)?;
    let primitives = parse_shapes(&file.scene.shapes, texture_root)?;
    let scene = Scene::new(file.scene.backgroundcolor, lights, primitives);

    Ok(Renderer::new(file.nbounces, mode, camera, scene, use_bvh))
}

fn parse_render_mode(mode: &str) -> Result<RenderMode, LoadError> {
    match mode {
        "binary" => Ok(RenderMode::Binary),
        "phong" => Ok(RenderMode::Phong),
        other => Err(LoadError::UnknownRenderMode(other.to_string())),
    }
}

/// Entries with an unknown type string are skipped, not an error.
fn parse_shapes(shapes: &[Value], texture_root: &Path) -> Result<Vec<Primitive>, LoadError> {
    let mut primitives = Vec::with_capacity(shapes.len());
    for entry in shapes {
        let kind = entry
            .get("type")
            .and_then(Value::as_str)
            .ok_or(LoadError::MissingField("type"))?;
        let primitive = match kind {
            "sphere" => {
                let config: SphereConfig = serde_json::from_value(entry.clone())?;
                Primitive {
                    shape: Shape3D::Sphere {
                        center: vec3(config.center),
                        radius: config.radius,
                    },
                    material: build_material(config.material, texture_root),
                }
            }
            "cylinder" => {
                let config: CylinderConfig = serde_json::from_value(entry.clone())?;
                Primitive {
                    shape: Shape3D::Cylinder {
                        center: vec3(config.center),
                        axis: normalize_or_zero(&vec3(config.axis)),
                        radius: config.radius,
                        height: config.height,
                    },
                    material: build_material(config.material, texture_root),
                }
            }
            "triangle" => {
                let config: TriangleConfig = serde_json::from_value(entry.clone())?;
                Primitive {
                    shape: Shape3D::Triangle {
                        v0: vec3(config.v0),
                        v1: vec3(config.v1),
                        v2: vec3(config.v2),
                    },
                    material: build_material(config.material, texture_root),
                }
            }
            other => {
                warn!("skipping shape with unknown type '{}'", other);
                continue;
            }
        };
        primitives.push(primitive);
    }
    Ok(primitives)
}

fn parse_lights(lights: &[Value]) -> Result<Vec<Light>, LoadError> {
    let mut parsed = Vec::with_capacity(lights.len());
    for entry in lights {
        let kind = entry
            .get("type")
            .and_then(Value::as_str)
            .ok_or(LoadError::MissingField("type"))?;
        match kind {
            "pointlight" => {
                let config: PointLightConfig = serde_json::from_value(entry.clone())?;
                parsed.push(Light::Point {
                    position: vec3(config.position),
                    intensity: vec3(config.intensity),
                });
            }
            other => warn!("skipping light with unknown type '{}'", other),
        }
    }
    Ok(parsed)
}

/// A failed texture load degrades to an untextured material instead of
/// aborting the render.
fn build_material(config: Option<MaterialConfig>, texture_root: &Path) -> Material {
    let Some(config) = config else {
        return Material::default();
    };

    let texture = if config.has_texture && !config.texture_filename.is_empty() {
        let path = texture_root.join(&config.texture_filename);
        match Texture::load(&path) {
            Ok(texture) => Some(texture),
            Err(error) => {
                warn!("failed to load texture {}: {}", path.display(), error);
                None
            }
        }
    } else {
        None
    };

    Material {
        ks: config.ks,
        kd: config.kd,
        specular_exponent: config.specularexponent,
        diffuse_color: config.diffusecolor,
        specular_color: config.specularcolor,
        is_reflective: config.isreflective,
        reflectivity: config.reflectivity,
        is_refractive: config.isrefractive,
        refractive_index: config.refractiveindex,
        texture,
    }
}

/// Writes the pixel grid as ASCII PPM: `P3` header, dimensions, max channel
/// value, then one image row per line with space-separated components.
pub fn write_ppm(path: &Path, pixels: &[Vec<Color>]) -> std::io::Result<()> {
    let height = pixels.len();
    let width = pixels.first().map_or(0, Vec::len);

    let file = fs::File::create(path)?;
    let mut out = BufWriter::new(file);
    writeln!(out, "P3")?;
    writeln!(out, "{} {}", width, height)?;
    writeln!(out, "255")?;
    for row in pixels {
        let line = row
            .iter()
            .map(|pixel| format!("{} {} {}", pixel.r, pixel.g, pixel.b))
            .collect::<Vec<_>>()
            .join(" ");
        writeln!(out, "{}", line)?;
    }
    out.flush()
}

pub fn write_png(path: &Path, pixels: &[Vec<Color>]) -> Result<(), image::ImageError> {
    let height = pixels.len() as u32;
    let width = pixels.first().map_or(0, Vec::len) as u32;

    let mut bitmap = image::RgbImage::new(width, height);
    for (y, row) in pixels.iter().enumerate() {
        for (x, pixel) in row.iter().enumerate() {
            bitmap.put_pixel(x as u32, y as u32, image::Rgb([pixel.r, pixel.g, pixel.b]));
        }
    }
    bitmap.save_with_format(path, image::ImageFormat::Png)
}
