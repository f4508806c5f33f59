use indicatif::ProgressBar;
use log::info;

use crate::camera::Camera;
use crate::color::Color;
use crate::geometry::{normalize_or_zero, reflect, Fp, Primitive, Ray, Vec3f, RAY_OFFSET};
use crate::scene::Scene;

/// Color written for any hit in binary mode.
const BINARY_HIT_COLOR: Color = Color::new(0, 255, 0);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderMode {
    Binary,
    Phong,
}

/// Nearest intersection along a ray.
pub(crate) struct Hit<'a> {
    pub(crate) primitive: &'a Primitive,
    pub(crate) point: Vec3f,
    pub(crate) normal: Vec3f,
}

#[derive(Debug)]
pub struct Renderer {
    nbounces: u32,
    mode: RenderMode,
    camera: Camera,
    scene: Scene,
    use_bvh: bool,
}

impl Renderer {
    pub fn new(
        nbounces: u32,
        mode: RenderMode,
        camera: Camera,
        scene: Scene,
        use_bvh: bool,
    ) -> Renderer {
        Renderer {
            nbounces,
            mode,
            camera,
            scene,
            use_bvh,
        }
    }

    pub fn nbounces(&self) -> u32 {
        self.nbounces
    }

    pub fn render_mode(&self) -> RenderMode {
        self.mode
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Renders the full image, row-major. Pixels are independent; the loop
    /// runs them sequentially.
    pub fn render_scene(&self) -> Vec<Vec<Color>> {
        let width = self.camera.width;
        let height = self.camera.height;
        info!(
            "rendering {}x{} pixels (bvh: {})",
            width, height, self.use_bvh
        );

        let progress = ProgressBar::new(height as u64);
        let mut rows = Vec::with_capacity(height as usize);
        for y in 0..height {
            let mut row = Vec::with_capacity(width as usize);
            for x in 0..width {
                let ray = self.camera.generate_ray(x, y);
                row.push(self.render_pixel(&ray, 0));
            }
            rows.push(row);
            progress.inc(1);
        }
        progress.finish_and_clear();
        rows
    }

    /// Shades one ray; `bounce` counts the reflection/refraction recursion
    /// depth already spent.
    pub fn render_pixel(&self, ray: &Ray, bounce: u32) -> Color {
        let Some(hit) = self.nearest_hit(ray) else {
            return Color::from_floats(self.scene.background_color());
        };

        match self.mode {
            RenderMode::Binary => BINARY_HIT_COLOR,
            RenderMode::Phong => self.shade(ray, &hit, bounce),
        }
    }

    /// Nearest positive-t intersection, by linear scan or BVH traversal
    /// depending on configuration. Both paths agree on result semantics.
    pub(crate) fn nearest_hit(&self, ray: &Ray) -> Option<Hit<'_>> {
        let primitives = self.scene.primitives();
        let found = if self.use_bvh {
            self.scene
                .bvh()
                .and_then(|tree| tree.intersect(ray, primitives))
        } else {
            let mut nearest: Option<(Fp, usize)> = None;
            for (index, primitive) in primitives.iter().enumerate() {
                if let Some(t) = primitive.shape.intersect(ray) {
                    if nearest.map_or(true, |(best, _)| t < best) {
                        nearest = Some((t, index));
                    }
                }
            }
            nearest
        };

        found.map(|(t, index)| {
            let primitive = &primitives[index];
            let point = ray.at(t);
            Hit {
                primitive,
                point,
                normal: primitive.shape.normal_at(&point),
            }
        })
    }

    fn shade(&self, ray: &Ray, hit: &Hit, bounce: u32) -> Color {
        let material = &hit.primitive.material;
        let base_color = match &material.texture {
            Some(texture) => {
                let (u, v) = hit.primitive.shape.uv_at(&hit.point);
                texture.color_at(u, v)
            }
            None => Color::from_floats(material.diffuse_color),
        };

        let ambient = base_color * 0.5;
        let mut diffuse = Color::default();
        let mut specular = Color::default();

        let view_dir = -ray.direction();

        for light in self.scene.lights() {
            let to_light = light.position() - hit.point;
            let light_dir = normalize_or_zero(&to_light);
            if self.occluded(&hit.point, &light_dir, to_light.norm()) {
                continue;
            }

            let light_color = {
                let intensity = light.intensity();
                Color::from_floats([intensity.x, intensity.y, intensity.z])
            };
            let half_dir = normalize_or_zero(&(view_dir + light_dir));

            let diff = hit.normal.dot(&light_dir).max(0.0);
            diffuse += Color::from_floats(material.diffuse_color) * diff * material.kd * light_color;

            let spec = hit
                .normal
                .dot(&half_dir)
                .max(0.0)
                .powf(material.specular_exponent);
            specular +=
                Color::from_floats(material.specular_color) * spec * material.ks * light_color;
        }

        let mut pixel_color = ambient + diffuse + specular;

        if material.is_reflective && bounce < self.nbounces {
            let reflect_dir = reflect(&ray.direction(), &hit.normal);
            let reflected_ray = Ray::new(hit.point + reflect_dir * RAY_OFFSET, reflect_dir);
            let reflected_color = self.render_pixel(&reflected_ray, bounce + 1);
            pixel_color = pixel_color * (1.0 - material.reflectivity)
                + reflected_color * material.reflectivity;
        }

        if material.is_refractive && bounce < self.nbounces {
            // Snell's law, with air (index 1.0) as the incident medium.
            // Entering versus exiting is decided by the sign of -N.D.
            let mut eta = 1.0;
            let mut eta_prime = material.refractive_index;
            let mut normal = hit.normal;
            let mut cos_theta_i = -normal.dot(&ray.direction());
            if cos_theta_i < 0.0 {
                cos_theta_i = -cos_theta_i;
                normal = -normal;
                std::mem::swap(&mut eta, &mut eta_prime);
            }

            let eta_ratio = eta / eta_prime;
            let cos_theta_t2 = 1.0 - eta_ratio * eta_ratio * (1.0 - cos_theta_i * cos_theta_i);
            // A non-positive discriminant means total internal reflection:
            // refraction contributes nothing.
            if cos_theta_t2 > 0.0 {
                let refract_dir = normalize_or_zero(
                    &(ray.direction() * eta_ratio
                        + normal * (eta_ratio * cos_theta_i - cos_theta_t2.sqrt())),
                );
                let refracted_ray = Ray::new(hit.point - normal * RAY_OFFSET, refract_dir);
                let refracted_color = self.render_pixel(&refracted_ray, bounce + 1);
                pixel_color = pixel_color * (1.0 - material.reflectivity)
                    + refracted_color * material.reflectivity;
            }
        }

        pixel_color
    }

    /// Whether any shape occludes the segment from `point` toward a light
    /// `light_distance` away along `light_dir`.
    fn occluded(&self, point: &Vec3f, light_dir: &Vec3f, light_distance: Fp) -> bool {
        let shadow_ray = Ray::new(point + light_dir * RAY_OFFSET, *light_dir);
        if self.use_bvh {
            self.scene
                .bvh()
                .and_then(|tree| tree.intersect(&shadow_ray, self.scene.primitives()))
                .map_or(false, |(t, _)| t < light_distance)
        } else {
            self.scene.primitives().iter().any(|primitive| {
                primitive
                    .shape
                    .intersect(&shadow_ray)
                    .map_or(false, |t| t < light_distance)
            })
        }
    }
}

/// Reinhard-style luminance compression. This is an opt-in post-process:
/// `render_scene` never applies it.
pub fn tone_map(color: Color) -> Color {
    let [r, g, b] = color.to_floats();
    let luminance = 0.2126 * r + 0.7152 * g + 0.0722 * b;
    let compressed = luminance / (1.0 + luminance);
    let scale = compressed / if luminance > 0.0 { luminance } else { 1.0 };
    Color::from_floats([r * scale, g * scale, b * scale])
}
