use crate::geometry::{normalize_or_zero, Fp, Ray, Vec3f};

/// Pinhole projection camera. `exposure` is carried from the scene
/// description but takes no part in the shading math.
#[derive(Clone, Debug)]
pub struct Camera {
    pub width: u32,
    pub height: u32,
    pub position: Vec3f,
    pub look_at: Vec3f,
    pub up_vector: Vec3f,
    pub fov: Fp,
    pub exposure: Fp,
}

impl Camera {
    /// Primary ray through the center of pixel (x, y). Out-of-range pixel
    /// coordinates give a geometrically meaningless ray, not an error.
    pub fn generate_ray(&self, x: u32, y: u32) -> Ray {
        let aspect_ratio = self.width as Fp / self.height as Fp;
        let fov_scale = (self.fov.to_radians() * 0.5).tan();

        // NDC mapping: image rows grow downward, world up is positive.
        let px = -(2.0 * (x as Fp + 0.5) / self.width as Fp - 1.0) * aspect_ratio * fov_scale;
        let py = (1.0 - 2.0 * (y as Fp + 0.5) / self.height as Fp) * fov_scale;

        // Orthonormal basis from the (re-orthogonalized) view parameters.
        let forward = normalize_or_zero(&(self.look_at - self.position));
        let right = normalize_or_zero(&forward.cross(&self.up_vector));
        let up = normalize_or_zero(&right.cross(&forward));

        Ray::new(self.position, forward + right * px + up * py)
    }
}
