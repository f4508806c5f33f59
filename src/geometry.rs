use arrayvec::ArrayVec;
use na::Vector3;

use crate::aabb::Aabb;
use crate::material::Material;

pub type Fp = f32;
pub type Vec3f = Vector3<Fp>;

/// Threshold below which a direction component or determinant is treated as
/// parallel / degenerate.
pub const EPS: Fp = 1e-6;
/// Offset applied to secondary-ray origins to avoid self-intersection.
pub const RAY_OFFSET: Fp = 1e-4;

/// Normalization that leaves the zero vector unchanged.
pub fn normalize_or_zero(v: &Vec3f) -> Vec3f {
    let len = v.norm();
    if len > 0.0 {
        v / len
    } else {
        *v
    }
}

/// Mirror reflection of `direction` about `normal`.
pub fn reflect(direction: &Vec3f, normal: &Vec3f) -> Vec3f {
    direction - normal * (2.0 * direction.dot(normal))
}

#[derive(Clone, Debug)]
pub struct Ray {
    origin: Vec3f,
    direction: Vec3f,
}

impl Ray {
    /// The direction is normalized here and never mutated afterwards.
    pub fn new(origin: Vec3f, direction: Vec3f) -> Ray {
        Ray {
            origin,
            direction: normalize_or_zero(&direction),
        }
    }

    pub fn origin(&self) -> Vec3f {
        self.origin
    }

    pub fn direction(&self) -> Vec3f {
        self.direction
    }

    pub fn at(&self, t: Fp) -> Vec3f {
        self.origin + self.direction * t
    }
}

/// Surface variants. The set is closed, so dispatch is a plain match.
///
/// Cylinder `height` is the half-extent: the lateral surface spans axial
/// offsets in [-height, height] from `center` and the caps sit at
/// `center ± axis * height`. `axis` must be unit length.
#[derive(Clone, Copy, Debug)]
pub enum Shape3D {
    Sphere {
        center: Vec3f,
        radius: Fp,
    },
    Cylinder {
        center: Vec3f,
        axis: Vec3f,
        radius: Fp,
        height: Fp,
    },
    Triangle {
        v0: Vec3f,
        v1: Vec3f,
        v2: Vec3f,
    },
}

impl Shape3D {
    /// Smallest positive ray parameter of a valid hit, if any.
    pub fn intersect(&self, ray: &Ray) -> Option<Fp> {
        match *self {
            Shape3D::Sphere { center, radius } => {
                let oc = ray.origin() - center;
                let a = ray.direction().dot(&ray.direction());
                let b = 2.0 * oc.dot(&ray.direction());
                let c = oc.dot(&oc) - radius * radius;
                let discriminant = b * b - 4.0 * a * c;
                if discriminant < 0.0 {
                    return None;
                }
                let sqrt_discriminant = discriminant.sqrt();
                let t0 = (-b - sqrt_discriminant) / (2.0 * a);
                let t1 = (-b + sqrt_discriminant) / (2.0 * a);
                if t0 > 0.0 {
                    Some(t0)
                } else if t1 > 0.0 {
                    Some(t1)
                } else {
                    // both roots behind the origin
                    None
                }
            }
            Shape3D::Cylinder {
                center,
                axis,
                radius,
                height,
            } => {
                let mut candidates = ArrayVec::<Fp, 3>::new();

                // Lateral surface: quadratic in the plane orthogonal to the axis.
                let oc = ray.origin() - center;
                let d_proj = ray.direction() - axis * ray.direction().dot(&axis);
                let oc_proj = oc - axis * oc.dot(&axis);
                let a = d_proj.dot(&d_proj);
                if a > EPS {
                    let b = 2.0 * d_proj.dot(&oc_proj);
                    let c = oc_proj.dot(&oc_proj) - radius * radius;
                    let discriminant = b * b - 4.0 * a * c;
                    if discriminant >= 0.0 {
                        let sqrt_discriminant = discriminant.sqrt();
                        let t0 = (-b - sqrt_discriminant) / (2.0 * a);
                        let t1 = (-b + sqrt_discriminant) / (2.0 * a);
                        let t_lateral = if t0 > 0.0 {
                            Some(t0)
                        } else if t1 > 0.0 {
                            Some(t1)
                        } else {
                            None
                        };
                        if let Some(t) = t_lateral {
                            let axial = (ray.at(t) - center).dot(&axis);
                            if (-height..=height).contains(&axial) {
                                candidates.push(t);
                            }
                        }
                    }
                }

                // Disk caps.
                let denom = axis.dot(&ray.direction());
                if denom.abs() > EPS {
                    for cap_center in [center + axis * height, center - axis * height] {
                        let t = axis.dot(&(cap_center - ray.origin())) / denom;
                        if t > 0.0 && (ray.at(t) - cap_center).norm() <= radius {
                            candidates.push(t);
                        }
                    }
                }

                candidates.into_iter().min_by(Fp::total_cmp)
            }
            Shape3D::Triangle { v0, v1, v2 } => {
                // Moeller-Trumbore
                let edge1 = v1 - v0;
                let edge2 = v2 - v0;
                let h = ray.direction().cross(&edge2);
                let a = edge1.dot(&h);
                if a.abs() < EPS {
                    return None;
                }
                let f = 1.0 / a;
                let s = ray.origin() - v0;
                let u = f * s.dot(&h);
                if !(0.0..=1.0).contains(&u) {
                    return None;
                }
                let q = s.cross(&edge1);
                let v = f * ray.direction().dot(&q);
                if v < 0.0 || u + v > 1.0 {
                    return None;
                }
                let t = f * edge2.dot(&q);
                if t > EPS {
                    Some(t)
                } else {
                    None
                }
            }
        }
    }

    /// Outward unit normal at a surface point. Not flipped for rays exiting
    /// versus entering the surface.
    pub fn normal_at(&self, point: &Vec3f) -> Vec3f {
        match *self {
            Shape3D::Sphere { center, .. } => normalize_or_zero(&(point - center)),
            Shape3D::Cylinder {
                center,
                axis,
                height,
                ..
            } => {
                let axial = (point - center).dot(&axis);
                if (axial - height).abs() < EPS {
                    axis
                } else if (axial + height).abs() < EPS {
                    -axis
                } else {
                    let cp = point - center;
                    normalize_or_zero(&(cp - axis * cp.dot(&axis)))
                }
            }
            Shape3D::Triangle { v0, v1, v2 } => normalize_or_zero(&(v1 - v0).cross(&(v2 - v0))),
        }
    }

    /// UV parameterization at a surface point, used for texture lookup.
    pub fn uv_at(&self, point: &Vec3f) -> (Fp, Fp) {
        use std::f32::consts::PI;
        match *self {
            Shape3D::Sphere { center, .. } => {
                let dir = normalize_or_zero(&(point - center));
                let u = 0.5 + dir.z.atan2(dir.x) / (2.0 * PI);
                let v = 0.5 - dir.y.asin() / PI;
                (u, v)
            }
            Shape3D::Cylinder {
                center,
                axis,
                height,
                ..
            } => {
                let dir = point - center;
                let u = 0.5 + dir.z.atan2(dir.x) / (2.0 * PI);
                let v = (dir.dot(&axis) + height) / (2.0 * height);
                (u, v)
            }
            Shape3D::Triangle { v0, v1, v2 } => {
                // Barycentric projection onto the edge basis.
                let edge1 = v1 - v0;
                let edge2 = v2 - v0;
                let p = point - v0;
                let d00 = edge1.dot(&edge1);
                let d01 = edge1.dot(&edge2);
                let d11 = edge2.dot(&edge2);
                let d20 = p.dot(&edge1);
                let d21 = p.dot(&edge2);
                let denom = d00 * d11 - d01 * d01;
                let v = (d11 * d20 - d01 * d21) / denom;
                let u = (d00 * d21 - d01 * d20) / denom;
                (u, v)
            }
        }
    }

    /// Tight axis-aligned bounding box; planar shapes are padded so the box
    /// never has a zero-thickness slab.
    pub fn bounding_box(&self) -> Aabb {
        match *self {
            Shape3D::Sphere { center, radius } => Aabb::new(
                center - Vec3f::repeat(radius),
                center + Vec3f::repeat(radius),
            ),
            Shape3D::Cylinder {
                center,
                axis,
                radius,
                height,
            } => {
                let top = center + axis * height;
                let bottom = center - axis * height;
                Aabb::new(
                    top.inf(&bottom) - Vec3f::repeat(radius),
                    top.sup(&bottom) + Vec3f::repeat(radius),
                )
            }
            Shape3D::Triangle { v0, v1, v2 } => {
                let pad = Vec3f::repeat(RAY_OFFSET);
                Aabb::new(v0.inf(&v1).inf(&v2) - pad, v0.sup(&v1).sup(&v2) + pad)
            }
        }
    }
}

/// A shape together with its surface material. Scene and BVH leaves address
/// primitives by index into the scene's list.
#[derive(Clone, Debug)]
pub struct Primitive {
    pub shape: Shape3D,
    pub material: Material,
}
