use crate::geometry::{Fp, Ray, Vec3f, EPS};

/// Axis-aligned bounding box, used only for traversal pruning.
#[derive(Clone, Debug, Default)]
pub struct Aabb {
    pub min: Vec3f,
    pub max: Vec3f,
}

impl Aabb {
    pub fn new(min: Vec3f, max: Vec3f) -> Aabb {
        Aabb { min, max }
    }

    /// Slab test. Near-axis-parallel rays must already lie inside the slab
    /// on that axis; a box entirely behind the origin is a miss.
    pub fn intersect(&self, ray: &Ray) -> bool {
        let origin = ray.origin();
        let direction = ray.direction();

        let mut tmin = Fp::NEG_INFINITY;
        let mut tmax = Fp::INFINITY;

        for axis in 0..3 {
            if direction[axis].abs() < EPS {
                if origin[axis] < self.min[axis] || origin[axis] > self.max[axis] {
                    return false;
                }
                continue;
            }

            let inv_d = 1.0 / direction[axis];
            let mut t0 = (self.min[axis] - origin[axis]) * inv_d;
            let mut t1 = (self.max[axis] - origin[axis]) * inv_d;
            if inv_d < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }

            tmin = tmin.max(t0);
            tmax = tmax.min(t1);
            if tmax <= tmin + EPS {
                return false;
            }
        }

        tmax >= 0.0
    }

    /// Component-wise min/max union of two boxes.
    pub fn surrounding_box(a: &Aabb, b: &Aabb) -> Aabb {
        Aabb {
            min: a.min.inf(&b.min),
            max: a.max.sup(&b.max),
        }
    }
}
