use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::aabb::Aabb;
use crate::geometry::{Fp, Primitive, Ray};

/// Seed for the per-node split-axis draws. A fixed seed makes tree
/// construction deterministic for a given shape list.
const SPLIT_AXIS_SEED: u64 = 0x9e37_79b9_7f4a_7c15;

/// Binary tree over shape indices. Leaves reference primitives in the
/// scene's list and never own shape data; the tree is built once and never
/// mutated.
#[derive(Debug)]
pub enum BvhNode {
    Leaf {
        aabb: Aabb,
        shape: usize,
    },
    Inner {
        aabb: Aabb,
        left: Box<BvhNode>,
        right: Box<BvhNode>,
    },
}

impl BvhNode {
    /// Recursive top-down construction: sort the range by bounding-box
    /// minimum along a randomly chosen axis and split at the midpoint.
    pub fn build(primitives: &[Primitive]) -> Option<BvhNode> {
        if primitives.is_empty() {
            return None;
        }
        let boxes: Vec<Aabb> = primitives.iter().map(|p| p.shape.bounding_box()).collect();
        let mut indices: Vec<usize> = (0..primitives.len()).collect();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(SPLIT_AXIS_SEED);
        Some(build_node(&boxes, &mut indices, &mut rng))
    }

    pub fn aabb(&self) -> &Aabb {
        match self {
            BvhNode::Leaf { aabb, .. } => aabb,
            BvhNode::Inner { aabb, .. } => aabb,
        }
    }

    /// Nearest hit below this node: prune on the node box, then query both
    /// children and keep the smaller valid `t`.
    pub fn intersect(&self, ray: &Ray, primitives: &[Primitive]) -> Option<(Fp, usize)> {
        if !self.aabb().intersect(ray) {
            return None;
        }
        match self {
            BvhNode::Leaf { shape, .. } => {
                primitives[*shape].shape.intersect(ray).map(|t| (t, *shape))
            }
            BvhNode::Inner { left, right, .. } => {
                match (
                    left.intersect(ray, primitives),
                    right.intersect(ray, primitives),
                ) {
                    (Some(l), Some(r)) => Some(if l.0 < r.0 { l } else { r }),
                    (Some(l), None) => Some(l),
                    (None, Some(r)) => Some(r),
                    (None, None) => None,
                }
            }
        }
    }
}

fn build_node(boxes: &[Aabb], indices: &mut [usize], rng: &mut Xoshiro256PlusPlus) -> BvhNode {
    let axis = rng.gen_range(0..3usize);

    if let [shape] = *indices {
        return BvhNode::Leaf {
            aabb: boxes[shape].clone(),
            shape,
        };
    }

    if indices.len() == 2 {
        if boxes[indices[1]].min[axis] < boxes[indices[0]].min[axis] {
            indices.swap(0, 1);
        }
    } else {
        indices.sort_by(|a, b| boxes[*a].min[axis].total_cmp(&boxes[*b].min[axis]));
    }

    let mid = indices.len() / 2;
    let (left_half, right_half) = indices.split_at_mut(mid);
    let left = build_node(boxes, left_half, rng);
    let right = build_node(boxes, right_half, rng);
    let aabb = Aabb::surrounding_box(left.aabb(), right.aabb());
    BvhNode::Inner {
        aabb,
        left: Box::new(left),
        right: Box::new(right),
    }
}
