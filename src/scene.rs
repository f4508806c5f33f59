use std::sync::OnceLock;

use log::debug;

use crate::bvh::BvhNode;
use crate::geometry::{Fp, Primitive, Vec3f};

/// Light source variants. Point lights are the only kind the scene format
/// defines; intensity components are unbounded non-negative values.
#[derive(Clone, Debug)]
pub enum Light {
    Point { position: Vec3f, intensity: Vec3f },
}

impl Light {
    pub fn position(&self) -> Vec3f {
        match self {
            Light::Point { position, .. } => *position,
        }
    }

    pub fn intensity(&self) -> Vec3f {
        match self {
            Light::Point { intensity, .. } => *intensity,
        }
    }
}

/// Immutable scene graph: background color, lights, and the primitive list
/// that both the linear-scan path and the BVH leaves index into.
#[derive(Debug)]
pub struct Scene {
    background_color: [Fp; 3],
    lights: Vec<Light>,
    primitives: Vec<Primitive>,
    bvh: OnceLock<Option<BvhNode>>,
}

impl Scene {
    pub fn new(background_color: [Fp; 3], lights: Vec<Light>, primitives: Vec<Primitive>) -> Scene {
        Scene {
            background_color,
            lights,
            primitives,
            bvh: OnceLock::new(),
        }
    }

    pub fn background_color(&self) -> [Fp; 3] {
        self.background_color
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    /// Build-or-fetch accessor for the acceleration structure. The tree is
    /// built on first use and cached for the scene's lifetime; there is no
    /// invalidation, so the primitive list must not change afterwards.
    /// Returns `None` for an empty scene.
    pub fn bvh(&self) -> Option<&BvhNode> {
        self.bvh
            .get_or_init(|| {
                let tree = BvhNode::build(&self.primitives);
                if tree.is_some() {
                    debug!("built BVH over {} shapes", self.primitives.len());
                }
                tree
            })
            .as_ref()
    }
}
