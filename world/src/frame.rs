//! Explicit transform hierarchy used to place the maze in world space.

use glam::{Affine3A, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Local-to-parent transform with an optional parent frame.
///
/// World transforms are recomputed from the chain on demand instead of being
/// cached, so editing any frame in the chain is immediately reflected.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Frame {
    translation: Vec3,
    rotation: Quat,
    scale: Vec3,
    parent: Option<Box<Frame>>,
}

impl Default for Frame {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Frame {
    /// Frame that leaves points untouched.
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
        parent: None,
    };

    /// Creates a root frame from explicit components.
    #[must_use]
    pub const fn new(translation: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            translation,
            rotation,
            scale,
            parent: None,
        }
    }

    /// Creates a root frame that only translates.
    #[must_use]
    pub const fn from_translation(translation: Vec3) -> Self {
        Self::new(translation, Quat::IDENTITY, Vec3::ONE)
    }

    /// Attaches this frame beneath `parent`.
    #[must_use]
    pub fn with_parent(mut self, parent: Frame) -> Self {
        self.parent = Some(Box::new(parent));
        self
    }

    /// Translation relative to the parent.
    #[must_use]
    pub const fn translation(&self) -> Vec3 {
        self.translation
    }

    /// Rotation relative to the parent.
    #[must_use]
    pub const fn rotation(&self) -> Quat {
        self.rotation
    }

    /// Scale relative to the parent.
    #[must_use]
    pub const fn scale(&self) -> Vec3 {
        self.scale
    }

    /// Parent frame, if any.
    #[must_use]
    pub fn parent(&self) -> Option<&Frame> {
        self.parent.as_deref()
    }

    /// Local-to-parent affine transform.
    #[must_use]
    pub fn local(&self) -> Affine3A {
        Affine3A::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }

    /// Local-to-world affine transform composed through every ancestor.
    #[must_use]
    pub fn to_world(&self) -> Affine3A {
        match &self.parent {
            Some(parent) => parent.to_world() * self.local(),
            None => self.local(),
        }
    }

    /// Maps a point expressed in this frame into world space.
    #[must_use]
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.to_world().transform_point3(point)
    }

    /// Rotation of this frame relative to world space.
    #[must_use]
    pub fn world_rotation(&self) -> Quat {
        match &self.parent {
            Some(parent) => parent.world_rotation() * self.rotation,
            None => self.rotation,
        }
    }
}
