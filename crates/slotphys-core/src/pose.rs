use crate::{heading_dir, Scalar};
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Planar pose: world position plus heading angle.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Pose2 {
    pub pos: Vec2,
    pub heading: Scalar,
}

impl Pose2 {
    #[inline]
    pub fn new(x: Scalar, y: Scalar, heading: Scalar) -> Self {
        Self { pos: Vec2::new(x, y), heading }
    }

    /// Point offset perpendicular to the heading (positive = left).
    #[inline]
    pub fn offset_left(&self, dist: Scalar) -> Vec2 {
        let d = heading_dir(self.heading);
        self.pos + Vec2::new(-d.y, d.x) * dist
    }
}
