use crate::Scalar;
use glam::Vec2;
use std::f32::consts::{PI, TAU};

/// Wrap an angle into [0, 2π).
#[inline]
pub fn wrap_tau(a: Scalar) -> Scalar {
    let w = a.rem_euclid(TAU);
    if w >= TAU { 0.0 } else { w }
}

/// Wrap an angle into [-π, π). Useful for pose-difference checks.
#[inline]
pub fn wrap_pi(a: Scalar) -> Scalar {
    wrap_tau(a + PI) - PI
}

/// Unit vector pointing along a heading angle.
#[inline]
pub fn heading_dir(a: Scalar) -> Vec2 {
    Vec2::new(a.cos(), a.sin())
}
