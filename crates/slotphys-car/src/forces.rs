//! Pure force functions. Everything is Newtons, computed from the
//! current state and parameter snapshot; nothing here mutates.

use crate::CarParams;
use slotphys_core::{Scalar, CURVATURE_EPS, GRAVITY};

/// Fixed internal motor resistance (Ω).
pub const MOTOR_RESISTANCE: Scalar = 0.5;

/// Linear magnet-downforce model: Newtons per MGOe.
pub const MAGNET_DOWNFORCE: Scalar = 0.05;

/// DC-motor force through the gearbox, loaded by back-EMF:
///
/// `F(V, v) = (η·N·k_t / (r·R)) · (V − k_e·N·v / r)`
///
/// Force drops linearly as velocity rises; the negative (regenerative
/// braking) region is clamped to zero.
pub fn motor_force(p: &CarParams, velocity: Scalar) -> Scalar {
    let r = p.wheel_radius_m();
    let n = p.gear_ratio;
    let back_emf = p.k_e() * n * velocity / r;
    let f = (p.efficiency() * n * p.k_t() / (r * MOTOR_RESISTANCE)) * (p.voltage - back_emf);
    f.max(0.0)
}

/// Centrifugal tendency at the rear: `m·v²·|c|`. Exactly zero below the
/// straightness epsilon.
pub fn centrifugal_force(p: &CarParams, velocity: Scalar, curvature: Scalar) -> Scalar {
    if curvature.abs() < CURVATURE_EPS {
        return 0.0;
    }
    p.mass_kg() * velocity * velocity * curvature.abs()
}

/// Normal load on the track: weight plus magnet downforce.
#[inline]
pub fn normal_load(p: &CarParams) -> Scalar {
    p.mass_kg() * GRAVITY + p.magnet * MAGNET_DOWNFORCE
}

/// Maximum lateral force the tire/track interface holds before sliding.
#[inline]
pub fn grip_limit(p: &CarParams) -> Scalar {
    p.static_friction * normal_load(p)
}

/// Lateral friction while the rear is sliding.
#[inline]
pub fn sliding_friction(p: &CarParams) -> Scalar {
    p.dynamic_friction * normal_load(p)
}
