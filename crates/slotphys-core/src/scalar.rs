/// Simulation-wide scalar type.
pub type Scalar = f32;

/// Standard gravity (m/s^2).
pub const GRAVITY: Scalar = 9.81;

/// Curvature magnitudes below this count as exactly straight (rad/m).
pub const CURVATURE_EPS: Scalar = 1e-4;
