use glam::Vec2;
use slotphys_core::Scalar;
use slotphys_track::PathSample;

/// Driving/derailed state machine. Derailed is terminal for the run;
/// there is no transition back.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum DriveState {
    Driving,
    /// The heading frozen at the moment of derailment drives the
    /// ballistic drift; the body keeps spinning separately.
    Derailed { escape_heading: Scalar },
}

impl DriveState {
    #[inline]
    pub fn is_derailed(&self) -> bool {
        matches!(self, DriveState::Derailed { .. })
    }
}

/// Mutable per-car physics state. Owned by exactly one car; mutated
/// only by [`crate::CarDynamics::step`].
#[derive(Copy, Clone, Debug)]
pub struct CarState {
    /// Arc-length position along the lane centerline (m). Monotonically
    /// non-decreasing while driving.
    pub s: Scalar,
    /// Scalar velocity (m/s), never negative.
    pub v: Scalar,
    /// Signed slip angle between body heading and track tangent (rad).
    pub slip: Scalar,
    /// World position of the car body (between rear axle and guide pin).
    pub position: Vec2,
    /// Body heading (rad).
    pub heading: Scalar,
    pub drive: DriveState,
}

impl CarState {
    /// At rest on the slot, at the given path sample.
    pub fn spawn(sample: &PathSample) -> Self {
        Self {
            s: 0.0,
            v: 0.0,
            slip: 0.0,
            position: sample.position,
            heading: sample.heading,
            drive: DriveState::Driving,
        }
    }
}
