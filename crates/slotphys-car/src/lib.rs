//! Slot car dynamics.
//!
//! A car is pinned to a [`slotphys_track::PiecewisePath`] by its guide
//! pin and advanced with a fixed-timestep integrator: DC-motor force
//! against back-EMF, a lateral grip/slide threshold that feeds a slip
//! angle, and a one-way Driving → Derailed state machine.

pub mod dynamics;
pub mod forces;
pub mod params;
pub mod state;

pub use dynamics::{CarDynamics, Tuning};
pub use params::{CarParams, ParamError};
pub use state::{CarState, DriveState};
