use crate::Scalar;

/// Per-tick context passed into every integration step.
#[derive(Copy, Clone, Debug)]
pub struct StepCtx {
    /// Fixed timestep (seconds, > 0).
    pub dt: Scalar,
    /// Monotonic tick counter.
    pub tick: u64,
}
