pub mod angle;
pub mod pose;
pub mod scalar;
pub mod step_ctx;
pub mod time;

pub use angle::{heading_dir, wrap_pi, wrap_tau};
pub use pose::Pose2;
pub use scalar::{Scalar, CURVATURE_EPS, GRAVITY};
pub use step_ctx::StepCtx;
pub use time::FixedClock;
