//! Piecewise track centerline model.
//!
//! A track is a chain of straight and constant-curvature pieces. The
//! [`PiecewisePath`] maps a global arc-length scalar (wrapping modulo the
//! total length) onto curvature, heading and world position via the
//! closed-form circular-arc integral, so there is no discretization error.

pub mod error;
pub mod path;
pub mod pieces;
pub mod plan;
pub mod segment;

pub use error::TrackError;
pub use path::{PathSample, PiecewisePath};
pub use pieces::{lane_offset, Lane, LANE_SPACING, R1_RADIUS, R2_RADIUS, R3_RADIUS, R4_RADIUS, TRACK_WIDTH};
pub use plan::{PieceSpec, TrackPlan, Turn};
pub use segment::{PathSegment, SegmentKind};
