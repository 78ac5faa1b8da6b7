//! Scalextric-style track piece geometry.
//!
//! Dimensions are meters. Each piece carries two lanes; lane paths are
//! offset curves of the piece reference line, which runs along the
//! outer edge of the piece.

use serde::{Deserialize, Serialize};
use slotphys_core::Scalar;

/// Center-to-center distance between the two lanes.
pub const LANE_SPACING: Scalar = 0.078;
/// Rail center-to-center distance within one lane.
pub const RAIL_SPACING: Scalar = 0.010;
/// Guide slot width.
pub const SLOT_WIDTH: Scalar = 0.003;
/// Total width of a track piece.
pub const TRACK_WIDTH: Scalar = 0.155;

/// Outer radii of the standard curve families.
pub const R1_RADIUS: Scalar = 0.214;
pub const R2_RADIUS: Scalar = 0.370;
pub const R3_RADIUS: Scalar = 0.526;
pub const R4_RADIUS: Scalar = 0.682;

/// Which of the two slots a car runs in. Named for the usual
/// left-handed circuit: `Inner` is the shorter lap there.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Lane {
    /// Farther from the piece reference edge (smaller radius on
    /// left-handed curves).
    Inner,
    /// Closer to the piece reference edge.
    Outer,
}

/// Perpendicular offset from the piece reference line to the lane slot,
/// measured to the left of the entry heading.
#[inline]
pub fn lane_offset(lane: Lane) -> Scalar {
    match lane {
        Lane::Inner => LANE_SPACING * 1.5,
        Lane::Outer => LANE_SPACING * 0.5,
    }
}
