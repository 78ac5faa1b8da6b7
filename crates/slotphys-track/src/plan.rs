//! Declarative track layouts.
//!
//! A [`TrackPlan`] chains standard pieces nose-to-tail from a start pose
//! and builds one [`PiecewisePath`] per lane. Lane paths are constant
//! left-offset curves of the piece reference line (the outer edge of a
//! left-handed piece), so consecutive lane segments connect exactly.

use crate::{lane_offset, Lane, PathSegment, PiecewisePath, TrackError, R1_RADIUS, R2_RADIUS};
use serde::{Deserialize, Serialize};
use slotphys_core::{wrap_pi, Pose2, Scalar};
use std::f32::consts::FRAC_PI_4;

/// Curve handedness for the standard 45° pieces.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Turn {
    Left,
    Right,
}

impl Turn {
    #[inline]
    fn sign(self) -> Scalar {
        match self {
            Turn::Left => 1.0,
            Turn::Right => -1.0,
        }
    }
}

/// One track piece of a plan.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum PieceSpec {
    Straight { length: Scalar },
    /// `angle` is the signed turn in radians, positive = left.
    Curve { outer_radius: Scalar, angle: Scalar },
}

impl PieceSpec {
    /// C8205 standard straight (350 mm).
    pub fn c8205() -> Self {
        PieceSpec::Straight { length: 0.35 }
    }

    /// C8202 standard curve: R1 radius, 45°.
    pub fn c8202(turn: Turn) -> Self {
        PieceSpec::Curve { outer_radius: R1_RADIUS, angle: turn.sign() * FRAC_PI_4 }
    }

    /// C8204 standard curve: R2 radius, 45°.
    pub fn c8204(turn: Turn) -> Self {
        PieceSpec::Curve { outer_radius: R2_RADIUS, angle: turn.sign() * FRAC_PI_4 }
    }
}

/// An ordered chain of pieces plus the pose the first piece starts at.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TrackPlan {
    pub name: String,
    pub start: Pose2,
    pub pieces: Vec<PieceSpec>,
}

/// Closure tolerances for [`TrackPlan::build_closed_lane`].
const CLOSE_POS_TOL: Scalar = 1e-3;
const CLOSE_ANGLE_TOL: Scalar = 1e-2;

impl TrackPlan {
    /// The demo circuit: a straight, four R2 curves, and the same again.
    /// Eight 45° left turns close the loop into an oval.
    pub fn demo_oval() -> Self {
        let mut pieces = Vec::new();
        for _ in 0..2 {
            pieces.push(PieceSpec::c8205());
            for _ in 0..4 {
                pieces.push(PieceSpec::c8204(Turn::Left));
            }
        }
        Self { name: "demo oval".into(), start: Pose2::new(-0.10, -0.35, 0.0), pieces }
    }

    /// Walk the piece chain and collect the lane path.
    ///
    /// The lane runs at a constant perpendicular offset `d` to the left
    /// of the reference line; an offset curve of a circle shares its
    /// center, so the lane curvature is `c / (1 - d*c)`.
    pub fn build_lane(&self, lane: Lane) -> PiecewisePath {
        let d = lane_offset(lane);
        let mut path = PiecewisePath::new();
        let mut pose = self.start;
        for piece in &self.pieces {
            let lane_entry = Pose2 { pos: pose.offset_left(d), heading: pose.heading };
            let reference = match *piece {
                PieceSpec::Straight { length } => {
                    path.append(PathSegment::straight(lane_entry, length));
                    PathSegment::straight(pose, length)
                }
                PieceSpec::Curve { outer_radius, angle } => {
                    let c_ref = angle.signum() / outer_radius;
                    let c_lane = c_ref / (1.0 - d * c_ref);
                    let lane_len = angle.abs() / c_lane.abs();
                    path.append(PathSegment::arc(lane_entry, c_lane, lane_len));
                    PathSegment::arc_from_radius(pose, outer_radius, angle)
                }
            };
            pose = reference.exit_pose();
        }
        path
    }

    /// Gap between the final exit pose and the start pose.
    pub fn closure_gap(&self) -> (Scalar, Scalar) {
        let mut pose = self.start;
        for piece in &self.pieces {
            let reference = match *piece {
                PieceSpec::Straight { length } => PathSegment::straight(pose, length),
                PieceSpec::Curve { outer_radius, angle } => {
                    PathSegment::arc_from_radius(pose, outer_radius, angle)
                }
            };
            pose = reference.exit_pose();
        }
        let gap_m = (pose.pos - self.start.pos).length();
        let gap_rad = wrap_pi(pose.heading - self.start.heading).abs();
        (gap_m, gap_rad)
    }

    /// Like [`build_lane`](Self::build_lane) but rejects plans whose
    /// chain does not come back to the start pose.
    pub fn build_closed_lane(&self, lane: Lane) -> Result<PiecewisePath, TrackError> {
        let (gap_m, gap_rad) = self.closure_gap();
        if gap_m > CLOSE_POS_TOL || gap_rad > CLOSE_ANGLE_TOL {
            return Err(TrackError::NotClosed { gap_m, gap_rad });
        }
        let path = self.build_lane(lane);
        if path.is_empty() {
            return Err(TrackError::EmptyPath);
        }
        Ok(path)
    }
}
