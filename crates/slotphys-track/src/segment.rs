use glam::Vec2;
use slotphys_core::{Pose2, Scalar, CURVATURE_EPS};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SegmentKind {
    Straight,
    Arc,
}

/// One physical track piece's lane path: an entry pose plus constant
/// signed curvature over a fixed arc length.
///
/// Invariant: total heading change across the segment equals
/// `curvature * length`. Immutable once built.
#[derive(Copy, Clone, Debug)]
pub struct PathSegment {
    origin: Vec2,
    heading: Scalar,
    /// Signed curvature (rad/m), positive = left turn, 0 = straight.
    curvature: Scalar,
    /// Arc length (m).
    length: Scalar,
}

impl PathSegment {
    pub fn straight(entry: Pose2, length: Scalar) -> Self {
        Self { origin: entry.pos, heading: entry.heading, curvature: 0.0, length }
    }

    pub fn arc(entry: Pose2, curvature: Scalar, length: Scalar) -> Self {
        Self { origin: entry.pos, heading: entry.heading, curvature, length }
    }

    /// Arc from a turn radius and a signed turn angle (positive = left).
    pub fn arc_from_radius(entry: Pose2, radius: Scalar, turn: Scalar) -> Self {
        let length = turn.abs() * radius;
        let curvature = if length > 0.0 { turn / length } else { 0.0 };
        Self::arc(entry, curvature, length)
    }

    #[inline]
    pub fn kind(&self) -> SegmentKind {
        if self.curvature.abs() < CURVATURE_EPS { SegmentKind::Straight } else { SegmentKind::Arc }
    }

    #[inline]
    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    #[inline]
    pub fn entry_heading(&self) -> Scalar {
        self.heading
    }

    #[inline]
    pub fn curvature(&self) -> Scalar {
        self.curvature
    }

    #[inline]
    pub fn length(&self) -> Scalar {
        self.length
    }

    /// Heading at local arc length `r` into the segment.
    #[inline]
    pub fn heading_at(&self, r: Scalar) -> Scalar {
        self.heading + r * self.curvature
    }

    /// World position at local arc length `r`, by the closed-form
    /// integral of unit-speed motion along the segment. Exact.
    pub fn point_at(&self, r: Scalar) -> Vec2 {
        let a0 = self.heading;
        if self.kind() == SegmentKind::Straight {
            self.origin + Vec2::new(a0.cos(), a0.sin()) * r
        } else {
            let c = self.curvature;
            let a = a0 + r * c;
            Vec2::new(
                self.origin.x + (a.sin() - a0.sin()) / c,
                self.origin.y - (a.cos() - a0.cos()) / c,
            )
        }
    }

    /// Exit pose: the entry pose of whatever piece connects next.
    pub fn exit_pose(&self) -> Pose2 {
        Pose2 { pos: self.point_at(self.length), heading: self.heading_at(self.length) }
    }
}
