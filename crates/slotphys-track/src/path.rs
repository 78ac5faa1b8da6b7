use crate::{PathSegment, TrackError};
use glam::Vec2;
use slotphys_core::Scalar;

/// Everything the dynamics needs at one arc-length position.
#[derive(Copy, Clone, Debug)]
pub struct PathSample {
    pub position: Vec2,
    pub heading: Scalar,
    pub curvature: Scalar,
}

/// Stored per appended segment. Start offset of piece i equals the end
/// offset of piece i-1 (0 for the first), so offsets are strictly
/// increasing and cover [0, total length) gap-free.
#[derive(Copy, Clone, Debug)]
struct Piece {
    curvature: Scalar,
    start: Scalar,
    end: Scalar,
    segment: PathSegment,
}

/// An ordered concatenation of [`PathSegment`]s forming a closed loop.
///
/// Built once per track layout, immutable afterwards, and shared
/// read-only by every car on that lane.
#[derive(Clone, Debug, Default)]
pub struct PiecewisePath {
    pieces: Vec<Piece>,
}

impl PiecewisePath {
    pub fn new() -> Self {
        Self { pieces: Vec::new() }
    }

    /// Extend the path by one segment; its start offset is the running total.
    pub fn append(&mut self, segment: PathSegment) {
        let start = self.length();
        self.pieces.push(Piece {
            curvature: segment.curvature(),
            start,
            end: start + segment.length(),
            segment,
        });
    }

    /// Total arc length. 0 for an empty path.
    #[inline]
    pub fn length(&self) -> Scalar {
        self.pieces.last().map_or(0.0, |p| p.end)
    }

    #[inline]
    pub fn segment_count(&self) -> usize {
        self.pieces.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    pub fn segments(&self) -> impl ExactSizeIterator<Item = &PathSegment> + '_ {
        self.pieces.iter().map(|p| &p.segment)
    }

    /// Locate the piece owning `s` after wrapping into [0, L).
    fn locate(&self, s: Scalar) -> Result<(&Piece, Scalar), TrackError> {
        if self.pieces.is_empty() {
            return Err(TrackError::EmptyPath);
        }
        let l = self.length();
        let mut sn = s - (s / l).floor() * l;
        // Rounding in the division can land exactly on L.
        if sn >= l {
            sn = 0.0;
        }
        for p in &self.pieces {
            if sn >= p.start && sn < p.end {
                return Ok((p, sn - p.start));
            }
        }
        Err(TrackError::OutOfRange { s: sn, length: l })
    }

    /// Curvature at arc length `s` (periodic).
    pub fn curvature_at(&self, s: Scalar) -> Result<Scalar, TrackError> {
        let (p, _) = self.locate(s)?;
        Ok(p.curvature)
    }

    /// Track tangent heading at arc length `s` (periodic).
    pub fn heading_at(&self, s: Scalar) -> Result<Scalar, TrackError> {
        let (p, r) = self.locate(s)?;
        Ok(p.segment.heading_at(r))
    }

    /// World position at arc length `s` (periodic).
    pub fn position_at(&self, s: Scalar) -> Result<Vec2, TrackError> {
        let (p, r) = self.locate(s)?;
        Ok(p.segment.point_at(r))
    }

    /// Position, heading and curvature at `s` in a single locate pass.
    pub fn evaluate(&self, s: Scalar) -> Result<PathSample, TrackError> {
        let (p, r) = self.locate(s)?;
        Ok(PathSample {
            position: p.segment.point_at(r),
            heading: p.segment.heading_at(r),
            curvature: p.curvature,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotphys_core::Pose2;
    use std::f32::consts::FRAC_PI_4;

    fn straight_035() -> PiecewisePath {
        let mut path = PiecewisePath::new();
        path.append(PathSegment::straight(Pose2::default(), 0.35));
        path
    }

    #[test]
    fn empty_path_faults() {
        let path = PiecewisePath::new();
        assert!(matches!(path.evaluate(0.0), Err(TrackError::EmptyPath)));
        assert_eq!(path.length(), 0.0);
    }

    #[test]
    fn straight_midpoint() {
        let path = straight_035();
        let s = path.evaluate(0.175).unwrap();
        assert!((s.position.x - 0.175).abs() < 1e-6);
        assert!(s.position.y.abs() < 1e-6);
        assert_eq!(s.heading, 0.0);
        assert_eq!(s.curvature, 0.0);
    }

    #[test]
    fn periodic_in_whole_laps() {
        let mut path = PiecewisePath::new();
        path.append(PathSegment::straight(Pose2::default(), 0.35));
        let exit = path.segments().last().unwrap().exit_pose();
        path.append(PathSegment::arc_from_radius(exit, 0.37, FRAC_PI_4));

        let l = path.length();
        for s in [0.0, 0.1, 0.34, 0.5] {
            for k in [-2.0, -1.0, 1.0, 3.0_f32] {
                let a = path.evaluate(s).unwrap();
                let b = path.evaluate(s + k * l).unwrap();
                assert!((a.position - b.position).length() < 1e-4, "s={s} k={k}");
                assert!((a.heading - b.heading).abs() < 1e-4);
                assert_eq!(a.curvature, b.curvature);
            }
        }
    }

    #[test]
    fn offsets_chain_without_gaps() {
        let mut path = PiecewisePath::new();
        let mut pose = Pose2::default();
        let mut total = 0.0;
        for i in 0..6 {
            let seg = if i % 2 == 0 {
                PathSegment::straight(pose, 0.35)
            } else {
                PathSegment::arc_from_radius(pose, 0.214, FRAC_PI_4)
            };
            total += seg.length();
            pose = seg.exit_pose();
            path.append(seg);
        }
        assert!((path.length() - total).abs() < 1e-5);
        // Exit pose of segment i equals the entry pose of segment i+1.
        let segs: Vec<_> = path.segments().copied().collect();
        for w in segs.windows(2) {
            let e = w[0].exit_pose();
            assert!((e.pos - w[1].origin()).length() < 1e-5);
            assert!((e.heading - w[1].entry_heading()).abs() < 1e-5);
        }
    }

    #[test]
    fn wrap_at_exact_length() {
        let path = straight_035();
        let s = path.evaluate(0.35).unwrap();
        assert!(s.position.x.abs() < 1e-6);
    }

    #[test]
    fn negative_arc_length_wraps_backwards() {
        let path = straight_035();
        let s = path.evaluate(-0.05).unwrap();
        assert!((s.position.x - 0.30).abs() < 1e-5);
    }
}
