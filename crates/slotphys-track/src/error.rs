use slotphys_core::Scalar;

/// Errors raised by path construction and lookup.
///
/// `EmptyPath` and `OutOfRange` indicate a construction bug, not a
/// runtime condition to recover from: a correctly built path owns every
/// normalized arc length.
#[derive(Debug, thiserror::Error)]
pub enum TrackError {
    #[error("path has no segments")]
    EmptyPath,

    #[error("no segment owns arc length {s} (path length {length})")]
    OutOfRange { s: Scalar, length: Scalar },

    #[error("track plan does not close: exit pose is {gap_m} m and {gap_rad} rad away from the start")]
    NotClosed { gap_m: Scalar, gap_rad: Scalar },
}
