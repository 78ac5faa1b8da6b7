use crate::Scalar;

/// Fixed-timestep accumulator.
///
/// Wall-clock elapsed time is folded into an accumulator and paid out as
/// zero or more whole steps of `dt`. Real lag never produces a larger
/// `dt`; it produces more steps, which keeps the integration stable.
#[derive(Copy, Clone, Debug)]
pub struct FixedClock {
    dt: Scalar,
    acc: Scalar,
}

impl FixedClock {
    pub fn new(dt: Scalar) -> Self {
        assert!(dt > 0.0, "timestep must be positive");
        Self { dt, acc: 0.0 }
    }

    #[inline]
    pub fn dt(&self) -> Scalar {
        self.dt
    }

    /// Fold in elapsed wall-clock seconds; returns how many whole fixed
    /// steps are now due. The fractional remainder carries over.
    pub fn advance(&mut self, elapsed: Scalar) -> u32 {
        self.acc += elapsed.max(0.0);
        let n = (self.acc / self.dt).floor();
        self.acc -= n * self.dt;
        n as u32
    }
}
