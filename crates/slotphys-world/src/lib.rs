//! Multi-car simulation container.
//!
//! One `World` owns every car on a lane path. The path is immutable and
//! shared read-only; each car's state is exclusively owned here and
//! mutated exactly once per tick, in car-id order, strictly before any
//! snapshot of that tick can be read. Parameter updates from a control
//! surface are queued last-write-wins and swapped in atomically at the
//! top of the next step, so a single step never sees a torn set.

use core::fmt;
use std::sync::Arc;

use slotphys_car::{CarDynamics, CarParams, CarState, ParamError};
use slotphys_core::{FixedClock, Scalar, StepCtx};
use slotphys_track::{PiecewisePath, TrackError};
use tracing::{debug, warn};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct CarId(pub u32);

impl fmt::Display for CarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CarId({})", self.0)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    #[error("unknown car {0}")]
    UnknownCar(CarId),
    #[error(transparent)]
    Param(#[from] ParamError),
    #[error(transparent)]
    Track(#[from] TrackError),
}

struct CarSlot {
    dynamics: CarDynamics,
    state: CarState,
    pending: Option<CarParams>,
}

pub struct World {
    path: Arc<PiecewisePath>,
    cars: Vec<CarSlot>,
    clock: FixedClock,
    tick: u64,
}

impl World {
    /// `dt` is the fixed timestep in seconds.
    pub fn new(path: Arc<PiecewisePath>, dt: Scalar) -> Result<Self, WorldError> {
        if path.is_empty() {
            return Err(TrackError::EmptyPath.into());
        }
        Ok(Self { path, cars: Vec::new(), clock: FixedClock::new(dt), tick: 0 })
    }

    /// Put a new car at rest at the start of the lane.
    pub fn add_car(&mut self, params: CarParams) -> Result<CarId, WorldError> {
        let dynamics = CarDynamics::new(params)?;
        let state = CarState::spawn(&self.path.evaluate(0.0)?);
        self.cars.push(CarSlot { dynamics, state, pending: None });
        let id = CarId(self.cars.len() as u32 - 1);
        debug!(car = %id, "car added");
        Ok(id)
    }

    /// Queue a parameter snapshot for `id`. Last write wins; the
    /// snapshot takes effect at the top of the next step.
    pub fn queue_params(&mut self, id: CarId, params: CarParams) -> Result<(), WorldError> {
        params.validate()?;
        let slot = self.slot_mut(id)?;
        slot.pending = Some(params);
        Ok(())
    }

    /// Advance every car by exactly one fixed step.
    pub fn step(&mut self) -> Result<(), WorldError> {
        let ctx = StepCtx { dt: self.clock.dt(), tick: self.tick };
        for (i, slot) in self.cars.iter_mut().enumerate() {
            if let Some(params) = slot.pending.take() {
                slot.dynamics.set_params(params);
                debug!(car = %CarId(i as u32), tick = ctx.tick, "parameters applied");
            }
            let was_driving = !slot.state.drive.is_derailed();
            slot.dynamics.step(&mut slot.state, &self.path, &ctx)?;
            if was_driving && slot.state.drive.is_derailed() {
                warn!(
                    car = %CarId(i as u32),
                    tick = ctx.tick,
                    slip_deg = slot.state.slip.to_degrees(),
                    v = slot.state.v,
                    "car derailed"
                );
            }
        }
        self.tick += 1;
        Ok(())
    }

    /// Fold in wall-clock elapsed seconds and run the fixed steps that
    /// became due. Returns how many ran.
    pub fn advance(&mut self, elapsed: Scalar) -> Result<u32, WorldError> {
        let due = self.clock.advance(elapsed);
        for _ in 0..due {
            self.step()?;
        }
        Ok(due)
    }

    /// Copied state snapshot for the presentation side.
    pub fn state(&self, id: CarId) -> Result<CarState, WorldError> {
        Ok(self.slot(id)?.state)
    }

    /// The parameter snapshot currently driving `id` (queued ones are
    /// not visible until the next step).
    pub fn params(&self, id: CarId) -> Result<&CarParams, WorldError> {
        Ok(self.slot(id)?.dynamics.params())
    }

    #[inline]
    pub fn tick(&self) -> u64 {
        self.tick
    }

    #[inline]
    pub fn dt(&self) -> Scalar {
        self.clock.dt()
    }

    #[inline]
    pub fn path(&self) -> &Arc<PiecewisePath> {
        &self.path
    }

    #[inline]
    pub fn car_count(&self) -> usize {
        self.cars.len()
    }

    fn slot(&self, id: CarId) -> Result<&CarSlot, WorldError> {
        self.cars.get(id.0 as usize).ok_or(WorldError::UnknownCar(id))
    }

    fn slot_mut(&mut self, id: CarId) -> Result<&mut CarSlot, WorldError> {
        self.cars.get_mut(id.0 as usize).ok_or(WorldError::UnknownCar(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotphys_track::{Lane, TrackPlan};

    fn demo_world() -> World {
        let path = TrackPlan::demo_oval().build_closed_lane(Lane::Outer).unwrap();
        World::new(Arc::new(path), 0.01).unwrap()
    }

    #[test]
    fn empty_path_is_rejected() {
        let path = Arc::new(PiecewisePath::new());
        assert!(matches!(
            World::new(path, 0.01),
            Err(WorldError::Track(TrackError::EmptyPath))
        ));
    }

    #[test]
    fn queued_params_apply_at_the_next_step() {
        let mut w = demo_world();
        let id = w.add_car(CarParams::default()).unwrap();

        let update = CarParams { voltage: 9.0, ..Default::default() };
        w.queue_params(id, update).unwrap();
        // Not visible yet...
        assert_eq!(w.params(id).unwrap().voltage, 6.0);
        w.step().unwrap();
        // ...but in force for the step that just ran.
        assert_eq!(w.params(id).unwrap().voltage, 9.0);
    }

    #[test]
    fn last_write_wins() {
        let mut w = demo_world();
        let id = w.add_car(CarParams::default()).unwrap();
        w.queue_params(id, CarParams { voltage: 3.0, ..Default::default() }).unwrap();
        w.queue_params(id, CarParams { voltage: 11.0, ..Default::default() }).unwrap();
        w.step().unwrap();
        assert_eq!(w.params(id).unwrap().voltage, 11.0);
    }

    #[test]
    fn invalid_snapshot_rejected_at_the_boundary() {
        let mut w = demo_world();
        let id = w.add_car(CarParams::default()).unwrap();
        let bad = CarParams { mass_g: -5.0, ..Default::default() };
        assert!(matches!(w.queue_params(id, bad), Err(WorldError::Param(_))));
    }

    #[test]
    fn advance_runs_whole_steps_only() {
        let mut w = demo_world();
        let id = w.add_car(CarParams::default()).unwrap();
        assert_eq!(w.advance(0.025).unwrap(), 2);
        assert_eq!(w.tick(), 2);
        assert_eq!(w.advance(0.004).unwrap(), 0);
        assert_eq!(w.advance(0.007).unwrap(), 1);
        assert!(w.state(id).unwrap().v > 0.0);
    }

    #[test]
    fn unknown_car_errors() {
        let w = demo_world();
        assert!(matches!(w.state(CarId(7)), Err(WorldError::UnknownCar(_))));
    }

    #[test]
    fn cars_progress_around_the_loop() {
        let mut w = demo_world();
        let id = w.add_car(CarParams::default()).unwrap();
        for _ in 0..500 {
            w.step().unwrap();
        }
        let st = w.state(id).unwrap();
        assert!(st.s > 0.5, "car barely moved: s = {}", st.s);
        assert!(!st.drive.is_derailed());
    }
}
