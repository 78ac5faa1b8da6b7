use crate::{forces, CarParams, CarState, DriveState, ParamError};
use slotphys_core::{heading_dir, wrap_tau, Scalar, StepCtx};
use slotphys_track::{PiecewisePath, TrackError};

/// Integrator constants. One documented set; all of these are heuristic
/// gameplay tunables, not measured physical values.
#[derive(Copy, Clone, Debug)]
pub struct Tuning {
    /// Slip angle that both clamps the integration and triggers
    /// derailment (rad).
    pub slip_limit: Scalar,
    /// Multiplicative slip damping per tick while grip holds.
    pub slip_decay: Scalar,
    /// Proportionality constant converting net lateral force to slip
    /// rate: rate = F / (m * slip_inertia).
    pub slip_inertia: Scalar,
    /// Acceleration clamp (m/s²).
    pub max_accel: Scalar,
    /// Velocity clamp (m/s).
    pub max_speed: Scalar,
    /// Body spin rate while derailed (rad/s).
    pub spin_rate: Scalar,
    /// Multiplicative velocity damping per tick while derailed.
    pub drift_damping: Scalar,
    /// Below this the derailed car stops (m/s).
    pub stop_speed: Scalar,
    /// Drift velocity granted when derailing from standstill (m/s).
    pub escape_floor: Scalar,
    /// Guide pin distance ahead of the body reference point (m).
    pub guide_pin_ahead: Scalar,
    /// Rear axle distance behind the body reference point (m).
    pub rear_axle_back: Scalar,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            slip_limit: 50.0_f32.to_radians(),
            slip_decay: 0.85,
            slip_inertia: 10.0,
            max_accel: 50.0,
            max_speed: 20.0,
            spin_rate: 2.0,
            drift_damping: 0.95,
            stop_speed: 0.01,
            escape_floor: 0.5,
            guide_pin_ahead: 0.040,
            rear_axle_back: 0.025,
        }
    }
}

/// One car's integrator: parameter snapshot plus tuning constants.
///
/// `step` mutates the [`CarState`] in place and has no other side
/// effects; the path is read-only and may be shared across cars.
#[derive(Clone, Debug)]
pub struct CarDynamics {
    params: CarParams,
    tuning: Tuning,
}

impl CarDynamics {
    pub fn new(params: CarParams) -> Result<Self, ParamError> {
        Self::with_tuning(params, Tuning::default())
    }

    pub fn with_tuning(params: CarParams, tuning: Tuning) -> Result<Self, ParamError> {
        params.validate()?;
        Ok(Self { params, tuning })
    }

    #[inline]
    pub fn params(&self) -> &CarParams {
        &self.params
    }

    #[inline]
    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Swap in a new parameter snapshot. Validation happens where the
    /// snapshot enters the system, before it is queued here.
    #[inline]
    pub fn set_params(&mut self, params: CarParams) {
        self.params = params;
    }

    /// Advance one fixed timestep.
    pub fn step(
        &self,
        state: &mut CarState,
        path: &PiecewisePath,
        ctx: &StepCtx,
    ) -> Result<(), TrackError> {
        match state.drive {
            DriveState::Derailed { escape_heading } => {
                self.step_derailed(state, escape_heading, ctx);
                Ok(())
            }
            DriveState::Driving => self.step_driving(state, path, ctx),
        }
    }

    fn step_driving(
        &self,
        state: &mut CarState,
        path: &PiecewisePath,
        ctx: &StepCtx,
    ) -> Result<(), TrackError> {
        let p = &self.params;
        let t = &self.tuning;
        let dt = ctx.dt;
        let mass = p.mass_kg();

        let curvature = path.curvature_at(state.s)?;
        let f_motor = forces::motor_force(p, state.v);
        let f_centrifugal = forces::centrifugal_force(p, state.v, curvature);

        if f_centrifugal <= forces::grip_limit(p) {
            // Grip catches the rear; slip settles back toward zero.
            state.slip *= t.slip_decay;
        } else {
            // Rear slides outward. Whatever centrifugal force the
            // sliding friction cannot absorb swings the body about the
            // guide pin, in the direction of the turn.
            let f_net = f_centrifugal - forces::sliding_friction(p);
            let slip_rate = f_net / (mass * t.slip_inertia);
            state.slip += curvature.signum() * slip_rate * dt;
            state.slip = state.slip.clamp(-t.slip_limit, t.slip_limit);
        }

        // Thrust is body-aligned; only its component along the track
        // tangent moves the car. cos must not go negative, a sideways
        // car does not reverse.
        let f_forward = f_motor * state.slip.cos().max(0.0);
        let accel = (f_forward / mass).clamp(-t.max_accel, t.max_accel);
        state.v = (state.v + accel * dt).clamp(0.0, t.max_speed);
        state.s += state.v * dt;

        if state.slip.abs() >= t.slip_limit {
            // Freeze the last valid body heading for the drift and keep
            // the residual velocity, floored so the drift is visible.
            if state.v <= 0.0 {
                state.v = t.escape_floor;
            }
            state.drive = DriveState::Derailed { escape_heading: state.heading };
            return Ok(());
        }

        // Guide pin on the slot, rear axle trailing behind; the body
        // reference point sits between them.
        let sample = path.evaluate(state.s)?;
        let body_heading = sample.heading + state.slip;
        let dir = heading_dir(body_heading);
        let wheelbase = t.guide_pin_ahead + t.rear_axle_back;
        let pin = sample.position;
        let rear = pin - dir * wheelbase;
        state.position = rear.lerp(pin, t.rear_axle_back / wheelbase);
        state.heading = body_heading;
        Ok(())
    }

    fn step_derailed(&self, state: &mut CarState, escape_heading: Scalar, ctx: &StepCtx) {
        let t = &self.tuning;
        state.heading = wrap_tau(state.heading + t.spin_rate * ctx.dt);
        state.position += heading_dir(escape_heading) * state.v * ctx.dt;
        state.v *= t.drift_damping;
        if state.v < t.stop_speed {
            state.v = 0.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotphys_core::Pose2;
    use slotphys_track::PathSegment;
    use std::f32::consts::TAU;

    fn straight_loop() -> PiecewisePath {
        let mut path = PiecewisePath::new();
        path.append(PathSegment::straight(Pose2::default(), 0.35));
        path
    }

    fn r1_circle() -> PiecewisePath {
        let mut path = PiecewisePath::new();
        path.append(PathSegment::arc_from_radius(Pose2::default(), 0.214, TAU));
        path
    }

    fn spawn_on(path: &PiecewisePath) -> CarState {
        CarState::spawn(&path.evaluate(0.0).unwrap())
    }

    #[test]
    fn slip_decays_under_grip() {
        let path = straight_loop();
        let car = CarDynamics::new(CarParams::default()).unwrap();
        let mut state = spawn_on(&path);
        state.slip = 0.3;
        let mut prev = state.slip;
        for tick in 0..40 {
            car.step(&mut state, &path, &StepCtx { dt: 0.01, tick }).unwrap();
            assert!(state.slip.abs() < prev.abs(), "slip grew at tick {tick}");
            assert!(!state.drive.is_derailed());
            prev = state.slip;
        }
        assert!(state.slip.abs() < 1e-3);
    }

    #[test]
    fn straight_velocity_settles_at_back_emf_balance() {
        let path = straight_loop();
        let p = CarParams::default();
        let car = CarDynamics::new(p).unwrap();
        let mut state = spawn_on(&path);

        // V = k_e * N * v / r  =>  v* = V r / (k_e N)
        let v_star = p.voltage * p.wheel_radius_m() / (p.k_e() * p.gear_ratio);

        let mut last_s = 0.0;
        for tick in 0..5000 {
            car.step(&mut state, &path, &StepCtx { dt: 0.001, tick }).unwrap();
            assert!(state.s >= last_s, "position went backwards");
            last_s = state.s;
        }
        assert!(
            (state.v - v_star).abs() < 0.02,
            "v = {} vs equilibrium {v_star}",
            state.v
        );
        assert!(crate::forces::motor_force(&p, state.v) < 1e-3);

        // ...and it stays in the band.
        let settled = state.v;
        for tick in 5000..5200 {
            car.step(&mut state, &path, &StepCtx { dt: 0.001, tick }).unwrap();
        }
        assert!((state.v - settled).abs() < 1e-4);
    }

    #[test]
    fn no_derailment_on_straights_at_any_voltage() {
        let path = straight_loop();
        let p = CarParams { voltage: 12.0, ..Default::default() };
        let car = CarDynamics::new(p).unwrap();
        let mut state = spawn_on(&path);
        for tick in 0..2000 {
            car.step(&mut state, &path, &StepCtx { dt: 0.01, tick }).unwrap();
        }
        assert!(!state.drive.is_derailed());
        assert_eq!(state.slip, 0.0);
    }

    #[test]
    fn fast_corner_grows_slip_until_derailment() {
        let path = r1_circle();
        let car = CarDynamics::new(CarParams::default()).unwrap();
        let mut state = spawn_on(&path);
        // Pushed well past the grip crossover for R1 at default load.
        state.v = 3.0;

        let mut prev_slip = 0.0;
        let mut derail_tick = None;
        for tick in 0..200 {
            car.step(&mut state, &path, &StepCtx { dt: 0.01, tick }).unwrap();
            if state.drive.is_derailed() {
                derail_tick = Some(tick);
                break;
            }
            assert!(state.slip >= prev_slip, "slip fell back below threshold at {tick}");
            prev_slip = state.slip;
        }
        let when = derail_tick.expect("car never derailed");
        assert!(when < 100, "derailed too late: tick {when}");
    }

    #[test]
    fn derailed_is_terminal_and_drifts_on_the_frozen_heading() {
        let path = r1_circle();
        let car = CarDynamics::new(CarParams::default()).unwrap();
        let mut state = spawn_on(&path);
        state.v = 4.0;

        let mut tick = 0;
        while !state.drive.is_derailed() {
            car.step(&mut state, &path, &StepCtx { dt: 0.01, tick }).unwrap();
            tick += 1;
            assert!(tick < 1000, "never derailed");
        }
        let DriveState::Derailed { escape_heading } = state.drive else {
            unreachable!()
        };
        let escape_dir = heading_dir(escape_heading);

        let mut prev_v = state.v;
        for _ in 0..50 {
            let before = state.position;
            car.step(&mut state, &path, &StepCtx { dt: 0.01, tick }).unwrap();
            tick += 1;
            assert!(state.drive.is_derailed());
            assert!(state.v <= prev_v);
            let delta = state.position - before;
            if delta.length() > 1e-6 {
                // Drift direction never rotates, only the body spins.
                assert!(delta.normalize().dot(escape_dir) > 0.999);
            }
            prev_v = state.v;
        }

        // Multiplicative damping brings it to a full stop.
        for _ in 0..500 {
            car.step(&mut state, &path, &StepCtx { dt: 0.01, tick }).unwrap();
            tick += 1;
        }
        assert_eq!(state.v, 0.0);
        assert!(state.drive.is_derailed());
    }

    #[test]
    fn body_sits_behind_the_guide_pin() {
        let path = straight_loop();
        let car = CarDynamics::new(CarParams::default()).unwrap();
        let mut state = spawn_on(&path);
        car.step(&mut state, &path, &StepCtx { dt: 0.01, tick: 0 }).unwrap();

        let pin = path.position_at(state.s).unwrap();
        let expect = pin - heading_dir(state.heading) * car.tuning().guide_pin_ahead;
        assert!((state.position - expect).length() < 1e-6);
    }
}
