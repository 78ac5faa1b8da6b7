//! slotphys-sim — headless slot car simulation runner.
//!
//! Builds a lane path from a JSON track plan (or the built-in demo
//! oval), runs a fixed number of ticks and prints telemetry.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{ensure, Context, Result};
use clap::Parser;
use slotphys_car::CarParams;
use slotphys_core::Scalar;
use slotphys_track::{Lane, TrackPlan};
use slotphys_world::World;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "slotphys-sim", version, about = "Run a slot car around a track without a screen")]
struct Opts {
    /// Track plan JSON; defaults to the built-in demo oval.
    #[arg(long)]
    plan: Option<PathBuf>,

    /// Run in the outer lane instead of the inner one.
    #[arg(long)]
    outer: bool,

    /// Number of fixed steps to simulate.
    #[arg(long, default_value_t = 1000)]
    ticks: u32,

    /// Fixed timestep (seconds).
    #[arg(long, default_value_t = 0.01)]
    dt: Scalar,

    /// Rail voltage (V).
    #[arg(long, default_value_t = 6.0)]
    voltage: Scalar,

    /// Car mass (grams).
    #[arg(long, default_value_t = 100.0)]
    mass: Scalar,

    /// Magnet max energy product (MGOe).
    #[arg(long, default_value_t = 25.0)]
    magnet: Scalar,

    /// Static lateral friction coefficient.
    #[arg(long, default_value_t = 1.0)]
    static_friction: Scalar,

    /// Dynamic (sliding) lateral friction coefficient.
    #[arg(long, default_value_t = 1.0)]
    dynamic_friction: Scalar,

    /// Wheel radius (mm).
    #[arg(long, default_value_t = 7.0)]
    wheel_radius: Scalar,

    /// Motor torque constant (0.01 Nm/A units).
    #[arg(long, default_value_t = 1.4)]
    torque: Scalar,

    /// Motor back-EMF constant (0.01 V·s/rad units).
    #[arg(long, default_value_t = 3.0)]
    back_emf: Scalar,

    /// Gearbox reduction ratio.
    #[arg(long, default_value_t = 3.2)]
    gear_ratio: Scalar,

    /// Geartrain efficiency (percent).
    #[arg(long, default_value_t = 90.0)]
    efficiency: Scalar,

    /// Print a telemetry line every N ticks.
    #[arg(long, default_value_t = 50)]
    report_every: u32,
}

impl Opts {
    fn car_params(&self) -> CarParams {
        CarParams {
            voltage: self.voltage,
            magnet: self.magnet,
            mass_g: self.mass,
            static_friction: self.static_friction,
            dynamic_friction: self.dynamic_friction,
            wheel_radius_mm: self.wheel_radius,
            torque_c: self.torque,
            back_emf_c: self.back_emf,
            gear_ratio: self.gear_ratio,
            efficiency_pct: self.efficiency,
        }
    }
}

fn check_dt(dt: Scalar) -> Result<()> {
    ensure!(
        dt.is_finite() && dt > 0.0,
        "--dt must be a positive number of seconds, got {dt}"
    );
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let opts = Opts::parse();
    check_dt(opts.dt)?;

    let plan: TrackPlan = match &opts.plan {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read track plan {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("failed to parse track plan {}", path.display()))?
        }
        None => TrackPlan::demo_oval(),
    };

    let lane = if opts.outer { Lane::Outer } else { Lane::Inner };
    let path = plan
        .build_closed_lane(lane)
        .with_context(|| format!("track plan '{}' did not build", plan.name))?;
    info!(
        plan = %plan.name,
        lane = ?lane,
        length_m = path.length(),
        segments = path.segment_count(),
        "lane path built"
    );

    let mut world = World::new(Arc::new(path), opts.dt)?;
    let car = world.add_car(opts.car_params())?;

    println!("{:>8}  {:>9}  {:>8}  {:>9}  state", "tick", "s (m)", "v (m/s)", "slip (°)");
    for tick in 0..opts.ticks {
        world.step()?;
        if tick % opts.report_every.max(1) == 0 {
            let st = world.state(car)?;
            let state = if st.drive.is_derailed() { "derailed" } else { "driving" };
            println!(
                "{tick:>8}  {:>9.4}  {:>8.3}  {:>9.2}  {state}",
                st.s,
                st.v,
                st.slip.to_degrees()
            );
        }
    }

    let st = world.state(car)?;
    let laps = st.s / world.path().length();
    println!(
        "\nfinished after {} ticks: {:.2} laps, v = {:.3} m/s, {}",
        world.tick(),
        laps,
        st.v,
        if st.drive.is_derailed() { "DERAILED" } else { "still on the slot" }
    );
    Ok(())
}
