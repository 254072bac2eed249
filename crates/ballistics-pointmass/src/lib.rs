//! ballistics-pointmass
//!
//! Planar point-mass trajectory solver with RK4 integration.
//! - Drag from a Mach-bucketed (or user curve) drag coefficient:
//!   `F = ½ ρ |v_rel|² Cd A`, opposing the air-relative velocity.
//! - Wind in the firing plane, optional planar Coriolis term.
//! - Powered projectiles: thrust along the flight path, mass depletion.
//! - Step size follows speed: `dt = clamp(dt_max · 1000 / max(100, |v|))`.
//! - Integration stops at the target elevation, 120 s or 10 000 steps.
//!
//! On top of the engine:
//! - `config`: JSON input record → validated projectile/environment/launch.
//! - `sweep`: parallel parameter sweeps and seeded Monte-Carlo dispersion.
//! - `aim`: launch-angle search for a target distance.
//!
//! Conventions:
//! - x downrange, y up, origin at the muzzle, SI units throughout.
//! - Launch, wind and latitude angles in degrees.

pub mod aim;
pub mod config;
pub mod integrator;
pub mod projectile;
pub mod sweep;
pub mod trajectory;

pub use aim::{solve_launch_angle, AimSolution, AngleSearch};
pub use config::{DragModelName, Run, RunConfig, StageConfig};
pub use integrator::{
    integrate, integrate_with, step_size, IntegrateOpts, Launch, MAX_FLIGHT_TIME, MAX_STEPS,
};
pub use projectile::{Projectile, ProjectileKind};
pub use sweep::{
    run_monte_carlo, run_sweep, sweep_values, Dispersion, DispersionStats, MonteCarloConfig,
    MonteCarloReport, MonteCarloRun, SweepParam, SweepRun,
};
pub use trajectory::{Termination, Trajectory, TrajectorySample, TrajectorySummary};

pub use ballistics_core::{BallisticsError, Conditions, Environment, Result};
pub use ballistics_models::{DragCurve, DragModel, Stage, ThrustCurve, ThrustProfile};
