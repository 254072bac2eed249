//! Adaptive-step RK4 flight integration.
//!
//! State vector `[x, y, vx, vy]`. Each iteration records the current state,
//! picks `dt` from the current speed and advances one classical RK4 step.
//! The run ends as soon as the state drops below the target elevation or a
//! time/step cap is reached; the crossing itself is not interpolated, so the
//! final sample is the last state still above the target elevation.

use ballistics_core::{coriolis_parameter, require_positive, BallisticsError, Environment, Result, GRAVITY};
use nalgebra::Vector4;
use serde::{Deserialize, Serialize};

use crate::projectile::Projectile;
use crate::trajectory::{Termination, Trajectory, TrajectorySample};

type State = Vector4<f64>;

/// Integration options.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegrateOpts {
    /// Smallest step [s]
    pub dt_min: f64,
    /// Largest step [s]; also the step at or below 1000 m/s
    pub dt_max: f64,
    /// Max flight time [s]
    pub max_time: f64,
    pub max_steps: usize,
}

/// Hard ceiling on flight time [s]; caller options may only tighten it.
pub const MAX_FLIGHT_TIME: f64 = 120.0;
/// Hard ceiling on integration steps.
pub const MAX_STEPS: usize = 10_000;

impl Default for IntegrateOpts {
    fn default() -> Self {
        Self { dt_min: 0.001, dt_max: 0.1, max_time: MAX_FLIGHT_TIME, max_steps: MAX_STEPS }
    }
}

impl IntegrateOpts {
    /// Finite `0 < dt_min <= dt_max`, `0 < max_time <= 120`, `1 <= max_steps <= 10 000`.
    pub fn validate(&self) -> Result<()> {
        require_positive("dt_min", self.dt_min)?;
        require_positive("dt_max", self.dt_max)?;
        if self.dt_min > self.dt_max {
            return Err(BallisticsError::invalid("dt_min", self.dt_min, "must not exceed dt_max"));
        }
        let max_time = require_positive("max_time", self.max_time)?;
        if max_time > MAX_FLIGHT_TIME {
            return Err(BallisticsError::invalid("max_time", max_time, "must be <= 120 s"));
        }
        if !(1..=MAX_STEPS).contains(&self.max_steps) {
            #[allow(clippy::cast_precision_loss)]
            let steps = self.max_steps as f64;
            return Err(BallisticsError::invalid("max_steps", steps, "must be within 1..=10000"));
        }
        Ok(())
    }
}

/// Muzzle conditions for one shot.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Launch {
    /// m/s
    pub muzzle_velocity: f64,
    /// degrees above horizontal
    pub angle_deg: f64,
    /// Target height below the muzzle [m]; flight continues while y >= -offset.
    #[serde(default)]
    pub target_elevation_offset: f64,
}

impl Launch {
    pub fn new(muzzle_velocity: f64, angle_deg: f64) -> Self {
        Self { muzzle_velocity, angle_deg, target_elevation_offset: 0.0 }
    }

    #[must_use]
    pub fn with_target_elevation(mut self, offset_m: f64) -> Self {
        self.target_elevation_offset = offset_m;
        self
    }

    pub fn validate(&self) -> Result<()> {
        require_positive("muzzle_velocity", self.muzzle_velocity)?;
        if !self.angle_deg.is_finite() {
            return Err(BallisticsError::invalid("angle_deg", self.angle_deg, "must be finite"));
        }
        if !(self.target_elevation_offset.is_finite() && self.target_elevation_offset >= 0.0) {
            return Err(BallisticsError::invalid(
                "target_elevation_offset",
                self.target_elevation_offset,
                "must be finite and >= 0 (targets above the muzzle are not supported)",
            ));
        }
        Ok(())
    }
}

/// Step size for the current speed: `dt_max · 1000 / max(100, |v|)`, bounded
/// to `[dt_min, dt_max]`.
pub fn step_size(speed: f64, opts: &IntegrateOpts) -> f64 {
    (opts.dt_max * (1000.0 / speed.max(100.0))).min(opts.dt_max).max(opts.dt_min)
}

/// Integrate with the default caps (120 s, 10 000 steps).
pub fn integrate(projectile: &Projectile, env: &Environment, launch: &Launch) -> Trajectory {
    integrate_with(projectile, env, launch, &IntegrateOpts::default())
}

/// Main integration entry point.
pub fn integrate_with(
    projectile: &Projectile,
    env: &Environment,
    launch: &Launch,
    opts: &IntegrateOpts,
) -> Trajectory {
    let dynamics = Dynamics::new(projectile, env, launch);
    let floor = -launch.target_elevation_offset;

    let theta = launch.angle_deg.to_radians();
    let v0 = launch.muzzle_velocity;
    let mut s = State::new(0.0, 0.0, v0 * theta.cos(), v0 * theta.sin());
    let mut t = 0.0;
    let mut steps = 0usize;

    let mut out = Vec::with_capacity(opts.max_steps.min(4096));

    while s[1] >= floor && t < opts.max_time && steps < opts.max_steps {
        let speed = s[2].hypot(s[3]);
        out.push(TrajectorySample { x: s[0], y: s[1], t, vx: s[2], vy: s[3], speed });

        let dt = step_size(speed, opts);
        s = rk4_step(|st, tt| dynamics.derivative(st, tt), &s, t, dt);
        t += dt;
        steps += 1;
    }

    // NaN counts as a crossing.
    let crossed = s[1] < floor || s[1].is_nan();
    let termination = if crossed {
        Termination::Impact
    } else if t >= opts.max_time {
        Termination::TimeLimit
    } else {
        Termination::StepLimit
    };

    match termination {
        Termination::Impact => log::debug!(
            "trajectory: {} samples, impact after {:.3} s at x = {:.2} m",
            out.len(),
            t,
            s[0]
        ),
        cap => log::warn!(
            "trajectory cut off by {cap:?} after {} samples (t = {t:.3} s, y = {:.2} m)",
            out.len(),
            s[1]
        ),
    }

    Trajectory::new(out, termination)
}

// ---------- dynamics ----------

/// Everything the derivative needs, resolved once per run.
struct Dynamics<'a> {
    projectile: &'a Projectile,
    rho: f64,
    wind: (f64, f64),
    launch_angle: f64,
    burn_time: f64,
    powered: bool,
    coriolis: Option<f64>,
}

impl<'a> Dynamics<'a> {
    fn new(projectile: &'a Projectile, env: &Environment, launch: &Launch) -> Self {
        Self {
            projectile,
            rho: env.air_density(),
            wind: env.wind().components(),
            launch_angle: launch.angle_deg.to_radians(),
            burn_time: projectile.burn_time(),
            powered: projectile.is_powered(),
            coriolis: env.coriolis_enabled().then(|| coriolis_parameter(env.latitude_deg())),
        }
    }

    /// `d/dt [x, y, vx, vy]` at flight time `t`.
    fn derivative(&self, s: &State, t: f64) -> State {
        let (vx, vy) = (s[2], s[3]);
        let mass = self.projectile.mass_at(t);

        // Air-relative velocity
        let vrx = vx - self.wind.0;
        let vry = vy - self.wind.1;
        let vr = vrx.hypot(vry);

        let (mut ax, mut ay) = if vr > 0.0 {
            let cd = self.projectile.drag_model().drag_coefficient(vr);
            let drag = 0.5 * self.rho * vr * vr * cd * self.projectile.area();
            (-(drag * vrx) / (mass * vr), -GRAVITY - (drag * vry) / (mass * vr))
        } else {
            (0.0, -GRAVITY)
        };

        if self.powered && t < self.burn_time {
            let thrust = self.projectile.thrust_at(t);
            // At t = 0 the motor pushes along the bore, afterwards along the flight path.
            let heading = if t == 0.0 { self.launch_angle } else { vy.atan2(vx) };
            ax += thrust * heading.cos() / mass;
            ay += thrust * heading.sin() / mass;
        }

        if let Some(f) = self.coriolis {
            ax += f * vy;
            ay -= f * vx;
        }

        State::new(vx, vy, ax, ay)
    }
}

fn rk4_step<F>(f: F, s: &State, t: f64, dt: f64) -> State
where
    F: Fn(&State, f64) -> State,
{
    let k1 = f(s, t);
    let k2 = f(&(s + k1 * (0.5 * dt)), t + 0.5 * dt);
    let k3 = f(&(s + k2 * (0.5 * dt)), t + 0.5 * dt);
    let k4 = f(&(s + k3 * dt), t + dt);

    s + (k1 + (k2 + k3) * 2.0 + k4) * (dt / 6.0)
}

/* ----------------------------------- tests ---------------------------------- */
