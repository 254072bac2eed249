//! Batch runs: parameter sweeps and Monte-Carlo dispersion.
//!
//! Every run is an independent `integrate_with` call on shared immutable
//! inputs, so both fan out over rayon. Results keep input order.

use ballistics_core::{BallisticsError, Conditions, Environment, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::integrator::{integrate_with, IntegrateOpts, Launch};
use crate::projectile::Projectile;
use crate::trajectory::{Trajectory, TrajectorySummary};

/// Upper bound on the number of values one sweep may produce.
const MAX_SWEEP_VALUES: usize = 100_000;

/// Widest accepted launch-angle perturbation [deg].
const MAX_ANGLE_SPREAD_DEG: f64 = 90.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepParam {
    LaunchAngle,
    MuzzleVelocity,
    /// Wind speed [m/s], direction kept from the base conditions
    WindSpeed,
    /// Air temperature [°C]
    Temperature,
    /// Firing-site altitude [m]
    Altitude,
}

impl SweepParam {
    /// `base` launch and environment with this parameter set to `value`.
    /// Environment parameters rebuild the environment, so air density is
    /// derived again for every value.
    pub fn apply(self, base: &Launch, env: &Environment, value: f64) -> Result<(Launch, Environment)> {
        let conditions = *env.conditions();
        let (launch, env) = match self {
            SweepParam::LaunchAngle => (Launch { angle_deg: value, ..*base }, *env),
            SweepParam::MuzzleVelocity => (Launch { muzzle_velocity: value, ..*base }, *env),
            SweepParam::WindSpeed => {
                (*base, Environment::try_new(Conditions { wind_speed_mps: value, ..conditions })?)
            }
            SweepParam::Temperature => {
                (*base, Environment::try_new(Conditions { temperature_c: value, ..conditions })?)
            }
            SweepParam::Altitude => {
                (*base, Environment::try_new(Conditions { altitude_m: value, ..conditions })?)
            }
        };
        launch.validate()?;
        Ok((launch, env))
    }
}

/// `start, start + step, …` up to and including `end` (with a little slack for
/// accumulated rounding). Empty when `end < start`.
pub fn sweep_values(start: f64, end: f64, step: f64) -> Result<Vec<f64>> {
    if !start.is_finite() {
        return Err(BallisticsError::invalid("sweep start", start, "must be finite"));
    }
    if !end.is_finite() {
        return Err(BallisticsError::invalid("sweep end", end, "must be finite"));
    }
    if !(step.is_finite() && step > 0.0) {
        return Err(BallisticsError::invalid("sweep step", step, "must be finite and > 0"));
    }
    if end < start {
        return Ok(Vec::new());
    }

    let span = (end - start) / step;
    if span >= MAX_SWEEP_VALUES as f64 {
        return Err(BallisticsError::invalid("sweep step", step, "produces too many values"));
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let n = (span + 1e-9).floor() as usize + 1;
    #[allow(clippy::cast_precision_loss)]
    let values = (0..n).map(|i| start + i as f64 * step).collect();
    Ok(values)
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SweepRun {
    pub value: f64,
    pub summary: Option<TrajectorySummary>,
    pub trajectory: Trajectory,
}

/// Integrate once per value of `param`, everything else taken from `base`
/// and `env`.
pub fn run_sweep(
    projectile: &Projectile,
    env: &Environment,
    base: &Launch,
    param: SweepParam,
    values: &[f64],
    opts: &IntegrateOpts,
) -> Result<Vec<SweepRun>> {
    opts.validate()?;
    let setups = values
        .iter()
        .map(|&v| param.apply(base, env, v))
        .collect::<Result<Vec<_>>>()?;

    let runs: Vec<SweepRun> = values
        .par_iter()
        .zip(setups.par_iter())
        .map(|(&value, (launch, env))| {
            let trajectory = integrate_with(projectile, env, launch, opts);
            SweepRun { value, summary: projectile.summarize(&trajectory), trajectory }
        })
        .collect();

    log::info!("sweep over {param:?}: {} runs", runs.len());
    Ok(runs)
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonteCarloConfig {
    pub runs: usize,
    /// Launch angle drawn uniformly from ±spread [deg]
    pub angle_spread_deg: f64,
    /// Muzzle velocity drawn uniformly from ±spread [m/s]
    pub velocity_spread_mps: f64,
    pub seed: u64,
}

impl Default for MonteCarloConfig {
    fn default() -> Self {
        Self { runs: 100, angle_spread_deg: 0.5, velocity_spread_mps: 5.0, seed: 0 }
    }
}

impl MonteCarloConfig {
    pub fn validate(&self, base: &Launch) -> Result<()> {
        if self.runs == 0 {
            return Err(BallisticsError::invalid("runs", 0.0, "must be at least 1"));
        }
        for (name, v) in [
            ("angle_spread_deg", self.angle_spread_deg),
            ("velocity_spread_mps", self.velocity_spread_mps),
        ] {
            // The draw range is 2 * spread wide and must stay finite.
            if !(v.is_finite() && v >= 0.0 && (2.0 * v).is_finite()) {
                return Err(BallisticsError::invalid(name, v, "must be finite and >= 0"));
            }
        }
        if self.angle_spread_deg > MAX_ANGLE_SPREAD_DEG {
            return Err(BallisticsError::invalid(
                "angle_spread_deg",
                self.angle_spread_deg,
                "must be <= 90",
            ));
        }
        if self.velocity_spread_mps >= base.muzzle_velocity {
            return Err(BallisticsError::invalid(
                "velocity_spread_mps",
                self.velocity_spread_mps,
                "must be smaller than the muzzle velocity",
            ));
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MonteCarloRun {
    pub launch_angle_deg: f64,
    pub muzzle_velocity_mps: f64,
    pub summary: Option<TrajectorySummary>,
}

/// Population statistics of one summary quantity.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DispersionStats {
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

impl DispersionStats {
    fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        #[allow(clippy::cast_precision_loss)]
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        let (min, max) = values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
        Some(Self { mean, std_dev: var.sqrt(), min, max })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Dispersion {
    pub distance: DispersionStats,
    pub max_height: DispersionStats,
    pub impact_velocity: DispersionStats,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MonteCarloReport {
    pub runs: Vec<MonteCarloRun>,
    /// Runs that produced no samples
    pub failed_runs: usize,
    pub dispersion: Option<Dispersion>,
}

/// Perturb `base` launch angle and velocity `cfg.runs` times and collect the
/// spread of the results. Same seed, same report.
pub fn run_monte_carlo(
    projectile: &Projectile,
    env: &Environment,
    base: &Launch,
    cfg: &MonteCarloConfig,
    opts: &IntegrateOpts,
) -> Result<MonteCarloReport> {
    base.validate()?;
    cfg.validate(base)?;
    opts.validate()?;

    // Draw sequentially so the sample set does not depend on thread scheduling.
    let mut rng = StdRng::seed_from_u64(cfg.seed);
    let a = cfg.angle_spread_deg;
    let dv = cfg.velocity_spread_mps;
    let launches: Vec<Launch> = (0..cfg.runs)
        .map(|_| Launch {
            angle_deg: base.angle_deg + rng.random_range(-a..=a),
            muzzle_velocity: base.muzzle_velocity + rng.random_range(-dv..=dv),
            ..*base
        })
        .collect();

    let runs: Vec<MonteCarloRun> = launches
        .par_iter()
        .map(|launch| {
            let trajectory = integrate_with(projectile, env, launch, opts);
            MonteCarloRun {
                launch_angle_deg: launch.angle_deg,
                muzzle_velocity_mps: launch.muzzle_velocity,
                summary: projectile.summarize(&trajectory),
            }
        })
        .collect();

    let summaries: Vec<&TrajectorySummary> = runs.iter().filter_map(|r| r.summary.as_ref()).collect();
    let failed_runs = runs.len() - summaries.len();
    if failed_runs > 0 {
        log::warn!("monte carlo: {failed_runs} of {} runs produced no samples", runs.len());
    }

    let column = |f: fn(&TrajectorySummary) -> f64| summaries.iter().map(|s| f(s)).collect::<Vec<_>>();
    let dispersion = match (
        DispersionStats::from_values(&column(|s| s.distance)),
        DispersionStats::from_values(&column(|s| s.max_height)),
        DispersionStats::from_values(&column(|s| s.impact_velocity)),
    ) {
        (Some(distance), Some(max_height), Some(impact_velocity)) => {
            Some(Dispersion { distance, max_height, impact_velocity })
        }
        _ => None,
    };

    if let Some(d) = &dispersion {
        log::info!(
            "monte carlo: {} runs, distance {:.1} ± {:.1} m",
            runs.len(),
            d.distance.mean,
            d.distance.std_dev
        );
    }

    Ok(MonteCarloReport { runs, failed_runs, dispersion })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ballistics_models::DragModel;

    fn bullet() -> Projectile {
        Projectile::new(0.0095, 0.00782, DragModel::G7).unwrap()
    }

    #[test]
    fn sweep_values_include_end() {
        let v = sweep_values(10.0, 20.0, 2.5).unwrap();
        assert_eq!(v, vec![10.0, 12.5, 15.0, 17.5, 20.0]);

        let v = sweep_values(0.0, 1.0, 0.1).unwrap();
        assert_eq!(v.len(), 11);
        assert_relative_eq!(v[10], 1.0, epsilon = 1e-12);

        assert_eq!(sweep_values(5.0, 5.0, 1.0).unwrap(), vec![5.0]);
        assert!(sweep_values(5.0, 4.0, 1.0).unwrap().is_empty());
    }

    #[test]
    fn sweep_values_rejects_bad_steps() {
        assert!(sweep_values(0.0, 10.0, 0.0).is_err());
        assert!(sweep_values(0.0, 10.0, -1.0).is_err());
        assert!(sweep_values(0.0, f64::INFINITY, 1.0).is_err());
        assert!(sweep_values(0.0, 1e9, 1e-3).is_err());
    }

    #[test]
    fn angle_sweep_keeps_order() {
        let values = [10.0, 30.0, 45.0];
        let runs = run_sweep(
            &bullet(),
            &Environment::standard(),
            &Launch::new(300.0, 0.0),
            SweepParam::LaunchAngle,
            &values,
            &IntegrateOpts::default(),
        )
        .unwrap();
        assert_eq!(runs.len(), 3);
        for (run, v) in runs.iter().zip(values) {
            assert_eq!(run.value, v);
            let first = run.trajectory.first().unwrap();
            assert_relative_eq!(first.vy, 300.0 * v.to_radians().sin(), epsilon = 1e-9);
        }
        let h: Vec<f64> = runs.iter().map(|r| r.summary.unwrap().max_height).collect();
        assert!(h[0] < h[1] && h[1] < h[2]);
    }

    #[test]
    fn velocity_sweep_rejects_non_positive_values() {
        let err = run_sweep(
            &bullet(),
            &Environment::standard(),
            &Launch::new(300.0, 30.0),
            SweepParam::MuzzleVelocity,
            &[100.0, 0.0],
            &IntegrateOpts::default(),
        );
        assert!(err.is_err());
    }

    #[test]
    fn monte_carlo_is_reproducible() {
        let cfg = MonteCarloConfig { runs: 16, seed: 7, ..MonteCarloConfig::default() };
        let env = Environment::standard();
        let base = Launch::new(300.0, 30.0);
        let a = run_monte_carlo(&bullet(), &env, &base, &cfg, &IntegrateOpts::default()).unwrap();
        let b = run_monte_carlo(&bullet(), &env, &base, &cfg, &IntegrateOpts::default()).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.runs.len(), 16);
        assert_eq!(a.failed_runs, 0);

        for run in &a.runs {
            assert!((run.launch_angle_deg - 30.0).abs() <= 0.5);
            assert!((run.muzzle_velocity_mps - 300.0).abs() <= 5.0);
        }
        let d = a.dispersion.unwrap();
        assert!(d.distance.min <= d.distance.mean && d.distance.mean <= d.distance.max);
        assert!(d.distance.std_dev > 0.0);
    }

    #[test]
    fn zero_spread_collapses_dispersion() {
        let cfg = MonteCarloConfig { runs: 4, angle_spread_deg: 0.0, velocity_spread_mps: 0.0, seed: 1 };
        let report = run_monte_carlo(
            &bullet(),
            &Environment::standard(),
            &Launch::new(250.0, 20.0),
            &cfg,
            &IntegrateOpts::default(),
        )
        .unwrap();
        let d = report.dispersion.unwrap();
        assert!(d.distance.std_dev < 1e-9);
        assert_eq!(d.distance.min, d.distance.max);
    }

    #[test]
    fn monte_carlo_validates_config() {
        let env = Environment::standard();
        let base = Launch::new(100.0, 30.0);
        let opts = IntegrateOpts::default();
        let zero_runs = MonteCarloConfig { runs: 0, ..MonteCarloConfig::default() };
        assert!(run_monte_carlo(&bullet(), &env, &base, &zero_runs, &opts).is_err());
        let negative = MonteCarloConfig { angle_spread_deg: -1.0, ..MonteCarloConfig::default() };
        assert!(run_monte_carlo(&bullet(), &env, &base, &negative, &opts).is_err());
        let too_wide = MonteCarloConfig { velocity_spread_mps: 100.0, ..MonteCarloConfig::default() };
        assert!(run_monte_carlo(&bullet(), &env, &base, &too_wide, &opts).is_err());
    }

    #[test]
    fn huge_spreads_are_rejected_not_drawn() {
        let env = Environment::standard();
        let base = Launch::new(1e308, 30.0);
        let opts = IntegrateOpts::default();
        let wide_angle = MonteCarloConfig { runs: 2, angle_spread_deg: 1e308, ..MonteCarloConfig::default() };
        assert!(matches!(
            run_monte_carlo(&bullet(), &env, &base, &wide_angle, &opts),
            Err(BallisticsError::InvalidParameter { name: "angle_spread_deg", .. })
        ));
        let past_vertical = MonteCarloConfig { runs: 2, angle_spread_deg: 91.0, ..MonteCarloConfig::default() };
        assert!(run_monte_carlo(&bullet(), &env, &base, &past_vertical, &opts).is_err());
        let wide_velocity = MonteCarloConfig { runs: 2, velocity_spread_mps: 1e308, ..MonteCarloConfig::default() };
        assert!(matches!(
            run_monte_carlo(&bullet(), &env, &base, &wide_velocity, &opts),
            Err(BallisticsError::InvalidParameter { name: "velocity_spread_mps", .. })
        ));
    }

    #[test]
    fn batch_runs_reject_loosened_caps() {
        let env = Environment::standard();
        let base = Launch::new(300.0, 30.0);
        let frozen = IntegrateOpts { dt_min: 0.0, dt_max: 0.0, max_steps: usize::MAX, ..IntegrateOpts::default() };
        assert!(run_sweep(&bullet(), &env, &base, SweepParam::LaunchAngle, &[10.0], &frozen).is_err());
        let cfg = MonteCarloConfig { runs: 2, ..MonteCarloConfig::default() };
        assert!(run_monte_carlo(&bullet(), &env, &base, &cfg, &frozen).is_err());
        let no_time = IntegrateOpts { max_time: 0.0, ..IntegrateOpts::default() };
        assert!(run_sweep(&bullet(), &env, &base, SweepParam::LaunchAngle, &[10.0], &no_time).is_err());
    }

    #[test]
    fn environment_sweeps_rebuild_the_air() {
        let env = Environment::standard();
        let base = Launch::new(300.0, 30.0);
        let opts = IntegrateOpts::default();

        let runs = run_sweep(&bullet(), &env, &base, SweepParam::Altitude, &[0.0, 3000.0], &opts).unwrap();
        let d: Vec<f64> = runs.iter().map(|r| r.summary.unwrap().distance).collect();
        assert!(d[1] > d[0], "{d:?}");

        let runs = run_sweep(&bullet(), &env, &base, SweepParam::Temperature, &[-20.0, 40.0], &opts).unwrap();
        let d: Vec<f64> = runs.iter().map(|r| r.summary.unwrap().distance).collect();
        assert!(d[1] > d[0], "{d:?}");

        let runs = run_sweep(&bullet(), &env, &base, SweepParam::WindSpeed, &[0.0, 10.0], &opts).unwrap();
        let d: Vec<f64> = runs.iter().map(|r| r.summary.unwrap().distance).collect();
        assert!(d[1] > d[0], "{d:?}");

        assert!(run_sweep(&bullet(), &env, &base, SweepParam::WindSpeed, &[-1.0], &opts).is_err());
    }

    #[test]
    fn population_std_dev() {
        let s = DispersionStats::from_values(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert_relative_eq!(s.mean, 5.0);
        assert_relative_eq!(s.std_dev, 2.0);
        assert_eq!(s.min, 2.0);
        assert_eq!(s.max, 9.0);
        assert!(DispersionStats::from_values(&[]).is_none());
    }
}
