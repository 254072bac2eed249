//! Motor thrust and propellant mass over time.
//!
//! A single-stage profile interpolates one `(time, thrust)` curve up to its
//! burn time. A staged profile chains stages back to back: each stage owns a
//! burn window `[start, start + burn_time)`, a curve read on local time and a
//! mass loss spent linearly across that window.

use ballistics_core::interp;

/// `(time s, thrust N)` breakpoints, kept sorted by time.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ThrustCurve {
    points: Vec<(f64, f64)>,
}

impl ThrustCurve {
    pub fn new(mut points: Vec<(f64, f64)>) -> Self {
        interp::sort_points(&mut points);
        Self { points }
    }

    /// Constant thrust from t = 0.
    pub fn constant(thrust: f64) -> Self {
        Self { points: vec![(0.0, thrust)] }
    }

    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    /// Clamped piecewise-linear thrust [N] at local time `t`.
    pub fn at(&self, t: f64) -> f64 {
        interp::interpolate_curve(t, &self.points)
    }
}

impl From<Vec<(f64, f64)>> for ThrustCurve {
    fn from(points: Vec<(f64, f64)>) -> Self {
        Self::new(points)
    }
}

/// One stage of a staged motor.
#[derive(Clone, Debug, PartialEq)]
pub struct Stage {
    pub burn_time: f64,
    pub mass_loss: f64,
    pub curve: ThrustCurve,
}

impl Stage {
    pub fn new(burn_time: f64, mass_loss: f64, curve: impl Into<ThrustCurve>) -> Self {
        Self { burn_time, mass_loss, curve: curve.into() }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ThrustProfile {
    Single {
        burn_time: f64,
        curve: ThrustCurve,
        /// Mass spent over the burn [kg]; the motor ends at `initial - propellant_mass`.
        propellant_mass: f64,
    },
    Staged(Vec<Stage>),
}

impl ThrustProfile {
    pub fn single_stage(burn_time: f64, curve: impl Into<ThrustCurve>, propellant_mass: f64) -> Self {
        ThrustProfile::Single { burn_time, curve: curve.into(), propellant_mass }
    }

    pub fn staged(stages: Vec<Stage>) -> Self {
        ThrustProfile::Staged(stages)
    }

    /// Total powered time [s].
    pub fn burn_time(&self) -> f64 {
        match self {
            ThrustProfile::Single { burn_time, .. } => *burn_time,
            ThrustProfile::Staged(stages) => stages.iter().map(|s| s.burn_time).sum(),
        }
    }

    /// Mass spent by the end of the burn [kg].
    pub fn total_mass_loss(&self) -> f64 {
        match self {
            ThrustProfile::Single { propellant_mass, .. } => *propellant_mass,
            ThrustProfile::Staged(stages) => stages.iter().map(|s| s.mass_loss).sum(),
        }
    }

    /// Thrust [N] at flight time `t`.
    pub fn thrust(&self, t: f64) -> f64 {
        match self {
            ThrustProfile::Single { burn_time, curve, .. } => {
                if t > *burn_time {
                    0.0
                } else {
                    curve.at(t)
                }
            }
            ThrustProfile::Staged(stages) => {
                let mut start = 0.0;
                for stage in stages {
                    let end = start + stage.burn_time;
                    if start <= t && t < end {
                        return stage.curve.at(t - start);
                    }
                    start = end;
                }
                0.0
            }
        }
    }

    /// Mass [kg] at flight time `t` for a vehicle that launched at `initial_mass`.
    pub fn mass(&self, t: f64, initial_mass: f64) -> f64 {
        let t = t.max(0.0);
        match self {
            ThrustProfile::Single { burn_time, propellant_mass, .. } => {
                if *burn_time <= 0.0 {
                    initial_mass
                } else if t > *burn_time {
                    initial_mass - propellant_mass
                } else {
                    initial_mass - propellant_mass * (t / burn_time)
                }
            }
            ThrustProfile::Staged(stages) => {
                let mut start = 0.0;
                let mut baseline = initial_mass;
                for stage in stages {
                    let end = start + stage.burn_time;
                    if start <= t && t < end {
                        return baseline - stage.mass_loss * ((t - start) / stage.burn_time);
                    }
                    baseline -= stage.mass_loss;
                    start = end;
                }
                baseline
            }
        }
    }
}
