//! JSON input record for one calculation.
//!
//! A `RunConfig` is what a UI or preset file hands over: SI values, a drag
//! model name, and for rockets either a single thrust curve `{time: thrust}`
//! or a list of stages. `build()` validates it and produces the immutable
//! value objects the integrator takes.

use std::collections::BTreeMap;

use ballistics_core::{require_non_negative, BallisticsError, Conditions, Environment, Result};
use ballistics_models::{DragCurve, DragModel, Stage, ThrustProfile};
use serde::{Deserialize, Serialize};

use crate::integrator::{integrate_with, IntegrateOpts, Launch};
use crate::projectile::{Projectile, ProjectileKind};
use crate::trajectory::{Trajectory, TrajectorySummary};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DragModelName {
    #[serde(alias = "g1")]
    G1,
    #[default]
    #[serde(alias = "g7")]
    G7,
    #[serde(rename = "rocket", alias = "Rocket")]
    Rocket,
    #[serde(rename = "mortar", alias = "Mortar")]
    Mortar,
    #[serde(rename = "custom", alias = "Custom")]
    Custom,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageConfig {
    pub burn_time_s: f64,
    pub mass_loss_kg: f64,
    /// `{"time": thrust}`
    pub thrust_curve: BTreeMap<String, f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub mass_kg: f64,
    pub diameter_m: f64,
    pub drag_model: DragModelName,
    /// `[[velocity, Cd], ...]`, required for the custom model
    pub custom_drag_curve: Option<Vec<(f64, f64)>>,
    pub projectile_type: ProjectileKind,
    pub muzzle_velocity_mps: f64,
    pub launch_angle_deg: f64,
    pub target_elevation_offset_m: f64,
    pub environment: Conditions,

    // Rocket motor: `stages` wins over the single-stage fields when non-empty.
    pub burn_time_s: f64,
    pub thrust_curve: BTreeMap<String, f64>,
    pub propellant_mass_kg: f64,
    pub stages: Vec<StageConfig>,

    pub integration: IntegrateOpts,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            mass_kg: 0.01,
            diameter_m: 0.01,
            drag_model: DragModelName::G7,
            custom_drag_curve: None,
            projectile_type: ProjectileKind::Bullet,
            muzzle_velocity_mps: 800.0,
            launch_angle_deg: 45.0,
            target_elevation_offset_m: 0.0,
            environment: Conditions::default(),
            burn_time_s: 0.0,
            thrust_curve: BTreeMap::new(),
            propellant_mass_kg: 0.0,
            stages: Vec::new(),
            integration: IntegrateOpts::default(),
        }
    }
}

/// Validated inputs, ready to integrate.
#[derive(Clone, Debug, PartialEq)]
pub struct Run {
    pub projectile: Projectile,
    pub environment: Environment,
    pub launch: Launch,
    pub opts: IntegrateOpts,
}

impl Run {
    pub fn integrate(&self) -> Trajectory {
        integrate_with(&self.projectile, &self.environment, &self.launch, &self.opts)
    }

    pub fn summarize(&self, trajectory: &Trajectory) -> Option<TrajectorySummary> {
        self.projectile.summarize(trajectory)
    }
}

impl RunConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validate every field and build the run's value objects.
    pub fn build(&self) -> Result<Run> {
        let projectile = Projectile::new(self.mass_kg, self.diameter_m, self.drag()?)?
            .with_kind(self.projectile_type);
        let projectile = if self.projectile_type.is_powered() {
            projectile.with_thrust(self.thrust_profile()?)?
        } else {
            projectile
        };

        let environment = Environment::try_new(self.environment)?;

        let launch = Launch::new(self.muzzle_velocity_mps, self.launch_angle_deg)
            .with_target_elevation(self.target_elevation_offset_m);
        launch.validate()?;
        self.integration.validate()?;

        Ok(Run { projectile, environment, launch, opts: self.integration })
    }

    fn drag(&self) -> Result<DragModel> {
        Ok(match self.drag_model {
            DragModelName::G1 => DragModel::G1,
            DragModelName::G7 => DragModel::G7,
            DragModelName::Rocket => DragModel::Rocket,
            DragModelName::Mortar => DragModel::Mortar,
            DragModelName::Custom => {
                let points = self
                    .custom_drag_curve
                    .clone()
                    .ok_or(BallisticsError::MissingField("custom_drag_curve"))?;
                if let Some((v, cd)) = points.iter().find(|(v, cd)| !v.is_finite() || !cd.is_finite()) {
                    return Err(BallisticsError::curve("drag", format!("non-finite point ({v}, {cd})")));
                }
                DragModel::Custom(DragCurve::new(points))
            }
        })
    }

    fn thrust_profile(&self) -> Result<ThrustProfile> {
        if self.stages.is_empty() {
            require_non_negative("burn_time_s", self.burn_time_s)?;
            return Ok(ThrustProfile::single_stage(
                self.burn_time_s,
                parse_curve(&self.thrust_curve)?,
                self.propellant_mass_kg,
            ));
        }
        let stages = self
            .stages
            .iter()
            .map(|s| Ok(Stage::new(s.burn_time_s, s.mass_loss_kg, parse_curve(&s.thrust_curve)?)))
            .collect::<Result<Vec<_>>>()?;
        Ok(ThrustProfile::staged(stages))
    }
}

/// `{"0": 2000, "1.2": 0}` → `[(0.0, 2000.0), (1.2, 0.0)]`
fn parse_curve(map: &BTreeMap<String, f64>) -> Result<Vec<(f64, f64)>> {
    map.iter()
        .map(|(k, &thrust)| {
            let t: f64 = k
                .trim()
                .parse()
                .map_err(|_| BallisticsError::curve("thrust", format!("time key `{k}` is not a number")))?;
            Ok((t, thrust))
        })
        .collect()
}
