use std::f64::consts::PI;

use ballistics_core::{require_non_negative, require_positive, BallisticsError, Result};
use ballistics_models::{DragModel, ThrustProfile};
use serde::{Deserialize, Serialize};

use crate::trajectory::{Trajectory, TrajectorySummary};

/// Mass never drops below this during depletion [kg]
const MIN_MASS: f64 = 1e-6;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectileKind {
    #[default]
    #[serde(alias = "Bullet")]
    Bullet,
    #[serde(alias = "Rocket")]
    Rocket,
    #[serde(alias = "Mortar")]
    Mortar,
}

impl ProjectileKind {
    /// Only rockets carry a motor.
    pub fn is_powered(self) -> bool {
        matches!(self, ProjectileKind::Rocket)
    }
}

/// Physical projectile parameters, fixed for a run.
#[derive(Clone, Debug, PartialEq)]
pub struct Projectile {
    /// Launch mass [kg]
    mass: f64,
    /// Reference diameter [m]
    diameter: f64,
    /// Reference area S = π (d/2)^2 [m^2]
    area: f64,
    drag: DragModel,
    kind: ProjectileKind,
    thrust: Option<ThrustProfile>,
}

impl Projectile {
    pub fn new(mass: f64, diameter: f64, drag: DragModel) -> Result<Self> {
        let mass = require_positive("mass", mass)?;
        let diameter = require_positive("diameter", diameter)?;
        Ok(Self {
            mass,
            diameter,
            area: PI * (0.5 * diameter).powi(2),
            drag,
            kind: ProjectileKind::Bullet,
            thrust: None,
        })
    }

    #[must_use]
    pub fn with_kind(mut self, kind: ProjectileKind) -> Self {
        self.kind = kind;
        self
    }

    /// Attach a motor. Rejects negative burn times or mass losses and any
    /// profile that would burn the whole launch mass.
    pub fn with_thrust(mut self, profile: ThrustProfile) -> Result<Self> {
        match &profile {
            ThrustProfile::Single { burn_time, curve, propellant_mass } => {
                require_non_negative("burn_time", *burn_time)?;
                require_non_negative("propellant_mass", *propellant_mass)?;
                check_curve(curve.points())?;
            }
            ThrustProfile::Staged(stages) => {
                for stage in stages {
                    require_non_negative("stage burn_time", stage.burn_time)?;
                    require_non_negative("stage mass_loss", stage.mass_loss)?;
                    check_curve(stage.curve.points())?;
                }
            }
        }
        let loss = profile.total_mass_loss();
        if loss >= self.mass {
            return Err(BallisticsError::invalid(
                "total mass loss",
                loss,
                "must be smaller than the launch mass",
            ));
        }
        self.thrust = Some(profile);
        Ok(self)
    }

    pub fn mass(&self) -> f64 { self.mass }
    pub fn diameter(&self) -> f64 { self.diameter }
    pub fn area(&self) -> f64 { self.area }
    pub fn drag_model(&self) -> &DragModel { &self.drag }
    pub fn kind(&self) -> ProjectileKind { self.kind }
    pub fn thrust_profile(&self) -> Option<&ThrustProfile> { self.thrust.as_ref() }

    /// Powered = a rocket with a motor attached.
    pub fn is_powered(&self) -> bool {
        self.kind.is_powered() && self.thrust.is_some()
    }

    /// Powered flight time [s]; 0 for unpowered projectiles.
    pub fn burn_time(&self) -> f64 {
        self.powered_profile().map_or(0.0, ThrustProfile::burn_time)
    }

    /// Motor thrust [N] at time `t`.
    pub fn thrust_at(&self, t: f64) -> f64 {
        self.powered_profile().map_or(0.0, |p| p.thrust(t))
    }

    /// Mass [kg] at time `t`; constant unless powered.
    pub fn mass_at(&self, t: f64) -> f64 {
        match self.powered_profile() {
            Some(profile) => profile.mass(t, self.mass).max(MIN_MASS),
            None => self.mass,
        }
    }

    /// Summary using the mass the projectile has at its final sample.
    pub fn summarize(&self, trajectory: &Trajectory) -> Option<TrajectorySummary> {
        let t_end = trajectory.last()?.t;
        trajectory.summary(self.mass_at(t_end))
    }

    fn powered_profile(&self) -> Option<&ThrustProfile> {
        if self.kind.is_powered() {
            self.thrust.as_ref()
        } else {
            None
        }
    }
}

fn check_curve(points: &[(f64, f64)]) -> Result<()> {
    match points.iter().find(|(t, f)| !t.is_finite() || !f.is_finite()) {
        Some((t, f)) => Err(BallisticsError::curve("thrust", format!("non-finite point ({t}, {f})"))),
        None => Ok(()),
    }
}
