//! Core ballistics math utilities
//!
//! Includes:
//! - Physical constants shared by every crate in the workspace
//! - Curve interpolation helpers
//! - Air density (empirical formula + ISA table mode)
//! - Wind representation
//! - Coriolis parameter
//! - Firing `Environment` built from serde `Conditions`

use serde::{Deserialize, Serialize};

pub mod atmosphere;
mod error;
pub mod interp;

pub use atmosphere::{air_density, isa_conditions, AIR_DENSITY_FLOOR};
pub use error::{require_non_negative, require_positive, BallisticsError, Result};
pub use interp::{interpolate_curve, lerp};

/// -------------------------
/// Constants
/// -------------------------

/// Standard gravity [m/s²]
pub const GRAVITY: f64 = 9.80665;
/// Earth rotation rate [rad/s]
pub const EARTH_ROTATION_RATE: f64 = 7.292115e-5;
/// Speed of sound used for every Mach lookup [m/s]
pub const SPEED_OF_SOUND: f64 = 343.0;

/// -------------------------
/// Wind
/// -------------------------

/// Wind in the firing plane.
///
/// The angle is measured from the +x (downrange) axis toward +y (up), so
/// 0° blows downrange, 180° is a headwind and 90° an updraft.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    pub speed_mps: f64,
    pub angle_deg: f64,
}

impl Wind {
    pub fn new(speed_mps: f64, angle_deg: f64) -> Self {
        Self { speed_mps, angle_deg }
    }

    /// Downrange component [m/s]
    pub fn along_range(&self) -> f64 {
        self.speed_mps * self.angle_deg.to_radians().cos()
    }

    /// Vertical component [m/s]
    pub fn vertical(&self) -> f64 {
        self.speed_mps * self.angle_deg.to_radians().sin()
    }

    /// `(wx, wy)` in the firing plane [m/s]
    pub fn components(&self) -> (f64, f64) {
        (self.along_range(), self.vertical())
    }
}

/// -------------------------
/// Coriolis Effect
/// -------------------------

/// Planar Coriolis parameter `2Ω·sin(latitude)` [1/s].
///
/// The integrator applies it as `ax += f·vy`, `ay -= f·vx`.
pub fn coriolis_parameter(latitude_deg: f64) -> f64 {
    2.0 * EARTH_ROTATION_RATE * latitude_deg.to_radians().sin()
}

/// -------------------------
/// Environment
/// -------------------------

/// Raw firing conditions as a caller (or a JSON preset) supplies them.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Conditions {
    pub altitude_m: f64,
    pub temperature_c: f64,
    pub pressure_hpa: f64,
    pub humidity_pct: f64,
    pub wind_speed_mps: f64,
    pub wind_angle_deg: f64,
    pub coriolis: bool,
    pub latitude_deg: f64,
    /// Take temperature and pressure from the ISA table instead of the fields above.
    pub dynamic_air: bool,
}

impl Default for Conditions {
    fn default() -> Self {
        Self {
            altitude_m: 0.0,
            temperature_c: 15.0,
            pressure_hpa: 1013.25,
            humidity_pct: 50.0,
            wind_speed_mps: 0.0,
            wind_angle_deg: 0.0,
            coriolis: false,
            latitude_deg: 45.0,
            dynamic_air: false,
        }
    }
}

impl Conditions {
    /// Reject conditions the atmosphere formula cannot give a meaning to.
    pub fn validate(&self) -> Result<()> {
        let finite = [
            ("altitude_m", self.altitude_m),
            ("temperature_c", self.temperature_c),
            ("pressure_hpa", self.pressure_hpa),
            ("humidity_pct", self.humidity_pct),
            ("wind_speed_mps", self.wind_speed_mps),
            ("wind_angle_deg", self.wind_angle_deg),
            ("latitude_deg", self.latitude_deg),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(BallisticsError::invalid(name, value, "must be finite"));
            }
        }
        if self.pressure_hpa <= 0.0 {
            return Err(BallisticsError::invalid("pressure_hpa", self.pressure_hpa, "must be > 0"));
        }
        if self.temperature_c <= -273.15 {
            return Err(BallisticsError::invalid(
                "temperature_c",
                self.temperature_c,
                "must be above absolute zero",
            ));
        }
        if !(0.0..=100.0).contains(&self.humidity_pct) {
            return Err(BallisticsError::invalid("humidity_pct", self.humidity_pct, "must be within 0..=100"));
        }
        if self.wind_speed_mps < 0.0 {
            return Err(BallisticsError::invalid("wind_speed_mps", self.wind_speed_mps, "must be >= 0"));
        }
        Ok(())
    }
}

/// Immutable environment for one calculation. Air density is derived once here.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Environment {
    conditions: Conditions,
    wind: Wind,
    air_density: f64,
}

impl Environment {
    pub fn new(conditions: Conditions) -> Self {
        let air_density = air_density(
            conditions.temperature_c,
            conditions.pressure_hpa,
            conditions.humidity_pct,
            conditions.altitude_m,
            conditions.dynamic_air,
        );
        Self {
            conditions,
            wind: Wind::new(conditions.wind_speed_mps, conditions.wind_angle_deg),
            air_density,
        }
    }

    /// Validate first, then build.
    pub fn try_new(conditions: Conditions) -> Result<Self> {
        conditions.validate()?;
        Ok(Self::new(conditions))
    }

    /// Sea level, 15 °C, 1013.25 hPa, 50 % humidity, still air.
    pub fn standard() -> Self {
        Self::new(Conditions::default())
    }

    pub fn conditions(&self) -> &Conditions { &self.conditions }
    pub fn wind(&self) -> Wind { self.wind }
    pub fn air_density(&self) -> f64 { self.air_density }
    pub fn coriolis_enabled(&self) -> bool { self.conditions.coriolis }
    pub fn latitude_deg(&self) -> f64 { self.conditions.latitude_deg }
}

impl Default for Environment {
    fn default() -> Self {
        Self::standard()
    }
}

/* -------------------------------- tests -------------------------------- */
