//! Drag coefficient lookup.
//!
//! Standard models are step functions of Mach (`v / 343`): each table lists
//! buckets from the highest Mach down, and a bucket applies from its
//! threshold upward. Below the last threshold the model's floor value is
//! returned. Custom models interpolate a user curve indexed by velocity.

use ballistics_core::{interp, SPEED_OF_SOUND};

/// Mach number for an air-relative speed [m/s].
#[inline]
pub fn mach(velocity: f64) -> f64 {
    velocity / SPEED_OF_SOUND
}

/// One step of a drag table: `cd` applies for Mach >= `mach_min`.
///
/// Inclusive thresholds move every exact-threshold value one bucket up
/// compared with a strict `>` lookup, e.g. G1 at exactly Mach 1.0 (343 m/s)
/// gives 0.31 rather than 0.30.
#[derive(Clone, Copy)]
struct Bucket {
    mach_min: f64,
    cd: f64,
}

/// A full table: buckets ordered high->low plus the subsonic floor value.
struct Table {
    buckets: &'static [Bucket],
    floor: f64,
}

#[inline]
fn eval_table(mach: f64, table: &Table) -> f64 {
    // NaN compares false everywhere and falls through to the floor.
    table
        .buckets
        .iter()
        .find(|b| mach >= b.mach_min)
        .map_or(table.floor, |b| b.cd)
}

/* --------------------------------- G1 ---------------------------------- */

const G1_TABLE: Table = Table {
    buckets: &[
        Bucket { mach_min: 4.0, cd: 0.45 },
        Bucket { mach_min: 3.0, cd: 0.42 },
        Bucket { mach_min: 2.5, cd: 0.40 },
        Bucket { mach_min: 2.0, cd: 0.38 },
        Bucket { mach_min: 1.5, cd: 0.35 },
        Bucket { mach_min: 1.2, cd: 0.33 },
        Bucket { mach_min: 1.0, cd: 0.31 },
        Bucket { mach_min: 0.9, cd: 0.30 },
        Bucket { mach_min: 0.8, cd: 0.29 },
        Bucket { mach_min: 0.7, cd: 0.28 },
        Bucket { mach_min: 0.6, cd: 0.27 },
    ],
    floor: 0.25,
};

/* --------------------------------- G7 ---------------------------------- */

const G7_TABLE: Table = Table {
    buckets: &[
        Bucket { mach_min: 4.0, cd: 0.38 },
        Bucket { mach_min: 3.0, cd: 0.36 },
        Bucket { mach_min: 2.5, cd: 0.34 },
        Bucket { mach_min: 2.0, cd: 0.32 },
        Bucket { mach_min: 1.5, cd: 0.30 },
        Bucket { mach_min: 1.2, cd: 0.28 },
        Bucket { mach_min: 1.0, cd: 0.26 },
        Bucket { mach_min: 0.9, cd: 0.25 },
        Bucket { mach_min: 0.8, cd: 0.24 },
        Bucket { mach_min: 0.7, cd: 0.23 },
        Bucket { mach_min: 0.6, cd: 0.22 },
    ],
    floor: 0.21,
};

/* ------------------------------- rocket -------------------------------- */

const ROCKET_TABLE: Table = Table {
    buckets: &[
        Bucket { mach_min: 3.0, cd: 0.50 },
        Bucket { mach_min: 2.0, cd: 0.45 },
        Bucket { mach_min: 1.5, cd: 0.40 },
        Bucket { mach_min: 1.0, cd: 0.35 },
        Bucket { mach_min: 0.8, cd: 0.30 },
    ],
    floor: 0.25,
};

/* ------------------------------- mortar -------------------------------- */

const MORTAR_TABLE: Table = Table {
    buckets: &[
        Bucket { mach_min: 1.5, cd: 0.55 },
        Bucket { mach_min: 1.0, cd: 0.50 },
        Bucket { mach_min: 0.8, cd: 0.45 },
    ],
    floor: 0.40,
};

/* ------------------------------- custom -------------------------------- */

/// User-supplied `(velocity m/s, Cd)` curve, kept sorted by velocity.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DragCurve {
    points: Vec<(f64, f64)>,
}

impl DragCurve {
    pub fn new(mut points: Vec<(f64, f64)>) -> Self {
        interp::sort_points(&mut points);
        Self { points }
    }

    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    /// Clamped linear interpolation; `< 2` points gives the single value or 0.
    pub fn coefficient(&self, velocity: f64) -> f64 {
        interp::interpolate_curve(velocity, &self.points)
    }
}

impl From<Vec<(f64, f64)>> for DragCurve {
    fn from(points: Vec<(f64, f64)>) -> Self {
        Self::new(points)
    }
}

/* ------------------------------ dispatch ------------------------------- */

/// Closed set of drag models.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum DragModel {
    G1,
    #[default]
    G7,
    Rocket,
    Mortar,
    Custom(DragCurve),
}

impl DragModel {
    /// Drag coefficient at an air-relative speed [m/s].
    pub fn drag_coefficient(&self, velocity: f64) -> f64 {
        match self {
            DragModel::G1 => eval_table(mach(velocity), &G1_TABLE),
            DragModel::G7 => eval_table(mach(velocity), &G7_TABLE),
            DragModel::Rocket => eval_table(mach(velocity), &ROCKET_TABLE),
            DragModel::Mortar => eval_table(mach(velocity), &MORTAR_TABLE),
            DragModel::Custom(curve) => curve.coefficient(velocity),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DragModel::G1 => "G1",
            DragModel::G7 => "G7",
            DragModel::Rocket => "rocket",
            DragModel::Mortar => "mortar",
            DragModel::Custom(_) => "custom",
        }
    }
}

/// Free-function form of [`DragModel::drag_coefficient`].
pub fn drag_coefficient(model: &DragModel, velocity: f64) -> f64 {
    model.drag_coefficient(velocity)
}

/* -------------------------------- tests -------------------------------- */
