//! ballistics-models
//!
//! Aerodynamic and propulsion models consumed by the point-mass solver:
//!
//!   - `drag`: Mach-bucketed drag coefficient tables for the standard G1/G7,
//!     rocket and mortar shapes, plus arbitrary user `(velocity, Cd)` curves.
//!   - `thrust`: piecewise-linear thrust and mass depletion over burn time,
//!     single-stage or staged.
//!
//! Everything here is a pure function of its inputs.

pub mod drag;
pub mod thrust;

pub use drag::{drag_coefficient, mach, DragCurve, DragModel};
pub use thrust::{Stage, ThrustCurve, ThrustProfile};
