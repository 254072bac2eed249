//! Launch angle for a given target distance.
//!
//! Coarse scan over the angle window, then bisection between the best scan
//! angle and a neighbour whose miss has the opposite sign.

use ballistics_core::{require_positive, BallisticsError, Environment, Result};
use serde::{Deserialize, Serialize};

use crate::integrator::{integrate, Launch};
use crate::projectile::Projectile;
use crate::sweep::sweep_values;

const BISECTION_ITERS: usize = 40;

/// Search window and acceptance tolerance.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AngleSearch {
    pub min_deg: f64,
    pub max_deg: f64,
    pub step_deg: f64,
    /// Accept a solution once |impact distance − target| ≤ tolerance [m]
    pub tolerance_m: f64,
    pub target_elevation_offset_m: f64,
}

impl Default for AngleSearch {
    fn default() -> Self {
        Self {
            min_deg: 35.0,
            max_deg: 85.0,
            step_deg: 0.5,
            tolerance_m: 1.0,
            target_elevation_offset_m: 0.0,
        }
    }
}

impl AngleSearch {
    pub fn validate(&self) -> Result<()> {
        require_positive("step_deg", self.step_deg)?;
        require_positive("tolerance_m", self.tolerance_m)?;
        if !(self.min_deg.is_finite() && self.max_deg.is_finite() && self.min_deg <= self.max_deg) {
            return Err(BallisticsError::invalid(
                "max_deg",
                self.max_deg,
                "angle window must be finite with min_deg <= max_deg",
            ));
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AimSolution {
    pub angle_deg: f64,
    /// Downrange position of the final sample at `angle_deg` [m]
    pub impact_distance: f64,
    /// |impact_distance − target| [m]
    pub miss_m: f64,
    /// `miss_m` is within the search tolerance
    pub converged: bool,
}

/// Best launch angle for `target_distance`.
///
/// Returns the closest angle found even when the tolerance is not met
/// (`converged == false`); `None` only when no angle in the window produced a
/// trajectory.
pub fn solve_launch_angle(
    projectile: &Projectile,
    env: &Environment,
    muzzle_velocity: f64,
    target_distance: f64,
    search: &AngleSearch,
) -> Result<Option<AimSolution>> {
    require_positive("target_distance", target_distance)?;
    search.validate()?;
    Launch::new(muzzle_velocity, search.min_deg)
        .with_target_elevation(search.target_elevation_offset_m)
        .validate()?;

    // Signed miss: positive when the shot lands long.
    let miss = |angle: f64| -> Option<(f64, f64)> {
        let launch = Launch::new(muzzle_velocity, angle)
            .with_target_elevation(search.target_elevation_offset_m);
        let x = integrate(projectile, env, &launch).last()?.x;
        Some((x, x - target_distance))
    };
    let solution = |angle: f64, x: f64, signed: f64| AimSolution {
        angle_deg: angle,
        impact_distance: x,
        miss_m: signed.abs(),
        converged: signed.abs() <= search.tolerance_m,
    };

    let angles = sweep_values(search.min_deg, search.max_deg, search.step_deg)?;
    let mut scanned: Vec<(f64, f64, f64)> = Vec::with_capacity(angles.len());
    for angle in angles {
        let Some((x, m)) = miss(angle) else { continue };
        if m.abs() <= search.tolerance_m {
            log::debug!("aim: {angle:.2} deg within tolerance on the scan (miss {:.3} m)", m.abs());
            return Ok(Some(solution(angle, x, m)));
        }
        scanned.push((angle, x, m));
    }

    let Some(best_idx) = (0..scanned.len()).min_by(|&a, &b| scanned[a].2.abs().total_cmp(&scanned[b].2.abs()))
    else {
        return Ok(None);
    };
    let (best_angle, best_x, best_m) = scanned[best_idx];
    let mut best = solution(best_angle, best_x, best_m);

    // Neighbour on the other side of the target, closest first.
    let neighbour = [best_idx.checked_sub(1), Some(best_idx + 1)]
        .into_iter()
        .flatten()
        .filter_map(|i| scanned.get(i))
        .filter(|n| n.2.signum() != best_m.signum())
        .min_by(|a, b| a.2.abs().total_cmp(&b.2.abs()))
        .copied();

    if let Some((n_angle, _, _)) = neighbour {
        let (mut lo, mut m_lo) = (best_angle, best_m);
        let mut hi = n_angle;
        for _ in 0..BISECTION_ITERS {
            let mid = 0.5 * (lo + hi);
            let Some((x, m)) = miss(mid) else { break };
            if m.abs() < best.miss_m {
                best = solution(mid, x, m);
            }
            if best.converged {
                break;
            }
            if m.signum() == m_lo.signum() {
                lo = mid;
                m_lo = m;
            } else {
                hi = mid;
            }
        }
    }

    if best.converged {
        log::debug!("aim: {:.4} deg, miss {:.3} m", best.angle_deg, best.miss_m);
    } else {
        log::warn!(
            "aim: no angle in [{}, {}] deg within {} m of {target_distance} m (best miss {:.2} m)",
            search.min_deg,
            search.max_deg,
            search.tolerance_m,
            best.miss_m
        );
    }
    Ok(Some(best))
}
