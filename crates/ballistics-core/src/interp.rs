//! Piecewise-linear interpolation over `(x, y)` breakpoints.
//!
//! Shared by custom drag curves, thrust curves and the ISA table.

/// Linear interpolation between `(x0, y0)` and `(x1, y1)` at `x`.
///
/// A zero-width segment returns `y0`.
#[inline]
pub fn lerp(x: f64, x0: f64, x1: f64, y0: f64, y1: f64) -> f64 {
    if x1 == x0 {
        return y0;
    }
    let frac = (x - x0) / (x1 - x0);
    y0 + frac * (y1 - y0)
}

/// Interpolate `x` on a curve whose points are already sorted ascending by x.
///
/// - empty curve → 0
/// - single point → its y
/// - clamped to the first/last y outside the curve's domain
/// - exact y at a breakpoint
pub fn interpolate_curve(x: f64, curve: &[(f64, f64)]) -> f64 {
    match curve {
        [] => 0.0,
        [(_, y)] => *y,
        [(x_first, y_first), .., (x_last, y_last)] => {
            if x <= *x_first {
                return *y_first;
            }
            if x >= *x_last {
                return *y_last;
            }
            // First breakpoint strictly above x; x > x_first so idx >= 1.
            let idx = curve.partition_point(|&(xi, _)| xi <= x);
            let (x0, y0) = curve[idx - 1];
            let (x1, y1) = curve[idx];
            lerp(x, x0, x1, y0, y1)
        }
    }
}

/// Sort `(x, y)` points ascending by x (stable, NaN-tolerant).
pub fn sort_points(points: &mut [(f64, f64)]) {
    points.sort_by(|a, b| a.0.total_cmp(&b.0));
}
