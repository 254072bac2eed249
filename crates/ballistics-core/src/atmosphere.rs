//! Air density model.
//!
//! Empirical humid-air formula (Magnus saturation vapour pressure, dry-air gas
//! constant) followed by an `exp(-h / 10 km)` altitude correction. In
//! dynamic-air mode temperature and pressure come from an ISA breakpoint
//! table instead of the caller's measurements; the altitude correction is
//! applied on top in both modes.

use crate::interp::lerp;

/// Specific gas constant for dry air (J/(kg·K))
const R_DRY: f64 = 287.058;
/// Scale height of the empirical altitude correction [m]
const ALTITUDE_SCALE_M: f64 = 10_000.0;
/// Lowest density the model will ever report [kg/m³]
pub const AIR_DENSITY_FLOOR: f64 = 1e-6;

/// ISA anchors: (altitude m, temperature °C, pressure hPa)
const ISA_TABLE: &[(f64, f64, f64)] = &[
    (0.0, 15.0, 1013.25),
    (1000.0, 8.5, 898.76),
    (2000.0, 2.0, 794.98),
    (3000.0, -4.5, 701.12),
    (4000.0, -11.0, 616.60),
    (5000.0, -17.5, 540.19),
    (6000.0, -24.0, 471.82),
    (7000.0, -30.5, 410.55),
    (8000.0, -37.0, 356.51),
    (9000.0, -43.5, 308.78),
    (10000.0, -50.0, 265.00),
];

/// Saturation vapour pressure over water [hPa] at `temp_c`.
pub fn saturation_vapor_pressure(temp_c: f64) -> f64 {
    6.1078 * 10f64.powf((7.5 * temp_c) / (temp_c + 237.3))
}

/// ISA temperature [°C] and pressure [hPa] at `altitude_m`, clamped to the table ends.
pub fn isa_conditions(altitude_m: f64) -> (f64, f64) {
    let (first, last) = (ISA_TABLE[0], ISA_TABLE[ISA_TABLE.len() - 1]);
    if altitude_m.is_nan() || altitude_m <= first.0 {
        return (first.1, first.2);
    }
    if altitude_m >= last.0 {
        return (last.1, last.2);
    }
    let idx = ISA_TABLE.partition_point(|&(alt, _, _)| alt <= altitude_m);
    let (a0, t0, p0) = ISA_TABLE[idx - 1];
    let (a1, t1, p1) = ISA_TABLE[idx];
    (lerp(altitude_m, a0, a1, t0, t1), lerp(altitude_m, a0, a1, p0, p1))
}

/// Compute air density [kg/m³] from temperature [°C], pressure [hPa],
/// humidity [%] and altitude [m].
///
/// With `dynamic_air` the temperature and pressure arguments are replaced by
/// the ISA values at `altitude_m`. The result never drops below
/// [`AIR_DENSITY_FLOOR`], also when the inputs make the formula non-finite.
pub fn air_density(
    temp_c: f64,
    pressure_hpa: f64,
    humidity_pct: f64,
    altitude_m: f64,
    dynamic_air: bool,
) -> f64 {
    let (temp_c, pressure_hpa) = if dynamic_air {
        isa_conditions(altitude_m)
    } else {
        (temp_c, pressure_hpa)
    };

    let t_kelvin = temp_c + 273.15;
    let p_pa = pressure_hpa * 100.0;

    // Vapour pressure stays in hPa, as the empirical formula expects.
    let vp = saturation_vapor_pressure(temp_c) * humidity_pct / 100.0;

    let density = (p_pa / (R_DRY * t_kelvin)) * (1.0 - (0.378 * vp) / p_pa);
    // Also applied in dynamic mode, so altitude counts twice there.
    let density = density * (-altitude_m / ALTITUDE_SCALE_M).exp();

    if density.is_finite() && density > AIR_DENSITY_FLOOR {
        density
    } else {
        log::warn!(
            "air density {density} out of range (T={temp_c} °C, P={pressure_hpa} hPa, h={altitude_m} m); \
             flooring to {AIR_DENSITY_FLOOR}"
        );
        AIR_DENSITY_FLOOR
    }
}
