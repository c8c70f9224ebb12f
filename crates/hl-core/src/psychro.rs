//! Moist-air relations consumed by the room moisture balance and the comfort model.
//!
//! Humidity is carried as an absolute humidity ratio in kg/kg(DA); pressures are Pa.

use crate::units::constants::{KELVIN_OFFSET, P_ATM};

/// Ratio of molar masses of water vapour and dry air.
const EPSILON: f64 = 0.621_98;

/// Saturation vapour pressure (Pa) after Wexler and Hyland, over ice below 0 °C.
pub fn saturation_vapor_pressure(theta_c: f64) -> f64 {
    let t = theta_c + KELVIN_OFFSET;
    let ln_p = if theta_c >= 0.0 {
        -5.800_220_6e3 / t + 1.391_499_3 - 4.864_023_9e-2 * t + 4.176_476_8e-5 * t.powi(2)
            - 1.445_209_3e-8 * t.powi(3)
            + 6.545_967_3 * t.ln()
    } else {
        -5.674_535_9e3 / t + 6.392_524_7 - 9.677_843e-3 * t + 6.221_570_1e-7 * t.powi(2)
            + 2.074_782_5e-9 * t.powi(3)
            - 9.484_024e-13 * t.powi(4)
            + 4.163_501_9 * t.ln()
    };
    ln_p.exp()
}

/// Vapour pressure (Pa) of air with humidity ratio `x`.
pub fn vapor_pressure(x: f64) -> f64 {
    x * P_ATM / (EPSILON + x)
}

/// Humidity ratio (kg/kg(DA)) of air with vapour pressure `p_v`.
pub fn humidity_ratio(p_v: f64) -> f64 {
    EPSILON * p_v / (P_ATM - p_v)
}

/// Humidity ratio of saturated air at `theta_c`.
pub fn saturation_humidity_ratio(theta_c: f64) -> f64 {
    humidity_ratio(saturation_vapor_pressure(theta_c))
}

/// Relative humidity (0..=1) at temperature `theta_c` and humidity ratio `x`.
pub fn relative_humidity(theta_c: f64, x: f64) -> f64 {
    (vapor_pressure(x) / saturation_vapor_pressure(theta_c)).clamp(0.0, 1.0)
}

/// Humidity ratio at temperature `theta_c` and relative humidity `rh` (0..=1).
pub fn humidity_ratio_from_rh(theta_c: f64, rh: f64) -> f64 {
    humidity_ratio(rh * saturation_vapor_pressure(theta_c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saturation_pressure_reference_points() {
        // Tabulated values: 611.2 Pa at 0 °C, 2339 Pa at 20 °C, 7384 Pa at 40 °C.
        assert!((saturation_vapor_pressure(0.0) - 611.2).abs() < 1.0);
        assert!((saturation_vapor_pressure(20.0) - 2339.0).abs() < 3.0);
        assert!((saturation_vapor_pressure(40.0) - 7384.0).abs() < 10.0);
    }

    #[test]
    fn humidity_ratio_inverts_vapor_pressure() {
        for x in [0.002, 0.008, 0.015] {
            let back = humidity_ratio(vapor_pressure(x));
            assert!((back - x).abs() < 1e-12);
        }
    }

    #[test]
    fn relative_humidity_round_trip() {
        let x = humidity_ratio_from_rh(26.0, 0.6);
        assert!((relative_humidity(26.0, x) - 0.6).abs() < 1e-9);
        assert!(saturation_humidity_ratio(26.0) > x);
    }
}
