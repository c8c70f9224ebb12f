//! Building-wide infiltration from airtightness.

use hl_core::units::{m3_per_hour, to_m3_per_s};
use serde::{Deserialize, Serialize};

/// Structural system; selects the stack-effect coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Structure {
    Wooden,
    ReinforcedConcrete,
    Steel,
}

impl Structure {
    /// `(a, b)` of `ACH = c·(a·sqrt|Δθ| + b)`.
    fn coefficients(self) -> (f64, f64) {
        match self {
            Structure::Wooden | Structure::Steel => (0.022, -0.0117),
            Structure::ReinforcedConcrete => (0.011, -0.0059),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Infiltration {
    pub structure: Structure,
    /// Equivalent leakage area per floor area, cm²/m².
    pub c_value: f64,
}

impl Infiltration {
    /// Air changes per hour for a mean room temperature and the outdoor
    /// temperature. Never negative.
    pub fn air_changes(&self, theta_r_mean: f64, theta_o: f64) -> f64 {
        let (a, b) = self.structure.coefficients();
        (self.c_value * (a * (theta_r_mean - theta_o).abs().sqrt() + b)).max(0.0)
    }
}

/// Air-change rate applied to a room of `volume` m³, as m³/s.
pub fn air_change_flow(ach: f64, volume: f64) -> f64 {
    to_m3_per_s(m3_per_hour(ach * volume))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_temperature_difference_no_infiltration() {
        let inf = Infiltration {
            structure: Structure::Wooden,
            c_value: 5.0,
        };
        assert_eq!(inf.air_changes(20.0, 20.0), 0.0);
    }

    #[test]
    fn grows_with_temperature_difference() {
        let inf = Infiltration {
            structure: Structure::ReinforcedConcrete,
            c_value: 2.0,
        };
        let ach = inf.air_changes(20.0, 0.0);
        let expected = 2.0 * (0.011 * 20.0_f64.sqrt() - 0.0059);
        assert!((ach - expected).abs() < 1e-12);
        assert!(inf.air_changes(20.0, -10.0) > ach);
        assert!((air_change_flow(ach, 3600.0) - ach).abs() < 1e-12);
    }
}
