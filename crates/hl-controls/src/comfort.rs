//! Comfort configuration.

use serde::{Deserialize, Serialize};

/// Clothing level worn by occupants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Clothing {
    Heavy,
    Middle,
    Light,
}

impl Clothing {
    pub fn name(self) -> &'static str {
        match self {
            Clothing::Heavy => "heavy",
            Clothing::Middle => "middle",
            Clothing::Light => "light",
        }
    }
}

/// Occupant and comfort-target parameters shared by every room.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComfortConfig {
    /// Metabolic rate (met).
    pub met: f64,
    /// Air speed around occupants (m/s).
    pub air_velocity: f64,
    /// Clothing insulation (clo) per level.
    pub clo_heavy: f64,
    pub clo_middle: f64,
    pub clo_light: f64,
    /// PMV held while heating, with heavy clothing.
    pub pmv_heating_target: f64,
    /// PMV held while cooling, with light clothing.
    pub pmv_cooling_target: f64,
    /// Search interval (°C) for the operative-temperature inversion.
    pub ot_search_min: f64,
    pub ot_search_max: f64,
}

impl Default for ComfortConfig {
    fn default() -> Self {
        Self {
            met: 1.0,
            air_velocity: 0.1,
            clo_heavy: 1.1,
            clo_middle: 0.7,
            clo_light: 0.3,
            pmv_heating_target: -0.5,
            pmv_cooling_target: 0.5,
            ot_search_min: -10.0,
            ot_search_max: 50.0,
        }
    }
}

impl ComfortConfig {
    pub fn clo(&self, clothing: Clothing) -> f64 {
        match clothing {
            Clothing::Heavy => self.clo_heavy,
            Clothing::Middle => self.clo_middle,
            Clothing::Light => self.clo_light,
        }
    }

    pub fn validate(&self) -> Result<(), crate::ControlError> {
        use crate::ControlError::InvalidArg;
        if !(self.met > 0.0) {
            return Err(InvalidArg {
                what: "met must be positive",
            });
        }
        if !(self.air_velocity >= 0.0) {
            return Err(InvalidArg {
                what: "air velocity must be non-negative",
            });
        }
        if [self.clo_heavy, self.clo_middle, self.clo_light]
            .iter()
            .any(|c| !(*c >= 0.0))
        {
            return Err(InvalidArg {
                what: "clothing insulation must be non-negative",
            });
        }
        if !(self.pmv_heating_target < self.pmv_cooling_target) {
            return Err(InvalidArg {
                what: "heating PMV target must lie below the cooling target",
            });
        }
        if !(self.ot_search_min < self.ot_search_max) {
            return Err(InvalidArg {
                what: "operative temperature search interval is empty",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = ComfortConfig::default();
        assert!(cfg.validate().is_ok());
        assert!(cfg.clo(Clothing::Heavy) > cfg.clo(Clothing::Middle));
        assert!(cfg.clo(Clothing::Middle) > cfg.clo(Clothing::Light));
    }

    #[test]
    fn inverted_targets_rejected() {
        let cfg = ComfortConfig {
            pmv_heating_target: 0.5,
            pmv_cooling_target: -0.5,
            ..ComfortConfig::default()
        };
        assert!(cfg.validate().is_err());
    }
}
