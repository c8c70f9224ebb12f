//! HVAC operation-mode state machine.
//!
//! With demand active the next mode depends on the current mode and on the
//! PMV evaluated at three clothing levels (thresholds ±0.7 and 0.0):
//!
//! | from       | first matching rule                                          |
//! |------------|--------------------------------------------------------------|
//! | Heating    | heavy ≤ 0.7 → Heating; middle > 0.7 → Cooling; StopClosed      |
//! | Cooling    | light ≥ -0.7 → Cooling; middle < -0.7 → Heating; StopClosed    |
//! | StopOpen   | light ≥ 0.7 → Cooling; heavy ≤ -0.7 → Heating; middle ≥ 0 → StopOpen; StopClosed |
//! | StopClosed | light ≥ 0.7 → Cooling; heavy ≤ -0.7 → Heating; light ≥ 0 → StopOpen; StopClosed |
//!
//! Without demand the room is always StopClosed.

use crate::comfort::Clothing;
use crate::error::{ControlError, ControlResult};
use serde::{Deserialize, Serialize};

const UPPER: f64 = 0.7;
const LOWER: f64 = -0.7;
const NEUTRAL: f64 = 0.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationMode {
    Heating,
    Cooling,
    StopOpen,
    StopClosed,
}

impl OperationMode {
    /// Clothing occupants wear in this mode.
    pub fn clothing(self) -> Clothing {
        match self {
            OperationMode::Heating => Clothing::Heavy,
            OperationMode::Cooling => Clothing::Light,
            OperationMode::StopOpen | OperationMode::StopClosed => Clothing::Middle,
        }
    }

    /// Windows are open for natural ventilation.
    pub fn windows_open(self) -> bool {
        self == OperationMode::StopOpen
    }

    pub fn name(self) -> &'static str {
        match self {
            OperationMode::Heating => "heating",
            OperationMode::Cooling => "cooling",
            OperationMode::StopOpen => "stop_open",
            OperationMode::StopClosed => "stop_closed",
        }
    }
}

/// PMV at the three clothing levels, evaluated with the previous step's
/// room conditions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PmvByClothing {
    pub heavy: f64,
    pub middle: f64,
    pub light: f64,
}

impl PmvByClothing {
    fn ensure_finite(&self) -> ControlResult<()> {
        for (clothing, value) in [
            (Clothing::Heavy, self.heavy),
            (Clothing::Middle, self.middle),
            (Clothing::Light, self.light),
        ] {
            if !value.is_finite() {
                return Err(ControlError::NonFinitePmv {
                    clothing: clothing.name(),
                    value,
                });
            }
        }
        Ok(())
    }
}

/// Mode for the step being entered.
///
/// Non-finite PMV values are rejected even when demand is off, so a broken
/// comfort evaluation never passes silently.
pub fn next_mode(
    current: OperationMode,
    demand: bool,
    pmv: PmvByClothing,
) -> ControlResult<OperationMode> {
    use OperationMode::*;

    pmv.ensure_finite()?;
    if !demand {
        return Ok(StopClosed);
    }
    let PmvByClothing {
        heavy,
        middle,
        light,
    } = pmv;

    let next = match current {
        Heating => {
            if heavy <= UPPER {
                Heating
            } else if middle > UPPER {
                Cooling
            } else {
                StopClosed
            }
        }
        Cooling => {
            if light >= LOWER {
                Cooling
            } else if middle < LOWER {
                Heating
            } else {
                StopClosed
            }
        }
        StopOpen => {
            if light >= UPPER {
                Cooling
            } else if heavy <= LOWER {
                Heating
            } else if middle >= NEUTRAL {
                StopOpen
            } else {
                StopClosed
            }
        }
        StopClosed => {
            if light >= UPPER {
                Cooling
            } else if heavy <= LOWER {
                Heating
            } else if light >= NEUTRAL {
                StopOpen
            } else {
                StopClosed
            }
        }
    };
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::OperationMode::*;
    use super::*;

    fn votes(heavy: f64, middle: f64, light: f64) -> PmvByClothing {
        PmvByClothing {
            heavy,
            middle,
            light,
        }
    }

    #[test]
    fn no_demand_is_stop_closed() {
        for mode in [Heating, Cooling, StopOpen, StopClosed] {
            assert_eq!(next_mode(mode, false, votes(3.0, 3.0, 3.0)).unwrap(), StopClosed);
        }
    }

    #[test]
    fn heating_persists_until_warm() {
        assert_eq!(next_mode(Heating, true, votes(0.7, 0.2, -0.3)).unwrap(), Heating);
        assert_eq!(next_mode(Heating, true, votes(1.5, 0.9, 0.3)).unwrap(), Cooling);
        assert_eq!(next_mode(Heating, true, votes(1.0, 0.7, 0.3)).unwrap(), StopClosed);
    }

    #[test]
    fn cooling_persists_until_cold() {
        assert_eq!(next_mode(Cooling, true, votes(0.5, -0.2, -0.7)).unwrap(), Cooling);
        assert_eq!(next_mode(Cooling, true, votes(-0.2, -0.9, -1.5)).unwrap(), Heating);
        assert_eq!(next_mode(Cooling, true, votes(0.3, -0.5, -1.0)).unwrap(), StopClosed);
    }

    #[test]
    fn stop_open_rules() {
        assert_eq!(next_mode(StopOpen, true, votes(1.5, 1.0, 0.7)).unwrap(), Cooling);
        assert_eq!(next_mode(StopOpen, true, votes(-0.7, -1.2, -1.8)).unwrap(), Heating);
        assert_eq!(next_mode(StopOpen, true, votes(0.5, 0.0, -0.5)).unwrap(), StopOpen);
        assert_eq!(next_mode(StopOpen, true, votes(0.3, -0.1, -0.6)).unwrap(), StopClosed);
    }

    #[test]
    fn stop_closed_rules() {
        assert_eq!(next_mode(StopClosed, true, votes(1.5, 1.0, 0.7)).unwrap(), Cooling);
        assert_eq!(next_mode(StopClosed, true, votes(-0.7, -1.2, -1.8)).unwrap(), Heating);
        assert_eq!(next_mode(StopClosed, true, votes(0.9, 0.5, 0.0)).unwrap(), StopOpen);
        assert_eq!(next_mode(StopClosed, true, votes(0.5, 0.1, -0.1)).unwrap(), StopClosed);
    }

    #[test]
    fn nan_is_reported() {
        let err = next_mode(Heating, true, votes(0.0, f64::NAN, 0.0)).unwrap_err();
        assert!(matches!(err, ControlError::NonFinitePmv { clothing: "middle", .. }));
    }

    #[test]
    fn clothing_follows_mode() {
        assert_eq!(Heating.clothing(), Clothing::Heavy);
        assert_eq!(Cooling.clothing(), Clothing::Light);
        assert_eq!(StopOpen.clothing(), Clothing::Middle);
        assert!(StopOpen.windows_open());
        assert!(!StopClosed.windows_open());
    }
}
