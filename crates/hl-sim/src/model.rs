//! A building ready to simulate: assembled network plus exogenous series.

use crate::error::{SimError, SimResult};
use crate::infiltration::Infiltration;
use crate::series::{ScheduleSeries, WeatherSeries};
use hl_controls::ComfortConfig;
use hl_solver::Network;

#[derive(Debug, Clone)]
pub struct Model {
    pub network: Network,
    pub weather: WeatherSeries,
    /// One schedule per room, by room slot.
    pub schedules: Vec<ScheduleSeries>,
    pub comfort: ComfortConfig,
    pub infiltration: Option<Infiltration>,
}

impl Model {
    pub fn new(
        network: Network,
        weather: WeatherSeries,
        schedules: Vec<ScheduleSeries>,
        comfort: ComfortConfig,
        infiltration: Option<Infiltration>,
    ) -> SimResult<Self> {
        if schedules.len() != network.room_count() {
            return Err(SimError::InputMismatch {
                what: format!(
                    "{} schedules for {} rooms",
                    schedules.len(),
                    network.room_count()
                ),
            });
        }
        weather.validate()?;
        for schedule in &schedules {
            schedule.validate()?;
        }
        comfort.validate().map_err(SimError::Comfort)?;
        if let Some(inf) = &infiltration {
            if !(inf.c_value >= 0.0) || !inf.c_value.is_finite() {
                return Err(SimError::InvalidArg {
                    what: "infiltration c-value must be non-negative",
                });
            }
        }
        Ok(Self {
            network,
            weather,
            schedules,
            comfort,
            infiltration,
        })
    }

    /// Step length the network was assembled for, s.
    pub fn dt(&self) -> f64 {
        self.network.dt
    }
}
