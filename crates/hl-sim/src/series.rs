//! Weather and schedule series consumed by the time march.

use crate::error::SimResult;
use hl_core::Series;

/// Outdoor air conditions.
#[derive(Debug, Clone, Default)]
pub struct WeatherSeries {
    /// Outdoor air temperature, °C.
    pub theta_o: Series,
    /// Outdoor humidity ratio, kg/kg(DA).
    pub x_o: Series,
}

impl WeatherSeries {
    pub fn validate(&self) -> SimResult<()> {
        self.theta_o.validate("outdoor temperature")?;
        self.x_o.validate("outdoor humidity")?;
        Ok(())
    }
}

/// Internal loads and occupancy of one room.
#[derive(Debug, Clone, Default)]
pub struct ScheduleSeries {
    /// Convective sensible gain from equipment and lighting, W.
    pub heat_gain: Series,
    /// Moisture generation besides occupants, kg/s.
    pub moisture_gain: Series,
    /// Number of occupants.
    pub occupants: Series,
    /// HVAC demand; values above 0.5 mean the room is to be conditioned.
    pub demand: Series,
}

impl ScheduleSeries {
    pub fn demand_at(&self, step: i64) -> bool {
        self.demand.at(step) > 0.5
    }

    pub fn validate(&self) -> SimResult<()> {
        self.heat_gain.validate("heat gain")?;
        self.moisture_gain.validate("moisture gain")?;
        self.occupants.validate("occupants")?;
        self.demand.validate("demand")?;
        Ok(())
    }
}
