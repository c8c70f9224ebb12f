// hl-core/src/units.rs

use uom::si::f64::{Time as UomTime, Volume as UomVolume, VolumeRate as UomVolumeRate};

// Public canonical unit types (SI, f64)
pub type Time = UomTime;
pub type Volume = UomVolume;
pub type VolumeRate = UomVolumeRate;

#[inline]
pub fn m3(v: f64) -> Volume {
    use uom::si::volume::cubic_meter;
    Volume::new::<cubic_meter>(v)
}

#[inline]
pub fn s(v: f64) -> Time {
    use uom::si::time::second;
    Time::new::<second>(v)
}

#[inline]
pub fn minutes(v: f64) -> Time {
    use uom::si::time::minute;
    Time::new::<minute>(v)
}

#[inline]
pub fn hours(v: f64) -> Time {
    use uom::si::time::hour;
    Time::new::<hour>(v)
}

/// Hours in a duration.
#[inline]
pub fn to_hours(t: Time) -> f64 {
    use uom::si::time::hour;
    t.get::<hour>()
}

/// Volume flow given in m³/h, the unit ventilation rates are specified in.
#[inline]
pub fn m3_per_hour(v: f64) -> VolumeRate {
    m3(v) / hours(1.0)
}

/// Volume flow given in m³/min, the unit coil airflows are rated in.
#[inline]
pub fn m3_per_minute(v: f64) -> VolumeRate {
    m3(v) / minutes(1.0)
}

/// Strip a volume flow to m³/s for the solver's plain-f64 arithmetic.
#[inline]
pub fn to_m3_per_s(v: VolumeRate) -> f64 {
    use uom::si::volume_rate::cubic_meter_per_second;
    v.get::<cubic_meter_per_second>()
}

pub mod constants {
    /// Density of air, kg/m³.
    pub const RHO_AIR: f64 = 1.2;
    /// Specific heat of air, J/(kg K).
    pub const C_AIR: f64 = 1005.0;
    /// Latent heat of vaporisation at 0 °C, J/kg.
    pub const L_WTR: f64 = 2_501_000.0;
    /// Standard atmospheric pressure, Pa.
    pub const P_ATM: f64 = 101_325.0;
    /// Offset between Celsius and Kelvin.
    pub const KELVIN_OFFSET: f64 = 273.15;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cubic_meters_per_hour_to_si() {
        let q = to_m3_per_s(m3_per_hour(3600.0));
        assert!((q - 1.0).abs() < 1e-12);
    }

    #[test]
    fn coil_airflow_per_minute_to_si() {
        let q = to_m3_per_s(m3_per_minute(28.0));
        assert!((q - 28.0 / 60.0).abs() < 1e-12);
    }

    #[test]
    fn record_interval_in_hours() {
        assert!((to_hours(s(900.0)) - 0.25).abs() < 1e-12);
    }
}
