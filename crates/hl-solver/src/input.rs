//! Per-room and per-boundary data handed to assembly.
//!
//! Both lists are dense and indexed by the topology's room and surface slots.

use hl_core::Series;
use hl_core::units::{m3_per_minute, to_m3_per_s};
use hl_fabric::Construction;

/// Thermal description of one room-facing surface.
#[derive(Debug, Clone)]
pub struct BoundaryInput {
    pub construction: Construction,
    /// Area, m².
    pub area: f64,
    /// Inside convective film coefficient, W/m²K.
    pub h_c: f64,
    /// Inside radiative film coefficient, W/m²K.
    pub h_r: f64,
    /// Share of the room's radiant HVAC output absorbed by this surface.
    pub radiant_fraction: f64,
    /// Temperature-difference coefficient of outdoor-facing boundaries:
    /// the rear is driven by `h·θ_eo + (1 - h)·θ_room`.
    pub temp_diff_coeff: f64,
    /// Equivalent outdoor temperature (°C) for outdoor boundaries, deep soil
    /// temperature for ground boundaries. Unused for partitions.
    pub theta_eo: Series,
    /// Solar flux absorbed at the inside surface, W/m².
    pub q_sol: Series,
}

/// Furniture lumped as one heat and one moisture capacitance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Furniture {
    /// Heat capacity, J/K.
    pub c: f64,
    /// Air-to-furniture conductance, W/K.
    pub g: f64,
    /// Moisture capacity, kg/(kg/kg(DA)).
    pub cx: f64,
    /// Moisture conductance, kg/(s·kg/kg(DA)).
    pub gx: f64,
}

impl Furniture {
    /// Typical furnishing scaled by room volume (m³).
    pub fn for_volume(volume: f64) -> Self {
        let c = 12.6e3 * volume;
        let cx = 16.8 * volume;
        Self {
            c,
            g: 0.00022 * c,
            cx,
            gx: 0.0018 * cx,
        }
    }
}

/// Rated performance of a cooling coil, for latent load.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoilSpec {
    /// Sensible load (W) at which the coil airflow is minimum / maximum.
    pub q_min: f64,
    pub q_max: f64,
    /// Coil airflow (m³/s) at `q_min` / `q_max`.
    pub v_min: f64,
    pub v_max: f64,
    /// Fraction of coil airflow bypassing the coil.
    pub bypass_factor: f64,
}

impl Default for CoilSpec {
    fn default() -> Self {
        Self {
            q_min: 500.0,
            q_max: 5600.0,
            v_min: to_m3_per_s(m3_per_minute(11.0)),
            v_max: to_m3_per_s(m3_per_minute(28.0)),
            bypass_factor: 0.2,
        }
    }
}

/// Heating and cooling equipment serving a room.
///
/// A radiant system, when present, takes the whole load up to its capacity.
/// Convective capacities of `None` are unlimited.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Hvac {
    pub radiant_heating_capacity: Option<f64>,
    pub radiant_cooling_capacity: Option<f64>,
    pub convective_heating_capacity: Option<f64>,
    pub convective_cooling_capacity: Option<f64>,
    pub coil: Option<CoilSpec>,
}

impl Hvac {
    pub fn has_radiant(&self) -> bool {
        self.radiant_heating_capacity.is_some() || self.radiant_cooling_capacity.is_some()
    }
}

/// Thermal description of one room.
#[derive(Debug, Clone)]
pub struct RoomInput {
    /// Air volume, m³.
    pub volume: f64,
    /// Floor area, m².
    pub floor_area: f64,
    pub furniture: Furniture,
    /// Mechanical outdoor-air supply, m³/s.
    pub outdoor_ventilation: f64,
    /// Window ventilation while in the stop-open mode, m³/s.
    pub natural_ventilation: f64,
    pub hvac: Hvac,
    /// Solar heat absorbed by furniture, W.
    pub q_sol_furniture: Series,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_furniture_scales_with_volume() {
        let f = Furniture::for_volume(50.0);
        assert!((f.c - 630_000.0).abs() < 1e-6);
        assert!((f.g - 138.6).abs() < 1e-9);
        assert!((f.cx - 840.0).abs() < 1e-9);
        assert!((f.gx - 1.512).abs() < 1e-9);
    }
}
