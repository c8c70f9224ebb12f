//! Per-step outputs.

use hl_controls::OperationMode;
use hl_core::timing::PerfStats;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomRecord {
    pub mode: OperationMode,
    /// Air temperature, °C.
    pub theta_r: f64,
    /// Humidity ratio, kg/kg(DA).
    pub x_r: f64,
    /// Relative humidity, 0..=1.
    pub rh: f64,
    pub theta_mrt: f64,
    pub theta_ot: f64,
    pub theta_frt: f64,
    /// PMV at the clothing of `mode`, from the conditions the mode was decided on.
    pub pmv: f64,
    /// Sensible convective load, W (heating positive).
    pub load_convective: f64,
    /// Sensible radiant load, W.
    pub load_radiant: f64,
    /// Latent load, W (dehumidification negative).
    pub load_latent: f64,
    /// Outdoor air entering the room this step, m³/s.
    pub outdoor_flow: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct BoundaryRecord {
    /// Inside surface temperature, °C.
    pub theta_s: f64,
    /// Convective flux from the air into the surface, W/m².
    pub q_convective: f64,
    /// Net radiative flux from other surfaces into the surface, W/m².
    pub q_radiative: f64,
    /// Total flux conducted into the construction, W/m².
    pub q_total: f64,
}

/// Recorded trajectory: `t[k]` pairs with `rooms[k]` and `boundaries[k]`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SimRecord {
    /// End-of-step time, s.
    pub t: Vec<f64>,
    pub rooms: Vec<Vec<RoomRecord>>,
    pub boundaries: Vec<Vec<BoundaryRecord>>,
    #[serde(skip)]
    pub perf: PerfStats,
}

impl SimRecord {
    pub fn len(&self) -> usize {
        self.t.len()
    }

    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }

    /// Trajectory of one room.
    pub fn room_series(&self, room_slot: usize) -> impl Iterator<Item = &RoomRecord> {
        self.rooms.iter().map(move |step| &step[room_slot])
    }
}
