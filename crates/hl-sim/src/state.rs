//! Persistent per-step state.

use crate::model::Model;
use hl_controls::OperationMode;
use hl_fabric::ConvolutionMemory;

#[derive(Debug, Clone, PartialEq)]
pub struct RoomState {
    pub theta_r: f64,
    pub x_r: f64,
    pub theta_frt: f64,
    pub x_frt: f64,
    pub theta_mrt: f64,
    pub theta_ot: f64,
    pub mode: OperationMode,
    /// Clothing insulation worn in `mode`, clo.
    pub clo: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryState {
    pub theta_s: f64,
    /// Heat flux into the surface, W/m².
    pub q: f64,
    /// History for the step being entered.
    pub memory: ConvolutionMemory,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimState {
    pub rooms: Vec<RoomState>,
    pub boundaries: Vec<BoundaryState>,
}

impl SimState {
    /// Whole building settled at `theta` °C and humidity ratio `x`, windows
    /// closed and no flux through any boundary.
    pub fn uniform(model: &Model, theta: f64, x: f64) -> Self {
        let mode = OperationMode::StopClosed;
        let rooms = model
            .network
            .rooms
            .iter()
            .map(|_| RoomState {
                theta_r: theta,
                x_r: x,
                theta_frt: theta,
                x_frt: x,
                theta_mrt: theta,
                theta_ot: theta,
                mode,
                clo: model.comfort.clo(mode.clothing()),
            })
            .collect();
        let boundaries = model
            .network
            .boundaries
            .iter()
            .map(|b| BoundaryState {
                theta_s: theta,
                q: 0.0,
                memory: ConvolutionMemory::settled(&b.rf, 0.0, theta),
            })
            .collect();
        Self { rooms, boundaries }
    }

    pub fn air_temperatures(&self) -> Vec<f64> {
        self.rooms.iter().map(|r| r.theta_r).collect()
    }
}
