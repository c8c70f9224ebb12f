//! The assembled room network: static coefficients consumed every step.

use crate::input::{Furniture, Hvac};
use hl_core::{BoundaryId, RoomId, Series};
use hl_fabric::ResponseFactor;
use hl_graph::{RearSide, Topology};
use nalgebra::{DMatrix, DVector};

/// A boundary with its response factor and driving series.
#[derive(Debug, Clone)]
pub struct AssembledBoundary {
    pub id: BoundaryId,
    pub owner: RoomId,
    pub rear: RearSide,
    pub area: f64,
    pub h_c: f64,
    pub h_r: f64,
    pub radiant_fraction: f64,
    pub temp_diff_coeff: f64,
    pub rf: ResponseFactor,
    pub theta_eo: Series,
    pub q_sol: Series,
}

impl AssembledBoundary {
    /// Temperature behind the boundary at `step`, given every room's air
    /// temperature from the previous step.
    pub fn drive(&self, step: i64, theta_r_prev: &[f64]) -> f64 {
        match self.rear {
            RearSide::Outdoor => {
                let h = self.temp_diff_coeff;
                h * self.theta_eo.at(step) + (1.0 - h) * theta_r_prev[self.owner.slot()]
            }
            RearSide::Ground => self.theta_eo.at(step),
            RearSide::Room(rear) => theta_r_prev[rear.slot()],
        }
    }
}

/// Air entering a room from another room.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Inflow {
    pub from: RoomId,
    /// m³/s
    pub flow: f64,
}

/// Per-room reduction coefficients.
///
/// Surface temperatures of the room follow
/// `θs = WSR·θr + WSB·Lr + AX⁻¹(K + φa0⊙q_sol)` where `K` collects the
/// known history and drive terms of the step.
#[derive(Debug, Clone)]
pub struct AssembledRoom {
    pub id: RoomId,
    pub volume: f64,
    pub floor_area: f64,
    /// Heat capacity of the room air, J/K.
    pub c_air: f64,
    pub furniture: Furniture,
    pub outdoor_ventilation: f64,
    pub natural_ventilation: f64,
    pub hvac: Hvac,
    pub q_sol_furniture: Series,
    /// Global boundary slots, in local order.
    pub boundaries: Vec<usize>,
    pub inflows: Vec<Inflow>,

    pub area: DVector<f64>,
    pub h_c: DVector<f64>,
    pub h_r: DVector<f64>,
    pub phi_a0: DVector<f64>,
    pub radiant_fraction: DVector<f64>,
    /// Radiant exchange shape factors; rows sum to 1.
    pub shape: DMatrix<f64>,
    /// Mean-radiant-temperature weights; sum to 1.
    pub f_mrt: DVector<f64>,
    pub ax_inv: DMatrix<f64>,
    pub wsr: DVector<f64>,
    pub wsb: DVector<f64>,

    /// Air balance coefficient without ventilation, W/K.
    pub brm0: f64,
    /// Radiant-load coefficient of the air balance.
    pub brl: f64,
    pub k_c: f64,
    pub k_r: f64,
    pub xot: f64,
    pub xlr: f64,
}

/// Implicit first-order coupling `G·C/(C + Δt·G)`; zero when either is zero.
pub fn lagged_conductance(c: f64, g: f64, dt: f64) -> f64 {
    if c > 0.0 && g > 0.0 {
        g * c / (c + dt * g)
    } else {
        0.0
    }
}

impl AssembledRoom {
    pub fn surface_count(&self) -> usize {
        self.boundaries.len()
    }

    /// Surface-temperature offset `AX⁻¹(K + φa0⊙q_sol)` for this step.
    pub fn surface_offset(&self, known: &DVector<f64>, q_sol: &DVector<f64>) -> DVector<f64> {
        &self.ax_inv * (known + self.phi_a0.component_mul(q_sol))
    }

    /// `Σ A·h_c·v` over the room's surfaces.
    pub fn convective_sum(&self, v: &DVector<f64>) -> f64 {
        self.area.component_mul(&self.h_c).dot(v)
    }

    /// Surface temperatures for air temperature `theta_r`, radiant load `l_r`
    /// and the step's offset.
    pub fn surface_temperatures(&self, theta_r: f64, l_r: f64, offset: &DVector<f64>) -> DVector<f64> {
        &self.wsr * theta_r + &self.wsb * l_r + offset
    }

    pub fn mean_radiant_temperature(&self, theta_s: &DVector<f64>) -> f64 {
        self.f_mrt.dot(theta_s)
    }

    /// Convective and radiative heat flux (W/m², into the surface).
    pub fn surface_fluxes(&self, theta_r: f64, theta_s: &DVector<f64>) -> (DVector<f64>, DVector<f64>) {
        let seen = &self.shape * theta_s;
        let conv = self.h_c.component_mul(&theta_s.map(|t| theta_r - t));
        let rad = self.h_r.component_mul(&(seen - theta_s));
        (conv, rad)
    }
}

/// The whole building ready for time marching.
#[derive(Debug, Clone)]
pub struct Network {
    pub topology: Topology,
    pub rooms: Vec<AssembledRoom>,
    pub boundaries: Vec<AssembledBoundary>,
    /// Step length the response factors were synthesised for, s.
    pub dt: f64,
}

impl Network {
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn boundary_count(&self) -> usize {
        self.boundaries.len()
    }

    pub fn boundaries_of(&self, room: &AssembledRoom) -> impl Iterator<Item = &AssembledBoundary> {
        room.boundaries.iter().map(move |&slot| &self.boundaries[slot])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lagged_conductance_limits() {
        assert_eq!(lagged_conductance(0.0, 10.0, 900.0), 0.0);
        assert_eq!(lagged_conductance(1e5, 0.0, 900.0), 0.0);
        // large capacity: plain conductance
        assert!((lagged_conductance(1e15, 10.0, 900.0) - 10.0).abs() < 1e-6);
    }
}
