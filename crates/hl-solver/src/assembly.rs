//! Room network assembly.
//!
//! Once per simulation:
//! 1. synthesise a response factor for every boundary;
//! 2. per room, build `AX_ik = δ_ik(1 + φa0_i(hc_i + hr_i)) - φa0_i·hr_i·F_ik`,
//!    invert it, and derive `WSR`, `WSB`, `BRM0`, `BRL`, `XOT`, `XLR`.
//!
//! Both stages run on the rayon pool when enabled; results are collected in
//! slot order so the network is identical either way.

use crate::config::SolverConfig;
use crate::error::{SolverError, SolverResult};
use crate::input::{BoundaryInput, RoomInput};
use crate::network::{AssembledBoundary, AssembledRoom, Inflow, Network, lagged_conductance};
use hl_core::units::constants::{C_AIR, RHO_AIR};
use hl_fabric::Construction;
use hl_graph::{RearSide, Room, Surface, Topology};
use nalgebra::{DMatrix, DVector};
use rayon::prelude::*;
use tracing::{debug, info};

const RADIANT_FRACTION_TOLERANCE: f64 = 1e-6;

/// Assemble the network for time step `dt` (s).
pub fn assemble(
    topology: Topology,
    rooms: &[RoomInput],
    boundaries: &[BoundaryInput],
    dt: f64,
    cfg: &SolverConfig,
) -> SolverResult<Network> {
    if rooms.len() != topology.rooms().len() {
        return Err(SolverError::InputMismatch {
            what: format!(
                "{} room inputs for {} rooms",
                rooms.len(),
                topology.rooms().len()
            ),
        });
    }
    if boundaries.len() != topology.surfaces().len() {
        return Err(SolverError::InputMismatch {
            what: format!(
                "{} boundary inputs for {} surfaces",
                boundaries.len(),
                topology.surfaces().len()
            ),
        });
    }
    if !(dt > 0.0) || !dt.is_finite() {
        return Err(SolverError::InputMismatch {
            what: format!("time step must be positive, got {dt}"),
        });
    }
    if !(cfg.ot_convective_weight >= 0.0 && cfg.ot_convective_weight <= 1.0) {
        return Err(SolverError::InputMismatch {
            what: "operative temperature weight must lie in [0, 1]".to_string(),
        });
    }

    info!(
        rooms = rooms.len(),
        boundaries = boundaries.len(),
        dt,
        "assembling room network"
    );

    let build_boundary = |surface: &Surface| -> SolverResult<AssembledBoundary> {
        assemble_boundary(surface, &boundaries[surface.id.slot()], dt, cfg)
    };
    let assembled_boundaries: Vec<AssembledBoundary> = if cfg.parallel {
        topology.surfaces().par_iter().map(build_boundary).collect::<SolverResult<_>>()?
    } else {
        topology.surfaces().iter().map(build_boundary).collect::<SolverResult<_>>()?
    };

    let build_room = |room: &Room| -> SolverResult<AssembledRoom> {
        assemble_room(
            &topology,
            room,
            &rooms[room.id.slot()],
            &assembled_boundaries,
            dt,
            cfg,
        )
    };
    let assembled_rooms: Vec<AssembledRoom> = if cfg.parallel {
        topology.rooms().par_iter().map(build_room).collect::<SolverResult<_>>()?
    } else {
        topology.rooms().iter().map(build_room).collect::<SolverResult<_>>()?
    };

    info!("room network assembled");
    Ok(Network {
        topology,
        rooms: assembled_rooms,
        boundaries: assembled_boundaries,
        dt,
    })
}

fn assemble_boundary(
    surface: &Surface,
    input: &BoundaryInput,
    dt: f64,
    cfg: &SolverConfig,
) -> SolverResult<AssembledBoundary> {
    let invalid = |what: String| SolverError::InvalidBoundary {
        boundary: surface.id,
        what,
    };

    let consistent = matches!(
        (&surface.rear, &input.construction),
        (RearSide::Outdoor, Construction::Outdoor { .. })
            | (RearSide::Outdoor, Construction::Opening { .. })
            | (RearSide::Ground, Construction::Ground { .. })
            | (RearSide::Room(_), Construction::Partition { .. })
    );
    if !consistent {
        return Err(invalid(format!(
            "{} construction cannot face {:?}",
            input.construction.kind_name(),
            surface.rear
        )));
    }
    if !(input.area > 0.0) || !input.area.is_finite() {
        return Err(invalid(format!("area must be positive, got {}", input.area)));
    }
    if !(input.h_c > 0.0) || !input.h_c.is_finite() {
        return Err(invalid(format!(
            "convective film coefficient must be positive, got {}",
            input.h_c
        )));
    }
    if !(input.h_r >= 0.0) || !input.h_r.is_finite() {
        return Err(invalid(format!(
            "radiative film coefficient must be non-negative, got {}",
            input.h_r
        )));
    }
    if !(0.0..=1.0).contains(&input.radiant_fraction) {
        return Err(invalid(format!(
            "radiant fraction must lie in [0, 1], got {}",
            input.radiant_fraction
        )));
    }
    if !(0.0..=1.0).contains(&input.temp_diff_coeff) {
        return Err(invalid(format!(
            "temperature-difference coefficient must lie in [0, 1], got {}",
            input.temp_diff_coeff
        )));
    }
    input.theta_eo.validate("equivalent outdoor temperature")?;
    input.q_sol.validate("absorbed solar flux")?;

    let rf = input
        .construction
        .response_factor(dt, cfg.synthesis)
        .map_err(|source| SolverError::Fabric {
            boundary: surface.id,
            source,
        })?;
    if !(rf.phi_a0 > 0.0) {
        return Err(invalid(format!(
            "initial absorption term must be positive, got {}",
            rf.phi_a0
        )));
    }

    Ok(AssembledBoundary {
        id: surface.id,
        owner: surface.owner,
        rear: surface.rear,
        area: input.area,
        h_c: input.h_c,
        h_r: input.h_r,
        radiant_fraction: input.radiant_fraction,
        temp_diff_coeff: input.temp_diff_coeff,
        rf,
        theta_eo: input.theta_eo.clone(),
        q_sol: input.q_sol.clone(),
    })
}

fn validate_room(room: &Room, input: &RoomInput) -> SolverResult<()> {
    let invalid = |what: &str| SolverError::InvalidRoom {
        room: room.id,
        what: what.to_string(),
    };
    let non_negative = |v: f64| v >= 0.0 && v.is_finite();

    if !(input.volume > 0.0) || !input.volume.is_finite() {
        return Err(invalid("volume must be positive"));
    }
    if !non_negative(input.floor_area) {
        return Err(invalid("floor area must be non-negative"));
    }
    let f = &input.furniture;
    if ![f.c, f.g, f.cx, f.gx].into_iter().all(non_negative) {
        return Err(invalid("furniture capacities and conductances must be non-negative"));
    }
    if !non_negative(input.outdoor_ventilation) || !non_negative(input.natural_ventilation) {
        return Err(invalid("ventilation flows must be non-negative"));
    }
    let h = &input.hvac;
    let capacities = [
        h.radiant_heating_capacity,
        h.radiant_cooling_capacity,
        h.convective_heating_capacity,
        h.convective_cooling_capacity,
    ];
    if !capacities.into_iter().flatten().all(non_negative) {
        return Err(invalid("HVAC capacities must be non-negative"));
    }
    if let Some(coil) = &h.coil {
        if !(coil.q_min > 0.0 && coil.q_max > coil.q_min) {
            return Err(invalid("coil loads need 0 < q_min < q_max"));
        }
        if !(coil.v_min > 0.0 && coil.v_max >= coil.v_min) {
            return Err(invalid("coil airflows need 0 < v_min <= v_max"));
        }
        if !(coil.bypass_factor >= 0.0 && coil.bypass_factor < 1.0) {
            return Err(invalid("coil bypass factor must lie in [0, 1)"));
        }
    }
    input.q_sol_furniture.validate("furniture solar gain")?;
    Ok(())
}

/// Shape factors weighted by the area of the other surfaces; a lone surface
/// only sees itself.
fn area_weighted_shape_factors(area: &DVector<f64>) -> DMatrix<f64> {
    let n = area.len();
    if n == 1 {
        return DMatrix::identity(1, 1);
    }
    let total = area.sum();
    DMatrix::from_fn(n, n, |i, k| {
        if i == k {
            0.0
        } else {
            area[k] / (total - area[i])
        }
    })
}

fn assemble_room(
    topology: &Topology,
    room: &Room,
    input: &RoomInput,
    boundaries: &[AssembledBoundary],
    dt: f64,
    cfg: &SolverConfig,
) -> SolverResult<AssembledRoom> {
    validate_room(room, input)?;

    let slots: Vec<usize> = topology
        .room_surfaces(room.id)
        .iter()
        .map(|id| id.slot())
        .collect();
    if slots.is_empty() {
        return Err(hl_graph::GraphError::RoomWithoutSurfaces { room: room.id }.into());
    }
    let own: Vec<&AssembledBoundary> = slots.iter().map(|&s| &boundaries[s]).collect();
    let n = own.len();

    let area = DVector::from_iterator(n, own.iter().map(|b| b.area));
    let h_c = DVector::from_iterator(n, own.iter().map(|b| b.h_c));
    let h_r = DVector::from_iterator(n, own.iter().map(|b| b.h_r));
    let phi_a0 = DVector::from_iterator(n, own.iter().map(|b| b.rf.phi_a0));
    let radiant_fraction = DVector::from_iterator(n, own.iter().map(|b| b.radiant_fraction));

    if input.hvac.has_radiant() && (radiant_fraction.sum() - 1.0).abs() > RADIANT_FRACTION_TOLERANCE {
        return Err(SolverError::InvalidRoom {
            room: room.id,
            what: format!(
                "radiant fractions of a room with radiant HVAC must sum to 1, got {}",
                radiant_fraction.sum()
            ),
        });
    }

    let shape = area_weighted_shape_factors(&area);
    let f_mrt = &area / area.sum();

    let ax = DMatrix::from_fn(n, n, |i, k| {
        let diag = if i == k {
            1.0 + phi_a0[i] * (h_c[i] + h_r[i])
        } else {
            0.0
        };
        diag - phi_a0[i] * h_r[i] * shape[(i, k)]
    });

    let singular_values = ax.clone().svd(false, false).singular_values;
    let s_min = singular_values.min();
    if !(s_min > 0.0) {
        return Err(SolverError::Singular { room: room.id });
    }
    let condition = singular_values.max() / s_min;
    if condition > cfg.max_condition {
        return Err(SolverError::IllConditioned {
            room: room.id,
            condition,
            limit: cfg.max_condition,
        });
    }
    let ax_inv = ax
        .try_inverse()
        .ok_or(SolverError::Singular { room: room.id })?;

    let wsr = &ax_inv * phi_a0.component_mul(&h_c);
    let wsb = &ax_inv * phi_a0.component_mul(&radiant_fraction).component_div(&area);

    let ah_c = area.component_mul(&h_c);
    let c_air = RHO_AIR * C_AIR * input.volume;
    let furniture = lagged_conductance(input.furniture.c, input.furniture.g, dt);
    let brm0 = c_air / dt + ah_c.dot(&wsr.map(|w| 1.0 - w)) + furniture;
    let brl = ah_c.dot(&wsb);

    let k_c = cfg.ot_convective_weight;
    let k_r = 1.0 - k_c;
    let xot = k_c + k_r * f_mrt.dot(&wsr);
    let xlr = k_r * f_mrt.dot(&wsb);

    let inflows = topology
        .inflows(room.id)
        .iter()
        .filter_map(|&e| topology.edge(e))
        .map(|edge| Inflow {
            from: edge.from,
            flow: edge.flow_m3_per_s,
        })
        .collect();

    debug!(
        room = %room.name,
        surfaces = n,
        condition,
        brm0,
        brl,
        xot,
        xlr,
        "assembled room"
    );

    Ok(AssembledRoom {
        id: room.id,
        volume: input.volume,
        floor_area: input.floor_area,
        c_air,
        furniture: input.furniture,
        outdoor_ventilation: input.outdoor_ventilation,
        natural_ventilation: input.natural_ventilation,
        hvac: input.hvac,
        q_sol_furniture: input.q_sol_furniture.clone(),
        boundaries: slots,
        inflows,
        area,
        h_c,
        h_r,
        phi_a0,
        radiant_fraction,
        shape,
        f_mrt,
        ax_inv,
        wsr,
        wsb,
        brm0,
        brl,
        k_c,
        k_r,
        xot,
        xlr,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_factor_rows_sum_to_one() {
        let area = DVector::from_vec(vec![10.0, 12.0, 8.0, 20.0]);
        let f = area_weighted_shape_factors(&area);
        for i in 0..4 {
            assert_eq!(f[(i, i)], 0.0);
            let row: f64 = f.row(i).sum();
            assert!((row - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn lone_surface_sees_itself() {
        let f = area_weighted_shape_factors(&DVector::from_vec(vec![5.0]));
        assert_eq!(f[(0, 0)], 1.0);
    }
}
