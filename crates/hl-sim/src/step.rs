//! One time step of the whole building.
//!
//! Rooms only see each other's previous-step temperatures and humidities, so
//! every room is solved independently and the step may run in parallel.

use crate::error::{SimError, SimResult};
use crate::infiltration::air_change_flow;
use crate::model::Model;
use crate::moisture::{MoistureBalance, coil_duty};
use crate::occupants;
use crate::record::{BoundaryRecord, RoomRecord};
use crate::state::{BoundaryState, RoomState, SimState};
use hl_controls::{
    Clothing, ComfortInputs, ControlError, OperationMode, PmvByClothing, next_mode, pmv,
    target_operative_temperature,
};
use hl_core::psychro::relative_humidity;
use hl_core::units::constants::{C_AIR, RHO_AIR};
use hl_solver::{AssembledBoundary, AssembledRoom, Hvac, lagged_conductance};
use nalgebra::DVector;
use rayon::prelude::*;

/// Room balance reduced to the operative temperature:
/// `brm·θ_OT = brc + brl·L_r + L_c`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OperativeBalance {
    pub brm: f64,
    pub brl: f64,
    pub brc: f64,
}

impl OperativeBalance {
    pub fn free_running(&self) -> f64 {
        self.brc / self.brm
    }

    pub fn with_loads(&self, l_c: f64, l_r: f64) -> f64 {
        (self.brc + self.brl * l_r + l_c) / self.brm
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadDecision {
    pub theta_ot: f64,
    /// Convective load, W.
    pub l_c: f64,
    /// Radiant load, W.
    pub l_r: f64,
    /// Capacity limited the load and the target was missed.
    pub shortfall: bool,
}

impl LoadDecision {
    fn free(balance: &OperativeBalance) -> Self {
        Self {
            theta_ot: balance.free_running(),
            l_c: 0.0,
            l_r: 0.0,
            shortfall: false,
        }
    }
}

/// Loads that hold the operative temperature at `target` in a conditioning
/// mode.
///
/// The room runs free when the free-running temperature is already on the
/// comfortable side of the target, or when the required load has the wrong
/// sign for the mode. A radiant system takes the whole load; either system
/// is clamped to its capacity and the shortfall accepted.
pub fn decide_loads(
    balance: &OperativeBalance,
    mode: OperationMode,
    target: Option<f64>,
    hvac: &Hvac,
) -> Result<LoadDecision, &'static str> {
    let free = LoadDecision::free(balance);
    let (target, heating) = match (mode, target) {
        (OperationMode::Heating, Some(t)) => (t, true),
        (OperationMode::Cooling, Some(t)) => (t, false),
        _ => return Ok(free),
    };
    let comfortable = if heating {
        free.theta_ot >= target
    } else {
        free.theta_ot <= target
    };
    if comfortable {
        return Ok(free);
    }

    let (radiant_capacity, convective_capacity) = if heating {
        (hvac.radiant_heating_capacity, hvac.convective_heating_capacity)
    } else {
        (hvac.radiant_cooling_capacity, hvac.convective_cooling_capacity)
    };
    let wrong_sign = |load: f64| if heating { load < 0.0 } else { load > 0.0 };
    let required = balance.brm * target - balance.brc;

    if let Some(capacity) = radiant_capacity {
        if !(balance.brl > 0.0) {
            return Err("radiant load does not reach the room air");
        }
        let l_r = required / balance.brl;
        if wrong_sign(l_r) {
            return Ok(free);
        }
        if l_r.abs() > capacity {
            let l_r = capacity.copysign(l_r);
            return Ok(LoadDecision {
                theta_ot: balance.with_loads(0.0, l_r),
                l_c: 0.0,
                l_r,
                shortfall: true,
            });
        }
        return Ok(LoadDecision {
            theta_ot: target,
            l_c: 0.0,
            l_r,
            shortfall: false,
        });
    }

    let l_c = required;
    if wrong_sign(l_c) {
        return Ok(free);
    }
    match convective_capacity {
        Some(capacity) if l_c.abs() > capacity => {
            let l_c = capacity.copysign(l_c);
            Ok(LoadDecision {
                theta_ot: balance.with_loads(l_c, 0.0),
                l_c,
                l_r: 0.0,
                shortfall: true,
            })
        }
        _ => Ok(LoadDecision {
            theta_ot: target,
            l_c,
            l_r: 0.0,
            shortfall: false,
        }),
    }
}

/// Building-wide inputs of one step.
struct StepInputs<'a> {
    step: i64,
    dt: f64,
    theta_o: f64,
    x_o: f64,
    infiltration_ach: f64,
    theta_r_prev: &'a [f64],
    x_r_prev: &'a [f64],
}

/// Result of one room's step.
pub struct RoomStep {
    pub state: RoomState,
    /// New boundary states, in the room's local order.
    pub boundaries: Vec<BoundaryState>,
    pub record: RoomRecord,
    pub surfaces: Vec<BoundaryRecord>,
    pub coil_resolved: bool,
    pub shortfall: bool,
}

fn step_room(
    model: &Model,
    prev: &SimState,
    room: &AssembledRoom,
    inp: &StepInputs<'_>,
) -> SimResult<RoomStep> {
    let slot = room.id.slot();
    let prev_room = &prev.rooms[slot];
    let schedule = &model.schedules[slot];
    let cfg = &model.comfort;
    let dt = inp.dt;
    let control_err = |source: ControlError| SimError::Control {
        room: room.id,
        source,
    };

    // mode from last step's comfort
    let vote = |clothing: Clothing| {
        pmv(&ComfortInputs {
            theta_air: prev_room.theta_r,
            theta_mrt: prev_room.theta_mrt,
            humidity_ratio: prev_room.x_r,
            air_velocity: cfg.air_velocity,
            met: cfg.met,
            clo: cfg.clo(clothing),
        })
        .map_err(control_err)
    };
    let votes = PmvByClothing {
        heavy: vote(Clothing::Heavy)?,
        middle: vote(Clothing::Middle)?,
        light: vote(Clothing::Light)?,
    };
    let mode = next_mode(prev_room.mode, schedule.demand_at(inp.step), votes).map_err(control_err)?;
    let pmv_in_mode = match mode.clothing() {
        Clothing::Heavy => votes.heavy,
        Clothing::Middle => votes.middle,
        Clothing::Light => votes.light,
    };
    let target = match mode {
        OperationMode::Heating => Some(
            target_operative_temperature(cfg, Clothing::Heavy, prev_room.x_r, cfg.pmv_heating_target)
                .map_err(control_err)?,
        ),
        OperationMode::Cooling => Some(
            target_operative_temperature(cfg, Clothing::Light, prev_room.x_r, cfg.pmv_cooling_target)
                .map_err(control_err)?,
        ),
        OperationMode::StopOpen | OperationMode::StopClosed => None,
    };

    // air exchange
    let mut outdoor_flow = room.outdoor_ventilation + air_change_flow(inp.infiltration_ach, room.volume);
    if mode.windows_open() {
        outdoor_flow += room.natural_ventilation;
    }
    let (inflow, inflow_theta, inflow_x) =
        room.inflows
            .iter()
            .fold((0.0, 0.0, 0.0), |(v, vt, vx), f| {
                let from = f.from.slot();
                (
                    v + f.flow,
                    vt + f.flow * inp.theta_r_prev[from],
                    vx + f.flow * inp.x_r_prev[from],
                )
            });
    let c_rho = C_AIR * RHO_AIR;

    // surfaces: history and drive of this step
    let bounds: Vec<&AssembledBoundary> = model.network.boundaries_of(room).collect();
    let n = bounds.len();
    let drives: Vec<f64> = bounds
        .iter()
        .map(|b| b.drive(inp.step, inp.theta_r_prev))
        .collect();
    let known = DVector::from_iterator(
        n,
        (0..n).map(|k| {
            prev.boundaries[room.boundaries[k]]
                .memory
                .known_surface_part(&bounds[k].rf, drives[k])
        }),
    );
    let q_sol = DVector::from_iterator(n, bounds.iter().map(|b| b.q_sol.at(inp.step)));
    let offset = room.surface_offset(&known, &q_sol);

    // internal gains
    let occupants = schedule.occupants.at(inp.step);
    let heat_gain = schedule.heat_gain.at(inp.step)
        + occupants * occupants::sensible_per_person(prev_room.theta_r);
    let moisture_gain = schedule.moisture_gain.at(inp.step)
        + occupants * occupants::moisture_per_person(prev_room.theta_r);

    // furniture lags the air implicitly; without it solar goes to the air
    let f = &room.furniture;
    let q_sol_frt = room.q_sol_furniture.at(inp.step);
    let frt_g = lagged_conductance(f.c, f.g, dt);
    let frt_source = if frt_g > 0.0 {
        frt_g * (prev_room.theta_frt + dt * q_sol_frt / f.c)
    } else {
        q_sol_frt
    };

    let brm = room.brm0 + c_rho * (outdoor_flow + inflow);
    let brc = room.c_air / dt * prev_room.theta_r
        + room.convective_sum(&offset)
        + c_rho * (outdoor_flow * inp.theta_o + inflow_theta)
        + frt_source
        + heat_gain;
    let xc = room.k_r * room.f_mrt.dot(&offset);
    let balance = OperativeBalance {
        brm: brm / room.xot,
        brl: room.brl + brm * room.xlr / room.xot,
        brc: brc + brm * xc / room.xot,
    };
    let decision = decide_loads(&balance, mode, target, &room.hvac)
        .map_err(|what| SimError::NonPhysical { room: room.id, what })?;

    // back-substitution
    let theta_r = (decision.theta_ot - room.xlr * decision.l_r - xc) / room.xot;
    if !theta_r.is_finite() {
        return Err(SimError::NonPhysical {
            room: room.id,
            what: "air temperature is not finite",
        });
    }
    let theta_s = room.surface_temperatures(theta_r, decision.l_r, &offset);
    let theta_mrt = room.mean_radiant_temperature(&theta_s);
    let theta_frt = if frt_g > 0.0 {
        (f.c * prev_room.theta_frt + dt * (f.g * theta_r + q_sol_frt)) / (f.c + dt * f.g)
    } else {
        theta_r
    };
    let (q_conv, q_rad) = room.surface_fluxes(theta_r, &theta_s);

    let mut boundaries = Vec::with_capacity(n);
    let mut surfaces = Vec::with_capacity(n);
    for k in 0..n {
        let q = q_conv[k] + q_rad[k] + q_sol[k] + room.radiant_fraction[k] * decision.l_r / room.area[k];
        let memory = prev.boundaries[room.boundaries[k]]
            .memory
            .advanced(&bounds[k].rf, q, drives[k]);
        boundaries.push(BoundaryState {
            theta_s: theta_s[k],
            q,
            memory,
        });
        surfaces.push(BoundaryRecord {
            theta_s: theta_s[k],
            q_convective: q_conv[k],
            q_radiative: q_rad[k],
            q_total: q,
        });
    }

    // moisture
    let coil = match (mode, &room.hvac.coil) {
        (OperationMode::Cooling, Some(spec)) => coil_duty(spec, theta_r, -decision.l_c),
        _ => None,
    };
    let moisture = MoistureBalance {
        dt,
        volume: room.volume,
        x_prev: prev_room.x_r,
        x_frt_prev: prev_room.x_frt,
        cx: f.cx,
        gx: f.gx,
        outdoor_flow,
        x_o: inp.x_o,
        inflow,
        inflow_x,
        gain: moisture_gain,
    }
    .solve(coil);
    if !moisture.x_r.is_finite() {
        return Err(SimError::NonPhysical {
            room: room.id,
            what: "humidity is not finite",
        });
    }

    let state = RoomState {
        theta_r,
        x_r: moisture.x_r,
        theta_frt,
        x_frt: moisture.x_frt,
        theta_mrt,
        theta_ot: decision.theta_ot,
        mode,
        clo: cfg.clo(mode.clothing()),
    };
    let record = RoomRecord {
        mode,
        theta_r,
        x_r: moisture.x_r,
        rh: relative_humidity(theta_r, moisture.x_r),
        theta_mrt,
        theta_ot: decision.theta_ot,
        theta_frt,
        pmv: pmv_in_mode,
        load_convective: decision.l_c,
        load_radiant: decision.l_r,
        load_latent: moisture.latent_load,
        outdoor_flow,
    };
    Ok(RoomStep {
        state,
        boundaries,
        record,
        surfaces,
        coil_resolved: moisture.coil_resolved,
        shortfall: decision.shortfall,
    })
}

/// Outcome of advancing the whole building by one step.
pub struct Advanced {
    pub state: SimState,
    pub rooms: Vec<RoomRecord>,
    /// By boundary slot.
    pub boundaries: Vec<BoundaryRecord>,
    pub coil_resolved: Vec<bool>,
    pub shortfall: Vec<bool>,
}

/// Advance `prev` by one step; `step` indexes the exogenous series.
pub fn advance(model: &Model, prev: &SimState, step: i64, parallel: bool) -> SimResult<Advanced> {
    let theta_r_prev = prev.air_temperatures();
    let x_r_prev: Vec<f64> = prev.rooms.iter().map(|r| r.x_r).collect();
    let theta_o = model.weather.theta_o.at(step);

    let infiltration_ach = match &model.infiltration {
        Some(inf) => {
            let rooms = &model.network.rooms;
            let volume: f64 = rooms.iter().map(|r| r.volume).sum();
            let mean = rooms
                .iter()
                .map(|r| r.volume * theta_r_prev[r.id.slot()])
                .sum::<f64>()
                / volume;
            inf.air_changes(mean, theta_o)
        }
        None => 0.0,
    };

    let inputs = StepInputs {
        step,
        dt: model.dt(),
        theta_o,
        x_o: model.weather.x_o.at(step),
        infiltration_ach,
        theta_r_prev: &theta_r_prev,
        x_r_prev: &x_r_prev,
    };

    let solve = |room: &AssembledRoom| step_room(model, prev, room, &inputs);
    let steps: Vec<RoomStep> = if parallel {
        model.network.rooms.par_iter().map(solve).collect::<SimResult<_>>()?
    } else {
        model.network.rooms.iter().map(solve).collect::<SimResult<_>>()?
    };

    let mut boundaries = prev.boundaries.clone();
    let mut surface_records = vec![BoundaryRecord::default(); boundaries.len()];
    let mut rooms = Vec::with_capacity(steps.len());
    let mut room_records = Vec::with_capacity(steps.len());
    let mut coil_resolved = Vec::with_capacity(steps.len());
    let mut shortfall = Vec::with_capacity(steps.len());
    for (room, out) in model.network.rooms.iter().zip(steps) {
        for ((&slot, state), record) in room.boundaries.iter().zip(out.boundaries).zip(out.surfaces) {
            boundaries[slot] = state;
            surface_records[slot] = record;
        }
        rooms.push(out.state);
        room_records.push(out.record);
        coil_resolved.push(out.coil_resolved);
        shortfall.push(out.shortfall);
    }

    Ok(Advanced {
        state: SimState { rooms, boundaries },
        rooms: room_records,
        boundaries: surface_records,
        coil_resolved,
        shortfall,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn balance() -> OperativeBalance {
        // free-running at 10 °C
        OperativeBalance {
            brm: 100.0,
            brl: 0.8,
            brc: 1000.0,
        }
    }

    #[test]
    fn stop_modes_run_free() {
        let d = decide_loads(&balance(), OperationMode::StopOpen, None, &Hvac::default()).unwrap();
        assert_eq!(d.theta_ot, 10.0);
        assert_eq!((d.l_c, d.l_r), (0.0, 0.0));
    }

    #[test]
    fn heating_holds_target_without_limit() {
        let d = decide_loads(&balance(), OperationMode::Heating, Some(20.0), &Hvac::default()).unwrap();
        assert_eq!(d.theta_ot, 20.0);
        assert!((d.l_c - 1000.0).abs() < 1e-9);
        assert!(!d.shortfall);
    }

    #[test]
    fn heating_inside_band_needs_no_load() {
        let d = decide_loads(&balance(), OperationMode::Heating, Some(8.0), &Hvac::default()).unwrap();
        assert_eq!(d.l_c, 0.0);
        assert_eq!(d.theta_ot, 10.0);
    }

    #[test]
    fn convective_capacity_clamps() {
        let hvac = Hvac {
            convective_heating_capacity: Some(400.0),
            ..Hvac::default()
        };
        let d = decide_loads(&balance(), OperationMode::Heating, Some(20.0), &hvac).unwrap();
        assert_eq!(d.l_c, 400.0);
        assert!((d.theta_ot - 14.0).abs() < 1e-12);
        assert!(d.shortfall);
    }

    #[test]
    fn radiant_takes_the_load_without_top_up() {
        let hvac = Hvac {
            radiant_heating_capacity: Some(500.0),
            convective_heating_capacity: None,
            ..Hvac::default()
        };
        let d = decide_loads(&balance(), OperationMode::Heating, Some(20.0), &hvac).unwrap();
        assert_eq!(d.l_c, 0.0);
        assert_eq!(d.l_r, 500.0);
        assert!((d.theta_ot - 14.0).abs() < 1e-12);
        assert!(d.shortfall);
    }

    #[test]
    fn cooling_is_negative_and_clamped() {
        let hvac = Hvac {
            convective_cooling_capacity: Some(300.0),
            ..Hvac::default()
        };
        let d = decide_loads(&balance(), OperationMode::Cooling, Some(5.0), &hvac).unwrap();
        assert_eq!(d.l_c, -300.0);
        assert!((d.theta_ot - 7.0).abs() < 1e-12);

        let d = decide_loads(&balance(), OperationMode::Cooling, Some(12.0), &hvac).unwrap();
        assert_eq!(d.l_c, 0.0);
    }

    #[test]
    fn radiant_without_air_coupling_is_reported() {
        let hvac = Hvac {
            radiant_heating_capacity: Some(500.0),
            ..Hvac::default()
        };
        let b = OperativeBalance {
            brl: 0.0,
            ..balance()
        };
        assert!(decide_loads(&b, OperationMode::Heating, Some(20.0), &hvac).is_err());
    }
}
