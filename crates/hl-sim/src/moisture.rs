//! Room moisture balance with furniture buffering and coil dehumidification.
//!
//! The balance is implicit in the new room humidity `x_r`:
//!
//! ```text
//! ρV(x_r - x_n)/Δt = ρV_o(x_o - x_r) + Σ ρV_j(x_j - x_r)
//!                  + Gx·Cx/(Cx + Δt·Gx)·(x_frt,n - x_r) + X_gain
//!                  - ρ·V_ac(1 - BF)·(x_r - x_e)
//! ```

use hl_core::psychro::saturation_humidity_ratio;
use hl_core::units::constants::{C_AIR, L_WTR, RHO_AIR};
use hl_solver::{CoilSpec, lagged_conductance};

/// Everything but the coil, for one room and one step.
#[derive(Debug, Clone, Copy)]
pub struct MoistureBalance {
    pub dt: f64,
    pub volume: f64,
    pub x_prev: f64,
    pub x_frt_prev: f64,
    pub cx: f64,
    pub gx: f64,
    /// Outdoor air entering the room (ventilation, infiltration, windows), m³/s.
    pub outdoor_flow: f64,
    pub x_o: f64,
    /// `Σ V_j` and `Σ V_j·x_j` over air coming from other rooms.
    pub inflow: f64,
    pub inflow_x: f64,
    /// Moisture generation, kg/s.
    pub gain: f64,
}

/// Air actually passing the coil surface and the humidity it leaves with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoilDuty {
    /// `V_ac·(1 - BF)`, m³/s.
    pub contact_flow: f64,
    pub x_exit: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoistureOutcome {
    pub x_r: f64,
    pub x_frt: f64,
    /// Latent load, W; negative while dehumidifying.
    pub latent_load: f64,
    /// The coil would have humidified the room and was switched off.
    pub coil_resolved: bool,
}

/// Coil airflow (m³/s) for a sensible cooling load `q_s` (W, positive),
/// interpolated between the rated points and held outside them.
pub fn coil_airflow(coil: &CoilSpec, q_s: f64) -> f64 {
    if q_s <= coil.q_min {
        coil.v_min
    } else if q_s >= coil.q_max {
        coil.v_max
    } else {
        coil.v_min + (coil.v_max - coil.v_min) * (q_s - coil.q_min) / (coil.q_max - coil.q_min)
    }
}

/// Coil operating point while removing `q_s` W of sensible heat from air at
/// `theta_r`. `None` without a cooling load.
pub fn coil_duty(coil: &CoilSpec, theta_r: f64, q_s: f64) -> Option<CoilDuty> {
    if !(q_s > 0.0) {
        return None;
    }
    let contact_flow = coil_airflow(coil, q_s) * (1.0 - coil.bypass_factor);
    let theta_exit = theta_r - q_s / (C_AIR * RHO_AIR * contact_flow);
    Some(CoilDuty {
        contact_flow,
        x_exit: saturation_humidity_ratio(theta_exit),
    })
}

impl MoistureBalance {
    fn solve_with(&self, coil: Option<CoilDuty>) -> (f64, f64) {
        let frt = lagged_conductance(self.cx, self.gx, self.dt);
        let storage = RHO_AIR * self.volume / self.dt;
        let (coil_g, coil_x) = coil
            .map(|c| (RHO_AIR * c.contact_flow, c.x_exit))
            .unwrap_or((0.0, 0.0));

        let lhs = storage + RHO_AIR * (self.outdoor_flow + self.inflow) + frt + coil_g;
        let rhs = storage * self.x_prev
            + RHO_AIR * (self.outdoor_flow * self.x_o + self.inflow_x)
            + frt * self.x_frt_prev
            + self.gain
            + coil_g * coil_x;
        let x_r = rhs / lhs;
        let latent = -coil_g * (x_r - coil_x) * L_WTR;
        (x_r, latent)
    }

    /// Solve the balance; a coil that would add moisture is switched off and
    /// the balance solved again.
    pub fn solve(&self, coil: Option<CoilDuty>) -> MoistureOutcome {
        let (mut x_r, mut latent_load) = self.solve_with(coil);
        let mut coil_resolved = false;
        if let Some(duty) = coil {
            if x_r < duty.x_exit {
                (x_r, latent_load) = self.solve_with(None);
                coil_resolved = true;
            }
        }
        let x_frt = if self.cx > 0.0 && self.gx > 0.0 {
            (self.cx * self.x_frt_prev + self.dt * self.gx * x_r) / (self.cx + self.dt * self.gx)
        } else {
            x_r
        };
        MoistureOutcome {
            x_r,
            x_frt,
            latent_load,
            coil_resolved,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn balance() -> MoistureBalance {
        MoistureBalance {
            dt: 900.0,
            volume: 50.0,
            x_prev: 0.012,
            x_frt_prev: 0.012,
            cx: 16.8 * 50.0,
            gx: 0.0018 * 16.8 * 50.0,
            outdoor_flow: 0.0,
            x_o: 0.012,
            inflow: 0.0,
            inflow_x: 0.0,
            gain: 0.0,
        }
    }

    #[test]
    fn closed_room_keeps_its_humidity() {
        let out = balance().solve(None);
        assert!((out.x_r - 0.012).abs() < 1e-15);
        assert_eq!(out.latent_load, 0.0);
    }

    #[test]
    fn ventilation_pulls_toward_outdoor() {
        let b = MoistureBalance {
            outdoor_flow: 0.05,
            x_o: 0.004,
            ..balance()
        };
        let out = b.solve(None);
        assert!(out.x_r < 0.012 && out.x_r > 0.004);
        assert!(out.x_frt < 0.012 && out.x_frt > out.x_r);
    }

    #[test]
    fn coil_dehumidifies() {
        let b = MoistureBalance {
            x_prev: 0.015,
            x_frt_prev: 0.015,
            x_o: 0.015,
            ..balance()
        };
        let coil = CoilSpec::default();
        let duty = coil_duty(&coil, 27.0, 3000.0).unwrap();
        assert!(duty.x_exit < 0.015);
        let out = b.solve(Some(duty));
        assert!(out.x_r < 0.015);
        assert!(out.latent_load < 0.0);
        assert!(!out.coil_resolved);
    }

    #[test]
    fn humidifying_coil_is_switched_off() {
        // dry room, warm coil exit: the coil would add moisture
        let b = MoistureBalance {
            x_prev: 0.003,
            x_frt_prev: 0.003,
            x_o: 0.003,
            ..balance()
        };
        let coil = CoilSpec::default();
        let duty = coil_duty(&coil, 27.0, 600.0).unwrap();
        assert!(duty.x_exit > 0.003);
        let out = b.solve(Some(duty));
        assert!(out.coil_resolved);
        assert_eq!(out.latent_load, 0.0);
        assert!((out.x_r - 0.003).abs() < 1e-15);
    }

    #[test]
    fn airflow_interpolation() {
        let coil = CoilSpec::default();
        assert_eq!(coil_airflow(&coil, 0.0), coil.v_min);
        assert_eq!(coil_airflow(&coil, 1e6), coil.v_max);
        let mid = coil_airflow(&coil, 0.5 * (coil.q_min + coil.q_max));
        assert!((mid - 0.5 * (coil.v_min + coil.v_max)).abs() < 1e-12);
        assert!(coil_duty(&coil, 25.0, 0.0).is_none());
    }
}
