//! Predicted mean vote after ISO 7730.

use crate::error::{ControlError, ControlResult};
use hl_core::psychro::vapor_pressure;
use hl_core::units::constants::KELVIN_OFFSET;

const MAX_ITERATIONS: usize = 150;
const TCL_TOLERANCE: f64 = 1.5e-4;

/// Conditions around one occupant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComfortInputs {
    /// Air temperature, °C.
    pub theta_air: f64,
    /// Mean radiant temperature, °C.
    pub theta_mrt: f64,
    /// Humidity ratio, kg/kg(DA).
    pub humidity_ratio: f64,
    /// Relative air speed, m/s.
    pub air_velocity: f64,
    /// Metabolic rate, met.
    pub met: f64,
    /// Clothing insulation, clo.
    pub clo: f64,
}

/// Predicted mean vote; no external work.
///
/// The clothing surface temperature is found by the standard fixed-point
/// iteration. Failing to converge is an error rather than a clamped value.
pub fn pmv(c: &ComfortInputs) -> ControlResult<f64> {
    if !(c.met > 0.0) || !(c.clo >= 0.0) || !(c.air_velocity >= 0.0) {
        return Err(ControlError::InvalidArg {
            what: "met must be positive, clo and air speed non-negative",
        });
    }

    let ta = c.theta_air;
    let pa = vapor_pressure(c.humidity_ratio);
    let icl = 0.155 * c.clo;
    let m = c.met * 58.15;
    let mw = m;
    let fcl = if icl <= 0.078 {
        1.0 + 1.29 * icl
    } else {
        1.05 + 0.645 * icl
    };
    let hc_forced = 12.1 * c.air_velocity.sqrt();
    let taa = ta + KELVIN_OFFSET;
    let tra = c.theta_mrt + KELVIN_OFFSET;

    // iteration for the clothing surface temperature, scaled by 1/100
    let tcla = taa + (35.5 - ta) / (3.5 * icl + 0.1);
    let p1 = icl * fcl;
    let p2 = p1 * 3.96;
    let p3 = p1 * 100.0;
    let p4 = p1 * taa;
    let p5 = 308.7 - 0.028 * mw + p2 * (tra / 100.0).powi(4);
    let mut xn = tcla / 100.0;
    let mut xf = tcla / 50.0;
    let mut hc = hc_forced;
    let mut converged = false;
    for _ in 0..MAX_ITERATIONS {
        xf = (xf + xn) / 2.0;
        let hc_natural = 2.38 * (100.0 * xf - taa).abs().powf(0.25);
        hc = hc_forced.max(hc_natural);
        xn = (p5 + p4 * hc - p2 * xf.powi(4)) / (100.0 + p3 * hc);
        if (xn - xf).abs() <= TCL_TOLERANCE {
            converged = true;
            break;
        }
    }
    if !converged {
        return Err(ControlError::NoConvergence {
            iterations: MAX_ITERATIONS,
        });
    }
    let tcl = 100.0 * xn - KELVIN_OFFSET;

    // heat loss components, W/m²
    let skin_diffusion = 3.05e-3 * (5733.0 - 6.99 * mw - pa);
    let sweat = if mw > 58.15 { 0.42 * (mw - 58.15) } else { 0.0 };
    let latent_respiration = 1.7e-5 * m * (5867.0 - pa);
    let dry_respiration = 0.0014 * m * (34.0 - ta);
    let radiation = 3.96 * fcl * (xn.powi(4) - (tra / 100.0).powi(4));
    let convection = fcl * hc * (tcl - ta);

    let ts = 0.303 * (-0.036 * m).exp() + 0.028;
    Ok(ts
        * (mw
            - skin_diffusion
            - sweat
            - latent_respiration
            - dry_respiration
            - radiation
            - convection))
}
