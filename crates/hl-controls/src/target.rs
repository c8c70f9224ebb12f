//! Operative temperature targets derived from PMV targets.

use crate::comfort::{Clothing, ComfortConfig};
use crate::error::{ControlError, ControlResult};
use crate::pmv::{ComfortInputs, pmv};

const BISECTION_STEPS: usize = 60;
const BISECTION_TOLERANCE: f64 = 1e-6;

/// Operative temperature at which occupants wearing `clothing` vote
/// `pmv_target`, with air and radiant temperature equal.
pub fn target_operative_temperature(
    cfg: &ComfortConfig,
    clothing: Clothing,
    humidity_ratio: f64,
    pmv_target: f64,
) -> ControlResult<f64> {
    let vote = |theta: f64| -> ControlResult<f64> {
        let value = pmv(&ComfortInputs {
            theta_air: theta,
            theta_mrt: theta,
            humidity_ratio,
            air_velocity: cfg.air_velocity,
            met: cfg.met,
            clo: cfg.clo(clothing),
        })?;
        if !value.is_finite() {
            return Err(ControlError::NonFinitePmv {
                clothing: clothing.name(),
                value,
            });
        }
        Ok(value - pmv_target)
    };

    let (mut lo, mut hi) = (cfg.ot_search_min, cfg.ot_search_max);
    let (f_lo, f_hi) = (vote(lo)?, vote(hi)?);
    if f_lo > 0.0 || f_hi < 0.0 {
        return Err(ControlError::TargetNotBracketed {
            target: pmv_target,
            lo,
            hi,
        });
    }
    for _ in 0..BISECTION_STEPS {
        let mid = 0.5 * (lo + hi);
        if vote(mid)? < 0.0 {
            lo = mid;
        } else {
            hi = mid;
        }
        if hi - lo < BISECTION_TOLERANCE {
            break;
        }
    }
    Ok(0.5 * (lo + hi))
}
