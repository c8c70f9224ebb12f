//! Heat and moisture released by occupants.

use hl_core::units::constants::L_WTR;

/// Total heat released per person, W.
const TOTAL_PER_PERSON: f64 = 119.0;

/// Sensible heat per person (W) at room temperature `theta_r`.
pub fn sensible_per_person(theta_r: f64) -> f64 {
    (63.0 - 4.0 * (theta_r - 24.0)).min(TOTAL_PER_PERSON)
}

/// Latent heat per person (W): the rest of the total.
pub fn latent_per_person(theta_r: f64) -> f64 {
    TOTAL_PER_PERSON - sensible_per_person(theta_r)
}

/// Moisture released per person, kg/s.
pub fn moisture_per_person(theta_r: f64) -> f64 {
    latent_per_person(theta_r) / L_WTR
}
