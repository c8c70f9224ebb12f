//! Convolution memory of one boundary.
//!
//! Instead of the full flux and temperature history, each boundary carries
//! one running value per root. Advancing it is O(m):
//!
//! ```text
//! θ'a[j] <- phi_a1[j]·q + row[j]·θ'a[j]
//! θ't[j] <- phi_t1[j]·θ_drive + row[j]·θ't[j]
//! ```
//!
//! where `q` and `θ_drive` belong to the step just solved; afterwards the
//! arrays hold the history contribution for the step being entered.

use crate::response::ResponseFactor;

#[derive(Debug, Clone, PartialEq)]
pub struct ConvolutionMemory {
    pub theta_dsh_a: Vec<f64>,
    pub theta_dsh_t: Vec<f64>,
}

impl ConvolutionMemory {
    /// Empty history sized for a response factor.
    pub fn zeroed(rf: &ResponseFactor) -> Self {
        Self {
            theta_dsh_a: vec![0.0; rf.terms()],
            theta_dsh_t: vec![0.0; rf.terms()],
        }
    }

    /// History as if flux `q` and drive `theta_drive` had held forever.
    pub fn settled(rf: &ResponseFactor, q: f64, theta_drive: f64) -> Self {
        let settle = |amp: &[f64], x: f64| -> Vec<f64> {
            amp.iter()
                .zip(&rf.row)
                .map(|(a, r)| a * x / (1.0 - r))
                .collect()
        };
        Self {
            theta_dsh_a: settle(&rf.phi_a1, q),
            theta_dsh_t: settle(&rf.phi_t1, theta_drive),
        }
    }

    /// Memory for the next step given this step's flux and drive.
    pub fn advanced(&self, rf: &ResponseFactor, q: f64, theta_drive: f64) -> Self {
        let step = |mem: &[f64], amp: &[f64], x: f64| -> Vec<f64> {
            mem.iter()
                .zip(amp)
                .zip(&rf.row)
                .map(|((m, a), r)| a * x + r * m)
                .collect()
        };
        Self {
            theta_dsh_a: step(&self.theta_dsh_a, &rf.phi_a1, q),
            theta_dsh_t: step(&self.theta_dsh_t, &rf.phi_t1, theta_drive),
        }
    }

    /// Absorption history contribution to the surface temperature.
    pub fn absorption_sum(&self) -> f64 {
        self.theta_dsh_a.iter().sum()
    }

    /// Transmission history contribution to the surface temperature.
    pub fn transmission_sum(&self) -> f64 {
        self.theta_dsh_t.iter().sum()
    }

    /// Surface temperature excluding the current flux: `phi_t0·θ_drive + history`.
    pub fn known_surface_part(&self, rf: &ResponseFactor, theta_drive: f64) -> f64 {
        rf.phi_t0 * theta_drive + self.absorption_sum() + self.transmission_sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toy_factor() -> ResponseFactor {
        ResponseFactor {
            phi_a0: 0.1,
            phi_t0: 0.02,
            phi_a1: vec![0.05, -0.01],
            phi_t1: vec![0.3, 0.1],
            row: vec![0.9, 0.5],
        }
    }

    #[test]
    fn advance_is_linear_recursion() {
        let rf = toy_factor();
        let mem = ConvolutionMemory::zeroed(&rf).advanced(&rf, 2.0, 10.0);
        assert_eq!(mem.theta_dsh_a, vec![0.1, -0.02]);
        assert_eq!(mem.theta_dsh_t, vec![3.0, 1.0]);

        let mem2 = mem.advanced(&rf, 0.0, 0.0);
        assert!((mem2.theta_dsh_a[0] - 0.09).abs() < 1e-15);
        assert!((mem2.theta_dsh_t[1] - 0.5).abs() < 1e-15);
    }

    #[test]
    fn settled_memory_is_a_fixed_point() {
        let rf = toy_factor();
        let mem = ConvolutionMemory::settled(&rf, 1.5, 7.0);
        let next = mem.advanced(&rf, 1.5, 7.0);
        for (a, b) in mem.theta_dsh_a.iter().zip(&next.theta_dsh_a) {
            assert!((a - b).abs() < 1e-12);
        }
        for (a, b) in mem.theta_dsh_t.iter().zip(&next.theta_dsh_t) {
            assert!((a - b).abs() < 1e-12);
        }
    }
}
