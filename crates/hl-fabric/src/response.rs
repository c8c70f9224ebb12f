//! Response-factor synthesis.
//!
//! A construction's step response to absorbed flux (absorption) and to the
//! rear temperature (transmission) is fitted as a constant plus a sum of
//! first-order terms on fixed roots, then discretised for a triangular pulse
//! one time step wide:
//!
//! ```text
//! phi_0   = A0 + Σ_j A_j (1 - e^{-α_j Δt}) / (α_j Δt)
//! phi_1,j = -A_j (1 - e^{-α_j Δt})² / (α_j Δt)
//! row_j   = e^{-α_j Δt}
//! ```
//!
//! so that the response at lag n ≥ 1 is `Σ_j phi_1,j · row_j^(n-1)`.

use nalgebra::{DMatrix, DVector};
use tracing::debug;

use crate::error::{FabricError, FabricResult};
use crate::four_terminal::cascade;
use crate::layer::Layer;
use crate::roots::{laplace_points, roots_for};

/// Discrete-time response factor of one boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseFactor {
    /// Initial absorption term, m²K/W.
    pub phi_a0: f64,
    /// Initial transmission term, dimensionless.
    pub phi_t0: f64,
    /// Absorption exponential-term amplitudes.
    pub phi_a1: Vec<f64>,
    /// Transmission exponential-term amplitudes.
    pub phi_t1: Vec<f64>,
    /// Per-step common ratios.
    pub row: Vec<f64>,
}

/// Knobs for the least-squares fit.
#[derive(Debug, Clone, Copy)]
pub struct SynthesisOptions {
    /// Fits whose design matrix exceeds this condition number are rejected.
    pub max_condition: f64,
}

impl Default for SynthesisOptions {
    fn default() -> Self {
        Self { max_condition: 1e10 }
    }
}

impl ResponseFactor {
    /// Closed form for a construction without thermal mass: all exponential
    /// terms zero, `phi_a0` the resistance seen from the inside surface.
    pub fn steady(r_behind_surface: f64, terms: usize) -> Self {
        Self {
            phi_a0: r_behind_surface,
            phi_t0: 1.0,
            phi_a1: vec![0.0; terms],
            phi_t1: vec![0.0; terms],
            row: vec![0.0; terms],
        }
    }

    /// Number of exponential terms.
    pub fn terms(&self) -> usize {
        self.row.len()
    }

    /// No exponential terms carry weight; the boundary has no memory.
    pub fn is_steady(&self) -> bool {
        self.phi_a1.iter().chain(&self.phi_t1).all(|&v| v == 0.0)
    }

    /// Sum of the absorption response over all lags: the steady-state
    /// resistance the factor reproduces.
    pub fn steady_absorption(&self) -> f64 {
        self.phi_a0
            + self
                .phi_a1
                .iter()
                .zip(&self.row)
                .map(|(a, r)| a / (1.0 - r))
                .sum::<f64>()
    }

    /// Sum of the transmission response over all lags.
    pub fn steady_transmission(&self) -> f64 {
        self.phi_t0
            + self
                .phi_t1
                .iter()
                .zip(&self.row)
                .map(|(t, r)| t / (1.0 - r))
                .sum::<f64>()
    }

    /// Absorption response at lag `n` (n = 0 is the initial term).
    pub fn absorption_at(&self, n: usize) -> f64 {
        if n == 0 {
            return self.phi_a0;
        }
        self.phi_a1
            .iter()
            .zip(&self.row)
            .map(|(a, r)| a * lag_power(*r, n - 1))
            .sum()
    }

    /// Transmission response at lag `n` (n = 0 is the initial term).
    pub fn transmission_at(&self, n: usize) -> f64 {
        if n == 0 {
            return self.phi_t0;
        }
        self.phi_t1
            .iter()
            .zip(&self.row)
            .map(|(t, r)| t * lag_power(*r, n - 1))
            .sum()
    }
}

/// `r^k` for a lag count that may exceed the `i32` exponent range.
fn lag_power(r: f64, k: usize) -> f64 {
    match i32::try_from(k) {
        Ok(k) => r.powi(k),
        Err(_) => r.powf(k as f64),
    }
}

/// Step-response coefficients in the Laplace domain: `A0 + Σ A_j s/(s+α_j)`.
#[derive(Debug, Clone)]
struct StepFit {
    a0: f64,
    amplitudes: DVector<f64>,
}

/// Least-squares fit of `values[i] ≈ Σ_j k_j s_i/(s_i+α_j)` for both responses.
fn fit_on_roots(
    points: &[f64],
    roots: &[f64],
    absorption: &DVector<f64>,
    transmission: &DVector<f64>,
    opts: SynthesisOptions,
) -> FabricResult<(DVector<f64>, DVector<f64>)> {
    let design = DMatrix::from_fn(points.len(), roots.len(), |i, j| {
        points[i] / (points[i] + roots[j])
    });

    let svd = design.svd(true, true);
    let sv = &svd.singular_values;
    let s_max = sv.max();
    let s_min = sv.min();
    if !(s_min > 0.0) {
        return Err(FabricError::FitFailed {
            what: "design matrix is singular".to_string(),
        });
    }
    let condition = s_max / s_min;
    if condition > opts.max_condition {
        return Err(FabricError::IllConditioned {
            condition,
            limit: opts.max_condition,
        });
    }

    let solve = |rhs: &DVector<f64>| {
        svd.solve(rhs, 0.0).map_err(|e| FabricError::FitFailed {
            what: e.to_string(),
        })
    };
    let ka = solve(absorption)?;
    let kt = solve(transmission)?;
    if ka.iter().chain(kt.iter()).any(|v| !v.is_finite()) {
        return Err(FabricError::FitFailed {
            what: "non-finite coefficient".to_string(),
        });
    }
    Ok((ka, kt))
}

/// Fit the absorption and transmission step responses of a layer stack.
fn fit_step_responses(
    layers: &[Layer],
    roots: &[f64],
    opts: SynthesisOptions,
) -> FabricResult<(StepFit, StepFit)> {
    let points = laplace_points(roots);
    let r_total: f64 = layers.iter().map(|l| l.r).sum();

    let mut ga = DVector::zeros(points.len());
    let mut gt = DVector::zeros(points.len());
    for (i, &s) in points.iter().enumerate() {
        let t = cascade(layers, s);
        ga[i] = t.absorption - r_total;
        gt[i] = t.transmission - 1.0;
    }

    let (ka, kt) = fit_on_roots(&points, roots, &ga, &gt, opts)?;
    Ok((
        StepFit {
            a0: r_total,
            amplitudes: ka,
        },
        StepFit {
            a0: 1.0,
            amplitudes: kt,
        },
    ))
}

/// Triangular-pulse discretisation of a fitted step response.
fn discretise(fit: &StepFit, roots: &[f64], dt: f64) -> (f64, Vec<f64>) {
    let mut phi0 = fit.a0;
    let mut phi1 = Vec::with_capacity(roots.len());
    for (&a, &alpha) in fit.amplitudes.iter().zip(roots) {
        let adt = alpha * dt;
        let one_minus_row = -(-adt).exp_m1();
        phi0 += a * one_minus_row / adt;
        phi1.push(-a * one_minus_row * one_minus_row / adt);
    }
    (phi0, phi1)
}

/// Synthesise the response factor of a layer stack (inside first, the
/// terminating resistance already appended).
///
/// Ground stacks keep their fitted absorption but force the transmission to
/// a pure initial term of 1: the far side is a constant deep-soil condition
/// that needs no convolution.
pub fn synthesize(
    layers: &[Layer],
    is_ground: bool,
    dt: f64,
    opts: SynthesisOptions,
) -> FabricResult<ResponseFactor> {
    if layers.is_empty() {
        return Err(FabricError::NoLayers {
            what: "layered construction",
        });
    }
    if !(dt > 0.0) || !dt.is_finite() {
        return Err(FabricError::InvalidConstruction {
            what: format!("time step must be positive, got {dt}"),
        });
    }

    let roots = roots_for(is_ground);
    if layers.iter().all(|l| !l.is_massive()) {
        let r_total: f64 = layers.iter().map(|l| l.r).sum();
        return Ok(ResponseFactor::steady(r_total, roots.len()));
    }

    let row: Vec<f64> = roots.iter().map(|a| (-a * dt).exp()).collect();
    let (absorption, transmission) = fit_step_responses(layers, roots, opts)?;
    let (phi_a0, phi_a1) = discretise(&absorption, roots, dt);
    let (phi_t0, phi_t1) = if is_ground {
        (1.0, vec![0.0; roots.len()])
    } else {
        discretise(&transmission, roots, dt)
    };

    debug!(
        layers = layers.len(),
        is_ground,
        phi_a0,
        phi_t0,
        steady_r = absorption.a0,
        "synthesised response factor"
    );

    Ok(ResponseFactor {
        phi_a0,
        phi_t0,
        phi_a1,
        phi_t1,
        row,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use hl_core::{Tolerances, nearly_equal};

    fn heavy_wall() -> Vec<Layer> {
        vec![
            Layer::from_material(0.0125, 0.22, 830_000.0).unwrap(),
            Layer::from_material(0.15, 1.6, 2_000_000.0).unwrap(),
            Layer::from_material(0.05, 0.04, 30_000.0).unwrap(),
            Layer::massless(0.04).unwrap(),
        ]
    }

    #[test]
    fn ratios_lie_in_unit_interval() {
        let rf = synthesize(&heavy_wall(), false, 900.0, SynthesisOptions::default()).unwrap();
        assert_eq!(rf.terms(), 8);
        assert!(rf.row.iter().all(|&r| r > 0.0 && r < 1.0));
    }

    #[test]
    fn zero_frequency_sum_reproduces_resistance() {
        let layers = heavy_wall();
        let r_total: f64 = layers.iter().map(|l| l.r).sum();
        let rf = synthesize(&layers, false, 900.0, SynthesisOptions::default()).unwrap();
        assert!(nearly_equal(rf.steady_absorption(), r_total, Tolerances::default()));
        assert!(nearly_equal(rf.steady_transmission(), 1.0, Tolerances::default()));
    }

    #[test]
    fn initial_terms_are_physical() {
        let rf = synthesize(&heavy_wall(), false, 900.0, SynthesisOptions::default()).unwrap();
        // a massive wall reacts to a pulse mostly through its inner skin
        assert!(rf.phi_a0 > 0.0);
        assert!(rf.phi_a0 < rf.steady_absorption());
        // outdoor pulses barely reach the inside surface within one step
        assert!(rf.phi_t0.abs() < 0.1);
    }

    #[test]
    fn empty_stack_is_rejected() {
        let err = synthesize(&[], false, 900.0, SynthesisOptions::default()).unwrap_err();
        assert!(matches!(err, FabricError::NoLayers { .. }));
    }

    #[test]
    fn tight_condition_limit_is_reported() {
        let opts = SynthesisOptions { max_condition: 1.0 };
        let err = synthesize(&heavy_wall(), false, 900.0, opts).unwrap_err();
        assert!(matches!(err, FabricError::IllConditioned { .. }));
    }

    #[test]
    fn massless_stack_collapses_to_closed_form() {
        let layers = [Layer::massless(0.11).unwrap(), Layer::massless(0.5).unwrap()];
        let rf = synthesize(&layers, false, 900.0, SynthesisOptions::default()).unwrap();
        assert!((rf.phi_a0 - 0.61).abs() < 1e-12);
        assert_eq!(rf.phi_t0, 1.0);
        assert!(rf.phi_a1.iter().all(|&v| v == 0.0));
        assert!(rf.row.iter().all(|&r| r == 0.0));
        assert!(rf.is_steady());
    }

    #[test]
    fn lags_beyond_i32_range_keep_decaying() {
        let rf = synthesize(&heavy_wall(), false, 900.0, SynthesisOptions::default()).unwrap();
        let far = i32::MAX as usize + 10;
        assert!(rf.absorption_at(far).abs() < 1e-30);
        assert!(rf.transmission_at(far).abs() < 1e-30);
        assert!((lag_power(0.5, far) - 0.0).abs() < 1e-300);
        assert_eq!(lag_power(0.5, 3), 0.125);
    }
}
