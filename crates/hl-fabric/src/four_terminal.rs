//! Four-terminal (ABCD) matrices of layered constructions in the Laplace domain.
//!
//! Convention: `[θ_in; q_in] = F · [θ_out; q_out]`, heat flux positive from
//! the inside face towards the outside face. Layers cascade inside first.

use nalgebra::Matrix2;

use crate::layer::Layer;

/// Above this hyperbolic argument cosh and sinh agree to machine precision.
const ASYMPTOTIC_ARG: f64 = 40.0;

/// Rescale the running product once entries pass this magnitude.
const RESCALE_ABOVE: f64 = 1e100;

/// Absorption and transmission transfer values at one Laplace point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transfer {
    /// Inside surface temperature per unit absorbed flux, outside held at zero (`B/D`).
    pub absorption: f64,
    /// Inside surface temperature per unit outside temperature, inside adiabatic (`1/D`).
    pub transmission: f64,
}

/// Layer matrix divided by `exp(ln_scale)`, returned with `ln_scale`.
fn layer_matrix_scaled(layer: &Layer, s: f64) -> (Matrix2<f64>, f64) {
    if !layer.is_massive() || s == 0.0 {
        return (Matrix2::new(1.0, layer.r, 0.0, 1.0), 0.0);
    }
    let x = (layer.r * layer.c * s).sqrt();
    if layer.r == 0.0 {
        // pure capacity: lim R->0 of the hyperbolic matrix
        return (Matrix2::new(1.0, 0.0, layer.c * s, 1.0), 0.0);
    }
    if x > ASYMPTOTIC_ARG {
        let m = Matrix2::new(1.0, layer.r / x, x / layer.r, 1.0);
        return (m, x - std::f64::consts::LN_2);
    }
    let (ch, sh) = (x.cosh(), x.sinh());
    (Matrix2::new(ch, layer.r * sh / x, x * sh / layer.r, ch), 0.0)
}

/// Four-terminal matrix of a single layer.
pub fn layer_matrix(layer: &Layer, s: f64) -> Matrix2<f64> {
    let (m, ln_scale) = layer_matrix_scaled(layer, s);
    m * ln_scale.exp()
}

/// Cascade layers (inside first) and extract the transfer values at `s`.
pub fn cascade(layers: &[Layer], s: f64) -> Transfer {
    let mut total = Matrix2::identity();
    let mut ln_scale = 0.0;
    for layer in layers {
        let (m, ln) = layer_matrix_scaled(layer, s);
        total *= m;
        ln_scale += ln;
        let big: f64 = total.amax();
        if big > RESCALE_ABOVE {
            total /= big;
            ln_scale += big.ln();
        }
    }
    let d = total[(1, 1)];
    Transfer {
        absorption: total[(0, 1)] / d,
        transmission: (-(d.ln() + ln_scale)).exp(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn massless_stack_is_series_resistance() {
        let layers = [
            Layer::massless(0.11).unwrap(),
            Layer::massless(2.0).unwrap(),
            Layer::massless(0.04).unwrap(),
        ];
        let t = cascade(&layers, 1e-3);
        assert!((t.absorption - 2.15).abs() < 1e-12);
        assert!((t.transmission - 1.0).abs() < 1e-12);
    }

    #[test]
    fn layer_matrix_has_unit_determinant() {
        let layer = Layer::new(0.1, 2.0e5).unwrap();
        for s in [1e-6, 1e-4, 1e-2] {
            let m = layer_matrix(&layer, s);
            let scale = (m[(0, 0)] * m[(1, 1)]).abs().max(1.0);
            assert!((m.determinant() - 1.0).abs() < 1e-12 * scale);
        }
    }

    #[test]
    fn transfer_approaches_steady_state_at_low_frequency() {
        let layers = [
            Layer::new(0.09, 3.0e5).unwrap(),
            Layer::new(2.5, 2.0e3).unwrap(),
            Layer::massless(0.04).unwrap(),
        ];
        let t = cascade(&layers, 1e-12);
        assert!((t.absorption - 2.63).abs() < 1e-4);
        assert!((t.transmission - 1.0).abs() < 1e-4);
    }

    #[test]
    fn thick_soil_does_not_overflow() {
        let layers = [Layer::new(0.2, 4.0e5).unwrap(), Layer::new(3.0, 9.9e6).unwrap()];
        let t = cascade(&layers, 1.0);
        assert!(t.absorption.is_finite());
        assert!(t.transmission.is_finite());
        assert!(t.transmission >= 0.0 && t.transmission < 1e-10);
    }
}
