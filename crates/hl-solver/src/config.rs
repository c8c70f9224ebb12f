//! Assembly configuration.

use hl_fabric::SynthesisOptions;

#[derive(Debug, Clone, Copy)]
pub struct SolverConfig {
    /// Rooms whose surface matrix exceeds this condition number are rejected.
    pub max_condition: f64,
    /// Passed on to response-factor synthesis.
    pub synthesis: SynthesisOptions,
    /// Convective weight `k_c` of the operative temperature; `k_r = 1 - k_c`.
    pub ot_convective_weight: f64,
    /// Run per-room assembly on the rayon pool.
    pub parallel: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_condition: 1e10,
            synthesis: SynthesisOptions::default(),
            ot_convective_weight: 0.5,
            parallel: true,
        }
    }
}
