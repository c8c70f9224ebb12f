//! Time-march runner and result recording.

use crate::error::{SimError, SimResult};
use crate::model::Model;
use crate::record::SimRecord;
use crate::state::SimState;
use crate::step::advance;
use hl_core::timing::{AccumulatingTimer, PerfStats, Timer};
use tracing::{info, warn};

/// Options for simulation runs.
#[derive(Clone, Debug)]
pub struct SimOptions {
    /// Fixed time step (seconds); must equal the step the network was
    /// assembled for.
    pub dt_s: f64,
    /// Recorded steps.
    pub steps: usize,
    /// Unrecorded steps run before step 0, reading the end of the series.
    pub run_up_steps: usize,
    /// Record every N-th step (decimation)
    pub record_every: usize,
    /// Starting air, furniture and surface temperature, °C.
    pub initial_temperature: f64,
    /// Starting humidity ratio, kg/kg(DA).
    pub initial_humidity: f64,
    /// Solve the rooms of a step on the rayon pool.
    pub parallel: bool,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            dt_s: 900.0,
            steps: 96,
            run_up_steps: 0,
            record_every: 1,
            initial_temperature: 15.0,
            initial_humidity: 0.008,
            parallel: true,
        }
    }
}

impl SimOptions {
    fn validate(&self, model: &Model) -> SimResult<()> {
        if !(self.dt_s > 0.0) {
            return Err(SimError::InvalidArg {
                what: "dt must be positive",
            });
        }
        if self.dt_s != model.dt() {
            return Err(SimError::InputMismatch {
                what: format!(
                    "time step {} s differs from the {} s the network was assembled for",
                    self.dt_s,
                    model.dt()
                ),
            });
        }
        if self.record_every == 0 {
            return Err(SimError::InvalidArg {
                what: "record_every must be positive",
            });
        }
        if !self.initial_temperature.is_finite() {
            return Err(SimError::InvalidArg {
                what: "initial temperature must be finite",
            });
        }
        if !(self.initial_humidity >= 0.0) || !self.initial_humidity.is_finite() {
            return Err(SimError::InvalidArg {
                what: "initial humidity must be non-negative",
            });
        }
        Ok(())
    }
}

/// Run from a uniform initial state.
pub fn run_sim(model: &Model, opts: &SimOptions) -> SimResult<SimRecord> {
    let state = SimState::uniform(model, opts.initial_temperature, opts.initial_humidity);
    run_sim_from(model, opts, state).map(|(record, _)| record)
}

/// Run from a given state; returns the record and the final state.
pub fn run_sim_from(
    model: &Model,
    opts: &SimOptions,
    initial: SimState,
) -> SimResult<(SimRecord, SimState)> {
    opts.validate(model)?;
    if initial.rooms.len() != model.network.room_count()
        || initial.boundaries.len() != model.network.boundary_count()
    {
        return Err(SimError::InputMismatch {
            what: "initial state does not match the network".to_string(),
        });
    }

    info!(
        rooms = model.network.room_count(),
        steps = opts.steps,
        run_up = opts.run_up_steps,
        dt = opts.dt_s,
        "starting simulation"
    );

    let rooms = model.network.room_count();
    let mut warned_coil = vec![false; rooms];
    let mut warned_shortfall = vec![false; rooms];
    let step_timer = AccumulatingTimer::new();
    let mut record = SimRecord::default();
    let mut state = initial;

    let first = -(opts.run_up_steps as i64);
    for step in first..opts.steps as i64 {
        let timer = Timer::start();
        let out = advance(model, &state, step, opts.parallel)?;
        if let Some(elapsed) = timer.stop() {
            step_timer.record(elapsed);
        }

        for (slot, room) in model.network.topology.rooms().iter().enumerate() {
            if out.coil_resolved[slot] && !warned_coil[slot] {
                warned_coil[slot] = true;
                warn!(room = %room.name, step, "coil would humidify; solved again without coil airflow");
            }
            if out.shortfall[slot] && !warned_shortfall[slot] {
                warned_shortfall[slot] = true;
                warn!(room = %room.name, step, "HVAC capacity reached; target not held");
            }
        }

        if step >= 0 && (step as usize + 1) % opts.record_every == 0 {
            record.t.push((step + 1) as f64 * opts.dt_s);
            record.rooms.push(out.rooms);
            record.boundaries.push(out.boundaries);
        }
        state = out.state;
    }

    record.perf = PerfStats {
        march_time_s: step_timer.total_seconds(),
        steps: step_timer.count() as usize,
        ..PerfStats::default()
    };
    info!(recorded = record.len(), "simulation finished");
    Ok((record, state))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sim_options_defaults() {
        let opts = SimOptions::default();
        assert_eq!(opts.dt_s, 900.0);
        assert_eq!(opts.record_every, 1);
        assert_eq!(opts.run_up_steps, 0);
        assert!(opts.parallel);
    }
}
