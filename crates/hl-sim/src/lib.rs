//! Time marching of the assembled building.
//!
//! Provides:
//! - per-step solution of every room: operation mode, operative-temperature
//!   balance with HVAC loads, surface back-substitution, convolution update
//! - room moisture balance with furniture buffering and coil dehumidification
//! - occupant gains and building-wide infiltration
//! - the runner with run-up, decimated recording and timing

pub mod error;
pub mod infiltration;
pub mod model;
pub mod moisture;
pub mod occupants;
pub mod record;
pub mod series;
pub mod sim;
pub mod state;
pub mod step;

pub use error::{SimError, SimResult};
pub use infiltration::{Infiltration, Structure};
pub use model::Model;
pub use record::{BoundaryRecord, RoomRecord, SimRecord};
pub use series::{ScheduleSeries, WeatherSeries};
pub use sim::{SimOptions, run_sim, run_sim_from};
pub use state::{BoundaryState, RoomState, SimState};
pub use step::{Advanced, LoadDecision, OperativeBalance, advance, decide_loads};
