//! Thermal comfort and HVAC operation control for heatload.
//!
//! Each room carries an operation mode that is re-decided every step from
//! the predicted mean vote of its occupants at three clothing levels. The
//! active mode then fixes the clothing level and the comfort target that the
//! room solver holds the operative temperature to.
//!
//! - `pmv`: ISO 7730 predicted mean vote
//! - `target`: operative temperature that produces a given PMV
//! - `mode`: the operation-mode state machine
//! - `comfort`: met rate, air speed, clothing levels and PMV targets

pub mod comfort;
pub mod error;
pub mod mode;
pub mod pmv;
pub mod target;

pub use comfort::{Clothing, ComfortConfig};
pub use error::{ControlError, ControlResult};
pub use mode::{OperationMode, PmvByClothing, next_mode};
pub use pmv::{ComfortInputs, pmv};
pub use target::target_operative_temperature;
