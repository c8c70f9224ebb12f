//! Room network assembly for heatload.
//!
//! Turns the building topology plus per-room and per-boundary inputs into the
//! static coefficients the time march needs: response factors for every
//! boundary, the inverted surface matrix of every room and the reduction
//! coefficients of the room air and operative temperature balances.

pub mod assembly;
pub mod config;
pub mod error;
pub mod input;
pub mod network;

pub use assembly::assemble;
pub use config::SolverConfig;
pub use error::{SolverError, SolverResult};
pub use input::{BoundaryInput, CoilSpec, Furniture, Hvac, RoomInput};
pub use network::{AssembledBoundary, AssembledRoom, Inflow, Network, lagged_conductance};
