//! hl-core: stable foundation for heatload.
//!
//! Contains:
//! - units (uom SI types + constructors, air property constants)
//! - numeric (Real + tolerances + float helpers)
//! - ids (stable compact IDs for rooms, boundaries and ventilation edges)
//! - psychro (moist air relations consumed by the solver)
//! - series (cyclic exogenous time series)
//! - timing (wall-clock instrumentation for assembly and time marching)
//! - error (shared error types)

pub mod error;
pub mod ids;
pub mod numeric;
pub mod psychro;
pub mod series;
pub mod timing;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{HlError, HlResult};
pub use ids::*;
pub use numeric::*;
pub use series::Series;
pub use units::*;
