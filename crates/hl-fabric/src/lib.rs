//! Building fabric: layered constructions and their transient conduction
//! response.
//!
//! Provides:
//! - `Layer` / `Construction`: ordered R-C stacks tagged by what terminates them
//! - Response-factor synthesis: four-terminal cascade, least-squares fit on
//!   fixed decay roots, triangular-pulse discretisation
//! - `ConvolutionMemory`: the O(m) recursive history carried step to step

pub mod construction;
pub mod error;
pub mod four_terminal;
pub mod layer;
pub mod memory;
pub mod response;
pub mod roots;

pub use construction::Construction;
pub use error::{FabricError, FabricResult};
pub use layer::Layer;
pub use memory::ConvolutionMemory;
pub use response::{ResponseFactor, SynthesisOptions};
pub use roots::{GROUND_ROOTS, WALL_ROOTS};
