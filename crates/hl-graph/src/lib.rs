//! hl-graph: building topology layer for heatload.
//!
//! Provides:
//! - Core topology data structures (Room, Surface, VentEdge, Topology)
//! - Incremental topology builder with validation
//! - Name-to-id indexing for resolving input references
//!
//! # Example
//!
//! ```
//! use hl_graph::{RearSide, TopologyBuilder};
//!
//! let mut builder = TopologyBuilder::new();
//! let a = builder.add_room("Living");
//! let b = builder.add_room("Bedroom");
//! builder.add_surface("living-wall", a, RearSide::Outdoor);
//! builder.add_surface("bedroom-wall", b, RearSide::Outdoor);
//! builder.add_ventilation("transfer", a, b, 30.0 / 3600.0);
//! let topo = builder.build().unwrap();
//!
//! assert_eq!(topo.rooms().len(), 2);
//! assert_eq!(topo.inflows(b).len(), 1);
//! ```

pub mod builder;
pub mod error;
pub mod indexing;
pub mod topology;
pub(crate) mod validate;

// Re-exports for ergonomics
pub use builder::TopologyBuilder;
pub use error::GraphError;
pub use indexing::NameIndex;
pub use topology::{RearSide, Room, Surface, Topology, VentEdge};
