//! Constructions: what closes a layer stack determines how it is synthesised.

use crate::error::{FabricError, FabricResult};
use crate::layer::Layer;
use crate::response::{self, ResponseFactor, SynthesisOptions};
use crate::roots::WALL_ROOTS;

/// Soil slab appended below ground-contact constructions: 3 m at 1 W/mK
/// and 3300 kJ/m³K.
pub const SOIL_LAYER: Layer = Layer {
    r: 3.0,
    c: 3300.0e3 * 3.0,
};

/// A room-facing construction, tagged by what terminates it.
///
/// Layers are ordered from the room side outward.
#[derive(Debug, Clone, PartialEq)]
pub enum Construction {
    /// Exposed to outdoor air through an outside film resistance.
    Outdoor { layers: Vec<Layer>, r_outer: f64 },
    /// Resting on soil; the far side is the deep-ground temperature.
    Ground { layers: Vec<Layer> },
    /// Shared with another room; closed by that side's combined film resistance.
    Partition { layers: Vec<Layer>, r_rear: f64 },
    /// Window or door with no thermal mass, described by its U-value and
    /// inside film resistance.
    Opening { u_value: f64, r_inner: f64 },
}

impl Construction {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Construction::Outdoor { .. } => "outdoor",
            Construction::Ground { .. } => "ground",
            Construction::Partition { .. } => "partition",
            Construction::Opening { .. } => "opening",
        }
    }

    pub fn is_ground(&self) -> bool {
        matches!(self, Construction::Ground { .. })
    }

    /// Full stack handed to the synthesiser, terminating resistance included.
    pub fn stack(&self) -> FabricResult<Vec<Layer>> {
        let (layers, tail) = match self {
            Construction::Outdoor { layers, r_outer } => {
                (layers, Layer::massless(*r_outer)?)
            }
            Construction::Ground { layers } => (layers, SOIL_LAYER),
            Construction::Partition { layers, r_rear } => (layers, Layer::massless(*r_rear)?),
            Construction::Opening { .. } => {
                return Err(FabricError::InvalidConstruction {
                    what: "openings have no layer stack".to_string(),
                });
            }
        };
        if layers.is_empty() {
            return Err(FabricError::NoLayers {
                what: self.kind_name(),
            });
        }
        let mut stack = layers.clone();
        stack.push(tail);
        Ok(stack)
    }

    /// Steady-state U-value including the inside film resistance `r_inner`.
    pub fn u_value(&self, r_inner: f64) -> FabricResult<f64> {
        match self {
            Construction::Opening { u_value, .. } => Ok(*u_value),
            _ => {
                let r: f64 = self.stack()?.iter().map(|l| l.r).sum();
                Ok(1.0 / (r + r_inner))
            }
        }
    }

    /// Response factor for a simulation step of `dt` seconds.
    pub fn response_factor(
        &self,
        dt: f64,
        opts: SynthesisOptions,
    ) -> FabricResult<ResponseFactor> {
        match self {
            Construction::Opening { u_value, r_inner } => opening_response(*u_value, *r_inner),
            _ => response::synthesize(&self.stack()?, self.is_ground(), dt, opts),
        }
    }
}

/// Closed form for a massless opening: `phi_a0 = 1/U_so`, `U_so = 1/(1/U - r_i)`.
fn opening_response(u_value: f64, r_inner: f64) -> FabricResult<ResponseFactor> {
    if !(u_value > 0.0) || !u_value.is_finite() {
        return Err(FabricError::InvalidConstruction {
            what: format!("opening U-value must be positive, got {u_value}"),
        });
    }
    if !(r_inner >= 0.0) {
        return Err(FabricError::InvalidConstruction {
            what: format!("inside film resistance must be non-negative, got {r_inner}"),
        });
    }
    let r_so = 1.0 / u_value - r_inner;
    if !(r_so > 0.0) {
        return Err(FabricError::InvalidConstruction {
            what: format!(
                "opening U-value {u_value} leaves no resistance behind the inside film {r_inner}"
            ),
        });
    }
    let u_so = 1.0 / r_so;
    Ok(ResponseFactor::steady(1.0 / u_so, WALL_ROOTS.len()))
}
