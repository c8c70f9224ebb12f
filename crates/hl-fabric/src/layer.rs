//! Homogeneous layer of a construction.

use crate::error::{FabricError, FabricResult};

/// One layer: thermal resistance (m²K/W) and heat capacity (J/m²K).
///
/// A zero capacity marks a massless layer (air gap, film, thin membrane).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layer {
    pub r: f64,
    pub c: f64,
}

impl Layer {
    /// Validated constructor.
    pub fn new(r: f64, c: f64) -> FabricResult<Self> {
        if !r.is_finite() || r < 0.0 {
            return Err(FabricError::InvalidLayer {
                what: format!("resistance must be finite and non-negative, got {r}"),
            });
        }
        if !c.is_finite() || c < 0.0 {
            return Err(FabricError::InvalidLayer {
                what: format!("capacity must be finite and non-negative, got {c}"),
            });
        }
        Ok(Self { r, c })
    }

    /// A layer without thermal mass.
    pub fn massless(r: f64) -> FabricResult<Self> {
        Self::new(r, 0.0)
    }

    /// Layer from material properties: thickness (m), conductivity (W/mK) and
    /// volumetric heat capacity (J/m³K).
    pub fn from_material(
        thickness: f64,
        conductivity: f64,
        volumetric_heat_capacity: f64,
    ) -> FabricResult<Self> {
        if !(conductivity > 0.0) {
            return Err(FabricError::InvalidLayer {
                what: format!("conductivity must be positive, got {conductivity}"),
            });
        }
        Self::new(
            thickness / conductivity,
            thickness * volumetric_heat_capacity,
        )
    }

    pub fn is_massive(&self) -> bool {
        self.c > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_material_concrete() {
        // 150 mm concrete, 1.6 W/mK, 2000 kJ/m³K
        let layer = Layer::from_material(0.15, 1.6, 2.0e6).unwrap();
        assert!((layer.r - 0.09375).abs() < 1e-12);
        assert!((layer.c - 3.0e5).abs() < 1e-6);
        assert!(layer.is_massive());
    }

    #[test]
    fn rejects_negative_values() {
        assert!(Layer::new(-0.1, 0.0).is_err());
        assert!(Layer::new(0.1, -1.0).is_err());
        assert!(Layer::from_material(0.1, 0.0, 1.0e6).is_err());
        assert!(!Layer::massless(0.17).unwrap().is_massive());
    }
}
