//! Project schema definitions.

use hl_controls::ComfortConfig;
use hl_core::Series;
use hl_sim::Infiltration;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    pub version: u32,
    pub name: String,
    pub simulation: SimulationDef,
    pub weather: WeatherDef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comfort: Option<ComfortConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solver: Option<SolverDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub infiltration: Option<Infiltration>,
    #[serde(default)]
    pub constructions: Vec<ConstructionDef>,
    #[serde(default)]
    pub rooms: Vec<RoomDef>,
    #[serde(default)]
    pub boundaries: Vec<BoundaryDef>,
    #[serde(default)]
    pub ventilation: Vec<VentilationDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimulationDef {
    pub dt_s: f64,
    pub steps: usize,
    #[serde(default)]
    pub run_up_steps: usize,
    #[serde(default = "default_record_every")]
    pub record_every: usize,
    #[serde(default = "default_initial_temperature")]
    pub initial_temperature: f64,
    #[serde(default = "default_initial_humidity")]
    pub initial_humidity: f64,
}

fn default_record_every() -> usize {
    1
}

fn default_initial_temperature() -> f64 {
    15.0
}

fn default_initial_humidity() -> f64 {
    0.008
}

/// A constant or a per-step list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum SeriesDef {
    Constant(f64),
    Values(Vec<f64>),
}

impl Default for SeriesDef {
    fn default() -> Self {
        SeriesDef::Constant(0.0)
    }
}

impl SeriesDef {
    pub fn to_series(&self) -> Series {
        match self {
            SeriesDef::Constant(v) => Series::Constant(*v),
            SeriesDef::Values(values) => Series::Values(values.clone()),
        }
    }

    pub fn scaled(&self, factor: f64) -> Series {
        match self {
            SeriesDef::Constant(v) => Series::Constant(v * factor),
            SeriesDef::Values(values) => Series::Values(values.iter().map(|v| v * factor).collect()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeatherDef {
    /// Outdoor temperature, °C.
    pub theta_o: SeriesDef,
    /// Outdoor humidity ratio, kg/kg(DA).
    pub x_o: SeriesDef,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SolverDef {
    #[serde(default = "default_max_condition")]
    pub max_condition: f64,
    #[serde(default = "default_ot_convective_weight")]
    pub ot_convective_weight: f64,
    #[serde(default = "default_true")]
    pub parallel: bool,
}

fn default_max_condition() -> f64 {
    1e10
}

fn default_ot_convective_weight() -> f64 {
    0.5
}

fn default_true() -> bool {
    true
}

/// One layer, either from material data or as R and C directly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum LayerDef {
    Material {
        thickness_m: f64,
        conductivity: f64,
        volumetric_heat_capacity: f64,
    },
    Resistance {
        r: f64,
        #[serde(default)]
        c: f64,
    },
}

/// Named layer stack, room side first.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConstructionDef {
    pub id: String,
    pub layers: Vec<LayerDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoomDef {
    pub id: String,
    pub volume_m3: f64,
    pub floor_area_m2: f64,
    #[serde(default)]
    pub ventilation_m3_per_h: f64,
    /// Pre-v2 files gave outdoor ventilation in air changes per hour.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ventilation_ach: Option<f64>,
    #[serde(default)]
    pub natural_ventilation_m3_per_h: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub furniture: Option<FurnitureDef>,
    #[serde(default)]
    pub hvac: HvacDef,
    #[serde(default)]
    pub schedule: ScheduleDef,
    #[serde(default)]
    pub q_sol_furniture_w: SeriesDef,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct FurnitureDef {
    pub c: f64,
    pub g: f64,
    pub cx: f64,
    pub gx: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct HvacDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radiant_heating_w: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radiant_cooling_w: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub convective_heating_w: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub convective_cooling_w: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coil: Option<CoilDef>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CoilDef {
    pub q_min_w: f64,
    pub q_max_w: f64,
    pub v_min_m3_per_min: f64,
    pub v_max_m3_per_min: f64,
    pub bypass_factor: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ScheduleDef {
    #[serde(default)]
    pub heat_gain_w: SeriesDef,
    #[serde(default)]
    pub moisture_gain_kg_per_s: SeriesDef,
    #[serde(default)]
    pub occupants: SeriesDef,
    #[serde(default)]
    pub demand: SeriesDef,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BoundaryDef {
    pub id: String,
    pub room: String,
    pub area_m2: f64,
    pub kind: BoundaryKindDef,
    #[serde(default = "default_h_c")]
    pub h_c: f64,
    #[serde(default = "default_h_r")]
    pub h_r: f64,
    /// Floor surfaces receive the radiant HVAC output unless fractions are given.
    #[serde(default)]
    pub floor: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radiant_fraction: Option<f64>,
    /// Equivalent outdoor temperature; defaults to the outdoor temperature,
    /// or its mean for ground boundaries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theta_eo: Option<SeriesDef>,
    #[serde(default)]
    pub q_sol_w_per_m2: SeriesDef,
}

fn default_h_c() -> f64 {
    4.4
}

fn default_h_r() -> f64 {
    4.7
}

fn default_r_outer() -> f64 {
    0.04
}

fn default_r_inner() -> f64 {
    0.11
}

fn default_temp_diff_coeff() -> f64 {
    1.0
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BoundaryKindDef {
    Outdoor {
        construction: String,
        #[serde(default = "default_r_outer")]
        r_outer: f64,
        #[serde(default = "default_temp_diff_coeff")]
        temp_diff_coeff: f64,
    },
    Ground {
        construction: String,
    },
    Partition {
        construction: String,
        rear_room: String,
        #[serde(default = "default_r_inner")]
        r_rear: f64,
    },
    Opening {
        u_value: f64,
        #[serde(default = "default_r_inner")]
        r_inner: f64,
        #[serde(default = "default_temp_diff_coeff")]
        temp_diff_coeff: f64,
    },
}

impl BoundaryKindDef {
    pub fn construction(&self) -> Option<&str> {
        match self {
            BoundaryKindDef::Outdoor { construction, .. }
            | BoundaryKindDef::Ground { construction }
            | BoundaryKindDef::Partition { construction, .. } => Some(construction),
            BoundaryKindDef::Opening { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VentilationDef {
    pub id: String,
    pub from: String,
    pub to: String,
    pub flow_m3_per_h: f64,
}
