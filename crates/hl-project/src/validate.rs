//! Project validation logic.

use crate::schema::{BoundaryDef, BoundaryKindDef, LayerDef, Project, RoomDef, SeriesDef};
use hl_core::{ensure_finite, ensure_non_negative, ensure_positive};
use std::collections::HashSet;

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Missing reference: {id} in {context}")]
    MissingReference { id: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

fn invalid(field: impl Into<String>, value: impl ToString, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.into(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn positive(field: impl Into<String>, value: f64, reason: &str) -> Result<f64, ValidationError> {
    ensure_positive(value, "value").map_err(|_| invalid(field, value, reason))
}

fn non_negative(field: impl Into<String>, value: f64, reason: &str) -> Result<f64, ValidationError> {
    ensure_non_negative(value, "value").map_err(|_| invalid(field, value, reason))
}

pub fn validate_project(project: &Project) -> Result<(), ValidationError> {
    if project.version != crate::migrate::LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: project.version,
        });
    }

    let sim = &project.simulation;
    positive("simulation.dt_s", sim.dt_s, "must be positive")?;
    if sim.record_every == 0 {
        return Err(invalid("simulation.record_every", 0, "must be at least 1"));
    }
    ensure_finite(sim.initial_temperature, "initial temperature").map_err(|_| {
        invalid(
            "simulation.initial_temperature",
            sim.initial_temperature,
            "must be finite",
        )
    })?;
    non_negative(
        "simulation.initial_humidity",
        sim.initial_humidity,
        "must be non-negative",
    )?;

    validate_series("weather.theta_o", &project.weather.theta_o)?;
    validate_series("weather.x_o", &project.weather.x_o)?;

    if let Some(solver) = &project.solver {
        if !(solver.max_condition > 1.0) {
            return Err(invalid(
                "solver.max_condition",
                solver.max_condition,
                "must exceed 1",
            ));
        }
        if !(0.0..=1.0).contains(&solver.ot_convective_weight) {
            return Err(invalid(
                "solver.ot_convective_weight",
                solver.ot_convective_weight,
                "must lie in [0, 1]",
            ));
        }
    }

    if let Some(inf) = &project.infiltration {
        non_negative("infiltration.c_value", inf.c_value, "must be non-negative")?;
    }

    let mut construction_ids = HashSet::new();
    for construction in &project.constructions {
        if !construction_ids.insert(construction.id.as_str()) {
            return Err(ValidationError::DuplicateId {
                id: construction.id.clone(),
                context: "constructions".to_string(),
            });
        }
        if construction.layers.is_empty() {
            return Err(invalid(
                format!("constructions.{}.layers", construction.id),
                "[]",
                "at least one layer is required",
            ));
        }
        for layer in &construction.layers {
            validate_layer(&construction.id, layer)?;
        }
    }

    if project.rooms.is_empty() {
        return Err(invalid("rooms", "[]", "at least one room is required"));
    }
    let mut room_ids = HashSet::new();
    for room in &project.rooms {
        if !room_ids.insert(room.id.as_str()) {
            return Err(ValidationError::DuplicateId {
                id: room.id.clone(),
                context: "rooms".to_string(),
            });
        }
        validate_room(room)?;
    }

    let mut boundary_ids = HashSet::new();
    let mut rooms_with_boundaries = HashSet::new();
    for boundary in &project.boundaries {
        if !boundary_ids.insert(boundary.id.as_str()) {
            return Err(ValidationError::DuplicateId {
                id: boundary.id.clone(),
                context: "boundaries".to_string(),
            });
        }
        if !room_ids.contains(boundary.room.as_str()) {
            return Err(ValidationError::MissingReference {
                id: boundary.room.clone(),
                context: format!("boundary {} room", boundary.id),
            });
        }
        if let Some(construction) = boundary.kind.construction() {
            if !construction_ids.contains(construction) {
                return Err(ValidationError::MissingReference {
                    id: construction.to_string(),
                    context: format!("boundary {} construction", boundary.id),
                });
            }
        }
        if let BoundaryKindDef::Partition { rear_room, .. } = &boundary.kind {
            if !room_ids.contains(rear_room.as_str()) {
                return Err(ValidationError::MissingReference {
                    id: rear_room.clone(),
                    context: format!("boundary {} rear_room", boundary.id),
                });
            }
            if *rear_room == boundary.room {
                return Err(invalid(
                    format!("boundaries.{}.rear_room", boundary.id),
                    rear_room,
                    "a partition cannot face its own room",
                ));
            }
        }
        validate_boundary(boundary)?;
        rooms_with_boundaries.insert(boundary.room.as_str());
    }
    for room in &project.rooms {
        if !rooms_with_boundaries.contains(room.id.as_str()) {
            return Err(invalid(
                format!("rooms.{}", room.id),
                &room.id,
                "room has no boundaries",
            ));
        }
    }

    let mut edge_ids = HashSet::new();
    for edge in &project.ventilation {
        if !edge_ids.insert(edge.id.as_str()) {
            return Err(ValidationError::DuplicateId {
                id: edge.id.clone(),
                context: "ventilation".to_string(),
            });
        }
        for end in [&edge.from, &edge.to] {
            if !room_ids.contains(end.as_str()) {
                return Err(ValidationError::MissingReference {
                    id: end.clone(),
                    context: format!("ventilation {}", edge.id),
                });
            }
        }
        non_negative(
            format!("ventilation.{}.flow_m3_per_h", edge.id),
            edge.flow_m3_per_h,
            "must be non-negative",
        )?;
    }

    Ok(())
}

fn validate_series(field: &str, series: &SeriesDef) -> Result<(), ValidationError> {
    match series {
        SeriesDef::Constant(v) if !v.is_finite() => Err(invalid(field, v, "must be finite")),
        SeriesDef::Values(values) if values.is_empty() => {
            Err(invalid(field, "[]", "value list must not be empty"))
        }
        SeriesDef::Values(values) => match values.iter().find(|v| !v.is_finite()) {
            Some(v) => Err(invalid(field, v, "must be finite")),
            None => Ok(()),
        },
        SeriesDef::Constant(_) => Ok(()),
    }
}

fn validate_layer(construction: &str, layer: &LayerDef) -> Result<(), ValidationError> {
    let field = format!("constructions.{construction}.layers");
    match *layer {
        LayerDef::Material {
            thickness_m,
            conductivity,
            volumetric_heat_capacity,
        } => {
            positive(field.as_str(), thickness_m, "thickness must be positive")?;
            positive(field.as_str(), conductivity, "conductivity must be positive")?;
            non_negative(
                field,
                volumetric_heat_capacity,
                "heat capacity must be non-negative",
            )?;
        }
        LayerDef::Resistance { r, c } => {
            non_negative(field.as_str(), r, "resistance must be non-negative")?;
            non_negative(field, c, "capacity must be non-negative")?;
        }
    }
    Ok(())
}

fn validate_room(room: &RoomDef) -> Result<(), ValidationError> {
    let field = |name: &str| format!("rooms.{}.{}", room.id, name);
    positive(field("volume_m3"), room.volume_m3, "must be positive")?;
    positive(field("floor_area_m2"), room.floor_area_m2, "must be positive")?;
    if let Some(ach) = room.ventilation_ach {
        return Err(invalid(
            field("ventilation_ach"),
            ach,
            "replaced by ventilation_m3_per_h since version 2",
        ));
    }
    for (name, flow) in [
        ("ventilation_m3_per_h", room.ventilation_m3_per_h),
        ("natural_ventilation_m3_per_h", room.natural_ventilation_m3_per_h),
    ] {
        non_negative(field(name), flow, "must be non-negative")?;
    }
    if let Some(furniture) = &room.furniture {
        for (name, value) in [
            ("furniture.c", furniture.c),
            ("furniture.g", furniture.g),
            ("furniture.cx", furniture.cx),
            ("furniture.gx", furniture.gx),
        ] {
            non_negative(field(name), value, "must be non-negative")?;
        }
    }
    for (name, capacity) in [
        ("hvac.radiant_heating_w", room.hvac.radiant_heating_w),
        ("hvac.radiant_cooling_w", room.hvac.radiant_cooling_w),
        ("hvac.convective_heating_w", room.hvac.convective_heating_w),
        ("hvac.convective_cooling_w", room.hvac.convective_cooling_w),
    ] {
        if let Some(c) = capacity {
            non_negative(field(name), c, "capacity must be non-negative")?;
        }
    }
    if let Some(coil) = &room.hvac.coil {
        if !(coil.q_max_w > coil.q_min_w) || !(coil.q_min_w > 0.0) {
            return Err(invalid(
                field("hvac.coil"),
                format!("{}..{}", coil.q_min_w, coil.q_max_w),
                "rated loads must satisfy 0 < q_min < q_max",
            ));
        }
        if !(coil.v_min_m3_per_min > 0.0) || !(coil.v_max_m3_per_min >= coil.v_min_m3_per_min) {
            return Err(invalid(
                field("hvac.coil"),
                format!("{}..{}", coil.v_min_m3_per_min, coil.v_max_m3_per_min),
                "rated airflows must satisfy 0 < v_min <= v_max",
            ));
        }
        if !(0.0..1.0).contains(&coil.bypass_factor) {
            return Err(invalid(
                field("hvac.coil.bypass_factor"),
                coil.bypass_factor,
                "must lie in [0, 1)",
            ));
        }
    }
    validate_series(&field("schedule.heat_gain_w"), &room.schedule.heat_gain_w)?;
    validate_series(
        &field("schedule.moisture_gain_kg_per_s"),
        &room.schedule.moisture_gain_kg_per_s,
    )?;
    validate_series(&field("schedule.occupants"), &room.schedule.occupants)?;
    validate_series(&field("schedule.demand"), &room.schedule.demand)?;
    validate_series(&field("q_sol_furniture_w"), &room.q_sol_furniture_w)?;
    Ok(())
}

fn validate_boundary(boundary: &BoundaryDef) -> Result<(), ValidationError> {
    let field = |name: &str| format!("boundaries.{}.{}", boundary.id, name);
    positive(field("area_m2"), boundary.area_m2, "must be positive")?;
    positive(field("h_c"), boundary.h_c, "must be positive")?;
    non_negative(field("h_r"), boundary.h_r, "must be non-negative")?;
    if let Some(fraction) = boundary.radiant_fraction {
        if !(0.0..=1.0).contains(&fraction) {
            return Err(invalid(field("radiant_fraction"), fraction, "must lie in [0, 1]"));
        }
    }
    match &boundary.kind {
        BoundaryKindDef::Outdoor {
            r_outer,
            temp_diff_coeff,
            ..
        } => {
            non_negative(field("r_outer"), *r_outer, "must be non-negative")?;
            if !(0.0..=1.0).contains(temp_diff_coeff) {
                return Err(invalid(
                    field("temp_diff_coeff"),
                    temp_diff_coeff,
                    "must lie in [0, 1]",
                ));
            }
        }
        BoundaryKindDef::Opening {
            u_value,
            r_inner,
            temp_diff_coeff,
        } => {
            positive(field("u_value"), *u_value, "must be positive")?;
            if !(*r_inner >= 0.0) || *r_inner >= 1.0 / *u_value {
                return Err(invalid(
                    field("r_inner"),
                    r_inner,
                    "must be non-negative and below 1/U",
                ));
            }
            if !(0.0..=1.0).contains(temp_diff_coeff) {
                return Err(invalid(
                    field("temp_diff_coeff"),
                    temp_diff_coeff,
                    "must lie in [0, 1]",
                ));
            }
        }
        BoundaryKindDef::Partition { r_rear, .. } => {
            non_negative(field("r_rear"), *r_rear, "must be non-negative")?;
        }
        BoundaryKindDef::Ground { .. } => {}
    }
    if let Some(theta_eo) = &boundary.theta_eo {
        validate_series(&field("theta_eo"), theta_eo)?;
    }
    validate_series(&field("q_sol_w_per_m2"), &boundary.q_sol_w_per_m2)?;
    Ok(())
}
