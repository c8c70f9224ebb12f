//! Turning a validated project into a runnable model.

use crate::schema::{BoundaryDef, BoundaryKindDef, LayerDef, Project, RoomDef};
use crate::validate::{ValidationError, validate_project};
use crate::ProjectResult;
use hl_core::timing::Timer;
use hl_core::units::{m3_per_hour, m3_per_minute, to_m3_per_s};
use hl_core::{RoomId, Series};
use hl_fabric::{Construction, Layer};
use hl_graph::{NameIndex, RearSide, TopologyBuilder};
use hl_sim::{Model, ScheduleSeries, SimOptions, WeatherSeries};
use hl_solver::{BoundaryInput, CoilSpec, Furniture, Hvac, RoomInput, SolverConfig, assemble};
use std::collections::HashMap;

/// A model with the run options and names it was built from.
#[derive(Debug, Clone)]
pub struct BuiltProject {
    pub model: Model,
    pub options: SimOptions,
    pub names: NameIndex,
    /// Wall-clock network assembly time, when timing is enabled.
    pub assembly_time_s: Option<f64>,
}

/// Validate, resolve references and assemble the room network.
pub fn build_project(project: &Project) -> ProjectResult<BuiltProject> {
    validate_project(project)?;

    let mut layer_stacks: HashMap<&str, Vec<Layer>> = HashMap::new();
    for construction in &project.constructions {
        let layers = construction
            .layers
            .iter()
            .map(build_layer)
            .collect::<Result<Vec<_>, _>>()?;
        layer_stacks.insert(construction.id.as_str(), layers);
    }

    let mut builder = TopologyBuilder::new();
    let mut room_ids: HashMap<&str, RoomId> = HashMap::new();
    for room in &project.rooms {
        room_ids.insert(room.id.as_str(), builder.add_room(&room.id));
    }
    for boundary in &project.boundaries {
        let rear = match &boundary.kind {
            BoundaryKindDef::Outdoor { .. } | BoundaryKindDef::Opening { .. } => RearSide::Outdoor,
            BoundaryKindDef::Ground { .. } => RearSide::Ground,
            BoundaryKindDef::Partition { rear_room, .. } => {
                RearSide::Room(lookup(&room_ids, rear_room, "partition rear room")?)
            }
        };
        let owner = lookup(&room_ids, &boundary.room, "boundary room")?;
        builder.add_surface(&boundary.id, owner, rear);
    }
    for edge in &project.ventilation {
        builder.add_ventilation(
            &edge.id,
            lookup(&room_ids, &edge.from, "ventilation source")?,
            lookup(&room_ids, &edge.to, "ventilation target")?,
            to_m3_per_s(m3_per_hour(edge.flow_m3_per_h)),
        );
    }
    let topology = builder.build()?;
    let names = NameIndex::from_topology(&topology)?;

    let weather = WeatherSeries {
        theta_o: project.weather.theta_o.to_series(),
        x_o: project.weather.x_o.to_series(),
    };

    let fractions = radiant_fractions(project);
    let boundaries = project
        .boundaries
        .iter()
        .zip(fractions)
        .map(|(boundary, radiant_fraction)| {
            build_boundary(boundary, radiant_fraction, &layer_stacks, &weather)
        })
        .collect::<Vec<_>>();
    let rooms = project.rooms.iter().map(build_room).collect::<Vec<_>>();
    let schedules = project.rooms.iter().map(build_schedule).collect::<Vec<_>>();

    let solver = project.solver.as_ref();
    let cfg = SolverConfig {
        max_condition: solver.map_or(1e10, |s| s.max_condition),
        ot_convective_weight: solver.map_or(0.5, |s| s.ot_convective_weight),
        parallel: solver.is_none_or(|s| s.parallel),
        ..SolverConfig::default()
    };

    let timer = Timer::start();
    let network = assemble(topology, &rooms, &boundaries, project.simulation.dt_s, &cfg)?;
    let assembly_time_s = timer.stop();
    let model = Model::new(
        network,
        weather,
        schedules,
        project.comfort.unwrap_or_default(),
        project.infiltration,
    )?;

    let sim = &project.simulation;
    let options = SimOptions {
        dt_s: sim.dt_s,
        steps: sim.steps,
        run_up_steps: sim.run_up_steps,
        record_every: sim.record_every,
        initial_temperature: sim.initial_temperature,
        initial_humidity: sim.initial_humidity,
        parallel: cfg.parallel,
    };

    Ok(BuiltProject {
        model,
        options,
        names,
        assembly_time_s,
    })
}

fn lookup(ids: &HashMap<&str, RoomId>, name: &str, context: &str) -> ProjectResult<RoomId> {
    ids.get(name).copied().ok_or_else(|| {
        ValidationError::MissingReference {
            id: name.to_string(),
            context: context.to_string(),
        }
        .into()
    })
}

fn build_layer(layer: &LayerDef) -> ProjectResult<Layer> {
    let layer = match *layer {
        LayerDef::Material {
            thickness_m,
            conductivity,
            volumetric_heat_capacity,
        } => Layer::from_material(thickness_m, conductivity, volumetric_heat_capacity)?,
        LayerDef::Resistance { r, c } => Layer::new(r, c)?,
    };
    Ok(layer)
}

fn build_boundary(
    boundary: &BoundaryDef,
    radiant_fraction: f64,
    layer_stacks: &HashMap<&str, Vec<Layer>>,
    weather: &WeatherSeries,
) -> BoundaryInput {
    let layers = |id: &str| layer_stacks.get(id).cloned().unwrap_or_default();
    let (construction, temp_diff_coeff, default_theta_eo) = match &boundary.kind {
        BoundaryKindDef::Outdoor {
            construction,
            r_outer,
            temp_diff_coeff,
        } => (
            Construction::Outdoor {
                layers: layers(construction),
                r_outer: *r_outer,
            },
            *temp_diff_coeff,
            weather.theta_o.clone(),
        ),
        BoundaryKindDef::Ground { construction } => (
            Construction::Ground {
                layers: layers(construction),
            },
            1.0,
            Series::Constant(weather.theta_o.mean()),
        ),
        BoundaryKindDef::Partition {
            construction,
            r_rear,
            ..
        } => (
            Construction::Partition {
                layers: layers(construction),
                r_rear: *r_rear,
            },
            0.0,
            Series::default(),
        ),
        BoundaryKindDef::Opening {
            u_value,
            r_inner,
            temp_diff_coeff,
        } => (
            Construction::Opening {
                u_value: *u_value,
                r_inner: *r_inner,
            },
            *temp_diff_coeff,
            weather.theta_o.clone(),
        ),
    };

    BoundaryInput {
        construction,
        area: boundary.area_m2,
        h_c: boundary.h_c,
        h_r: boundary.h_r,
        radiant_fraction,
        temp_diff_coeff,
        theta_eo: boundary
            .theta_eo
            .as_ref()
            .map_or(default_theta_eo, |s| s.to_series()),
        q_sol: boundary.q_sol_w_per_m2.to_series(),
    }
}

/// Share of each boundary in its room's radiant HVAC output.
///
/// Explicit fractions win. A room with radiant equipment and no explicit
/// fractions spreads the output over its floor surfaces by area, or over
/// all its surfaces when none is marked as floor.
fn radiant_fractions(project: &Project) -> Vec<f64> {
    let mut fractions: Vec<f64> = project
        .boundaries
        .iter()
        .map(|b| b.radiant_fraction.unwrap_or(0.0))
        .collect();

    for room in &project.rooms {
        let radiant = room.hvac.radiant_heating_w.is_some() || room.hvac.radiant_cooling_w.is_some();
        let owned: Vec<usize> = project
            .boundaries
            .iter()
            .enumerate()
            .filter(|(_, b)| b.room == room.id)
            .map(|(i, _)| i)
            .collect();
        let explicit = owned
            .iter()
            .any(|&i| project.boundaries[i].radiant_fraction.is_some());
        if !radiant || explicit {
            continue;
        }

        let floors: Vec<usize> = owned
            .iter()
            .copied()
            .filter(|&i| project.boundaries[i].floor)
            .collect();
        let receivers = if floors.is_empty() { owned } else { floors };
        let total: f64 = receivers.iter().map(|&i| project.boundaries[i].area_m2).sum();
        for &i in &receivers {
            fractions[i] = project.boundaries[i].area_m2 / total;
        }
    }
    fractions
}

fn build_room(room: &RoomDef) -> RoomInput {
    let furniture = room.furniture.map_or_else(
        || Furniture::for_volume(room.volume_m3),
        |f| Furniture {
            c: f.c,
            g: f.g,
            cx: f.cx,
            gx: f.gx,
        },
    );
    let hvac = Hvac {
        radiant_heating_capacity: room.hvac.radiant_heating_w,
        radiant_cooling_capacity: room.hvac.radiant_cooling_w,
        convective_heating_capacity: room.hvac.convective_heating_w,
        convective_cooling_capacity: room.hvac.convective_cooling_w,
        coil: room.hvac.coil.map(|coil| CoilSpec {
            q_min: coil.q_min_w,
            q_max: coil.q_max_w,
            v_min: to_m3_per_s(m3_per_minute(coil.v_min_m3_per_min)),
            v_max: to_m3_per_s(m3_per_minute(coil.v_max_m3_per_min)),
            bypass_factor: coil.bypass_factor,
        }),
    };
    RoomInput {
        volume: room.volume_m3,
        floor_area: room.floor_area_m2,
        furniture,
        outdoor_ventilation: to_m3_per_s(m3_per_hour(room.ventilation_m3_per_h)),
        natural_ventilation: to_m3_per_s(m3_per_hour(room.natural_ventilation_m3_per_h)),
        hvac,
        q_sol_furniture: room.q_sol_furniture_w.to_series(),
    }
}

fn build_schedule(room: &RoomDef) -> ScheduleSeries {
    ScheduleSeries {
        heat_gain: room.schedule.heat_gain_w.to_series(),
        moisture_gain: room.schedule.moisture_gain_kg_per_s.to_series(),
        occupants: room.schedule.occupants.to_series(),
        demand: room.schedule.demand.to_series(),
    }
}
