use hl_project::{ProjectError, ValidationError, build_project, migrate_to_latest, validate_project};
use hl_project::schema::Project;
use hl_sim::run_sim;

const TWO_ROOMS: &str = r#"
version: 2
name: two rooms
simulation: { dt_s: 3600, steps: 48, initial_temperature: 20.0 }
weather: { theta_o: 0.0, x_o: 0.003 }
solver: { parallel: false }
constructions:
  - id: wall
    layers:
      - { thickness_m: 0.1, conductivity: 0.045, volumetric_heat_capacity: 13000 }
      - { thickness_m: 0.012, conductivity: 0.16, volumetric_heat_capacity: 720000 }
  - id: slab
    layers:
      - { thickness_m: 0.15, conductivity: 1.6, volumetric_heat_capacity: 2000000 }
rooms:
  - id: a
    volume_m3: 50
    floor_area_m2: 20
    hvac: { radiant_heating_w: 2000 }
  - id: b
    volume_m3: 25
    floor_area_m2: 10
boundaries:
  - { id: a-wall, room: a, area_m2: 40, kind: { type: outdoor, construction: wall } }
  - { id: a-floor, room: a, area_m2: 15, floor: true, kind: { type: ground, construction: slab } }
  - { id: a-floor2, room: a, area_m2: 5, floor: true, kind: { type: ground, construction: slab } }
  - { id: a-part, room: a, area_m2: 8, kind: { type: partition, construction: wall, rear_room: b } }
  - { id: b-wall, room: b, area_m2: 30, kind: { type: outdoor, construction: wall } }
  - { id: b-part, room: b, area_m2: 8, kind: { type: partition, construction: wall, rear_room: a } }
ventilation:
  - { id: a-to-b, from: a, to: b, flow_m3_per_h: 36 }
"#;

fn two_rooms() -> Project {
    serde_yaml::from_str(TWO_ROOMS).unwrap()
}

#[test]
fn build_resolves_names_and_units() {
    let built = build_project(&two_rooms()).unwrap();
    let network = &built.model.network;

    assert_eq!(network.room_count(), 2);
    assert_eq!(network.boundary_count(), 6);
    assert_eq!(built.names.room("b").unwrap().slot(), 1);
    assert_eq!(built.names.surface("a-part").unwrap().slot(), 3);

    // 36 m³/h from a into b.
    let b = &network.rooms[1];
    assert_eq!(b.inflows.len(), 1);
    assert!((b.inflows[0].flow - 0.01).abs() < 1e-12);

    assert_eq!(built.options.dt_s, 3600.0);
    assert_eq!(built.options.steps, 48);
    assert!(!built.options.parallel);
}

#[test]
fn radiant_output_defaults_to_floor_area_shares() {
    let built = build_project(&two_rooms()).unwrap();
    let a = &built.model.network.rooms[0];

    let fractions: Vec<f64> = a.radiant_fraction.iter().copied().collect();
    assert_eq!(fractions.len(), 4);
    assert_eq!(fractions[0], 0.0);
    assert!((fractions[1] - 0.75).abs() < 1e-12);
    assert!((fractions[2] - 0.25).abs() < 1e-12);
    assert_eq!(fractions[3], 0.0);
}

#[test]
fn built_model_runs() {
    let built = build_project(&two_rooms()).unwrap();
    let record = run_sim(&built.model, &built.options).unwrap();

    assert_eq!(record.len(), 48);
    for room in 0..2 {
        for r in record.room_series(room) {
            assert!(r.theta_r.is_finite());
            assert!(r.theta_r < 20.5);
            assert!(r.theta_r > -1.0);
        }
    }
}

#[test]
fn missing_rear_room_is_reported() {
    let mut project = two_rooms();
    project.rooms.pop();

    match validate_project(&project) {
        Err(ValidationError::MissingReference { id, .. }) => assert_eq!(id, "b"),
        other => panic!("unexpected result {other:?}"),
    }
}

#[test]
fn duplicate_boundary_id_is_reported() {
    let mut project = two_rooms();
    project.boundaries[4].id = "a-wall".to_string();

    assert!(matches!(
        validate_project(&project),
        Err(ValidationError::DuplicateId { .. })
    ));
}

#[test]
fn room_without_boundaries_is_rejected() {
    let mut project = two_rooms();
    project.boundaries.retain(|b| b.room != "b");
    project
        .boundaries
        .retain(|b| !matches!(&b.kind, hl_project::BoundaryKindDef::Partition { .. }));
    project.ventilation.clear();

    assert!(matches!(
        validate_project(&project),
        Err(ValidationError::InvalidValue { .. })
    ));
}

#[test]
fn future_version_is_unsupported() {
    let mut project = two_rooms();
    project.version = 9;

    assert!(matches!(
        migrate_to_latest(project.clone()),
        Ok(_)
    ));
    assert!(matches!(
        build_project(&project),
        Err(ProjectError::Validation(ValidationError::UnsupportedVersion { version: 9 }))
    ));
}

#[test]
fn version_one_file_migrates_on_load() {
    let yaml = TWO_ROOMS
        .replace("version: 2", "version: 1")
        .replace("volume_m3: 25", "volume_m3: 25\n    ventilation_ach: 0.5");
    let path = std::env::temp_dir().join("hl_project_build_v1.yaml");
    std::fs::write(&path, yaml).unwrap();

    let project = hl_project::load_yaml(&path).unwrap();
    assert_eq!(project.version, hl_project::LATEST_VERSION);
    assert_eq!(project.rooms[1].ventilation_ach, None);
    assert_eq!(project.rooms[1].ventilation_m3_per_h, 12.5);

    let built = build_project(&project).unwrap();
    let b = &built.model.network.rooms[1];
    assert!((b.outdoor_ventilation - 12.5 / 3600.0).abs() < 1e-12);
}

#[test]
fn coil_airflows_are_converted_from_per_minute() {
    let yaml = TWO_ROOMS.replace(
        "hvac: { radiant_heating_w: 2000 }",
        "hvac:\n      radiant_heating_w: 2000\n      coil: { q_min_w: 500, q_max_w: 5600, v_min_m3_per_min: 12, v_max_m3_per_min: 30, bypass_factor: 0.2 }",
    );
    let project: Project = serde_yaml::from_str(&yaml).unwrap();
    let built = build_project(&project).unwrap();

    let coil = built.model.network.rooms[0].hvac.coil.unwrap();
    assert!((coil.v_min - 0.2).abs() < 1e-12);
    assert!((coil.v_max - 0.5).abs() < 1e-12);
}

#[test]
fn non_finite_and_negative_quantities_are_rejected() {
    let mut project = two_rooms();
    project.boundaries[0].area_m2 = f64::INFINITY;
    match validate_project(&project) {
        Err(ValidationError::InvalidValue { field, .. }) => {
            assert_eq!(field, "boundaries.a-wall.area_m2")
        }
        other => panic!("unexpected {other:?}"),
    }

    let mut project = two_rooms();
    project.simulation.initial_temperature = f64::NAN;
    match validate_project(&project) {
        Err(ValidationError::InvalidValue { field, .. }) => {
            assert_eq!(field, "simulation.initial_temperature")
        }
        other => panic!("unexpected {other:?}"),
    }

    let mut project = two_rooms();
    project.ventilation[0].flow_m3_per_h = -1.0;
    match validate_project(&project) {
        Err(ValidationError::InvalidValue { field, .. }) => {
            assert_eq!(field, "ventilation.a-to-b.flow_m3_per_h")
        }
        other => panic!("unexpected {other:?}"),
    }
}
