//! Schema migration framework.

use crate::ProjectError;
use crate::schema::Project;

pub const LATEST_VERSION: u32 = 2;

pub fn migrate_to_latest(mut project: Project) -> Result<Project, ProjectError> {
    while project.version < LATEST_VERSION {
        project = migrate_one_version(project)?;
    }
    Ok(project)
}

fn migrate_one_version(project: Project) -> Result<Project, ProjectError> {
    match project.version {
        0 => migrate_v0_to_v1(project),
        1 => migrate_v1_to_v2(project),
        v => Err(ProjectError::Migration {
            what: format!("No migration path from version {}", v),
        }),
    }
}

fn migrate_v0_to_v1(mut project: Project) -> Result<Project, ProjectError> {
    project.version = 1;
    Ok(project)
}

/// Version 1 gave mechanical outdoor ventilation in air changes per hour.
fn migrate_v1_to_v2(mut project: Project) -> Result<Project, ProjectError> {
    for room in &mut project.rooms {
        if let Some(ach) = room.ventilation_ach.take() {
            if room.ventilation_m3_per_h != 0.0 {
                return Err(ProjectError::Migration {
                    what: format!(
                        "room {} sets both ventilation_ach and ventilation_m3_per_h",
                        room.id
                    ),
                });
            }
            room.ventilation_m3_per_h = ach * room.volume_m3;
        }
    }
    project.version = 2;
    Ok(project)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{RoomDef, SeriesDef, SimulationDef, WeatherDef};

    fn project(version: u32, rooms: Vec<RoomDef>) -> Project {
        Project {
            version,
            name: "test".to_string(),
            simulation: SimulationDef {
                dt_s: 900.0,
                steps: 4,
                run_up_steps: 0,
                record_every: 1,
                initial_temperature: 20.0,
                initial_humidity: 0.008,
            },
            weather: WeatherDef {
                theta_o: SeriesDef::Constant(0.0),
                x_o: SeriesDef::Constant(0.003),
            },
            comfort: None,
            solver: None,
            infiltration: None,
            constructions: vec![],
            rooms,
            boundaries: vec![],
            ventilation: vec![],
        }
    }

    fn room(id: &str, ach: Option<f64>, m3_per_h: f64) -> RoomDef {
        RoomDef {
            id: id.to_string(),
            volume_m3: 50.0,
            floor_area_m2: 20.0,
            ventilation_m3_per_h: m3_per_h,
            ventilation_ach: ach,
            natural_ventilation_m3_per_h: 0.0,
            furniture: None,
            hvac: Default::default(),
            schedule: Default::default(),
            q_sol_furniture_w: SeriesDef::default(),
        }
    }

    #[test]
    fn migrate_latest_is_noop() {
        let p = project(LATEST_VERSION, vec![room("a", None, 30.0)]);
        let migrated = migrate_to_latest(p.clone()).unwrap();
        assert_eq!(migrated, p);
    }

    #[test]
    fn air_changes_become_volume_flow() {
        let p = project(0, vec![room("a", Some(0.5), 0.0), room("b", None, 12.0)]);
        let migrated = migrate_to_latest(p).unwrap();
        assert_eq!(migrated.version, LATEST_VERSION);
        assert_eq!(migrated.rooms[0].ventilation_ach, None);
        assert_eq!(migrated.rooms[0].ventilation_m3_per_h, 25.0);
        assert_eq!(migrated.rooms[1].ventilation_m3_per_h, 12.0);
    }

    #[test]
    fn conflicting_ventilation_is_rejected() {
        let p = project(1, vec![room("a", Some(0.5), 10.0)]);
        assert!(matches!(
            migrate_to_latest(p),
            Err(ProjectError::Migration { .. })
        ));
    }
}
