use clap::{Parser, Subcommand};
use hl_core::units::{s, to_hours};
use hl_graph::NameIndex;
use hl_project::{BuiltProject, ProjectError, build_project};
use hl_sim::{SimError, SimRecord, run_sim};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(name = "hl-cli")]
#[command(about = "heatload CLI - Multi-room building thermal load simulation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate project file syntax and structure
    Validate {
        /// Path to the project YAML or JSON file
        project_path: PathBuf,
    },
    /// List rooms and their boundaries
    Rooms {
        /// Path to the project YAML or JSON file
        project_path: PathBuf,
    },
    /// Run the time march and export the records
    Run {
        /// Path to the project YAML or JSON file
        project_path: PathBuf,
        /// Output file; `.csv` writes room series, anything else full JSON
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Override the number of recorded steps
        #[arg(long)]
        steps: Option<usize>,
        /// Print the assembly and time-march timing summary
        #[arg(long)]
        timing: bool,
    },
    /// Print the response factor of every boundary
    Factors {
        /// Path to the project YAML or JSON file
        project_path: PathBuf,
        /// Only this boundary
        #[arg(short, long)]
        boundary: Option<String>,
    },
}

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error("{0}")]
    Project(#[from] ProjectError),

    #[error("Simulation failed: {0}")]
    Sim(#[from] SimError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown boundary '{0}'")]
    UnknownBoundary(String),
}

type CliResult<T> = Result<T, CliError>;

fn main() -> CliResult<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { project_path } => cmd_validate(&project_path),
        Commands::Rooms { project_path } => cmd_rooms(&project_path),
        Commands::Run {
            project_path,
            output,
            steps,
            timing,
        } => cmd_run(&project_path, output.as_deref(), steps, timing),
        Commands::Factors {
            project_path,
            boundary,
        } => cmd_factors(&project_path, boundary.as_deref()),
    }
}

fn load_and_build(project_path: &Path) -> CliResult<BuiltProject> {
    let project = hl_project::load(project_path)?;
    Ok(build_project(&project)?)
}

fn cmd_validate(project_path: &Path) -> CliResult<()> {
    println!("Validating project: {}", project_path.display());
    let built = load_and_build(project_path)?;
    println!(
        "✓ Project is valid ({} rooms, {} boundaries)",
        built.model.network.room_count(),
        built.model.network.boundary_count()
    );
    Ok(())
}

fn cmd_rooms(project_path: &Path) -> CliResult<()> {
    let built = load_and_build(project_path)?;
    let network = &built.model.network;

    println!("Rooms in project:");
    for room in &network.rooms {
        println!(
            "  {} - {:.1} m³, {:.1} m² floor, {} boundaries, {} inflows",
            built.names.room_name(room.id),
            room.volume,
            room.floor_area,
            room.boundaries.len(),
            room.inflows.len()
        );
        for b in network.boundaries_of(room) {
            println!(
                "    {} ({:.1} m², rear {:?})",
                built.names.surface_name(b.id),
                b.area,
                b.rear
            );
        }
    }
    Ok(())
}

fn cmd_run(
    project_path: &Path,
    output: Option<&Path>,
    steps: Option<usize>,
    timing: bool,
) -> CliResult<()> {
    if timing {
        hl_core::timing::enable_timing();
    }

    let BuiltProject {
        model,
        mut options,
        names,
        assembly_time_s,
    } = load_and_build(project_path)?;
    if let Some(steps) = steps {
        options.steps = steps;
    }

    info!(steps = options.steps, dt_s = options.dt_s, "running");
    let mut record = run_sim(&model, &options)?;
    record.perf.assembly_time_s = assembly_time_s.unwrap_or(0.0);
    println!(
        "✓ Simulation completed: {} records over {} steps",
        record.len(),
        options.steps
    );

    let hours = to_hours(s(options.dt_s * options.record_every as f64));
    for slot in 0..model.network.room_count() {
        let (heating, cooling) = record
            .room_series(slot)
            .map(|r| r.load_convective + r.load_radiant)
            .fold((0.0_f64, 0.0_f64), |(h, c), l| {
                if l > 0.0 { (h + l, c) } else { (h, c - l) }
            });
        println!(
            "  {}: heating {:.2} kWh, cooling {:.2} kWh (recorded steps)",
            room_label(&names, slot),
            heating * hours / 1000.0,
            cooling * hours / 1000.0
        );
    }

    if let Some(path) = output {
        let is_csv = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
        if is_csv {
            std::fs::write(path, rooms_csv(&record, &names, model.network.room_count()))?;
        } else {
            std::fs::write(path, serde_json::to_string_pretty(&record)?)?;
        }
        println!("✓ Exported {} records to {}", record.len(), path.display());
    }

    if let Some(summary) = record.perf.summary() {
        println!("\n{}", summary);
    }
    Ok(())
}

fn room_label(names: &NameIndex, slot: usize) -> String {
    names.room_name(hl_core::Id::from_slot(slot)).to_string()
}

/// One row per record, one column group per room.
fn rooms_csv(record: &SimRecord, names: &NameIndex, rooms: usize) -> String {
    const FIELDS: [&str; 10] = [
        "mode", "theta_r", "x_r", "rh", "theta_mrt", "theta_ot", "pmv", "load_convective",
        "load_radiant", "load_latent",
    ];

    let mut csv = String::from("time_s");
    for slot in 0..rooms {
        let label = room_label(names, slot);
        for field in FIELDS {
            let _ = write!(csv, ",{}.{}", label, field);
        }
    }
    csv.push('\n');

    for (t, step) in record.t.iter().zip(&record.rooms) {
        let _ = write!(csv, "{}", t);
        for r in step {
            let _ = write!(
                csv,
                ",{},{},{},{},{},{},{},{},{},{}",
                r.mode.name(),
                r.theta_r,
                r.x_r,
                r.rh,
                r.theta_mrt,
                r.theta_ot,
                r.pmv,
                r.load_convective,
                r.load_radiant,
                r.load_latent
            );
        }
        csv.push('\n');
    }
    csv
}

fn cmd_factors(project_path: &Path, only: Option<&str>) -> CliResult<()> {
    let built = load_and_build(project_path)?;
    let network = &built.model.network;

    let selected: Vec<_> = match only {
        Some(name) => {
            let id = built
                .names
                .surface(name)
                .map_err(|_| CliError::UnknownBoundary(name.to_string()))?;
            vec![&network.boundaries[id.slot()]]
        }
        None => network.boundaries.iter().collect(),
    };

    println!("Response factors (dt = {} s):", network.dt);
    for b in selected {
        let rf = &b.rf;
        println!(
            "  {} ({:?}): phi_a0={:.6e} phi_t0={:.6} steady absorption={:.6} transmission={:.6}",
            built.names.surface_name(b.id),
            b.rear,
            rf.phi_a0,
            rf.phi_t0,
            rf.steady_absorption(),
            rf.steady_transmission()
        );
        if rf.is_steady() {
            continue;
        }
        println!("    {:>12} {:>14} {:>14}", "row", "phi_a1", "phi_t1");
        for ((row, a1), t1) in rf.row.iter().zip(&rf.phi_a1).zip(&rf.phi_t1) {
            println!("    {:>12.6} {:>14.6e} {:>14.6e}", row, a1, t1);
        }
    }
    Ok(())
}
