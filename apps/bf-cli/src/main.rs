use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use bf_app::{
    AppError, AppResult, ExportFormat, MoveDirection, RunOutcome, compile_project, edit_service,
    export, project_service, run_service,
};
use bf_project::schema::{SegmentDef, TerminalDef};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bf-cli")]
#[command(about = "BranchFlow CLI - Pressure sizing for branched water-supply networks", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate project structure and segment topology
    Validate {
        /// Path to the project file (.yaml, .yml or .json)
        project_path: PathBuf,
    },
    /// List segments grouped by branch
    Segments {
        /// Path to the project file
        project_path: PathBuf,
        /// Only show this branch
        #[arg(long)]
        branch: Option<String>,
    },
    /// Register a new segment and save the project
    Add {
        /// Path to the project file
        project_path: PathBuf,
        /// Start node label
        #[arg(long)]
        start: String,
        /// End node label
        #[arg(long)]
        end: String,
        /// Connection type of the start node (entry, tee, cross)
        #[arg(long)]
        connection: String,
        /// Segment id (generated when omitted or taken)
        #[arg(long, default_value = "")]
        id: String,
        /// Branch name
        #[arg(long, default_value = "A")]
        branch: String,
        /// Nominal internal diameter in mm
        #[arg(long)]
        diameter_mm: f64,
        /// Real length in m
        #[arg(long, default_value_t = 0.0)]
        length_m: f64,
        /// Start elevation minus end elevation in m
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        drop_m: f64,
        /// Fixture-unit weight carried by the segment
        #[arg(long, default_value_t = 0.0)]
        weight: f64,
        /// The end node is a point of use
        #[arg(long)]
        use_point: bool,
        /// Minimum reference pressure in kPa (overrides the terminal default)
        #[arg(long)]
        min_pressure_kpa: Option<f64>,
    },
    /// Delete a segment and renumber its branch
    Remove {
        /// Path to the project file
        project_path: PathBuf,
        /// Segment id
        segment_id: String,
    },
    /// Move a segment inside its branch
    Move {
        /// Path to the project file
        project_path: PathBuf,
        /// Segment id
        segment_id: String,
        /// Direction
        #[arg(value_enum)]
        direction: Direction,
    },
    /// Set fitting quantities of a segment (e.g. elbow_90=2 tee_side=1)
    Fittings {
        /// Path to the project file
        project_path: PathBuf,
        /// Segment id
        segment_id: String,
        /// Fitting quantities as name=count
        quantities: Vec<String>,
    },
    /// Suggest the next free node label
    NextLabel {
        /// Path to the project file
        project_path: PathBuf,
    },
    /// Propagate pressures through the network
    Run {
        /// Path to the project file
        project_path: PathBuf,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
        /// Output file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Direction {
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Csv,
    Json,
    Yaml,
}

fn main() -> AppResult<()> {
    // Initialize tracing; RUST_LOG overrides the default level
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { project_path } => cmd_validate(&project_path),
        Commands::Segments {
            project_path,
            branch,
        } => cmd_segments(&project_path, branch.as_deref()),
        Commands::Add {
            project_path,
            start,
            end,
            connection,
            id,
            branch,
            diameter_mm,
            length_m,
            drop_m,
            weight,
            use_point,
            min_pressure_kpa,
        } => {
            let def = SegmentDef {
                id,
                branch,
                order: 1,
                start_node: start,
                end_node: end,
                start_connection: connection,
                nominal_diameter_mm: diameter_mm,
                real_length_m: length_m,
                elevation_drop_m: drop_m,
                fixture_unit_weight: weight,
                terminal: if use_point {
                    TerminalDef::UsePoint
                } else {
                    TerminalDef::NoUse
                },
                min_pressure_kpa,
                fittings: BTreeMap::new(),
            };
            cmd_add(&project_path, def)
        }
        Commands::Remove {
            project_path,
            segment_id,
        } => cmd_remove(&project_path, &segment_id),
        Commands::Move {
            project_path,
            segment_id,
            direction,
        } => {
            let direction = match direction {
                Direction::Up => MoveDirection::Up,
                Direction::Down => MoveDirection::Down,
            };
            cmd_move(&project_path, &segment_id, direction)
        }
        Commands::Fittings {
            project_path,
            segment_id,
            quantities,
        } => cmd_fittings(&project_path, &segment_id, &quantities),
        Commands::NextLabel { project_path } => cmd_next_label(&project_path),
        Commands::Run {
            project_path,
            format,
            output,
        } => cmd_run(&project_path, format, output.as_deref()),
    }
}

fn cmd_validate(project_path: &Path) -> AppResult<()> {
    println!("Validating project: {}", project_path.display());
    let project = project_service::load_project(project_path)?;
    let compiled = compile_project(&project)?;
    println!("✓ Project is valid ({} segments)", compiled.segments.len());
    Ok(())
}

fn cmd_segments(project_path: &Path, branch: Option<&str>) -> AppResult<()> {
    let project = project_service::load_project(project_path)?;
    let compiled = compile_project(&project)?;

    let branches = match branch {
        Some(b) => vec![b.to_string()],
        None => compiled.segments.branches(),
    };
    if compiled.segments.is_empty() {
        println!("No segments found in project");
        return Ok(());
    }
    for name in branches {
        let members = compiled.segments.branch_segments(&name);
        println!("Branch {} ({} segments):", name, members.len());
        for seg in members {
            println!(
                "  {}  D={} mm  L={} m  Leq={:.2} m  ΣP={}",
                seg.display_label(),
                seg.nominal_diameter_mm,
                seg.real_length_m,
                seg.equivalent_length_m,
                seg.fixture_unit_weight
            );
        }
    }
    Ok(())
}

fn cmd_add(project_path: &Path, def: SegmentDef) -> AppResult<()> {
    let mut project = project_service::load_project(project_path)?;
    let id = edit_service::add_segment(&mut project, def)?;
    project_service::save_project(project_path, &project)?;
    println!("✓ Segment registered: {}", id);
    Ok(())
}

fn cmd_remove(project_path: &Path, segment_id: &str) -> AppResult<()> {
    let mut project = project_service::load_project(project_path)?;
    let removed = edit_service::remove_segment(&mut project, segment_id)?;
    project_service::save_project(project_path, &project)?;
    println!(
        "✓ Segment removed: {} ({}→{})",
        removed.id, removed.start_node, removed.end_node
    );
    Ok(())
}

fn cmd_move(project_path: &Path, segment_id: &str, direction: MoveDirection) -> AppResult<()> {
    let mut project = project_service::load_project(project_path)?;
    if edit_service::move_segment(&mut project, segment_id, direction)? {
        project_service::save_project(project_path, &project)?;
        println!("✓ Segment moved: {}", segment_id);
    } else {
        println!("Segment {} is already at the edge of its branch", segment_id);
    }
    Ok(())
}

fn cmd_fittings(project_path: &Path, segment_id: &str, quantities: &[String]) -> AppResult<()> {
    let quantities = parse_quantities(quantities)?;
    let mut project = project_service::load_project(project_path)?;
    let length_m = edit_service::set_segment_fittings(&mut project, segment_id, quantities)?;
    project_service::save_project(project_path, &project)?;
    println!(
        "✓ Equivalent length of {}: {:.3} m",
        segment_id, length_m
    );
    Ok(())
}

fn cmd_next_label(project_path: &Path) -> AppResult<()> {
    let project = project_service::load_project(project_path)?;
    println!("{}", edit_service::suggest_next_label(&project));
    Ok(())
}

fn cmd_run(project_path: &Path, format: OutputFormat, output: Option<&Path>) -> AppResult<()> {
    let project = project_service::load_project(project_path)?;
    let outcome = run_service::run_project(&project)?;
    tracing::debug!(records = outcome.records.len(), format = ?format, "rendering run output");

    let text = match format {
        OutputFormat::Table => render_table(&outcome),
        OutputFormat::Csv => export::export(&outcome.records, ExportFormat::Csv)?,
        OutputFormat::Json => export::export(&outcome.records, ExportFormat::Json)?,
        OutputFormat::Yaml => export::export(&outcome.records, ExportFormat::Yaml)?,
    };

    if let Some(path) = output {
        std::fs::write(path, &text)?;
        println!(
            "✓ Exported {} segments to {}",
            outcome.records.len(),
            path.display()
        );
    } else {
        print!("{}", text);
    }

    for warning in &outcome.report.warnings {
        eprintln!("warning: {}", warning);
    }
    let deficient: Vec<&str> = outcome
        .report
        .deficient()
        .map(|r| r.segment_id.as_str())
        .collect();
    if !deficient.is_empty() {
        eprintln!("✗ Below minimum pressure: {}", deficient.join(", "));
    }
    if !outcome.is_complete() {
        eprintln!(
            "✗ Unreachable segments: {}",
            outcome.report.unreachable.join(", ")
        );
    }
    Ok(())
}

fn render_table(outcome: &RunOutcome) -> String {
    let mut out = format!(
        "{:<14} {:<8} {:>8} {:>7} {:>9} {:>9} {:>8} {:>8} {:>8} {:>9} {:>9}\n",
        "segment", "nodes", "Q(L/s)", "v(m/s)", "J(kPa/m)", "p_in", "hf_cont", "hf_loc", "p_disp",
        "p_out", "margin"
    );
    for r in &outcome.records {
        let nodes = format!("{}→{}", r.start_node, r.end_node);
        match &r.hydraulics {
            Some(h) => out.push_str(&format!(
                "{:<14} {:<8} {:>8.3} {:>7.2} {:>9.4} {:>9.2} {:>8.2} {:>8.2} {:>8.2} {:>9.2} {:>9.2}{}\n",
                r.id,
                nodes,
                h.flow_lps,
                h.velocity_mps,
                h.gradient_kpa_per_m,
                h.p_in_kpa,
                h.hf_cont_kpa,
                h.hf_loc_kpa,
                h.p_disp_kpa,
                h.p_out_kpa,
                h.margin_kpa,
                if h.margin_kpa < 0.0 { "  ✗" } else { "" }
            )),
            None => out.push_str(&format!("{:<14} {:<8} unreachable\n", r.id, nodes)),
        }
    }

    out.push('\n');
    for b in &outcome.branches {
        out.push_str(&format!(
            "Branch {}: {} segments, L={:.2} m, Leq={:.2} m, hf={:.2} kPa, min margin={}\n",
            b.branch,
            b.segment_count,
            b.total_real_length_m,
            b.total_equivalent_length_m,
            b.total_hf_cont_kpa + b.total_hf_loc_kpa,
            b.min_margin_kpa
                .map(|m| format!("{:.2} kPa", m))
                .unwrap_or_else(|| "-".to_string())
        ));
    }
    out
}

fn parse_quantities(items: &[String]) -> AppResult<BTreeMap<String, u32>> {
    let mut quantities = BTreeMap::new();
    for item in items {
        let (name, count) = item.split_once('=').ok_or_else(|| {
            AppError::InvalidInput(format!("expected name=count, got '{}'", item))
        })?;
        let count: u32 = count.trim().parse().map_err(|_| {
            AppError::InvalidInput(format!("invalid quantity for {}: '{}'", name, count))
        })?;
        quantities.insert(name.trim().to_string(), count);
    }
    Ok(quantities)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_fitting_quantities() {
        let q = parse_quantities(&["elbow_90=2".to_string(), " tee_side = 1".to_string()]).unwrap();
        assert_eq!(q.get("elbow_90"), Some(&2));
        assert_eq!(q.get("tee_side"), Some(&1));
        assert!(parse_quantities(&["elbow".to_string()]).is_err());
        assert!(parse_quantities(&["elbow=-1".to_string()]).is_err());
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
