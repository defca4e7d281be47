/// Planner CLI
///
/// Runs the full grid-search / simplify / metrize / speed-limit pipeline
/// over a text grid file and writes the resulting trajectory table.
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use planner_core::{route, Cell, Grid, PlanParams, PlannerError, SearchMode};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "planner_cli")]
#[command(about = "Any-angle grid path planner", long_about = None)]
struct Args {
    /// Path to the grid file (one row per line, '0' = free, any other
    /// digit = blocked).
    grid_file: PathBuf,

    /// Start cell, "row,col".
    start: String,

    /// Goal cell, "row,col".
    goal: String,

    /// Search mode.
    #[arg(long, value_enum, default_value_t = ModeArg::Theta)]
    mode: ModeArg,

    /// Number of forward/reverse simplification passes.
    #[arg(long, default_value_t = 5)]
    passes: u32,

    /// World size of one grid cell, in centimeters.
    #[arg(long, default_value_t = 5.0)]
    cell_size: f64,

    /// Maximum cell-space gap before a segment is split.
    #[arg(long, default_value_t = 10.0)]
    max_segment: f64,

    /// Metrizer lead/trail resampling window, in centimeters.
    #[arg(long, default_value_t = 50.0)]
    window: f64,

    /// Minimum speed, cm/s.
    #[arg(long)]
    v_min: f64,

    /// Maximum speed, cm/s.
    #[arg(long)]
    v_max: f64,

    /// Maximum angular speed, rad/s.
    #[arg(long)]
    omega_max: f64,

    /// Maximum forward acceleration, cm/s^2.
    #[arg(long)]
    a_max: f64,

    /// Maximum deceleration, cm/s^2.
    #[arg(long)]
    d_max: f64,

    /// Optional cap on nodes popped from the open set.
    #[arg(long)]
    budget: Option<usize>,

    /// Optional obstacle inflation radius, in cells.
    #[arg(long)]
    inflate: Option<u32>,

    /// Write the n×6 f32 trajectory table as raw bytes to this path.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    /// Print the resolved `PlanParams` as JSON to stdout and exit, without
    /// planning anything.
    #[arg(long)]
    dump_params: bool,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum ModeArg {
    Astar,
    Theta,
}

impl From<ModeArg> for SearchMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Astar => SearchMode::AStar,
            ModeArg::Theta => SearchMode::ThetaStar,
        }
    }
}

fn parse_cell(s: &str, label: &str) -> Result<Cell, String> {
    let (r, c) = s
        .split_once(',')
        .ok_or_else(|| format!("{label} must be \"row,col\", got {s:?}"))?;
    let r = r
        .trim()
        .parse::<usize>()
        .map_err(|e| format!("{label} row: {e}"))?;
    let c = c
        .trim()
        .parse::<usize>()
        .map_err(|e| format!("{label} col: {e}"))?;
    Ok((r, c))
}

fn load_grid(path: &PathBuf) -> Result<Grid, String> {
    let text = fs::read_to_string(path).map_err(|e| format!("reading {path:?}: {e}"))?;
    let mut rows = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let row: Vec<u8> = line
            .split_whitespace()
            .flat_map(|token| token.chars())
            .map(|c| if c == '0' { 0 } else { 1 })
            .collect();
        rows.push(row);
    }
    if rows.is_empty() {
        return Err(format!("{path:?} contained no grid rows"));
    }
    let width = rows[0].len();
    if !rows.iter().all(|r| r.len() == width) {
        return Err(format!("{path:?} rows do not all share the same width"));
    }
    Ok(Grid::from_bytes(&rows))
}

fn run(args: Args) -> Result<(), (ExitCode, String)> {
    let params = PlanParams {
        cell_size_cm: args.cell_size,
        search_mode: args.mode.into(),
        heuristic_weight: 1.0,
        expansion_budget: args.budget,
        simplifier_passes: args.passes,
        max_segment_length: args.max_segment,
        resample_offset_cm: args.window,
        v_min_cm_s: args.v_min,
        v_max_cm_s: args.v_max,
        omega_max_rad_s: args.omega_max,
        a_max_cm_s2: args.a_max,
        d_max_cm_s2: args.d_max,
        smoothing_window_cm: args.window,
    };

    if args.dump_params {
        let json = serde_json::to_string_pretty(&params)
            .map_err(|e| (ExitCode::from(1), format!("serializing params: {e}")))?;
        println!("{json}");
        return Ok(());
    }

    let grid = load_grid(&args.grid_file).map_err(|e| (ExitCode::from(1), e))?;
    let start = parse_cell(&args.start, "start").map_err(|e| (ExitCode::from(1), e))?;
    let goal = parse_cell(&args.goal, "goal").map_err(|e| (ExitCode::from(1), e))?;

    let grid = match args.inflate {
        Some(radius) if radius > 0 => planner_core::grid::inflate_obstacles(&grid, radius as f64),
        _ => grid,
    };

    let trajectory = route(&grid, start, goal, &params).map_err(|err| {
        let code = match err {
            PlannerError::NoPath { .. } => 2,
            PlannerError::InvalidEndpoint { .. } => 3,
            PlannerError::BudgetExhausted { .. } | PlannerError::InvalidParameters(_) => 4,
        };
        (ExitCode::from(code), err.to_string())
    })?;

    info!(
        samples = trajectory.len(),
        arc_length_cm = trajectory.total_arc_length(),
        "planning succeeded"
    );

    if let Some(out_path) = args.out {
        fs::write(&out_path, trajectory.to_bytes())
            .map_err(|e| (ExitCode::from(1), format!("writing {out_path:?}: {e}")))?;
        info!(?out_path, "wrote trajectory table");
    }

    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    let filter = if args.verbose {
        "planner_cli=debug,planner_core=debug,info"
    } else {
        "planner_cli=info,planner_core=info,warn"
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match run(args) {
        Ok(()) => ExitCode::from(0),
        Err((code, message)) => {
            error!("{message}");
            code
        }
    }
}
