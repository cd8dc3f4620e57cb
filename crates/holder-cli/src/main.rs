//! holder CLI - bottle holder clip rib generator
//!
//! Plans and sweeps the wrap-around ribs for a holder configuration and
//! writes them, optionally together with a bracket body, as one STL.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use holder_grabber::{generate, plan, Assembly, GrabberConfig};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

mod stl;

#[derive(Parser, Debug)]
#[command(name = "holder")]
#[command(author, version, about = "Bottle holder clip rib generator", long_about = None)]
struct Cli {
    /// Logging verbosity level
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate the ribs and export them as binary STL
    Generate {
        /// TOML configuration (defaults apply when omitted)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Output STL file
        #[arg(short, long)]
        output: PathBuf,
        /// Bracket body STL to include in the output
        #[arg(long)]
        body: Option<PathBuf>,
        /// Write the JSON run report here
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Print the rib plan without sweeping
    Plan {
        /// TOML configuration (defaults apply when omitted)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Generate {
            config,
            output,
            body,
            report,
        } => run_generate(config.as_deref(), &output, body.as_deref(), report.as_deref()),
        Commands::Plan { config } => run_plan(config.as_deref()),
    }
}

fn load_config(path: Option<&Path>) -> Result<GrabberConfig> {
    match path {
        Some(path) => GrabberConfig::load(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(GrabberConfig::default()),
    }
}

fn run_generate(
    config: Option<&Path>,
    output: &Path,
    body: Option<&Path>,
    report: Option<&Path>,
) -> Result<()> {
    let config = load_config(config)?;

    let body = match body {
        Some(path) => {
            let bytes =
                fs::read(path).with_context(|| format!("reading body {}", path.display()))?;
            let mesh = stl::import_stl_bytes(&bytes)
                .with_context(|| format!("parsing body {}", path.display()))?;
            info!("Loaded body with {} triangles", mesh.num_triangles());
            Some(mesh)
        }
        None => None,
    };

    let generation = generate(&config)?;
    for skipped in &generation.report.skipped {
        warn!("{} skipped ({:?}): {}", skipped.rib, skipped.reason, skipped.detail);
    }

    let assembly = Assembly::new(body, &generation);
    if assembly.is_body_only() {
        warn!("No ribs were built; output holds the body only");
    }
    let mesh = assembly.to_mesh();
    fs::write(output, stl::export_stl_bytes(&mesh))
        .with_context(|| format!("writing {}", output.display()))?;
    println!(
        "Exported {} solids ({} triangles) to {}",
        assembly.solid_count(),
        mesh.num_triangles(),
        output.display()
    );

    if let Some(path) = report {
        fs::write(path, generation.report.to_json()?)
            .with_context(|| format!("writing report {}", path.display()))?;
        println!("Wrote report to {}", path.display());
    }
    Ok(())
}

fn run_plan(config: Option<&Path>) -> Result<()> {
    let config = load_config(config)?;
    let plan = plan(&config)?;

    println!(
        "core {:.2} deg, radial offset {:.2} mm, max travel {:.2} deg",
        config.core_angle(),
        config.radial_offset(),
        config.max_travel()
    );
    for side in &plan.sides {
        println!(
            "{}: {} ribs, span {:.2} mm, period {:.2} mm, step {:.4} deg, {} trimmed",
            side.side,
            side.count(),
            side.vertical_span,
            side.period,
            side.angle_step,
            side.trim_count
        );
    }
    println!();
    println!("{:<8} {:>5} {:>9} {:>8} {:>5}", "group", "index", "z", "samples", "trim");
    for row in plan.rows() {
        println!(
            "{:<8} {:>5} {:>9.2} {:>8} {:>5}",
            row.group,
            row.index,
            row.z,
            row.samples,
            if row.trim { "yes" } else { "" }
        );
    }
    Ok(())
}
