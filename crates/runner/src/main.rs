//! Gamma strip packing runner CLI

use clap::{Parser, Subcommand};
use gamma_pack_core::{GammaConfig, PackingSummary};
use gamma_pack_runner::{
    find_neighbours_of_depth, load_details_json, run_harmonic, run_sweep, save_details_json,
    RunConfig, SweepConfig,
};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "gamma-runner")]
#[command(about = "Gamma strip packing of harmonic rectangle streams")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pack a harmonic rectangle stream onto its base sheet
    Run {
        /// Gap exponent
        #[arg(short, long, default_value_t = GammaConfig::default().gamma)]
        gamma: f64,

        /// Index of the first rectangle
        #[arg(short, long, default_value = "100")]
        n0: u64,

        /// Number of rectangles to place
        #[arg(short, long, default_value = "10000")]
        max_placed: u64,

        /// Place rectangles on their shorter side
        #[arg(long)]
        width_smaller: bool,

        /// Skip maintaining the placed-details collection
        #[arg(long)]
        no_track: bool,

        /// Print progress every N indices
        #[arg(long)]
        print_each: Option<u64>,

        /// File for runs of normal box ratio maxima
        #[arg(long)]
        max_ratio_file: Option<PathBuf>,

        /// File for LRP occupancy ratios before each cut
        #[arg(long)]
        lrp_ratio_file: Option<PathBuf>,

        /// Output file for placed details (JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run one packing per gap exponent in parallel
    Sweep {
        /// Smallest gap exponent
        #[arg(long, default_value = "1.2")]
        start: f64,

        /// Largest gap exponent
        #[arg(long, default_value = "2.0")]
        end: f64,

        /// Number of exponents
        #[arg(long, default_value = "9")]
        steps: usize,

        /// Index of the first rectangle
        #[arg(short, long, default_value = "100")]
        n0: u64,

        /// Number of rectangles per run
        #[arg(short, long, default_value = "10000")]
        max_placed: u64,

        /// Output file for outcomes (JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Summarize a saved layout
    Inspect {
        /// Path to the JSON details file
        file: PathBuf,

        /// List the neighbourhood of the detail with this name
        #[arg(long)]
        detail: Option<String>,

        /// Neighbourhood depth
        #[arg(long, default_value = "1")]
        depth: usize,
    },
}

fn main() -> anyhow::Result<()> {
    // `log` records from the library crates are bridged into the subscriber
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            gamma,
            n0,
            max_placed,
            width_smaller,
            no_track,
            print_each,
            max_ratio_file,
            lrp_ratio_file,
            output,
        } => {
            if no_track && output.is_some() {
                anyhow::bail!("--output needs the placed-details collection; drop --no-track");
            }

            let mut config = RunConfig::new()
                .with_gamma(gamma)
                .with_n0(n0)
                .with_max_placed(max_placed)
                .with_tracking(!no_track)
                .with_width_smaller(width_smaller);
            if let Some(n) = print_each {
                config = config.with_print_each(n);
            }
            if let Some(path) = max_ratio_file {
                config = config.with_max_ratio_file(path);
            }
            if let Some(path) = lrp_ratio_file {
                config = config.with_lrp_ratio_file(path);
            }

            let sheet = config.sheet();
            let (placed, engine) = run_harmonic(&config)?;

            println!("Gamma Run");
            println!("=========");
            println!("  gamma:        {}", gamma);
            println!("  n0:           {}", n0);
            println!("  placed:       {}", engine.placed_count());
            println!("  pooled boxes: {}", engine.pool().len());
            if let Some(lrp) = engine.lrp() {
                println!("  LRP:          {} x {}", lrp.width(), lrp.height());
            }
            if config.track_placed {
                let summary = PackingSummary::from_details(sheet.area(), &placed);
                println!("  summary:      {}", summary);
            }

            if let Some(path) = output {
                save_details_json(&placed, &path)?;
                println!("Details saved to: {}", path.display());
            }
        }

        Commands::Sweep {
            start,
            end,
            steps,
            n0,
            max_placed,
            output,
        } => {
            let config = SweepConfig::new(SweepConfig::linspace(start, end, steps), n0, max_placed);
            let outcomes = run_sweep(&config);

            println!("\nGamma Sweep (n0 = {}, {} details)", n0, max_placed);
            println!("{:-<60}", "");
            for outcome in &outcomes {
                let ratio = outcome
                    .max_ratio
                    .map(|r| format!("{:.6}", r))
                    .unwrap_or_else(|| "-".to_string());
                let status = match (&outcome.failed_at, &outcome.error) {
                    (_, Some(err)) => format!("error: {}", err),
                    (Some(index), None) => format!("infeasible at {}", index),
                    (None, None) => "ok".to_string(),
                };
                println!(
                    "  gamma={:<10.6} placed={:<8} max_ratio={:<12} {}",
                    outcome.gamma, outcome.placed, ratio, status
                );
            }

            if let Some(path) = output {
                let json = serde_json::to_string_pretty(&outcomes)?;
                std::fs::write(&path, json)?;
                println!("\nOutcomes saved to: {}", path.display());
            }
        }

        Commands::Inspect {
            file,
            detail,
            depth,
        } => {
            let details = load_details_json(&file)?;
            let sheet_area: f64 = details.iter().map(|d| d.area()).sum();
            let summary = PackingSummary::from_details(sheet_area, &details);

            println!("Layout: {}", file.display());
            println!("  shapes:  {}", details.len());
            println!("  summary: {}", summary);

            if let Some(name) = detail {
                let target = details
                    .iter()
                    .find(|d| d.name == name)
                    .ok_or_else(|| anyhow::anyhow!("No detail named {}", name))?;
                println!("\nNeighbours of {} up to depth {}:", name, depth);
                for neighbour in find_neighbours_of_depth(&details, target, depth) {
                    println!("  {}", neighbour);
                }
            }
        }
    }

    Ok(())
}
