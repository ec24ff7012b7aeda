#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Building footprint shape metrics from the command line.
//!
//! ```text
//! building_shapes [--config FILE] stats <INPUT> [--json]
//! building_shapes [--config FILE] csv <INPUT> [--output FILE]
//! building_shapes [--config FILE] enrich <INPUT> [--output FILE]
//! ```
//!
//! `INPUT` is a `GeoJSON` file (`FeatureCollection`, `Feature`, `Polygon` or
//! `MultiPolygon`). Set `RUST_LOG=debug` for per-feature diagnostics.
//!
//! Exits with status 2 when the input cannot be read as polygon `GeoJSON`
//! and 1 on any other failure.

use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use building_shapes_pipeline::{PipelineConfig, PipelineError, PipelineOutput, Session};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "building_shapes",
    about = "Compute shape metrics for building footprint polygons"
)]
struct Cli {
    /// Pipeline configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print summary statistics of the tracked metrics
    Stats {
        /// GeoJSON input file
        input: PathBuf,
        /// Print the summary as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Write the per-feature metrics as CSV
    Csv {
        /// GeoJSON input file
        input: PathBuf,
        /// Output file (defaults to the configured export filename)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Write the enriched FeatureCollection as GeoJSON
    Enrich {
        /// GeoJSON input file
        input: PathBuf,
        /// Output file (stdout when omitted)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

impl Commands {
    fn input(&self) -> &Path {
        match self {
            Self::Stats { input, .. } | Self::Csv { input, .. } | Self::Enrich { input, .. } => {
                input
            }
        }
    }
}

/// Exit status for input that is not polygon `GeoJSON`.
const INPUT_ERROR: u8 = 2;

fn main() -> ExitCode {
    pretty_env_logger::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let (message, status) = failure(e.as_ref());
            eprintln!("{message}");
            ExitCode::from(status)
        }
    }
}

/// User-facing message and exit status for a failed command.
fn failure(e: &(dyn Error + 'static)) -> (String, u8) {
    match e.downcast_ref::<PipelineError>() {
        Some(PipelineError::Normalize(inner)) if inner.is_unsupported() => (
            format!("{inner}\nExpected a FeatureCollection, Feature, Polygon or MultiPolygon."),
            INPUT_ERROR,
        ),
        Some(PipelineError::Normalize(inner)) => (inner.to_string(), INPUT_ERROR),
        _ => (e.to_string(), 1),
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let config = match &cli.config {
        Some(path) => PipelineConfig::load(path)?,
        None => PipelineConfig::default(),
    };

    let input = cli.command.input();
    log::info!("Reading {}", input.display());
    let text = std::fs::read_to_string(input)?;

    let export_filename = PathBuf::from(&config.export.filename);
    let mut session = Session::new(config);
    let output = session.load(&text)?;

    match &cli.command {
        Commands::Stats { json, .. } => print_stats(output, *json)?,
        Commands::Csv { output: path, .. } => {
            let path = path.as_ref().unwrap_or(&export_filename);
            let csv = output.to_csv()?;
            std::fs::write(path, csv)?;
            println!(
                "Wrote {} feature(s) to {}",
                output.features.len(),
                path.display()
            );
        }
        Commands::Enrich { output: path, .. } => {
            let geojson = output.to_geojson()?;
            if let Some(view) = &output.view {
                log::info!(
                    "View fit: [{}, {}, {}, {}] padding={} max_zoom={}",
                    view.bounds.min_lon,
                    view.bounds.min_lat,
                    view.bounds.max_lon,
                    view.bounds.max_lat,
                    view.padding,
                    view.max_zoom
                );
            }
            match path {
                Some(path) => {
                    std::fs::write(path, geojson)?;
                    log::info!("Wrote enriched collection to {}", path.display());
                }
                None => println!("{geojson}"),
            }
        }
    }

    Ok(())
}

fn print_stats(output: &PipelineOutput, json: bool) -> Result<(), Box<dyn Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(&output.summary)?);
    } else {
        println!("{} polygon feature(s)", output.features.len());
        println!();
        print!("{}", building_shapes_stats::render_table(&output.summary));
    }
    Ok(())
}
