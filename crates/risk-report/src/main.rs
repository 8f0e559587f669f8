//! Lightning Risk Assessment CLI
//!
//! Evaluates the simplified NFPA 780 risk worksheet for one structure and
//! writes the requested reports.
//!
//! Usage:
//!   assess-risk evaluate --project "Pump House" --length 60 --width 40 --height 25 \
//!                        --flash-density 8-12 --structure metal --roof combustible \
//!                        --location isolated --out-dir reports/
//!   assess-risk evaluate --import reports/previous.csv --height 30 --json
//!   assess-risk options

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use lightning_risk::{
    collection_figure, CategoricalCoefficient, ConsequenceCoefficient, ConstructionGrid,
    ConstructionSelection, ContentsCoefficient, FlashDensityBand, LengthUnit, LocationCoefficient,
    OccupancyCoefficient, RoofMaterial, StructureDimensions, StructureMaterial,
};
use risk_report::export::{write_all_reports, write_report};
use risk_report::{load_or_default, AssessmentInput, ExportFormat};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::{debug, info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(
    name = "assess-risk",
    version,
    about = "Simplified NFPA 780 lightning risk assessment"
)]
struct Cli {
    /// Verbose output (ignored when RUST_LOG is set)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evaluate one structure and export the report
    Evaluate(EvaluateArgs),
    /// List every worksheet option with its key and value
    Options,
}

#[derive(Args, Debug)]
struct EvaluateArgs {
    /// Pre-fill inputs from a previously exported CSV report
    #[arg(short, long)]
    import: Option<PathBuf>,

    /// Project name
    #[arg(short, long)]
    project: Option<String>,

    /// Length in feet
    #[arg(short, long)]
    length: Option<f64>,

    /// Width in feet
    #[arg(short, long)]
    width: Option<f64>,

    /// Height in feet
    #[arg(long)]
    height: Option<f64>,

    /// Ground flash density band (key, label or midpoint)
    #[arg(long)]
    flash_density: Option<String>,

    /// Structure material (construction matrix row)
    #[arg(long)]
    structure: Option<StructureMaterial>,

    /// Roof material (construction matrix column)
    #[arg(long)]
    roof: Option<RoofMaterial>,

    /// Contents coefficient (key, label or value)
    #[arg(long)]
    contents: Option<String>,

    /// Occupancy coefficient (key, label or value)
    #[arg(long)]
    occupancy: Option<String>,

    /// Consequence coefficient (key, label or value)
    #[arg(long)]
    consequence: Option<String>,

    /// Location coefficient (key, label or value)
    #[arg(long)]
    location: Option<String>,

    /// Write the CSV report here
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Write the flat OpenDocument report here
    #[arg(long)]
    document: Option<PathBuf>,

    /// Write the Markdown report here
    #[arg(long)]
    markdown: Option<PathBuf>,

    /// Write the collection area figure (JSON) here
    #[arg(long)]
    figure: Option<PathBuf>,

    /// Units for the collection area figure (ft or m)
    #[arg(long, default_value_t = LengthUnit::Feet)]
    figure_units: LengthUnit,

    /// Write every report format into this directory with timestamped names
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Print the report record as JSON on stdout
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let builder = FmtSubscriber::builder().with_writer(std::io::stderr);
    match EnvFilter::try_from_default_env() {
        Ok(filter) => {
            tracing::subscriber::set_global_default(builder.with_env_filter(filter).finish())?
        }
        Err(_) => tracing::subscriber::set_global_default(builder.with_max_level(level).finish())?,
    }

    match cli.command {
        Command::Evaluate(args) => evaluate(args),
        Command::Options => {
            list_options();
            Ok(())
        }
    }
}

fn evaluate(args: EvaluateArgs) -> Result<()> {
    info!("{}", "=".repeat(60));
    info!("NFPA 780 Lightning Risk Assessment");
    info!("{}", "=".repeat(60));

    let mut input = match &args.import {
        // a rejected file is logged and replaced by defaults
        Some(path) => load_or_default(path).input,
        None => AssessmentInput::default(),
    };
    apply_overrides(&mut input, &args)?;
    debug!("Input: {:?}", input);

    let assessment = input.assess().context("assessment failed")?;
    let result = &assessment.result;

    info!("\nProject: {}", display_project(&input.project_name));
    info!(
        "Location: {}",
        input.coefficients.location.describe(input.height_ft)
    );
    for line in assessment.breakdown() {
        info!("  {}", line);
    }
    info!("\n{}", "=".repeat(60));
    info!("RECOMMENDATION");
    info!("{}", "=".repeat(60));
    info!("{}", result.recommendation.statement());
    debug!("Safety margin (N_c / N_D): {:.3}", result.safety_margin());

    let record = assessment.record();

    let single_targets = [
        (args.csv.as_ref(), ExportFormat::Csv),
        (args.document.as_ref(), ExportFormat::Document),
        (args.markdown.as_ref(), ExportFormat::Markdown),
    ];
    for (path, format) in single_targets {
        if let Some(path) = path {
            write_report(path, format, &record)
                .with_context(|| format!("writing {:?}", path))?;
        }
    }

    if let Some(dir) = &args.out_dir {
        let timestamp = chrono::Local::now().naive_local();
        let written = write_all_reports(dir, &record, timestamp)
            .with_context(|| format!("writing reports to {:?}", dir))?;
        for path in written {
            info!("Wrote {:?}", path);
        }
    }

    if let Some(path) = &args.figure {
        write_figure(path, &assessment.dimensions, args.figure_units)?;
    }

    if args.json {
        println!("{}", record.to_json()?);
    }

    Ok(())
}

/// Explicit flags win over imported values
fn apply_overrides(input: &mut AssessmentInput, args: &EvaluateArgs) -> Result<()> {
    if let Some(project) = &args.project {
        input.project_name = project.clone();
    }
    if let Some(length) = args.length {
        input.length_ft = length;
    }
    if let Some(width) = args.width {
        input.width_ft = width;
    }
    if let Some(height) = args.height {
        input.height_ft = height;
    }
    if let Some(raw) = &args.flash_density {
        input.flash_density = select::<FlashDensityBand>(raw)?;
    }

    if args.structure.is_some() || args.roof.is_some() {
        let mut grid = ConstructionGrid::new();
        grid.select_cell(input.coefficients.construction);
        let current = grid.selection();
        let row = args.structure.unwrap_or(current.structure).index();
        let col = args.roof.unwrap_or(current.roof).index();
        input.coefficients.construction = grid.select(row, col)?;
    }

    let c = &mut input.coefficients;
    if let Some(raw) = &args.contents {
        c.contents = select::<ContentsCoefficient>(raw)?;
    }
    if let Some(raw) = &args.occupancy {
        c.occupancy = select::<OccupancyCoefficient>(raw)?;
    }
    if let Some(raw) = &args.consequence {
        c.consequence = select::<ConsequenceCoefficient>(raw)?;
    }
    if let Some(raw) = &args.location {
        c.location = select::<LocationCoefficient>(raw)?;
    }
    Ok(())
}

/// Key, label or worksheet value
fn select<T: CategoricalCoefficient>(raw: &str) -> Result<T> {
    let option = match raw.trim().parse::<f64>() {
        Ok(value) => T::from_value(value)?,
        Err(_) => T::parse(raw)?,
    };
    Ok(option)
}

fn write_figure(path: &Path, dimensions: &StructureDimensions, unit: LengthUnit) -> Result<()> {
    info!("Writing collection area figure to {:?}", path);
    let figure = collection_figure(dimensions, unit);
    let file = File::create(path).with_context(|| format!("creating {:?}", path))?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, &figure)?;
    Ok(())
}

fn display_project(name: &str) -> &str {
    if name.trim().is_empty() {
        "(unnamed)"
    } else {
        name
    }
}

fn list_options() {
    print_category::<ConstructionSelection>();
    print_category::<ContentsCoefficient>();
    print_category::<OccupancyCoefficient>();
    print_category::<ConsequenceCoefficient>();
    print_category::<LocationCoefficient>();
    print_category::<FlashDensityBand>();
}

fn print_category<T: CategoricalCoefficient>() {
    println!("{} ({})", T::CATEGORY, T::CATEGORY.symbol());
    for option in T::options() {
        println!("  {:<24} {:>5}  {}", option.key(), option.value(), option.label());
    }
    println!();
}
