//! Shotdiff: screenshot diffing for visual regression checks.
//!
//! Shotdiff compares a baseline capture against a current one, turns the
//! per-pixel differences into a ranked list of change regions, and emits a
//! JSON report plus optional overlay images and an annotation document that
//! a separate renderer can draw.
//!
//! The pipeline runs once per image pair:
//! raster loading, differencing, region extraction, ranking, then the
//! annotation document and overlays, and finally the report.
//!
//! # Modules
//!
//! - [`raster`]: Loading and size alignment of the two inputs
//! - [`diff`]: Per-pixel difference grid and global statistics
//! - [`region`]: Connected-component extraction and ranking
//! - [`annotate`]: Annotation documents for external renderers
//! - [`overlay`]: Heat and annotated overlay images
//! - [`report`]: The comparison report
//! - [`compare`]: The end-to-end pipeline
//! - [`error`]: Error types for shotdiff operations

pub mod annotate;
pub mod artifact;
pub mod compare;
pub mod diff;
pub mod error;
pub mod geom;
pub mod overlay;
pub mod raster;
pub mod region;
pub mod report;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

pub use compare::{compare_images, compare_rasters, ArtifactPaths, CompareOptions};
pub use error::ShotdiffError;
pub use report::Report;

/// Environment variable holding the log filter directive.
pub const LOG_ENV: &str = "SHOTDIFF_LOG";

/// The shotdiff CLI application.
#[derive(Parser)]
#[command(name = "shotdiff")]
#[command(version, author, about)]
#[command(propagate_version = true)]
struct Cli {
    /// Log debug detail to stderr (overridden by SHOTDIFF_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Compare a current screenshot against a baseline.
    Diff(DiffArgs),
    /// Parse an annotation document and check that its anchors resolve.
    CheckSpec(CheckSpecArgs),
}

/// Report output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

/// Arguments for the diff subcommand.
#[derive(clap::Args)]
struct DiffArgs {
    /// Baseline image.
    baseline: PathBuf,

    /// Current image.
    current: PathBuf,

    /// Write the heat overlay (diff layer over the current image) here.
    #[arg(long)]
    diff_out: Option<PathBuf>,

    /// Write the current image with boxes and labels for each region here.
    #[arg(long)]
    annotated_out: Option<PathBuf>,

    /// Write the annotation document (JSON) here.
    #[arg(long)]
    annotate_spec_out: Option<PathBuf>,

    /// Also write the report (pretty JSON) here.
    #[arg(long)]
    json_out: Option<PathBuf>,

    /// Resize the current image to the baseline's size if they differ.
    #[arg(long)]
    resize: bool,

    /// Magnitude a pixel must exceed to count as changed (clamped to 0-255).
    #[arg(
        long,
        visible_alias = "bbox-threshold",
        env = "SHOTDIFF_THRESHOLD",
        default_value_t = 24,
        allow_negative_numbers = true
    )]
    threshold: i64,

    /// Discard clusters with fewer changed pixels (at least 1).
    #[arg(
        long,
        visible_alias = "bbox-min-area",
        env = "SHOTDIFF_MIN_PIXELS",
        default_value_t = 64,
        allow_negative_numbers = true
    )]
    min_cluster_pixels: i64,

    /// Margin added around each region's tight bounds.
    #[arg(
        long,
        visible_alias = "bbox-pad",
        env = "SHOTDIFF_PAD",
        default_value_t = 2,
        allow_negative_numbers = true
    )]
    pad: i64,

    /// Report at most this many regions, largest first (0 = all).
    #[arg(
        long,
        visible_alias = "max-boxes",
        env = "SHOTDIFF_MAX_REGIONS",
        default_value_t = 16,
        allow_negative_numbers = true
    )]
    max_regions: i64,

    /// How channel differences combine into one magnitude.
    #[arg(long, value_enum, env = "SHOTDIFF_METRIC", default_value = "luma")]
    metric: diff::DiffMetric,

    /// Format of the report printed to stdout.
    #[arg(long, value_enum, default_value = "json")]
    output: OutputFormat,
}

/// Arguments for the check-spec subcommand.
#[derive(clap::Args)]
struct CheckSpecArgs {
    /// Annotation document to check.
    input: PathBuf,
}

/// Run the shotdiff CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), ShotdiffError> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Some(Commands::Diff(args)) => run_diff(args),
        Some(Commands::CheckSpec(args)) => run_check_spec(args),
        None => {
            println!("shotdiff {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Screenshot diffing for visual regression checks.");
            println!();
            println!("Run 'shotdiff --help' for usage information.");
            Ok(())
        }
    }
}

/// Installs the stderr log subscriber.
///
/// `SHOTDIFF_LOG` takes an `EnvFilter` directive; without it the level is
/// `warn`, or `debug` when `verbose` is set. Repeated calls are ignored.
pub fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Execute the diff subcommand.
fn run_diff(args: DiffArgs) -> Result<(), ShotdiffError> {
    let opts = CompareOptions::clamped(
        args.threshold,
        args.min_cluster_pixels,
        args.pad,
        args.max_regions,
    )
    .with_metric(args.metric)
    .with_resize(args.resize);

    let artifacts = ArtifactPaths {
        diff_out: args.diff_out,
        annotated_out: args.annotated_out,
        annotate_spec_out: args.annotate_spec_out,
        json_out: args.json_out,
    };

    let report = compare_images(&args.baseline, &args.current, &opts, &artifacts)?;

    match args.output {
        OutputFormat::Json => {
            let json = report.to_compact_json().map_err(ShotdiffError::ReportEncode)?;
            println!("{json}");
        }
        OutputFormat::Text => print!("{report}"),
    }
    Ok(())
}

/// Execute the check-spec subcommand.
fn run_check_spec(args: CheckSpecArgs) -> Result<(), ShotdiffError> {
    let spec = annotate::read_spec(&args.input)?;

    let mut counts = std::collections::BTreeMap::new();
    for a in &spec.annotations {
        *counts.entry(a.kind()).or_insert(0usize) += 1;
    }

    println!("Annotations: {}", spec.annotations.len());
    for (kind, count) in &counts {
        println!("  {kind}: {count}");
    }

    let unresolved = spec.unresolved_anchors();
    if unresolved.is_empty() {
        println!("Anchors: all resolved");
        Ok(())
    } else {
        for anchor in &unresolved {
            println!("Unresolved anchor: {anchor:?}");
        }
        Err(ShotdiffError::UnresolvedAnchors {
            path: args.input,
            count: unresolved.len(),
        })
    }
}
