//! QSO Predict - propagation-aware contact recommendations
//!
//! The main entry point for qp-core, handling:
//! - Dataset loading and validation
//! - Destination and band rankings under live solar conditions
//! - Descriptive significance-vs-SFI trend coefficients
//! - Live solar flux index fetch with manual fallback

use chrono::{Datelike, Local, Timelike};
use clap::{Args, Parser, Subcommand};
use qp_common::error::{format_error_human, StructuredError};
use qp_common::{Band, Error, MonthKey, OutputFormat, Result, SCHEMA_VERSION};
use qp_config::{
    resolve_config, resolve_dataset, validate_settings, ConfigPaths, ConfigSnapshot, ConfigSource,
    Settings,
};
use qp_core::conditions::{fetch_current_sfi, resolve_sfi};
use qp_core::dataset::load_dataset;
use qp_core::exit_codes::ExitCode;
use qp_core::logging::{generate_run_id, init_logging, LogConfig, LogFormat, LogLevel};
use qp_core::output::{
    render_check, render_recommendation, render_trend, CheckReport, DatasetSummary,
    RecommendationReport, TrendReport,
};
use qp_core::recommend::{best_bands, best_destinations, Conditions};
use qp_core::trend::compute_trends;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, warn};

/// QSO Predict - propagation-aware destination and band recommendations
#[derive(Parser)]
#[command(name = "qp-core")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Path to settings.json
    #[arg(long, global = true, env = "QP_SETTINGS")]
    settings: Option<PathBuf>,

    /// Path to the QSO dataset snapshot
    #[arg(long, global = true, env = "QP_DATASET")]
    dataset: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "json")]
    format: OutputFormat,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Decrease verbosity (quiet mode)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Log format (human or jsonl)
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,
}

#[derive(Subcommand)]
enum Commands {
    /// Recommend the best destinations to call on a band
    Dests(DestsArgs),

    /// Rank every band by its share of expected contacts
    Bands(BandsArgs),

    /// Show significance-vs-SFI trend coefficients (descriptive only)
    Trend(TrendArgs),

    /// Fetch the current solar flux index from the live source
    Sfi,

    /// Validate configuration and dataset; print a summary
    Check,

    /// Print version information
    Version,
}

#[derive(Args, Debug)]
struct DestsArgs {
    /// HF band to call on (e.g. "20" or "20m")
    #[arg(long, short = 'b')]
    band: Band,

    #[command(flatten)]
    query: QueryOpts,

    /// Number of destinations to return
    #[arg(long)]
    top: Option<usize>,
}

#[derive(Args, Debug)]
struct BandsArgs {
    #[command(flatten)]
    query: QueryOpts,
}

/// Query-time conditions shared by dests and bands.
#[derive(Args, Debug)]
struct QueryOpts {
    /// Month to condition on ("all", a month name, or 1-12); defaults to the current month
    #[arg(long, short = 'm')]
    month: Option<MonthKey>,

    /// Hour of day (0-23); defaults to the current hour
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=23))]
    hour: Option<u8>,

    /// ± hour tolerance around the hour
    #[arg(long, short = 't')]
    tolerance: Option<u8>,

    /// Current solar flux index; fetched live when omitted
    #[arg(long)]
    sfi: Option<i64>,

    /// Force averaging with adjacent SFI ranges
    #[arg(long, conflicts_with = "no_smoothing")]
    smoothing: bool,

    /// Use only the matched SFI range
    #[arg(long)]
    no_smoothing: bool,

    /// Re-run the query every N seconds
    #[arg(long, value_name = "SECONDS")]
    watch: Option<u64>,
}

#[derive(Args, Debug)]
struct TrendArgs {
    /// Restrict to one destination
    #[arg(long)]
    dest: Option<String>,

    /// Restrict to one band
    #[arg(long, short = 'b')]
    band: Option<Band>,

    /// Fit over every SFI range, keeping the overlapping low-end bucket
    #[arg(long)]
    keep_overlap: bool,
}

/// Resolved configuration for one invocation.
struct AppContext {
    settings: Settings,
    settings_json: Option<String>,
    paths: ConfigPaths,
    dataset_path: PathBuf,
    dataset_source: ConfigSource,
}

impl AppContext {
    fn resolve(global: &GlobalOpts) -> Result<Self> {
        let paths = resolve_config(global.settings.as_deref());

        let (settings, settings_json) = match &paths.settings {
            Some(path) => {
                let json = std::fs::read_to_string(path)?;
                (Settings::from_json(&json)?, Some(json))
            }
            None => (Settings::default(), None),
        };

        let validation = validate_settings(&settings);
        if !validation.is_valid() {
            let problems: Vec<String> = validation
                .errors()
                .map(|issue| format!("{}: {}", issue.field, issue.message))
                .collect();
            return Err(Error::InvalidSettings(problems.join("; ")));
        }
        for issue in validation.warnings() {
            warn!(field = issue.field, "{}", issue.message);
        }

        let (dataset_path, dataset_source) =
            resolve_dataset(global.dataset.as_deref(), settings.dataset.as_deref());

        Ok(AppContext {
            settings,
            settings_json,
            paths,
            dataset_path,
            dataset_source,
        })
    }
}

fn main() {
    let cli = Cli::parse();

    let cli_level = if cli.global.quiet {
        Some(LogLevel::Error)
    } else {
        match cli.global.verbose {
            0 => None,
            1 => Some(LogLevel::Debug),
            _ => Some(LogLevel::Trace),
        }
    };
    let log_config = LogConfig::from_env(cli_level, cli.global.log_format);
    init_logging(&log_config);

    let run_id = generate_run_id();
    debug!(%run_id, "qp-core starting");

    let exit = match run(&cli) {
        Ok(code) => code,
        Err(err) => {
            report_error(&err, cli.global.format, !cli.global.no_color);
            ExitCode::from(&err)
        }
    };
    std::process::exit(exit.as_i32());
}

fn run(cli: &Cli) -> Result<ExitCode> {
    match &cli.command {
        Commands::Dests(args) => {
            let ctx = AppContext::resolve(&cli.global)?;
            cmd_dests(&ctx, &cli.global, args)
        }
        Commands::Bands(args) => {
            let ctx = AppContext::resolve(&cli.global)?;
            cmd_bands(&ctx, &cli.global, args)
        }
        Commands::Trend(args) => {
            let ctx = AppContext::resolve(&cli.global)?;
            cmd_trend(&ctx, &cli.global, args)
        }
        Commands::Sfi => {
            let ctx = AppContext::resolve(&cli.global)?;
            cmd_sfi(&ctx, &cli.global)
        }
        Commands::Check => {
            let ctx = AppContext::resolve(&cli.global)?;
            cmd_check(&ctx, &cli.global)
        }
        Commands::Version => cmd_version(&cli.global),
    }
}

fn cmd_dests(ctx: &AppContext, global: &GlobalOpts, args: &DestsArgs) -> Result<ExitCode> {
    let dataset = load_dataset(&ctx.dataset_path)?;
    let top = args.top.unwrap_or(ctx.settings.default_top);

    loop {
        let (conditions, sfi_source) = build_conditions(ctx, &args.query)?;
        let recommendation = best_destinations(&dataset, args.band, &conditions, top)?;
        let report =
            RecommendationReport::destinations(args.band, &conditions, sfi_source, recommendation);
        println!("{}", render_recommendation(&report, global.format)?);

        match args.query.watch {
            Some(seconds) => std::thread::sleep(Duration::from_secs(seconds)),
            None => return Ok(ExitCode::Clean),
        }
    }
}

fn cmd_bands(ctx: &AppContext, global: &GlobalOpts, args: &BandsArgs) -> Result<ExitCode> {
    let dataset = load_dataset(&ctx.dataset_path)?;

    loop {
        let (conditions, sfi_source) = build_conditions(ctx, &args.query)?;
        let recommendation = best_bands(&dataset, &conditions)?;
        let report = RecommendationReport::bands(&conditions, sfi_source, recommendation);
        println!("{}", render_recommendation(&report, global.format)?);

        match args.query.watch {
            Some(seconds) => std::thread::sleep(Duration::from_secs(seconds)),
            None => return Ok(ExitCode::Clean),
        }
    }
}

/// Assemble the immutable per-query conditions snapshot.
///
/// Month and hour default to the local clock, the SFI to the live fetch
/// with its fallback chain; each watch tick rebuilds the snapshot.
fn build_conditions(
    ctx: &AppContext,
    query: &QueryOpts,
) -> Result<(Conditions, qp_core::SfiSource)> {
    let now = Local::now();
    let month = query.month.unwrap_or_else(|| {
        MonthKey::from_number(now.month() as u8).unwrap_or(MonthKey::All)
    });
    let hour = query.hour.unwrap_or(now.hour() as u8);
    let tolerance = query.tolerance.unwrap_or(ctx.settings.default_tolerance);
    let smoothing = if query.no_smoothing {
        false
    } else {
        query.smoothing || ctx.settings.smoothing
    };

    let (sfi, sfi_source) = resolve_sfi(query.sfi, &ctx.settings.sfi_source_url)?;

    Ok((
        Conditions {
            month,
            hour,
            tolerance,
            sfi,
            smoothing,
        },
        sfi_source,
    ))
}

fn cmd_trend(ctx: &AppContext, global: &GlobalOpts, args: &TrendArgs) -> Result<ExitCode> {
    let dataset = load_dataset(&ctx.dataset_path)?;
    let drop_overlap = ctx.settings.drop_overlap_bucket && !args.keep_overlap;
    let table = compute_trends(&dataset, drop_overlap, args.dest.as_deref(), args.band)?;
    let report = TrendReport::new(table);
    println!("{}", render_trend(&report, global.format)?);
    Ok(ExitCode::Clean)
}

fn cmd_sfi(ctx: &AppContext, global: &GlobalOpts) -> Result<ExitCode> {
    let sfi = fetch_current_sfi(&ctx.settings.sfi_source_url)?;
    match global.format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "schema_version": SCHEMA_VERSION,
                "sfi": sfi,
                "source_url": ctx.settings.sfi_source_url,
            }))?
        ),
        OutputFormat::Md | OutputFormat::Summary => println!("Current SFI: {sfi}"),
    }
    Ok(ExitCode::Clean)
}

fn cmd_check(ctx: &AppContext, global: &GlobalOpts) -> Result<ExitCode> {
    let dataset = load_dataset(&ctx.dataset_path)?;

    let mut warnings: Vec<String> = validate_settings(&ctx.settings)
        .warnings()
        .map(|issue| format!("settings {}: {}", issue.field, issue.message))
        .collect();
    if !qp_common::ALLOWED_INTERVAL_SIZES.contains(&dataset.interval_size()) {
        warnings.push(format!(
            "dataset interval size {} is not one the report source offers",
            dataset.interval_size()
        ));
    }
    if dataset.covered_to() != qp_common::SFI_CEILING {
        warnings.push(format!(
            "dataset SFI coverage stops at {} instead of {}",
            dataset.covered_to(),
            qp_common::SFI_CEILING
        ));
    }
    if !dataset.months().contains(&MonthKey::All) {
        warnings.push("dataset has no \"All\" month bucket; trend fits will fail".to_string());
    }

    let snapshot = ConfigSnapshot::new(
        &ctx.settings,
        ctx.settings_json.as_deref(),
        &ctx.paths,
        &ctx.dataset_path,
        ctx.dataset_source,
    );
    let report = CheckReport {
        schema_version: SCHEMA_VERSION,
        generated_at: chrono::Utc::now(),
        config: snapshot,
        dataset: DatasetSummary::new(&dataset, &ctx.dataset_path.display().to_string()),
        warnings,
    };
    println!("{}", render_check(&report, global.format)?);
    Ok(ExitCode::Clean)
}

fn cmd_version(global: &GlobalOpts) -> Result<ExitCode> {
    match global.format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "name": "qp-core",
                "version": env!("CARGO_PKG_VERSION"),
                "schema_version": SCHEMA_VERSION,
            }))?
        ),
        OutputFormat::Md | OutputFormat::Summary => {
            println!("qp-core {}", env!("CARGO_PKG_VERSION"));
        }
    }
    Ok(ExitCode::Clean)
}

fn report_error(err: &Error, format: OutputFormat, use_color: bool) {
    match format {
        // Machine consumers read structured errors from stdout.
        OutputFormat::Json => println!("{}", StructuredError::from(err).to_json_pretty()),
        OutputFormat::Md | OutputFormat::Summary => {
            eprintln!("{}", format_error_human(err, use_color));
        }
    }
}
