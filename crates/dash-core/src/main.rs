//! Matiks Dashboard CLI
//!
//! The main entry point for matiks-dash, handling:
//! - HTML dashboard rendering
//! - JSON summaries of the derived metrics
//! - Filtered CSV export
//! - Filter option discovery

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::error::ErrorKind;
use clap::{Args, Parser, Subcommand};
use dash_config::DashboardConfig;
use dash_core::exit_codes::ExitCode;
use dash_core::logging::{
    event_names, generate_run_id, init_logging, LogConfig, LogFormat, LogLevel, Stage,
};
use dash_core::{write_csv, Dashboard, Error, FilterCriteria, FilterOptions, Result, Summary};
use dash_report::ReportTheme;
use tracing::{error, info, info_span, warn};

/// Matiks Dashboard - user behavior and revenue reports from a player CSV
#[derive(Parser)]
#[command(name = "matiks-dash")]
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
    /// Path to dashboard.json (overrides MATIKS_DASH_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Log output format on stderr (human, jsonl)
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the HTML dashboard
    Report(ReportArgs),

    /// Print the derived metrics as JSON
    Summary(SummaryArgs),

    /// Write the filtered rows as CSV
    Export(ExportArgs),

    /// Print the values offered by each filter as JSON
    Options(OptionsArgs),
}

/// Equality-set filters. Repeat a flag to select several values.
#[derive(Args, Debug, Clone, Default)]
struct FilterArgs {
    /// Keep rows whose Country is one of these values
    #[arg(long = "country", value_name = "VALUE")]
    country: Vec<String>,

    /// Keep rows whose Device_Type is one of these values
    #[arg(long = "device", value_name = "VALUE")]
    device_type: Vec<String>,

    /// Keep rows whose Game_Title is one of these values
    #[arg(long = "game", value_name = "VALUE")]
    game_title: Vec<String>,
}

impl FilterArgs {
    fn is_empty(&self) -> bool {
        self.country.is_empty() && self.device_type.is_empty() && self.game_title.is_empty()
    }

    /// CLI filters when any are given, otherwise the configured defaults.
    fn criteria(&self, config: &DashboardConfig) -> FilterCriteria {
        if self.is_empty() {
            return FilterCriteria::from_selection(&config.filters);
        }
        FilterCriteria::new()
            .with_country(self.country.iter().cloned())
            .with_device_type(self.device_type.iter().cloned())
            .with_game_title(self.game_title.iter().cloned())
    }
}

/// Metric parameters shared by `report` and `summary`.
#[derive(Args, Debug, Clone, Default)]
struct MetricArgs {
    /// Inactivity window in days for churn
    #[arg(long, value_parser = clap::value_parser!(i64).range(0..))]
    churn_days: Option<i64>,

    /// Number of rows in the top users table
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    top: Option<u64>,
}

impl MetricArgs {
    fn apply(&self, config: &mut DashboardConfig) {
        if let Some(days) = self.churn_days {
            config.churn_threshold_days = days;
        }
        if let Some(top) = self.top {
            config.top_users = usize::try_from(top).unwrap_or(usize::MAX);
        }
    }
}

#[derive(Args, Debug)]
struct ReportArgs {
    /// Player dataset (CSV with header)
    #[arg(long, short = 'd')]
    data: PathBuf,

    /// Output HTML file
    #[arg(long, short = 'o', default_value = "matiks_dashboard.html")]
    output: PathBuf,

    /// Dashboard title
    #[arg(long)]
    title: Option<String>,

    /// Color theme (light, dark, auto)
    #[arg(long)]
    theme: Option<ReportTheme>,

    #[command(flatten)]
    filters: FilterArgs,

    #[command(flatten)]
    metrics: MetricArgs,
}

#[derive(Args, Debug)]
struct SummaryArgs {
    /// Player dataset (CSV with header)
    #[arg(long, short = 'd')]
    data: PathBuf,

    #[command(flatten)]
    filters: FilterArgs,

    #[command(flatten)]
    metrics: MetricArgs,
}

#[derive(Args, Debug)]
struct ExportArgs {
    /// Player dataset (CSV with header)
    #[arg(long, short = 'd')]
    data: PathBuf,

    /// Output CSV file (defaults to the configured export filename)
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    #[command(flatten)]
    filters: FilterArgs,
}

#[derive(Args, Debug)]
struct OptionsArgs {
    /// Player dataset (CSV with header)
    #[arg(long, short = 'd')]
    data: PathBuf,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::Clean,
                _ => ExitCode::ArgsError,
            };
            let _ = err.print();
            std::process::exit(code.as_i32());
        }
    };

    let cli_level = if cli.global.quiet {
        Some(LogLevel::Error)
    } else {
        match cli.global.verbose {
            0 => None,
            1 => Some(LogLevel::Debug),
            _ => Some(LogLevel::Trace),
        }
    };
    init_logging(&LogConfig::from_env(cli_level, cli.global.log_format));

    let run_id = generate_run_id();
    let span = info_span!("run", run_id = %run_id);
    let _guard = span.enter();

    info!(
        event = event_names::RUN_STARTED,
        stage = %Stage::Init,
        version = env!("CARGO_PKG_VERSION"),
        "Starting matiks-dash"
    );

    let exit_code = match run(&cli) {
        Ok(()) => ExitCode::Clean,
        Err(err) => {
            let code = ExitCode::from(&err);
            error!(
                event = event_names::INTERNAL_ERROR,
                code = code.code_name(),
                error = %err,
                "Command failed"
            );
            eprintln!("matiks-dash: {}", err);
            code
        }
    };

    info!(
        event = event_names::RUN_FINISHED,
        exit_code = exit_code.as_i32(),
        "Finished"
    );

    std::process::exit(exit_code.as_i32());
}

fn run(cli: &Cli) -> Result<()> {
    let config = load_config(&cli.global)?;
    match &cli.command {
        Commands::Report(args) => run_report(config, args),
        Commands::Summary(args) => run_summary(config, args),
        Commands::Export(args) => run_export(config, args),
        Commands::Options(args) => run_options(config, args),
    }
}

fn load_config(global: &GlobalOpts) -> Result<DashboardConfig> {
    if let Some(path) = &global.config {
        if !path.exists() {
            warn!(
                event = event_names::CONFIG_DEFAULT_USED,
                path = %path.display(),
                "Config path does not exist; continuing resolution"
            );
        }
    }

    match dash_config::load_config(global.config.as_deref()) {
        Ok((config, resolved)) => {
            match &resolved.path {
                Some(path) => info!(
                    event = event_names::CONFIG_LOADED,
                    path = %path.display(),
                    source = %resolved.source,
                    "Configuration loaded"
                ),
                None => info!(
                    event = event_names::CONFIG_DEFAULT_USED,
                    "Using built-in configuration"
                ),
            }
            Ok(config)
        }
        Err(err) => {
            error!(
                event = event_names::CONFIG_ERROR,
                code = err.code(),
                error = %err,
                "Configuration rejected"
            );
            Err(err.into())
        }
    }
}

fn run_report(mut config: DashboardConfig, args: &ReportArgs) -> Result<()> {
    args.metrics.apply(&mut config);
    if let Some(title) = &args.title {
        config.title = Some(title.clone());
    }
    let criteria = args.filters.criteria(&config);
    let mut dashboard = Dashboard::new(config);
    if let Some(theme) = args.theme {
        dashboard = dashboard.with_theme(theme);
    }

    let html = match dashboard.render(&args.data, &criteria) {
        Ok(html) => html,
        Err(Error::Load(err)) => {
            write_output(&args.output, dashboard.error_page(&err).as_bytes())?;
            return Err(Error::Load(err));
        }
        Err(err) => return Err(err),
    };

    write_output(&args.output, html.as_bytes())?;
    info!(
        event = event_names::EXPORT_WRITTEN,
        stage = %Stage::Export,
        path = %args.output.display(),
        bytes = html.len(),
        "Dashboard written"
    );
    Ok(())
}

fn run_summary(mut config: DashboardConfig, args: &SummaryArgs) -> Result<()> {
    args.metrics.apply(&mut config);
    let criteria = args.filters.criteria(&config);
    let mut dashboard = Dashboard::new(config);
    let dataset = dashboard.load(&args.data)?;
    let view = dataset.filter(&criteria);
    let summary = Summary::compute(
        &view,
        &criteria,
        dashboard.config().churn_threshold_days,
        dashboard.config().top_users,
    );
    println!("{}", summary.to_json()?);
    Ok(())
}

fn run_export(config: DashboardConfig, args: &ExportArgs) -> Result<()> {
    let criteria = args.filters.criteria(&config);
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.export_filename));
    let mut dashboard = Dashboard::new(config);
    let dataset = dashboard.load(&args.data)?;
    let view = dataset.filter(&criteria);

    let file = File::create(&output)?;
    let mut writer = BufWriter::new(file);
    write_csv(&view, &mut writer)?;
    writer.flush()?;

    info!(
        event = event_names::EXPORT_WRITTEN,
        stage = %Stage::Export,
        path = %output.display(),
        rows = view.len(),
        "Filtered CSV written"
    );
    Ok(())
}

fn run_options(config: DashboardConfig, args: &OptionsArgs) -> Result<()> {
    let mut dashboard = Dashboard::new(config);
    let dataset = dashboard.load(&args.data)?;
    let options = FilterOptions::from_dataset(&dataset);
    println!("{}", serde_json::to_string_pretty(&options)?);
    Ok(())
}

fn write_output(path: &Path, bytes: &[u8]) -> Result<()> {
    std::fs::write(path, bytes)?;
    Ok(())
}
