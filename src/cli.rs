//! CLI definition and dispatch.

use chrono::{Days, Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::adapters::console_report;
use crate::adapters::csv_adapter::{CsvDirectoryAdapter, WideCsvAdapter};
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::portfolio_csv_adapter::CsvPortfolioAdapter;
use crate::adapters::svg_chart_adapter::{ChartSize, SvgChartAdapter};
use crate::domain::config_validation::{parse_date, validate_eval_config};
use crate::domain::error::EvalError;
use crate::domain::evaluation::{run_evaluation, EvalConfig};
use crate::domain::statistics::TRADING_DAYS_PER_YEAR;
use crate::domain::weights::WeightPolicy;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::PriceDataPort;
use crate::ports::portfolio_port::PortfolioPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(
    name = "portfolio-eval",
    about = "Evaluate the historical performance of a fixed-weight portfolio"
)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compute returns, statistics and the value chart
    Evaluate(EvalArgs),
    /// Check configuration and portfolio weights without loading prices
    Validate(EvalArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct EvalArgs {
    /// INI configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Portfolio CSV with symbol and weight columns
    #[arg(short, long)]
    pub portfolio: Option<PathBuf>,
    /// Price table CSV: date column followed by one column per symbol
    #[arg(long, conflicts_with = "data_dir")]
    pub data: Option<PathBuf>,
    /// Directory of <SYMBOL>.csv price files
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
    /// First date of the window (YYYY-MM-DD)
    #[arg(long)]
    pub start_date: Option<String>,
    /// Last date of the window (YYYY-MM-DD); defaults to tomorrow
    #[arg(long)]
    pub end_date: Option<String>,
    /// Accept negative weights as short positions
    #[arg(long)]
    pub allow_short: bool,
    /// Chart output path (SVG)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Skip writing the chart
    #[arg(long)]
    pub no_chart: bool,
    /// Print holdings and secondary statistics
    #[arg(long)]
    pub detailed: bool,
}

pub fn run(cli: Cli) -> ExitCode {
    init_tracing(cli.verbose);
    match cli.command {
        Command::Evaluate(args) => run_evaluate(&args),
        Command::Validate(args) => run_validate(&args),
    }
}

pub fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();
    // A subscriber may already be installed when embedded or under test.
    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// Config file (or an empty one) with command-line flags applied on top.
pub fn load_config(args: &EvalArgs) -> Result<FileConfigAdapter, EvalError> {
    let mut config = match &args.config {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading config");
            FileConfigAdapter::from_file(path)?
        }
        None => FileConfigAdapter::empty(),
    };

    if let Some(p) = &args.portfolio {
        config.set("portfolio", "file", p.display().to_string());
    }
    if let Some(p) = &args.data {
        config.set("data", "file", p.display().to_string());
        config.remove("data", "dir");
    }
    if let Some(p) = &args.data_dir {
        config.set("data", "dir", p.display().to_string());
        config.remove("data", "file");
    }
    if let Some(d) = &args.start_date {
        config.set("evaluation", "start_date", d.clone());
    }
    if let Some(d) = &args.end_date {
        config.set("evaluation", "end_date", d.clone());
    }
    if args.allow_short {
        config.set("evaluation", "allow_short", "true");
    }
    if let Some(p) = &args.output {
        config.set("report", "output", p.display().to_string());
    }
    Ok(config)
}

/// Build run parameters from validated config. A missing end date means the
/// day after `today`, so today's close is inside the window.
pub fn build_eval_config(
    config: &dyn ConfigPort,
    today: NaiveDate,
) -> Result<EvalConfig, EvalError> {
    let start_date = parse_date(
        config.get_string("evaluation", "start_date").as_deref(),
        "start_date",
    )?;
    let end_date = match config.get_string("evaluation", "end_date") {
        Some(s) => parse_date(Some(&s), "end_date")?,
        None => today.checked_add_days(Days::new(1)).unwrap_or(today),
    };

    Ok(EvalConfig {
        start_date,
        end_date,
        weight_policy: WeightPolicy {
            allow_short: config.get_bool("evaluation", "allow_short", false),
        },
        trading_days: config.get_double("statistics", "trading_days", TRADING_DAYS_PER_YEAR),
    })
}

pub fn build_data_port(config: &dyn ConfigPort) -> Result<Box<dyn PriceDataPort>, EvalError> {
    if let Some(file) = config.get_string("data", "file") {
        let adapter = WideCsvAdapter::from_file(&file)?;
        tracing::info!(path = %file, symbols = ?adapter.symbols(), "read price table");
        return Ok(Box::new(adapter));
    }
    if let Some(dir) = config.get_string("data", "dir") {
        tracing::info!(path = %dir, "reading per-symbol price files");
        return Ok(Box::new(CsvDirectoryAdapter::new(PathBuf::from(dir))));
    }
    Err(EvalError::ConfigMissing {
        section: "data".into(),
        key: "file".into(),
    })
}

/// `report.output`, else `portfolio_value_<portfolio stem>.svg`.
pub fn resolve_output_path(config: &dyn ConfigPort, portfolio_name: &str) -> PathBuf {
    config
        .get_string("report", "output")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(format!("portfolio_value_{portfolio_name}.svg")))
}

pub fn build_chart_size(config: &dyn ConfigPort) -> ChartSize {
    let default = ChartSize::default();
    ChartSize {
        width: config.get_int("report", "width", default.width as i64) as f64,
        height: config.get_int("report", "height", default.height as i64) as f64,
        ..default
    }
}

fn portfolio_adapter(config: &dyn ConfigPort) -> Result<CsvPortfolioAdapter, EvalError> {
    config
        .get_string("portfolio", "file")
        .map(|f| CsvPortfolioAdapter::new(PathBuf::from(f)))
        .ok_or_else(|| EvalError::ConfigMissing {
            section: "portfolio".into(),
            key: "file".into(),
        })
}

/// Stages 1-6 of an evaluation; returns the text printed to stdout.
pub fn evaluate_pipeline(args: &EvalArgs, today: NaiveDate) -> Result<String, EvalError> {
    // Stage 1: config
    let config = load_config(args)?;
    validate_eval_config(&config)?;
    let eval_config = build_eval_config(&config, today)?;

    // Stage 2: portfolio
    let portfolio = portfolio_adapter(&config)?;
    let raw_weights = portfolio.load_weights()?;
    let name = portfolio.name();

    // Stage 3: price source
    let data_port = build_data_port(&config)?;

    // Stage 4: returns and statistics
    tracing::info!(
        "evaluating {} holdings from {} to {}",
        raw_weights.len(),
        eval_config.start_date,
        eval_config.end_date
    );
    let report = run_evaluation(data_port.as_ref(), &name, &raw_weights, &eval_config)?;

    // Stage 5: chart
    if !args.no_chart {
        let output = resolve_output_path(&config, &name);
        SvgChartAdapter::new(build_chart_size(&config)).write(&report, &output)?;
        eprintln!("Chart written to: {}", output.display());
    }

    // Stage 6: console summary
    Ok(if args.detailed {
        console_report::format_detailed(&report)
    } else {
        console_report::format_summary(&report.summary)
    })
}

fn run_evaluate(args: &EvalArgs) -> ExitCode {
    match evaluate_pipeline(args, Local::now().date_naive()) {
        Ok(text) => {
            print!("{text}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

/// Config and weight checks only; returns the normalized holdings listing.
pub fn validate_pipeline(args: &EvalArgs) -> Result<String, EvalError> {
    let config = load_config(args)?;
    validate_eval_config(&config)?;
    let eval_config = build_eval_config(&config, Local::now().date_naive())?;

    let portfolio = portfolio_adapter(&config)?;
    let weights = portfolio
        .load_weights()?
        .normalize(eval_config.weight_policy)?;

    let mut out = format!(
        "Portfolio {} is valid ({} holdings, {} to {})\n",
        portfolio.name(),
        weights.len(),
        eval_config.start_date,
        eval_config.end_date
    );
    for h in weights.holdings() {
        out.push_str(&format!("  {:<8} {:>7.2}%\n", h.symbol, h.weight * 100.0));
    }
    Ok(out)
}

fn run_validate(args: &EvalArgs) -> ExitCode {
    match validate_pipeline(args) {
        Ok(text) => {
            print!("{text}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}
