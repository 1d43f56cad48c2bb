use analytics::{AnalyticsEngine, SignalMetrics, TradeMetrics};
use anyhow::{Context, bail};
use backtester::{SignalBacktest, TradeBacktest};
use chrono::{Datelike, NaiveDate};
use clap::{Args, Parser, Subcommand};
use configuration::{BaselineRule, CloseMode, Config, DetectorParams, SimulatorParams};
use core_types::SpreadSeries;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use itertools::Itertools;
use market_data::{DataError, MonthlyMerge};
use rayon::prelude::*;
use std::path::PathBuf;

mod tables;

/// The main entry point for the spread lab.
fn main() -> anyhow::Result<()> {
    // An .env file is optional; it only carries RUST_LOG and SPREADLAB_* overrides.
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    let mut config = configuration::load_config(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    let _log_guard = configuration::init_logging(&config.logging).context("Failed to initialise logging")?;

    // Execute the appropriate command
    match cli.command {
        Commands::Merge(args) => {
            args.pair.apply(&mut config);
            handle_merge(args, &config)
        }
        Commands::Spread(args) => {
            args.pair.apply(&mut config);
            handle_spread(args, &config)
        }
        Commands::Detect(args) => {
            args.pair.apply(&mut config);
            handle_detect(args, &config)
        }
        Commands::Simulate(args) => {
            args.pair.apply(&mut config);
            handle_simulate(args, &config)
        }
        Commands::Stats(args) => {
            args.pair.apply(&mut config);
            handle_stats(args, &config)
        }
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Spot/future spread analysis: merge prices, compute spreads, detect
/// threshold excursions and simulate the reversal strategy.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file. Missing files fall back to defaults.
    #[arg(long, global = true, default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge monthly spot and future price files on timestamp.
    Merge(MergeArgs),
    /// Compute the spread series from the merged files.
    Spread(SpreadArgs),
    /// Detect signal intervals for every window/threshold combination.
    Detect(DetectArgs),
    /// Simulate the long/short reversal strategy for every mean/threshold combination.
    Simulate(SimulateArgs),
    /// Summarise a spread file, or the durations of a signal interval file.
    Stats(StatsArgs),
}

/// Instrument overrides shared by every command.
#[derive(Args)]
struct PairArgs {
    /// Spot instrument name (e.g., "BTCUSDT").
    #[arg(long)]
    spot: Option<String>,

    /// Future instrument name (e.g., "BTCUSDT_PERP").
    #[arg(long)]
    future: Option<String>,
}

impl PairArgs {
    fn apply(&self, config: &mut Config) {
        if let Some(spot) = &self.spot {
            config.data.spot = spot.clone();
        }
        if let Some(future) = &self.future {
            config.data.future = future.clone();
        }
    }
}

#[derive(Args)]
struct MergeArgs {
    #[command(flatten)]
    pair: PairArgs,

    /// First month to merge (format: YYYY-MM).
    #[arg(long, value_parser = parse_month)]
    from: NaiveDate,

    /// Last month to merge, inclusive (format: YYYY-MM).
    #[arg(long, value_parser = parse_month)]
    to: NaiveDate,
}

#[derive(Args)]
struct SpreadArgs {
    #[command(flatten)]
    pair: PairArgs,

    /// Print the spread summary as JSON instead of a table.
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct DetectArgs {
    #[command(flatten)]
    pair: PairArgs,

    /// Rolling mean windows to evaluate (e.g., "30,60,120"). Defaults to the configured one.
    #[arg(long, value_delimiter = ',')]
    windows: Vec<usize>,

    /// Band half-widths to evaluate (e.g., "0.0005,0.001"). Defaults to the configured one.
    #[arg(long, value_delimiter = ',')]
    thresholds: Vec<f64>,

    #[arg(long, value_enum)]
    close_mode: Option<CloseMode>,

    #[arg(long, value_enum)]
    baseline: Option<BaselineRule>,

    /// Print the metrics as JSON instead of a table.
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct SimulateArgs {
    #[command(flatten)]
    pair: PairArgs,

    /// Baseline lengths to evaluate (e.g., "60,180"). Defaults to the configured one.
    #[arg(long, value_delimiter = ',')]
    mean_n: Vec<usize>,

    /// Band half-widths to evaluate. Defaults to the configured one.
    #[arg(long, value_delimiter = ',')]
    thresholds: Vec<f64>,

    /// Observations at or below this index are ignored.
    #[arg(long)]
    warmup_ticks: Option<usize>,

    /// Print the metrics as JSON instead of a table.
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct StatsArgs {
    #[command(flatten)]
    pair: PairArgs,

    /// A `signal_durations_*.csv` file to summarise instead of the spread file.
    #[arg(long)]
    signals: Option<PathBuf>,

    /// Print as JSON instead of a table.
    #[arg(long)]
    json: bool,
}

fn parse_month(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(&format!("{raw}-01"), "%Y-%m-%d")
        .map_err(|_| format!("'{raw}' is not a month in YYYY-MM format"))
}

// ==============================================================================
// Merge & Spread Commands
// ==============================================================================

/// Merges every month between `from` and `to`. Months with a missing input
/// file are skipped with a warning; any other failure aborts.
fn handle_merge(args: MergeArgs, config: &Config) -> anyhow::Result<()> {
    if args.from > args.to {
        bail!("--from {} is after --to {}", args.from.format("%Y-%m"), args.to.format("%Y-%m"));
    }

    let job = MonthlyMerge {
        spot_dir: config.data.spot_dir.clone(),
        future_dir: config.data.future_dir.clone(),
        merged_dir: config.data.merged_dir.clone(),
        spot: config.data.spot.clone(),
        future: config.data.future.clone(),
    };

    let months = monthly_range(args.from, args.to);
    let progress_bar = ProgressBar::new(months.len() as u64);
    progress_bar.set_style(progress_style()?);

    let mut merged = 0;
    for (year, month) in months {
        progress_bar.set_message(format!("{year}-{month:02}"));
        match job.merge(year, month) {
            Ok(_) => merged += 1,
            Err(DataError::MissingFile(path)) => {
                tracing::warn!(path = %path.display(), "input file missing; month skipped");
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to merge {year}-{month:02}"));
            }
        }
        progress_bar.inc(1);
    }
    progress_bar.finish_with_message("merge complete");

    println!("Merged {merged} month(s) into {}", config.data.merged_dir.display());
    Ok(())
}

/// Every `(year, month)` from `from` to `to`, both included.
fn monthly_range(from: NaiveDate, to: NaiveDate) -> Vec<(i32, u32)> {
    let mut months = Vec::new();
    let (mut year, mut month) = (from.year(), from.month());
    while (year, month) <= (to.year(), to.month()) {
        months.push((year, month));
        (year, month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    }
    months
}

fn handle_spread(args: SpreadArgs, config: &Config) -> anyhow::Result<()> {
    let data = &config.data;
    let series = market_data::calculate_spreads(&data.merged_dir, &data.spot, &data.future)
        .context("Failed to calculate spreads")?;

    let path = spread_path(config);
    market_data::write_spread_csv(&path, &series)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    let summary = AnalyticsEngine::new().spread_summary(&series.spreads())?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("Saved {} spreads to {}", series.len(), path.display());
        if let (Some(first), Some(last)) = (series.first(), series.last()) {
            println!("Covering {} to {}", first.timestamp, last.timestamp);
        }
        println!("{}", tables::spread_summary_table(&summary));
    }
    Ok(())
}

fn spread_path(config: &Config) -> PathBuf {
    config
        .data
        .spread_dir
        .join(market_data::spread_file_name(&config.data.spot, &config.data.future))
}

fn load_series(config: &Config) -> anyhow::Result<SpreadSeries> {
    let path = spread_path(config);
    market_data::read_spread_csv(&path).with_context(|| format!("Failed to load spreads from {}", path.display()))
}

// ==============================================================================
// Detect & Simulate Commands
// ==============================================================================

fn progress_style() -> anyhow::Result<ProgressStyle> {
    Ok(ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")?
        .progress_chars("=>-"))
}

/// Adds one bar per job to `multi`, labelled with `label`.
fn job_bar(multi: &MultiProgress, len: usize, label: String) -> anyhow::Result<ProgressBar> {
    let bar = multi.add(ProgressBar::new(len as u64));
    bar.set_style(progress_style()?);
    bar.set_message(label);
    Ok(bar)
}

fn or_default<T: Copy>(values: Vec<T>, default: T) -> Vec<T> {
    if values.is_empty() { vec![default] } else { values }
}

fn handle_detect(args: DetectArgs, config: &Config) -> anyhow::Result<()> {
    let base = DetectorParams {
        close_mode: args.close_mode.unwrap_or(config.detector.close_mode),
        baseline: args.baseline.unwrap_or(config.detector.baseline),
        ..config.detector.clone()
    };
    let windows = or_default(args.windows, base.rolling_mean_window);
    let thresholds = or_default(args.thresholds, base.threshold);
    let split_by_threshold = thresholds.len() > 1;

    let series = load_series(config)?;
    let jobs: Vec<(usize, f64)> = windows.into_iter().cartesian_product(thresholds).collect();
    tracing::info!(jobs = jobs.len(), records = series.len(), "starting signal detection");

    let multi = MultiProgress::new();
    let report_every = config.progress.report_every;

    let metrics = jobs
        .par_iter()
        .map(|&(window, threshold)| -> anyhow::Result<SignalMetrics> {
            let params = DetectorParams {
                rolling_mean_window: window,
                threshold,
                ..base.clone()
            };
            let backtest = SignalBacktest::new(params, report_every)?;

            let bar = job_bar(&multi, series.len(), format!("window {window}, threshold {threshold}"))?;
            let mut on_progress = |processed: usize, _total: usize| bar.set_position(processed as u64);
            let run = backtest.run(&series, Some(&mut on_progress))?;
            bar.finish();

            let output_dir = if split_by_threshold {
                config.data.output_dir.join(format!("threshold_{threshold}"))
            } else {
                config.data.output_dir.clone()
            };
            market_data::write_signal_intervals(&output_dir, window, &run.intervals)
                .with_context(|| format!("Failed to save intervals for window {window}"))?;
            Ok(run.metrics)
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&metrics)?);
    } else {
        println!("{}", tables::signal_metrics_table(&metrics));
    }
    Ok(())
}

fn handle_simulate(args: SimulateArgs, config: &Config) -> anyhow::Result<()> {
    let base = SimulatorParams {
        warmup_ticks: args.warmup_ticks.unwrap_or(config.simulator.warmup_ticks),
        ..config.simulator.clone()
    };
    let mean_override = !args.mean_n.is_empty();
    let mean_ns = or_default(args.mean_n, base.mean_n);
    let thresholds = or_default(args.thresholds, base.threshold);

    let series = load_series(config)?;
    let jobs: Vec<(usize, f64)> = mean_ns.into_iter().cartesian_product(thresholds).collect();
    tracing::info!(jobs = jobs.len(), records = series.len(), "starting trade simulation");

    let multi = MultiProgress::new();
    let report_every = config.progress.report_every;

    let metrics = jobs
        .par_iter()
        .map(|&(mean_n, threshold)| -> anyhow::Result<TradeMetrics> {
            let params = SimulatorParams {
                mean_n,
                threshold,
                // A swept baseline length is what the reported window should show.
                rolling_mean_window: if mean_override { mean_n } else { base.rolling_mean_window },
                ..base.clone()
            };
            let backtest = TradeBacktest::new(params, report_every)?;

            let bar = job_bar(&multi, series.len(), format!("mean_n {mean_n}, threshold {threshold}"))?;
            let mut on_progress = |processed: usize, _total: usize| bar.set_position(processed as u64);
            let run = backtest.run(&series, Some(&mut on_progress))?;
            bar.finish_with_message(format!("{} trades", run.trades.len()));
            Ok(run.metrics)
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&metrics)?);
    } else {
        println!("{}", tables::trade_metrics_table(&metrics));
    }
    Ok(())
}

// ==============================================================================
// Stats Command
// ==============================================================================

fn handle_stats(args: StatsArgs, config: &Config) -> anyhow::Result<()> {
    let engine = AnalyticsEngine::new();

    match args.signals {
        Some(path) => {
            let intervals = market_data::read_signal_intervals(&path)
                .with_context(|| format!("Failed to read intervals from {}", path.display()))?;
            let summary = engine.interval_summary(&intervals)?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("{}", tables::interval_summary_table(&summary));
            }
        }
        None => {
            let series = load_series(config)?;
            let summary = engine.spread_summary(&series.spreads())?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("{}", tables::spread_summary_table(&summary));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_range_crosses_year_end() {
        let from = parse_month("2023-11").unwrap();
        let to = parse_month("2024-02").unwrap();
        assert_eq!(
            monthly_range(from, to),
            vec![(2023, 11), (2023, 12), (2024, 1), (2024, 2)]
        );
    }

    #[test]
    fn bad_month_is_rejected() {
        assert!(parse_month("2024-13").is_err());
        assert!(parse_month("january").is_err());
    }

    #[test]
    fn comma_separated_sweeps_parse() {
        let cli = Cli::try_parse_from([
            "spread-lab",
            "detect",
            "--windows",
            "30,60",
            "--thresholds",
            "0.0005,0.001",
            "--close-mode",
            "back-inside",
        ])
        .unwrap();
        match cli.command {
            Commands::Detect(args) => {
                assert_eq!(args.windows, vec![30, 60]);
                assert_eq!(args.thresholds, vec![0.0005, 0.001]);
                assert_eq!(args.close_mode, Some(CloseMode::BackInside));
            }
            _ => panic!("expected detect"),
        }
    }
}
