//! StratLab CLI — explore windowed gain distributions of investing strategies.
//!
//! Commands:
//! - `distribution` — gain distribution of one strategy, with summary and histogram
//! - `compare` — two strategies over the same windows
//! - `series` — the monthly prices inside the analysis interval
//! - `strategies` — list the configured strategies

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;
use stratlab_core::config::ProviderKind;
use stratlab_core::data::{CsvProvider, PriceProvider, SyntheticProvider, YahooProvider};
use stratlab_core::distribution::summary::DEFAULT_BINS;
use stratlab_core::distribution::{save_artifacts, Comparison, DistributionSummary, Histogram};
use stratlab_core::strategy::StrategyRegistry;
use stratlab_core::{AppConfig, DistributionOptions, GainDistribution, GainScale, InvestingSession};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "stratlab",
    about = "StratLab CLI — compare periodic-investing strategies over sliding windows"
)]
struct Cli {
    /// Path to a TOML config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Price provider: yahoo, csv or synthetic. Overrides the config file.
    #[arg(long, global = true)]
    provider: Option<ProviderKind>,

    /// Directory of <TICKER>.csv files for the csv provider.
    #[arg(long, global = true)]
    csv_dir: Option<PathBuf>,

    /// Log at debug level (RUST_LOG takes precedence).
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Gain distribution of one strategy.
    Distribution {
        #[command(flatten)]
        analysis: AnalysisArgs,

        /// Strategy name (see `stratlab strategies`).
        #[arg(long, default_value = "Lump sum")]
        strategy: String,

        /// Write the distribution as JSON and CSV into this directory.
        #[arg(long)]
        export: Option<PathBuf>,
    },
    /// Compare two strategies window by window.
    Compare {
        #[command(flatten)]
        analysis: AnalysisArgs,

        /// First strategy.
        #[arg(long, default_value = "Lump sum")]
        a: String,

        /// Second strategy.
        #[arg(long, default_value = "DCA")]
        b: String,
    },
    /// Print the monthly prices inside the interval.
    Series {
        #[command(flatten)]
        selection: SelectionArgs,
    },
    /// List the configured strategies.
    Strategies,
}

#[derive(Args)]
struct SelectionArgs {
    /// Ticker symbol.
    #[arg(long, default_value = "^GSPC")]
    ticker: String,

    /// First year of the interval (from Jan 1).
    #[arg(long, default_value_t = 1990)]
    from: i32,

    /// Last year of the interval (to Jan 1).
    #[arg(long, default_value_t = 2022)]
    to: i32,
}

#[derive(Args)]
struct AnalysisArgs {
    #[command(flatten)]
    selection: SelectionArgs,

    /// Window length in years.
    #[arg(long, default_value_t = 1)]
    years: u32,

    /// Report per-year gains instead of the total over the window.
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    yearly: bool,

    /// Report percent returns instead of ratios.
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    percent: bool,

    /// Histogram bin count.
    #[arg(long, default_value_t = DEFAULT_BINS)]
    bins: usize,
}

impl AnalysisArgs {
    fn options(&self) -> DistributionOptions {
        DistributionOptions {
            annualize: self.yearly,
            as_percentage: self.percent,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = match &cli.config {
        Some(path) => AppConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => AppConfig::default(),
    };
    if let Some(kind) = cli.provider {
        config.data.provider = kind;
    }
    if let Some(dir) = cli.csv_dir {
        config.data.csv_dir = dir;
    }
    let registry = config.registry()?;

    match cli.command {
        Commands::Distribution {
            analysis,
            strategy,
            export,
        } => run_distribution(&config, &registry, &analysis, &strategy, export),
        Commands::Compare { analysis, a, b } => run_compare(&config, &registry, &analysis, &a, &b),
        Commands::Series { selection } => run_series(&config, &selection),
        Commands::Strategies => {
            print_strategies(&registry);
            Ok(())
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "stratlab=debug" } else { "stratlab=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_provider(config: &AppConfig) -> Result<Box<dyn PriceProvider>> {
    Ok(match config.data.provider {
        ProviderKind::Yahoo => Box::new(
            YahooProvider::new(config.data.price_field).context("building Yahoo client")?,
        ),
        ProviderKind::Csv => Box::new(CsvProvider::new(&config.data.csv_dir)),
        ProviderKind::Synthetic => {
            Box::new(SyntheticProvider::new(chrono::Local::now().date_naive()))
        }
    })
}

fn open_session(config: &AppConfig, selection: &SelectionArgs) -> Result<InvestingSession> {
    let mut session = InvestingSession::new(build_provider(config)?, config.engine);
    info!(provider = session.provider_name(), ticker = %selection.ticker, "loading prices");
    session
        .set_ticker(&selection.ticker)
        .with_context(|| format!("loading {}", selection.ticker))?;
    session
        .set_interval(selection.from, selection.to)
        .with_context(|| format!("interval {}..{}", selection.from, selection.to))?;
    Ok(session)
}

fn run_distribution(
    config: &AppConfig,
    registry: &StrategyRegistry,
    analysis: &AnalysisArgs,
    strategy_name: &str,
    export: Option<PathBuf>,
) -> Result<()> {
    let entry = registry.get(strategy_name)?;
    let strategy = entry.kind.build(config.engine.dca_formula);
    let session = open_session(config, &analysis.selection)?;

    let dist = session.calculate_distribution(strategy.as_ref(), analysis.years, analysis.options())?;
    if dist.is_empty() {
        bail!(
            "no {}-year window fits in {}..{}",
            analysis.years,
            analysis.selection.from,
            analysis.selection.to
        );
    }

    print_summary(&entry.name, &dist);
    println!();
    print_histogram(&Histogram::of(&dist, analysis.bins), dist.scale());

    if let Some(dir) = export {
        let stem = save_artifacts(&dist, &dir)
            .with_context(|| format!("exporting to {}", dir.display()))?;
        println!("Artifacts saved to: {}.{{json,csv}}", stem.display());
    }
    Ok(())
}

fn run_compare(
    config: &AppConfig,
    registry: &StrategyRegistry,
    analysis: &AnalysisArgs,
    a: &str,
    b: &str,
) -> Result<()> {
    let strategy_a = registry.build(a, config.engine.dca_formula)?;
    let strategy_b = registry.build(b, config.engine.dca_formula)?;
    let session = open_session(config, &analysis.selection)?;

    let comparison = session.compare_strategies(
        strategy_a.as_ref(),
        strategy_b.as_ref(),
        analysis.years,
        analysis.options(),
    )?;

    for (name, summary) in [(a, &comparison.summary_a), (b, &comparison.summary_b)] {
        println!("=== {} on {} ===", registry.get(name)?.name, analysis.selection.ticker);
        print_stats(summary);
        println!();
    }
    print_comparison(&comparison, analysis.bins);
    Ok(())
}

fn run_series(config: &AppConfig, selection: &SelectionArgs) -> Result<()> {
    let session = open_session(config, selection)?;
    let full = session.get_timeseries()?;
    let selected = session.selected_timeseries()?;

    println!(
        "{}: {} months loaded ({} to {})",
        selection.ticker,
        full.len(),
        format_date(full.first_date()),
        format_date(full.last_date()),
    );
    println!("Selected {}..{}: {} months", selection.from, selection.to, selected.len());
    println!();
    println!("{:<12} {:>14}", "Date", "Price");
    println!("{}", "-".repeat(27));
    for (date, price) in selected.iter() {
        println!("{:<12} {:>14.4}", date, price);
    }
    Ok(())
}

fn print_strategies(registry: &StrategyRegistry) {
    println!("{:<16} {:<26} {:<8} Description", "Name", "Kind", "Color");
    println!("{}", "-".repeat(80));
    for entry in registry.entries() {
        println!(
            "{:<16} {:<26} {:<8} {}",
            entry.name,
            entry.kind.as_str(),
            entry.color,
            entry.description
        );
    }
}

fn print_summary(label: &str, dist: &GainDistribution) {
    let view = match (dist.options.annualize, dist.options.as_percentage) {
        (true, true) => "yearly %",
        (false, true) => "total %",
        (true, false) => "yearly ratio",
        (false, false) => "total ratio",
    };

    println!("=== {label} on {} ===", dist.ticker);
    println!("Window:        {} year(s), {view}", dist.window_years);
    println!(
        "Engine:        {:?} boundary, {:?} DCA, step {}m, buy every {}m",
        dist.engine.window_boundary,
        dist.engine.dca_formula,
        dist.engine.step_months,
        dist.engine.buy_period_months
    );
    print_stats(&dist.summary());
}

fn print_stats(summary: &DistributionSummary) {
    println!("Windows:       {}", summary.windows);
    println!("Failed:        {}", summary.failed);
    match &summary.stats {
        Some(stats) => {
            let unit = unit(summary.scale);
            println!("Mean:          {:.2}{unit}", stats.mean);
            println!("Median:        {:.2}{unit}", stats.median);
            println!("Std dev:       {:.2}{unit}", stats.std_dev);
            println!("Min / Max:     {:.2}{unit} / {:.2}{unit}", stats.min, stats.max);
            println!("Win rate:      {:.1}%", stats.win_rate * 100.0);
        }
        None => println!("(no window produced a gain)"),
    }
}

fn print_histogram(hist: &Histogram, scale: GainScale) {
    const WIDTH: usize = 40;
    let unit = unit(scale);
    let peak = hist.bins.iter().map(|b| b.count).max().unwrap_or(0).max(1);
    for bin in &hist.bins {
        let bar = bin.count * WIDTH / peak;
        let winning = if bin.count == 0 {
            0
        } else {
            bar * bin.above_break_even / bin.count
        };
        println!(
            "{:>9.2}{unit} .. {:>9.2}{unit} |{}{} {}",
            bin.lower,
            bin.upper,
            "#".repeat(winning),
            "-".repeat(bar - winning),
            bin.count
        );
    }
    if hist.excluded > 0 {
        println!("({} values outside range)", hist.excluded);
    }
}

fn print_comparison(comparison: &Comparison, bins: usize) {
    println!(
        "=== {} vs {} ({} paired windows) ===",
        comparison.strategy_a,
        comparison.strategy_b,
        comparison.pairs.len()
    );
    let unit = unit(comparison.scale);
    if let Some(share) = comparison.b_better_share() {
        println!(
            "{} beats {} in {:.1}% of windows",
            comparison.strategy_b,
            comparison.strategy_a,
            share * 100.0
        );
    }
    if let Some(diff) = comparison.mean_difference() {
        println!("Mean difference (b - a): {diff:+.2}{unit}");
    }

    let (hist_a, hist_b) = comparison.histograms(bins);
    println!();
    println!("{:>25}  {:>8} {:>8}", "Bin", "a", "b");
    for (bin_a, bin_b) in hist_a.bins.iter().zip(&hist_b.bins) {
        println!(
            "{:>10.2}{unit} .. {:>9.2}{unit}  {:>8} {:>8}",
            bin_a.lower, bin_a.upper, bin_a.count, bin_b.count
        );
    }
}

fn unit(scale: GainScale) -> &'static str {
    match scale {
        GainScale::Percentage => "%",
        GainScale::Ratio => "x",
    }
}

fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.to_string()).unwrap_or_else(|| "-".into())
}
