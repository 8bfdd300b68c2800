//! covidash CLI: the dashboard views in the terminal.
//!
//! Commands:
//! - `entities`: countries available in the picker
//! - `trend`: confirmed/deaths/recovered/active over time
//! - `snapshot`: latest snapshot table ranked by a metric
//! - `deaths`: top countries by total deaths as a bar chart
//! - `totals`: metric cards for the current selection
//! - `missing`: blank-cell counts per column of both raw tables

mod render;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use covidash_core::data::{Dataset, Loader, SourceConfig, SummaryMetric, TableKind};
use covidash_core::quality::MissingReport;
use covidash_core::views::{self, Selection, ViewError};
use covidash_core::DashboardConfig;
use render::OutputFormat;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "covidash", about = "covidash CLI: COVID-19 dashboard views")]
struct Cli {
    /// Dashboard config file (TOML). Defaults to the published spreadsheets.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Read both tables from this directory instead of the configured source.
    #[arg(long, global = true)]
    local_dir: Option<PathBuf>,

    /// Output format.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the countries of the time-series table.
    Entities,

    /// Trend series for one country, or the global aggregate.
    Trend {
        /// Country name as published, or `Global` / `ALL`.
        #[arg(long, default_value = Selection::GLOBAL_LABEL)]
        country: String,
    },

    /// Latest snapshot ranked by a metric.
    Snapshot {
        /// Number of rows. Defaults to the configured snapshot size.
        #[arg(long)]
        top: Option<usize>,

        /// Ranking metric, by column name or published header.
        #[arg(long, default_value = "total_cases")]
        by: String,
    },

    /// Countries with the most deaths.
    Deaths {
        /// Number of bars. Defaults to the configured chart size.
        #[arg(long)]
        top: Option<usize>,
    },

    /// Total cases, deaths and recoveries.
    Totals {
        /// Country name as published, or `Global` / `ALL`.
        #[arg(long, default_value = Selection::GLOBAL_LABEL)]
        country: String,
    },

    /// Blank-cell counts per column of both raw tables.
    Missing,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = resolve_config(cli.config.as_deref(), cli.local_dir)?;
    let format = cli.format;

    let output = match cli.command {
        Commands::Entities => {
            let dataset = load_dataset(&config)?;
            render::entities(&views::entities(&dataset.primary), format)
        }
        Commands::Trend { country } => run_trend(&config, &country, format),
        Commands::Snapshot { top, by } => run_snapshot(&config, top, &by, format),
        Commands::Deaths { top } => {
            let dataset = load_dataset(&config)?;
            let top_n = top.unwrap_or(config.views.deaths_top_n);
            let ranked = views::top_deaths(&dataset.summary, top_n)?;
            render::deaths_chart(&ranked, format)
        }
        Commands::Totals { country } => run_totals(&config, &country, format),
        Commands::Missing => run_missing(&config, format),
    }?;
    print!("{output}");
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn resolve_config(path: Option<&Path>, local_dir: Option<PathBuf>) -> Result<DashboardConfig> {
    let mut config = match path {
        Some(path) => DashboardConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => DashboardConfig::default(),
    };
    if let Some(dir) = local_dir {
        config.source = SourceConfig::local(dir);
    }
    debug!(source = ?config.source, "resolved dashboard config");
    Ok(config)
}

fn load_dataset(config: &DashboardConfig) -> Result<Arc<Dataset>> {
    let loader = Loader::new(&config.load_options());
    loader
        .load(&config.source)
        .context("failed to load dashboard data")
}

fn run_trend(config: &DashboardConfig, country: &str, format: OutputFormat) -> Result<String> {
    let selection: Selection = country.parse()?;
    let dataset = load_dataset(config)?;
    let series = views::trend(&dataset.primary, &selection)?;
    render::trend(&selection, &series, format)
}

fn run_snapshot(
    config: &DashboardConfig,
    top: Option<usize>,
    by: &str,
    format: OutputFormat,
) -> Result<String> {
    let metric: SummaryMetric = by
        .parse()
        .map_err(|metric| ViewError::UnknownMetric { metric })?;
    let dataset = load_dataset(config)?;
    let top_n = top.unwrap_or(config.views.snapshot_top_n);
    let ranked = views::rank_by(&dataset.summary, metric, top_n)?;
    render::snapshot(metric, &ranked, format)
}

fn run_totals(config: &DashboardConfig, country: &str, format: OutputFormat) -> Result<String> {
    let selection: Selection = country.parse()?;
    let dataset = load_dataset(config)?;
    let totals = views::totals(&dataset.summary, &selection)?;
    render::totals(&selection, &totals, format)
}

/// The report reads the raw tables, so it fetches without the typed loader.
fn run_missing(config: &DashboardConfig, format: OutputFormat) -> Result<String> {
    let source = config.source.open(config.load_options().timeout)?;
    let mut reports = Vec::with_capacity(2);
    for kind in [TableKind::Primary, TableKind::Summary] {
        let raw = source.fetch(kind)?;
        reports.push(MissingReport::from_raw(&raw)?);
    }
    render::missing(&reports, format)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "covidash", "snapshot", "--top", "5", "--by", "TotalDeaths", "--format", "csv",
            "--local-dir", "/data",
        ])
        .unwrap();
        assert_eq!(cli.format, OutputFormat::Csv);
        assert_eq!(cli.local_dir, Some(PathBuf::from("/data")));
        match cli.command {
            Commands::Snapshot { top, by } => {
                assert_eq!(top, Some(5));
                assert_eq!(by, "TotalDeaths");
            }
            _ => panic!("expected snapshot"),
        }
    }

    #[test]
    fn country_defaults_to_global() {
        let cli = Cli::try_parse_from(["covidash", "totals"]).unwrap();
        match cli.command {
            Commands::Totals { country } => {
                assert_eq!(country.parse::<Selection>(), Ok(Selection::All));
            }
            _ => panic!("expected totals"),
        }
    }

    #[test]
    fn local_dir_overrides_configured_source() {
        let config = resolve_config(None, Some(PathBuf::from("/srv/covid"))).unwrap();
        assert_eq!(config.source, SourceConfig::local("/srv/covid"));
    }
}
