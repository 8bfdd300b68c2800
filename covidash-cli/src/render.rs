//! Text, CSV and JSON rendering for the CLI views.

use anyhow::{Context, Result};
use clap::ValueEnum;
use covidash_core::data::{SnapshotRecord, SummaryMetric, Table, TrendPoint};
use covidash_core::quality::MissingReport;
use covidash_core::{Selection, Totals};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Csv,
    Json,
}

/// Width of the longest bar in the deaths chart.
const BAR_WIDTH: usize = 40;

/// Snapshot columns shown in the latest-snapshot table.
const SNAPSHOT_METRICS: [SummaryMetric; 5] = [
    SummaryMetric::TotalCases,
    SummaryMetric::TotalDeaths,
    SummaryMetric::TotalRecovered,
    SummaryMetric::ActiveCases,
    SummaryMetric::Population,
];

/// Whole-number count with thousands separators; blank cells render as `-`.
pub fn format_count(value: Option<f64>) -> String {
    let Some(v) = value else {
        return "-".to_string();
    };
    let rounded = v.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0.0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn finish_csv(wtr: csv::Writer<Vec<u8>>) -> Result<String> {
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("failed to serialize JSON output")
}

// ─── Entities ───────────────────────────────────────────────────────

pub fn entities(names: &[String], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Table => {
            let mut out = format!("{}\n", Selection::GLOBAL_LABEL);
            for name in names {
                out.push_str(name);
                out.push('\n');
            }
            Ok(out)
        }
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(vec![]);
            wtr.write_record(["entity"])?;
            for name in names {
                wtr.write_record([name])?;
            }
            finish_csv(wtr)
        }
        OutputFormat::Json => to_json(names),
    }
}

// ─── Trend ──────────────────────────────────────────────────────────

pub fn trend(selection: &Selection, series: &Table<TrendPoint>, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Table => {
            let mut out = format!("=== Trend: {selection} ===\n");
            out.push_str(&format!(
                "{:<12} {:>14} {:>12} {:>14} {:>14}\n",
                "Date", "Confirmed", "Deaths", "Recovered", "Active"
            ));
            for p in series {
                out.push_str(&format!(
                    "{:<12} {:>14} {:>12} {:>14} {:>14}\n",
                    p.date,
                    format_count(Some(p.confirmed)),
                    format_count(Some(p.deaths)),
                    format_count(Some(p.recovered)),
                    format_count(Some(p.active)),
                ));
            }
            Ok(out)
        }
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(vec![]);
            wtr.write_record(TrendPoint::COLUMNS)?;
            for p in series {
                wtr.write_record([
                    &p.date.to_string(),
                    &p.confirmed.to_string(),
                    &p.deaths.to_string(),
                    &p.recovered.to_string(),
                    &p.active.to_string(),
                ])?;
            }
            finish_csv(wtr)
        }
        OutputFormat::Json => to_json(series.rows()),
    }
}

// ─── Snapshot ───────────────────────────────────────────────────────

pub fn snapshot(
    metric: SummaryMetric,
    ranked: &Table<SnapshotRecord>,
    format: OutputFormat,
) -> Result<String> {
    match format {
        OutputFormat::Table => {
            let mut out = format!("=== Latest snapshot: top {} by {} ===\n", ranked.len(), metric.header());
            out.push_str(&format!("{:<4} {:<24}", "#", "Country/Region"));
            for m in SNAPSHOT_METRICS {
                out.push_str(&format!(" {:>15}", m.header()));
            }
            out.push('\n');
            for (i, rec) in ranked.iter().enumerate() {
                out.push_str(&format!("{:<4} {:<24}", i + 1, rec.entity));
                for m in SNAPSHOT_METRICS {
                    out.push_str(&format!(" {:>15}", format_count(rec.metric(m))));
                }
                out.push('\n');
            }
            Ok(out)
        }
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(vec![]);
            let mut header = vec!["entity"];
            header.extend(SNAPSHOT_METRICS.iter().map(|m| m.column()));
            wtr.write_record(&header)?;
            for rec in ranked {
                let mut row = vec![rec.entity.clone()];
                row.extend(SNAPSHOT_METRICS.iter().map(|m| cell(rec.metric(*m))));
                wtr.write_record(&row)?;
            }
            finish_csv(wtr)
        }
        OutputFormat::Json => to_json(ranked.rows()),
    }
}

// ─── Deaths chart ───────────────────────────────────────────────────

/// Horizontal bar chart, largest first.
pub fn deaths_chart(ranked: &Table<SnapshotRecord>, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Table => {
            let max = ranked
                .iter()
                .filter_map(|r| r.total_deaths)
                .fold(0.0_f64, f64::max);
            let label_width = ranked
                .iter()
                .map(|r| r.entity.chars().count())
                .max()
                .unwrap_or(0);

            let mut out = format!("=== Top {} countries by total deaths ===\n", ranked.len());
            for rec in ranked {
                let deaths = rec.total_deaths.unwrap_or(0.0);
                let len = if max > 0.0 {
                    ((deaths / max) * BAR_WIDTH as f64).round() as usize
                } else {
                    0
                };
                out.push_str(&format!(
                    "{:<label_width$} | {:<BAR_WIDTH$} {}\n",
                    rec.entity,
                    "█".repeat(len),
                    format_count(rec.total_deaths),
                ));
            }
            Ok(out)
        }
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(vec![]);
            wtr.write_record(["entity", "total_deaths"])?;
            for rec in ranked {
                wtr.write_record([rec.entity.clone(), cell(rec.total_deaths)])?;
            }
            finish_csv(wtr)
        }
        OutputFormat::Json => to_json(ranked.rows()),
    }
}

// ─── Metric cards ───────────────────────────────────────────────────

pub fn totals(selection: &Selection, totals: &Totals, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(format!(
            "=== {selection} ===\nTotal Cases:     {}\nTotal Deaths:    {}\nTotal Recovered: {}\n",
            format_count(totals.total_cases),
            format_count(totals.total_deaths),
            format_count(totals.total_recovered),
        )),
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(vec![]);
            wtr.write_record(["selection", "total_cases", "total_deaths", "total_recovered"])?;
            wtr.write_record([
                selection.to_string(),
                cell(totals.total_cases),
                cell(totals.total_deaths),
                cell(totals.total_recovered),
            ])?;
            finish_csv(wtr)
        }
        OutputFormat::Json => to_json(totals),
    }
}

// ─── Missing values ─────────────────────────────────────────────────

pub fn missing(reports: &[MissingReport], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Table => {
            let mut out = String::new();
            for report in reports {
                out.push_str(&format!(
                    "=== {} ({} rows, {} blank cells) ===\n",
                    report.table.label(),
                    report.rows,
                    report.total_missing()
                ));
                for col in &report.columns {
                    out.push_str(&format!("{:<24} {:>8}\n", col.column, col.missing));
                }
                out.push('\n');
            }
            Ok(out)
        }
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(vec![]);
            wtr.write_record(["table", "column", "missing"])?;
            for report in reports {
                for col in &report.columns {
                    wtr.write_record([
                        report.table.label(),
                        col.column.as_str(),
                        col.missing.to_string().as_str(),
                    ])?;
                }
            }
            finish_csv(wtr)
        }
        OutputFormat::Json => to_json(reports),
    }
}
