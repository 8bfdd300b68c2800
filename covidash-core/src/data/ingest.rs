//! Ingest pipeline: raw delimited text → typed, schema-checked tables.
//!
//! Steps per table:
//! 1. Resolve the header row against the table schema (fails eagerly with
//!    `SchemaMismatch`)
//! 2. Parse every record into its typed row, trimming cells
//! 3. Reject unparseable cells with `MalformedRecord` (no silent defaults)

use super::provider::{DataError, RawTable, TableKind};
use super::records::{CaseRecord, SnapshotRecord};
use super::schema::{ColumnIndex, TableSchema};
use super::table::Table;
use chrono::NaiveDate;
use csv::StringRecord;

/// Date layouts seen in the published exports.
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%m/%d/%y"];

/// Parse the time-series table.
pub fn ingest_primary(raw: &RawTable) -> Result<Table<CaseRecord>, DataError> {
    ingest(raw, TableKind::Primary, |cells| {
        Ok(CaseRecord {
            entity: cells.required_text("entity")?,
            province: cells.text("province"),
            date: cells.date("date")?,
            confirmed: cells.required_number("confirmed")?,
            deaths: cells.required_number("deaths")?,
            recovered: cells.required_number("recovered")?,
            active: cells.required_number("active")?,
            who_region: cells.text("who_region"),
        })
    })
}

/// Parse the snapshot table.
pub fn ingest_summary(raw: &RawTable) -> Result<Table<SnapshotRecord>, DataError> {
    ingest(raw, TableKind::Summary, |cells| {
        Ok(SnapshotRecord {
            entity: cells.required_text("entity")?,
            continent: cells.text("continent"),
            population: cells.number("population")?,
            total_cases: cells.number("total_cases")?,
            new_cases: cells.number("new_cases")?,
            total_deaths: cells.number("total_deaths")?,
            new_deaths: cells.number("new_deaths")?,
            total_recovered: cells.number("total_recovered")?,
            active_cases: cells.number("active_cases")?,
            serious_critical: cells.number("serious_critical")?,
            total_tests: cells.number("total_tests")?,
            who_region: cells.text("who_region"),
        })
    })
}

fn ingest<R>(
    raw: &RawTable,
    kind: TableKind,
    build: impl Fn(&Cells<'_>) -> Result<R, String>,
) -> Result<Table<R>, DataError> {
    let schema = TableSchema::for_kind(kind);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(raw.text.as_bytes());

    let headers = reader.headers().map_err(|e| DataError::MalformedRecord {
        table: kind,
        line: 1,
        reason: format!("header row: {e}"),
    })?;
    let index = schema.resolve(headers)?;

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| DataError::MalformedRecord {
            table: kind,
            line: e.position().map(|p| p.line()).unwrap_or(0),
            reason: e.to_string(),
        })?;

        // Fully blank lines carry no data.
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }

        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let cells = Cells {
            record: &record,
            index: &index,
        };
        let row = build(&cells).map_err(|reason| DataError::MalformedRecord {
            table: kind,
            line,
            reason,
        })?;
        rows.push(row);
    }

    Ok(Table::new(index.present(), rows))
}

/// One record viewed through the resolved column index.
struct Cells<'a> {
    record: &'a StringRecord,
    index: &'a ColumnIndex,
}

impl Cells<'_> {
    /// Trimmed cell content; `None` when the column is absent or the cell is blank.
    fn raw(&self, column: &str) -> Option<&str> {
        self.index
            .position(column)
            .and_then(|pos| self.record.get(pos))
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    fn text(&self, column: &str) -> Option<String> {
        self.raw(column).map(str::to_string)
    }

    fn required_text(&self, column: &str) -> Result<String, String> {
        self.text(column)
            .ok_or_else(|| format!("blank value in required column '{column}'"))
    }

    fn number(&self, column: &str) -> Result<Option<f64>, String> {
        match self.raw(column) {
            None => Ok(None),
            Some(cell) => parse_number(cell)
                .map_err(|e| format!("column '{column}': {e}")),
        }
    }

    fn required_number(&self, column: &str) -> Result<f64, String> {
        self.number(column)?
            .ok_or_else(|| format!("blank value in required column '{column}'"))
    }

    fn date(&self, column: &str) -> Result<NaiveDate, String> {
        let cell = self
            .raw(column)
            .ok_or_else(|| format!("blank value in required column '{column}'"))?;
        parse_date(cell).ok_or_else(|| format!("column '{column}': unrecognised date '{cell}'"))
    }
}

/// Parse a numeric cell.
///
/// Commas are accepted only as thousands separators (`1,234,567`). `NaN`
/// reads as blank; infinities are rejected. Negative values are kept, since
/// published deltas and active counts carry corrections.
pub fn parse_number(cell: &str) -> Result<Option<f64>, String> {
    let cleaned = strip_grouping(cell)
        .ok_or_else(|| format!("misplaced thousands separator in '{cell}'"))?;
    let value: f64 = cleaned
        .parse()
        .map_err(|_| format!("not a number: '{cell}'"))?;
    if value.is_nan() {
        return Ok(None);
    }
    if value.is_infinite() {
        return Err(format!("not a finite number: '{cell}'"));
    }
    Ok(Some(value))
}

/// Remove thousands separators, or `None` when a comma does not sit between
/// complete three-digit groups of the integer part.
fn strip_grouping(cell: &str) -> Option<String> {
    if !cell.contains(',') {
        return Some(cell.to_string());
    }
    let unsigned = cell.strip_prefix(['+', '-']).unwrap_or(cell);
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((int_part, frac)) => (int_part, Some(frac)),
        None => (unsigned, None),
    };
    if frac_part.is_some_and(|f| f.contains(',')) {
        return None;
    }

    let mut groups = int_part.split(',');
    let lead = groups.next()?;
    let is_digits = |g: &str| g.bytes().all(|b| b.is_ascii_digit());
    if lead.is_empty() || lead.len() > 3 || !is_digits(lead) {
        return None;
    }
    if !groups.all(|g| g.len() == 3 && is_digits(g)) {
        return None;
    }
    Some(cell.replace(',', ""))
}

pub fn parse_date(cell: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(cell, fmt).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::provider::DataOrigin;

    fn raw(kind: TableKind, text: &str) -> RawTable {
        RawTable {
            kind,
            origin: DataOrigin::InMemory,
            location: "test".into(),
            text: text.into(),
        }
    }

    const PRIMARY: &str = "\
Province/State,Country/Region,Lat,Long,Date,Confirmed,Deaths,Recovered,Active,WHO Region
,Afghanistan,33.93911,67.709953,2020-01-22,0,0,0,0,Eastern Mediterranean
Hubei,China,30.9756,112.2707,2020-01-22,444,17,28,399,Western Pacific
";

    const SUMMARY: &str = "\
Country/Region,Continent,Population,TotalCases,NewCases,TotalDeaths,NewDeaths,TotalRecovered,NewRecovered,ActiveCases,\"Serious,Critical\",Tot Cases/1M pop,Deaths/1M pop,TotalTests,Tests/1M pop,WHO Region
USA,North America,331198130,5032179,,162804,,2576668,,2292707,18296,15194,492,63139605,190640,Americas
UK,Europe,67922029,308134,,46413,,,,,73,4537,683,17515234,257873,Europe
";

    #[test]
    fn parses_published_primary_layout() {
        let table = ingest_primary(&raw(TableKind::Primary, PRIMARY)).unwrap();
        assert_eq!(table.len(), 2);

        let hubei = &table.rows()[1];
        assert_eq!(hubei.entity, "China");
        assert_eq!(hubei.province.as_deref(), Some("Hubei"));
        assert_eq!(hubei.date, NaiveDate::from_ymd_opt(2020, 1, 22).unwrap());
        assert_eq!(hubei.confirmed, 444.0);
        assert_eq!(hubei.active, 399.0);
        assert_eq!(hubei.who_region.as_deref(), Some("Western Pacific"));

        assert_eq!(table.rows()[0].province, None);
        assert!(table.has_column("province"));
    }

    #[test]
    fn parses_published_summary_layout_with_blanks() {
        let table = ingest_summary(&raw(TableKind::Summary, SUMMARY)).unwrap();
        assert_eq!(table.len(), 2);

        let usa = &table.rows()[0];
        assert_eq!(usa.total_cases, Some(5_032_179.0));
        assert_eq!(usa.new_cases, None);
        assert_eq!(usa.serious_critical, Some(18_296.0));

        let uk = &table.rows()[1];
        assert_eq!(uk.total_recovered, None);
        assert_eq!(uk.active_cases, None);
        assert_eq!(uk.total_deaths, Some(46_413.0));
    }

    #[test]
    fn missing_required_column_fails_before_rows() {
        let text = "Country/Region,Date,Confirmed,Deaths,Recovered\nChina,2020-01-22,1,0,0\n";
        let err = ingest_primary(&raw(TableKind::Primary, text)).unwrap_err();
        assert!(matches!(
            err,
            DataError::SchemaMismatch { table: TableKind::Primary, ref column } if column == "active"
        ));
    }

    #[test]
    fn blank_required_metric_is_malformed() {
        let text = "entity,date,confirmed,deaths,recovered,active\nChina,2020-01-22,1,,0,1\n";
        let err = ingest_primary(&raw(TableKind::Primary, text)).unwrap_err();
        match err {
            DataError::MalformedRecord { line, reason, .. } => {
                assert_eq!(line, 2);
                assert!(reason.contains("deaths"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unparseable_date_is_malformed() {
        let text = "entity,date,confirmed,deaths,recovered,active\nChina,yesterday,1,0,0,1\n";
        let err = ingest_primary(&raw(TableKind::Primary, text)).unwrap_err();
        assert!(matches!(err, DataError::MalformedRecord { .. }));
    }

    #[test]
    fn accepts_us_style_dates() {
        assert_eq!(
            parse_date("1/22/2020"),
            NaiveDate::from_ymd_opt(2020, 1, 22)
        );
        assert_eq!(parse_date("1/22/20"), NaiveDate::from_ymd_opt(2020, 1, 22));
        assert_eq!(parse_date("2020-07-27"), NaiveDate::from_ymd_opt(2020, 7, 27));
    }

    #[test]
    fn numbers_allow_thousands_separators() {
        assert_eq!(parse_number("1,234,567"), Ok(Some(1_234_567.0)));
        assert_eq!(parse_number("12.5"), Ok(Some(12.5)));
        assert_eq!(parse_number("NaN"), Ok(None));
        assert_eq!(parse_number("-1,024.5"), Ok(Some(-1_024.5)));
        assert!(parse_number("n/a").is_err());
    }

    #[test]
    fn misplaced_separators_and_infinities_are_rejected() {
        for cell in ["1,2,3", "12,34", ",123", "1,234,", "1,2345", "1.2,345", "inf", "-infinity"] {
            assert!(parse_number(cell).is_err(), "accepted '{cell}'");
        }
    }

    #[test]
    fn infinite_count_is_malformed_record() {
        let text = "entity,date,confirmed,deaths,recovered,active\nChina,2020-01-22,inf,0,0,1\n";
        let err = ingest_primary(&raw(TableKind::Primary, text)).unwrap_err();
        match err {
            DataError::MalformedRecord { line, reason, .. } => {
                assert_eq!(line, 2);
                assert!(reason.contains("confirmed"), "reason: {reason}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_text_is_schema_mismatch() {
        let err = ingest_summary(&raw(TableKind::Summary, "")).unwrap_err();
        assert!(matches!(err, DataError::SchemaMismatch { .. }));
    }
}
