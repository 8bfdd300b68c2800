//! Immutable tables and the loaded dataset pair.

use super::records::{CaseRecord, SnapshotRecord};
use serde::Serialize;

/// An ordered, read-only sequence of rows sharing one schema.
///
/// `columns` lists the canonical names of the columns the source actually
/// carried; optional columns absent from the source are left out.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table<R> {
    columns: Vec<&'static str>,
    rows: Vec<R>,
}

impl<R> Table<R> {
    pub fn new(columns: Vec<&'static str>, rows: Vec<R>) -> Self {
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[&'static str] {
        &self.columns
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| *c == name)
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.rows.iter()
    }

    pub fn into_rows(self) -> Vec<R> {
        self.rows
    }
}

impl<'a, R> IntoIterator for &'a Table<R> {
    type Item = &'a R;
    type IntoIter = std::slice::Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// The two tables produced by one load.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub primary: Table<CaseRecord>,
    pub summary: Table<SnapshotRecord>,
}

impl Dataset {
    /// Deterministic BLAKE3 hash over both tables' columns and cells.
    ///
    /// Two loads of unchanged sources produce the same fingerprint.
    pub fn fingerprint(&self) -> String {
        let mut hasher = blake3::Hasher::new();

        hash_columns(&mut hasher, self.primary.columns());
        for rec in &self.primary {
            hash_str(&mut hasher, &rec.entity);
            hash_opt_str(&mut hasher, rec.province.as_deref());
            hasher.update(rec.date.to_string().as_bytes());
            hasher.update(&rec.confirmed.to_le_bytes());
            hasher.update(&rec.deaths.to_le_bytes());
            hasher.update(&rec.recovered.to_le_bytes());
            hasher.update(&rec.active.to_le_bytes());
            hash_opt_str(&mut hasher, rec.who_region.as_deref());
        }

        hasher.update(b"|summary|");
        hash_columns(&mut hasher, self.summary.columns());
        for rec in &self.summary {
            hash_str(&mut hasher, &rec.entity);
            hash_opt_str(&mut hasher, rec.continent.as_deref());
            for value in [
                rec.population,
                rec.total_cases,
                rec.new_cases,
                rec.total_deaths,
                rec.new_deaths,
                rec.total_recovered,
                rec.active_cases,
                rec.serious_critical,
                rec.total_tests,
            ] {
                hash_opt_f64(&mut hasher, value);
            }
            hash_opt_str(&mut hasher, rec.who_region.as_deref());
        }

        hasher.finalize().to_hex().to_string()
    }
}

/// Length-prefixed, so adjacent strings cannot shift bytes between fields.
fn hash_str(hasher: &mut blake3::Hasher, value: &str) {
    hasher.update(&(value.len() as u64).to_le_bytes());
    hasher.update(value.as_bytes());
}

fn hash_columns(hasher: &mut blake3::Hasher, columns: &[&str]) {
    hasher.update(&(columns.len() as u64).to_le_bytes());
    for col in columns {
        hash_str(hasher, col);
    }
}

fn hash_opt_str(hasher: &mut blake3::Hasher, value: Option<&str>) {
    match value {
        Some(s) => {
            hasher.update(&[1]);
            hash_str(hasher, s);
        }
        None => {
            hasher.update(&[0]);
        }
    }
}

fn hash_opt_f64(hasher: &mut blake3::Hasher, value: Option<f64>) {
    match value {
        Some(v) => {
            hasher.update(&[1]);
            hasher.update(&v.to_le_bytes());
        }
        None => {
            hasher.update(&[0]);
        }
    }
}
