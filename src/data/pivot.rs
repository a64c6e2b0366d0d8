use std::cmp::Ordering;
use std::collections::BTreeMap;

use super::error::{PivotError, ValidationError};
use super::model::{normalize_number, number_label, Dataset, Scalar};
use super::validate::{validate, DEPTH, EPD, STATION};

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// What to do when two records share a (Depth, Station) pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Fail with [`PivotError::DuplicateKey`] on the first repeated pair.
    #[default]
    Reject,
    /// The record that comes last in the upload wins.
    KeepLast,
}

#[derive(Debug, Clone, Default)]
pub struct PivotOptions {
    pub duplicates: DuplicatePolicy,
}

// ---------------------------------------------------------------------------
// WideTable – one row per depth, one column per station
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct WideRow {
    pub depth: f64,
    /// One slot per station, aligned with [`WideTable::stations`].
    /// `None` is the missing marker.
    pub values: Vec<Option<f64>>,
}

/// The pivoted readings. Rows are sorted by ascending depth.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WideTable {
    stations: Vec<String>,
    rows: Vec<WideRow>,
}

impl WideTable {
    /// Station identifiers, in column order.
    pub fn stations(&self) -> &[String] {
        &self.stations
    }

    pub fn rows(&self) -> &[WideRow] {
        &self.rows
    }

    pub fn depths(&self) -> impl Iterator<Item = f64> + '_ {
        self.rows.iter().map(|r| r.depth)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn station_index(&self, station: &str) -> Option<usize> {
        self.stations.iter().position(|s| s == station)
    }

    /// EPD at (`depth`, `station`). `None` for a missing cell or unknown key.
    pub fn get(&self, depth: f64, station: &str) -> Option<f64> {
        let col = self.station_index(station)?;
        let key = DepthKey::new(depth);
        let row = self
            .rows
            .binary_search_by(|r| r.depth.total_cmp(&key.0))
            .ok()?;
        self.rows[row].values[col]
    }

    /// The whole column for one station, in depth order.
    pub fn column(&self, station: &str) -> Option<Vec<Option<f64>>> {
        let col = self.station_index(station)?;
        Some(self.rows.iter().map(|r| r.values[col]).collect())
    }

    /// `[EPD, depth]` points for one station with missing cells skipped.
    pub fn series(&self, station: &str) -> Option<Vec<[f64; 2]>> {
        let col = self.station_index(station)?;
        Some(
            self.rows
                .iter()
                .filter_map(|r| r.values[col].map(|epd| [epd, r.depth]))
                .collect(),
        )
    }

    /// Header of the exported/displayed table: `Depth` then the stations.
    pub fn header(&self) -> Vec<String> {
        std::iter::once(DEPTH.to_string())
            .chain(self.stations.iter().cloned())
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Pivot
// ---------------------------------------------------------------------------

/// Depth as a map key: total order over normalised values.
#[derive(Debug, Clone, Copy)]
struct DepthKey(f64);

impl DepthKey {
    fn new(v: f64) -> Self {
        DepthKey(normalize_number(v))
    }
}

impl PartialEq for DepthKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for DepthKey {}

impl PartialOrd for DepthKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DepthKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Reshape long-format readings into a [`WideTable`], rejecting
/// duplicate (Depth, Station) pairs.
pub fn pivot(ds: &Dataset) -> Result<WideTable, PivotError> {
    pivot_with(ds, &PivotOptions::default())
}

pub fn pivot_with(ds: &Dataset, options: &PivotOptions) -> Result<WideTable, PivotError> {
    validate(ds)?;
    let column = |name: &str| {
        ds.column_index(name)
            .ok_or_else(|| ValidationError::MissingColumns(vec![name.to_string()]))
    };
    let (depth_idx, station_idx, epd_idx) = (column(DEPTH)?, column(STATION)?, column(EPD)?);

    // Number the distinct stations in sorted order and remember each
    // record's column, so every record lands in a column by construction.
    let keys: Vec<Scalar> = ds
        .column_values(station_idx)
        .map(Scalar::normalized)
        .collect();
    let mut order: Vec<usize> = (0..keys.len()).collect();
    order.sort_by(|&a, &b| keys[a].cmp(&keys[b]));

    let mut stations: Vec<String> = Vec::new();
    let mut record_col = vec![0usize; keys.len()];
    for (pos, &rec) in order.iter().enumerate() {
        if pos == 0 || keys[order[pos - 1]] != keys[rec] {
            stations.push(keys[rec].label());
        }
        record_col[rec] = stations.len() - 1;
    }

    // Outer None: no record seen yet. Inner None: record seen with empty EPD.
    let mut grid: BTreeMap<DepthKey, Vec<Option<Option<f64>>>> = BTreeMap::new();

    for (record, &col) in ds.records().zip(&record_col) {
        let Some(Scalar::Number(depth)) = record.at(depth_idx) else {
            return Err(ValidationError::NonNumericColumn {
                column: DEPTH.to_string(),
            }
            .into());
        };
        let epd = record.at(epd_idx).and_then(Scalar::as_f64);

        let row = grid
            .entry(DepthKey::new(*depth))
            .or_insert_with(|| vec![None; stations.len()]);
        if row[col].is_some() && options.duplicates == DuplicatePolicy::Reject {
            return Err(PivotError::DuplicateKey {
                depth: *depth,
                station: stations[col].clone(),
            });
        }
        row[col] = Some(epd);
    }

    let rows: Vec<WideRow> = grid
        .into_iter()
        .map(|(depth, slots)| WideRow {
            depth: depth.0,
            values: slots.into_iter().map(Option::flatten).collect(),
        })
        .collect();

    log::debug!(
        "Pivoted {} records into {} depths x {} stations",
        ds.len(),
        rows.len(),
        stations.len()
    );
    Ok(WideTable { stations, rows })
}

impl std::fmt::Display for WideTable {
    /// Plain-text rendering, comma separated, blank for missing cells.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.header().join(","))?;
        for row in &self.rows {
            write!(f, "{}", number_label(row.depth))?;
            for v in &row.values {
                write!(f, ",{}", v.map(number_label).unwrap_or_default())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
