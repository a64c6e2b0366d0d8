use super::error::ValidationError;
use super::model::{Dataset, Scalar};

pub const DEPTH: &str = "Depth";
pub const STATION: &str = "Station";
pub const EPD: &str = "EPD";

/// Columns every upload must carry, in the order they are reported.
pub const REQUIRED_COLUMNS: [&str; 3] = [DEPTH, STATION, EPD];

/// Check that `ds` can be pivoted.
///
/// Checks run in order and the first failing one is returned:
/// 1. all of `Depth`, `Station`, `EPD` are present;
/// 2. `Depth` and `EPD` hold no text;
/// 3. no record has an empty `Depth` or `Station`.
///
/// An empty `EPD` is fine; it pivots to a missing cell.
pub fn validate(ds: &Dataset) -> Result<(), ValidationError> {
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|c| !ds.has_column(c))
        .map(|c| c.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(ValidationError::MissingColumns(missing));
    }

    for column in [DEPTH, EPD] {
        let idx = required_index(ds, column)?;
        if ds.column_values(idx).any(|v| matches!(v, Scalar::Text(_))) {
            return Err(ValidationError::NonNumericColumn {
                column: column.to_string(),
            });
        }
    }

    for column in [DEPTH, STATION] {
        let idx = required_index(ds, column)?;
        if let Some(row) = ds.column_values(idx).position(Scalar::is_missing) {
            return Err(ValidationError::EmptyKey {
                column: column.to_string(),
                row,
            });
        }
    }

    Ok(())
}

fn required_index(ds: &Dataset, column: &str) -> Result<usize, ValidationError> {
    ds.column_index(column)
        .ok_or_else(|| ValidationError::MissingColumns(vec![column.to_string()]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ds(columns: &[&str], rows: Vec<Vec<Scalar>>) -> Dataset {
        Dataset::new(columns.iter().map(|c| c.to_string()).collect(), rows)
    }

    fn n(v: f64) -> Scalar {
        Scalar::Number(v)
    }

    #[test]
    fn accepts_required_columns_with_extras() {
        let data = ds(
            &["Site", "Depth", "Station", "EPD"],
            vec![vec![Scalar::Text("north".into()), n(1.0), n(3.0), n(0.1)]],
        );
        assert_eq!(validate(&data), Ok(()));
    }

    #[test]
    fn reports_every_missing_column_in_order() {
        let data = ds(&["Station", "Value"], vec![]);
        assert_eq!(
            validate(&data),
            Err(ValidationError::MissingColumns(vec![
                "Depth".to_string(),
                "EPD".to_string()
            ]))
        );
    }

    #[test]
    fn column_names_are_case_sensitive() {
        let data = ds(&["depth", "Station", "EPD"], vec![]);
        assert!(matches!(
            validate(&data),
            Err(ValidationError::MissingColumns(cols)) if cols == ["Depth"]
        ));
    }

    #[test]
    fn rejects_text_depth() {
        let data = ds(
            &["Depth", "Station", "EPD"],
            vec![vec![Scalar::Text("shallow".into()), n(1.0), n(2.0)]],
        );
        assert_eq!(
            validate(&data),
            Err(ValidationError::NonNumericColumn {
                column: "Depth".into()
            })
        );
    }

    #[test]
    fn rejects_empty_station_but_allows_empty_epd() {
        let data = ds(
            &["Depth", "Station", "EPD"],
            vec![
                vec![n(1.0), Scalar::Text("A".into()), Scalar::Missing],
                vec![n(2.0), Scalar::Missing, n(2.0)],
            ],
        );
        assert_eq!(
            validate(&data),
            Err(ValidationError::EmptyKey {
                column: "Station".into(),
                row: 1
            })
        );
    }
}
