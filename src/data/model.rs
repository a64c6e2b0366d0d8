use std::cmp::Ordering;
use std::fmt;

// ---------------------------------------------------------------------------
// Scalar – a single cell of the uploaded table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value after column coercion.
///
/// `Missing` is the "no data" marker: an empty CSV field, an empty
/// spreadsheet cell. It is distinct from `Number(0.0)`.
#[derive(Debug, Clone)]
pub enum Scalar {
    Number(f64),
    Text(String),
    Missing,
}

// -- Manual Eq/Ord so stations can be sorted and used as map keys --
// Equality follows `Ord`: NaN equals NaN and -0.0 differs from 0.0.
// Use `normalized` before grouping numbers that came from user input.

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Scalar {}

impl PartialOrd for Scalar {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Scalar {
    /// Missing < numbers (numeric order) < text (lexical order).
    fn cmp(&self, other: &Self) -> Ordering {
        use Scalar::*;
        fn rank(v: &Scalar) -> u8 {
            match v {
                Missing => 0,
                Number(_) => 1,
                Text(_) => 2,
            }
        }
        match (self, other) {
            (Number(a), Number(b)) => a.total_cmp(b),
            (Text(a), Text(b)) => a.cmp(b),
            _ => rank(self).cmp(&rank(other)),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Number(v) => write!(f, "{}", number_label(*v)),
            Scalar::Text(s) => write!(f, "{s}"),
            Scalar::Missing => Ok(()),
        }
    }
}

impl Scalar {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// Fold `-0.0` into `0.0` and every NaN into one NaN, so values that
    /// print the same also group together.
    pub fn normalized(&self) -> Scalar {
        match self {
            Scalar::Number(v) => Scalar::Number(normalize_number(*v)),
            other => other.clone(),
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Scalar::Missing)
    }

    /// String form used for station identifiers and column headers.
    pub fn label(&self) -> String {
        self.to_string()
    }
}

/// `-0.0` becomes `0.0`, any NaN becomes the canonical NaN.
pub fn normalize_number(v: f64) -> f64 {
    if v.is_nan() {
        f64::NAN
    } else {
        v + 0.0
    }
}

/// Render a number the way a person would type it: `1` rather than `1.0`.
pub fn number_label(v: f64) -> String {
    if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{v}")
    }
}

// ---------------------------------------------------------------------------
// Dataset – the parsed upload in long format
// ---------------------------------------------------------------------------

/// The parsed upload: a header plus row-aligned records.
///
/// Every record holds exactly one value per column, so all records share
/// the header's column set. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    columns: Vec<String>,
    records: Vec<Vec<Scalar>>,
}

impl Dataset {
    /// Build a dataset, padding short rows with `Missing` and dropping
    /// cells past the header width.
    pub fn new(columns: Vec<String>, records: Vec<Vec<Scalar>>) -> Self {
        let width = columns.len();
        let records = records
            .into_iter()
            .map(|mut row| {
                row.resize(width, Scalar::Missing);
                row
            })
            .collect();
        Dataset { columns, records }
    }

    /// Ordered column names, exactly as in the source header.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn record(&self, index: usize) -> Option<Record<'_>> {
        self.records.get(index).map(|values| Record {
            columns: &self.columns,
            values,
        })
    }

    pub fn records(&self) -> impl Iterator<Item = Record<'_>> {
        self.records.iter().map(|values| Record {
            columns: &self.columns,
            values,
        })
    }

    /// All values of one column, in record order.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &Scalar> {
        self.records.iter().filter_map(move |row| row.get(index))
    }
}

/// A borrowed view of one record: column name → value.
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    columns: &'a [String],
    values: &'a [Scalar],
}

impl<'a> Record<'a> {
    pub fn get(&self, column: &str) -> Option<&'a Scalar> {
        let idx = self.columns.iter().position(|c| c == column)?;
        self.values.get(idx)
    }

    pub fn at(&self, index: usize) -> Option<&'a Scalar> {
        self.values.get(index)
    }

    pub fn values(&self) -> &'a [Scalar] {
        self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_sort_before_text() {
        let mut v = vec![
            Scalar::Text("B".into()),
            Scalar::Number(10.0),
            Scalar::Text("A".into()),
            Scalar::Number(2.0),
        ];
        v.sort();
        let labels: Vec<String> = v.iter().map(Scalar::label).collect();
        assert_eq!(labels, ["2", "10", "A", "B"]);
    }

    #[test]
    fn equality_agrees_with_ordering() {
        let zero = Scalar::Number(0.0);
        let neg_zero = Scalar::Number(-0.0);
        assert_eq!(zero == neg_zero, zero.cmp(&neg_zero) == Ordering::Equal);
        assert_eq!(neg_zero.normalized(), zero);

        let nan = Scalar::Number(f64::NAN);
        assert_eq!(nan, nan.clone());
        assert_eq!(Scalar::Number(-f64::NAN).normalized(), nan.normalized());
    }

    #[test]
    fn integral_numbers_label_without_fraction() {
        assert_eq!(Scalar::Number(3.0).label(), "3");
        assert_eq!(Scalar::Number(-0.5).label(), "-0.5");
        assert_eq!(Scalar::Missing.label(), "");
    }

    #[test]
    fn short_rows_are_padded_with_missing() {
        let ds = Dataset::new(
            vec!["a".into(), "b".into()],
            vec![vec![Scalar::Number(1.0)]],
        );
        let rec = ds.record(0).unwrap();
        assert_eq!(rec.get("b"), Some(&Scalar::Missing));
        assert_eq!(rec.get("c"), None);
    }
}
