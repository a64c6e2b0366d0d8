use thiserror::Error;

/// Why an upload could not be turned into a [`Dataset`](super::model::Dataset).
#[derive(Debug, Error)]
pub enum LoadError {
    /// The filename does not end in `.csv`, `.xls` or `.xlsx`.
    #[error("unsupported file type '{filename}': expected .csv, .xls or .xlsx")]
    UnsupportedFormat { filename: String },

    /// The content does not parse as the format its extension declares.
    #[error("malformed {format} file: {reason}")]
    MalformedFile { format: &'static str, reason: String },
}

impl LoadError {
    pub(crate) fn malformed(format: &'static str, reason: impl ToString) -> Self {
        LoadError::MalformedFile {
            format,
            reason: reason.to_string(),
        }
    }
}

/// Schema problems found after parsing, before pivoting.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("missing required column(s): {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("column '{column}' must be numeric")]
    NonNumericColumn { column: String },

    #[error("column '{column}' is empty in row {row}")]
    EmptyKey { column: String, row: usize },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PivotError {
    /// Two records share the same (Depth, Station) pair.
    #[error("duplicate entry for depth {depth} and station '{station}'")]
    DuplicateKey { depth: f64, station: String },

    /// The dataset was handed over without passing validation.
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

#[derive(Debug, Error)]
#[error("failed to write spreadsheet: {0}")]
pub struct ExportError(#[from] pub rust_xlsxwriter::XlsxError);

/// Any failure of the parse → validate → pivot chain.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Pivot(#[from] PivotError),
}
