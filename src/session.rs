use std::fmt;

use crate::data::error::{ExportError, PipelineError, ValidationError};
use crate::data::export::{export, EXPORT_FILENAME, EXPORT_MIME};
use crate::data::loader::parse;
use crate::data::model::Dataset;
use crate::data::pivot::{pivot_with, PivotOptions, WideTable};
use crate::data::validate::{validate, REQUIRED_COLUMNS};

// ---------------------------------------------------------------------------
// Events coming from the presentation layer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub enum Event {
    Upload { filename: String, payload: Vec<u8> },
    Clear,
    /// The stations the user wants plotted, in the order they picked them.
    SelectStations(Vec<String>),
}

/// Where a session stands after the last event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing usable loaded.
    Empty,
    /// Pivot ready, no station selected.
    Idle,
    /// Pivot ready, at least one trace to draw.
    Plotting,
}

/// Status line shown to the user.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    NoFileYet,
    Cleared,
    Loaded { filename: String, records: usize },
    UnsupportedFormat,
    MalformedFile(String),
    MissingColumns,
    InvalidSchema(String),
    DuplicateKey(String),
}

impl Notice {
    pub fn is_error(&self) -> bool {
        !matches!(
            self,
            Notice::NoFileYet | Notice::Cleared | Notice::Loaded { .. }
        )
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::NoFileYet => write!(f, "No file uploaded yet."),
            Notice::Cleared => write!(f, "No file uploaded."),
            Notice::Loaded { filename, records } => {
                write!(f, "Loaded {records} rows from {filename}.")
            }
            Notice::UnsupportedFormat => {
                write!(f, "Unsupported file type. Please upload a CSV or Excel file.")
            }
            Notice::MalformedFile(reason) => write!(f, "Could not read the file: {reason}."),
            Notice::MissingColumns => write!(
                f,
                "File must contain '{}', '{}', and '{}' columns.",
                REQUIRED_COLUMNS[0], REQUIRED_COLUMNS[1], REQUIRED_COLUMNS[2]
            ),
            Notice::InvalidSchema(reason) => write!(f, "Invalid data: {reason}."),
            Notice::DuplicateKey(reason) => {
                write!(f, "Cannot transform the data: {reason}.")
            }
        }
    }
}

impl From<&PipelineError> for Notice {
    fn from(err: &PipelineError) -> Self {
        use crate::data::error::{LoadError, PivotError};
        match err {
            PipelineError::Load(LoadError::UnsupportedFormat { .. }) => Notice::UnsupportedFormat,
            PipelineError::Load(e @ LoadError::MalformedFile { .. }) => {
                Notice::MalformedFile(e.to_string())
            }
            PipelineError::Validation(ValidationError::MissingColumns(_))
            | PipelineError::Pivot(PivotError::Invalid(ValidationError::MissingColumns(_))) => {
                Notice::MissingColumns
            }
            PipelineError::Validation(e) | PipelineError::Pivot(PivotError::Invalid(e)) => {
                Notice::InvalidSchema(e.to_string())
            }
            PipelineError::Pivot(e @ PivotError::DuplicateKey { .. }) => {
                Notice::DuplicateKey(e.to_string())
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Outputs handed back to the presentation layer
// ---------------------------------------------------------------------------

/// One line on the depth profile plot: x = EPD, y = depth.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotTrace {
    pub station: String,
    /// Legend label.
    pub name: String,
    pub points: Vec<[f64; 2]>,
}

/// A ready-to-save export of the wide table.
#[derive(Debug, Clone)]
pub struct Download {
    pub filename: &'static str,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

/// Everything the UI renders after an event, borrowed from the session.
#[derive(Debug, Clone, Copy)]
pub struct View<'a> {
    pub phase: Phase,
    pub notice: &'a Notice,
    pub dataset: Option<&'a Dataset>,
    pub table: Option<&'a WideTable>,
    pub traces: &'a [PlotTrace],
}

impl View<'_> {
    /// Station choices for the selector; empty unless a pivot is ready.
    pub fn stations(&self) -> &[String] {
        self.table.map(WideTable::stations).unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct Ready {
    filename: String,
    dataset: Dataset,
    table: WideTable,
    selection: Vec<String>,
    traces: Vec<PlotTrace>,
}

#[derive(Debug)]
enum State {
    Empty,
    Ready(Box<Ready>),
}

/// Per-window context that owns the current upload and its derived views.
///
/// Transitions:
/// ```text
///  Empty ──upload ok──▶ Idle ◀──select []──▶ Plotting
///    ▲                    │                     │
///    └──── clear / failed upload (from any state)
/// ```
/// The parse → validate → pivot chain runs inside one upload event and is
/// all-or-nothing, so "loaded" and "validated" never outlive the event.
#[derive(Debug)]
pub struct Session {
    options: PivotOptions,
    state: State,
    notice: Notice,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(PivotOptions::default())
    }
}

impl Session {
    pub fn new(options: PivotOptions) -> Self {
        Self {
            options,
            state: State::Empty,
            notice: Notice::NoFileYet,
        }
    }

    /// Apply one event and return what should now be shown.
    pub fn handle(&mut self, event: Event) -> View<'_> {
        match event {
            Event::Upload { filename, payload } => self.upload(filename, &payload),
            Event::Clear => {
                log::info!("Session cleared");
                self.state = State::Empty;
                self.notice = Notice::Cleared;
            }
            Event::SelectStations(selection) => self.select(selection),
        }
        self.view()
    }

    pub fn view(&self) -> View<'_> {
        let (dataset, table, traces) = match &self.state {
            State::Empty => (None, None, &[][..]),
            State::Ready(r) => (Some(&r.dataset), Some(&r.table), r.traces.as_slice()),
        };
        View {
            phase: self.phase(),
            notice: &self.notice,
            dataset,
            table,
            traces,
        }
    }

    pub fn phase(&self) -> Phase {
        match &self.state {
            State::Empty => Phase::Empty,
            State::Ready(r) if r.traces.is_empty() => Phase::Idle,
            State::Ready(_) => Phase::Plotting,
        }
    }

    pub fn notice(&self) -> &Notice {
        &self.notice
    }

    pub fn filename(&self) -> Option<&str> {
        match &self.state {
            State::Ready(r) => Some(&r.filename),
            State::Empty => None,
        }
    }

    /// Current station selection after dropping unknown entries.
    pub fn selection(&self) -> &[String] {
        match &self.state {
            State::Ready(r) => &r.selection,
            State::Empty => &[],
        }
    }

    /// Serialise the current wide table. `None` when nothing is loaded.
    pub fn export(&self) -> Option<Result<Download, ExportError>> {
        let State::Ready(ready) = &self.state else {
            return None;
        };
        Some(export(&ready.table).map(|bytes| Download {
            filename: EXPORT_FILENAME,
            mime: EXPORT_MIME,
            bytes,
        }))
    }

    fn upload(&mut self, filename: String, payload: &[u8]) {
        // The previous upload is gone whatever happens next; only the
        // selection carries over, filtered against the new stations.
        let carried = match std::mem::replace(&mut self.state, State::Empty) {
            State::Ready(r) => r.selection,
            State::Empty => Vec::new(),
        };

        match load_and_pivot(payload, &filename, &self.options) {
            Ok((dataset, table)) => {
                log::info!(
                    "Loaded {filename}: {} records, {} depths, {} stations",
                    dataset.len(),
                    table.row_count(),
                    table.column_count()
                );
                self.notice = Notice::Loaded {
                    filename: filename.clone(),
                    records: dataset.len(),
                };
                let mut ready = Ready {
                    filename,
                    dataset,
                    table,
                    selection: Vec::new(),
                    traces: Vec::new(),
                };
                ready.set_selection(carried);
                self.state = State::Ready(Box::new(ready));
            }
            Err(e) => {
                log::warn!("Rejected upload {filename}: {e}");
                self.notice = Notice::from(&e);
            }
        }
    }

    fn select(&mut self, selection: Vec<String>) {
        match &mut self.state {
            State::Ready(ready) => ready.set_selection(selection),
            State::Empty => log::debug!("Ignoring station selection with nothing loaded"),
        }
    }
}

impl Ready {
    fn set_selection(&mut self, selection: Vec<String>) {
        let mut kept: Vec<String> = Vec::with_capacity(selection.len());
        for station in selection {
            if self.table.station_index(&station).is_some() && !kept.contains(&station) {
                kept.push(station);
            }
        }
        self.traces = kept
            .iter()
            .filter_map(|station| {
                let points = self.table.series(station)?;
                Some(PlotTrace {
                    station: station.clone(),
                    name: format!("Station {station}"),
                    points,
                })
            })
            .collect();
        self.selection = kept;
    }
}

/// Run parse → validate → pivot on one upload.
pub fn load_and_pivot(
    payload: &[u8],
    filename: &str,
    options: &PivotOptions,
) -> Result<(Dataset, WideTable), PipelineError> {
    let dataset = parse(payload, filename)?;
    validate(&dataset)?;
    let table = pivot_with(&dataset, options)?;
    Ok((dataset, table))
}
