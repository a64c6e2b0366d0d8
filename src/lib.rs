//! Load depth/station EPD readings, reshape them into one column per
//! station, and export the result as a spreadsheet.
//!
//! The [`data`] layer holds the pure pipeline. [`session`] drives it from
//! UI events as an explicit state machine.

pub mod data;
pub mod session;

pub use data::error::{ExportError, LoadError, PipelineError, PivotError, ValidationError};
pub use data::export::{export, EXPORT_FILENAME, EXPORT_MIME};
pub use data::loader::parse;
pub use data::model::{Dataset, Scalar};
pub use data::pivot::{pivot, pivot_with, DuplicatePolicy, PivotOptions, WideTable};
pub use data::validate::validate;
pub use session::{Event, Notice, Phase, PlotTrace, Session};
