/// Data layer: core types, loading, validation, pivoting and export.
///
/// Architecture:
/// ```text
///  .csv / .xls / .xlsx  (bytes + filename)
///        │
///        ▼
///   ┌──────────┐
///   │  loader  │  parse bytes → Dataset (long format)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ validate │  Depth / Station / EPD present and well-typed
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  pivot   │  Dataset → WideTable (depth rows × station columns)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  export  │  WideTable → .xlsx bytes
///   └──────────┘
/// ```

pub mod error;
pub mod export;
pub mod loader;
pub mod model;
pub mod pivot;
pub mod validate;
