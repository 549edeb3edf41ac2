/// Data layer: tabular input and the analysis response types.
///
/// Architecture:
/// ```text
///  .csv / .xlsx / .ods
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → rows of Cell
///   └──────────┘
///        │
///        ▼
///   ┌──────────────────┐
///   │ ObservationMatrix │  years (col A), months (cols B–M)
///   └──────────────────┘
///        │  flattened()
///        ▼
///   remote endpoint ──► AnalysisResult
/// ```

pub mod loader;
pub mod model;
