/// Data layer: loading, cleaning, filtering and aggregation.
///
/// Architecture:
/// ```text
///   data/data.csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse projected columns → RawTransaction
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ cleaner   │  dedup, mall placeholder, year, total → Dataset
///   └──────────┘        (held by `cache` until the file changes)
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  age / category / mall equality → row indices
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  mean by (year, gender, payment) → PivotTable
///   └───────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ summary   │  means over pivot cells
///   └──────────┘
/// ```

pub mod aggregate;
pub mod cache;
pub mod cleaner;
pub mod filter;
pub mod loader;
pub mod model;
pub mod summary;
