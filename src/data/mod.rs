/// Data layer: core types, loading, and filtering.
///
/// Architecture:
/// ```text
///  orders.csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → OrderDataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ OrderDataset  │  Vec<OrderLine>, header names
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  query + date range → filtered indices
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod filter;
