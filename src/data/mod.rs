/// Data layer: core types, loading, and filtering.
///
/// Architecture:
/// ```text
///  spacex_launch_dash.csv (URL or local file)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  fetch + parse → LaunchTable
///   └──────────┘
///        │
///        ▼
///   ┌─────────────┐
///   │ LaunchTable  │  Vec<LaunchRecord>, sites, booster categories, payload bounds
///   └─────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  site / payload / booster predicates → row subset
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod filter;
