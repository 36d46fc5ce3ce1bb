//! geolingua
//!
//! A small Rust library for aggregating where languages are spoken. Given a
//! catalog of languages with per-country speaker shares and a selection of
//! language ids, it computes deduplicated population reach, per-country
//! heatmap features, and a ranked country breakdown. Pairs with the
//! `geolingua` CLI.
//!
//! ### Features
//! - Load a catalog from the built-in dataset, a JSON file, or an HTTP URL
//! - Communication reach with per-country deduplication of reachable people
//! - Heatmap features with max-based intensity blending and a legend scale
//! - Country breakdown ranked by strongest speaker share
//! - Export to CSV, JSON, or GeoJSON
//!
//! ### Example
//! ```
//! use geolingua::{CatalogStore, PositionTable, Palette};
//! use geolingua::source::BuiltinSource;
//!
//! let mut store = CatalogStore::new(BuiltinSource);
//! let catalog = store.load()?;
//! let selection = ["english", "french"];
//!
//! let reach = geolingua::compute_reach(&selection, catalog);
//! assert_eq!(reach.total_speakers, 1_780_000_000);
//!
//! let heatmap = geolingua::build_heatmap_features(
//!     &selection,
//!     catalog,
//!     &PositionTable::geographic(),
//!     &Palette::default(),
//! );
//! let canada = heatmap.countries.iter().find(|c| c.country_code == "CA").unwrap();
//! assert_eq!(canada.contributing_language_ids, ["english", "french"]);
//!
//! let countries = geolingua::group_by_country(&selection, catalog);
//! assert_eq!(countries[0].country_code, "JM");
//! # Ok::<(), geolingua::LoadError>(())
//! ```

pub mod breakdown;
pub mod catalog;
pub mod dashboard;
pub mod error;
pub mod format;
pub mod heatmap;
pub mod models;
pub mod reach;
pub mod selection;
pub mod source;
pub mod storage;
pub mod style;

pub use breakdown::group_by_country;
pub use catalog::{Catalog, CatalogStore};
pub use error::LoadError;
pub use heatmap::{PositionTable, build_heatmap_features};
pub use models::{
    CountryBreakdownEntry, CountryMembership, HeatmapCountryFeature, HeatmapData, Language,
    ReachSummary,
};
pub use reach::{ReachConfig, compute_reach};
pub use selection::Selection;
pub use style::{ColorAssignment, Palette};
