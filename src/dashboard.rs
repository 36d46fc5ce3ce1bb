//! Session state for an interactive dashboard: the selection plus a memo of
//! the last computed view.
//!
//! ```
//! use geolingua::catalog::Catalog;
//! use geolingua::dashboard::Dashboard;
//! use geolingua::source::{BuiltinSource, CatalogSource};
//!
//! let catalog = Catalog::from_languages(BuiltinSource.fetch()?);
//! let mut dash: Dashboard = Dashboard::default();
//! dash.toggle("english");
//! dash.toggle("spanish");
//! let view = dash.view(&catalog);
//! assert_eq!(view.reach.total_speakers, 2_059_000_000);
//! # Ok::<(), geolingua::LoadError>(())
//! ```

use crate::breakdown::group_by_country;
use crate::catalog::Catalog;
use crate::heatmap::{PositionTable, build_heatmap_features};
use crate::models::{CountryBreakdownEntry, HeatmapData, ReachSummary};
use crate::reach::{ReachConfig, compute_reach_with};
use crate::selection::Selection;
use crate::style::{ColorAssignment, Palette};
use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// The three aggregations for one selection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub reach: ReachSummary,
    pub heatmap: HeatmapData,
    pub breakdown: Vec<CountryBreakdownEntry>,
}

/// Compute all three aggregations. Each one runs independently.
pub fn compute_view<C: ColorAssignment + ?Sized>(
    selection: &[String],
    catalog: &Catalog,
    positions: &PositionTable,
    colors: &C,
    config: &ReachConfig,
) -> DashboardView {
    DashboardView {
        reach: compute_reach_with(selection, catalog, config),
        heatmap: build_heatmap_features(selection, catalog, positions, colors),
        breakdown: group_by_country(selection, catalog),
    }
}

// Heatmap colors and feature order follow selection order, so the key keeps it.
#[derive(Debug, Clone, PartialEq, Eq)]
struct MemoKey {
    ids: Vec<String>,
    catalog_version: u64,
}

pub struct Dashboard<C = Palette> {
    selection: Selection,
    positions: PositionTable,
    colors: C,
    config: ReachConfig,
    memo: Option<(MemoKey, Arc<DashboardView>)>,
}

impl Default for Dashboard<Palette> {
    fn default() -> Self {
        Self::new(PositionTable::geographic(), Palette::default())
    }
}

impl<C: ColorAssignment> Dashboard<C> {
    pub fn new(positions: PositionTable, colors: C) -> Self {
        Self {
            selection: Selection::new(),
            positions,
            colors,
            config: ReachConfig::default(),
            memo: None,
        }
    }

    pub fn with_config(mut self, config: ReachConfig) -> Self {
        self.config = config;
        self.memo = None;
        self
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Add or remove a language. Returns whether it is selected afterwards.
    pub fn toggle(&mut self, id: &str) -> bool {
        self.selection.toggle(id)
    }

    pub fn clear(&mut self) {
        self.selection.clear();
    }

    pub fn positions(&self) -> &PositionTable {
        &self.positions
    }

    /// Aggregations for the current selection. Recomputed only when the
    /// selection or the catalog version changed since the last call.
    pub fn view(&mut self, catalog: &Catalog) -> Arc<DashboardView> {
        let key = MemoKey {
            ids: self.selection.ids().to_vec(),
            catalog_version: catalog.version(),
        };
        if let Some((k, view)) = &self.memo
            && *k == key
        {
            return Arc::clone(view);
        }
        debug!(
            "recomputing dashboard for {:?} (catalog version {})",
            key.ids, key.catalog_version
        );
        let view = Arc::new(compute_view(
            self.selection.ids(),
            catalog,
            &self.positions,
            &self.colors,
            &self.config,
        ));
        self.memo = Some((key, Arc::clone(&view)));
        view
    }

    /// Snapshot of the current view for export.
    pub fn report(&mut self, catalog: &Catalog) -> DashboardReport {
        let view = self.view(catalog);
        DashboardReport::new(&self.selection, catalog, (*view).clone())
    }
}

/// A selected language as listed in a report header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedLanguage {
    pub id: String,
    pub name: String,
    pub color: String,
    pub total_speakers: u64,
}

/// Everything the dashboard shows, stamped with its generation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardReport {
    pub generated_at: DateTime<Utc>,
    pub languages: Vec<SelectedLanguage>,
    #[serde(flatten)]
    pub view: DashboardView,
}

impl DashboardReport {
    /// Unknown ids in `selection` are left out of the language list.
    pub fn new(selection: &Selection, catalog: &Catalog, view: DashboardView) -> Self {
        let languages = selection
            .resolve(catalog)
            .into_iter()
            .map(|l| SelectedLanguage {
                id: l.id.clone(),
                name: l.name.clone(),
                color: l.color_token.clone(),
                total_speakers: l.total_speakers,
            })
            .collect();
        Self {
            generated_at: Utc::now(),
            languages,
            view,
        }
    }
}
