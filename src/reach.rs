use crate::catalog::Catalog;
use crate::models::ReachSummary;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Editorial world population used as the coverage denominator.
pub const WORLD_POPULATION: u64 = 8_000_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReachConfig {
    pub world_population: u64,
}

impl Default for ReachConfig {
    fn default() -> Self {
        Self {
            world_population: WORLD_POPULATION,
        }
    }
}

/// Compute the communication reach of `selection` with the default config.
pub fn compute_reach<S: AsRef<str>>(selection: &[S], catalog: &Catalog) -> ReachSummary {
    compute_reach_with(selection, catalog, &ReachConfig::default())
}

/// Compute the communication reach of `selection`.
///
/// Per country only the best single-language estimate of reachable people is
/// kept, so a country spoken in by two selected languages is not counted
/// twice. `total_speakers` stays a plain sum. Unknown ids are skipped.
pub fn compute_reach_with<S: AsRef<str>>(
    selection: &[S],
    catalog: &Catalog,
    config: &ReachConfig,
) -> ReachSummary {
    let mut total_speakers: u64 = 0;
    let mut reachable: BTreeMap<&str, u64> = BTreeMap::new();
    let mut distinct_countries = BTreeSet::new();

    for id in selection {
        let Some(lang) = catalog.get_by_id(id.as_ref()) else {
            debug!("reach: skipping unknown language {:?}", id.as_ref());
            continue;
        };
        total_speakers = total_speakers.saturating_add(lang.total_speakers);
        for c in &lang.countries {
            distinct_countries.insert(c.country_code.clone());
            let slot = reachable.entry(c.country_code.as_str()).or_default();
            *slot = (*slot).max(c.reachable_population());
        }
    }

    let total_reachable: u64 = reachable.values().copied().fold(0, u64::saturating_add);

    ReachSummary {
        total_speakers,
        distinct_countries,
        global_coverage_percent: coverage_percent(total_reachable, config.world_population),
    }
}

/// `min(100, reachable / world * 100)` rounded to one decimal.
fn coverage_percent(reachable: u64, world_population: u64) -> f64 {
    if world_population == 0 {
        return if reachable > 0 { 100.0 } else { 0.0 };
    }
    let pct = (reachable as f64 / world_population as f64 * 100.0).min(100.0);
    (pct * 10.0).round() / 10.0
}
