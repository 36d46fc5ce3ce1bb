use crate::models::{CountryBreakdownEntry, HeatmapData};
use anyhow::{Context, Result};
use csv::WriterBuilder;
use serde::Serialize;
use std::borrow::Cow;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Save a country breakdown as CSV, one row per (country, language).
pub fn save_breakdown_csv<P: AsRef<Path>>(entries: &[CountryBreakdownEntry], path: P) -> Result<()> {
    let path = path.as_ref();
    let mut wtr = WriterBuilder::new()
        .from_path(path)
        .with_context(|| format!("create {}", path.display()))?;
    wtr.serialize((
        "country_code",
        "country_name",
        "population",
        "max_percentage",
        "language_id",
        "language_name",
        "percentage",
        "is_official",
    ))?;
    for e in entries {
        for l in &e.contributing_languages {
            wtr.serialize((
                safe_cell(&e.country_code),
                safe_cell(&e.country_name),
                e.population,
                e.max_percentage,
                safe_cell(&l.language_id),
                safe_cell(&l.name),
                l.percentage,
                l.is_official,
            ))?;
        }
    }
    wtr.flush()?;
    Ok(())
}

/// Save any output (reach summary, heatmap, breakdown, report) as pretty JSON.
pub fn save_json<T: Serialize + ?Sized, P: AsRef<Path>>(value: &T, path: P) -> Result<()> {
    let path = path.as_ref();
    let mut f = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let s = serde_json::to_string_pretty(value)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}

/// Save heatmap features as a GeoJSON `FeatureCollection`.
pub fn save_geojson<P: AsRef<Path>>(heatmap: &HeatmapData, path: P) -> Result<()> {
    save_json(&heatmap.to_geojson(), path)
}

// Spreadsheet apps evaluate cells starting with these as formulas.
fn safe_cell(s: &str) -> Cow<'_, str> {
    match s.chars().next() {
        Some('=' | '+' | '-' | '@') => Cow::Owned(format!("'{s}")),
        _ => Cow::Borrowed(s),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LanguageContribution;
    use tempfile::tempdir;

    #[test]
    fn write_csv_and_json() {
        let dir = tempdir().unwrap();
        let csvp = dir.path().join("x.csv");
        let jsonp = dir.path().join("x.json");
        let entries = vec![CountryBreakdownEntry {
            country_code: "DE".into(),
            country_name: "Germany".into(),
            population: 83_000_000,
            contributing_languages: vec![LanguageContribution {
                language_id: "german".into(),
                name: "German".into(),
                color: "language-german".into(),
                percentage: 95.0,
                is_official: true,
                cultural_notes: None,
            }],
            max_percentage: 95.0,
        }];
        save_breakdown_csv(&entries, &csvp).unwrap();
        save_json(&entries, &jsonp).unwrap();
        assert!(csvp.exists());
        assert!(jsonp.exists());
    }

    #[test]
    fn formula_starters_are_quoted() {
        assert_eq!(safe_cell("=1+1"), "'=1+1");
        assert_eq!(safe_cell("-5"), "'-5");
        assert_eq!(safe_cell("Spain"), "Spain");
        assert_eq!(safe_cell(""), "");
    }
}
