use geolingua::breakdown::{CommunicationLevel, Region, group_by_region};
use geolingua::models::{CountryMembership, Language};
use geolingua::source::{BuiltinSource, CatalogSource};
use geolingua::{Catalog, group_by_country};

fn lang(id: &str, countries: &[(&str, f64)]) -> Language {
    Language {
        id: id.into(),
        name: id.to_uppercase(),
        color_token: format!("language-{id}"),
        total_speakers: 1,
        global_coverage_percent: 0.0,
        official_country_count: 0,
        countries: countries
            .iter()
            .map(|&(code, pct)| CountryMembership {
                country_code: code.into(),
                country_name: format!("Country {code}"),
                speaker_percentage: pct,
                is_official: false,
                population: 1_000,
                cultural_notes: None,
            })
            .collect(),
    }
}

fn codes(entries: &[geolingua::CountryBreakdownEntry]) -> Vec<&str> {
    entries.iter().map(|e| e.country_code.as_str()).collect()
}

#[test]
fn strongest_country_first() {
    let catalog = Catalog::from_languages(vec![
        lang("a", &[("X", 30.0), ("Y", 90.0)]),
        lang("b", &[("Z", 60.0)]),
    ]);
    let entries = group_by_country(&["a", "b"], &catalog);
    assert_eq!(codes(&entries), ["Y", "Z", "X"]);
    let maxima: Vec<f64> = entries.iter().map(|e| e.max_percentage).collect();
    assert_eq!(maxima, [90.0, 60.0, 30.0]);
}

#[test]
fn ties_keep_discovery_order() {
    let catalog = Catalog::from_languages(vec![
        lang("a", &[("P", 50.0), ("Q", 50.0)]),
        lang("b", &[("R", 50.0)]),
    ]);
    let entries = group_by_country(&["b", "a"], &catalog);
    assert_eq!(codes(&entries), ["R", "P", "Q"]);
}

#[test]
fn shared_country_lists_every_language() {
    let catalog = Catalog::from_languages(vec![
        lang("a", &[("X", 20.0)]),
        lang("b", &[("X", 65.0)]),
    ]);
    let entries = group_by_country(&["a", "b"], &catalog);
    assert_eq!(entries.len(), 1);
    let x = &entries[0];
    assert_eq!(x.max_percentage, 65.0);
    let langs: Vec<_> = x
        .contributing_languages
        .iter()
        .map(|l| (l.language_id.as_str(), l.percentage))
        .collect();
    assert_eq!(langs, [("a", 20.0), ("b", 65.0)]);
    assert_eq!(x.communication_level(), CommunicationLevel::Good);
}

#[test]
fn empty_or_unknown_selection_is_empty() {
    let catalog = Catalog::from_languages(vec![lang("a", &[("X", 20.0)])]);
    assert!(group_by_country::<&str>(&[], &catalog).is_empty());
    assert!(group_by_country(&["nope"], &catalog).is_empty());
}

#[test]
fn builtin_portuguese_by_region() {
    let catalog = Catalog::from_languages(BuiltinSource.fetch().unwrap());
    let entries = group_by_country(&["portuguese"], &catalog);
    assert_eq!(codes(&entries), ["BR", "PT", "AO", "MZ"]);

    let groups = group_by_region(&entries);
    let regions: Vec<Region> = groups.iter().map(|g| g.region).collect();
    assert_eq!(
        regions,
        [Region::SouthAmerica, Region::Europe, Region::Africa]
    );
    let africa: Vec<_> = groups[2].entries.iter().map(|e| e.country_code.as_str()).collect();
    assert_eq!(africa, ["AO", "MZ"]);
}

#[test]
fn repeated_id_adds_a_second_contribution() {
    let catalog = Catalog::from_languages(vec![lang("a", &[("X", 40.0)])]);
    let entries = group_by_country(&["a", "a"], &catalog);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].contributing_languages.len(), 2);
    assert_eq!(entries[0].max_percentage, 40.0);
}
