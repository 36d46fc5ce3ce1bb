use crate::catalog::Catalog;
use crate::models::{CountryBreakdownEntry, LanguageContribution};
use ahash::AHashMap;
use log::debug;
use serde::{Deserialize, Serialize};

/// Group the selected languages' countries into one entry per country,
/// strongest country first.
///
/// Every contributing language keeps its own percentage; nothing is
/// deduplicated here. Ties keep discovery order. Unknown ids are skipped.
pub fn group_by_country<S: AsRef<str>>(
    selection: &[S],
    catalog: &Catalog,
) -> Vec<CountryBreakdownEntry> {
    let mut entries: Vec<CountryBreakdownEntry> = Vec::new();
    let mut slot_of: AHashMap<&str, usize> = AHashMap::new();

    for id in selection {
        let Some(lang) = catalog.get_by_id(id.as_ref()) else {
            debug!("breakdown: skipping unknown language {:?}", id.as_ref());
            continue;
        };
        for c in &lang.countries {
            let i = *slot_of.entry(c.country_code.as_str()).or_insert_with(|| {
                entries.push(CountryBreakdownEntry {
                    country_code: c.country_code.clone(),
                    country_name: c.country_name.clone(),
                    population: c.population,
                    contributing_languages: Vec::new(),
                    max_percentage: 0.0,
                });
                entries.len() - 1
            });
            entries[i].contributing_languages.push(LanguageContribution {
                language_id: lang.id.clone(),
                name: lang.name.clone(),
                color: lang.color_token.clone(),
                percentage: c.speaker_percentage,
                is_official: c.is_official,
                cultural_notes: c.cultural_notes.clone(),
            });
        }
    }

    for e in &mut entries {
        e.max_percentage = e
            .contributing_languages
            .iter()
            .map(|l| l.percentage)
            .fold(0.0, f64::max);
    }
    // stable: equal maxima keep discovery order
    entries.sort_by(|a, b| b.max_percentage.total_cmp(&a.max_percentage));
    entries
}

/// How easy it is to get by in a country with the selected languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommunicationLevel {
    Excellent,
    Good,
    Limited,
}

impl CommunicationLevel {
    pub fn from_percentage(max_percentage: f64) -> Self {
        if max_percentage >= 70.0 {
            CommunicationLevel::Excellent
        } else if max_percentage >= 40.0 {
            CommunicationLevel::Good
        } else {
            CommunicationLevel::Limited
        }
    }

    pub fn advice(&self) -> &'static str {
        match self {
            CommunicationLevel::Excellent => {
                "Excellent communication - you'll have no trouble getting around!"
            }
            CommunicationLevel::Good => "Good communication - locals will appreciate your effort!",
            CommunicationLevel::Limited => {
                "Limited communication - consider learning key phrases or using translation tools."
            }
        }
    }
}

impl CountryBreakdownEntry {
    pub fn communication_level(&self) -> CommunicationLevel {
        CommunicationLevel::from_percentage(self.max_percentage)
    }

    /// Notes from the first contributing language that has any.
    pub fn cultural_notes(&self) -> Option<&str> {
        self.contributing_languages
            .iter()
            .find_map(|l| l.cultural_notes.as_deref())
    }
}

/// Coarse world regions for the region-grouped country view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    NorthAmerica,
    SouthAmerica,
    Europe,
    Africa,
    Asia,
    Oceania,
    Other,
}

impl Region {
    /// Display order.
    pub const ALL: [Region; 7] = [
        Region::NorthAmerica,
        Region::SouthAmerica,
        Region::Europe,
        Region::Africa,
        Region::Asia,
        Region::Oceania,
        Region::Other,
    ];

    pub fn of(country_code: &str) -> Region {
        match country_code {
            "US" | "CA" | "MX" | "JM" => Region::NorthAmerica,
            "BR" | "AR" | "CO" | "PE" | "VE" | "CL" | "SR" => Region::SouthAmerica,
            "GB" | "IE" | "FR" | "ES" | "PT" | "BE" | "CH" | "LU" | "MC" | "DE" | "AT" | "IT"
            | "NL" | "PL" | "UA" | "BY" | "CY" => Region::Europe,
            "NG" | "ZA" | "EG" | "DZ" | "SD" | "MA" | "AO" | "MZ" | "SN" | "CD" | "TN" | "LY"
            | "KE" | "TZ" | "UG" | "CV" | "GW" | "ST" => Region::Africa,
            "CN" | "IN" | "JP" | "SA" | "IQ" | "PK" | "PH" | "AE" | "SY" | "JO" | "LB" | "KW"
            | "QA" | "BH" | "OM" | "YE" | "KP" | "KR" | "BD" | "NP" | "RU" | "KZ" | "TR"
            | "IR" | "AF" | "TJ" | "TH" | "LK" | "VN" | "ID" | "TL" => Region::Asia,
            "AU" | "NZ" | "FJ" => Region::Oceania,
            _ => Region::Other,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Region::NorthAmerica => "North America",
            Region::SouthAmerica => "South America",
            Region::Europe => "Europe",
            Region::Africa => "Africa",
            Region::Asia => "Asia",
            Region::Oceania => "Oceania",
            Region::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionGroup<'a> {
    pub region: Region,
    pub entries: Vec<&'a CountryBreakdownEntry>,
}

/// Bucket breakdown entries by region, in [`Region::ALL`] order. Entries keep
/// their relative order; empty regions are omitted.
pub fn group_by_region(entries: &[CountryBreakdownEntry]) -> Vec<RegionGroup<'_>> {
    Region::ALL
        .iter()
        .filter_map(|&region| {
            let members: Vec<_> = entries
                .iter()
                .filter(|e| Region::of(&e.country_code) == region)
                .collect();
            (!members.is_empty()).then_some(RegionGroup {
                region,
                entries: members,
            })
        })
        .collect()
}
