use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeSet;

/// One spoken language as stored in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Language {
    pub id: String,
    pub name: String,
    /// Symbolic color identifier for presentation (e.g. `language-english`).
    #[serde(rename = "color", default)]
    pub color_token: String,
    #[serde(deserialize_with = "de_u64_from_string_or_number")]
    pub total_speakers: u64,
    /// Editorial share of world population; not derived from `countries`.
    #[serde(rename = "globalCoverage", default)]
    pub global_coverage_percent: f64,
    #[serde(
        rename = "officialCountries",
        default,
        deserialize_with = "de_u64_from_string_or_number"
    )]
    pub official_country_count: u64,
    /// Data-entry order, not sorted.
    #[serde(default)]
    pub countries: Vec<CountryMembership>,
}

/// A language's presence in one country.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CountryMembership {
    #[serde(rename = "code")]
    pub country_code: String,
    #[serde(rename = "name")]
    pub country_name: String,
    /// 0..=100 once ingested.
    pub speaker_percentage: f64,
    #[serde(default)]
    pub is_official: bool,
    /// Total population of the country. Repeated for every language that
    /// lists the same country, so never sum it across languages.
    #[serde(deserialize_with = "de_u64_from_string_or_number")]
    pub population: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cultural_notes: Option<String>,
}

impl CountryMembership {
    /// Number of people in this country reachable through this language,
    /// `floor(population * speakerPercentage / 100)`.
    pub fn reachable_population(&self) -> u64 {
        let reachable = (self.population as f64) * self.speaker_percentage / 100.0;
        if reachable.is_finite() && reachable > 0.0 {
            reachable.floor() as u64
        } else {
            0
        }
    }
}

/// The catalog document as served: `{ "languages": [...] }`, or a bare array.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LanguageDocument {
    Keyed { languages: Vec<Language> },
    Bare(Vec<Language>),
}

impl LanguageDocument {
    pub fn into_languages(self) -> Vec<Language> {
        match self {
            LanguageDocument::Keyed { languages } => languages,
            LanguageDocument::Bare(languages) => languages,
        }
    }
}

/// Serde helper: parse `u64` from either a JSON number or a string.
/// Catalog exports from spreadsheets often quote large populations.
fn de_u64_from_string_or_number<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};
    struct U64Visitor;

    impl<'de> Visitor<'de> for U64Visitor {
        type Value = u64;

        fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
            write!(f, "a string or integer representing a non-negative count")
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(v)
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            if v < 0 {
                return Err(E::custom("negative value for a count"));
            }
            Ok(v as u64)
        }

        fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            if !v.is_finite() || v < 0.0 {
                return Err(E::custom("count must be a finite non-negative number"));
            }
            Ok(v.floor() as u64)
        }

        fn visit_str<E>(self, s: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            s.trim().replace('_', "").parse::<u64>().map_err(E::custom)
        }
    }

    deserializer.deserialize_any(U64Visitor)
}

/// Aggregate reach of a language selection.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReachSummary {
    /// Plain sum of each language's `total_speakers`. Multilingual speakers
    /// are counted once per language, so this overstates unique people.
    pub total_speakers: u64,
    pub distinct_countries: BTreeSet<String>,
    /// Deduplicated reachable population as a share of the world, 0..=100,
    /// rounded to one decimal.
    pub global_coverage_percent: f64,
}

/// A location used to place a country on a map or globe.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Position {
    /// `[longitude, latitude]` in degrees.
    Geo([f64; 2]),
    /// `[x, y, z]` in globe scene units.
    Render([f64; 3]),
}

/// One country's render-ready heatmap record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapCountryFeature {
    pub country_code: String,
    pub country_name: String,
    pub coordinates: Position,
    /// Max across contributing languages.
    pub speaker_percentage: f64,
    /// True if official for any contributing language.
    pub is_official: bool,
    pub population: u64,
    /// In selection order.
    pub contributing_language_ids: Vec<String>,
    pub intensity: f64,
    /// Color of the first language that reached this country.
    pub representative_color: String,
}

/// One band of the heatmap legend: `[min, max)`, the last band closed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ColorBand {
    pub min: f64,
    pub max: f64,
    pub color: Cow<'static, str>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapData {
    pub countries: Vec<HeatmapCountryFeature>,
    pub max_intensity: f64,
    pub color_scale: Vec<ColorBand>,
}

/// How one selected language shows up in a country.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LanguageContribution {
    pub language_id: String,
    pub name: String,
    pub color: String,
    pub percentage: f64,
    pub is_official: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cultural_notes: Option<String>,
}

/// All selected languages present in one country.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CountryBreakdownEntry {
    pub country_code: String,
    pub country_name: String,
    pub population: u64,
    pub contributing_languages: Vec<LanguageContribution>,
    pub max_percentage: f64,
}
