//! Number formatting for stat cards and CLI output.

use num_format::{Locale, ToFormattedString};

/// Short human form: `1.5B`, `559M`, `280K`, or the plain number.
pub fn compact_count(n: u64) -> String {
    let x = n as f64;
    if x >= 1.0e9 {
        format!("{:.1}B", x / 1.0e9)
    } else if x >= 1.0e6 {
        format!("{:.0}M", x / 1.0e6)
    } else if x >= 1.0e3 {
        format!("{:.0}K", x / 1.0e3)
    } else {
        n.to_string()
    }
}

/// Full number with locale-specific digit grouping, e.g. `1,500,000` or `1.500.000`.
pub fn grouped_count(n: u64, locale_tag: &str) -> String {
    n.to_formatted_string(map_locale(locale_tag))
}

/// Percentage with one decimal, e.g. `18.8%`.
pub fn percent(p: f64) -> String {
    format!("{:.1}%", p)
}

/// Map a user-provided locale tag to a `num_format::Locale`.
///
/// Supported tags (case-insensitive): `en`, `en_US`, `de`, `de_DE`, `german`,
/// `fr`, `es`, `it`, `pt`, `nl`. Defaults to English.
pub fn map_locale(tag: &str) -> &'static Locale {
    match tag.to_lowercase().replace('-', "_").as_str() {
        "de" | "de_de" | "german" => &Locale::de,
        "fr" | "fr_fr" => &Locale::fr,
        "es" | "es_es" => &Locale::es,
        "it" | "it_it" => &Locale::it,
        "pt" | "pt_pt" | "pt_br" => &Locale::pt,
        "nl" | "nl_nl" => &Locale::nl,
        _ => &Locale::en, // default
    }
}
