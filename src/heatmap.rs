//! Per-country heatmap features for map and globe layers.
//!
//! Each selected language contributes its countries; a country reached by
//! several languages keeps its strongest speaker percentage as its intensity.
//! Countries missing from the [`PositionTable`] are left out.

use crate::catalog::Catalog;
use crate::error::LoadError;
use crate::models::{HeatmapCountryFeature, HeatmapData, Position};
use crate::source::read_text;
use crate::style::{ColorAssignment, color_scale};
use ahash::AHashMap;
use log::debug;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::path::Path;

/// Country centroids as `(code, longitude, latitude)`.
const GEO_CENTROIDS: &[(&str, f64, f64)] = &[
    ("US", -95.7129, 37.0902),
    ("GB", -3.4360, 55.3781),
    ("AU", 133.7751, -25.2744),
    ("CA", -106.3468, 56.1304),
    ("IN", 78.9629, 20.5937),
    ("MX", -102.5528, 23.6345),
    ("ES", -3.7492, 40.4637),
    ("AR", -63.6167, -38.4161),
    ("CO", -74.2973, 4.5709),
    ("PE", -75.0152, -9.1900),
    ("CL", -71.5430, -35.6751),
    ("CN", 104.1954, 35.8617),
    ("TW", 120.9605, 23.6978),
    ("SG", 103.8198, 1.3521),
    ("MY", 101.9758, 4.2105),
    ("FR", 2.2137, 46.2276),
    ("BE", 4.4699, 50.5039),
    ("CH", 8.2275, 46.8182),
    ("LU", 6.1296, 49.8153),
    ("MC", 7.4167, 43.7333),
    ("SA", 45.0792, 23.8859),
    ("AE", 53.8478, 23.4241),
    ("EG", 30.8025, 26.8206),
    ("MA", -7.0926, 31.7917),
    ("TN", 9.5375, 33.8869),
    ("DZ", 1.6596, 28.0339),
    ("LY", 17.2283, 26.3351),
    ("SD", 30.2176, 12.8628),
    ("IQ", 43.6793, 33.2232),
    ("SY", 38.9968, 34.8021),
    ("JO", 36.2384, 30.5852),
    ("LB", 35.8623, 33.8547),
    ("KW", 47.4818, 29.3117),
    ("QA", 51.1839, 25.3548),
    ("BH", 50.6344, 26.0667),
    ("OM", 55.9754, 21.4735),
    ("YE", 48.5164, 15.5527),
    ("BR", -51.9253, -14.2351),
    ("PT", -8.2245, 39.3999),
    ("AO", 17.8739, -11.2027),
    ("MZ", 35.5296, -18.6657),
    ("CV", -24.0132, 16.5388),
    ("GW", -15.1804, 11.8037),
    ("ST", 6.6071, 0.1864),
    ("TL", 125.7275, -8.8742),
    ("MO", 113.5439, 22.1987),
    ("NG", 8.6753, 9.0820),
    ("ZA", 24.9916, -30.5595),
    ("VE", -66.5897, 6.42375),
    ("CD", 21.7587, -4.0383),
    ("SN", -14.4524, 14.4974),
    ("FJ", 178.1165, -17.7134),
    ("NP", 84.1240, 28.3949),
    ("BD", 90.3563, 23.6850),
    ("RU", 105.3188, 61.5240),
    ("BY", 27.9534, 53.7098),
    ("KZ", 66.9237, 48.0196),
    ("UA", 31.1656, 48.3794),
    ("DE", 10.4515, 51.1657),
    ("AT", 14.5501, 47.5162),
    ("JP", 138.2529, 36.2048),
    ("KP", 127.5101, 40.3399),
    ("KR", 127.7669, 35.9078),
    ("PK", 69.3451, 30.3753),
    ("PL", 19.1451, 51.9194),
    ("NL", 5.2913, 52.1326),
    ("SR", -56.0278, 3.9193),
    ("ID", 113.9213, -0.7893),
    ("TR", 35.2433, 38.9637),
    ("CY", 33.4299, 35.1264),
    ("VN", 108.2772, 14.0583),
    ("IR", 53.6880, 32.4279),
    ("AF", 67.7100, 33.9391),
    ("TJ", 71.2761, 38.5358),
    ("TH", 101.1801, 15.8700),
    ("LK", 80.7718, 7.8731),
    ("KE", 37.9062, -0.0236),
    ("TZ", 34.8888, -6.3690),
    ("UG", 32.2903, 1.3733),
    ("IT", 12.5674, 41.8719),
];

/// Marker positions on a radius-2 globe scene.
const GLOBE_MARKERS: &[(&str, [f64; 3])] = &[
    ("US", [1.5, 0.8, 0.5]),
    ("GB", [0.2, 1.2, 0.8]),
    ("CA", [1.2, 1.5, 0.3]),
    ("AU", [-1.2, -1.0, 0.8]),
    ("IN", [-0.5, 0.3, 1.8]),
    ("NG", [-0.3, 0.1, 1.7]),
    ("ZA", [-0.5, -1.2, 1.5]),
    ("MX", [1.8, 0.2, 0.8]),
    ("ES", [0.1, 0.8, 1.8]),
    ("AR", [1.0, -1.8, 0.5]),
    ("CO", [1.5, 0.2, 1.2]),
    ("PE", [1.8, -0.5, 1.0]),
    ("VE", [1.2, 0.5, 1.5]),
    ("CN", [-1.8, 0.5, 0.8]),
    ("TW", [-1.5, 0.2, 1.5]),
    ("SG", [-1.0, -0.2, 1.8]),
    ("MY", [-1.2, 0.0, 1.5]),
    ("FR", [0.0, 1.0, 1.8]),
    ("CD", [-0.2, -0.3, 1.7]),
    ("BE", [0.1, 1.1, 1.7]),
    ("CH", [0.0, 0.9, 1.8]),
    ("SN", [0.5, 0.5, 1.7]),
    ("BR", [1.5, -1.0, 1.2]),
    ("PT", [0.3, 0.8, 1.7]),
    ("AO", [-0.2, -0.8, 1.6]),
    ("MZ", [-0.8, -1.0, 1.4]),
    ("EG", [-0.3, 0.8, 1.7]),
    ("SA", [-0.8, 0.3, 1.6]),
    ("DZ", [0.0, 0.9, 1.8]),
    ("SD", [-0.5, 0.2, 1.7]),
    ("IQ", [-0.8, 0.5, 1.6]),
    ("MA", [0.3, 0.7, 1.8]),
];

/// Country code -> position. Codes without an entry are excluded from heatmaps.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PositionTable {
    positions: AHashMap<String, Position>,
}

impl PositionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Geographic centroids (longitude, latitude) for flat maps.
    pub fn geographic() -> Self {
        GEO_CENTROIDS
            .iter()
            .map(|&(code, lon, lat)| (code, Position::Geo([lon, lat])))
            .collect()
    }

    /// Scene positions for the 3D globe view.
    pub fn globe() -> Self {
        GLOBE_MARKERS
            .iter()
            .map(|&(code, xyz)| (code, Position::Render(xyz)))
            .collect()
    }

    /// Load `{ "US": [-95.7, 37.1], "GB": [0.2, 1.2, 0.8], ... }` from JSON.
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        let raw: HashMap<String, Position> = serde_json::from_str(json)?;
        Ok(raw.into_iter().collect())
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        Self::from_json(&read_text(path.as_ref())?)
    }

    pub fn insert(&mut self, code: &str, position: Position) -> Option<Position> {
        self.positions.insert(code.trim().to_ascii_uppercase(), position)
    }

    /// Lookup is case-insensitive and ignores surrounding whitespace, like `insert`.
    pub fn get(&self, code: &str) -> Option<Position> {
        self.positions
            .get(code)
            .or_else(|| self.positions.get(&code.trim().to_ascii_uppercase()))
            .copied()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

impl<K: AsRef<str>> FromIterator<(K, Position)> for PositionTable {
    fn from_iter<I: IntoIterator<Item = (K, Position)>>(iter: I) -> Self {
        let mut table = PositionTable::new();
        for (code, pos) in iter {
            table.insert(code.as_ref(), pos);
        }
        table
    }
}

/// Build heatmap features for `selection`.
///
/// Features come out in discovery order (selection order, then each
/// language's country order). The legend only lists bands up to the highest
/// intensity seen, and is empty when no country was placed.
pub fn build_heatmap_features<S, C>(
    selection: &[S],
    catalog: &Catalog,
    positions: &PositionTable,
    colors: &C,
) -> HeatmapData
where
    S: AsRef<str>,
    C: ColorAssignment + ?Sized,
{
    let mut features: Vec<HeatmapCountryFeature> = Vec::new();
    let mut slot_of: AHashMap<&str, usize> = AHashMap::new();
    let mut max_intensity: f64 = 0.0;

    for (index, id) in selection.iter().enumerate() {
        let id = id.as_ref();
        let Some(lang) = catalog.get_by_id(id) else {
            debug!("heatmap: skipping unknown language {id:?}");
            continue;
        };
        let color = colors.color_for(id, index);

        for c in &lang.countries {
            let Some(coordinates) = positions.get(&c.country_code) else {
                debug!("heatmap: no position for {}, leaving it out", c.country_code);
                continue;
            };
            let intensity = c.speaker_percentage;

            match slot_of.get(c.country_code.as_str()) {
                Some(&i) => {
                    let f = &mut features[i];
                    f.speaker_percentage = f.speaker_percentage.max(intensity);
                    f.intensity = f.intensity.max(intensity);
                    f.is_official |= c.is_official;
                    f.population = f.population.max(c.population);
                    f.contributing_language_ids.push(id.to_string());
                }
                None => {
                    slot_of.insert(c.country_code.as_str(), features.len());
                    features.push(HeatmapCountryFeature {
                        country_code: c.country_code.clone(),
                        country_name: c.country_name.clone(),
                        coordinates,
                        speaker_percentage: intensity,
                        is_official: c.is_official,
                        population: c.population,
                        contributing_language_ids: vec![id.to_string()],
                        intensity,
                        representative_color: color.clone(),
                    });
                }
            }
            max_intensity = max_intensity.max(intensity);
        }
    }

    let color_scale = if features.is_empty() {
        Vec::new()
    } else {
        color_scale(max_intensity)
    };

    HeatmapData {
        countries: features,
        max_intensity,
        color_scale,
    }
}

impl HeatmapData {
    /// GeoJSON `FeatureCollection` of `Point` features for the countries
    /// placed with geographic coordinates. Globe positions are skipped.
    pub fn to_geojson(&self) -> Value {
        let features: Vec<Value> = self
            .countries
            .iter()
            .filter_map(|c| match c.coordinates {
                Position::Geo(lon_lat) => Some(json!({
                    "type": "Feature",
                    "properties": {
                        "code": c.country_code,
                        "name": c.country_name,
                        "speakerPercentage": c.speaker_percentage,
                        "isOfficial": c.is_official,
                        "population": c.population,
                        "languages": c.contributing_language_ids,
                        "intensity": c.intensity,
                        "color": c.representative_color,
                    },
                    "geometry": {
                        "type": "Point",
                        "coordinates": lon_lat,
                    },
                })),
                Position::Render(_) => None,
            })
            .collect();
        json!({
            "type": "FeatureCollection",
            "features": features,
        })
    }
}
