//! Color assignment and heatmap styling.
//!
//! Design:
//! - Language colors come from an injected [`ColorAssignment`] strategy keyed by
//!   language id and selection index; the aggregators never pick colors themselves.
//! - Country intensity (0..=100) maps to a fixed six-band legend, a smooth fill
//!   ramp for map layers, and an HSL marker color for the globe.

use crate::catalog::Catalog;
use crate::models::ColorBand;
use serde::Serialize;
use std::borrow::Cow;

/// Chooses a display color for the `index`-th selected language.
pub trait ColorAssignment {
    fn color_for(&self, language_id: &str, index: usize) -> String;
}

impl<F> ColorAssignment for F
where
    F: Fn(&str, usize) -> String,
{
    fn color_for(&self, language_id: &str, index: usize) -> String {
        self(language_id, index)
    }
}

/// Default selection palette (hex).
pub const LANGUAGE_PALETTE: [&str; 15] = [
    "#3B82F6", // blue
    "#EF4444", // red
    "#10B981", // emerald
    "#F59E0B", // amber
    "#8B5CF6", // violet
    "#EC4899", // pink
    "#06B6D4", // cyan
    "#84CC16", // lime
    "#F97316", // orange
    "#A855F7", // purple
    "#F43F5E", // rose
    "#22C55E", // green
    "#EAB308", // yellow
    "#6366F1", // indigo
    "#14B8A6", // teal
];

/// Cycles through a fixed list of colors by selection index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<String>,
}

impl Palette {
    /// An empty list falls back to [`LANGUAGE_PALETTE`].
    pub fn new<S: Into<String>>(colors: impl IntoIterator<Item = S>) -> Self {
        let colors: Vec<String> = colors.into_iter().map(Into::into).collect();
        if colors.is_empty() {
            Self::default()
        } else {
            Self { colors }
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::new(LANGUAGE_PALETTE)
    }
}

impl ColorAssignment for Palette {
    fn color_for(&self, _language_id: &str, index: usize) -> String {
        self.colors[index % self.colors.len()].clone()
    }
}

/// Uses each language's own `color_token` from the catalog, falling back to
/// [`Palette`] for ids the catalog does not know.
#[derive(Debug, Clone, Copy)]
pub struct LanguageTokens<'a>(pub &'a Catalog);

impl ColorAssignment for LanguageTokens<'_> {
    fn color_for(&self, language_id: &str, index: usize) -> String {
        match self.0.get_by_id(language_id) {
            Some(lang) if !lang.color_token.is_empty() => lang.color_token.clone(),
            _ => Palette::default().color_for(language_id, index),
        }
    }
}

// ------------------------ Legend bands ------------------------

/// The heatmap legend, lowest band first.
pub static HEATMAP_BANDS: [ColorBand; 6] = [
    band(0.0, 10.0, "#FEF3C7"),  // very light yellow
    band(10.0, 25.0, "#FDE68A"), // light yellow
    band(25.0, 50.0, "#FBBF24"), // yellow
    band(50.0, 75.0, "#F59E0B"), // orange
    band(75.0, 90.0, "#DC2626"), // red
    band(90.0, 100.0, "#7C2D12"), // dark red
];

const fn band(min: f64, max: f64, color: &'static str) -> ColorBand {
    ColorBand {
        min,
        max,
        color: Cow::Borrowed(color),
    }
}

/// Legend bands whose lower bound is at or below `max_intensity`.
pub fn color_scale(max_intensity: f64) -> Vec<ColorBand> {
    HEATMAP_BANDS
        .iter()
        .filter(|b| b.min <= max_intensity)
        .cloned()
        .collect()
}

/// The band containing `intensity`. Values above 100 land in the top band,
/// values below 0 in the bottom one.
pub fn band_for(intensity: f64) -> &'static ColorBand {
    HEATMAP_BANDS
        .iter()
        .rev()
        .find(|b| intensity >= b.min)
        .unwrap_or(&HEATMAP_BANDS[0])
}

// ------------------------ Map fill ramp ------------------------

const FILL_STOPS: [(f64, Rgb8, f64); 5] = [
    (0.0, Rgb8::new(0xFE, 0xF3, 0xC7), 0.3),
    (25.0, Rgb8::new(0xFB, 0xBF, 0x24), 0.5),
    (50.0, Rgb8::new(0xF5, 0x9E, 0x0B), 0.7),
    (75.0, Rgb8::new(0xDC, 0x26, 0x26), 0.8),
    (100.0, Rgb8::new(0x7C, 0x2D, 0x12), 0.9),
];

/// Fill color and opacity for a country polygon, linearly interpolated
/// between the ramp stops.
pub fn fill_style(intensity: f64) -> FillStyle {
    let x = if intensity.is_nan() { 0.0 } else { intensity.clamp(0.0, 100.0) };
    let upper = FILL_STOPS
        .iter()
        .position(|(stop, _, _)| x <= *stop)
        .unwrap_or(FILL_STOPS.len() - 1);
    let (rgb, opacity) = if upper == 0 {
        (FILL_STOPS[0].1, FILL_STOPS[0].2)
    } else {
        let (x0, c0, o0) = FILL_STOPS[upper - 1];
        let (x1, c1, o1) = FILL_STOPS[upper];
        let t = (x - x0) / (x1 - x0);
        (lerp_rgb(c0, c1, t), o0 + (o1 - o0) * t)
    };
    FillStyle {
        rgb,
        hex: rgb_to_hex(rgb),
        opacity,
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FillStyle {
    pub rgb: Rgb8,
    pub hex: String,
    pub opacity: f64,
}

// ------------------------ Globe markers ------------------------

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Hsl {
    pub h_deg: f64, // 0..360
    pub s: f64,     // 0..1
    pub l: f64,     // 0..1
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MarkerStyle {
    pub hsl: Hsl,
    pub rgb: Rgb8,
    pub hex: String,
    /// Sphere radius in globe scene units.
    pub radius: f64,
}

/// Globe marker for a country: hue shifts from blue toward violet and the
/// marker grows with the speaker percentage.
pub fn marker_style(speaker_percentage: f64) -> MarkerStyle {
    let i = if speaker_percentage.is_nan() {
        0.0
    } else {
        speaker_percentage.clamp(0.0, 100.0) / 100.0
    };
    let hsl = Hsl {
        h_deg: 210.0 + i * 60.0,
        s: clamp01(0.70 + i * 0.30),
        l: clamp01(0.50 + i * 0.30),
    };
    let rgb = hsl_to_rgb8(hsl);
    MarkerStyle {
        hsl,
        rgb,
        hex: rgb_to_hex(rgb),
        radius: 0.05 + i * 0.1,
    }
}

// ------------------------ Utilities ------------------------

fn clamp01(x: f64) -> f64 {
    x.clamp(0.0, 1.0)
}

fn lerp_rgb(a: Rgb8, b: Rgb8, t: f64) -> Rgb8 {
    let mix = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * t).round() as u8;
    Rgb8 {
        r: mix(a.r, b.r),
        g: mix(a.g, b.g),
        b: mix(a.b, b.b),
    }
}

// HSL -> RGB conversion
fn hsl_to_rgb8(hsl: Hsl) -> Rgb8 {
    let h = (hsl.h_deg % 360.0) / 360.0;
    let s = clamp01(hsl.s);
    let l = clamp01(hsl.l);

    if s == 0.0 {
        let v = (l * 255.0).round() as u8;
        return Rgb8 { r: v, g: v, b: v };
    }

    let q = if l < 0.5 {
        l * (1.0 + s)
    } else {
        l + s - l * s
    };
    let p = 2.0 * l - q;

    fn hue_to_rgb(p: f64, q: f64, mut t: f64) -> f64 {
        if t < 0.0 {
            t += 1.0;
        }
        if t > 1.0 {
            t -= 1.0;
        }
        if t < 1.0 / 6.0 {
            p + (q - p) * 6.0 * t
        } else if t < 1.0 / 2.0 {
            q
        } else if t < 2.0 / 3.0 {
            p + (q - p) * (2.0 / 3.0 - t) * 6.0
        } else {
            p
        }
    }

    let r = hue_to_rgb(p, q, h + 1.0 / 3.0);
    let g = hue_to_rgb(p, q, h);
    let b = hue_to_rgb(p, q, h - 1.0 / 3.0);

    Rgb8 {
        r: (r * 255.0).round() as u8,
        g: (g * 255.0).round() as u8,
        b: (b * 255.0).round() as u8,
    }
}

pub fn rgb_to_hex(rgb: Rgb8) -> String {
    format!("#{:02X}{:02X}{:02X}", rgb.r, rgb.g, rgb.b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_wraps_by_index() {
        let p = Palette::new(["#111111", "#222222"]);
        assert_eq!(p.color_for("a", 0), "#111111");
        assert_eq!(p.color_for("b", 1), "#222222");
        assert_eq!(p.color_for("c", 2), "#111111");
        assert_eq!(Palette::new(Vec::<String>::new()), Palette::default());
    }

    #[test]
    fn closures_are_color_strategies() {
        let strategy = |id: &str, i: usize| format!("{id}-{i}");
        assert_eq!(strategy.color_for("english", 3), "english-3");
    }

    #[test]
    fn scale_hides_bands_above_maximum() {
        let colors = |max: f64| -> Vec<String> {
            color_scale(max).into_iter().map(|b| b.color.into_owned()).collect()
        };
        assert_eq!(colors(5.0), ["#FEF3C7"]);
        assert_eq!(colors(25.0), ["#FEF3C7", "#FDE68A", "#FBBF24"]);
        assert_eq!(colors(100.0).len(), 6);
        assert!(colors(-1.0).is_empty());
    }

    #[test]
    fn band_lookup_uses_half_open_ranges() {
        assert_eq!(band_for(0.0).color, "#FEF3C7");
        assert_eq!(band_for(9.99).color, "#FEF3C7");
        assert_eq!(band_for(10.0).color, "#FDE68A");
        assert_eq!(band_for(89.9).color, "#DC2626");
        assert_eq!(band_for(100.0).color, "#7C2D12");
        assert_eq!(band_for(-3.0).color, "#FEF3C7");
    }

    #[test]
    fn fill_ramp_hits_stops_and_interpolates() {
        let lo = fill_style(0.0);
        assert_eq!(lo.hex, "#FEF3C7");
        assert!((lo.opacity - 0.3).abs() < 1e-9);

        let top = fill_style(100.0);
        assert_eq!(top.hex, "#7C2D12");
        assert!((top.opacity - 0.9).abs() < 1e-9);

        let mid = fill_style(62.5);
        assert!((mid.opacity - 0.75).abs() < 1e-9);
        assert_eq!(fill_style(250.0), top);
    }

    #[test]
    fn marker_grows_with_percentage() {
        let none = marker_style(0.0);
        let full = marker_style(100.0);
        assert!((none.radius - 0.05).abs() < 1e-9);
        assert!((full.radius - 0.15).abs() < 1e-9);
        assert_eq!(none.hsl.h_deg, 210.0);
        assert_eq!(full.hsl.h_deg, 270.0);
        // hsl(210, 70%, 50%)
        assert_eq!((none.rgb.r, none.rgb.b), (0x26, 0xD9));
        // hsl(270, 100%, 80%)
        assert_eq!(full.hex, "#CC99FF");
    }
}
