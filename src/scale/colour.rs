//! Colour palettes and gradient sampling.
//!
//! Stops are parsed with `csscolorparser`, so any CSS colour works
//! ("steelblue", "#f00", "rgb(0, 128, 255)"). Gradients are sampled in a
//! chosen colour space using `palette`.

use super::ScaleError;
use palette::{FromColor, IntoColor, LinSrgb, Mix, Oklab, Srgb};
use serde::Serialize;

// =============================================================================
// Palettes
// =============================================================================

/// Tableau 10, the default categorical palette.
pub const TABLEAU10: &[&str] = &[
    "#4e79a7", "#f28e2b", "#e15759", "#76b7b2", "#59a14f",
    "#edc948", "#b07aa1", "#ff9da7", "#9c755f", "#bab0ac",
];

/// ColorBrewer OrRd, used for the scatter discount fill.
pub const OR_RD: &[&str] = &[
    "#fff7ec", "#fee8c8", "#fdd49e", "#fdbb84", "#fc8d59",
    "#ef6548", "#d7301f", "#b30000", "#7f0000",
];

/// ColorBrewer YlOrRd, used for the heatmap quantity fill.
pub const YL_OR_RD: &[&str] = &[
    "#ffffcc", "#ffeda0", "#fed976", "#feb24c", "#fd8d3c",
    "#fc4e2a", "#e31a1c", "#bd0026", "#800026",
];

pub const BLUES: &[&str] = &[
    "#f7fbff", "#deebf7", "#c6dbef", "#9ecae1", "#6baed6",
    "#4292c6", "#2171b5", "#08519c", "#08306b",
];

pub const REDS: &[&str] = &[
    "#fff5f0", "#fee0d2", "#fcbba1", "#fc9272", "#fb6a4a",
    "#ef3b2c", "#cb181d", "#a50f15", "#67000d",
];

pub const GREENS: &[&str] = &[
    "#f7fcf5", "#e5f5e0", "#c7e9c0", "#a1d99b", "#74c476",
    "#41ab5d", "#238b45", "#006d2c", "#00441b",
];

/// ColorBrewer RdBu, diverging.
pub const RD_BU: &[&str] = &[
    "#67001f", "#b2182b", "#d6604d", "#f4a582", "#fddbc7",
    "#f7f7f7", "#d1e5f0", "#92c5de", "#4393c3", "#2166ac", "#053061",
];

/// Looks up a sequential or diverging ramp by (case-insensitive) name.
pub fn ramp_by_name(name: &str) -> Option<&'static [&'static str]> {
    match name.to_lowercase().as_str() {
        "orrd" => Some(OR_RD),
        "ylorrd" => Some(YL_OR_RD),
        "blues" => Some(BLUES),
        "reds" => Some(REDS),
        "greens" => Some(GREENS),
        "rdbu" => Some(RD_BU),
        _ => None,
    }
}

// =============================================================================
// Interpolation
// =============================================================================

/// Colour space a gradient is interpolated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorSpace {
    /// Perceptually uniform; avoids muddy midpoints.
    #[default]
    Oklab,
    LinearRgb,
}

/// Parsed colour stops that can be sampled at any `t` in `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorRamp {
    stops: Vec<LinSrgb<f32>>,
    space: ColorSpace,
}

impl ColorRamp {
    pub fn new(stops: &[impl AsRef<str>], space: ColorSpace) -> Result<Self, ScaleError> {
        if stops.is_empty() {
            return Err(ScaleError::EmptyPalette);
        }
        let stops = stops
            .iter()
            .map(|s| parse_color(s.as_ref()).map(|c| c.into_linear()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { stops, space })
    }

    /// Colour at position `t`, clamped to the ends of the ramp.
    pub fn sample(&self, t: f64) -> String {
        let last = self.stops.len() - 1;
        if last == 0 {
            return to_hex(self.stops[0]);
        }

        let t = (if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) }) as f32;
        let position = t * last as f32;
        let segment = (position.floor() as usize).min(last - 1);
        let local = position - segment as f32;

        let (from, to) = (self.stops[segment], self.stops[segment + 1]);
        let mixed = match self.space {
            ColorSpace::Oklab => {
                let from = Oklab::from_color(from);
                let mixed = from.mix(Oklab::from_color(to), local);
                mixed.into_color()
            }
            ColorSpace::LinearRgb => from.mix(to, local),
        };
        to_hex(mixed)
    }
}

/// Normalizes any CSS colour to `#rrggbb`.
pub fn color_to_hex(value: &str) -> Result<String, ScaleError> {
    parse_color(value).map(|c| to_hex(c.into_linear()))
}

fn parse_color(value: &str) -> Result<Srgb<f32>, ScaleError> {
    let parsed = csscolorparser::parse(value).map_err(|e| ScaleError::InvalidColor {
        value: value.to_string(),
        message: e.to_string(),
    })?;
    Ok(Srgb::new(parsed.r as f32, parsed.g as f32, parsed.b as f32))
}

fn to_hex(color: LinSrgb<f32>) -> String {
    let srgb = Srgb::from_linear(color);
    let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!(
        "#{:02x}{:02x}{:02x}",
        channel(srgb.red),
        channel(srgb.green),
        channel(srgb.blue)
    )
}
