//! Per-chart layout configuration.

use crate::aggregate::DEFAULT_SAMPLE_CAP;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Inset of the plotting area from each edge of the outer box, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Margin {
    pub fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }
}

/// Layout of a single chart. `width` and `height` are the outer size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Identifier of the target container; also names the output document.
    pub container: String,
    pub width: f64,
    pub height: f64,
    pub margin: Margin,
    /// Maximum number of scatter points. Ignored by other chart kinds.
    pub sample_cap: usize,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            container: "chart".to_string(),
            width: 700.0,
            height: 500.0,
            margin: Margin::default(),
            sample_cap: DEFAULT_SAMPLE_CAP,
        }
    }
}

impl ChartConfig {
    /// Width of the plotting area inside the margins.
    pub fn inner_width(&self) -> f64 {
        (self.width - self.margin.left - self.margin.right).max(0.0)
    }

    /// Height of the plotting area inside the margins.
    pub fn inner_height(&self) -> f64 {
        (self.height - self.margin.top - self.margin.bottom).max(0.0)
    }

    pub fn bar() -> Self {
        Self {
            container: "barChart".to_string(),
            width: 570.0,
            height: 350.0,
            margin: Margin::new(50.0, 50.0, 50.0, 70.0),
            ..Default::default()
        }
    }

    pub fn scatter() -> Self {
        Self {
            container: "disper".to_string(),
            width: 530.0,
            height: 330.0,
            margin: Margin::new(30.0, 30.0, 50.0, 50.0),
            ..Default::default()
        }
    }

    pub fn heatmap() -> Self {
        Self {
            container: "heatmap".to_string(),
            width: 580.0,
            height: 400.0,
            margin: Margin::new(50.0, 30.0, 50.0, 50.0),
            ..Default::default()
        }
    }
}

/// Configuration for the three dashboard charts.
///
/// Stored as a JSON object on disk. Each section overlays that chart's
/// preset, so any section or field may be omitted:
/// ```json
/// {
///   "bar": { "width": 600, "margin": { "left": 90 } },
///   "scatter": { "sample_cap": 500 }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "DashboardFile")]
pub struct DashboardConfig {
    pub bar: ChartConfig,
    pub scatter: ChartConfig,
    pub heatmap: ChartConfig,
}

/// On-disk form of [`DashboardConfig`]: every field optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DashboardFile {
    bar: ChartOverride,
    scatter: ChartOverride,
    heatmap: ChartOverride,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ChartOverride {
    container: Option<String>,
    width: Option<f64>,
    height: Option<f64>,
    margin: MarginOverride,
    sample_cap: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct MarginOverride {
    top: Option<f64>,
    right: Option<f64>,
    bottom: Option<f64>,
    left: Option<f64>,
}

impl ChartOverride {
    fn apply(self, preset: ChartConfig) -> ChartConfig {
        let margin = preset.margin;
        ChartConfig {
            container: self.container.unwrap_or(preset.container),
            width: self.width.unwrap_or(preset.width),
            height: self.height.unwrap_or(preset.height),
            margin: Margin {
                top: self.margin.top.unwrap_or(margin.top),
                right: self.margin.right.unwrap_or(margin.right),
                bottom: self.margin.bottom.unwrap_or(margin.bottom),
                left: self.margin.left.unwrap_or(margin.left),
            },
            sample_cap: self.sample_cap.unwrap_or(preset.sample_cap),
        }
    }
}

impl From<DashboardFile> for DashboardConfig {
    fn from(file: DashboardFile) -> Self {
        Self {
            bar: file.bar.apply(ChartConfig::bar()),
            scatter: file.scatter.apply(ChartConfig::scatter()),
            heatmap: file.heatmap.apply(ChartConfig::heatmap()),
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            bar: ChartConfig::bar(),
            scatter: ChartConfig::scatter(),
            heatmap: ChartConfig::heatmap(),
        }
    }
}

impl DashboardConfig {
    /// Loads the config from a JSON file at `path`.
    pub fn load(path: &str) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).with_context(|| format!("reading config '{path}'"))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("parsing config '{path}'"))?;
        Ok(config)
    }
}
