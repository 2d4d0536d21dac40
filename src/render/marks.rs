//! Resolves aggregated data into positioned marks and axis ticks.

use crate::chart::{ChartData, ChartScales};
use crate::scale::{BandScale, LinearScale};
use anyhow::bail;
use serde::Serialize;

/// Bar fill colour (CSS "RoyalBlue").
pub const BAR_FILL: &str = "#4169e1";
/// Scatter point radius in pixels.
pub const POINT_RADIUS: f64 = 4.0;
/// Heatmap cell outline.
pub const CELL_STROKE: &str = "#ffffff";
/// Tick count requested for continuous axes.
pub const AXIS_TICKS: usize = 15;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarMark {
    pub category: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub fill: String,
    /// Total formatted to two decimals, drawn above the bar.
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointMark {
    pub cx: f64,
    pub cy: f64,
    pub r: f64,
    pub fill: String,
    pub category_color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellMark {
    pub category: String,
    pub year: i32,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub fill: String,
    pub stroke: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "items", rename_all = "snake_case")]
pub enum Marks {
    Bars(Vec<BarMark>),
    Points(Vec<PointMark>),
    Cells(Vec<CellMark>),
}

impl Marks {
    pub fn len(&self) -> usize {
        match self {
            Marks::Bars(bars) => bars.len(),
            Marks::Points(points) => points.len(),
            Marks::Cells(cells) => cells.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Positions every datum with the matching scales.
///
/// # Errors
///
/// Fails if `data` and `scales` belong to different chart kinds.
pub fn layout(data: &ChartData, scales: &ChartScales) -> anyhow::Result<Marks> {
    let marks = match (data, scales) {
        (ChartData::Bar(summary), ChartScales::Bar { x, y }) => {
            let baseline = y.map(0.0);
            Marks::Bars(
                summary
                    .iter()
                    .filter_map(|(category, total)| {
                        let top = y.map(total);
                        Some(BarMark {
                            category: category.clone(),
                            x: x.map(category)?,
                            y: top.min(baseline),
                            width: x.bandwidth(),
                            height: (baseline - top).abs(),
                            fill: BAR_FILL.to_string(),
                            label: format!("{total:.2}"),
                        })
                    })
                    .collect(),
            )
        }
        (
            ChartData::Scatter(sample),
            ChartScales::Scatter {
                x,
                y,
                fill,
                category,
            },
        ) => Marks::Points(
            sample
                .points()
                .iter()
                .map(|p| PointMark {
                    cx: x.map(p.sales),
                    cy: y.map(p.profit),
                    r: POINT_RADIUS,
                    fill: fill.map(p.discount),
                    category_color: category.map(&p.category).unwrap_or_default().to_string(),
                })
                .collect(),
        ),
        (ChartData::Heatmap(summary), ChartScales::Heatmap { x, y, fill, .. }) => Marks::Cells(
            summary
                .iter()
                .filter_map(|(key, total)| {
                    Some(CellMark {
                        category: key.category.clone(),
                        year: key.year,
                        x: x.map(&key.category)?,
                        y: y.map(&key.year)?,
                        width: x.bandwidth(),
                        height: y.bandwidth(),
                        fill: fill.map(total),
                        stroke: CELL_STROKE.to_string(),
                    })
                })
                .collect(),
        ),
        _ => bail!("scales do not match {} data", data.kind()),
    };
    Ok(marks)
}

/// An axis: where it sits and its labelled ticks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    pub orient: &'static str,
    pub ticks: Vec<Tick>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tick {
    pub position: f64,
    pub label: String,
}

/// Bottom and left axes for the chart's position scales.
pub fn axes(scales: &ChartScales) -> Vec<Axis> {
    match scales {
        ChartScales::Bar { x, y } => vec![band_axis("bottom", x), linear_axis("left", y)],
        ChartScales::Scatter { x, y, .. } => vec![linear_axis("bottom", x), linear_axis("left", y)],
        ChartScales::Heatmap { x, y, .. } => vec![band_axis("bottom", x), band_axis("left", y)],
    }
}

fn band_axis<K: PartialEq + Clone + ToString>(orient: &'static str, scale: &BandScale<K>) -> Axis {
    Axis {
        orient,
        ticks: scale
            .domain()
            .iter()
            .filter_map(|key| {
                Some(Tick {
                    position: scale.center(key)?,
                    label: key.to_string(),
                })
            })
            .collect(),
    }
}

fn linear_axis(orient: &'static str, scale: &LinearScale) -> Axis {
    Axis {
        orient,
        ticks: scale
            .ticks(AXIS_TICKS)
            .into_iter()
            .map(|value| Tick {
                position: scale.map(value),
                label: value.to_string(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::ChartKind;
    use crate::config::ChartConfig;
    use crate::records::SalesRow;

    fn bar_rows() -> Vec<SalesRow> {
        [("A", 10.0), ("B", 5.0), ("A", 3.0)]
            .into_iter()
            .map(|(category, profit)| SalesRow {
                category: Some(category.to_string()),
                profit: Some(profit),
                ..Default::default()
            })
            .collect()
    }

    #[test]
    fn test_bar_layout() {
        let config = ChartConfig::bar();
        let data = ChartKind::Bar.aggregate(&bar_rows(), &config).unwrap();
        let scales = data.compute_scales(&config).unwrap();

        let Marks::Bars(bars) = layout(&data, &scales).unwrap() else {
            panic!("expected bars");
        };
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].category, "A");
        assert_eq!(bars[0].y, 0.0);
        assert_eq!(bars[0].height, config.inner_height());
        assert_eq!(bars[0].label, "13.00");
        assert!(bars[0].x < bars[1].x);
        assert!((bars[1].height - config.inner_height() * 5.0 / 13.0).abs() < 1e-9);
    }

    #[test]
    fn test_negative_bar_hangs_below_baseline() {
        let config = ChartConfig::bar();
        let rows = vec![
            SalesRow {
                category: Some("Loss".into()),
                profit: Some(-5.0),
                ..Default::default()
            },
            SalesRow {
                category: Some("Win".into()),
                profit: Some(15.0),
                ..Default::default()
            },
        ];
        let data = ChartKind::Bar.aggregate(&rows, &config).unwrap();
        let scales = data.compute_scales(&config).unwrap();
        let Marks::Bars(bars) = layout(&data, &scales).unwrap() else {
            panic!("expected bars");
        };
        let ChartScales::Bar { y, .. } = &scales else {
            panic!("expected bar scales");
        };
        assert_eq!(bars[0].y, y.map(0.0));
        assert!(bars[0].height > 0.0);
    }

    #[test]
    fn test_mismatched_scales_rejected() {
        let config = ChartConfig::bar();
        let bar = ChartKind::Bar.aggregate(&bar_rows(), &config).unwrap();
        let scatter_rows = vec![SalesRow {
            category: Some("A".into()),
            sales: Some(1.0),
            profit: Some(1.0),
            discount: Some(0.0),
            ..Default::default()
        }];
        let scatter = ChartKind::Scatter.aggregate(&scatter_rows, &config).unwrap();
        let scatter_scales = scatter.compute_scales(&config).unwrap();

        assert!(layout(&bar, &scatter_scales).is_err());
    }

    #[test]
    fn test_bar_axes() {
        let config = ChartConfig::bar();
        let data = ChartKind::Bar.aggregate(&bar_rows(), &config).unwrap();
        let scales = data.compute_scales(&config).unwrap();
        let axes = axes(&scales);

        assert_eq!(axes[0].orient, "bottom");
        let labels: Vec<_> = axes[0].ticks.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, vec!["A", "B"]);

        assert_eq!(axes[1].orient, "left");
        assert_eq!(axes[1].ticks.first().map(|t| t.label.as_str()), Some("0"));
    }
}
