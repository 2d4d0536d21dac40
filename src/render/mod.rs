//! Renderer contract and the built-in document renderers.
//!
//! A renderer receives a [`Frame`]: the chart's aggregated data plus the
//! scales derived from it. It must tolerate being called repeatedly and
//! redraw from scratch each time.

pub mod json;
pub mod marks;
pub mod s3;

pub use json::JsonRenderer;
pub use marks::{Axis, Marks, Tick};
pub use s3::S3Renderer;

use crate::chart::{ChartData, ChartKind, ChartScales};
use crate::config::ChartConfig;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Everything a renderer needs to draw one chart.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub kind: ChartKind,
    pub config: &'a ChartConfig,
    pub data: &'a ChartData,
    pub scales: &'a ChartScales,
}

/// Draws a [`Frame`] onto some surface.
#[async_trait]
pub trait Renderer: Send + Sync {
    async fn render(&self, frame: &Frame<'_>) -> anyhow::Result<()>;
}

/// Self-contained, serializable description of a drawn chart.
#[derive(Debug, Serialize)]
pub struct ChartDocument<'a> {
    pub schema_version: u8,
    pub generated_at: DateTime<Utc>,
    pub kind: ChartKind,
    pub config: &'a ChartConfig,
    pub data: &'a ChartData,
    pub scales: &'a ChartScales,
    pub axes: Vec<Axis>,
    pub marks: Marks,
}

impl<'a> ChartDocument<'a> {
    pub fn from_frame(frame: &Frame<'a>) -> anyhow::Result<Self> {
        Ok(Self {
            schema_version: 1,
            generated_at: Utc::now(),
            kind: frame.kind,
            config: frame.config,
            data: frame.data,
            scales: frame.scales,
            axes: marks::axes(frame.scales),
            marks: marks::layout(frame.data, frame.scales)?,
        })
    }

    /// File or object name for this document, derived from the container.
    pub fn file_name(&self) -> String {
        format!("{}.json", self.config.container)
    }
}
