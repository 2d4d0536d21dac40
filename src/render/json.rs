//! Writes chart documents as JSON files.

use super::{ChartDocument, Frame, Renderer};
use anyhow::{Context, Result};
use async_trait::async_trait;
use flate2::Compression;
use flate2::write::GzEncoder;
use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, info};

/// Serializes a document to pretty JSON, gzip-compressed if requested.
pub fn encode_document(document: &ChartDocument<'_>, gzip: bool) -> Result<Vec<u8>> {
    let json = serde_json::to_vec_pretty(document)?;
    if !gzip {
        return Ok(json);
    }

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&json)?;
    Ok(encoder.finish()?)
}

/// Writes one `<container>.json` (or `.json.gz`) per chart into `output_dir`.
///
/// Each render replaces the previous file.
#[derive(Debug, Clone)]
pub struct JsonRenderer {
    output_dir: PathBuf,
    gzip: bool,
}

impl JsonRenderer {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            gzip: false,
        }
    }

    pub fn gzip(mut self, gzip: bool) -> Self {
        self.gzip = gzip;
        self
    }

    /// Path the document for `container` is written to.
    pub fn path_for(&self, container: &str) -> PathBuf {
        let suffix = if self.gzip { ".json.gz" } else { ".json" };
        self.output_dir.join(format!("{container}{suffix}"))
    }
}

#[async_trait]
impl Renderer for JsonRenderer {
    async fn render(&self, frame: &Frame<'_>) -> Result<()> {
        let document = ChartDocument::from_frame(frame)?;
        let body = encode_document(&document, self.gzip)?;
        let path = self.path_for(&frame.config.container);

        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .with_context(|| format!("creating {}", self.output_dir.display()))?;
        debug!(path = %path.display(), bytes = body.len(), "Writing chart document");
        tokio::fs::write(&path, body)
            .await
            .with_context(|| format!("writing {}", path.display()))?;

        info!(chart = %frame.kind, path = %path.display(), marks = document.marks.len(), "Chart written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{ChartData, ChartKind};
    use crate::config::ChartConfig;
    use crate::records::Summary;
    use flate2::read::GzDecoder;
    use std::io::Read;

    fn bar_data() -> ChartData {
        ChartData::Bar(Summary::new().with("A".to_string(), 13.0).with("B".to_string(), 5.0))
    }

    #[tokio::test]
    async fn test_render_writes_document() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = JsonRenderer::new(dir.path());
        let config = ChartConfig::bar();
        let data = bar_data();
        let scales = data.compute_scales(&config).unwrap();
        let frame = Frame {
            kind: ChartKind::Bar,
            config: &config,
            data: &data,
            scales: &scales,
        };

        renderer.render(&frame).await.unwrap();
        renderer.render(&frame).await.unwrap();

        let content = std::fs::read_to_string(dir.path().join("barChart.json")).unwrap();
        let json: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(json["kind"], "bar");
        assert_eq!(json["marks"]["type"], "bars");
        assert_eq!(json["marks"]["items"].as_array().unwrap().len(), 2);
        assert_eq!(json["data"]["entries"][0]["key"], "A");
    }

    #[tokio::test]
    async fn test_render_gzip() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = JsonRenderer::new(dir.path()).gzip(true);
        let config = ChartConfig::bar();
        let data = bar_data();
        let scales = data.compute_scales(&config).unwrap();
        let frame = Frame {
            kind: ChartKind::Bar,
            config: &config,
            data: &data,
            scales: &scales,
        };
        renderer.render(&frame).await.unwrap();

        let path = renderer.path_for("barChart");
        assert!(path.to_string_lossy().ends_with("barChart.json.gz"));
        let compressed = std::fs::read(path).unwrap();
        let mut json = String::new();
        GzDecoder::new(compressed.as_slice())
            .read_to_string(&mut json)
            .unwrap();
        assert!(json.contains("\"bars\""));
    }
}
