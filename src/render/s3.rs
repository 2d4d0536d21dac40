//! Publishes chart documents to S3.

use super::json::encode_document;
use super::{ChartDocument, Frame, Renderer};
use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::info;

/// Uploads each chart document to `s3://<bucket>/<prefix><container>.json`.
pub struct S3Renderer {
    client: aws_sdk_s3::Client,
    bucket: String,
    prefix: String,
    gzip: bool,
}

impl S3Renderer {
    pub fn new(client: aws_sdk_s3::Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            prefix: "charts/".to_string(),
            gzip: false,
        }
    }

    /// Creates a renderer from the ambient AWS environment.
    pub async fn from_env(bucket: impl Into<String>) -> Self {
        let config = aws_config::load_from_env().await;
        Self::new(aws_sdk_s3::Client::new(&config), bucket)
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn gzip(mut self, gzip: bool) -> Self {
        self.gzip = gzip;
        self
    }

    pub fn key_for(&self, document: &ChartDocument<'_>) -> String {
        let suffix = if self.gzip { ".gz" } else { "" };
        format!("{}{}{}", self.prefix, document.file_name(), suffix)
    }
}

#[async_trait]
impl Renderer for S3Renderer {
    async fn render(&self, frame: &Frame<'_>) -> Result<()> {
        let document = ChartDocument::from_frame(frame)?;
        let body = encode_document(&document, self.gzip)?;
        let key = self.key_for(&document);

        let mut request = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(body.into())
            .content_type("application/json");
        if self.gzip {
            request = request.content_encoding("gzip");
        }
        request
            .send()
            .await
            .with_context(|| format!("uploading s3://{}/{}", self.bucket, key))?;

        info!(chart = %frame.kind, bucket = %self.bucket, key = %key, "Chart uploaded");
        Ok(())
    }
}
