//! Conversion of the active target into a persisted Markdown record.

use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::boundary::{ExtractionBoundary, ExtractionRequest};
use crate::engine::MarkdownRuleEngine;
use crate::error::ConversionError;
use crate::extract::{ExtractOptions, ExtractionResult};
use crate::node::Node;
use crate::store::ConversionStore;

/// Class of the container the title and content are wrapped in
pub const CONTENT_CONTAINER_CLASS: &str = "markdown-content";

/// The result of one successful conversion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionRecord {
    /// Location of the converted document
    pub url: String,
    pub markdown: String,
    /// ISO-8601 UTC instant with millisecond precision
    pub timestamp: String,
}

impl ConversionRecord {
    pub fn new(url: impl Into<String>, markdown: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            url: url.into(),
            markdown: markdown.into(),
            timestamp: at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// Converts the active target to Markdown and records the result.
///
/// One conversion runs at a time; a call made while another is in flight
/// fails with [`ConversionError::Busy`].
pub struct Converter {
    boundary: Arc<dyn ExtractionBoundary>,
    store: Arc<dyn ConversionStore>,
    engine: MarkdownRuleEngine,
    options: ExtractOptions,
    in_flight: Mutex<()>,
}

impl Converter {
    pub fn new(boundary: Arc<dyn ExtractionBoundary>, store: Arc<dyn ConversionStore>) -> Self {
        Self {
            boundary,
            store,
            engine: MarkdownRuleEngine::page(),
            options: ExtractOptions::default(),
            in_flight: Mutex::new(()),
        }
    }

    pub fn with_options(mut self, options: ExtractOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_engine(mut self, engine: MarkdownRuleEngine) -> Self {
        self.engine = engine;
        self
    }

    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    pub fn store(&self) -> &Arc<dyn ConversionStore> {
        &self.store
    }

    pub async fn convert(&self) -> Result<ConversionRecord, ConversionError> {
        let _guard = self
            .in_flight
            .try_lock()
            .map_err(|_| ConversionError::Busy)?;

        let target = self
            .boundary
            .active_target()
            .await
            .ok_or(ConversionError::NoActiveTarget)?;

        let request = ExtractionRequest {
            target: target.id,
            options: self.options,
        };
        let (title, content) = match self.boundary.execute(request).await? {
            ExtractionResult::Success { title, content } => (title, content),
            ExtractionResult::Failure { message } => {
                return Err(ConversionError::ContentExtractionFailure(message))
            }
        };

        let record = ConversionRecord::new(target.url, self.render(&title, &content), Utc::now());
        info!(url = %record.url, bytes = record.markdown.len(), "converted page");

        // The record is still returned when it cannot be persisted.
        if let Err(error) = self.store.put(&record).await {
            warn!(%error, "failed to store conversion");
        }

        Ok(record)
    }

    /// Markdown for an extracted title and content fragment
    pub fn render(&self, title: &str, content: &str) -> String {
        let heading = Node::element("h1").with_child(Node::text(title)).outer_html();
        self.engine.serialize_html(&format!(
            "<div class=\"{CONTENT_CONTAINER_CLASS}\">{heading}{content}</div>"
        ))
    }
}
