//! The request/response contract between the conversion front end and the
//! context that owns a target document.
//!
//! Extraction runs next to the document, possibly in another process, so it
//! is modeled as an RPC: an [`ExtractionRequest`] goes out and either an
//! [`ExtractionResult`] or a [`BoundaryError`] comes back. Both sides of the
//! exchange are plain serializable values.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tokio::task;
use tracing::debug;
use url::Url;

use crate::error::BoundaryError;
use crate::extract::{extract, ExtractOptions, ExtractionResult, ExtractionTarget};

/// URL schemes whose documents extraction may run in
pub const SCRIPTABLE_SCHEMES: &[&str] = &["http", "https", "file"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetId(pub u64);

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An addressable target, such as an open tab
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub id: TargetId,
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionRequest {
    pub target: TargetId,
    #[serde(flatten)]
    pub options: ExtractOptions,
}

#[async_trait]
pub trait ExtractionBoundary: Send + Sync {
    /// The target a conversion should run against, if any
    async fn active_target(&self) -> Option<Target>;

    /// Run the extractor inside the target's context
    async fn execute(&self, request: ExtractionRequest) -> Result<ExtractionResult, BoundaryError>;
}

/// Whether extraction may run in a document at `location`
pub fn is_scriptable(location: &str) -> bool {
    Url::parse(location)
        .map(|url| SCRIPTABLE_SCHEMES.contains(&url.scheme()))
        .unwrap_or(false)
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    targets: HashMap<TargetId, Arc<dyn ExtractionTarget>>,
    active: Option<TargetId>,
}

/// In-process boundary over a set of registered targets.
///
/// The extractor runs on the blocking pool and its result is passed through
/// JSON, the same as it would be across a process boundary.
#[derive(Default)]
pub struct LocalBoundary {
    registry: RwLock<Registry>,
}

impl LocalBoundary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a target and make it the active one
    pub async fn open<T>(&self, target: T) -> TargetId
    where
        T: ExtractionTarget + 'static,
    {
        let mut registry = self.registry.write().await;
        registry.next_id += 1;
        let id = TargetId(registry.next_id);
        debug!(target = %id, location = target.location(), "opened target");
        registry.targets.insert(id, Arc::new(target));
        registry.active = Some(id);
        id
    }

    /// Make a registered target the active one
    pub async fn activate(&self, id: TargetId) -> bool {
        let mut registry = self.registry.write().await;
        if registry.targets.contains_key(&id) {
            registry.active = Some(id);
            true
        } else {
            false
        }
    }

    pub async fn close(&self, id: TargetId) -> bool {
        let mut registry = self.registry.write().await;
        if registry.active == Some(id) {
            registry.active = None;
        }
        registry.targets.remove(&id).is_some()
    }
}

#[async_trait]
impl ExtractionBoundary for LocalBoundary {
    async fn active_target(&self) -> Option<Target> {
        let registry = self.registry.read().await;
        let id = registry.active?;
        registry.targets.get(&id).map(|target| Target {
            id,
            url: target.location().to_string(),
        })
    }

    async fn execute(&self, request: ExtractionRequest) -> Result<ExtractionResult, BoundaryError> {
        let target = self
            .registry
            .read()
            .await
            .targets
            .get(&request.target)
            .cloned()
            .ok_or(BoundaryError::TargetGone(request.target))?;

        if !is_scriptable(target.location()) {
            return Err(BoundaryError::PermissionDenied(target.location().to_string()));
        }

        let options = request.options;
        let result = task::spawn_blocking(move || extract(target.as_ref(), &options))
            .await
            .map_err(|e| BoundaryError::Task(e.to_string()))?;

        let response = serde_json::to_string(&result)?;
        Ok(serde_json::from_str(&response)?)
    }
}
