//! Persistence of the most recent conversion.
//!
//! Only one record is kept. Every `put` replaces it whole, so readers see
//! either the previous record or the new one, never a mix.

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::sync::RwLock;

use crate::conversion::ConversionRecord;
use crate::error::StoreError;

#[async_trait]
pub trait ConversionStore: Send + Sync {
    /// Replace the stored record
    async fn put(&self, record: &ConversionRecord) -> Result<(), StoreError>;

    async fn get(&self) -> Result<Option<ConversionRecord>, StoreError>;
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    last: RwLock<Option<ConversionRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConversionStore for MemoryStore {
    async fn put(&self, record: &ConversionRecord) -> Result<(), StoreError> {
        *self.last.write().await = Some(record.clone());
        Ok(())
    }

    async fn get(&self) -> Result<Option<ConversionRecord>, StoreError> {
        Ok(self.last.read().await.clone())
    }
}

/// On-disk layout of [`JsonFileStore`]
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredState {
    last_conversion: Option<ConversionRecord>,
}

/// Store backed by a single JSON file of the form
/// `{"lastConversion": {"url": ..., "markdown": ..., "timestamp": ...}}`.
///
/// Writes go to a sibling temporary file which is then renamed over the
/// target.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Fails when `path` has no file name component (`/`, `..`, empty)
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        if path.file_name().is_none() {
            return Err(StoreError::InvalidPath(path));
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl ConversionStore for JsonFileStore {
    async fn put(&self, record: &ConversionRecord) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let state = StoredState {
            last_conversion: Some(record.clone()),
        };
        let json = serde_json::to_vec_pretty(&state)?;

        let temp = self.temp_path();
        fs::write(&temp, json).await?;
        fs::rename(&temp, &self.path).await?;
        Ok(())
    }

    async fn get(&self) -> Result<Option<ConversionRecord>, StoreError> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let state: StoredState = serde_json::from_slice(&bytes)?;
        Ok(state.last_conversion)
    }
}
