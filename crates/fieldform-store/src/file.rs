//! A descriptor store backed by one JSON document on disk.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;

use fieldform_core::{FormError, FormResult};

use crate::descriptor::FieldDescriptor;
use crate::seed::seed_fields;
use crate::store::FieldStore;

/// Stores the descriptor list as a JSON array in a single file.
///
/// Writes go to a sibling temp file that is then renamed over the target,
/// so readers never observe a half-written document.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Creates a store over `path`. The file is not touched until used.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Opens `path`, writing the sample form to it first if it does not exist.
    pub async fn open_or_seed(path: impl Into<PathBuf>) -> FormResult<Self> {
        let store = Self::new(path);
        if !tokio::fs::try_exists(&store.path).await? {
            tracing::info!(path = %store.path.display(), "seeding descriptor file");
            store.write(&seed_fields()).await?;
        }
        Ok(store)
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    async fn write(&self, fields: &[FieldDescriptor]) -> FormResult<()> {
        let _guard = self.write_lock.lock().await;
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir).await?;
        }
        let data = serde_json::to_vec_pretty(fields)?;
        let tmp = self.temp_path();
        tokio::fs::write(&tmp, &data).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl FieldStore for JsonFileStore {
    async fn fetch(&self) -> FormResult<Vec<FieldDescriptor>> {
        let data = tokio::fs::read(&self.path)
            .await
            .map_err(|e| FormError::Fetch(format!("{}: {e}", self.path.display())))?;
        serde_json::from_slice(&data)
            .map_err(|e| FormError::Fetch(format!("{}: {e}", self.path.display())))
    }

    async fn replace(&self, fields: Vec<FieldDescriptor>) -> FormResult<()> {
        tracing::debug!(path = %self.path.display(), count = fields.len(), "writing descriptor file");
        self.write(&fields)
            .await
            .map_err(|e| FormError::Submit(e.to_string()))
    }
}
