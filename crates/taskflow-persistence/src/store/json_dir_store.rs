use crate::store::atomic_writer::AtomicWriter;
use crate::traits::{FormatVersion, KeyValueStore, PersistenceMetadata, StoreSnapshot};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use taskflow_core::{TaskflowError, TaskflowResult};
use uuid::Uuid;

/// Directory of JSON files, one per scope key
#[derive(Debug, Clone)]
pub struct JsonDirStore {
    dir: PathBuf,
    instance_id: Uuid,
}

/// Wrapper every file written by this store carries
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonEnvelope {
    pub version: u32,
    pub metadata: PersistenceMetadata,
    pub data: serde_json::Value,
}

impl JsonEnvelope {
    pub fn new(data: serde_json::Value, instance_id: Uuid) -> Self {
        let version = FormatVersion::V2.as_u32();
        Self {
            version,
            metadata: PersistenceMetadata::new(version, instance_id),
            data,
        }
    }

    /// Parse file contents, or `None` when they are not an envelope.
    fn parse(value: &serde_json::Value) -> Option<TaskflowResult<Self>> {
        let object = value.as_object()?;
        if !(object.contains_key("version")
            && object.contains_key("metadata")
            && object.contains_key("data"))
        {
            return None;
        }
        Some(
            Self::deserialize(value).map_err(|e| TaskflowError::Serialization(e.to_string())),
        )
    }
}

impl JsonDirStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self::with_instance_id(dir, Uuid::new_v4())
    }

    pub fn with_instance_id(dir: impl AsRef<Path>, instance_id: Uuid) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            instance_id,
        }
    }

    pub fn instance_id(&self) -> Uuid {
        self.instance_id
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn raw_snapshot(&self, data: Vec<u8>) -> StoreSnapshot {
        StoreSnapshot {
            data,
            metadata: PersistenceMetadata::new(FormatVersion::V1.as_u32(), self.instance_id),
        }
    }

    /// File backing `key`. Characters that are unsafe in file names are
    /// replaced so legacy ids cannot escape the directory.
    pub fn path_for(&self, key: &str) -> PathBuf {
        let file_name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{}.json", file_name))
    }
}

#[async_trait::async_trait]
impl KeyValueStore for JsonDirStore {
    async fn load(&self, key: &str) -> TaskflowResult<Option<StoreSnapshot>> {
        let path = self.path_for(key);
        let Some(bytes) = AtomicWriter::read_optional(&path).await? else {
            return Ok(None);
        };

        let value = match serde_json::from_slice::<serde_json::Value>(&bytes) {
            Ok(value) => value,
            Err(e) => {
                // Older writers stored some scopes as bare text
                tracing::debug!("{} is not JSON ({}), reading it as a raw payload", path.display(), e);
                return Ok(Some(self.raw_snapshot(bytes)));
            }
        };

        let snapshot = match JsonEnvelope::parse(&value) {
            Some(envelope) => {
                let envelope = envelope?;
                if FormatVersion::from_u32(envelope.version) != Some(FormatVersion::V2) {
                    return Err(TaskflowError::Serialization(format!(
                        "Unsupported format version {} in {}",
                        envelope.version,
                        path.display()
                    )));
                }
                let data = serde_json::to_vec(&envelope.data)
                    .map_err(|e| TaskflowError::Serialization(e.to_string()))?;
                StoreSnapshot {
                    data,
                    metadata: envelope.metadata,
                }
            }
            None => {
                tracing::debug!("{} has no envelope, reading it as a raw payload", path.display());
                self.raw_snapshot(bytes)
            }
        };

        tracing::info!("Loaded {} from {}", key, path.display());
        Ok(Some(snapshot))
    }

    async fn save(&self, key: &str, data: Vec<u8>) -> TaskflowResult<PersistenceMetadata> {
        let value: serde_json::Value = serde_json::from_slice(&data)
            .map_err(|e| TaskflowError::Serialization(e.to_string()))?;
        let envelope = JsonEnvelope::new(value, self.instance_id);

        let json_bytes = serde_json::to_vec_pretty(&envelope)
            .map_err(|e| TaskflowError::Serialization(e.to_string()))?;

        let path = self.path_for(key);
        AtomicWriter::write_atomic(&path, &json_bytes).await?;

        tracing::info!("Saved {} ({} bytes) to {}", key, json_bytes.len(), path.display());
        Ok(envelope.metadata)
    }

    async fn remove(&self, key: &str) -> TaskflowResult<()> {
        let path = self.path_for(key);
        if AtomicWriter::remove_if_exists(&path).await? {
            tracing::info!("Removed {}", path.display());
        }
        Ok(())
    }

    async fn exists(&self, key: &str) -> bool {
        tokio::fs::try_exists(self.path_for(key))
            .await
            .unwrap_or(false)
    }
}
