use crate::traits::{FormatVersion, KeyValueStore, PersistenceMetadata, StoreSnapshot};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use taskflow_core::{TaskflowError, TaskflowResult};
use uuid::Uuid;

/// In-process key-value store.
///
/// Writes can be switched to fail, which is how tests exercise the
/// persistence error path.
#[derive(Debug)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, StoreSnapshot>>,
    fail_writes: AtomicBool,
    instance_id: Uuid,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(BTreeMap::new()),
            fail_writes: AtomicBool::new(false),
            instance_id: Uuid::new_v4(),
        }
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Seed a raw payload, as an older version would have written it.
    pub fn insert_raw(&self, key: &str, value: serde_json::Value) {
        let snapshot = StoreSnapshot {
            data: value.to_string().into_bytes(),
            metadata: PersistenceMetadata::new(FormatVersion::V1.as_u32(), self.instance_id),
        };
        self.entries.lock().insert(key.to_string(), snapshot);
    }

    pub fn get_raw(&self, key: &str) -> Option<serde_json::Value> {
        self.entries
            .lock()
            .get(key)
            .and_then(|snapshot| serde_json::from_slice(&snapshot.data).ok())
    }

    pub fn keys(&self) -> Vec<String> {
        self.entries.lock().keys().cloned().collect()
    }
}

#[async_trait::async_trait]
impl KeyValueStore for MemoryStore {
    async fn load(&self, key: &str) -> TaskflowResult<Option<StoreSnapshot>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    async fn save(&self, key: &str, data: Vec<u8>) -> TaskflowResult<PersistenceMetadata> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(TaskflowError::Storage(format!("write to {} refused", key)));
        }
        let metadata = PersistenceMetadata::new(FormatVersion::V2.as_u32(), self.instance_id);
        self.entries.lock().insert(
            key.to_string(),
            StoreSnapshot {
                data,
                metadata: metadata.clone(),
            },
        );
        Ok(metadata)
    }

    async fn remove(&self, key: &str) -> TaskflowResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(TaskflowError::Storage(format!("remove of {} refused", key)));
        }
        self.entries.lock().remove(key);
        Ok(())
    }

    async fn exists(&self, key: &str) -> bool {
        self.entries.lock().contains_key(key)
    }
}
