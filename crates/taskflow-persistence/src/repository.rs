use crate::migration::Migrator;
use crate::serialization::JsonSerializer;
use crate::traits::{FormatVersion, KeyValueStore, PersistenceMetadata, Scope, Serializer};
use std::sync::Arc;
use taskflow_core::TaskflowResult;
use taskflow_domain::{BoardId, PersistedState, Snapshot};

/// Where loaded state came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOrigin {
    /// Nothing was stored
    Empty,
    /// Read from the `projects` scope
    Current,
    /// Converted from the flat board layout during this load
    Migrated,
}

#[derive(Debug, Clone)]
pub struct LoadedState {
    pub state: PersistedState,
    pub origin: LoadOrigin,
}

/// Typed access to the persisted scopes of a key-value store
#[derive(Clone)]
pub struct StateRepository {
    store: Arc<dyn KeyValueStore>,
}

impl StateRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    /// Load everything, migrating the flat layout when that is all there is.
    pub async fn load(&self) -> TaskflowResult<LoadedState> {
        let store = self.store.as_ref();
        match Migrator::detect_version(store).await {
            None => {
                tracing::info!("No stored boards found");
                Ok(LoadedState {
                    state: PersistedState::default(),
                    origin: LoadOrigin::Empty,
                })
            }
            Some(FormatVersion::V2) => {
                let snapshot = self.load_projects().await?;
                let active_board_id = self.load_active_board().await?;
                Ok(LoadedState {
                    state: PersistedState::new(snapshot, active_board_id),
                    origin: LoadOrigin::Current,
                })
            }
            Some(FormatVersion::V1) => {
                tracing::info!("Found boards in the flat layout, migrating to projects");
                let snapshot = Migrator::migrate_v1_to_v2(store).await?;
                let active_board_id = match self.load_active_board().await? {
                    Some(id) => Some(id),
                    None => Migrator::load_legacy_active_board(store).await?,
                };
                Ok(LoadedState {
                    state: PersistedState::new(snapshot, active_board_id),
                    origin: LoadOrigin::Migrated,
                })
            }
        }
    }

    async fn load_projects(&self) -> TaskflowResult<Snapshot> {
        match self.store.load(&Scope::Projects.key()).await? {
            Some(snapshot) => JsonSerializer.deserialize(&snapshot.data),
            None => Ok(Snapshot::new()),
        }
    }

    pub async fn load_active_board(&self) -> TaskflowResult<Option<BoardId>> {
        match self.store.load(&Scope::ActiveBoardId.key()).await? {
            Some(snapshot) => JsonSerializer.deserialize(&snapshot.data),
            None => Ok(None),
        }
    }

    pub async fn save_projects(&self, snapshot: &Snapshot) -> TaskflowResult<PersistenceMetadata> {
        let data = JsonSerializer.serialize(snapshot)?;
        self.store.save(&Scope::Projects.key(), data).await
    }

    /// Store the active board id; `None` removes the scope.
    pub async fn save_active_board(
        &self,
        board_id: Option<&BoardId>,
    ) -> TaskflowResult<Option<PersistenceMetadata>> {
        let key = Scope::ActiveBoardId.key();
        match board_id {
            Some(id) => {
                let data = JsonSerializer.serialize(id)?;
                Ok(Some(self.store.save(&key, data).await?))
            }
            None => {
                self.store.remove(&key).await?;
                Ok(None)
            }
        }
    }
}
