use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use taskflow_core::TaskflowResult;
use taskflow_domain::BoardId;
use uuid::Uuid;

/// Metadata for persistence operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistenceMetadata {
    /// Version of the persistence format
    pub format_version: u32,
    /// ID of the instance that performed the save
    pub instance_id: Uuid,
    /// When this data was saved
    pub saved_at: DateTime<Utc>,
    /// Schema version for migrations
    pub schema_version: String,
}

impl PersistenceMetadata {
    pub fn new(format_version: u32, instance_id: Uuid) -> Self {
        Self {
            format_version,
            instance_id,
            saved_at: Utc::now(),
            schema_version: "2.0.0".to_string(),
        }
    }
}

/// A stored payload together with the metadata it was saved with
#[derive(Debug, Clone)]
pub struct StoreSnapshot {
    /// Raw JSON bytes of the payload
    pub data: Vec<u8>,
    pub metadata: PersistenceMetadata,
}

/// Named slots of persisted state
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Scope {
    /// The full project tree
    Projects,
    /// The id of the board that was open last
    ActiveBoardId,
    /// Flat board list written before projects existed
    LegacyBoards,
    /// Lists of one flat board
    LegacyLists(BoardId),
    /// Active board id written before projects existed
    LegacyActiveBoard,
}

impl Scope {
    pub fn key(&self) -> String {
        match self {
            Scope::Projects => "projects".to_string(),
            Scope::ActiveBoardId => "active-board-id".to_string(),
            Scope::LegacyBoards => "boards".to_string(),
            Scope::LegacyLists(board_id) => format!("lists-{}", board_id),
            Scope::LegacyActiveBoard => "active-board".to_string(),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

/// Events that can be emitted during persistence operations
#[derive(Debug, Clone)]
pub enum PersistenceEvent {
    /// A scope was written
    Saved {
        scope: Scope,
        metadata: PersistenceMetadata,
    },
    /// A scope was removed
    Removed { scope: Scope },
    /// A write failed; in-memory state is unaffected
    Error { scope: Scope, message: String },
}

/// Trait for keyed storage of serialized payloads
/// Implementations handle different backends (directory of files, memory, etc.)
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Load the payload stored under `key`, if any
    async fn load(&self, key: &str) -> TaskflowResult<Option<StoreSnapshot>>;

    /// Store a payload under `key`, replacing what was there
    async fn save(&self, key: &str, data: Vec<u8>) -> TaskflowResult<PersistenceMetadata>;

    /// Remove `key`; removing a missing key is not an error
    async fn remove(&self, key: &str) -> TaskflowResult<()>;

    async fn exists(&self, key: &str) -> bool;
}

/// Trait for serialization/deserialization strategies
pub trait Serializer<T: Send + Sync>: Send + Sync {
    /// Serialize data to bytes
    fn serialize(&self, data: &T) -> TaskflowResult<Vec<u8>>;

    /// Deserialize data from bytes
    fn deserialize(&self, bytes: &[u8]) -> TaskflowResult<T>;
}

/// Layouts persisted state has been written in
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FormatVersion {
    /// Flat boards with one list scope per board
    V1,
    /// Project tree in a single scope
    V2,
}

impl FormatVersion {
    pub fn as_u32(self) -> u32 {
        match self {
            Self::V1 => 1,
            Self::V2 => 2,
        }
    }

    pub fn from_u32(v: u32) -> Option<Self> {
        match v {
            1 => Some(Self::V1),
            2 => Some(Self::V2),
            _ => None,
        }
    }
}
