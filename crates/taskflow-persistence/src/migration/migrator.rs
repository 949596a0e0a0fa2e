use crate::serialization::JsonSerializer;
use crate::traits::{FormatVersion, KeyValueStore, Scope, Serializer};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use taskflow_core::TaskflowResult;
use taskflow_domain::{Board, BoardId, List, Project, Snapshot, DEFAULT_BACKGROUNDS};

/// Title of the project that adopts boards written before projects existed
pub const MIGRATED_PROJECT_TITLE: &str = "My Boards";

/// A board as the flat layout stored it
#[derive(Debug, Serialize, Deserialize)]
struct LegacyBoard {
    id: BoardId,
    #[serde(alias = "name")]
    title: String,
    #[serde(rename = "createdAt", alias = "created_at", default = "Utc::now")]
    created_at: DateTime<Utc>,
    #[serde(default)]
    background: Option<String>,
}

impl LegacyBoard {
    fn into_board(self, lists: Vec<List>) -> Board {
        let background = self
            .background
            .filter(|bg| !bg.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BACKGROUNDS[0].to_string());
        let mut board = Board::with_id(self.id, self.title, background);
        board.created_at = self.created_at;
        board.lists = lists.into_iter().map(Arc::new).collect();
        board
    }
}

/// Orchestrates migrations between layouts
pub struct Migrator;

impl Migrator {
    /// Detect which layout the store holds, or `None` when it is empty
    pub async fn detect_version(store: &dyn KeyValueStore) -> Option<FormatVersion> {
        if store.exists(&Scope::Projects.key()).await {
            Some(FormatVersion::V2)
        } else if store.exists(&Scope::LegacyBoards.key()).await {
            Some(FormatVersion::V1)
        } else {
            None
        }
    }

    /// Wrap the flat boards into a single project and write it to the
    /// `projects` scope. Legacy scopes are left in place.
    pub async fn migrate_v1_to_v2(store: &dyn KeyValueStore) -> TaskflowResult<Snapshot> {
        let boards: Vec<LegacyBoard> = match store.load(&Scope::LegacyBoards.key()).await? {
            Some(snapshot) => JsonSerializer.deserialize(&snapshot.data)?,
            None => Vec::new(),
        };
        let board_count = boards.len();

        let mut project = Project::new(MIGRATED_PROJECT_TITLE.to_string());
        for legacy in boards {
            let lists = Self::load_legacy_lists(store, &legacy.id).await?;
            project.boards.push(Arc::new(legacy.into_board(lists)));
        }

        let snapshot = Snapshot::from_projects(vec![project]);
        let data = JsonSerializer.serialize(&snapshot)?;
        store.save(&Scope::Projects.key(), data).await?;

        tracing::info!(
            "Migrated {} legacy boards into project '{}'",
            board_count,
            MIGRATED_PROJECT_TITLE
        );
        Ok(snapshot)
    }

    /// Lists of one flat board. A board without a lists scope migrates
    /// with no lists; the default columns are not recreated.
    async fn load_legacy_lists(
        store: &dyn KeyValueStore,
        board_id: &BoardId,
    ) -> TaskflowResult<Vec<List>> {
        let scope = Scope::LegacyLists(board_id.clone());
        let Some(snapshot) = store.load(&scope.key()).await? else {
            tracing::debug!("No lists stored for board {}", board_id);
            return Ok(Vec::new());
        };

        let mut lists: Vec<List> = JsonSerializer.deserialize(&snapshot.data)?;
        for list in &mut lists {
            for card in &mut list.cards {
                if card
                    .description
                    .as_deref()
                    .is_some_and(|d| d.trim().is_empty())
                {
                    Arc::make_mut(card).description = None;
                }
            }
        }
        Ok(lists)
    }

    /// Board id the flat layout remembered as open. The pointer was kept
    /// either as a JSON string or as bare text. An unreadable pointer is
    /// ignored so the active board falls back to the first one.
    pub async fn load_legacy_active_board(
        store: &dyn KeyValueStore,
    ) -> TaskflowResult<Option<BoardId>> {
        let snapshot = match store.load(&Scope::LegacyActiveBoard.key()).await {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => return Ok(None),
            Err(e) => {
                tracing::warn!("Ignoring unreadable legacy active board: {}", e);
                return Ok(None);
            }
        };

        let parsed: TaskflowResult<BoardId> = JsonSerializer.deserialize(&snapshot.data);
        if let Ok(id) = parsed {
            return Ok(Some(id));
        }
        match std::str::from_utf8(&snapshot.data).map(str::trim) {
            Ok(text) if !text.is_empty() && !text.starts_with(['{', '[', '"']) => {
                Ok(Some(BoardId::from(text)))
            }
            _ => {
                tracing::warn!("Ignoring unreadable legacy active board");
                Ok(None)
            }
        }
    }
}
