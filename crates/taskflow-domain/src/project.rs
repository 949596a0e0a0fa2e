use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::board::Board;
use crate::ids::{BoardId, ProjectId};

/// Top-level container of boards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub title: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub boards: Vec<Arc<Board>>,
}

impl Project {
    pub fn new(title: String) -> Self {
        Self::with_id(ProjectId::generate(), title)
    }

    pub fn with_id(id: ProjectId, title: String) -> Self {
        Self {
            id,
            title,
            created_at: Utc::now(),
            boards: Vec::new(),
        }
    }

    pub fn board(&self, id: &BoardId) -> Option<&Arc<Board>> {
        self.boards.iter().find(|board| &board.id == id)
    }

    pub fn contains_board(&self, id: &BoardId) -> bool {
        self.board(id).is_some()
    }
}
