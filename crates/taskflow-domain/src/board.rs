use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::ids::{BoardId, ListId};
use crate::list::List;

/// Background tokens handed to new boards when no palette is configured.
pub const DEFAULT_BACKGROUNDS: &[&str] = &[
    "bg-gradient-to-r from-blue-500 to-purple-600",
    "bg-gradient-to-r from-green-400 to-cyan-500",
    "bg-gradient-to-r from-orange-400 to-pink-500",
    "bg-gradient-to-r from-indigo-500 to-sky-400",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub id: BoardId,
    pub title: String,
    pub created_at: DateTime<Utc>,
    #[serde(default = "default_background")]
    pub background: String,
    #[serde(default)]
    pub lists: Vec<Arc<List>>,
}

fn default_background() -> String {
    DEFAULT_BACKGROUNDS[0].to_string()
}

impl Board {
    pub fn new(title: String, background: String) -> Self {
        Self::with_id(BoardId::generate(), title, background)
    }

    pub fn with_id(id: BoardId, title: String, background: String) -> Self {
        Self {
            id,
            title,
            created_at: Utc::now(),
            background,
            lists: Vec::new(),
        }
    }

    pub fn list(&self, id: &ListId) -> Option<&Arc<List>> {
        self.lists.iter().find(|list| &list.id == id)
    }

    pub fn list_position(&self, id: &ListId) -> Option<usize> {
        self.lists.iter().position(|list| &list.id == id)
    }

    pub fn card_count(&self) -> usize {
        self.lists.iter().map(|list| list.cards.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::Card;

    #[test]
    fn test_card_count_spans_lists() {
        let mut board = Board::new("Board".to_string(), default_background());
        let mut todo = List::new("To Do".to_string());
        todo.push_card(Arc::new(Card::new("a".to_string())));
        todo.push_card(Arc::new(Card::new("b".to_string())));
        let mut done = List::new("Done".to_string());
        done.push_card(Arc::new(Card::new("c".to_string())));
        board.lists = vec![Arc::new(todo), Arc::new(done)];

        assert_eq!(board.card_count(), 3);
    }

    #[test]
    fn test_missing_background_gets_default() {
        let json = r#"{"id":"board-1","title":"B","created_at":"2024-01-01T00:00:00Z"}"#;
        let board: Board = serde_json::from_str(json).unwrap();
        assert_eq!(board.background, DEFAULT_BACKGROUNDS[0]);
        assert!(board.lists.is_empty());
    }
}
