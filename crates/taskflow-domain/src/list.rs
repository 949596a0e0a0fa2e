use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::card::Card;
use crate::ids::{CardId, ListId};

/// An ordered column of cards on a board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct List {
    pub id: ListId,
    pub title: String,
    #[serde(default)]
    pub cards: Vec<Arc<Card>>,
}

impl List {
    pub fn new(title: String) -> Self {
        Self::with_id(ListId::generate(), title)
    }

    pub fn with_id(id: ListId, title: String) -> Self {
        Self {
            id,
            title,
            cards: Vec::new(),
        }
    }

    pub fn card(&self, id: &CardId) -> Option<&Arc<Card>> {
        self.cards.iter().find(|card| &card.id == id)
    }

    pub fn card_position(&self, id: &CardId) -> Option<usize> {
        self.cards.iter().position(|card| &card.id == id)
    }

    pub fn contains_card(&self, id: &CardId) -> bool {
        self.card_position(id).is_some()
    }

    /// Cards are only ever appended; there is no positional insert.
    pub fn push_card(&mut self, card: Arc<Card>) {
        self.cards.push(card);
    }

    pub fn remove_card(&mut self, id: &CardId) -> Option<Arc<Card>> {
        self.card_position(id).map(|index| self.cards.remove(index))
    }
}
