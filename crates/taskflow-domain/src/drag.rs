//! Drag-and-drop of cards between lists.
//!
//! The engine holds at most one drag token. `drop_on` consumes it before
//! evaluating the drop, so whatever the outcome the engine is back to
//! `Idle` afterwards and a failed drop cannot be retried by accident.

use serde::Serialize;
use taskflow_core::TaskflowResult;

use crate::ids::{CardId, ListId};
use crate::snapshot::Snapshot;
use crate::store::EntityStore;

/// The card being dragged and the list it was picked up from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DragToken {
    pub card_id: CardId,
    pub source_list_id: ListId,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(DragToken),
}

/// Result of a drop that did not fail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DropOutcome {
    /// Nothing was being dragged.
    NoDrag,
    /// Dropped back onto the source list.
    SameList,
    Moved {
        card_id: CardId,
        source_list_id: ListId,
        target_list_id: ListId,
        target_list_title: String,
    },
}

#[derive(Debug, Default)]
pub struct DragEngine {
    state: DragState,
}

impl DragEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    /// Start dragging a card. A drag already in flight is replaced.
    pub fn begin_drag(&mut self, card_id: CardId, source_list_id: ListId) {
        if let DragState::Dragging(previous) = &self.state {
            tracing::debug!(
                "Replacing drag of card {} with card {}",
                previous.card_id,
                card_id
            );
        }
        self.state = DragState::Dragging(DragToken {
            card_id,
            source_list_id,
        });
    }

    pub fn cancel_drag(&mut self) {
        if let DragState::Dragging(token) = std::mem::take(&mut self.state) {
            tracing::debug!("Cancelled drag of card {}", token.card_id);
        }
    }

    /// Drop the dragged card on `target_list_id`.
    ///
    /// On success the card has been moved to the end of the target list in
    /// one published snapshot. On error the store is unchanged.
    pub fn drop_on(
        &mut self,
        store: &mut EntityStore,
        target_list_id: &ListId,
    ) -> TaskflowResult<DropOutcome> {
        let token = match std::mem::take(&mut self.state) {
            DragState::Idle => return Ok(DropOutcome::NoDrag),
            DragState::Dragging(token) => token,
        };

        if &token.source_list_id == target_list_id {
            return Ok(DropOutcome::SameList);
        }

        store.move_card(&token.card_id, &token.source_list_id, target_list_id)?;

        let target_list_title = store
            .current()
            .list(target_list_id)
            .map(|list| list.title.clone())
            .unwrap_or_default();

        Ok(DropOutcome::Moved {
            card_id: token.card_id,
            source_list_id: token.source_list_id,
            target_list_id: target_list_id.clone(),
            target_list_title,
        })
    }

    /// Forget the drag when its card or source list has gone away.
    /// Returns `true` when a token was discarded.
    pub fn reconcile(&mut self, snapshot: &Snapshot) -> bool {
        let stale = match &self.state {
            DragState::Idle => false,
            DragState::Dragging(token) => !snapshot
                .list(&token.source_list_id)
                .is_some_and(|list| list.contains_card(&token.card_id)),
        };
        if stale {
            tracing::debug!("Discarding drag token after its card or list was removed");
            self.state = DragState::Idle;
        }
        stale
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editable::CardDraft;
    use taskflow_core::TaskflowError;

    fn board_with_two_lists() -> (EntityStore, ListId, ListId, CardId) {
        let mut store = EntityStore::default();
        let project = store.create_project("P1").unwrap();
        let board = store.create_board(&project, "B1").unwrap();
        let l1 = store.create_list(&board, "L1").unwrap();
        let l2 = store.create_list(&board, "L2").unwrap();
        let card = store.create_card(&l1, CardDraft::new("Write spec")).unwrap();
        (store, l1, l2, card)
    }

    #[test]
    fn test_drop_on_other_list_moves_card() {
        let (mut store, l1, l2, card) = board_with_two_lists();
        let mut drag = DragEngine::new();

        drag.begin_drag(card.clone(), l1.clone());
        let outcome = drag.drop_on(&mut store, &l2).unwrap();

        assert!(matches!(outcome, DropOutcome::Moved { ref target_list_title, .. } if target_list_title == "L2"));
        assert_eq!(*drag.state(), DragState::Idle);
        assert!(store.current().list(&l1).unwrap().cards.is_empty());
        assert!(store.current().list(&l2).unwrap().contains_card(&card));
    }

    #[test]
    fn test_drop_on_source_list_is_noop() {
        let (mut store, l1, _, card) = board_with_two_lists();
        let before = store.snapshot();
        let mut drag = DragEngine::new();

        drag.begin_drag(card, l1.clone());
        assert_eq!(drag.drop_on(&mut store, &l1).unwrap(), DropOutcome::SameList);
        assert!(std::sync::Arc::ptr_eq(&before, &store.snapshot()));
        assert!(!drag.is_dragging());
    }

    #[test]
    fn test_drop_without_drag() {
        let (mut store, _, l2, _) = board_with_two_lists();
        let mut drag = DragEngine::new();
        assert_eq!(drag.drop_on(&mut store, &l2).unwrap(), DropOutcome::NoDrag);
    }

    #[test]
    fn test_wrong_source_list_aborts_and_resets() {
        let (mut store, l1, l2, card) = board_with_two_lists();
        let before = store.snapshot();
        let mut drag = DragEngine::new();

        drag.begin_drag(card, l2);
        let result = drag.drop_on(&mut store, &l1);

        assert!(matches!(result, Err(TaskflowError::InvariantViolation(_))));
        assert!(!drag.is_dragging());
        assert_eq!(*before, *store.snapshot());
    }

    #[test]
    fn test_new_drag_replaces_previous() {
        let mut drag = DragEngine::new();
        drag.begin_drag(CardId::from("a"), ListId::from("x"));
        drag.begin_drag(CardId::from("b"), ListId::from("y"));

        assert_eq!(
            *drag.state(),
            DragState::Dragging(DragToken {
                card_id: CardId::from("b"),
                source_list_id: ListId::from("y"),
            })
        );
    }

    #[test]
    fn test_cancel_and_reconcile() {
        let (mut store, l1, _, card) = board_with_two_lists();
        let mut drag = DragEngine::new();

        drag.begin_drag(card.clone(), l1.clone());
        drag.cancel_drag();
        assert!(!drag.is_dragging());

        drag.begin_drag(card.clone(), l1.clone());
        assert!(!drag.reconcile(store.current()));
        store.delete_card(&card).unwrap();
        assert!(drag.reconcile(store.current()));
        assert!(!drag.is_dragging());
    }
}
