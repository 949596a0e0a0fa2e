//! The engine façade used by every front end.
//!
//! Each operation runs against the [`EntityStore`], reconciles drag and
//! selection state with the new tree, and queues [`EngineEvent`]s: user
//! notifications and the persistence scopes that need writing. Callers
//! drain the queue with [`Engine::take_events`].

use std::sync::Arc;
use taskflow_core::{AppConfig, Editable, Notification, TaskflowError, TaskflowResult};

use crate::drag::{DragEngine, DragState, DropOutcome};
use crate::editable::{CardDraft, CardPatch};
use crate::ids::{BoardId, CardId, LabelId, ListId, ProjectId};
use crate::label::{LabelCatalog, LabelTarget};
use crate::operations::BoardOperations;
use crate::selection::{ActiveSelection, Selection};
use crate::snapshot::{PersistedState, Snapshot};
use crate::store::EntityStore;
use crate::view::ViewModel;

/// A piece of state that must be written back to storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PersistScope {
    Projects,
    ActiveBoard,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    Notify(Notification),
    Persist(PersistScope),
}

#[derive(Debug, Clone, Default)]
pub struct EngineSettings {
    pub catalog: LabelCatalog,
    pub backgrounds: Vec<String>,
}

impl EngineSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            catalog: LabelCatalog::default(),
            backgrounds: config.board_backgrounds.clone(),
        }
    }
}

#[derive(Debug)]
pub struct Engine {
    store: EntityStore,
    drag: DragEngine,
    selection: Selection,
    catalog: LabelCatalog,
    events: Vec<EngineEvent>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineSettings::default())
    }
}

impl Engine {
    pub fn new(settings: EngineSettings) -> Self {
        Self {
            store: EntityStore::default().with_backgrounds(settings.backgrounds),
            drag: DragEngine::new(),
            selection: Selection::new(),
            catalog: settings.catalog,
            events: Vec::new(),
        }
    }

    /// Load persisted state into the engine.
    ///
    /// Duplicate ids are re-keyed and the active board is validated; either
    /// repair queues the affected scope for writing.
    pub fn init(&mut self, persisted: PersistedState) -> TaskflowResult<()> {
        let PersistedState {
            mut snapshot,
            active_board_id,
        } = persisted;

        let repaired = snapshot.repair_duplicate_ids();
        snapshot.check_integrity()?;
        if repaired > 0 {
            self.events.push(EngineEvent::Persist(PersistScope::Projects));
        }

        self.drag = DragEngine::new();
        self.selection.reset();
        if self.selection.initialize(&snapshot, active_board_id) {
            self.events.push(EngineEvent::Persist(PersistScope::ActiveBoard));
        }
        self.store.replace(snapshot);

        tracing::info!(
            "Engine initialized with {} projects, {} boards, {} cards",
            self.store.current().projects.len(),
            self.store.current().board_count(),
            self.store.current().card_count()
        );
        Ok(())
    }

    /// Reset the engine to empty and hand back what should be persisted.
    pub fn teardown(&mut self) -> PersistedState {
        let state = self.persisted_state();
        self.store.replace(Snapshot::new());
        self.drag = DragEngine::new();
        self.selection.reset();
        self.events.clear();
        state
    }

    pub fn persisted_state(&self) -> PersistedState {
        PersistedState::new(
            self.store.current().clone(),
            self.selection.active_board_id().cloned(),
        )
    }

    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.store.snapshot()
    }

    pub fn catalog(&self) -> &LabelCatalog {
        &self.catalog
    }

    pub fn drag_state(&self) -> &DragState {
        self.drag.state()
    }

    pub fn active_board_id(&self) -> Option<&BoardId> {
        self.selection.active_board_id()
    }

    pub fn resolve_active_board(&self) -> ActiveSelection {
        self.selection.active(self.store.current())
    }

    pub fn take_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }

    /// Open the card editor on an existing card.
    pub fn edit_card(&self, card_id: &CardId) -> TaskflowResult<CardDraft> {
        self.store
            .current()
            .card(card_id)
            .map(|card| CardDraft::from_entity(card))
            .ok_or_else(|| TaskflowError::not_found("card", card_id))
    }

    /// Toggle a label on a card that is still being edited.
    pub fn toggle_draft_label(
        &self,
        draft: &mut CardDraft,
        label_id: &LabelId,
    ) -> TaskflowResult<bool> {
        draft.toggle_label(&self.catalog, label_id)
    }

    fn notify(&mut self, notification: Notification) {
        self.events.push(EngineEvent::Notify(notification));
    }

    /// Bookkeeping after a published mutation of the tree.
    fn committed(&mut self, message: Option<Notification>) {
        self.events.push(EngineEvent::Persist(PersistScope::Projects));
        let snapshot = self.store.snapshot();
        self.drag.reconcile(&snapshot);
        if self.selection.reconcile(&snapshot) {
            self.events.push(EngineEvent::Persist(PersistScope::ActiveBoard));
        }
        if let Some(notification) = message {
            self.notify(notification);
        }
    }

    fn failed(&mut self, error: &TaskflowError) {
        match error {
            rejected if rejected.is_user_recoverable() => tracing::debug!("Rejected: {}", rejected),
            TaskflowError::InvariantViolation(message) => {
                tracing::error!("Invariant violation: {}", message);
                self.drag.cancel_drag();
            }
            other => tracing::error!("Operation failed: {}", other),
        }
        self.notify(Notification::error(error.user_message()));
    }

    fn finish<T>(&mut self, result: TaskflowResult<T>, success: &str) -> TaskflowResult<T> {
        match result {
            Ok(value) => {
                self.committed(Some(Notification::success(success)));
                Ok(value)
            }
            Err(error) => {
                self.failed(&error);
                Err(error)
            }
        }
    }
}

impl BoardOperations for Engine {
    fn create_project(&mut self, title: &str) -> TaskflowResult<ProjectId> {
        let result = self.store.create_project(title);
        self.finish(result, "New project created!")
    }

    fn delete_project(&mut self, project_id: &ProjectId) -> TaskflowResult<()> {
        let result = self.store.delete_project(project_id);
        self.finish(result, "Project deleted")
    }

    fn create_board(&mut self, project_id: &ProjectId, title: &str) -> TaskflowResult<BoardId> {
        let result = self.store.create_board(project_id, title);
        self.finish(result, "New board created!")
    }

    fn delete_board(&mut self, board_id: &BoardId) -> TaskflowResult<()> {
        let result = self.store.delete_board(board_id);
        self.finish(result, "Board deleted")
    }

    fn create_list(&mut self, board_id: &BoardId, title: &str) -> TaskflowResult<ListId> {
        let result = self.store.create_list(board_id, title);
        self.finish(result, "New list added!")
    }

    fn delete_list(&mut self, list_id: &ListId) -> TaskflowResult<()> {
        let result = self.store.delete_list(list_id);
        self.finish(result, "List deleted")
    }

    fn create_card(&mut self, list_id: &ListId, draft: CardDraft) -> TaskflowResult<CardId> {
        let result = self.store.create_card(list_id, draft);
        self.finish(result, "New card added!")
    }

    fn update_card(&mut self, card_id: &CardId, patch: CardPatch) -> TaskflowResult<()> {
        let result = self.store.update_card(card_id, patch);
        self.finish(result, "Card updated successfully")
    }

    fn delete_card(&mut self, card_id: &CardId) -> TaskflowResult<()> {
        let result = self.store.delete_card(card_id);
        self.finish(result, "Card deleted")
    }

    fn toggle_card_label(&mut self, card_id: &CardId, label_id: &LabelId) -> TaskflowResult<bool> {
        match self.store.toggle_card_label(card_id, &self.catalog, label_id) {
            Ok(assigned) => {
                self.committed(None);
                Ok(assigned)
            }
            Err(error) => {
                self.failed(&error);
                Err(error)
            }
        }
    }

    fn begin_drag(&mut self, card_id: CardId, source_list_id: ListId) {
        self.drag.begin_drag(card_id, source_list_id);
    }

    fn drop_on(&mut self, target_list_id: &ListId) -> TaskflowResult<DropOutcome> {
        match self.drag.drop_on(&mut self.store, target_list_id) {
            Ok(outcome) => {
                if let DropOutcome::Moved {
                    target_list_title, ..
                } = &outcome
                {
                    let message = format!("Card moved to {}", target_list_title);
                    self.committed(Some(Notification::info(message)));
                }
                Ok(outcome)
            }
            Err(error) => {
                self.failed(&error);
                Err(error)
            }
        }
    }

    fn cancel_drag(&mut self) {
        self.drag.cancel_drag();
    }

    fn move_card(&mut self, card_id: &CardId, target_list_id: &ListId) -> TaskflowResult<DropOutcome> {
        let source_list_id = match self.store.current().list_of_card(card_id) {
            Some(list) => list.id.clone(),
            None => {
                let error = TaskflowError::not_found("card", card_id);
                self.failed(&error);
                return Err(error);
            }
        };
        self.begin_drag(card_id.clone(), source_list_id);
        self.drop_on(target_list_id)
    }

    fn set_active_board(&mut self, board_id: &BoardId) -> ActiveSelection {
        let snapshot = self.store.snapshot();
        if self.selection.set_active_board(&snapshot, board_id) {
            self.events.push(EngineEvent::Persist(PersistScope::ActiveBoard));
        }
        self.selection.active(&snapshot)
    }

    fn toggle_project_expanded(&mut self, project_id: &ProjectId) -> TaskflowResult<bool> {
        let snapshot = self.store.snapshot();
        let result = self.selection.toggle_project_expanded(&snapshot, project_id);
        if let Err(error) = &result {
            self.failed(error);
        }
        result
    }

    fn view(&self) -> ViewModel {
        let drag = match self.drag.state() {
            DragState::Dragging(token) => Some(token.clone()),
            DragState::Idle => None,
        };
        ViewModel::build(self.store.current(), &self.selection, &self.catalog, drag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskflow_core::NotificationKind;

    fn messages(events: &[EngineEvent]) -> Vec<(NotificationKind, String)> {
        events
            .iter()
            .filter_map(|event| match event {
                EngineEvent::Notify(n) => Some((n.kind, n.message.clone())),
                EngineEvent::Persist(_) => None,
            })
            .collect()
    }

    fn persisted(events: &[EngineEvent]) -> Vec<PersistScope> {
        events
            .iter()
            .filter_map(|event| match event {
                EngineEvent::Persist(scope) => Some(*scope),
                EngineEvent::Notify(_) => None,
            })
            .collect()
    }

    #[test]
    fn test_success_queues_save_and_notification() {
        let mut engine = Engine::default();
        engine.create_project("Work").unwrap();

        let events = engine.take_events();
        assert_eq!(persisted(&events), vec![PersistScope::Projects]);
        assert_eq!(
            messages(&events),
            vec![(NotificationKind::Success, "New project created!".to_string())]
        );
        assert!(engine.take_events().is_empty());
    }

    #[test]
    fn test_validation_error_notifies_without_saving() {
        let mut engine = Engine::default();
        let project = engine.create_project("Work").unwrap();
        let board = engine.create_board(&project, "Board").unwrap();
        let list = engine.create_list(&board, "To Do").unwrap();
        engine.take_events();

        let err = engine.create_card(&list, CardDraft::new("")).unwrap_err();
        assert!(matches!(err, TaskflowError::Validation(_)));

        let events = engine.take_events();
        assert!(persisted(&events).is_empty());
        assert_eq!(
            messages(&events),
            vec![(NotificationKind::Error, "Please enter a card title".to_string())]
        );
        assert_eq!(engine.snapshot().card_count(), 0);
    }

    #[test]
    fn test_missing_item_keeps_pending_drag() {
        let mut engine = Engine::default();
        let project = engine.create_project("P1").unwrap();
        let board = engine.create_board(&project, "B1").unwrap();
        let l1 = engine.create_list(&board, "L1").unwrap();
        let card = engine.create_card(&l1, CardDraft::new("Card")).unwrap();
        engine.begin_drag(card, l1);
        engine.take_events();

        let err = engine.delete_list(&ListId::from("list-missing")).unwrap_err();
        assert!(err.is_user_recoverable());

        assert!(matches!(engine.drag_state(), DragState::Dragging(_)));
        assert_eq!(
            messages(&engine.take_events()),
            vec![(
                NotificationKind::Error,
                "Something went wrong: the item no longer exists".to_string()
            )]
        );
    }

    #[test]
    fn test_drop_notifies_with_target_title() {
        let mut engine = Engine::default();
        let project = engine.create_project("P1").unwrap();
        let board = engine.create_board(&project, "B1").unwrap();
        let l1 = engine.create_list(&board, "L1").unwrap();
        let l2 = engine.create_list(&board, "L2").unwrap();
        let card = engine.create_card(&l1, CardDraft::new("Write spec")).unwrap();
        engine.take_events();

        engine.begin_drag(card, l1);
        engine.drop_on(&l2).unwrap();

        let events = engine.take_events();
        assert_eq!(persisted(&events), vec![PersistScope::Projects]);
        assert_eq!(
            messages(&events),
            vec![(NotificationKind::Info, "Card moved to L2".to_string())]
        );
    }

    #[test]
    fn test_same_list_drop_is_silent() {
        let mut engine = Engine::default();
        let project = engine.create_project("P1").unwrap();
        let board = engine.create_board(&project, "B1").unwrap();
        let l1 = engine.create_list(&board, "L1").unwrap();
        let card = engine.create_card(&l1, CardDraft::new("Card")).unwrap();
        engine.take_events();

        engine.begin_drag(card, l1.clone());
        assert_eq!(engine.drop_on(&l1).unwrap(), DropOutcome::SameList);
        assert!(engine.take_events().is_empty());
    }

    #[test]
    fn test_deleting_active_board_falls_back() {
        let mut engine = Engine::default();
        let project = engine.create_project("P").unwrap();
        let first = engine.create_board(&project, "First").unwrap();
        let second = engine.create_board(&project, "Second").unwrap();
        engine.set_active_board(&second);
        engine.take_events();

        engine.delete_board(&second).unwrap();

        let events = engine.take_events();
        assert!(persisted(&events).contains(&PersistScope::ActiveBoard));
        assert_eq!(engine.active_board_id(), Some(&first));
        assert_eq!(engine.view().active_board.unwrap().id, first);
    }

    #[test]
    fn test_init_repairs_stale_active_board() {
        let mut engine = Engine::default();
        let state = crate::starter::starter_state();
        let board_id = state.active_board_id.clone();

        engine
            .init(PersistedState::new(state.snapshot, Some(BoardId::from("gone"))))
            .unwrap();

        assert_eq!(persisted(&engine.take_events()), vec![PersistScope::ActiveBoard]);
        assert_eq!(engine.active_board_id(), board_id.as_ref());
    }

    #[test]
    fn test_teardown_returns_state_and_empties_engine() {
        let mut engine = Engine::default();
        engine.init(crate::starter::starter_state()).unwrap();

        let state = engine.teardown();
        assert_eq!(state.snapshot.card_count(), 4);
        assert!(engine.snapshot().is_empty());
        assert!(engine.active_board_id().is_none());
    }

    #[test]
    fn test_edit_card_flow() {
        let mut engine = Engine::default();
        engine.init(crate::starter::starter_state()).unwrap();
        let card_id = engine.snapshot().cards().next().unwrap().1.id.clone();

        let mut draft = engine.edit_card(&card_id).unwrap();
        engine
            .toggle_draft_label(&mut draft, &LabelId::from("label-5"))
            .unwrap();
        draft.title = "Create the project plan".to_string();
        engine.update_card(&card_id, draft.into()).unwrap();

        let card = Arc::clone(engine.snapshot().card(&card_id).unwrap());
        assert_eq!(card.title, "Create the project plan");
        assert!(card.label_names.contains("Bug"));
    }
}
