use crate::drag::DropOutcome;
use crate::editable::{CardDraft, CardPatch};
use crate::ids::{BoardId, CardId, LabelId, ListId, ProjectId};
use crate::selection::ActiveSelection;
use crate::view::ViewModel;
use taskflow_core::TaskflowResult;

/// Trait ensuring the in-memory engine and the persistent session expose
/// the same operations.
/// Adding a method here forces both implementations to add it.
pub trait BoardOperations {
    // Project operations
    fn create_project(&mut self, title: &str) -> TaskflowResult<ProjectId>;
    fn delete_project(&mut self, project_id: &ProjectId) -> TaskflowResult<()>;

    // Board operations
    fn create_board(&mut self, project_id: &ProjectId, title: &str) -> TaskflowResult<BoardId>;
    fn delete_board(&mut self, board_id: &BoardId) -> TaskflowResult<()>;

    // List operations
    fn create_list(&mut self, board_id: &BoardId, title: &str) -> TaskflowResult<ListId>;
    fn delete_list(&mut self, list_id: &ListId) -> TaskflowResult<()>;

    // Card operations
    fn create_card(&mut self, list_id: &ListId, draft: CardDraft) -> TaskflowResult<CardId>;
    fn update_card(&mut self, card_id: &CardId, patch: CardPatch) -> TaskflowResult<()>;
    fn delete_card(&mut self, card_id: &CardId) -> TaskflowResult<()>;
    fn toggle_card_label(&mut self, card_id: &CardId, label_id: &LabelId) -> TaskflowResult<bool>;

    // Drag and drop
    fn begin_drag(&mut self, card_id: CardId, source_list_id: ListId);
    fn drop_on(&mut self, target_list_id: &ListId) -> TaskflowResult<DropOutcome>;
    fn cancel_drag(&mut self);

    /// Drag a card from whichever list holds it and drop it on
    /// `target_list_id` in one step.
    fn move_card(&mut self, card_id: &CardId, target_list_id: &ListId) -> TaskflowResult<DropOutcome>;

    // Navigation
    fn set_active_board(&mut self, board_id: &BoardId) -> ActiveSelection;
    fn toggle_project_expanded(&mut self, project_id: &ProjectId) -> TaskflowResult<bool>;
    fn view(&self) -> ViewModel;
}
