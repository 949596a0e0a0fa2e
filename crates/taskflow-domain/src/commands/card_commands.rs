use super::{Command, CommandContext};
use crate::editable::{CardDraft, CardPatch, EMPTY_CARD_TITLE_ON_CREATE, EMPTY_CARD_TITLE_ON_EDIT};
use crate::ids::{CardId, ListId};
use std::sync::Arc;
use taskflow_core::{Editable, TaskflowError, TaskflowResult};

pub const CROSS_BOARD_MOVE: &str = "Cards can only be moved between lists on the same board";

/// Append a new card to a list
pub struct CreateCard {
    pub card_id: CardId,
    pub list_id: ListId,
    pub draft: CardDraft,
}

impl Command for CreateCard {
    fn execute(&self, context: &mut CommandContext) -> TaskflowResult<()> {
        self.draft.validate(EMPTY_CARD_TITLE_ON_CREATE)?;
        let path = context
            .snapshot
            .locate_list(&self.list_id)
            .ok_or_else(|| TaskflowError::not_found("list", &self.list_id))?;

        let card = self.draft.clone().into_card(self.card_id.clone());
        context.snapshot.list_at_mut(path).push_card(Arc::new(card));
        Ok(())
    }

    fn description(&self) -> String {
        format!("Create card: '{}'", self.draft.title)
    }
}

/// Replace title, description and labels of a card in place
pub struct UpdateCard {
    pub card_id: CardId,
    pub patch: CardPatch,
}

impl Command for UpdateCard {
    fn execute(&self, context: &mut CommandContext) -> TaskflowResult<()> {
        let path = context
            .snapshot
            .locate_card(&self.card_id)
            .ok_or_else(|| TaskflowError::not_found("card", &self.card_id))?;

        let card = context.snapshot.card_at_mut(path);
        let mut draft = CardDraft::from_entity(card);
        self.patch.clone().apply_to_draft(&mut draft);
        draft.validate(EMPTY_CARD_TITLE_ON_EDIT)?;
        draft.apply_to(card);
        Ok(())
    }

    fn description(&self) -> String {
        format!("Update card {}", self.card_id)
    }
}

/// Remove a card from its list
pub struct DeleteCard {
    pub card_id: CardId,
}

impl Command for DeleteCard {
    fn execute(&self, context: &mut CommandContext) -> TaskflowResult<()> {
        let path = context
            .snapshot
            .locate_card(&self.card_id)
            .ok_or_else(|| TaskflowError::not_found("card", &self.card_id))?;
        context
            .snapshot
            .list_at_mut(path.list_path())
            .cards
            .remove(path.card);
        Ok(())
    }

    fn description(&self) -> String {
        format!("Delete card {}", self.card_id)
    }
}

/// Move a card from its source list to the end of another list on the
/// same board
pub struct MoveCard {
    pub card_id: CardId,
    pub source_list_id: ListId,
    pub target_list_id: ListId,
}

impl Command for MoveCard {
    fn execute(&self, context: &mut CommandContext) -> TaskflowResult<()> {
        let source = context.snapshot.locate_list(&self.source_list_id).ok_or_else(|| {
            TaskflowError::invariant(format!(
                "source list {} of card {} no longer exists",
                self.source_list_id, self.card_id
            ))
        })?;
        let target = context
            .snapshot
            .locate_list(&self.target_list_id)
            .ok_or_else(|| TaskflowError::not_found("list", &self.target_list_id))?;

        if source.board_path() != target.board_path() {
            return Err(TaskflowError::validation(CROSS_BOARD_MOVE));
        }

        let card_index = context.snapshot.projects[source.project].boards[source.board].lists
            [source.list]
            .card_position(&self.card_id)
            .ok_or_else(|| {
                TaskflowError::invariant(format!(
                    "card {} is not in list {}",
                    self.card_id, self.source_list_id
                ))
            })?;

        if source == target {
            return Ok(());
        }

        let board = context.snapshot.board_at_mut(source.board_path());
        let card = Arc::make_mut(&mut board.lists[source.list])
            .cards
            .remove(card_index);
        Arc::make_mut(&mut board.lists[target.list]).push_card(card);
        Ok(())
    }

    fn description(&self) -> String {
        format!(
            "Move card {} from list {} to list {}",
            self.card_id, self.source_list_id, self.target_list_id
        )
    }
}
