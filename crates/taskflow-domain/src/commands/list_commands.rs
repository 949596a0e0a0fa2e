use super::{required_title, Command, CommandContext};
use crate::ids::{BoardId, ListId};
use crate::list::List;
use std::sync::Arc;
use taskflow_core::{TaskflowError, TaskflowResult};

pub const EMPTY_LIST_TITLE: &str = "Please enter a list title";

/// Append a new list to a board
pub struct CreateList {
    pub list_id: ListId,
    pub board_id: BoardId,
    pub title: String,
}

impl Command for CreateList {
    fn execute(&self, context: &mut CommandContext) -> TaskflowResult<()> {
        let title = required_title(&self.title, EMPTY_LIST_TITLE)?;
        let path = context
            .snapshot
            .locate_board(&self.board_id)
            .ok_or_else(|| TaskflowError::not_found("board", &self.board_id))?;

        let list = List::with_id(self.list_id.clone(), title);
        context.snapshot.board_at_mut(path).lists.push(Arc::new(list));
        Ok(())
    }

    fn description(&self) -> String {
        format!("Create list: '{}'", self.title)
    }
}

/// Delete a list and every card in it
pub struct DeleteList {
    pub list_id: ListId,
}

impl Command for DeleteList {
    fn execute(&self, context: &mut CommandContext) -> TaskflowResult<()> {
        let path = context
            .snapshot
            .locate_list(&self.list_id)
            .ok_or_else(|| TaskflowError::not_found("list", &self.list_id))?;
        context
            .snapshot
            .board_at_mut(path.board_path())
            .lists
            .remove(path.list);
        Ok(())
    }

    fn description(&self) -> String {
        format!("Delete list {}", self.list_id)
    }
}
