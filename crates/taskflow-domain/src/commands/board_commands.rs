use super::{required_title, Command, CommandContext};
use crate::board::Board;
use crate::ids::{BoardId, ProjectId};
use std::sync::Arc;
use taskflow_core::{TaskflowError, TaskflowResult};

pub const EMPTY_BOARD_TITLE: &str = "Please enter a board title";

/// Append a new board to a project
pub struct CreateBoard {
    pub board_id: BoardId,
    pub project_id: ProjectId,
    pub title: String,
    pub background: String,
}

impl Command for CreateBoard {
    fn execute(&self, context: &mut CommandContext) -> TaskflowResult<()> {
        let title = required_title(&self.title, EMPTY_BOARD_TITLE)?;
        let index = context
            .snapshot
            .project_position(&self.project_id)
            .ok_or_else(|| TaskflowError::not_found("project", &self.project_id))?;

        let board = Board::with_id(self.board_id.clone(), title, self.background.clone());
        context
            .snapshot
            .project_at_mut(index)
            .boards
            .push(Arc::new(board));
        Ok(())
    }

    fn description(&self) -> String {
        format!("Create board: '{}'", self.title)
    }
}

/// Delete a board with its lists and cards
pub struct DeleteBoard {
    pub board_id: BoardId,
}

impl Command for DeleteBoard {
    fn execute(&self, context: &mut CommandContext) -> TaskflowResult<()> {
        let path = context
            .snapshot
            .locate_board(&self.board_id)
            .ok_or_else(|| TaskflowError::not_found("board", &self.board_id))?;
        context
            .snapshot
            .project_at_mut(path.project)
            .boards
            .remove(path.board);
        Ok(())
    }

    fn description(&self) -> String {
        format!("Delete board {}", self.board_id)
    }
}
