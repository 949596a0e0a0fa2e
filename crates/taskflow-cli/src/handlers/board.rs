use super::to_data;
use crate::cli::BoardAction;
use crate::output::ListResponse;
use serde::Serialize;
use serde_json::{json, Value};
use taskflow_core::{TaskflowError, TaskflowResult};
use taskflow_domain::{BoardId, BoardOperations, ProjectId};
use taskflow_persistence::Session;

#[derive(Serialize)]
struct BoardSummary {
    id: BoardId,
    project_id: ProjectId,
    title: String,
    background: String,
    list_count: usize,
    card_count: usize,
    active: bool,
}

pub fn handle(session: &mut Session, action: BoardAction) -> TaskflowResult<Value> {
    match action {
        BoardAction::Create { project_id, title } => {
            let id = session.create_board(&ProjectId::from(project_id), &title)?;
            let snapshot = session.engine().snapshot();
            let (_, board) = snapshot
                .board(&id)
                .ok_or_else(|| TaskflowError::not_found("board", &id))?;
            to_data(board)
        }
        BoardAction::List { project_id } => {
            let project_id = project_id.map(ProjectId::from);
            let active = session.engine().resolve_active_board().board_id().cloned();
            let snapshot = session.engine().snapshot();
            let items: Vec<BoardSummary> = snapshot
                .boards()
                .filter(|(project, _)| project_id.as_ref().map_or(true, |id| &project.id == id))
                .map(|(project, board)| BoardSummary {
                    id: board.id.clone(),
                    project_id: project.id.clone(),
                    title: board.title.clone(),
                    background: board.background.clone(),
                    list_count: board.lists.len(),
                    card_count: board.card_count(),
                    active: active.as_ref() == Some(&board.id),
                })
                .collect();
            to_data(&ListResponse::new(items))
        }
        BoardAction::Get { id } => {
            let board = match id {
                Some(id) => {
                    let id = BoardId::from(id);
                    let snapshot = session.engine().snapshot();
                    snapshot
                        .board(&id)
                        .map(|(_, board)| board.clone())
                        .ok_or_else(|| TaskflowError::not_found("board", &id))?
                }
                None => session
                    .view()
                    .active_board
                    .ok_or_else(|| TaskflowError::NotFound("no active board".to_string()))?,
            };
            to_data(&board)
        }
        BoardAction::Delete { id } => {
            let id = BoardId::from(id);
            session.delete_board(&id)?;
            Ok(json!({ "deleted": id }))
        }
        BoardAction::Activate { id } => {
            let id = BoardId::from(id);
            if session.engine().snapshot().board(&id).is_none() {
                return Err(TaskflowError::not_found("board", &id));
            }
            let selection = session.set_active_board(&id);
            to_data(&selection)
        }
    }
}
