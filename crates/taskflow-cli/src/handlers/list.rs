use super::to_data;
use crate::cli::ListAction;
use serde_json::{json, Value};
use taskflow_core::{TaskflowError, TaskflowResult};
use taskflow_domain::{BoardId, BoardOperations, ListId};
use taskflow_persistence::Session;

pub fn handle(session: &mut Session, action: ListAction) -> TaskflowResult<Value> {
    match action {
        ListAction::Create { board_id, title } => {
            let id = session.create_list(&BoardId::from(board_id), &title)?;
            let snapshot = session.engine().snapshot();
            let list = snapshot
                .list(&id)
                .ok_or_else(|| TaskflowError::not_found("list", &id))?;
            to_data(list)
        }
        ListAction::Delete { id } => {
            let id = ListId::from(id);
            session.delete_list(&id)?;
            Ok(json!({ "deleted": id }))
        }
    }
}
