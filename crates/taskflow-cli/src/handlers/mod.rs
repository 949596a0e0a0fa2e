pub mod board;
pub mod card;
pub mod label;
pub mod list;
pub mod project;
pub mod view;

use crate::cli::Commands;
use serde::Serialize;
use serde_json::Value;
use taskflow_core::{TaskflowError, TaskflowResult};
use taskflow_persistence::Session;

/// Run one command against an open session and return the response data.
pub fn dispatch(session: &mut Session, command: Commands) -> TaskflowResult<Value> {
    match command {
        Commands::Project(cmd) => project::handle(session, cmd.action),
        Commands::Board(cmd) => board::handle(session, cmd.action),
        Commands::List(cmd) => list::handle(session, cmd.action),
        Commands::Card(cmd) => card::handle(session, cmd.action),
        Commands::Label(cmd) => label::handle(session, cmd.action),
        Commands::View => view::handle(session),
        Commands::Completions { .. } => Err(TaskflowError::Internal(
            "completions do not need a session".to_string(),
        )),
    }
}

pub(crate) fn to_data<T: Serialize>(value: &T) -> TaskflowResult<Value> {
    serde_json::to_value(value).map_err(|e| TaskflowError::Serialization(e.to_string()))
}
