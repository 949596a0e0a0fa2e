use crate::snapshot::Snapshot;
use taskflow_core::{TaskflowError, TaskflowResult};

pub mod board_commands;
pub mod card_commands;
pub mod list_commands;
pub mod project_commands;

pub use board_commands::*;
pub use card_commands::*;
pub use list_commands::*;
pub use project_commands::*;

/// A mutation of the project tree.
///
/// Commands run against a working copy of the current snapshot. When
/// `execute` returns an error the working copy is discarded, so a failing
/// command never leaves a partial change behind.
pub trait Command: Send + Sync {
    fn execute(&self, context: &mut CommandContext) -> TaskflowResult<()>;

    /// Human-readable description of what this command does
    fn description(&self) -> String;
}

/// The working copy a command mutates.
pub struct CommandContext<'a> {
    pub snapshot: &'a mut Snapshot,
}

/// Trimmed title, or a validation error carrying `empty_message`.
pub(crate) fn required_title(title: &str, empty_message: &str) -> TaskflowResult<String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(TaskflowError::validation(empty_message));
    }
    Ok(trimmed.to_string())
}
