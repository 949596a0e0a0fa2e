use super::{required_title, Command, CommandContext};
use crate::ids::ProjectId;
use crate::project::Project;
use std::sync::Arc;
use taskflow_core::{TaskflowError, TaskflowResult};

pub const EMPTY_PROJECT_TITLE: &str = "Please enter a project title";

/// Append a new, empty project
pub struct CreateProject {
    pub project_id: ProjectId,
    pub title: String,
}

impl Command for CreateProject {
    fn execute(&self, context: &mut CommandContext) -> TaskflowResult<()> {
        let title = required_title(&self.title, EMPTY_PROJECT_TITLE)?;
        let project = Project::with_id(self.project_id.clone(), title);
        context.snapshot.projects.push(Arc::new(project));
        Ok(())
    }

    fn description(&self) -> String {
        format!("Create project: '{}'", self.title)
    }
}

/// Delete a project with all of its boards, lists and cards
pub struct DeleteProject {
    pub project_id: ProjectId,
}

impl Command for DeleteProject {
    fn execute(&self, context: &mut CommandContext) -> TaskflowResult<()> {
        let index = context
            .snapshot
            .project_position(&self.project_id)
            .ok_or_else(|| TaskflowError::not_found("project", &self.project_id))?;
        context.snapshot.projects.remove(index);
        Ok(())
    }

    fn description(&self) -> String {
        format!("Delete project {}", self.project_id)
    }
}
