use super::to_data;
use crate::cli::ProjectAction;
use crate::output::ListResponse;
use serde::Serialize;
use serde_json::{json, Value};
use taskflow_core::{TaskflowError, TaskflowResult};
use taskflow_domain::{BoardOperations, ProjectId};
use taskflow_persistence::Session;

#[derive(Serialize)]
struct ProjectSummary {
    id: ProjectId,
    title: String,
    board_count: usize,
    expanded: bool,
}

pub fn handle(session: &mut Session, action: ProjectAction) -> TaskflowResult<Value> {
    match action {
        ProjectAction::Create { title } => {
            let id = session.create_project(&title)?;
            let snapshot = session.engine().snapshot();
            let project = snapshot
                .project(&id)
                .ok_or_else(|| TaskflowError::not_found("project", &id))?;
            to_data(project)
        }
        ProjectAction::List => {
            let view = session.view();
            let items: Vec<ProjectSummary> = view
                .projects
                .iter()
                .map(|project| ProjectSummary {
                    id: project.id.clone(),
                    title: project.title.clone(),
                    board_count: project.boards.len(),
                    expanded: view
                        .expanded_projects
                        .get(&project.id)
                        .copied()
                        .unwrap_or(false),
                })
                .collect();
            to_data(&ListResponse::new(items))
        }
        ProjectAction::Delete { id } => {
            let id = ProjectId::from(id);
            session.delete_project(&id)?;
            Ok(json!({ "deleted": id }))
        }
        ProjectAction::Expand { id } => {
            let id = ProjectId::from(id);
            let expanded = session.toggle_project_expanded(&id)?;
            Ok(json!({ "id": id, "expanded": expanded }))
        }
    }
}
