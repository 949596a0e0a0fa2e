use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::board::Board;
use crate::card::Card;
use crate::drag::DragToken;
use crate::ids::ProjectId;
use crate::label::{Label, LabelCatalog};
use crate::project::Project;
use crate::selection::Selection;
use crate::snapshot::Snapshot;

/// Read-only picture of the engine handed to the rendering layer after
/// every operation.
#[derive(Debug, Clone, Serialize)]
pub struct ViewModel {
    pub projects: Vec<Arc<Project>>,
    pub active_project: Option<Arc<Project>>,
    pub active_board: Option<Arc<Board>>,
    pub expanded_projects: BTreeMap<ProjectId, bool>,
    pub labels: Vec<Label>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drag: Option<DragToken>,
}

impl ViewModel {
    pub fn build(
        snapshot: &Snapshot,
        selection: &Selection,
        catalog: &LabelCatalog,
        drag: Option<DragToken>,
    ) -> Self {
        let active = selection.active(snapshot);
        Self {
            projects: snapshot.projects.clone(),
            active_project: active.project,
            active_board: active.board,
            expanded_projects: selection.expanded_projects(snapshot),
            labels: catalog.labels().to_vec(),
            drag,
        }
    }

    /// Catalog labels to render on `card`, in catalog order. Names the
    /// catalog does not know are left out.
    pub fn card_labels<'a>(&'a self, card: &Card) -> Vec<&'a Label> {
        self.labels
            .iter()
            .filter(|label| card.label_names.contains(&label.name))
            .collect()
    }
}
