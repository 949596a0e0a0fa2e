//! Which board is open and which projects are expanded in the sidebar.

use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use taskflow_core::{TaskflowError, TaskflowResult};

use crate::board::Board;
use crate::ids::{BoardId, ProjectId};
use crate::project::Project;
use crate::snapshot::Snapshot;

/// The resolved project/board pair the user is looking at.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ActiveSelection {
    pub project: Option<Arc<Project>>,
    pub board: Option<Arc<Board>>,
}

impl ActiveSelection {
    pub fn board_id(&self) -> Option<&BoardId> {
        self.board.as_ref().map(|board| &board.id)
    }

    pub fn project_id(&self) -> Option<&ProjectId> {
        self.project.as_ref().map(|project| &project.id)
    }
}

/// Resolve the active board against the tree.
///
/// A stored id that still exists wins. Otherwise the first board in tree
/// order is used. With no boards at all the first project (if any) is
/// returned without a board.
pub fn resolve_active_board(snapshot: &Snapshot, active_board_id: Option<&BoardId>) -> ActiveSelection {
    let found = active_board_id
        .and_then(|id| snapshot.board(id))
        .or_else(|| snapshot.first_board());

    match found {
        Some((project, board)) => ActiveSelection {
            project: Some(Arc::clone(project)),
            board: Some(Arc::clone(board)),
        },
        None => ActiveSelection {
            project: snapshot.projects.first().cloned(),
            board: None,
        },
    }
}

#[derive(Debug, Clone, Default)]
pub struct Selection {
    active_board_id: Option<BoardId>,
    expanded: BTreeMap<ProjectId, bool>,
    initialized: bool,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_board_id(&self) -> Option<&BoardId> {
        self.active_board_id.as_ref()
    }

    /// Adopt the stored board id and compute the expanded defaults. Only the
    /// first call has an effect. Returns `true` when the stored id had to
    /// be replaced.
    pub fn initialize(&mut self, snapshot: &Snapshot, stored: Option<BoardId>) -> bool {
        if self.initialized {
            return false;
        }
        self.initialized = true;
        self.active_board_id = stored;
        let changed = self.reconcile(snapshot);

        let active_project = self.active(snapshot).project_id().cloned();
        self.expanded = snapshot
            .projects
            .iter()
            .map(|project| (project.id.clone(), Some(&project.id) == active_project.as_ref()))
            .collect();
        changed
    }

    pub fn active(&self, snapshot: &Snapshot) -> ActiveSelection {
        resolve_active_board(snapshot, self.active_board_id.as_ref())
    }

    /// Point at `board_id`, or at the fallback board when it does not
    /// exist. Returns `true` when the stored id changed.
    pub fn set_active_board(&mut self, snapshot: &Snapshot, board_id: &BoardId) -> bool {
        let next = if snapshot.board(board_id).is_some() {
            Some(board_id.clone())
        } else {
            let fallback = snapshot.first_board().map(|(_, board)| board.id.clone());
            tracing::warn!(
                "Board {} not found, falling back to {}",
                board_id,
                fallback.as_ref().map_or("no board", |id| id.as_str())
            );
            fallback
        };

        let changed = next != self.active_board_id;
        self.active_board_id = next;
        changed
    }

    /// Flip the expanded flag of a project and return the new value.
    pub fn toggle_project_expanded(
        &mut self,
        snapshot: &Snapshot,
        project_id: &ProjectId,
    ) -> TaskflowResult<bool> {
        if snapshot.project(project_id).is_none() {
            return Err(TaskflowError::not_found("project", project_id));
        }
        let flag = self.expanded.entry(project_id.clone()).or_insert(false);
        *flag = !*flag;
        Ok(*flag)
    }

    pub fn is_expanded(&self, project_id: &ProjectId) -> bool {
        self.expanded.get(project_id).copied().unwrap_or(false)
    }

    /// Expanded flag of every project in the tree.
    pub fn expanded_projects(&self, snapshot: &Snapshot) -> BTreeMap<ProjectId, bool> {
        snapshot
            .projects
            .iter()
            .map(|project| (project.id.clone(), self.is_expanded(&project.id)))
            .collect()
    }

    /// Bring the selection back in line with the tree after a mutation.
    /// Returns `true` when the stored board id changed.
    pub fn reconcile(&mut self, snapshot: &Snapshot) -> bool {
        self.expanded
            .retain(|project_id, _| snapshot.project(project_id).is_some());

        let stale = match self.active_board_id.take() {
            Some(id) if snapshot.board(&id).is_none() => id,
            kept => {
                self.active_board_id = kept;
                return false;
            }
        };

        let fallback = snapshot.first_board().map(|(_, board)| board.id.clone());
        tracing::warn!(
            "Active board {} no longer exists, falling back to {}",
            stale,
            fallback.as_ref().map_or("no board", |id| id.as_str())
        );
        self.active_board_id = fallback;
        true
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
