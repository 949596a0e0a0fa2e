//! Point-in-time capture of the project tree.
//!
//! A `Snapshot` is never mutated once published. Operations clone it (a
//! shallow copy of the project `Arc`s), mutate the clone through the
//! `*_at_mut` accessors, which copy only the nodes on the path being
//! changed, and publish the result as the next snapshot. Readers holding an
//! older `Arc<Snapshot>` keep seeing a complete, consistent tree.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use taskflow_core::{TaskflowError, TaskflowResult};

use crate::board::Board;
use crate::card::Card;
use crate::ids::{BoardId, CardId, ListId, ProjectId};
use crate::list::List;
use crate::project::Project;

/// Index path to a board inside a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardPath {
    pub project: usize,
    pub board: usize,
}

/// Index path to a list inside a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListPath {
    pub project: usize,
    pub board: usize,
    pub list: usize,
}

impl ListPath {
    pub fn board_path(&self) -> BoardPath {
        BoardPath {
            project: self.project,
            board: self.board,
        }
    }
}

/// Index path to a card inside a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardPath {
    pub project: usize,
    pub board: usize,
    pub list: usize,
    pub card: usize,
}

impl CardPath {
    pub fn list_path(&self) -> ListPath {
        ListPath {
            project: self.project,
            board: self.board,
            list: self.list,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    pub projects: Vec<Arc<Project>>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_projects(projects: Vec<Project>) -> Self {
        Self {
            projects: projects.into_iter().map(Arc::new).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    pub fn project(&self, id: &ProjectId) -> Option<&Arc<Project>> {
        self.projects.iter().find(|project| &project.id == id)
    }

    pub fn project_position(&self, id: &ProjectId) -> Option<usize> {
        self.projects.iter().position(|project| &project.id == id)
    }

    pub fn boards(&self) -> impl Iterator<Item = (&Arc<Project>, &Arc<Board>)> {
        self.projects
            .iter()
            .flat_map(|project| project.boards.iter().map(move |board| (project, board)))
    }

    pub fn lists(&self) -> impl Iterator<Item = (&Arc<Board>, &Arc<List>)> {
        self.boards()
            .flat_map(|(_, board)| board.lists.iter().map(move |list| (board, list)))
    }

    pub fn cards(&self) -> impl Iterator<Item = (&Arc<List>, &Arc<Card>)> {
        self.lists()
            .flat_map(|(_, list)| list.cards.iter().map(move |card| (list, card)))
    }

    /// The board with the given id together with its owning project.
    pub fn board(&self, id: &BoardId) -> Option<(&Arc<Project>, &Arc<Board>)> {
        self.boards().find(|(_, board)| &board.id == id)
    }

    pub fn list(&self, id: &ListId) -> Option<&Arc<List>> {
        self.lists().map(|(_, list)| list).find(|list| &list.id == id)
    }

    pub fn card(&self, id: &CardId) -> Option<&Arc<Card>> {
        self.cards().map(|(_, card)| card).find(|card| &card.id == id)
    }

    /// The board owning a list.
    pub fn board_of_list(&self, id: &ListId) -> Option<&Arc<Board>> {
        self.lists()
            .find(|(_, list)| &list.id == id)
            .map(|(board, _)| board)
    }

    /// The list owning a card.
    pub fn list_of_card(&self, id: &CardId) -> Option<&Arc<List>> {
        self.cards()
            .find(|(_, card)| &card.id == id)
            .map(|(list, _)| list)
    }

    /// The first board in tree order, with its project.
    pub fn first_board(&self) -> Option<(&Arc<Project>, &Arc<Board>)> {
        self.boards().next()
    }

    pub fn board_count(&self) -> usize {
        self.boards().count()
    }

    pub fn list_count(&self) -> usize {
        self.lists().count()
    }

    pub fn card_count(&self) -> usize {
        self.cards().count()
    }

    pub fn locate_board(&self, id: &BoardId) -> Option<BoardPath> {
        self.projects.iter().enumerate().find_map(|(p, project)| {
            project
                .boards
                .iter()
                .position(|board| &board.id == id)
                .map(|b| BoardPath {
                    project: p,
                    board: b,
                })
        })
    }

    pub fn locate_list(&self, id: &ListId) -> Option<ListPath> {
        for (p, project) in self.projects.iter().enumerate() {
            for (b, board) in project.boards.iter().enumerate() {
                if let Some(l) = board.list_position(id) {
                    return Some(ListPath {
                        project: p,
                        board: b,
                        list: l,
                    });
                }
            }
        }
        None
    }

    pub fn locate_card(&self, id: &CardId) -> Option<CardPath> {
        for (p, project) in self.projects.iter().enumerate() {
            for (b, board) in project.boards.iter().enumerate() {
                for (l, list) in board.lists.iter().enumerate() {
                    if let Some(c) = list.card_position(id) {
                        return Some(CardPath {
                            project: p,
                            board: b,
                            list: l,
                            card: c,
                        });
                    }
                }
            }
        }
        None
    }

    pub fn project_at_mut(&mut self, index: usize) -> &mut Project {
        Arc::make_mut(&mut self.projects[index])
    }

    pub fn board_at_mut(&mut self, path: BoardPath) -> &mut Board {
        let project = self.project_at_mut(path.project);
        Arc::make_mut(&mut project.boards[path.board])
    }

    pub fn list_at_mut(&mut self, path: ListPath) -> &mut List {
        let board = self.board_at_mut(path.board_path());
        Arc::make_mut(&mut board.lists[path.list])
    }

    pub fn card_at_mut(&mut self, path: CardPath) -> &mut Card {
        let list = self.list_at_mut(path.list_path());
        Arc::make_mut(&mut list.cards[path.card])
    }

    /// Fails with `InvariantViolation` when any id occurs twice within its
    /// entity kind.
    pub fn check_integrity(&self) -> TaskflowResult<()> {
        fn unique<'a, I>(kind: &str, ids: I) -> TaskflowResult<()>
        where
            I: Iterator<Item = &'a str>,
        {
            let mut seen = HashSet::new();
            for id in ids {
                if !seen.insert(id) {
                    return Err(TaskflowError::invariant(format!(
                        "duplicate {} id {}",
                        kind, id
                    )));
                }
            }
            Ok(())
        }

        unique("project", self.projects.iter().map(|p| p.id.as_str()))?;
        unique("board", self.boards().map(|(_, b)| b.id.as_str()))?;
        unique("list", self.lists().map(|(_, l)| l.id.as_str()))?;
        unique("card", self.cards().map(|(_, c)| c.id.as_str()))?;
        Ok(())
    }

    /// Give every entity whose id was already used earlier in tree order a
    /// freshly generated id. Returns the number of entities re-keyed.
    pub fn repair_duplicate_ids(&mut self) -> usize {
        let mut repaired = 0;
        let mut projects_seen = HashSet::new();
        let mut boards_seen = HashSet::new();
        let mut lists_seen = HashSet::new();
        let mut cards_seen = HashSet::new();

        for p in 0..self.projects.len() {
            if !projects_seen.insert(self.projects[p].id.clone()) {
                let fresh = ProjectId::generate();
                tracing::warn!("Re-keyed duplicate project {} as {}", self.projects[p].id, fresh);
                self.project_at_mut(p).id = fresh.clone();
                projects_seen.insert(fresh);
                repaired += 1;
            }
            for b in 0..self.projects[p].boards.len() {
                let board_path = BoardPath {
                    project: p,
                    board: b,
                };
                if !boards_seen.insert(self.projects[p].boards[b].id.clone()) {
                    let fresh = BoardId::generate();
                    tracing::warn!(
                        "Re-keyed duplicate board {} as {}",
                        self.projects[p].boards[b].id,
                        fresh
                    );
                    self.board_at_mut(board_path).id = fresh.clone();
                    boards_seen.insert(fresh);
                    repaired += 1;
                }
                for l in 0..self.projects[p].boards[b].lists.len() {
                    let list_path = ListPath {
                        project: p,
                        board: b,
                        list: l,
                    };
                    if !lists_seen.insert(self.projects[p].boards[b].lists[l].id.clone()) {
                        let fresh = ListId::generate();
                        tracing::warn!(
                            "Re-keyed duplicate list {} as {}",
                            self.projects[p].boards[b].lists[l].id,
                            fresh
                        );
                        self.list_at_mut(list_path).id = fresh.clone();
                        lists_seen.insert(fresh);
                        repaired += 1;
                    }
                    for c in 0..self.projects[p].boards[b].lists[l].cards.len() {
                        let card_id = self.projects[p].boards[b].lists[l].cards[c].id.clone();
                        if !cards_seen.insert(card_id.clone()) {
                            let fresh = CardId::generate();
                            tracing::warn!("Re-keyed duplicate card {} as {}", card_id, fresh);
                            self.card_at_mut(CardPath {
                                project: p,
                                board: b,
                                list: l,
                                card: c,
                            })
                            .id = fresh.clone();
                            cards_seen.insert(fresh);
                            repaired += 1;
                        }
                    }
                }
            }
        }
        repaired
    }
}

/// Everything that survives a restart: the tree plus the active board
/// pointer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersistedState {
    pub snapshot: Snapshot,
    pub active_board_id: Option<BoardId>,
}

impl PersistedState {
    pub fn new(snapshot: Snapshot, active_board_id: Option<BoardId>) -> Self {
        Self {
            snapshot,
            active_board_id,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot.is_empty() && self.active_board_id.is_none()
    }
}
