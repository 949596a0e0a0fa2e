//! Content shown on the very first run.

use std::sync::Arc;

use crate::board::{Board, DEFAULT_BACKGROUNDS};
use crate::editable::CardDraft;
use crate::ids::CardId;
use crate::list::List;
use crate::project::Project;
use crate::snapshot::{PersistedState, Snapshot};

pub const STARTER_PROJECT_TITLE: &str = "My Project";
pub const STARTER_BOARD_TITLE: &str = "My First Board";

fn starter_list(title: &str, cards: Vec<CardDraft>) -> Arc<List> {
    let mut list = List::new(title.to_string());
    for draft in cards {
        list.push_card(Arc::new(draft.into_card(CardId::generate())));
    }
    Arc::new(list)
}

/// One project holding one board with three populated lists, with that
/// board active.
pub fn starter_state() -> PersistedState {
    let mut board = Board::new(
        STARTER_BOARD_TITLE.to_string(),
        DEFAULT_BACKGROUNDS[0].to_string(),
    );
    board.lists = vec![
        starter_list(
            "To Do",
            vec![
                CardDraft::new("Create project plan")
                    .with_description("Outline tasks and timeline")
                    .with_labels(["Design"]),
                CardDraft::new("Design wireframes")
                    .with_description("Create low-fidelity mockups")
                    .with_labels(["Design", "UX"]),
            ],
        ),
        starter_list(
            "In Progress",
            vec![CardDraft::new("Set up development environment")
                .with_description("Install all necessary tools and dependencies")
                .with_labels(["Development"])],
        ),
        starter_list(
            "Done",
            vec![CardDraft::new("Define project scope")
                .with_description("Document requirements and deliverables")
                .with_labels(["Planning"])],
        ),
    ];

    let board_id = board.id.clone();
    let mut project = Project::new(STARTER_PROJECT_TITLE.to_string());
    project.boards.push(Arc::new(board));

    PersistedState::new(Snapshot::from_projects(vec![project]), Some(board_id))
}
