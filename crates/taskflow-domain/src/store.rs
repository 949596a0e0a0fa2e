//! The entity store: sole owner and mutator of the project tree.

use std::sync::Arc;
use taskflow_core::{Editable, TaskflowError, TaskflowResult};

use crate::board::DEFAULT_BACKGROUNDS;
use crate::commands::{
    Command, CommandContext, CreateBoard, CreateCard, CreateList, CreateProject, DeleteBoard,
    DeleteCard, DeleteList, DeleteProject, MoveCard, UpdateCard,
};
use crate::editable::{CardDraft, CardPatch};
use crate::ids::{BoardId, CardId, LabelId, ListId, ProjectId};
use crate::label::{LabelCatalog, LabelTarget};
use crate::snapshot::Snapshot;

#[derive(Debug, Clone)]
pub struct EntityStore {
    current: Arc<Snapshot>,
    backgrounds: Vec<String>,
}

impl Default for EntityStore {
    fn default() -> Self {
        Self::new(Snapshot::new())
    }
}

impl EntityStore {
    pub fn new(snapshot: Snapshot) -> Self {
        Self {
            current: Arc::new(snapshot),
            backgrounds: Vec::new(),
        }
    }

    /// Palette for new boards; an empty palette means the built-in one.
    pub fn with_backgrounds(mut self, backgrounds: Vec<String>) -> Self {
        self.backgrounds = backgrounds;
        self
    }

    /// The latest published snapshot.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&self.current)
    }

    pub fn current(&self) -> &Snapshot {
        &self.current
    }

    /// Replace the whole tree, e.g. when loading persisted state.
    pub fn replace(&mut self, snapshot: Snapshot) {
        self.current = Arc::new(snapshot);
    }

    /// Run a command against a working copy and publish it on success.
    pub fn execute(&mut self, command: &dyn Command) -> TaskflowResult<()> {
        tracing::debug!("Executing: {}", command.description());

        let mut working = (*self.current).clone();
        let mut context = CommandContext {
            snapshot: &mut working,
        };
        command.execute(&mut context)?;

        self.current = Arc::new(working);
        Ok(())
    }

    pub fn create_project(&mut self, title: &str) -> TaskflowResult<ProjectId> {
        let project_id = ProjectId::generate();
        self.execute(&CreateProject {
            project_id: project_id.clone(),
            title: title.to_string(),
        })?;
        Ok(project_id)
    }

    pub fn delete_project(&mut self, project_id: &ProjectId) -> TaskflowResult<()> {
        self.execute(&DeleteProject {
            project_id: project_id.clone(),
        })
    }

    pub fn create_board(&mut self, project_id: &ProjectId, title: &str) -> TaskflowResult<BoardId> {
        let board_id = BoardId::generate();
        self.execute(&CreateBoard {
            board_id: board_id.clone(),
            project_id: project_id.clone(),
            title: title.to_string(),
            background: self.next_background(),
        })?;
        Ok(board_id)
    }

    pub fn delete_board(&mut self, board_id: &BoardId) -> TaskflowResult<()> {
        self.execute(&DeleteBoard {
            board_id: board_id.clone(),
        })
    }

    pub fn create_list(&mut self, board_id: &BoardId, title: &str) -> TaskflowResult<ListId> {
        let list_id = ListId::generate();
        self.execute(&CreateList {
            list_id: list_id.clone(),
            board_id: board_id.clone(),
            title: title.to_string(),
        })?;
        Ok(list_id)
    }

    pub fn delete_list(&mut self, list_id: &ListId) -> TaskflowResult<()> {
        self.execute(&DeleteList {
            list_id: list_id.clone(),
        })
    }

    pub fn create_card(&mut self, list_id: &ListId, draft: CardDraft) -> TaskflowResult<CardId> {
        let card_id = CardId::generate();
        self.execute(&CreateCard {
            card_id: card_id.clone(),
            list_id: list_id.clone(),
            draft,
        })?;
        Ok(card_id)
    }

    pub fn update_card(&mut self, card_id: &CardId, patch: CardPatch) -> TaskflowResult<()> {
        self.execute(&UpdateCard {
            card_id: card_id.clone(),
            patch,
        })
    }

    pub fn delete_card(&mut self, card_id: &CardId) -> TaskflowResult<()> {
        self.execute(&DeleteCard {
            card_id: card_id.clone(),
        })
    }

    pub fn move_card(
        &mut self,
        card_id: &CardId,
        source_list_id: &ListId,
        target_list_id: &ListId,
    ) -> TaskflowResult<()> {
        self.execute(&MoveCard {
            card_id: card_id.clone(),
            source_list_id: source_list_id.clone(),
            target_list_id: target_list_id.clone(),
        })
    }

    /// Toggle a catalog label on a stored card. Returns `true` when the
    /// label ended up assigned.
    pub fn toggle_card_label(
        &mut self,
        card_id: &CardId,
        catalog: &LabelCatalog,
        label_id: &LabelId,
    ) -> TaskflowResult<bool> {
        let card = self
            .current
            .card(card_id)
            .ok_or_else(|| TaskflowError::not_found("card", card_id))?;

        let mut draft = CardDraft::from_entity(card);
        let assigned = draft.toggle_label(catalog, label_id)?;
        self.update_card(
            card_id,
            CardPatch {
                label_names: Some(draft.label_names),
                ..Default::default()
            },
        )?;
        Ok(assigned)
    }

    fn next_background(&self) -> String {
        let index = self.current.board_count();
        if self.backgrounds.is_empty() {
            DEFAULT_BACKGROUNDS[index % DEFAULT_BACKGROUNDS.len()].to_string()
        } else {
            self.backgrounds[index % self.backgrounds.len()].clone()
        }
    }
}
