use crate::card::{normalize_description, Card};
use crate::field_update::FieldUpdate;
use crate::ids::CardId;
use crate::label::LabelTarget;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use taskflow_core::{Editable, TaskflowError, TaskflowResult};

pub const EMPTY_CARD_TITLE_ON_CREATE: &str = "Please enter a card title";
pub const EMPTY_CARD_TITLE_ON_EDIT: &str = "Card title cannot be empty";

/// The contents of the card form, for a new card or one being edited.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDraft {
    pub title: String,
    pub description: Option<String>,
    pub label_names: BTreeSet<String>,
}

impl CardDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_labels<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.label_names = names.into_iter().map(Into::into).collect();
        self
    }

    /// Fails with `empty_message` when the title is blank.
    pub fn validate(&self, empty_message: &str) -> TaskflowResult<()> {
        if self.title.trim().is_empty() {
            return Err(TaskflowError::validation(empty_message));
        }
        Ok(())
    }

    pub fn into_card(self, id: CardId) -> Card {
        Card::with_id(id, self.title.trim().to_string())
            .with_description(self.description)
            .with_labels(self.label_names)
    }
}

impl Editable<Card> for CardDraft {
    fn from_entity(card: &Card) -> Self {
        Self {
            title: card.title.clone(),
            description: card.description.clone(),
            label_names: card.label_names.clone(),
        }
    }

    fn apply_to(self, card: &mut Card) {
        card.title = self.title.trim().to_string();
        card.description = normalize_description(self.description);
        card.label_names = self.label_names;
    }
}

impl LabelTarget for CardDraft {
    fn label_names_mut(&mut self) -> &mut BTreeSet<String> {
        &mut self.label_names
    }
}

/// Changes to apply to an existing card. Unset fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardPatch {
    pub title: Option<String>,
    pub description: FieldUpdate<String>,
    pub label_names: Option<BTreeSet<String>>,
}

impl CardPatch {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && !self.description.is_change() && self.label_names.is_none()
    }

    pub fn apply_to_draft(self, draft: &mut CardDraft) {
        if let Some(title) = self.title {
            draft.title = title;
        }
        self.description.apply_to(&mut draft.description);
        if let Some(names) = self.label_names {
            draft.label_names = names;
        }
    }
}

impl From<CardDraft> for CardPatch {
    /// A submitted editor form replaces every field.
    fn from(draft: CardDraft) -> Self {
        Self {
            title: Some(draft.title),
            description: draft.description.into(),
            label_names: Some(draft.label_names),
        }
    }
}
