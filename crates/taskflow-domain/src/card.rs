use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::ids::CardId;
use crate::label::LabelTarget;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Names of catalog labels. Older data calls this field `labels`.
    #[serde(default, alias = "labels")]
    pub label_names: BTreeSet<String>,
}

impl Card {
    pub fn new(title: String) -> Self {
        Self::with_id(CardId::generate(), title)
    }

    pub fn with_id(id: CardId, title: String) -> Self {
        Self {
            id,
            title,
            description: None,
            label_names: BTreeSet::new(),
        }
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = normalize_description(description);
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
}

impl LabelTarget for Card {
    fn label_names_mut(&mut self) -> &mut BTreeSet<String> {
        &mut self.label_names
    }
}

/// Blank descriptions are stored as `None`.
pub(crate) fn normalize_description(description: Option<String>) -> Option<String> {
    description.filter(|d| !d.trim().is_empty())
}
