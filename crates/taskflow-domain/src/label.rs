use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use taskflow_core::{TaskflowError, TaskflowResult};

use crate::ids::LabelId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub id: LabelId,
    pub name: String,
    pub color: String,
}

impl Label {
    pub fn new(id: impl Into<LabelId>, name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color: color.into(),
        }
    }
}

/// The fixed set of labels cards can be tagged with.
///
/// Cards reference labels by name. Names missing from the catalog are kept
/// on the card but never rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelCatalog {
    labels: Vec<Label>,
}

impl Default for LabelCatalog {
    fn default() -> Self {
        Self::new(vec![
            Label::new("label-1", "Design", "bg-blue-500"),
            Label::new("label-2", "Development", "bg-green-500"),
            Label::new("label-3", "Planning", "bg-purple-500"),
            Label::new("label-4", "UX", "bg-yellow-500"),
            Label::new("label-5", "Bug", "bg-red-500"),
        ])
    }
}

impl LabelCatalog {
    pub fn new(labels: Vec<Label>) -> Self {
        Self { labels }
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn get(&self, id: &LabelId) -> Option<&Label> {
        self.labels.iter().find(|label| &label.id == id)
    }

    pub fn by_name(&self, name: &str) -> Option<&Label> {
        self.labels.iter().find(|label| label.name == name)
    }

    /// Labels to display for a set of stored names, in catalog order.
    pub fn resolve<'a>(&'a self, names: &BTreeSet<String>) -> Vec<&'a Label> {
        self.labels
            .iter()
            .filter(|label| names.contains(&label.name))
            .collect()
    }
}

/// Anything carrying a label set: a stored card or an unsaved draft.
pub trait LabelTarget {
    fn label_names_mut(&mut self) -> &mut BTreeSet<String>;

    /// Remove the label when present, add it otherwise.
    ///
    /// Returns `true` when the label ended up assigned.
    fn toggle_label(&mut self, catalog: &LabelCatalog, label_id: &LabelId) -> TaskflowResult<bool> {
        let label = catalog
            .get(label_id)
            .ok_or_else(|| TaskflowError::not_found("label", label_id))?;
        let names = self.label_names_mut();
        if names.remove(&label.name) {
            Ok(false)
        } else {
            names.insert(label.name.clone());
            Ok(true)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Tags(BTreeSet<String>);

    impl LabelTarget for Tags {
        fn label_names_mut(&mut self) -> &mut BTreeSet<String> {
            &mut self.0
        }
    }

    #[test]
    fn test_default_catalog() {
        let catalog = LabelCatalog::default();
        assert_eq!(catalog.labels().len(), 5);
        assert_eq!(catalog.by_name("UX").unwrap().id, LabelId::from("label-4"));
    }

    #[test]
    fn test_toggle_adds_then_removes() {
        let catalog = LabelCatalog::default();
        let mut tags = Tags(BTreeSet::new());
        let design = LabelId::from("label-1");

        assert!(tags.toggle_label(&catalog, &design).unwrap());
        assert!(tags.0.contains("Design"));

        assert!(!tags.toggle_label(&catalog, &design).unwrap());
        assert!(tags.0.is_empty());
    }

    #[test]
    fn test_toggle_unknown_label_fails_without_change() {
        let catalog = LabelCatalog::default();
        let mut tags = Tags(BTreeSet::from(["Bug".to_string()]));

        let result = tags.toggle_label(&catalog, &LabelId::from("label-99"));
        assert!(matches!(result, Err(TaskflowError::NotFound(_))));
        assert_eq!(tags.0.len(), 1);
    }

    #[test]
    fn test_resolve_skips_unknown_names() {
        let catalog = LabelCatalog::default();
        let names = BTreeSet::from(["Bug".to_string(), "Legacy".to_string(), "Design".to_string()]);

        let resolved: Vec<_> = catalog.resolve(&names).iter().map(|l| l.name.as_str()).collect();
        assert_eq!(resolved, vec!["Design", "Bug"]);
    }
}
