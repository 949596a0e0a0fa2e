use super::to_data;
use crate::cli::{CardAction, CardCreateArgs, CardUpdateArgs};
use serde_json::{json, Value};
use std::collections::BTreeSet;
use taskflow_core::{TaskflowError, TaskflowResult};
use taskflow_domain::{BoardOperations, CardDraft, CardId, CardPatch, FieldUpdate, LabelId, ListId};
use taskflow_persistence::Session;

pub fn handle(session: &mut Session, action: CardAction) -> TaskflowResult<Value> {
    match action {
        CardAction::Create(args) => {
            let list_id = ListId::from(args.list_id.clone());
            let id = session.create_card(&list_id, build_draft(args))?;
            card_details(session, &id)
        }
        CardAction::Get { id } => card_details(session, &CardId::from(id)),
        CardAction::Update(args) => {
            let id = CardId::from(args.id.clone());
            session.update_card(&id, build_patch(args))?;
            card_details(session, &id)
        }
        CardAction::Delete { id } => {
            let id = CardId::from(id);
            session.delete_card(&id)?;
            Ok(json!({ "deleted": id }))
        }
        CardAction::Move { id, list_id } => {
            let outcome = session.move_card(&CardId::from(id), &ListId::from(list_id))?;
            to_data(&outcome)
        }
        CardAction::ToggleLabel { id, label_id } => {
            let id = CardId::from(id);
            let label_id = LabelId::from(label_id);
            let assigned = session.toggle_card_label(&id, &label_id)?;
            Ok(json!({ "id": id, "label_id": label_id, "assigned": assigned }))
        }
    }
}

fn build_draft(args: CardCreateArgs) -> CardDraft {
    let mut draft = CardDraft::new(args.title).with_labels(args.labels);
    if let Some(description) = args.description {
        draft = draft.with_description(description);
    }
    draft
}

fn build_patch(args: CardUpdateArgs) -> CardPatch {
    let description = if args.clear_description {
        FieldUpdate::Clear
    } else {
        args.description
            .map(FieldUpdate::Set)
            .unwrap_or(FieldUpdate::NoChange)
    };
    let label_names = if args.clear_labels {
        Some(BTreeSet::new())
    } else {
        args.labels.map(|names| names.into_iter().collect())
    };

    CardPatch {
        title: args.title,
        description,
        label_names,
    }
}

/// The card, the list holding it and its resolved catalog labels.
fn card_details(session: &Session, id: &CardId) -> TaskflowResult<Value> {
    let snapshot = session.engine().snapshot();
    let list = snapshot
        .list_of_card(id)
        .ok_or_else(|| TaskflowError::not_found("card", id))?;
    let card = list
        .card(id)
        .ok_or_else(|| TaskflowError::not_found("card", id))?;
    let labels = session.engine().catalog().resolve(&card.label_names);

    Ok(json!({
        "id": card.id,
        "list_id": list.id,
        "title": card.title,
        "description": card.description,
        "label_names": card.label_names,
        "labels": labels,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn update_args(id: &str) -> CardUpdateArgs {
        CardUpdateArgs {
            id: id.to_string(),
            title: None,
            description: None,
            clear_description: false,
            labels: None,
            clear_labels: false,
        }
    }

    #[test]
    fn test_patch_without_flags_changes_nothing() {
        assert!(build_patch(update_args("card-1")).is_empty());
    }

    #[test]
    fn test_patch_clear_flags() {
        let patch = build_patch(CardUpdateArgs {
            clear_description: true,
            clear_labels: true,
            ..update_args("card-1")
        });
        assert_eq!(patch.description, FieldUpdate::Clear);
        assert_eq!(patch.label_names, Some(BTreeSet::new()));
    }

    #[test]
    fn test_draft_keeps_labels_and_description() {
        let draft = build_draft(CardCreateArgs {
            list_id: "list-1".to_string(),
            title: "Write docs".to_string(),
            description: Some("Usage section".to_string()),
            labels: vec!["Planning".to_string(), "UX".to_string()],
        });
        assert_eq!(draft.description.as_deref(), Some("Usage section"));
        assert!(draft.label_names.contains("UX"));
        assert_eq!(draft.label_names.len(), 2);
    }
}
