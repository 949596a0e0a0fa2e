//! Identifier newtypes.
//!
//! Ids are opaque strings so that data written by older layouts
//! (`board-1`, `list-1700000000000`) loads unchanged. Fresh ids are a kind
//! prefix followed by a v4 UUID.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Generate a fresh, globally unique id.
            pub fn generate() -> Self {
                Self(format!("{}-{}", $prefix, Uuid::new_v4().simple()))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

entity_id!(ProjectId, "project");
entity_id!(BoardId, "board");
entity_id!(ListId, "list");
entity_id!(CardId, "card");
entity_id!(LabelId, "label");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_prefixed_and_unique() {
        let a = CardId::generate();
        let b = CardId::generate();
        assert!(a.as_str().starts_with("card-"));
        assert_ne!(a, b);
    }

    #[test]
    fn test_legacy_ids_roundtrip_as_plain_strings() {
        let id: ListId = serde_json::from_str("\"list-1\"").unwrap();
        assert_eq!(id, ListId::from("list-1"));
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"list-1\"");
    }
}
