pub mod board;
pub mod card;
pub mod commands;
pub mod drag;
pub mod editable;
pub mod engine;
pub mod field_update;
pub mod ids;
pub mod label;
pub mod list;
pub mod operations;
pub mod project;
pub mod selection;
pub mod snapshot;
pub mod starter;
pub mod store;
pub mod view;

pub use board::{Board, DEFAULT_BACKGROUNDS};
pub use card::Card;
pub use drag::{DragEngine, DragState, DragToken, DropOutcome};
pub use editable::{CardDraft, CardPatch};
pub use engine::{Engine, EngineEvent, EngineSettings, PersistScope};
pub use field_update::FieldUpdate;
pub use ids::{BoardId, CardId, LabelId, ListId, ProjectId};
pub use label::{Label, LabelCatalog, LabelTarget};
pub use list::List;
pub use operations::BoardOperations;
pub use project::Project;
pub use selection::{resolve_active_board, ActiveSelection, Selection};
pub use snapshot::{PersistedState, Snapshot};
pub use starter::starter_state;
pub use store::EntityStore;
pub use view::ViewModel;
