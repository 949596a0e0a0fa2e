pub mod migrator;

pub use migrator::{Migrator, MIGRATED_PROJECT_TITLE};
