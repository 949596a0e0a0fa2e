pub mod migration;
pub mod repository;
pub mod serialization;
pub mod session;
pub mod store;
pub mod traits;
pub mod worker;

pub use migration::*;
pub use repository::{LoadOrigin, LoadedState, StateRepository};
pub use serialization::*;
pub use session::{Session, SessionOptions, SessionSummary};
pub use store::*;
pub use traits::*;
pub use worker::{spawn_save_worker, SaveReport, SaveRequest};
