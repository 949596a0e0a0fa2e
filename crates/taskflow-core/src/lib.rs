pub mod config;
pub mod error;
pub mod notification;
pub mod result;
pub mod traits;

pub use config::AppConfig;
pub use error::TaskflowError;
pub use notification::{Notification, NotificationKind};
pub use result::TaskflowResult;
pub use traits::Editable;
