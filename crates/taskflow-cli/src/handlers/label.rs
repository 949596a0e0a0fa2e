use super::to_data;
use crate::cli::LabelAction;
use crate::output::ListResponse;
use serde_json::Value;
use taskflow_core::TaskflowResult;
use taskflow_persistence::Session;

pub fn handle(session: &Session, action: LabelAction) -> TaskflowResult<Value> {
    match action {
        LabelAction::List => {
            let labels = session.engine().catalog().labels().to_vec();
            to_data(&ListResponse::new(labels))
        }
    }
}
