use super::to_data;
use serde_json::Value;
use taskflow_core::TaskflowResult;
use taskflow_domain::BoardOperations;
use taskflow_persistence::Session;

pub fn handle(session: &Session) -> TaskflowResult<Value> {
    to_data(&session.view())
}
