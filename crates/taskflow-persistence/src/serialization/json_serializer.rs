use crate::traits::Serializer;
use taskflow_core::{TaskflowError, TaskflowResult};

/// JSON serializer for persisted scopes
pub struct JsonSerializer;

impl<T: serde::Serialize + serde::de::DeserializeOwned + Send + Sync> Serializer<T>
    for JsonSerializer
{
    fn serialize(&self, data: &T) -> TaskflowResult<Vec<u8>> {
        serde_json::to_vec(data).map_err(|e| TaskflowError::Serialization(e.to_string()))
    }

    fn deserialize(&self, bytes: &[u8]) -> TaskflowResult<T> {
        serde_json::from_slice(bytes).map_err(|e| TaskflowError::Serialization(e.to_string()))
    }
}
