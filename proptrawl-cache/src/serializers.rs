use serde::{de::DeserializeOwned, Serialize};

use crate::CacheError;

/// Encoding contract between callers and the opaque payload blob.
///
/// The store never inspects payload bytes; callers pick a serializer and use
/// it on both sides of `put`/`get`.
pub trait PayloadSerializer: Send + Sync {
    fn serialize_payload<T>(value: &T) -> Result<Vec<u8>, CacheError>
    where
        T: Serialize;

    fn deserialize_payload<T>(data: &[u8]) -> Result<T, CacheError>
    where
        T: DeserializeOwned;
}

#[derive(Debug, Clone, Copy)]
pub struct JsonSerializer;

impl PayloadSerializer for JsonSerializer {
    fn serialize_payload<T>(value: &T) -> Result<Vec<u8>, CacheError>
    where
        T: Serialize,
    {
        serde_json::to_vec(value)
            .map_err(|e| CacheError::Serialization(e.to_string()))
    }

    fn deserialize_payload<T>(data: &[u8]) -> Result<T, CacheError>
    where
        T: DeserializeOwned,
    {
        serde_json::from_slice(data)
            .map_err(|e| CacheError::Deserialization(e.to_string()))
    }
}
