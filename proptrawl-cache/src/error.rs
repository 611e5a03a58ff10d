use thiserror::Error;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Invalid cache key: {0}")]
    InvalidKey(String),

    #[error("Invalid TTL: {0}")]
    InvalidTtl(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[cfg(feature = "fjall")]
    #[error("Storage error: {0}")]
    Storage(#[from] fjall::Error),
}
