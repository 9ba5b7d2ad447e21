#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage backend failed: {0}")]
    Storage(String),
    #[error("stored record is malformed: {0}")]
    Malformed(#[source] serde_json::Error),
    #[error("failed to serialise record: {0}")]
    Serialize(#[source] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to deserialise config: {0}")]
    DeserError(String),
}
