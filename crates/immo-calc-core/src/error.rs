use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImmoCalcError {
    /// A parameter the engines cannot work around, e.g. a score profile
    /// whose weights do not sum to one.
    #[error("Invalid input: {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for ImmoCalcError {
    fn from(e: serde_json::Error) -> Self {
        ImmoCalcError::SerializationError(e.to_string())
    }
}
