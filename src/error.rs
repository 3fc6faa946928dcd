use serde::{Deserialize, Serialize};
use thiserror::Error;

use serde_json::Error as JsonError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
pub enum AporiaError {
    #[error("Codec error: {0}")]
    Codec(String),
    #[error("Item Not Found: {0}")]
    NotFound(String),
    #[error("(De)Serialization error: {0}")]
    Serialization(String),
    #[error("Document service error: {0}")]
    Service(String),
}

impl From<JsonError> for AporiaError {
    fn from(src: JsonError) -> AporiaError {
        AporiaError::Serialization(format!("JSON (de)serialization error: {src}"))
    }
}

#[cfg(feature = "http")]
impl From<reqwest::Error> for AporiaError {
    fn from(src: reqwest::Error) -> AporiaError {
        if src.status() == Some(reqwest::StatusCode::NOT_FOUND) {
            AporiaError::NotFound(format!("{src}"))
        } else {
            AporiaError::Service(format!("{src}"))
        }
    }
}
