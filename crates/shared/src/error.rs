use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    UnknownShortcut,
    InvalidPanelLayout,
    InvalidConfig,
    InvalidCatalog,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unknown shortcut event '{0}'")]
    UnknownShortcut(String),
    #[error("invalid panel layout '{0}', expected right, bottom or hidden")]
    InvalidPanelLayout(String),
    #[error("invalid config value for {key}: {message}")]
    InvalidConfig { key: String, message: String },
    #[error("invalid catalog: {0}")]
    InvalidCatalog(#[from] serde_json::Error),
}

impl StoreError {
    pub fn code(&self) -> ErrorCode {
        match self {
            StoreError::UnknownShortcut(_) => ErrorCode::UnknownShortcut,
            StoreError::InvalidPanelLayout(_) => ErrorCode::InvalidPanelLayout,
            StoreError::InvalidConfig { .. } => ErrorCode::InvalidConfig,
            StoreError::InvalidCatalog(_) => ErrorCode::InvalidCatalog,
        }
    }

    pub fn invalid_config(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            key: key.into(),
            message: message.into(),
        }
    }
}
