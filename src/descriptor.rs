//! Serialisable form of a token, passed to worker processes.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// The `{filePath, isCancelled}` object a worker uses to rebuild a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TokenDescriptor {
    pub file_path: PathBuf,
    pub is_cancelled: bool,
}

impl TokenDescriptor {
    pub fn new(file_path: impl Into<PathBuf>, is_cancelled: bool) -> Self {
        Self {
            file_path: file_path.into(),
            is_cancelled,
        }
    }
}
