//! Errors raised while validating a parsed `ymir.json`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("malformed ymir.json: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("frontend.mode '{0}' is not supported, expected \"vanilla\"")]
    UnknownFrontendMode(String),
}
