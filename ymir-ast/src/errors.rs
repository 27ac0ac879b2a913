//! Semantic errors raised while resolving the AST's derived views.
//!
//! Most rule violations surface as `Diagnostic`s pushed onto a sink rather
//! than as `Result` errors. This
//! enum covers the handful of lookups that have no sensible sink-collected
//! form because a caller needs the answer to keep going at all.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SemanticError {
    #[error("no auth block named '{0}' is defined in this project")]
    UnknownAuthBlock(String),

    #[error("no route with alias '{0}' is defined in this project")]
    UnknownAlias(String),

    #[error("unsupported target '{0}'")]
    UnknownTarget(String),
}
