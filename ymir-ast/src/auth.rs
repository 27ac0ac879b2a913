//! Authentication block and clause model.
//!
//! An `AuthenticateClause` never owns a
//! pointer to its `AuthBlock` — it carries the block's identity string and
//! callers resolve it by lookup against `Project::auth_blocks` at emission
//! time. `authorization_in_use` is the single back-channel mutation on the
//! AST and is only ever set by the parser, before any emitter runs.

use crate::option_value::OptionMap;
use crate::path::{capitalize_first, sanitize_identifier};
use serde::{Deserialize, Serialize};
use ymir_span::SourcePosition;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthType {
    ApiKey,
    Bearer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BearerMode {
    None,
    Basic,
    Full,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthSource {
    Header,
    Body,
    Query,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthBlock {
    pub auth_type: AuthType,
    pub source: AuthSource,
    pub field: String,
    pub alias: Option<String>,
    /// `true` marks this block as the project's default-access
    /// authentication block ("authenticated"); at most one per project.
    pub is_default_access: bool,
    pub options: OptionMap,
    /// Set by the parser when any `authenticate ... with [...]` clause
    /// references this block. Never mutated by an emitter.
    pub authorization_in_use: bool,
    pub position: SourcePosition,
}

impl AuthBlock {
    /// Identity: the alias if present, else the auth-type string
    /// (`"api-key"` / `"bearer"`).
    pub fn identity(&self) -> String {
        match &self.alias {
            Some(alias) => alias.clone(),
            None => match self.auth_type {
                AuthType::ApiKey => "api-key".to_string(),
                AuthType::Bearer => "bearer".to_string(),
            },
        }
    }

    /// Display name: identifier-sanitized identity, first letter
    /// capitalized.
    pub fn display_name(&self) -> String {
        capitalize_first(&sanitize_identifier(&self.identity()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthenticateClause {
    /// References an `AuthBlock` by its `identity()`, resolved by lookup
    /// rather than an owning pointer.
    pub auth_block_identity: Option<String>,
    pub authorize_roles: Option<Vec<String>>,
    pub position: SourcePosition,
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use ymir_span::SourceSpan;

    fn pos() -> SourcePosition {
        SourcePosition::single_line(None, SourceSpan::new(0, 1), 1, 1, 2)
    }

    #[test]
    fn identity_prefers_alias_over_type() {
        let block = AuthBlock {
            auth_type: AuthType::Bearer,
            source: AuthSource::Header,
            field: "Authorization".to_string(),
            alias: Some("apiKey".to_string()),
            is_default_access: false,
            options: IndexMap::new(),
            authorization_in_use: false,
            position: pos(),
        };
        assert_eq!(block.identity(), "apiKey");
        assert_eq!(block.display_name(), "ApiKey");
    }

    #[test]
    fn identity_falls_back_to_auth_type() {
        let block = AuthBlock {
            auth_type: AuthType::ApiKey,
            source: AuthSource::Header,
            field: "x-api-key".to_string(),
            alias: None,
            is_default_access: false,
            options: IndexMap::new(),
            authorization_in_use: false,
            position: pos(),
        };
        assert_eq!(block.identity(), "api-key");
    }
}
