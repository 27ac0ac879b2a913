//! Emission-time errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmissionError {
    #[error("render block on '{route}' names unknown type '{render_type}'")]
    UnknownRenderType { route: String, render_type: String },

    #[error("route aliased '{alias}' integrates unknown sibling alias '{target_alias}'")]
    UnknownIntegrationAlias { alias: String, target_alias: String },
}
