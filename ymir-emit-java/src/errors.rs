//! Emission-time errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmissionError {
    #[error("auth block '{identity}' sources a bearer token from '{source:?}', which the Java target cannot read")]
    UnsupportedBearerSource { identity: String, source: ymir_ast::auth::AuthSource },

    #[error("field '{field}' carries a body-schema type Java has no mapping for: '{type_name}'")]
    UnknownBodyFieldType { field: String, type_name: String },
}
