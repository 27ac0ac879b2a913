//! Emission-time errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmissionError {
    #[error("auth block '{identity}' sources a bearer token from '{source:?}', which Express cannot read")]
    UnsupportedBearerSource { identity: String, source: ymir_ast::auth::AuthSource },

    #[error("unknown middleware '{0}'")]
    UnknownMiddleware(String),

    #[error("query parameter type {0:?} has no Express validation predicate")]
    UnknownQueryParamType(ymir_ast::path::QueryParamType),
}
