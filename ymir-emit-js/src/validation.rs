//! The validation-predicate preamble shared by every generated route
//! handler: `isInt`, `isFloat`, ..., `getHeader`, plus the
//! `_400.../_500/Started` message constants.

use ymir_ast::path::QueryParamType;

use crate::errors::EmissionError;

pub fn predicate_preamble() -> String {
    r#"function isInt(value) {
  return typeof value === "string" && /^-?\d+$/.test(value);
}

function isFloat(value) {
  return typeof value === "string" && !isNaN(parseFloat(value)) && isFinite(Number(value));
}

function isBoolean(value) {
  return value === "true" || value === "false";
}

function isDate(value) {
  return typeof value === "string" && !isNaN(Date.parse(value));
}

function isDatetime(value) {
  return typeof value === "string" && !isNaN(Date.parse(value));
}

function isTime(value) {
  return typeof value === "string" && /^\d{2}:\d{2}(:\d{2})?$/.test(value);
}

function isString(value) {
  return typeof value === "string";
}

function getHeader(headers, name) {
  const needle = name.toLowerCase();
  for (const key of Object.keys(headers || {})) {
    if (key.toLowerCase() === needle) {
      return headers[key];
    }
  }
  return undefined;
}
"#
    .to_string()
}

pub fn error_message_constants() -> String {
    r#"const Messages = {
  _400: (field) => `Invalid or missing field: ${field}`,
  _401: () => "Authentication required",
  _403: () => "Insufficient permissions",
  _404: () => "Not found",
  _500: () => "Internal server error",
  Started: (port) => `Ymir server listening on port ${port}`,
};
"#
    .to_string()
}

/// Maps a query-parameter type to the predicate function emitted above
/// (`isInt`, `isString`, ...). Every `QueryParamType` variant has a
/// predicate, so this never actually returns the error case today — kept
/// `Result`-shaped since a future param type might not have a known predicate.
pub fn predicate_for(param_type: QueryParamType) -> Result<&'static str, EmissionError> {
    Ok(match param_type {
        QueryParamType::Any => "((v) => v !== undefined)",
        QueryParamType::String => "isString",
        QueryParamType::Int => "isInt",
        QueryParamType::Float => "isFloat",
        QueryParamType::Bool => "isBoolean",
        QueryParamType::Date => "isDate",
        QueryParamType::DateTime => "isDatetime",
        QueryParamType::Time => "isTime",
    })
}
