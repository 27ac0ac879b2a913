//! `Path`, `QueryParameter`, and the identifier-sanitization helpers shared
//! by every emitter (alias derivation, Java/JS handler naming, DTO naming).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueryParamType {
    Any,
    String,
    Int,
    Float,
    Bool,
    Date,
    DateTime,
    Time,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryParameter {
    pub name: String,
    pub param_type: QueryParamType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Path {
    /// Raw path text, always starting with `/`.
    pub raw: String,
    pub alias: Option<String>,
    pub query_params: Vec<QueryParameter>,
}

impl Path {
    pub fn new(raw: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            alias: None,
            query_params: Vec::new(),
        }
    }

    /// Derived `name`: the alias if present (sanitized), else the raw path
    /// reduced to alphanumerics.
    pub fn name(&self) -> String {
        match &self.alias {
            Some(alias) => sanitize_identifier(alias),
            None => alphanumeric_only(&self.raw),
        }
    }
}

/// Keeps only ASCII alphanumeric characters from `raw`; used as the
/// fallback `Path::name()` when no alias is given.
pub fn alphanumeric_only(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_alphanumeric()).collect()
}

/// Sanitizes an arbitrary identifier into one valid across every target
/// language this compiler emits for: ASCII alphanumerics and underscores
/// only, with a leading digit prefixed by `_`.
pub fn sanitize_identifier(raw: &str) -> String {
    let mut out: String = raw
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if out.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    if out.is_empty() {
        out.push('_');
    }
    out
}

/// Capitalizes the first letter of a sanitized identifier — used for auth
/// block "display names".
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_prefers_alias() {
        let mut p = Path::new("/users/:id");
        p.alias = Some("GetUser".to_string());
        assert_eq!(p.name(), "GetUser");
    }

    #[test]
    fn name_falls_back_to_alphanumeric_raw() {
        let p = Path::new("/users/:id-thing");
        assert_eq!(p.name(), "usersidthing");
    }

    #[test]
    fn sanitize_prefixes_leading_digit() {
        assert_eq!(sanitize_identifier("2fast"), "_2fast");
    }

    #[test]
    fn sanitize_replaces_non_alphanumerics() {
        assert_eq!(sanitize_identifier("api-key"), "api_key");
    }

    #[test]
    fn capitalize_first_letter() {
        assert_eq!(capitalize_first("apiKey"), "ApiKey");
    }
}
