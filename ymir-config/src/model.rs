//! Configuration data structures for the Ymir compiler.
//!
//! Mirrors `ymir.json` field-for-field. Loading the file from
//! disk and merging it over these defaults is a CLI concern; this crate only
//! owns the schema and its validation.

use serde::{Deserialize, Serialize};
use ymir_ast::auth::BearerMode;

use crate::errors::ConfigError;

/// Top-level `ymir.json` contents.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompilerConfig {
    /// Relative output directory.
    pub output: String,
    /// Raises the logger's verbosity to `debug`.
    pub debug: bool,
    /// Enables span rendering in diagnostics.
    pub detailed_errors: bool,
    /// Target-specific configuration (currently only meaningful for Java).
    pub target: TargetConfig,
    /// Which bearer-auth flavor to lower `Bearer` auth blocks to.
    #[serde(with = "bearer_mode_serde")]
    pub generate_bearer_auth: BearerMode,
    /// Optional static-frontend emission settings.
    pub frontend: Option<FrontendConfig>,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            output: "build".to_string(),
            debug: false,
            detailed_errors: false,
            target: TargetConfig::default(),
            generate_bearer_auth: BearerMode::None,
            frontend: None,
        }
    }
}

impl CompilerConfig {
    /// Basic config validation: cheap, synchronous, no I/O.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(frontend) = &self.frontend {
            if frontend.mode != "vanilla" {
                return Err(ConfigError::UnknownFrontendMode(frontend.mode.clone()));
            }
        }
        Ok(())
    }
}

/// Java package layout and Spring-specific toggles. Ignored by
/// the Express/JavaScript emitter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TargetConfig {
    pub main: String,
    pub dto: String,
    pub config: String,
    pub controller: String,
    pub auth: String,
    /// Enforces authentication through a Spring-Security `SecurityFilterChain`
    /// and `OncePerRequestFilter` instead of a plain `HandlerInterceptor`.
    pub use_spring_security: bool,
    /// Appends the raw `HttpServletRequest` as a trailing handler-interface
    /// parameter so a controller implementation can inspect the request
    /// directly.
    pub append_request: bool,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            main: "com.ymir.generated".to_string(),
            dto: "com.ymir.generated.dto".to_string(),
            config: "com.ymir.generated.config".to_string(),
            controller: "com.ymir.generated.controller".to_string(),
            auth: "com.ymir.generated.auth".to_string(),
            use_spring_security: false,
            append_request: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrontendConfig {
    pub mode: String,
    pub output: String,
}

mod bearer_mode_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use ymir_ast::auth::BearerMode;

    pub fn serialize<S: Serializer>(mode: &BearerMode, serializer: S) -> Result<S::Ok, S::Error> {
        let s = match mode {
            BearerMode::None => "NONE",
            BearerMode::Basic => "BASIC",
            BearerMode::Full => "FULL",
        };
        serializer.serialize_str(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BearerMode, D::Error> {
        let s = String::deserialize(deserializer)?;
        match s.as_str() {
            "NONE" => Ok(BearerMode::None),
            "BASIC" => Ok(BearerMode::Basic),
            "FULL" => Ok(BearerMode::Full),
            other => Err(serde::de::Error::custom(format!(
                "unknown generateBearerAuth mode '{other}', expected one of NONE, BASIC, FULL"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_documented_defaults() {
        let cfg = CompilerConfig::default();
        assert_eq!(cfg.output, "build");
        assert!(!cfg.debug);
        assert!(!cfg.detailed_errors);
        assert_eq!(cfg.generate_bearer_auth, BearerMode::None);
        assert!(cfg.frontend.is_none());
    }

    #[test]
    fn parses_partial_json_over_defaults() {
        let json = r#"{ "debug": true, "generateBearerAuth": "FULL" }"#;
        let cfg: CompilerConfig = serde_json::from_str(json).unwrap();
        assert!(cfg.debug);
        assert_eq!(cfg.generate_bearer_auth, BearerMode::Full);
        assert_eq!(cfg.output, "build");
    }

    #[test]
    fn rejects_unknown_bearer_mode() {
        let json = r#"{ "generateBearerAuth": "WEIRD" }"#;
        let err = serde_json::from_str::<CompilerConfig>(json).unwrap_err();
        assert!(err.to_string().contains("WEIRD"));
    }

    #[test]
    fn rejects_non_vanilla_frontend_mode() {
        let cfg = CompilerConfig {
            frontend: Some(FrontendConfig { mode: "react".to_string(), output: "web".to_string() }),
            ..CompilerConfig::default()
        };
        assert!(cfg.validate().is_err());
    }
}
