//! `ymir.json` loading: parsed and merged over
//! `CompilerConfig::default()` via serde's own `#[serde(default)]` fields.

use std::path::Path;

use ymir_config::{CompilerConfig, ConfigError};

pub fn load_config(project_dir: &Path) -> Result<CompilerConfig, ConfigError> {
    let path = project_dir.join("ymir.json");
    let config = match std::fs::read_to_string(&path) {
        Ok(text) => serde_json::from_str(&text)?,
        Err(_) => CompilerConfig::default(),
    };
    config.validate()?;
    Ok(config)
}
