//! `ymir.json` schema, shared by the CLI driver and the
//! emitters. Reading the file off disk and merging it with defaults is the
//! CLI's job; this crate only owns the parsed shape and its validation.

pub mod errors;
pub mod model;

pub use errors::ConfigError;
pub use model::{CompilerConfig, FrontendConfig, TargetConfig};
