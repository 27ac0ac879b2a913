//! Recursive-descent parser, grammar, and include resolver for the Ymir
//! DSL. The parser owns a [`cursor::TokenCursor`] over an
//! already-lexed token stream; grammar productions live under [`grammar`],
//! one file per production family. [`project::parse_project`] is the
//! single public entry point.

pub mod cursor;
pub mod errors;
pub mod file_provider;
pub mod grammar;
pub mod project;

pub use errors::IncludeError;
pub use file_provider::FileProvider;
pub use project::{parse_project, ParsingPolicy};
