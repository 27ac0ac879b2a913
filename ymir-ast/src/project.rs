//! `Project`: the AST root. Composes a `Router` rather than inheriting from
//! one.

use crate::auth::AuthBlock;
use crate::middleware::Middleware;
use crate::router::Router;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Target {
    JavaScriptExpress,
    JavaSpring,
}

impl Target {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "JavaScript_ExpressJS" => Some(Target::JavaScriptExpress),
            "Java_SpringBoot" => Some(Target::JavaSpring),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Target::JavaScriptExpress => "JavaScript_ExpressJS",
            Target::JavaSpring => "Java_SpringBoot",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub target_name: String,
    pub root: Router,
    pub middlewares: Vec<Middleware>,
    /// Keyed by `AuthBlock::identity()`.
    pub auth_blocks: IndexMap<String, AuthBlock>,
}

impl Project {
    /// The single auth block whose `is_default_access` flag is set, if any.
    pub fn default_auth_block(&self) -> Option<&AuthBlock> {
        self.auth_blocks.values().find(|b| b.is_default_access)
    }

    pub fn resolve_auth_block(&self, identity: &str) -> Option<&AuthBlock> {
        self.auth_blocks.get(identity)
    }
}
