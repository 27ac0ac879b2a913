//! The Ymir abstract syntax tree.
//!
//! A `Project` composes a tree of `Router`s and `Route`s plus a flat list of
//! `Middleware` and a map of named `AuthBlock`s — no class hierarchy, no
//! inheritance, just data. Routers and routes carry
//! their *own* header/body/authenticate settings only; the *effective*
//! (inherited) settings an emitter actually needs are computed on demand by
//! the free functions in [`views`], never cached on the node itself.
//!
//! Emitters (`ymir-emit-js`, `ymir-emit-java`, `ymir-emit-web`) only ever
//! read a `Project` — nothing in this crate mutates one after the parser has
//! finished building it.

pub mod auth;
pub mod errors;
pub mod method;
pub mod middleware;
pub mod option_value;
pub mod path;
pub mod project;
pub mod render;
pub mod route;
pub mod router;
pub mod views;

pub use auth::{AuthBlock, AuthSource, AuthType, AuthenticateClause, BearerMode};
pub use errors::SemanticError;
pub use method::Method;
pub use middleware::Middleware;
pub use option_value::{option_hash, OptionMap, OptionValue};
pub use path::{Path, QueryParameter, QueryParamType};
pub use project::{Project, Target};
pub use render::{RenderBlock, RenderType};
pub use route::Route;
pub use router::Router;
