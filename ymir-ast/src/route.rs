//! `Route`: one method+path endpoint inside a router.

use crate::auth::AuthenticateClause;
use crate::method::Method;
use crate::option_value::OptionMap;
use crate::path::Path;
use crate::render::RenderBlock;
use serde::{Deserialize, Serialize};
use ymir_span::SourcePosition;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub method: Method,
    pub path: Path,
    pub header: Option<OptionMap>,
    pub body: Option<OptionMap>,
    pub response: Option<OptionMap>,
    pub authenticate: Option<AuthenticateClause>,
    /// Drawn from the single-line comment immediately preceding the route.
    pub description: Option<String>,
    /// `true` when the keyword used was `responses` rather than `response`.
    /// Only the frontend emitter consults this field; the Java and Express
    /// emitters ignore it.
    pub is_response_plural: Option<bool>,
    pub render: Option<RenderBlock>,
    pub position: SourcePosition,
}
