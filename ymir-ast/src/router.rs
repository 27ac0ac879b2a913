//! `Router`: a path prefix grouping child routers and routes, with
//! inheritable header/body schemas and an inheritable authenticate clause.

use crate::auth::AuthenticateClause;
use crate::option_value::OptionMap;
use crate::path::Path;
use crate::route::Route;
use serde::{Deserialize, Serialize};
use ymir_span::SourcePosition;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Router {
    pub path: Path,
    pub routers: Vec<Router>,
    pub routes: Vec<Route>,
    pub header: Option<OptionMap>,
    pub body: Option<OptionMap>,
    pub authenticate: Option<AuthenticateClause>,
    pub position: SourcePosition,
}

impl Router {
    pub fn new(path: Path, position: SourcePosition) -> Self {
        Self {
            path,
            routers: Vec::new(),
            routes: Vec::new(),
            header: None,
            body: None,
            authenticate: None,
            position,
        }
    }
}
