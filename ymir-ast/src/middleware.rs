//! Project-wide middleware directives (`use json;`, `use cors(...)`, ...).

use crate::option_value::OptionMap;
use serde::{Deserialize, Serialize};
use ymir_span::SourcePosition;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Middleware {
    pub name: String,
    pub options: OptionMap,
    pub position: SourcePosition,
}
