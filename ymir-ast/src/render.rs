//! Optional frontend-rendering directive attached to a route.

use crate::option_value::OptionMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RenderType {
    List,
    Table,
    Detail,
    Form,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderBlock {
    pub render_type: RenderType,
    pub options: Option<OptionMap>,
}
