//! Router wiring: each router becomes an `express.Router()`
//! carrying its own effective header `use` middleware, mounted under its
//! parent at `build(app)` time. Route registration itself happens in
//! `emit.rs`, which looks up the nearest enclosing router's variable name
//! via the map returned here.

use std::collections::HashMap;

use ymir_ast::router::Router;
use ymir_ast::views;

use crate::errors::EmissionError;

pub struct RouterWiring {
    pub declaration: String,
    pub mount_line: String,
}

/// Emits one `RouterWiring` per non-root router (the root router's routes
/// mount directly on `app`), and a lookup from router identity to the
/// Express variable name that mounts its routes — used by `emit.rs` to
/// attach `router.get(path, handler)` calls in the same source order the
/// tree was declared in.
pub fn emit_router_tree<'a>(
    chain: &[&'a Router],
    router: &'a Router,
    parent_var: &str,
    out: &mut Vec<RouterWiring>,
    var_names: &mut HashMap<*const Router, String>,
) -> Result<(), EmissionError> {
    let mut next_chain = chain.to_vec();
    next_chain.push(router);

    if router.path.raw.is_empty() {
        var_names.insert(router as *const Router, parent_var.to_string());
        for child in &router.routers {
            emit_router_tree(&next_chain, child, parent_var, out, var_names)?;
        }
        return Ok(());
    }

    let var_name = format!("router{}", views::chain_names(&next_chain).join(""));
    var_names.insert(router as *const Router, var_name.clone());

    let mut body = String::new();
    if let Some(schema) = views::effective_router_header(&next_chain) {
        for key in schema.keys() {
            body.push_str(&format!(
                "  if (getHeader(req.headers, \"{key}\") === undefined) {{\n    return res.status(400).json({{ error: Messages._400(\"{key}\") }});\n  }}\n"
            ));
        }
    }

    let declaration = if body.is_empty() {
        format!("const {var_name} = express.Router();\n")
    } else {
        format!(
            "const {var_name} = express.Router();\n{var_name}.use((req, res, next) => {{\n{body}  next();\n}});\n"
        )
    };
    let mount_line = format!("    {parent_var}.use(\"{}\", {var_name});\n", router.path.raw);
    out.push(RouterWiring { declaration, mount_line });

    for child in &router.routers {
        emit_router_tree(&next_chain, child, &var_name, out, var_names)?;
    }

    Ok(())
}
