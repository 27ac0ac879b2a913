//! Top-level Express/JavaScript emission: assembles the
//! single generated output file from the preamble, per-auth-block lowering,
//! router wiring, and per-route handlers.

use std::collections::HashMap;

use tracing::{debug, info, instrument};
use ymir_ast::auth::{AuthType, BearerMode};
use ymir_ast::project::Project;
use ymir_ast::router::Router;
use ymir_ast::views;
use ymir_config::CompilerConfig;

use crate::auth::lower_auth_block;
use crate::errors::EmissionError;
use crate::middleware::lower_middleware;
use crate::router::emit_router_tree;
use crate::routes::emit_route_handler;
use crate::validation::{error_message_constants, predicate_preamble};

/// Emits the complete Express/JavaScript source file for `project`.
#[instrument(skip(project, config))]
pub fn emit_express(project: &Project, config: &CompilerConfig) -> Result<String, EmissionError> {
    info!(routes = views::walk_routes(&project.root).len(), "emit-js: starting emission");

    let mut imports = String::from("const express = require(\"express\");\n");
    let needs_jwt = project
        .auth_blocks
        .values()
        .any(|b| b.auth_type == AuthType::Bearer && config.generate_bearer_auth == BearerMode::Full);
    if needs_jwt {
        imports.push_str("const jsonwebtoken = require(\"jsonwebtoken\");\n");
    }

    let mut middleware_imports = String::new();
    let mut middleware_installs = String::new();
    for middleware in &project.middlewares {
        let lowered = lower_middleware(middleware)?;
        middleware_imports.push_str(&lowered.imports);
        middleware_installs.push_str(&lowered.install);
    }

    let mut class_methods = String::new();
    let mut auth_extra_routes = String::new();
    for block in project.auth_blocks.values() {
        let lowered = lower_auth_block(block, config)?;
        class_methods.push_str(&lowered.class_methods);
        auth_extra_routes.push_str(&lowered.extra_routes);
        debug!(auth_block = %block.identity(), "emit-js: lowered auth block");
    }

    let mut router_wirings = Vec::new();
    let mut var_names: HashMap<*const Router, String> = HashMap::new();
    emit_router_tree(&[], &project.root, "app", &mut router_wirings, &mut var_names)?;

    let mut route_handlers = String::new();
    let mut route_registrations = String::new();
    for (chain, route) in views::walk_routes(&project.root) {
        route_handlers.push_str(&emit_route_handler(project, &chain, route)?);

        let name = views::route_handler_name(&chain, route);
        let parent_var = chain
            .last()
            .and_then(|r| var_names.get(&(*r as *const Router)))
            .cloned()
            .unwrap_or_else(|| "app".to_string());
        route_registrations.push_str(&format!(
            "    {parent_var}.{method}(\"{path}\", (req, res) => this.{name}(req, res).then((ok) => {{ if (ok) res.status(200).json({{ ok: true }}); }}));\n",
            parent_var = parent_var,
            method = route.method.lower(),
            path = route.path.raw,
            name = name
        ));
    }

    let router_declarations: String = router_wirings.iter().map(|w| w.declaration.clone()).collect();
    let router_mounts: String = router_wirings.iter().map(|w| w.mount_line.clone()).collect();

    let output = format!(
        r#"{imports}{middleware_imports}
{predicates}
{messages}
class YmirRestBase {{
  constructor() {{}}
{class_methods}
{route_handlers}
  build(app) {{
{middleware_installs}{router_declarations}{router_mounts}{route_registrations}{auth_extra_routes}    return app;
  }}
}}

function startServer(app, port) {{
  return app.listen(port, () => {{
    console.log(Messages.Started(port));
  }});
}}

module.exports = {{ YmirRestBase, startServer }};
"#,
        imports = imports,
        middleware_imports = middleware_imports,
        predicates = predicate_preamble(),
        messages = error_message_constants(),
        class_methods = class_methods,
        route_handlers = route_handlers,
        middleware_installs = middleware_installs,
        router_declarations = router_declarations,
        router_mounts = router_mounts,
        route_registrations = route_registrations,
        auth_extra_routes = auth_extra_routes,
    );

    info!(bytes = output.len(), "emit-js: emission finished");
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ymir_ast::auth::{AuthBlock, AuthSource};
    use ymir_ast::method::Method;
    use ymir_ast::path::Path;
    use ymir_ast::route::Route;
    use ymir_span::{SourcePosition, SourceSpan};

    fn pos() -> SourcePosition {
        SourcePosition::single_line(None, SourceSpan::new(0, 1), 1, 1, 2)
    }

    #[test]
    fn emits_a_single_get_route() {
        let mut root = Router::new(Path::new(""), pos());
        let mut api = Router::new(Path::new("/api"), pos());
        api.routes.push(Route {
            method: Method::Get,
            path: Path::new("/widgets"),
            header: None,
            body: None,
            response: None,
            authenticate: None,
            description: None,
            is_response_plural: None,
            render: None,
            position: pos(),
        });
        root.routers.push(api);

        let project = Project {
            target_name: "JavaScript_ExpressJS".to_string(),
            root,
            middlewares: Vec::new(),
            auth_blocks: Default::default(),
        };

        let output = emit_express(&project, &CompilerConfig::default()).unwrap();
        assert!(output.contains("onApiWidgets"));
        assert!(output.contains("routerApi.get(\"/widgets\""));
        assert!(output.contains("module.exports"));
    }

    #[test]
    fn rejects_bearer_sourced_from_query() {
        let mut auth_blocks = indexmap::IndexMap::new();
        auth_blocks.insert(
            "bearer".to_string(),
            AuthBlock {
                auth_type: AuthType::Bearer,
                source: AuthSource::Query,
                field: "token".to_string(),
                alias: None,
                is_default_access: false,
                options: Default::default(),
                authorization_in_use: false,
                position: pos(),
            },
        );
        let project = Project {
            target_name: "JavaScript_ExpressJS".to_string(),
            root: Router::new(Path::new(""), pos()),
            middlewares: Vec::new(),
            auth_blocks,
        };

        let err = emit_express(&project, &CompilerConfig::default()).unwrap_err();
        assert!(matches!(err, EmissionError::UnsupportedBearerSource { .. }));
    }
}
