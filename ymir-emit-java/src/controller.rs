//! Per-router `XxxController` + `XxxControllerHandler` generation: the
//! controller is a thin `@RestController` that `@Autowired`s the
//! handler interface and delegates every route method to it.

use ymir_ast::path::capitalize_first;
use ymir_ast::project::Project;
use ymir_ast::route::Route;
use ymir_ast::router::Router;
use ymir_ast::views;

use crate::dto::DtoRegistry;
use crate::errors::EmissionError;
use crate::ir::{ClassBuilder, FieldBuilder, MethodBuilder, ParamBuilder};
use crate::types::{query_param_java_type, translate_path_variables};

pub struct ControllerPair {
    pub controller: ClassBuilder,
    pub handler: ClassBuilder,
}

/// Builds one `ControllerPair` per router that declares routes directly.
pub fn emit_controllers(
    project: &Project,
    config: &ymir_config::CompilerConfig,
    dto_registry: &mut DtoRegistry,
) -> Result<Vec<ControllerPair>, EmissionError> {
    let mut grouped: Vec<(Vec<&Router>, &Router)> = Vec::new();
    collect_routers_with_routes(&project.root, &mut Vec::new(), &mut grouped);

    let mut out = Vec::new();
    for (chain, router) in grouped {
        out.push(emit_controller_pair(config, &chain, router, dto_registry)?);
    }
    Ok(out)
}

/// Appends the raw request as a trailing, unannotated parameter. Spring
/// injects `HttpServletRequest` into a controller method parameter with no
/// annotation, so the controller's call-through and the handler interface
/// both gain the same extra argument.
fn append_request_param(params: &mut Vec<ParamBuilder>, controller: &mut ClassBuilder) {
    controller.add_import("jakarta.servlet.http.HttpServletRequest");
    params.push(ParamBuilder::new("HttpServletRequest", "request"));
}

fn collect_routers_with_routes<'a>(
    router: &'a Router,
    chain: &mut Vec<&'a Router>,
    out: &mut Vec<(Vec<&'a Router>, &'a Router)>,
) {
    chain.push(router);
    if !router.routes.is_empty() {
        out.push((chain.clone(), router));
    }
    for child in &router.routers {
        collect_routers_with_routes(child, chain, out);
    }
    chain.pop();
}

fn emit_controller_pair(
    config: &ymir_config::CompilerConfig,
    chain: &[&Router],
    router: &Router,
    dto_registry: &mut DtoRegistry,
) -> Result<ControllerPair, EmissionError> {
    let chain_name = views::chain_names(chain).join("");
    let base_name = if chain_name.is_empty() { "Root".to_string() } else { chain_name };
    let base_path = chain.iter().fold(String::new(), |acc, r| views::join_path(&acc, &r.path.raw));
    let controller_package = &config.target.controller;
    let dto_package = &config.target.dto;

    let mut controller = ClassBuilder::new(controller_package, format!("{base_name}Controller"), false);
    controller.add_import("org.springframework.web.bind.annotation.RestController");
    controller.add_import("org.springframework.web.bind.annotation.RequestMapping");
    controller.add_import("org.springframework.beans.factory.annotation.Autowired");
    controller.annotations.push("@RestController".to_string());
    controller.annotations.push(format!("@RequestMapping(\"{}\")", if base_path.is_empty() { "/".to_string() } else { base_path }));
    controller.add_field(FieldBuilder {
        access: "private".to_string(),
        java_type: format!("{base_name}ControllerHandler"),
        name: "handler".to_string(),
        annotations: vec!["@Autowired".to_string()],
        initializer: None,
    });

    let mut handler = ClassBuilder::new(controller_package, format!("{base_name}ControllerHandler"), true);

    for route in &router.routes {
        let (controller_method, handler_method) =
            emit_route_methods(config, chain, route, dto_package, dto_registry, &mut controller)?;
        controller.methods.push(controller_method);
        handler.methods.push(handler_method);
    }

    Ok(ControllerPair { controller, handler })
}

fn emit_route_methods(
    config: &ymir_config::CompilerConfig,
    chain: &[&Router],
    route: &Route,
    dto_package: &str,
    dto_registry: &mut DtoRegistry,
    controller: &mut ClassBuilder,
) -> Result<(MethodBuilder, MethodBuilder), EmissionError> {
    let method_name = format!(
        "{}{}",
        capitalize_first(&route.method.to_string().to_lowercase()),
        &views::route_handler_name(chain, route)["on".len()..]
    );

    let (translated_path, path_var_names) = translate_path_variables(&route.path.raw);
    let mut params = Vec::new();
    for var in &path_var_names {
        let mut p = ParamBuilder::new("String", var.clone());
        p.annotation = Some(format!("@PathVariable(\"{var}\")"));
        params.push(p);
        controller.add_import("org.springframework.web.bind.annotation.PathVariable");
    }
    for qp in &route.path.query_params {
        let java_type = query_param_java_type(qp.param_type);
        let mut p = ParamBuilder::new(java_type, qp.name.clone());
        p.annotation = Some(format!("@RequestParam(\"{}\")", qp.name));
        params.push(p);
        controller.add_import("org.springframework.web.bind.annotation.RequestParam");
    }
    if let Some(header) = views::effective_header(chain, route) {
        for key in header.keys() {
            let mut p = ParamBuilder::new("String", ymir_ast::path::sanitize_identifier(key));
            p.annotation = Some(format!("@RequestHeader(\"{key}\")"));
            params.push(p);
            controller.add_import("org.springframework.web.bind.annotation.RequestHeader");
        }
    }
    if let Some(body) = views::effective_body(chain, route) {
        let dto_name = dto_registry.dto_for(&body, &method_name, dto_package)?;
        let mut p = ParamBuilder::new(dto_name.clone(), "body");
        p.annotation = Some("@RequestBody".to_string());
        params.push(p);
        controller.add_import("org.springframework.web.bind.annotation.RequestBody");
        controller.add_import(format!("{dto_package}.{dto_name}"));
    }
    if config.target.append_request {
        append_request_param(&mut params, controller);
    }

    let mapping_annotation = format!("@{}Mapping(\"{}\")", capitalize_first(route.method.lower()), translated_path);
    controller.add_import(format!(
        "org.springframework.web.bind.annotation.{}Mapping",
        capitalize_first(route.method.lower())
    ));

    let mut controller_method = MethodBuilder::new("Object", method_name.clone());
    controller_method.annotations.push(mapping_annotation);
    controller_method.params = params.clone();
    let arg_names: Vec<String> = params.iter().map(|p| p.name.clone()).collect();
    controller_method.body_lines.push(format!("return handler.{method_name}({});", arg_names.join(", ")));

    let mut handler_method = MethodBuilder::new("Object", method_name);
    handler_method.params = params;

    Ok((controller_method, handler_method))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ymir_ast::method::Method;
    use ymir_ast::path::Path;
    use ymir_ast::route::Route;
    use ymir_config::CompilerConfig;
    use ymir_span::{SourcePosition, SourceSpan};

    fn pos() -> SourcePosition {
        SourcePosition::single_line(None, SourceSpan::new(0, 1), 1, 1, 2)
    }

    #[test]
    fn controller_and_handler_pair_for_one_route() {
        let mut root = Router::new(Path::new(""), pos());
        let mut api = Router::new(Path::new("/api"), pos());
        api.routes.push(Route {
            method: Method::Get,
            path: Path::new("/widgets/:id"),
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
            target_name: "Java_SpringBoot".to_string(),
            root,
            middlewares: Vec::new(),
            auth_blocks: Default::default(),
        };

        let mut registry = DtoRegistry::default();
        let pairs = emit_controllers(&project, &CompilerConfig::default(), &mut registry).unwrap();
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].controller.name, "ApiController");
        assert_eq!(pairs[0].controller.methods[0].params[0].name, "id");
        assert!(pairs[0].controller.methods[0].annotations[0].contains("/widgets/{id}"));
    }

    #[test]
    fn append_request_adds_trailing_unannotated_param() {
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
            target_name: "Java_SpringBoot".to_string(),
            root,
            middlewares: Vec::new(),
            auth_blocks: Default::default(),
        };

        let mut config = CompilerConfig::default();
        config.target.append_request = true;
        let mut registry = DtoRegistry::default();
        let pairs = emit_controllers(&project, &config, &mut registry).unwrap();
        let method = &pairs[0].controller.methods[0];
        let last = method.params.last().unwrap();
        assert_eq!(last.name, "request");
        assert!(last.annotation.is_none());
        assert!(pairs[0].controller.imports.iter().any(|i| i == "jakarta.servlet.http.HttpServletRequest"));
    }
}
