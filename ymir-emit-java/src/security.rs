//! Authentication/authorization enforcement for routes with an effective
//! `authenticate` clause: a `HandlerInterceptor` wired through
//! `WebMvcConfigurer` in plain mode, or a `SecurityFilterChain`-registered
//! `OncePerRequestFilter` when `useSpringSecurity` is configured. Both
//! variants dispatch to the same per-route credential extraction and call
//! into the auth block's generated `<Name>Authenticator`
//! (and, for Bearer/Full, `<Name>AuthUtil`), mirroring the per-block
//! `#handle<Name>Authentication` dispatch the Express target builds inline
//! on `YmirRestBase`.

use ymir_ast::auth::{AuthBlock, AuthSource, AuthType, BearerMode};
use ymir_ast::project::Project;
use ymir_ast::route::Route;
use ymir_ast::router::Router;
use ymir_ast::views;
use ymir_config::CompilerConfig;

use crate::ir::{ClassBuilder, FieldBuilder, MethodBuilder, ParamBuilder};
use crate::types::translate_path_variables;

struct ProtectedRoute {
    http_method: String,
    pattern: String,
    auth_identity: String,
    authorize_roles: Option<Vec<String>>,
}

fn decapitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_ascii_lowercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

fn full_path(chain: &[&Router], route: &Route) -> String {
    let base = chain.iter().fold(String::new(), |acc, r| views::join_path(&acc, &r.path.raw));
    views::join_path(&base, &route.path.raw)
}

fn collect_protected_routes(project: &Project) -> Vec<ProtectedRoute> {
    let mut out = Vec::new();
    for (chain, route) in views::walk_routes(&project.root) {
        let Some(clause) = views::effective_authenticate(project, &chain, route) else {
            continue;
        };
        let Some(identity) = clause.auth_block_identity else {
            continue;
        };
        let (pattern, _) = translate_path_variables(&full_path(&chain, route));
        out.push(ProtectedRoute {
            http_method: route.method.to_string(),
            pattern,
            auth_identity: identity,
            authorize_roles: clause.authorize_roles,
        });
    }
    out
}

/// Emits the interceptor/filter class (and its plain-mode or
/// Spring-Security-mode companion config) guarding every route whose
/// effective `authenticate` clause resolves to a known auth block. Returns
/// an empty list when the project has no protected routes.
pub fn emit_authentication(project: &Project, config: &CompilerConfig) -> Vec<ClassBuilder> {
    let protected = collect_protected_routes(project);
    if protected.is_empty() {
        return Vec::new();
    }

    let security_package = &config.target.config;
    if config.target.use_spring_security {
        vec![
            authentication_filter(&protected, project, config, security_package),
            security_filter_chain_config(security_package),
        ]
    } else {
        vec![
            authentication_interceptor(&protected, project, config, security_package),
            web_mvc_config(security_package),
        ]
    }
}

/// Fields autowiring every auth block (and Bearer/Full auth util) actually
/// referenced by a protected route, deduplicated by identity.
fn auth_fields(protected: &[ProtectedRoute], project: &Project, config: &CompilerConfig, class: &mut ClassBuilder) {
    let mut seen = std::collections::HashSet::new();
    for route in protected {
        if !seen.insert(route.auth_identity.clone()) {
            continue;
        }
        let Some(block) = project.resolve_auth_block(&route.auth_identity) else {
            continue;
        };
        let name = block.display_name();
        class.add_field(FieldBuilder {
            access: "private".to_string(),
            java_type: format!("{name}Authenticator"),
            name: format!("{}Authenticator", decapitalize(&name)),
            annotations: vec!["@Autowired".to_string()],
            initializer: None,
        });
        if matches!(block.auth_type, AuthType::Bearer) && config.generate_bearer_auth == BearerMode::Full {
            class.add_field(FieldBuilder {
                access: "private".to_string(),
                java_type: format!("{name}AuthUtil"),
                name: format!("{}AuthUtil", decapitalize(&name)),
                annotations: vec!["@Autowired".to_string()],
                initializer: None,
            });
        }
    }
}

/// Body of the shared `enforce(request)` dispatch method: `0` to let the
/// request through, `401`/`403` to deny it. Unprotected routes (no matching
/// pattern) fall through to the final `return 0;`.
fn enforce_method(protected: &[ProtectedRoute], project: &Project, config: &CompilerConfig) -> MethodBuilder {
    let mut method = MethodBuilder::new("int", "enforce");
    method.access = "private".to_string();
    method.params.push(ParamBuilder::new("HttpServletRequest", "request"));

    for route in protected {
        let Some(block) = project.resolve_auth_block(&route.auth_identity) else {
            continue;
        };
        let name = block.display_name();
        let field = decapitalize(&name);

        method
            .body_lines
            .push(format!("if (\"{}\".equalsIgnoreCase(request.getMethod()) && PATH_MATCHER.match(\"{}\", request.getRequestURI())) {{", route.http_method, route.pattern));

        match block.auth_type {
            AuthType::ApiKey => {
                let extract = match block.source {
                    AuthSource::Header => format!("request.getHeader(\"{}\")", block.field),
                    AuthSource::Query | AuthSource::Body => format!("request.getParameter(\"{}\")", block.field),
                };
                method.body_lines.push(format!("  String credential = {extract};"));
                method.body_lines.push("  if (credential == null) { return 401; }".to_string());
                method.body_lines.push(format!("  if (!{field}Authenticator.authenticate{name}(credential)) {{ return 401; }}"));
                if block.authorization_in_use {
                    if let Some(roles) = &route.authorize_roles {
                        let roles_literal = roles.iter().map(|r| format!("\"{r}\"")).collect::<Vec<_>>().join(", ");
                        method.body_lines.push(format!("  java.util.List<String> roles = java.util.List.of({roles_literal});"));
                        method.body_lines.push(format!("  if (!{field}Authenticator.authorize{name}(credential, roles)) {{ return 403; }}"));
                    }
                }
            }
            AuthType::Bearer => {
                method.body_lines.push("  String header = request.getHeader(\"Authorization\");".to_string());
                method.body_lines.push("  if (header == null || !header.startsWith(\"Bearer \")) { return 401; }".to_string());
                method.body_lines.push("  String jwt = header.substring(7);".to_string());
                match config.generate_bearer_auth {
                    BearerMode::None => {
                        method.body_lines.push(format!("  if (!{field}Authenticator.authenticate{name}(jwt)) {{ return 401; }}"));
                    }
                    BearerMode::Basic => {
                        method.body_lines.push(format!("  if (!{field}Authenticator.validateJwtFor{name}(jwt)) {{ return 401; }}"));
                    }
                    BearerMode::Full => {
                        method.body_lines.push("  try {".to_string());
                        method.body_lines.push(format!("    Object payload = {field}AuthUtil.verify(jwt);"));
                        method.body_lines.push(format!("    if (!{field}Authenticator.validateJwtPayloadFor{name}(payload)) {{ return 401; }}"));
                        method.body_lines.push("  } catch (Exception e) {".to_string());
                        method.body_lines.push("    return 401;".to_string());
                        method.body_lines.push("  }".to_string());
                    }
                }
            }
        }
        method.body_lines.push("  return 0;".to_string());
        method.body_lines.push("}".to_string());
    }
    method.body_lines.push("return 0;".to_string());
    method
}

fn authentication_interceptor(
    protected: &[ProtectedRoute],
    project: &Project,
    config: &CompilerConfig,
    package: &str,
) -> ClassBuilder {
    let mut class = ClassBuilder::new(package, "AuthenticationInterceptor", false);
    class.add_import("jakarta.servlet.http.HttpServletRequest");
    class.add_import("jakarta.servlet.http.HttpServletResponse");
    class.add_import("org.springframework.beans.factory.annotation.Autowired");
    class.add_import("org.springframework.stereotype.Component");
    class.add_import("org.springframework.util.AntPathMatcher");
    class.add_import("org.springframework.web.servlet.HandlerInterceptor");
    class.annotations.push("@Component".to_string());
    class.implements.push("HandlerInterceptor".to_string());

    class.add_field(FieldBuilder {
        access: "private static final".to_string(),
        java_type: "AntPathMatcher".to_string(),
        name: "PATH_MATCHER".to_string(),
        annotations: Vec::new(),
        initializer: Some("new AntPathMatcher()".to_string()),
    });
    auth_fields(protected, project, config, &mut class);
    class.methods.push(enforce_method(protected, project, config));

    let mut pre_handle = MethodBuilder::new("boolean", "preHandle");
    pre_handle.annotations.push("@Override".to_string());
    pre_handle.params.push(ParamBuilder::new("HttpServletRequest", "request"));
    pre_handle.params.push(ParamBuilder::new("HttpServletResponse", "response"));
    pre_handle.params.push(ParamBuilder::new("Object", "handler"));
    pre_handle.body_lines.push("int status = enforce(request);".to_string());
    pre_handle.body_lines.push("if (status != 0) {".to_string());
    pre_handle.body_lines.push("  response.setStatus(status);".to_string());
    pre_handle.body_lines.push("  return false;".to_string());
    pre_handle.body_lines.push("}".to_string());
    pre_handle.body_lines.push("return true;".to_string());
    class.methods.push(pre_handle);

    class
}

fn web_mvc_config(package: &str) -> ClassBuilder {
    let mut class = ClassBuilder::new(package, "AuthenticationWebConfig", false);
    class.add_import("org.springframework.beans.factory.annotation.Autowired");
    class.add_import("org.springframework.context.annotation.Configuration");
    class.add_import("org.springframework.web.servlet.config.annotation.InterceptorRegistry");
    class.add_import("org.springframework.web.servlet.config.annotation.WebMvcConfigurer");
    class.annotations.push("@Configuration".to_string());
    class.implements.push("WebMvcConfigurer".to_string());

    class.add_field(FieldBuilder {
        access: "private".to_string(),
        java_type: "AuthenticationInterceptor".to_string(),
        name: "interceptor".to_string(),
        annotations: vec!["@Autowired".to_string()],
        initializer: None,
    });

    let mut add_interceptors = MethodBuilder::new("void", "addInterceptors");
    add_interceptors.annotations.push("@Override".to_string());
    add_interceptors.params.push(ParamBuilder::new("InterceptorRegistry", "registry"));
    add_interceptors.body_lines.push("registry.addInterceptor(interceptor).addPathPatterns(\"/**\");".to_string());
    class.methods.push(add_interceptors);

    class
}

fn authentication_filter(
    protected: &[ProtectedRoute],
    project: &Project,
    config: &CompilerConfig,
    package: &str,
) -> ClassBuilder {
    let mut class = ClassBuilder::new(package, "AuthenticationFilter", false);
    class.add_import("jakarta.servlet.FilterChain");
    class.add_import("jakarta.servlet.ServletException");
    class.add_import("jakarta.servlet.http.HttpServletRequest");
    class.add_import("jakarta.servlet.http.HttpServletResponse");
    class.add_import("org.springframework.stereotype.Component");
    class.add_import("org.springframework.util.AntPathMatcher");
    class.add_import("org.springframework.web.filter.OncePerRequestFilter");
    class.annotations.push("@Component".to_string());
    class.implements.push("OncePerRequestFilter".to_string());

    class.add_field(FieldBuilder {
        access: "private static final".to_string(),
        java_type: "AntPathMatcher".to_string(),
        name: "PATH_MATCHER".to_string(),
        annotations: Vec::new(),
        initializer: Some("new AntPathMatcher()".to_string()),
    });
    auth_fields(protected, project, config, &mut class);
    class.methods.push(enforce_method(protected, project, config));

    let mut do_filter = MethodBuilder::new("void", "doFilterInternal");
    do_filter.access = "protected".to_string();
    do_filter.annotations.push("@Override".to_string());
    do_filter.params.push(ParamBuilder::new("HttpServletRequest", "request"));
    do_filter.params.push(ParamBuilder::new("HttpServletResponse", "response"));
    do_filter.params.push(ParamBuilder::new("FilterChain", "filterChain"));
    do_filter.throws.push("ServletException".to_string());
    do_filter.throws.push("java.io.IOException".to_string());
    do_filter.body_lines.push("int status = enforce(request);".to_string());
    do_filter.body_lines.push("if (status != 0) {".to_string());
    do_filter.body_lines.push("  response.setStatus(status);".to_string());
    do_filter.body_lines.push("  return;".to_string());
    do_filter.body_lines.push("}".to_string());
    do_filter.body_lines.push("filterChain.doFilter(request, response);".to_string());
    class.methods.push(do_filter);

    class
}

fn security_filter_chain_config(package: &str) -> ClassBuilder {
    let mut class = ClassBuilder::new(package, "SecurityConfig", false);
    class.add_import("org.springframework.beans.factory.annotation.Autowired");
    class.add_import("org.springframework.context.annotation.Bean");
    class.add_import("org.springframework.context.annotation.Configuration");
    class.add_import("org.springframework.security.config.annotation.web.builders.HttpSecurity");
    class.add_import("org.springframework.security.web.SecurityFilterChain");
    class.add_import("org.springframework.security.web.authentication.UsernamePasswordAuthenticationFilter");
    class.annotations.push("@Configuration".to_string());

    class.add_field(FieldBuilder {
        access: "private".to_string(),
        java_type: "AuthenticationFilter".to_string(),
        name: "authenticationFilter".to_string(),
        annotations: vec!["@Autowired".to_string()],
        initializer: None,
    });

    let mut chain = MethodBuilder::new("SecurityFilterChain", "securityFilterChain");
    chain.annotations.push("@Bean".to_string());
    chain.params.push(ParamBuilder::new("HttpSecurity", "http"));
    chain.throws.push("Exception".to_string());
    chain.body_lines.push("http.csrf(csrf -> csrf.disable());".to_string());
    chain.body_lines.push("http.authorizeHttpRequests(auth -> auth.anyRequest().permitAll());".to_string());
    chain
        .body_lines
        .push("http.addFilterBefore(authenticationFilter, UsernamePasswordAuthenticationFilter.class);".to_string());
    chain.body_lines.push("return http.build();".to_string());
    class.methods.push(chain);

    class
}

#[cfg(test)]
mod tests {
    use super::*;
    use ymir_ast::auth::{AuthSource, AuthType};
    use ymir_ast::method::Method;
    use ymir_ast::path::Path;
    use ymir_ast::router::Router;
    use ymir_span::{SourcePosition, SourceSpan};

    fn pos() -> SourcePosition {
        SourcePosition::single_line(None, SourceSpan::new(0, 1), 1, 1, 2)
    }

    fn api_key_block(alias: &str) -> AuthBlock {
        AuthBlock {
            auth_type: AuthType::ApiKey,
            source: AuthSource::Header,
            field: "x-api-key".to_string(),
            alias: Some(alias.to_string()),
            is_default_access: false,
            options: Default::default(),
            authorization_in_use: false,
            position: pos(),
        }
    }

    fn project_with_protected_route() -> Project {
        let mut root = Router::new(Path::new(""), pos());
        let mut api = Router::new(Path::new("/api"), pos());
        api.routes.push(Route {
            method: Method::Get,
            path: Path::new("/widgets/:id"),
            header: None,
            body: None,
            response: None,
            authenticate: Some(ymir_ast::auth::AuthenticateClause {
                auth_block_identity: Some("apiKey".to_string()),
                authorize_roles: None,
                position: pos(),
            }),
            description: None,
            is_response_plural: None,
            render: None,
            position: pos(),
        });
        root.routers.push(api);
        let mut auth_blocks = indexmap::IndexMap::new();
        auth_blocks.insert("apiKey".to_string(), api_key_block("apiKey"));
        Project { target_name: "Java_SpringBoot".to_string(), root, middlewares: Vec::new(), auth_blocks }
    }

    #[test]
    fn no_protected_routes_emits_nothing() {
        let mut root = Router::new(Path::new(""), pos());
        root.routes.push(Route {
            method: Method::Get,
            path: Path::new("/health"),
            header: None,
            body: None,
            response: None,
            authenticate: None,
            description: None,
            is_response_plural: None,
            render: None,
            position: pos(),
        });
        let project = Project { target_name: "Java_SpringBoot".to_string(), root, middlewares: Vec::new(), auth_blocks: Default::default() };
        assert!(emit_authentication(&project, &CompilerConfig::default()).is_empty());
    }

    #[test]
    fn plain_mode_emits_interceptor_and_web_config() {
        let project = project_with_protected_route();
        let classes = emit_authentication(&project, &CompilerConfig::default());
        assert_eq!(classes.len(), 2);
        assert_eq!(classes[0].name, "AuthenticationInterceptor");
        assert_eq!(classes[1].name, "AuthenticationWebConfig");
        let enforce = classes[0].methods.iter().find(|m| m.name == "enforce").unwrap();
        assert!(enforce.body_lines.iter().any(|l| l.contains("/api/widgets/{id}")));
        assert!(enforce.body_lines.iter().any(|l| l.contains("apiKeyAuthenticator.authenticateApiKey")));
    }

    #[test]
    fn spring_security_mode_emits_filter_and_chain() {
        let project = project_with_protected_route();
        let mut config = CompilerConfig::default();
        config.target.use_spring_security = true;
        let classes = emit_authentication(&project, &config);
        assert_eq!(classes.len(), 2);
        assert_eq!(classes[0].name, "AuthenticationFilter");
        assert_eq!(classes[1].name, "SecurityConfig");
    }
}
