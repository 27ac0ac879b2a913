//! Top-level frontend emission: one page per POST/PATCH
//! route (form) and per GET route carrying a `render list|table|detail`
//! directive, a shared stylesheet and REST client, and login/logout pages
//! when the project defines a Bearer/Full auth block.

use tracing::{debug, info, instrument};
use ymir_ast::auth::{AuthType, BearerMode as AstBearerMode};
use ymir_ast::method::Method;
use ymir_ast::project::Project;
use ymir_ast::render::RenderType;
use ymir_ast::views;
use ymir_config::CompilerConfig;

use crate::auth_pages::{emit_login_page, emit_logout_page};
use crate::client::client_script;
use crate::errors::EmissionError;
use crate::forms::emit_form_page;
use crate::layout::page;
use crate::listing::emit_listing_page;
use crate::stylesheet::stylesheet;

pub struct GeneratedFile {
    pub path: String,
    pub content: String,
}

#[instrument(skip(project, config))]
pub fn emit_web(project: &Project, config: &CompilerConfig) -> Result<Vec<GeneratedFile>, EmissionError> {
    info!(target = %project.target_name, "emit-web: starting emission");

    let mut files = vec![
        GeneratedFile { path: "style.css".to_string(), content: stylesheet().to_string() },
        GeneratedFile { path: "api-client.js".to_string(), content: client_script().to_string() },
    ];

    let mut nav_links = Vec::new();

    for (chain, route) in views::walk_routes(&project.root) {
        let generated = match (&route.method, &route.render) {
            (Method::Post | Method::Patch, _) => Some(emit_form_page(&chain, route)),
            (Method::Get, Some(render)) if render.render_type != RenderType::Form => {
                Some(emit_listing_page(project, &chain, route, render)?)
            }
            _ => None,
        };
        if let Some(generated) = generated {
            debug!(page = %generated.path, "emit-web: emitted page");
            nav_links.push((generated.path.clone(), views::route_handler_name(&chain, route)));
            files.push(GeneratedFile { path: generated.path, content: generated.content });
        }
    }

    if let Some(block) = project.auth_blocks.values().find(|b| {
        b.auth_type == AuthType::Bearer && config.generate_bearer_auth == AstBearerMode::Full
    }) {
        let login = emit_login_page(block);
        let logout = emit_logout_page(block);
        nav_links.push((login.path.clone(), "Log in".to_string()));
        nav_links.push((logout.path.clone(), "Log out".to_string()));
        files.push(GeneratedFile { path: login.path, content: login.content });
        files.push(GeneratedFile { path: logout.path, content: logout.content });
    }

    let index_body = format!(
        "<ul>\n{}\n</ul>\n",
        nav_links.iter().map(|(href, label)| format!(r#"  <li><a href="{href}">{label}</a></li>"#)).collect::<Vec<_>>().join("\n")
    );
    files.push(GeneratedFile { path: "index.html".to_string(), content: page("Ymir generated frontend", &[], &index_body) });

    info!(file_count = files.len(), "emit-web: emission finished");
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ymir_ast::path::Path;
    use ymir_ast::render::RenderBlock;
    use ymir_ast::route::Route;
    use ymir_ast::router::Router;
    use ymir_span::{SourcePosition, SourceSpan};

    fn pos() -> SourcePosition {
        SourcePosition::single_line(None, SourceSpan::new(0, 1), 1, 1, 2)
    }

    #[test]
    fn emits_form_and_table_pages_with_index() {
        let mut root = Router::new(Path::new(""), pos());
        let mut api = Router::new(Path::new("/api"), pos());

        api.routes.push(Route {
            method: Method::Post,
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
        api.routes.push(Route {
            method: Method::Get,
            path: Path::new("/widgets/list"),
            header: None,
            body: None,
            response: None,
            authenticate: None,
            description: None,
            is_response_plural: None,
            render: Some(RenderBlock { render_type: RenderType::Table, options: None }),
            position: pos(),
        });
        root.routers.push(api);

        let project = Project {
            target_name: "Java_SpringBoot".to_string(),
            root,
            middlewares: Vec::new(),
            auth_blocks: Default::default(),
        };

        let files = emit_web(&project, &CompilerConfig::default()).unwrap();
        let paths: Vec<&str> = files.iter().map(|f| f.path.as_str()).collect();
        assert!(paths.contains(&"style.css"));
        assert!(paths.contains(&"api-client.js"));
        assert!(paths.contains(&"index.html"));
        assert!(paths.iter().any(|p| p.starts_with("onApiWidgets")));
    }
}
