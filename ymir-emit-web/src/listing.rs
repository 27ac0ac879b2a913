//! GET routes with a `render list|table|detail` directive:
//! "list/table/detail pages call the underlying route and can 'integrate'
//! sibling routes by alias (e.g. a table integrates Delete/Patch/Get
//! aliases into per-row buttons)".

use ymir_ast::path::sanitize_identifier;
use ymir_ast::project::Project;
use ymir_ast::render::{RenderBlock, RenderType};
use ymir_ast::route::Route;
use ymir_ast::router::Router;
use ymir_ast::views;

use crate::errors::EmissionError;
use crate::forms::GeneratedPage;
use crate::layout::page;

pub fn emit_listing_page(
    project: &Project,
    chain: &[&Router],
    route: &Route,
    render: &RenderBlock,
) -> Result<GeneratedPage, EmissionError> {
    let name = views::route_handler_name(chain, route);
    let title = route.description.clone().unwrap_or_else(|| name.clone());
    let url = chain.iter().fold(String::new(), |acc, r| views::join_path(&acc, &r.path.raw));
    let url = views::join_path(&url, &route.path.raw);

    let integrations = render
        .options
        .as_ref()
        .and_then(|opts| opts.get("integrate"))
        .and_then(|v| v.as_list())
        .map(|list| list.iter().filter_map(|v| v.as_str().map(str::to_string)).collect::<Vec<_>>())
        .unwrap_or_default();

    let mut action_calls = String::new();
    for alias in &integrations {
        let (target_route, target_prefix) = views::find_route_by_alias(project, alias).ok_or_else(|| {
            EmissionError::UnknownIntegrationAlias { alias: name.clone(), target_alias: alias.clone() }
        })?;
        let target_url = views::join_path(&target_prefix, &target_route.path.raw);
        let method_js = target_route.method.lower();
        action_calls.push_str(&format!(
            "  function {alias}(item) {{ return ymirApiClient.{method_js}(fillPathVariables(\"{target_url}\", item)); }}\n"
        ));
    }

    let body_kind = match render.render_type {
        RenderType::List => "list",
        RenderType::Table => "table",
        RenderType::Detail => "detail",
        RenderType::Form => {
            return Err(EmissionError::UnknownRenderType { route: name.clone(), render_type: "Form".to_string() })
        }
    };

    let container = match render.render_type {
        RenderType::Table => r#"<table id="ymir-results"><thead></thead><tbody></tbody></table>"#.to_string(),
        RenderType::List => r#"<ul id="ymir-results"></ul>"#.to_string(),
        RenderType::Detail => r#"<dl id="ymir-results"></dl>"#.to_string(),
        RenderType::Form => unreachable!(),
    };

    let body_script = format!(
        r#"<div data-ymir-render="{body_kind}">
{container}
</div>
<script>
{action_calls}
function fillPathVariables(template, item) {{
  return template.replace(/:([A-Za-z0-9_]+)/g, (_match, field) => item[field] ?? "");
}}

(async () => {{
  const data = await ymirApiClient.get("{url}");
  renderResults(data);
}})();

function renderResults(data) {{
  const container = document.getElementById("ymir-results");
  const items = Array.isArray(data) ? data : [data];
  for (const item of items) {{
    const row = document.createElement({row_tag});
    row.textContent = JSON.stringify(item);
    container.appendChild(row);
  }}
}}
</script>
"#,
        row_tag = match render.render_type {
            RenderType::Table => "\"tr\"",
            _ => "\"li\"",
        }
    );

    Ok(GeneratedPage { path: format!("{}.html", sanitize_identifier(&name)), content: page(&title, &[], &body_script) })
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use ymir_ast::auth::AuthBlock;
    use ymir_ast::method::Method;
    use ymir_ast::middleware::Middleware;
    use ymir_ast::option_value::OptionValue;
    use ymir_ast::path::Path;
    use ymir_span::{SourcePosition, SourceSpan};

    fn pos() -> SourcePosition {
        SourcePosition::single_line(None, SourceSpan::new(0, 1), 1, 1, 2)
    }

    fn project_with(mut root: Router) -> Project {
        let _ = &mut root;
        Project { target_name: "Java_SpringBoot".to_string(), root, middlewares: Vec::<Middleware>::new(), auth_blocks: IndexMap::<String, AuthBlock>::new() }
    }

    #[test]
    fn table_page_integrates_sibling_alias() {
        let mut root = Router::new(Path::new(""), pos());
        let mut api = Router::new(Path::new("/api"), pos());

        let mut list_path = Path::new("/widgets");
        list_path.alias = Some("listWidgets".to_string());
        let list_route = Route {
            method: Method::Get,
            path: list_path,
            header: None,
            body: None,
            response: None,
            authenticate: None,
            description: None,
            is_response_plural: None,
            render: Some(RenderBlock {
                render_type: RenderType::Table,
                options: Some({
                    let mut m = IndexMap::new();
                    m.insert("integrate".to_string(), OptionValue::List(vec![OptionValue::String("deleteWidget".to_string())]));
                    m
                }),
            }),
            position: pos(),
        };

        let mut delete_path = Path::new("/widgets/:id");
        delete_path.alias = Some("deleteWidget".to_string());
        let delete_route = Route {
            method: Method::Delete,
            path: delete_path,
            header: None,
            body: None,
            response: None,
            authenticate: None,
            description: None,
            is_response_plural: None,
            render: None,
            position: pos(),
        };

        api.routes.push(list_route.clone());
        api.routes.push(delete_route);
        root.routers.push(api);
        let project = project_with(root);

        let api_router = &project.root.routers[0];
        let chain = vec![&project.root, api_router];
        let render = list_route.render.clone().unwrap();
        let page = emit_listing_page(&project, &chain, &list_route, &render).unwrap();
        assert!(page.content.contains("function deleteWidget(item)"));
        assert!(page.content.contains("/api/widgets/:id"));
    }
}
