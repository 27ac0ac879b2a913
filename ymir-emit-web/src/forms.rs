//! Per-route form pages.

use ymir_ast::option_value::{OptionMap, OptionValue};
use ymir_ast::path::sanitize_identifier;
use ymir_ast::route::Route;
use ymir_ast::router::Router;
use ymir_ast::views;

use crate::layout::page;
use crate::types::input_type_for;

pub struct GeneratedPage {
    pub path: String,
    pub content: String,
}

pub fn emit_form_page(chain: &[&Router], route: &Route) -> GeneratedPage {
    let name = views::route_handler_name(chain, route);
    let title = route.description.clone().unwrap_or_else(|| name.clone());
    let url = chain.iter().fold(String::new(), |acc, r| views::join_path(&acc, &r.path.raw));
    let url = views::join_path(&url, &route.path.raw);

    let mut fields = String::new();
    if let Some(body) = views::effective_body(chain, route) {
        fields.push_str(&render_fields(&body, ""));
    }

    let method_js = route.method.lower();
    let body_script = format!(
        r#"<form id="ymir-form">
{fields}
  <button type="submit">Submit</button>
</form>
<script>
document.getElementById("ymir-form").addEventListener("submit", async (event) => {{
  event.preventDefault();
  const formData = new FormData(event.target);
  const body = {{}};
  for (const [key, value] of formData.entries()) {{
    setNested(body, key, value);
  }}
  await ymirApiClient.{method_js}(fillPathVariables("{url}", body), body);
}});

function setNested(target, dottedKey, value) {{
  const parts = dottedKey.split(".");
  let node = target;
  for (let i = 0; i < parts.length - 1; i++) {{
    node = node[parts[i]] ??= {{}};
  }}
  node[parts[parts.length - 1]] = value;
}}

function fillPathVariables(template, body) {{
  return template.replace(/:([A-Za-z0-9_]+)/g, (_match, name) => body[name] ?? "");
}}
</script>
"#
    );

    GeneratedPage { path: format!("{}.html", sanitize_identifier(&name)), content: page(&title, &[], &body_script) }
}

fn render_fields(body: &OptionMap, prefix: &str) -> String {
    let mut out = String::new();
    for (key, value) in body {
        let dotted = if prefix.is_empty() { key.clone() } else { format!("{prefix}.{key}") };
        match value {
            OptionValue::Map(nested) => {
                out.push_str(&format!("  <fieldset><legend>{key}</legend>\n"));
                out.push_str(&render_fields(nested, &dotted));
                out.push_str("  </fieldset>\n");
            }
            OptionValue::String(type_name) => {
                let input_type = input_type_for(type_name);
                out.push_str(&format!(
                    "  <label>{key}\n    <input type=\"{input_type}\" name=\"{dotted}\">\n  </label>\n"
                ));
            }
            _ => {
                out.push_str(&format!("  <label>{key}\n    <input type=\"text\" name=\"{dotted}\">\n  </label>\n"));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ymir_ast::method::Method;
    use ymir_ast::path::Path;
    use ymir_span::{SourcePosition, SourceSpan};

    fn pos() -> SourcePosition {
        SourcePosition::single_line(None, SourceSpan::new(0, 1), 1, 1, 2)
    }

    #[test]
    fn nested_body_becomes_fieldset() {
        let mut root = Router::new(Path::new(""), pos());
        let mut address = indexmap::IndexMap::new();
        address.insert("city".to_string(), OptionValue::String("string".to_string()));
        let mut body = indexmap::IndexMap::new();
        body.insert("name".to_string(), OptionValue::String("string".to_string()));
        body.insert("address".to_string(), OptionValue::Map(address));

        let route = Route {
            method: Method::Post,
            path: Path::new("/widgets"),
            header: None,
            body: Some(body),
            response: None,
            authenticate: None,
            description: None,
            is_response_plural: None,
            render: None,
            position: pos(),
        };
        root.routes.push(route.clone());
        let chain = vec![&root];
        let page = emit_form_page(&chain, &route);
        assert!(page.content.contains("<fieldset><legend>address</legend>"));
        assert!(page.content.contains(r#"name="address.city""#));
        assert!(page.content.contains(r#"name="name""#));
    }
}
