//! Per-route handler generation: `on<RouterChain><RouteName>`
//! validates header, query, and body in order, then authentication and
//! authorization, returning a boolean a subclass `super` call can branch on.

use ymir_ast::auth::AuthenticateClause;
use ymir_ast::option_value::{OptionMap, OptionValue};
use ymir_ast::path::QueryParamType;
use ymir_ast::project::Project;
use ymir_ast::route::Route;
use ymir_ast::router::Router;
use ymir_ast::views;

use crate::errors::EmissionError;
use crate::validation::predicate_for;

pub fn emit_route_handler(
    project: &Project,
    chain: &[&Router],
    route: &Route,
) -> Result<String, EmissionError> {
    let name = views::route_handler_name(chain, route);
    let header = views::effective_header(chain, route);
    let body = views::effective_body(chain, route);
    let auth = views::effective_authenticate(project, chain, route);

    let mut body_lines = String::new();

    if let Some(header_schema) = &header {
        body_lines.push_str(&emit_header_checks(header_schema)?);
    }
    if !route.path.query_params.is_empty() {
        body_lines.push_str(&emit_query_checks(route)?);
    }
    if let Some(body_schema) = &body {
        body_lines.push_str(&emit_body_checks(body_schema, "req.body", 4)?);
    }
    if let Some(clause) = &auth {
        body_lines.push_str(&emit_auth_check(clause));
    }

    Ok(format!(
        r#"
  async {name}(req, res) {{
{body}
    return true;
  }}
"#,
        name = name,
        body = body_lines.trim_end()
    ))
}

fn emit_header_checks(schema: &OptionMap) -> Result<String, EmissionError> {
    let mut out = String::new();
    for key in schema.keys() {
        out.push_str(&format!(
            r#"    if (getHeader(req.headers, "{key}") === undefined) {{
      res.status(400).json({{ error: Messages._400("{key}") }});
      return false;
    }}
"#,
            key = key
        ));
    }
    Ok(out)
}

fn emit_query_checks(route: &Route) -> Result<String, EmissionError> {
    let mut out = String::new();
    for param in &route.path.query_params {
        if param.param_type == QueryParamType::Any {
            continue;
        }
        let predicate = predicate_for(param.param_type)?;
        out.push_str(&format!(
            r#"    if (req.query["{name}"] !== undefined && !{predicate}(req.query["{name}"])) {{
      res.status(400).json({{ error: Messages._400("{name}") }});
      return false;
    }}
"#,
            name = param.name,
            predicate = predicate
        ));
    }
    Ok(out)
}

/// Recursively flattens a nested body schema: a `Map` value descends into
/// `{accessor}.{key}`; every other value is checked by type name against
/// `typeof`/predicate functions.
fn emit_body_checks(schema: &OptionMap, accessor: &str, indent: usize) -> Result<String, EmissionError> {
    let pad = " ".repeat(indent);
    let mut out = String::new();
    for (key, value) in schema {
        let field_accessor = format!("{accessor}.{key}");
        match value {
            OptionValue::Map(nested) => {
                out.push_str(&format!(
                    "{pad}if (typeof {field_accessor} !== \"object\" || {field_accessor} === null) {{\n{pad}  res.status(400).json({{ error: Messages._400(\"{key}\") }});\n{pad}  return false;\n{pad}}}\n"
                ));
                out.push_str(&emit_body_checks(nested, &field_accessor, indent)?);
            }
            OptionValue::String(type_name) => {
                if let Some(check) = type_check_expr(type_name, &field_accessor) {
                    out.push_str(&format!(
                        "{pad}if ({field_accessor} === undefined || !({check})) {{\n{pad}  res.status(400).json({{ error: Messages._400(\"{key}\") }});\n{pad}  return false;\n{pad}}}\n"
                    ));
                }
            }
            _ => {}
        }
    }
    Ok(out)
}

/// Maps a body-schema leaf type string (`"string"`, `"int"`, ...) onto a
/// JS boolean expression. Unrecognized type strings are left unchecked at
/// the field level; the emitter cannot invent a predicate for them.
fn type_check_expr(type_name: &str, accessor: &str) -> Option<String> {
    let expr = match type_name {
        "string" => format!("typeof {accessor} === \"string\""),
        "int" => format!("Number.isInteger({accessor})"),
        "float" => format!("typeof {accessor} === \"number\""),
        "boolean" => format!("typeof {accessor} === \"boolean\""),
        "date" | "datetime" => format!("!isNaN(Date.parse({accessor}))"),
        "time" => format!("typeof {accessor} === \"string\""),
        _ => return None,
    };
    Some(expr)
}

fn emit_auth_check(clause: &AuthenticateClause) -> String {
    let identity = clause.auth_block_identity.clone().unwrap_or_default();
    let name = ymir_ast::path::capitalize_first(&ymir_ast::path::sanitize_identifier(&identity));
    let mut out = format!(
        r#"    if (!(await this.#handle{name}Authentication(req))) {{
      res.status(401).json({{ error: Messages._401() }});
      return false;
    }}
"#,
        name = name
    );
    if let Some(roles) = &clause.authorize_roles {
        let roles_literal = roles
            .iter()
            .map(|r| format!("\"{r}\""))
            .collect::<Vec<_>>()
            .join(", ");
        out.push_str(&format!(
            r#"    if (typeof this.authorize{name} === "function" && !(await this.authorize{name}(req, [{roles}]))) {{
      res.status(403).json({{ error: Messages._403() }});
      return false;
    }}
"#,
            name = name,
            roles = roles_literal
        ));
    }
    out
}
