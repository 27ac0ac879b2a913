//! Derived views computed over an immutable AST: effective header/body
//! schema, effective authenticate clause, and alias lookup. These are free
//! functions, never AST methods that mutate — emitters never mutate the
//! AST and both target emitters need the same views, so they
//! live here rather than being duplicated per emitter.

use crate::auth::AuthenticateClause;
use crate::option_value::OptionMap;
use crate::project::Project;
use crate::route::Route;
use crate::router::Router;

/// Shallow-merges `base` and `overlay`, `overlay`'s keys winning. This is
/// the descendant-keys-win rule used when resolving any nested scope.
pub fn merge_maps(base: Option<&OptionMap>, overlay: Option<&OptionMap>) -> Option<OptionMap> {
    match (base, overlay) {
        (None, None) => None,
        (Some(b), None) => Some(b.clone()),
        (None, Some(o)) => Some(o.clone()),
        (Some(b), Some(o)) => {
            let mut merged = b.clone();
            for (k, v) in o {
                merged.insert(k.clone(), v.clone());
            }
            Some(merged)
        }
    }
}

/// Effective header schema for a chain of routers ending at `route`:
/// ancestor maps merged with `route`'s own, descendant keys winning.
pub fn effective_header(chain: &[&Router], route: &Route) -> Option<OptionMap> {
    let mut acc: Option<OptionMap> = None;
    for router in chain {
        acc = merge_maps(acc.as_ref(), router.header.as_ref());
    }
    merge_maps(acc.as_ref(), route.header.as_ref())
}

pub fn effective_body(chain: &[&Router], route: &Route) -> Option<OptionMap> {
    let mut acc: Option<OptionMap> = None;
    for router in chain {
        acc = merge_maps(acc.as_ref(), router.body.as_ref());
    }
    merge_maps(acc.as_ref(), route.body.as_ref())
}

/// Effective header schema for a router itself (used when wiring an
/// Express `Router()`'s own `use` middleware, or a Spring controller base
/// path's shared `@RequestHeader`s): ancestors merged with the router's own
/// map, not including any route.
pub fn effective_router_header(chain: &[&Router]) -> Option<OptionMap> {
    let mut acc: Option<OptionMap> = None;
    for router in chain {
        acc = merge_maps(acc.as_ref(), router.header.as_ref());
    }
    acc
}

pub fn effective_router_body(chain: &[&Router]) -> Option<OptionMap> {
    let mut acc: Option<OptionMap> = None;
    for router in chain {
        acc = merge_maps(acc.as_ref(), router.body.as_ref());
    }
    acc
}

/// Effective authenticate clause: the route's own clause, else the nearest
/// ancestor router's clause, else the project's default auth block (if
/// any), expressed as a synthesized clause with no `with [...]` roles.
pub fn effective_authenticate<'a>(
    project: &'a Project,
    chain: &[&'a Router],
    route: &'a Route,
) -> Option<AuthenticateClause> {
    if let Some(clause) = &route.authenticate {
        return Some(clause.clone());
    }
    for router in chain.iter().rev() {
        if let Some(clause) = &router.authenticate {
            return Some(clause.clone());
        }
    }
    project.default_auth_block().map(|block| AuthenticateClause {
        auth_block_identity: Some(block.identity()),
        authorize_roles: None,
        position: block.position,
    })
}

/// Finds a route by alias anywhere in the project, returning it along with
/// the fully-qualified path of its ancestor routers (segments joined by
/// `/`, collapsed so `//` never appears).
pub fn find_route_by_alias<'a>(project: &'a Project, alias: &str) -> Option<(&'a Route, String)> {
    fn walk<'a>(router: &'a Router, prefix: &str, alias: &str) -> Option<(&'a Route, String)> {
        let here = join_path(prefix, &router.path.raw);
        for route in &router.routes {
            if route.path.alias.as_deref() == Some(alias) {
                return Some((route, here.clone()));
            }
        }
        for child in &router.routers {
            if let Some(found) = walk(child, &here, alias) {
                return Some(found);
            }
        }
        None
    }
    walk(&project.root, "", alias)
}

/// Every route in the tree paired with the chain of ancestor routers (root
/// first) it is nested under. Both backend emitters walk this same shape to
/// build handler names and mount routers in source order.
pub fn walk_routes<'a>(root: &'a Router) -> Vec<(Vec<&'a Router>, &'a Route)> {
    let mut out = Vec::new();
    fn walk<'a>(router: &'a Router, chain: &mut Vec<&'a Router>, out: &mut Vec<(Vec<&'a Router>, &'a Route)>) {
        chain.push(router);
        for route in &router.routes {
            out.push((chain.clone(), route));
        }
        for child in &router.routers {
            walk(child, chain, out);
        }
        chain.pop();
    }
    let mut chain = Vec::new();
    walk(root, &mut chain, &mut out);
    out
}

/// Sanitized, capitalized name for each router in `chain`, skipping the
/// root router (whose path is always empty).
pub fn chain_names(chain: &[&Router]) -> Vec<String> {
    chain
        .iter()
        .filter(|r| !r.path.raw.is_empty())
        .map(|r| crate::path::capitalize_first(&r.path.name()))
        .collect()
}

/// `on<RouterChain><RouteName>` handler name.
pub fn route_handler_name(chain: &[&Router], route: &Route) -> String {
    let mut name = String::from("on");
    for segment in chain_names(chain) {
        name.push_str(&segment);
    }
    name.push_str(&crate::path::capitalize_first(&route.path.name()));
    name
}

/// Joins two path segments with `/`, collapsing any resulting `//`.
pub fn join_path(a: &str, b: &str) -> String {
    let joined = format!("{a}/{b}");
    let mut out = String::with_capacity(joined.len());
    let mut last_was_slash = false;
    for c in joined.chars() {
        if c == '/' {
            if last_was_slash {
                continue;
            }
            last_was_slash = true;
        } else {
            last_was_slash = false;
        }
        out.push(c);
    }
    if out.len() > 1 && out.ends_with('/') {
        out.pop();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::option_value::OptionValue;
    use crate::path::Path;
    use indexmap::IndexMap;
    use ymir_span::{SourcePosition, SourceSpan};

    fn pos() -> SourcePosition {
        SourcePosition::single_line(None, SourceSpan::new(0, 1), 1, 1, 2)
    }

    fn map_with(key: &str, value: &str) -> OptionMap {
        let mut m = IndexMap::new();
        m.insert(key.to_string(), OptionValue::String(value.to_string()));
        m
    }

    #[test]
    fn merge_maps_descendant_key_wins() {
        let mut base = map_with("a", "from-parent");
        base.insert("shared".to_string(), OptionValue::String("parent".to_string()));
        let overlay = map_with("shared", "child");

        let merged = merge_maps(Some(&base), Some(&overlay)).unwrap();
        assert_eq!(merged.get("a").unwrap().as_str(), Some("from-parent"));
        assert_eq!(merged.get("shared").unwrap().as_str(), Some("child"));
    }

    #[test]
    fn join_path_collapses_double_slash() {
        assert_eq!(join_path("/api", "/users"), "/api/users");
        assert_eq!(join_path("", "/users"), "/users");
        assert_eq!(join_path("/api/", "/users"), "/api/users");
    }

    #[test]
    fn route_handler_name_concatenates_chain_and_route() {
        let mut root = Router::new(Path::new(""), pos());
        let mut api = Router::new(Path::new("/api"), pos());
        let mut route_path = Path::new("/widgets");
        route_path.alias = Some("list".to_string());
        let route = Route {
            method: crate::method::Method::Get,
            path: route_path,
            header: None,
            body: None,
            response: None,
            authenticate: None,
            description: None,
            is_response_plural: None,
            render: None,
            position: pos(),
        };
        api.routes.push(route);
        root.routers.push(api);

        let pairs = walk_routes(&root);
        assert_eq!(pairs.len(), 1);
        let (chain, route) = &pairs[0];
        assert_eq!(route_handler_name(chain, route), "onApiList");
    }

    #[test]
    fn effective_header_merges_chain_then_route() {
        let mut parent = Router::new(Path::new("/api"), pos());
        parent.header = Some(map_with("x-parent", "1"));
        let mut child_header = map_with("x-parent", "overridden");
        child_header.insert("x-child".to_string(), OptionValue::String("2".to_string()));

        let route = Route {
            method: crate::method::Method::Get,
            path: Path::new("/widgets"),
            header: Some(child_header),
            body: None,
            response: None,
            authenticate: None,
            description: None,
            is_response_plural: None,
            render: None,
            position: pos(),
        };

        let chain = vec![&parent];
        let eff = effective_header(&chain, &route).unwrap();
        assert_eq!(eff.get("x-parent").unwrap().as_str(), Some("overridden"));
        assert_eq!(eff.get("x-child").unwrap().as_str(), Some("2"));
    }
}
