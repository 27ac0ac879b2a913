//! Shared dispatch for `project_item` and router `child` lists, plus the
//! `router` production and `include` resolution.
//!
//! A project body and a router body accept the same set of children
//! (`use`, `auth`, `include`, nested `router`, `route`); what differs is
//! whether `use`/`auth` are legal at that point. `is_project_scope` is
//! threaded down rather than derived from which file is being parsed,
//! because `include` is transparent to scope: a `use` inside an included
//! file is only as legal as the `include` site that pulled it in.

use std::collections::HashMap;
use std::path::{Path as FsPath, PathBuf};

use indexmap::IndexMap;
use tracing::debug;
use ymir_ast::auth::AuthBlock;
use ymir_ast::middleware::Middleware;
use ymir_ast::route::Route;
use ymir_ast::router::Router;
use ymir_diagnostics::DiagnosticSink;
use ymir_lexer::{token::TokenKind, tokenize};
use ymir_span::FileRegistry;

use crate::cursor::TokenCursor;
use crate::file_provider::FileProvider;
use crate::grammar::auth::{parse_auth_block, parse_authenticate};
use crate::grammar::middleware::parse_middleware;
use crate::grammar::options::parse_paren_option_args;
use crate::grammar::path::parse_path;
use crate::grammar::route::parse_route;

/// Threaded through a whole parse: the file provider, the interned-path
/// registry, and the stack of files currently being included (used both
/// for diagnostic attribution and cycle detection).
pub struct ParseCtx<'p> {
    pub provider: &'p dyn FileProvider,
    pub files: &'p mut FileRegistry,
    pub stack: Vec<PathBuf>,
}

/// Inserts `block` into `auth_blocks`, enforcing identity uniqueness and
/// the single-default-access-block rule.
pub fn insert_auth_block(
    auth_blocks: &mut IndexMap<String, AuthBlock>,
    mut block: AuthBlock,
    sink: &mut DiagnosticSink,
) {
    if block.is_default_access && auth_blocks.values().any(|b| b.is_default_access) {
        sink.error(block.position, "Only one default authentication block can be defined");
        block.is_default_access = false;
    }
    let identity = block.identity();
    if auth_blocks.contains_key(&identity) {
        sink.error(block.position, format!("duplicate auth block identity '{identity}'"));
        return;
    }
    auth_blocks.insert(identity, block);
}

#[allow(clippy::too_many_arguments)]
pub fn parse_block_items(
    cursor: &mut TokenCursor,
    sink: &mut DiagnosticSink,
    is_project_scope: bool,
    routers: &mut Vec<Router>,
    routes: &mut Vec<Route>,
    middlewares: &mut Vec<Middleware>,
    auth_blocks: &mut IndexMap<String, AuthBlock>,
    comments: &HashMap<u32, String>,
    ctx: &mut ParseCtx,
    current_file: &FsPath,
    stop: TokenKind,
) {
    while cursor.peek_kind() != stop && !cursor.is_eof() {
        match cursor.peek_kind() {
            TokenKind::Use => {
                let middleware = parse_middleware(cursor, sink);
                if is_project_scope {
                    middlewares.push(middleware);
                } else {
                    sink.error(middleware.position, "'use' is only legal at project scope");
                }
            }
            TokenKind::Auth => {
                let block = parse_auth_block(cursor, sink);
                if is_project_scope {
                    insert_auth_block(auth_blocks, block, sink);
                } else {
                    sink.error(block.position, "'auth' is only legal at project scope");
                }
            }
            TokenKind::Include => {
                handle_include(
                    cursor,
                    sink,
                    is_project_scope,
                    routers,
                    routes,
                    middlewares,
                    auth_blocks,
                    ctx,
                    current_file,
                );
            }
            TokenKind::Router => {
                let router = parse_router(cursor, sink, comments, ctx, current_file);
                routers.push(router);
            }
            kind if kind.is_method() => {
                routes.push(parse_route(cursor, sink, comments));
            }
            _ => {
                let found = cursor.peek().clone();
                sink.error(
                    found.position,
                    format!("unexpected token {:?} ('{}')", found.kind, found.text),
                );
                cursor.advance();
            }
        }
    }
}

/// `router := "router" path { header | body | authenticate } "{" { child } "}"`.
fn parse_router(
    cursor: &mut TokenCursor,
    sink: &mut DiagnosticSink,
    comments: &HashMap<u32, String>,
    ctx: &mut ParseCtx,
    current_file: &FsPath,
) -> Router {
    let kw = cursor.match_kind(TokenKind::Router, false, None, sink);
    let path = parse_path(cursor, sink);
    let mut router = Router::new(path, kw.map(|t| t.position).unwrap_or(path_default_position()));

    loop {
        match cursor.peek_kind() {
            TokenKind::Header => {
                cursor.advance();
                router.header = Some(parse_paren_option_args(cursor, sink));
            }
            TokenKind::Body => {
                cursor.advance();
                router.body = Some(parse_paren_option_args(cursor, sink));
            }
            TokenKind::Authenticate => {
                router.authenticate = Some(parse_authenticate(cursor, sink));
            }
            _ => break,
        }
    }

    cursor.match_kind(TokenKind::LBrace, false, Some("open this router's body with '{'"), sink);

    let mut discarded_middlewares = Vec::new();
    let mut discarded_auth_blocks = IndexMap::new();
    parse_block_items(
        cursor,
        sink,
        false,
        &mut router.routers,
        &mut router.routes,
        &mut discarded_middlewares,
        &mut discarded_auth_blocks,
        comments,
        ctx,
        current_file,
        TokenKind::RBrace,
    );

    if let Some(rbrace) = cursor.match_kind(TokenKind::RBrace, false, Some("close this router's body with '}'"), sink) {
        router.position = ymir_span::SourcePosition::merge(router.position, rbrace.position);
    }

    router
}

#[allow(clippy::too_many_arguments)]
fn handle_include(
    cursor: &mut TokenCursor,
    sink: &mut DiagnosticSink,
    is_project_scope: bool,
    routers: &mut Vec<Router>,
    routes: &mut Vec<Route>,
    middlewares: &mut Vec<Middleware>,
    auth_blocks: &mut IndexMap<String, AuthBlock>,
    ctx: &mut ParseCtx,
    current_file: &FsPath,
) {
    cursor.match_kind(TokenKind::Include, false, None, sink);
    let path_tok = cursor.match_kind(TokenKind::Str, false, Some("name the file to include"), sink);
    cursor.match_kind(TokenKind::Semicolon, false, Some("terminate the include with ';'"), sink);

    let Some(path_tok) = path_tok else { return };
    let include_path = path_tok.string_value().unwrap_or_default().to_string();
    let resolved = ctx.provider.resolve(current_file, &include_path);

    if ctx.stack.contains(&resolved) {
        let err = crate::errors::IncludeError::Cycle(resolved.display().to_string());
        sink.error(path_tok.position, err.to_string());
        return;
    }

    let source = match ctx.provider.read(&resolved) {
        Ok(s) => s,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            let err = crate::errors::IncludeError::NotFound(resolved.clone());
            sink.error(path_tok.position, err.to_string());
            return;
        }
        Err(e) => {
            let err = crate::errors::IncludeError::Io { path: resolved.clone(), source: e };
            sink.error(path_tok.position, err.to_string());
            return;
        }
    };

    debug!(path = %resolved.display(), "parser: descending into include");
    let file_id = ctx.files.intern(&resolved);
    let lexed = tokenize(&source, Some(file_id));
    let mut inner_cursor = TokenCursor::new(&lexed.tokens);

    ctx.stack.push(resolved.clone());
    parse_block_items(
        &mut inner_cursor,
        sink,
        is_project_scope,
        routers,
        routes,
        middlewares,
        auth_blocks,
        &lexed.comments,
        ctx,
        &resolved,
        TokenKind::Eof,
    );
    ctx.stack.pop();
}

fn path_default_position() -> ymir_span::SourcePosition {
    ymir_span::SourcePosition::single_line(None, ymir_span::SourceSpan::new(0, 0), 1, 1, 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file_provider::FileProvider;
    use std::collections::HashMap as Map;

    struct InMemoryFs {
        files: Map<PathBuf, String>,
    }

    impl FileProvider for InMemoryFs {
        fn resolve(&self, from_file: &FsPath, include_path: &str) -> PathBuf {
            from_file.parent().unwrap_or(FsPath::new("")).join(include_path)
        }

        fn read(&self, path: &FsPath) -> std::io::Result<String> {
            self.files
                .get(path)
                .cloned()
                .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::NotFound, "not found"))
        }
    }

    #[test]
    fn include_merges_routes_into_current_router() {
        let mut files = Map::new();
        files.insert(PathBuf::from("main.ymr"), "target T;\nrouter /api { include \"sub.ymr\"; }".to_string());
        files.insert(PathBuf::from("sub.ymr"), "GET /x as X;".to_string());
        let fs = InMemoryFs { files };

        let source = fs.read(FsPath::new("main.ymr")).unwrap();
        let mut registry = FileRegistry::new();
        let file_id = registry.intern("main.ymr");
        let lexed = tokenize(&source, Some(file_id));
        let mut cursor = TokenCursor::new(&lexed.tokens);
        let mut sink = DiagnosticSink::new();

        cursor.match_kind(TokenKind::Target, false, None, &mut sink);
        cursor.match_kind(TokenKind::Ident, false, None, &mut sink);
        cursor.match_kind(TokenKind::Semicolon, false, None, &mut sink);

        let mut root_routers = Vec::new();
        let mut root_routes = Vec::new();
        let mut middlewares = Vec::new();
        let mut auth_blocks = IndexMap::new();
        let mut ctx = ParseCtx { provider: &fs, files: &mut registry, stack: vec![PathBuf::from("main.ymr")] };

        parse_block_items(
            &mut cursor,
            &mut sink,
            true,
            &mut root_routers,
            &mut root_routes,
            &mut middlewares,
            &mut auth_blocks,
            &lexed.comments,
            &mut ctx,
            FsPath::new("main.ymr"),
            TokenKind::Eof,
        );

        assert_eq!(sink.error_count(), 0);
        assert_eq!(root_routers.len(), 1);
        assert_eq!(root_routers[0].routes.len(), 1);
        assert_eq!(root_routers[0].routes[0].path.alias.as_deref(), Some("X"));
    }

    #[test]
    fn include_cycle_is_detected() {
        let mut files = Map::new();
        files.insert(PathBuf::from("a.ymr"), "include \"b.ymr\";".to_string());
        files.insert(PathBuf::from("b.ymr"), "include \"a.ymr\";".to_string());
        let fs = InMemoryFs { files };

        let source = fs.read(FsPath::new("a.ymr")).unwrap();
        let mut registry = FileRegistry::new();
        let file_id = registry.intern("a.ymr");
        let lexed = tokenize(&source, Some(file_id));
        let mut cursor = TokenCursor::new(&lexed.tokens);
        let mut sink = DiagnosticSink::new();

        let mut routers = Vec::new();
        let mut routes = Vec::new();
        let mut middlewares = Vec::new();
        let mut auth_blocks = IndexMap::new();
        let mut ctx = ParseCtx { provider: &fs, files: &mut registry, stack: vec![PathBuf::from("a.ymr")] };

        parse_block_items(
            &mut cursor,
            &mut sink,
            true,
            &mut routers,
            &mut routes,
            &mut middlewares,
            &mut auth_blocks,
            &lexed.comments,
            &mut ctx,
            FsPath::new("a.ymr"),
            TokenKind::Eof,
        );

        assert!(sink.diagnostics().iter().any(|d| d.message.contains("cycle")));
    }

    #[test]
    fn use_outside_project_scope_is_rejected() {
        let src = "router /api { use json; GET /x; }";
        let lexed = tokenize(src, None);
        let mut cursor = TokenCursor::new(&lexed.tokens);
        let mut sink = DiagnosticSink::new();

        struct NoIncludes;
        impl FileProvider for NoIncludes {
            fn resolve(&self, from_file: &FsPath, include_path: &str) -> PathBuf {
                from_file.join(include_path)
            }
            fn read(&self, _path: &FsPath) -> std::io::Result<String> {
                Err(std::io::Error::new(std::io::ErrorKind::NotFound, "no includes in this test"))
            }
        }
        let provider = NoIncludes;
        let mut registry = FileRegistry::new();
        let mut ctx = ParseCtx { provider: &provider, files: &mut registry, stack: Vec::new() };

        let mut routers = Vec::new();
        let mut routes = Vec::new();
        let mut middlewares = Vec::new();
        let mut auth_blocks = IndexMap::new();
        parse_block_items(
            &mut cursor,
            &mut sink,
            true,
            &mut routers,
            &mut routes,
            &mut middlewares,
            &mut auth_blocks,
            &lexed.comments,
            &mut ctx,
            FsPath::new("main.ymr"),
            TokenKind::Eof,
        );

        assert_eq!(routers.len(), 1);
        assert_eq!(routers[0].routes.len(), 1);
        assert!(sink.diagnostics().iter().any(|d| d.message.contains("only legal at project scope")));
    }
}
