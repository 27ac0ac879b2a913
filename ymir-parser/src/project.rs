//! Top-level entry point: `project := "target" IDENT ";" { project_item }`,
//! followed by a whole-tree pass that resolves `authenticate` clauses
//! against `auth_block` declarations and reports unresolved ones.

use std::path::{Path as FsPath, PathBuf};

use indexmap::IndexMap;
use tracing::{debug, info, instrument};
use ymir_ast::auth::AuthenticateClause;
use ymir_ast::path::Path as DslPath;
use ymir_ast::project::Project;
use ymir_ast::router::Router;
use ymir_diagnostics::DiagnosticSink;
use ymir_lexer::{token::TokenKind, tokenize};
use ymir_span::{FileRegistry, SourcePosition, SourceSpan};

use crate::cursor::TokenCursor;
use crate::file_provider::FileProvider;
use crate::grammar::items::{parse_block_items, ParseCtx};

/// Governs what happens when the diagnostic sink recorded at least one
/// error by the end of parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsingPolicy {
    /// Return `None` if any error was recorded, regardless of `IgnoreErrors`-
    /// style partial recovery having produced a tree.
    CancelOnFirstError,
    /// Always return the (possibly partial) AST.
    IgnoreErrors,
}

/// Parses `entry` (and every file it transitively `include`s) into a
/// `Project`, recording every lex/parse/semantic problem on `sink`.
#[instrument(skip(provider, files, sink))]
pub fn parse_project(
    provider: &dyn FileProvider,
    entry: &FsPath,
    policy: ParsingPolicy,
    files: &mut FileRegistry,
    sink: &mut DiagnosticSink,
) -> Option<Project> {
    info!(entry = %entry.display(), "parser: starting compile");

    let source = match provider.read(entry) {
        Ok(s) => s,
        Err(e) => {
            sink.error(
                SourcePosition::single_line(None, SourceSpan::new(0, 0), 1, 1, 1),
                format!("cannot read entry file '{}': {e}", entry.display()),
            );
            return None;
        }
    };

    let file_id = files.intern(entry);
    let lexed = tokenize(&source, Some(file_id));
    let mut cursor = TokenCursor::new(&lexed.tokens);

    cursor.match_kind(TokenKind::Target, false, Some("every project starts with 'target <Name>;'"), sink);
    let name_tok = cursor.match_kind(TokenKind::Ident, false, Some("name the compile target"), sink);
    cursor.match_kind(TokenKind::Semicolon, false, None, sink);
    let target_name = name_tok.map(|t| t.text).unwrap_or_default();
    debug!(target = %target_name, "parser: target declared");

    let mut root = Router::new(
        DslPath::new(""),
        SourcePosition::single_line(file_id.into(), SourceSpan::new(0, 0), 1, 1, 1),
    );
    let mut middlewares = Vec::new();
    let mut auth_blocks = IndexMap::new();
    let mut ctx = ParseCtx {
        provider,
        files,
        stack: vec![entry.to_path_buf()],
    };

    parse_block_items(
        &mut cursor,
        sink,
        true,
        &mut root.routers,
        &mut root.routes,
        &mut middlewares,
        &mut auth_blocks,
        &lexed.comments,
        &mut ctx,
        entry,
        TokenKind::Eof,
    );

    let mut project = Project {
        target_name,
        root,
        middlewares,
        auth_blocks,
    };
    resolve_authentication(&mut project, sink);

    info!(
        errors = sink.error_count(),
        warnings = sink.warning_count(),
        "parser: compile finished"
    );

    match policy {
        ParsingPolicy::CancelOnFirstError if sink.has_errors() => None,
        _ => Some(project),
    }
}

/// Validates every `authenticate` clause in the tree against the project's
/// auth-block map and flips `authorization_in_use` on any block referenced
/// via `with [...]`.
fn resolve_authentication(project: &mut Project, sink: &mut DiagnosticSink) {
    let mut used_with_roles = Vec::new();
    validate_and_collect(&project.root, &project.auth_blocks, sink, &mut used_with_roles);
    for identity in used_with_roles {
        if let Some(block) = project.auth_blocks.get_mut(&identity) {
            block.authorization_in_use = true;
        }
    }
}

fn validate_and_collect(
    router: &Router,
    auth_blocks: &IndexMap<String, ymir_ast::auth::AuthBlock>,
    sink: &mut DiagnosticSink,
    used_with_roles: &mut Vec<String>,
) {
    if let Some(clause) = &router.authenticate {
        validate_clause(clause, auth_blocks, sink, used_with_roles);
    }
    for route in &router.routes {
        if let Some(clause) = &route.authenticate {
            validate_clause(clause, auth_blocks, sink, used_with_roles);
        }
    }
    for child in &router.routers {
        validate_and_collect(child, auth_blocks, sink, used_with_roles);
    }
}

fn validate_clause(
    clause: &AuthenticateClause,
    auth_blocks: &IndexMap<String, ymir_ast::auth::AuthBlock>,
    sink: &mut DiagnosticSink,
    used_with_roles: &mut Vec<String>,
) {
    match &clause.auth_block_identity {
        Some(identity) => {
            if !auth_blocks.contains_key(identity) {
                sink.error(clause.position, format!("authenticate references unknown auth block '{identity}'"));
            } else if clause.authorize_roles.is_some() {
                used_with_roles.push(identity.clone());
            }
        }
        None => {
            if auth_blocks.len() != 1 {
                sink.error(
                    clause.position,
                    "'authenticate' without an identifier requires the project to define exactly one auth block",
                );
            } else if clause.authorize_roles.is_some() {
                if let Some(only) = auth_blocks.keys().next() {
                    used_with_roles.push(only.clone());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct InMemoryFs {
        files: HashMap<PathBuf, String>,
    }

    impl FileProvider for InMemoryFs {
        fn resolve(&self, from_file: &FsPath, include_path: &str) -> PathBuf {
            from_file.parent().unwrap_or(FsPath::new("")).join(include_path)
        }

        fn read(&self, path: &FsPath) -> std::io::Result<String> {
            self.files.get(path).cloned().ok_or_else(|| std::io::Error::new(std::io::ErrorKind::NotFound, "not found"))
        }
    }

    fn provider(entries: &[(&str, &str)]) -> InMemoryFs {
        InMemoryFs {
            files: entries.iter().map(|(k, v)| (PathBuf::from(k), v.to_string())).collect(),
        }
    }

    #[test]
    fn empty_router_parses_cleanly() {
        let fs = provider(&[("main.ymr", "target JavaScript_ExpressJS;\nrouter /api {}\n")]);
        let mut files = FileRegistry::new();
        let mut sink = DiagnosticSink::new();
        let project = parse_project(&fs, FsPath::new("main.ymr"), ParsingPolicy::CancelOnFirstError, &mut files, &mut sink).unwrap();
        assert_eq!(project.target_name, "JavaScript_ExpressJS");
        assert_eq!(project.root.routers.len(), 1);
        assert_eq!(project.root.routers[0].path.raw, "/api");
        assert!(sink.diagnostics().is_empty());
    }

    #[test]
    fn duplicate_default_access_cancels_under_cancel_policy() {
        let src = r#"target T;
auth Bearer as a (source: header, field: "Authorization", defaultAccess: authenticated);
auth Bearer as b (source: header, field: "Authorization", defaultAccess: authenticated);
"#;
        let fs = provider(&[("main.ymr", src)]);
        let mut files = FileRegistry::new();
        let mut sink = DiagnosticSink::new();
        let project = parse_project(&fs, FsPath::new("main.ymr"), ParsingPolicy::CancelOnFirstError, &mut files, &mut sink);
        assert!(project.is_none());
        assert_eq!(sink.error_count(), 1);
    }

    #[test]
    fn with_roles_marks_auth_block_in_use() {
        let src = r#"target T;
auth Bearer as apiKey (source: header, field: "Authorization", defaultAccess: authenticated);
router /api { GET /me authenticate apiKey with ["admin"]; }
"#;
        let fs = provider(&[("main.ymr", src)]);
        let mut files = FileRegistry::new();
        let mut sink = DiagnosticSink::new();
        let project = parse_project(&fs, FsPath::new("main.ymr"), ParsingPolicy::CancelOnFirstError, &mut files, &mut sink).unwrap();
        assert!(project.auth_blocks.get("apiKey").unwrap().authorization_in_use);
    }

    #[test]
    fn include_resolves_across_files() {
        let fs = provider(&[
            ("main.ymr", "target T;\nrouter /api { include \"sub.ymr\"; }\n"),
            ("sub.ymr", "GET /x as X;\n"),
        ]);
        let mut files = FileRegistry::new();
        let mut sink = DiagnosticSink::new();
        let project = parse_project(&fs, FsPath::new("main.ymr"), ParsingPolicy::IgnoreErrors, &mut files, &mut sink).unwrap();
        assert_eq!(project.root.routers[0].routes.len(), 1);
        assert_eq!(project.root.routers[0].routes[0].path.alias.as_deref(), Some("X"));
    }
}
