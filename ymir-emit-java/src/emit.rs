//! Top-level Java/Spring-Boot emission: assembles the full
//! file tree from the controller/handler pairs, DTO registry, per-auth-block
//! lowering, and CORS configuration.

use tracing::{debug, info, instrument};
use ymir_ast::project::Project;
use ymir_config::CompilerConfig;

use crate::auth::lower_auth_block;
use crate::controller::emit_controllers;
use crate::cors::emit_cors;
use crate::dto::DtoRegistry;
use crate::errors::EmissionError;
use crate::ir::ClassBuilder;
use crate::security::emit_authentication;

pub struct GeneratedFile {
    pub path: String,
    pub content: String,
}

/// Emits every Java source file for `project` under `src/main/java/...`.
#[instrument(skip(project, config))]
pub fn emit_java(project: &Project, config: &CompilerConfig) -> Result<Vec<GeneratedFile>, EmissionError> {
    info!(target = %project.target_name, "emit-java: starting emission");

    let mut files = Vec::new();
    let mut dto_registry = DtoRegistry::default();

    let controller_pairs = emit_controllers(project, config, &mut dto_registry)?;
    for pair in &controller_pairs {
        debug!(controller = %pair.controller.name, "emit-java: emitted controller");
        files.push(class_to_file(&pair.controller));
        files.push(class_to_file(&pair.handler));
    }
    for dto in &dto_registry.classes {
        files.push(class_to_file(dto));
    }

    for block in project.auth_blocks.values() {
        let classes = lower_auth_block(block, config, &config.target.auth)?;
        debug!(auth_block = %block.identity(), count = classes.len(), "emit-java: lowered auth block");
        for class in &classes {
            files.push(class_to_file(class));
        }
    }

    for middleware in &project.middlewares {
        if middleware.name == "cors" {
            for class in emit_cors(middleware, config) {
                files.push(class_to_file(&class));
            }
        }
    }

    let auth_enforcement = emit_authentication(project, config);
    debug!(count = auth_enforcement.len(), "emit-java: emitted authentication enforcement");
    for class in &auth_enforcement {
        files.push(class_to_file(class));
    }

    info!(file_count = files.len(), "emit-java: emission finished");
    Ok(files)
}

fn class_to_file(class: &ClassBuilder) -> GeneratedFile {
    let dir = class.package.replace('.', "/");
    GeneratedFile { path: format!("src/main/java/{dir}/{}.java", class.name), content: class.render() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ymir_ast::method::Method;
    use ymir_ast::path::Path;
    use ymir_ast::route::Route;
    use ymir_ast::router::Router;
    use ymir_span::{SourcePosition, SourceSpan};

    fn pos() -> SourcePosition {
        SourcePosition::single_line(None, SourceSpan::new(0, 1), 1, 1, 2)
    }

    #[test]
    fn emits_controller_handler_and_dto_files() {
        let mut root = Router::new(Path::new(""), pos());
        let mut api = Router::new(Path::new("/api"), pos());
        let mut body = indexmap::IndexMap::new();
        body.insert("name".to_string(), ymir_ast::option_value::OptionValue::String("string".to_string()));
        api.routes.push(Route {
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
        });
        root.routers.push(api);

        let project = Project {
            target_name: "Java_SpringBoot".to_string(),
            root,
            middlewares: Vec::new(),
            auth_blocks: Default::default(),
        };

        let files = emit_java(&project, &CompilerConfig::default()).unwrap();
        let paths: Vec<&str> = files.iter().map(|f| f.path.as_str()).collect();
        assert!(paths.iter().any(|p| p.ends_with("ApiController.java")));
        assert!(paths.iter().any(|p| p.ends_with("ApiControllerHandler.java")));
        assert!(paths.iter().any(|p| p.contains("/dto/") && p.ends_with("Dto.java")));
    }
}
