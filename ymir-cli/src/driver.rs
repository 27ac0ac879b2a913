//! Drives one parse plus one-or-more emitter invocations per the resolved
//! target, and writes every emitter's output to disk.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context};
use tracing::info;
use ymir_ast::project::{Project, Target};
use ymir_config::CompilerConfig;
use ymir_diagnostics::render::{render_diagnostic, RenderOptions, SourceReader};
use ymir_diagnostics::DiagnosticSink;
use ymir_parser::{parse_project, ParsingPolicy};
use ymir_span::FileRegistry;

use crate::cli::Cli;
use crate::fs_provider::{RegistryReader, StdFs};

/// A path (relative to the run's output root) and its rendered content.
pub struct OutputFile {
    pub path: String,
    pub content: String,
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    let entry = cli.entry.clone().ok_or_else(|| anyhow!("no entry script given; usage: ymir <entry.ymr>"))?;
    let project_dir = entry.parent().unwrap_or_else(|| Path::new(".")).to_path_buf();

    let mut config = crate::config_loader::load_config(&project_dir).context("loading ymir.json")?;
    if let Some(out) = &cli.out {
        config.output = out.display().to_string();
    }
    if cli.debug {
        config.debug = true;
    }

    if config.debug {
        let _ = tracing_subscriber::fmt().with_env_filter("debug").try_init();
    }

    let mut files = FileRegistry::new();
    let mut sink = DiagnosticSink::new();
    let provider = StdFs;

    let project = parse_project(&provider, &entry, ParsingPolicy::CancelOnFirstError, &mut files, &mut sink);

    if config.detailed_errors {
        render_all(&sink, &files, &RegistryReader { files: &files });
    }

    let Some(project) = project else {
        bail!("compile failed with {} error(s); see diagnostics above", sink.error_count());
    };

    let target_name = cli.target.clone().unwrap_or_else(|| project.target_name.clone());
    let target = Target::parse(&target_name)
        .ok_or_else(|| anyhow!("unresolved target '{target_name}'; expected JavaScript_ExpressJS or Java_SpringBoot"))?;

    let mut output_files = emit(&project, &config, target)?;

    if let Some(frontend) = &config.frontend {
        let web_files = ymir_emit_web::emit_web(&project, &config).context("emitting frontend")?;
        for file in web_files {
            output_files.push(OutputFile { path: format!("{}/{}", frontend.output, file.path), content: file.content });
        }
    }

    let output_root = PathBuf::from(&config.output);
    write_output(&output_root, &output_files)?;

    info!(files = output_files.len(), output = %output_root.display(), "ymir: compile finished");
    println!("wrote {} file(s) to {}", output_files.len(), output_root.display());
    Ok(())
}

fn emit(project: &Project, config: &CompilerConfig, target: Target) -> anyhow::Result<Vec<OutputFile>> {
    match target {
        Target::JavaScriptExpress => {
            let source = ymir_emit_js::emit_express(project, config).context("emitting JavaScript/Express output")?;
            Ok(vec![OutputFile { path: "ymir-rest-base.js".to_string(), content: source }])
        }
        Target::JavaSpring => {
            let files = ymir_emit_java::emit_java(project, config).context("emitting Java/Spring output")?;
            Ok(files.into_iter().map(|f| OutputFile { path: f.path, content: f.content }).collect())
        }
    }
}

fn write_output(root: &Path, files: &[OutputFile]) -> anyhow::Result<()> {
    if root.exists() {
        std::fs::remove_dir_all(root).with_context(|| format!("clearing output directory '{}'", root.display()))?;
    }
    std::fs::create_dir_all(root)?;

    let mut written = Vec::new();
    for file in files {
        let full_path = root.join(&file.path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        if let Err(e) = std::fs::write(&full_path, &file.content) {
            eprintln!("Aborting: failed to write '{}': {e}", full_path.display());
            for path in &written {
                let _ = std::fs::remove_file(path);
            }
            bail!("aborted while writing output");
        }
        written.push(full_path);
    }
    Ok(())
}

fn render_all(sink: &DiagnosticSink, files: &FileRegistry, reader: &dyn SourceReader) {
    for diagnostic in sink.diagnostics() {
        eprint!("{}", render_diagnostic(diagnostic, files, reader, RenderOptions::default()));
    }
}
