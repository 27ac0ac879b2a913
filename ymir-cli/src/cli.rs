//! Command-line surface: entry script path plus optional
//! target/output/debug overrides, and a stub `install-plugin` subcommand
//! kept present (but unimplemented) so `--help` doesn't lie about the
//! tool's shape.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Compiles a Ymir DSL script into one or more backend source trees.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Entry `.ymr` script to compile.
    pub entry: Option<PathBuf>,

    /// Override the compile target declared by the script
    /// (`JavaScript_ExpressJS` or `Java_SpringBoot`).
    #[arg(long)]
    pub target: Option<String>,

    /// Override `ymir.json`'s `output` directory.
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Raise logger verbosity, overriding `ymir.json`'s `debug`.
    #[arg(long)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Installs an external emitter plugin. Not implemented in this build.
    InstallPlugin {
        /// Plugin identifier or path.
        name: String,
    },
}
