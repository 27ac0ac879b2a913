mod cli;
mod config_loader;
mod driver;
mod fs_provider;

use clap::Parser;
use cli::{Cli, Command};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Some(Command::InstallPlugin { name }) = &cli.command {
        println!("install-plugin '{name}': not implemented in this build");
        return Ok(());
    }

    if let Err(e) = driver::run(cli) {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}
