mod cli;
mod config;
mod export;
mod resolver;
mod walker;

use std::io;
use std::path::Path;

use anyhow::Result;
use clap::Parser;

use cli::Cli;
use config::ImportGraphConfig;
use export::{DependencyWriter, DotWriter, FlatWriter, MermaidWriter};
use walker::write_deps;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_dir = cli.file.parent().unwrap_or_else(|| Path::new("."));
    let config = ImportGraphConfig::load(config_dir);

    let stdout = io::stdout().lock();
    let mut writer: Box<dyn DependencyWriter> = if cli.dot {
        Box::new(DotWriter::new(stdout))
    } else if cli.mermaid {
        Box::new(MermaidWriter::new(stdout))
    } else {
        Box::new(FlatWriter::new(stdout))
    };

    write_deps(writer.as_mut(), &cli.file, &config, cli.verbose)
}
