use std::path::PathBuf;

use clap::Parser;

/// Trace `<link rel="import">` dependencies across an HTML component tree.
///
/// import-graph scans the root file for import links, follows every imported
/// file recursively, and prints each (importer, dependency) edge it finds.
/// Absolute and root-relative hrefs are not followed.
#[derive(Parser, Debug)]
#[command(name = "import-graph", version, about, long_about = None)]
pub struct Cli {
    /// Root markup file to start the walk from.
    pub file: PathBuf,

    /// Print the graph in Graphviz dot format instead of flat pairs.
    #[arg(long)]
    pub dot: bool,

    /// Print the graph as a Mermaid flowchart instead of flat pairs.
    #[arg(long, conflicts_with = "dot")]
    pub mermaid: bool,

    /// Print each scanned file to stderr during the walk.
    #[arg(short, long)]
    pub verbose: bool,
}
