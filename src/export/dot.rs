use std::io::{self, Write};
use std::path::Path;

use super::DependencyWriter;

/// Writes the graph in Graphviz dot format.
///
/// Paths go into the quoted node labels verbatim; a quote character inside a
/// path produces invalid dot.
pub struct DotWriter<W: Write> {
    out: W,
}

impl<W: Write> DotWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> DependencyWriter for DotWriter<W> {
    fn start(&mut self) -> io::Result<()> {
        writeln!(self.out, "digraph dependencies {{")
    }

    fn write_edge(&mut self, name: &Path, dep: &Path) -> io::Result<()> {
        writeln!(self.out, "  \"{}\" -> \"{}\";", name.display(), dep.display())
    }

    fn end(&mut self) -> io::Result<()> {
        writeln!(self.out, "}}")
    }
}
