use std::io::{self, Write};
use std::path::Path;

use super::DependencyWriter;

/// Writes one `importer dependency` pair per line, nothing else.
pub struct FlatWriter<W: Write> {
    out: W,
}

impl<W: Write> FlatWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> DependencyWriter for FlatWriter<W> {
    fn start(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn write_edge(&mut self, name: &Path, dep: &Path) -> io::Result<()> {
        writeln!(self.out, "{} {}", name.display(), dep.display())
    }

    fn end(&mut self) -> io::Result<()> {
        Ok(())
    }
}
