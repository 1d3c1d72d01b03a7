use std::collections::HashMap;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::DependencyWriter;

/// Writes the graph as a Mermaid flowchart.
///
/// Each distinct path gets a stable `n<i>` node id on first sight. Node
/// labels are re-declared on every edge, which Mermaid accepts.
pub struct MermaidWriter<W: Write> {
    out: W,
    ids: HashMap<PathBuf, usize>,
}

impl<W: Write> MermaidWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            ids: HashMap::new(),
        }
    }

    fn id_for(&mut self, path: &Path) -> usize {
        let next = self.ids.len();
        *self.ids.entry(path.to_path_buf()).or_insert(next)
    }
}

/// Escape a string for safe use in Mermaid node labels (quotes inside labels
/// break the syntax).
fn escape_label(s: &str) -> String {
    s.replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('{', "&#123;")
        .replace('}', "&#125;")
}

impl<W: Write> DependencyWriter for MermaidWriter<W> {
    fn start(&mut self) -> io::Result<()> {
        writeln!(self.out, "flowchart TB")
    }

    fn write_edge(&mut self, name: &Path, dep: &Path) -> io::Result<()> {
        let from = self.id_for(name);
        let to = self.id_for(dep);
        writeln!(
            self.out,
            "    n{}[\"{}\"] --> n{}[\"{}\"]",
            from,
            escape_label(&name.display().to_string()),
            to,
            escape_label(&dep.display().to_string()),
        )
    }

    fn end(&mut self) -> io::Result<()> {
        Ok(())
    }
}
