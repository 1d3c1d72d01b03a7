pub mod dot;
pub mod flat;
pub mod mermaid;

use std::io;
use std::path::Path;

pub use dot::DotWriter;
pub use flat::FlatWriter;
pub use mermaid::MermaidWriter;

/// Rendering strategy for dependency edges.
///
/// `start` is called once before any edge, `write_edge` once per discovered
/// (importer, dependency) pair in traversal order, and `end` once after the
/// traversal finished cleanly. A failed traversal never reaches `end`, so a
/// format's closing marker doubles as a completeness witness.
pub trait DependencyWriter {
    fn start(&mut self) -> io::Result<()>;
    fn write_edge(&mut self, name: &Path, dep: &Path) -> io::Result<()>;
    fn end(&mut self) -> io::Result<()>;
}
