use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::config::ImportGraphConfig;
use crate::export::DependencyWriter;
use crate::resolver;

/// Walk the import graph from `root`, writing every discovered edge.
///
/// The writer sees `start` first, then one `write_edge` per (importer,
/// dependency) pair in discovery order, then `end` — `end` only when the
/// whole traversal succeeded. All edges out of a file are emitted before any
/// of its dependencies is descended into, and a file is scanned at most
/// once: revisits through diamonds or cycles are no-ops, so traversal
/// terminates on any graph.
///
/// The visited set lives and dies inside this call.
pub fn write_deps(
    writer: &mut dyn DependencyWriter,
    root: &Path,
    config: &ImportGraphConfig,
    verbose: bool,
) -> anyhow::Result<()> {
    let mut seen: HashSet<PathBuf> = HashSet::new();
    writer.start()?;
    visit(writer, root, &mut seen, config, verbose)?;
    writer.end()?;
    Ok(())
}

fn visit(
    writer: &mut dyn DependencyWriter,
    path: &Path,
    seen: &mut HashSet<PathBuf>,
    config: &ImportGraphConfig,
    verbose: bool,
) -> anyhow::Result<()> {
    if seen.contains(path) {
        return Ok(());
    }
    seen.insert(path.to_path_buf());

    if verbose {
        eprintln!("{}", path.display());
    }

    let deps: Vec<PathBuf> = resolver::dependencies(path)?
        .into_iter()
        .filter(|dep| !is_excluded(dep, config))
        .collect();

    for dep in &deps {
        writer.write_edge(path, dep)?;
    }
    for dep in &deps {
        visit(writer, dep, seen, config, verbose)?;
    }
    Ok(())
}

/// Returns true if `path` matches any exclusion pattern from config.
fn is_excluded(path: &Path, config: &ImportGraphConfig) -> bool {
    let patterns = match &config.exclude {
        Some(p) => p,
        None => return false,
    };

    let path_str = path.to_string_lossy();

    for pattern in patterns {
        if let Ok(matched) = glob::Pattern::new(pattern)
            && matched.matches(&path_str)
        {
            return true;
        }
        // Also check if any component matches the pattern directly.
        for component in path.components() {
            if let Some(s) = component.as_os_str().to_str()
                && let Ok(matched) = glob::Pattern::new(pattern)
                && matched.matches(s)
            {
                return true;
            }
        }
    }

    false
}
