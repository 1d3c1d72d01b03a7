use std::path::Path;

use serde::Deserialize;

/// Configuration loaded from `import-graph.toml` next to the root file.
#[derive(Debug, Deserialize, Default)]
pub struct ImportGraphConfig {
    /// Glob patterns for resolved dependency paths to leave out of the graph.
    pub exclude: Option<Vec<String>>,
}

impl ImportGraphConfig {
    /// Load configuration from `import-graph.toml` in the given directory.
    ///
    /// Returns a default (empty) configuration if the file does not exist or cannot be parsed.
    pub fn load(dir: &Path) -> Self {
        let config_path = dir.join("import-graph.toml");

        if !config_path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(&config_path) {
            Ok(contents) => match toml::from_str::<Self>(&contents) {
                Ok(config) => config,
                Err(err) => {
                    eprintln!("warning: failed to parse import-graph.toml: {err}. Using defaults.");
                    Self::default()
                }
            },
            Err(err) => {
                eprintln!("warning: failed to read import-graph.toml: {err}. Using defaults.");
                Self::default()
            }
        }
    }
}
