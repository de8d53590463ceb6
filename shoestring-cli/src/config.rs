/// Config file loading and creation for the shoestring CLI.
///
/// Config lives at ~/.config/shoestring/config.toml.
/// All fields are optional; CLI args override config values.
use serde::Deserialize;
use shoestring_core::Estimator;
use std::path::{Path, PathBuf};

use crate::bail;

#[derive(Debug, Deserialize, Default, PartialEq)]
pub struct ShoestringConfig {
    pub population: Option<usize>,
    pub budget_multiplier: Option<f64>,
    pub estimator: Option<Estimator>,
    pub seed: Option<u64>,
    pub no_delay: Option<bool>,
    pub log_level: Option<String>,
}

const DEFAULT_CONFIG_TEMPLATE: &str = "\
# shoestring configuration
# All values here can be overridden by CLI flags.

# Population size (50-200)
# population = 50

# Comparison budget as a multiple of the population (2.0-10.0)
# budget_multiplier = 5.0

# Centrality estimator: \"simplified\" or \"rank-centrality\"
# estimator = \"simplified\"

# Fixed RNG seed for reproducible runs. Random when unset.
# seed = 42

# Skip the animation delays between steps
# no_delay = false

# Diagnostic log level when --verbose is not given (RUST_LOG wins over both)
# log_level = \"warn\"
";

/// Returns the default config path: ~/.config/shoestring/config.toml
pub fn config_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| bail("HOME environment variable not set"));
    PathBuf::from(home).join(".config").join("shoestring").join("config.toml")
}

pub fn parse_config(content: &str) -> Result<ShoestringConfig, toml::de::Error> {
    toml::from_str(content)
}

/// Load config from a file path. Returns default (all None) if file doesn't exist.
pub fn load_config(path: &Path) -> ShoestringConfig {
    match std::fs::read_to_string(path) {
        Ok(content) => parse_config(&content)
            .unwrap_or_else(|e| bail(format!("Failed to parse config at {}: {e}", path.display()))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => ShoestringConfig::default(),
        Err(e) => bail(format!("Failed to read config at {}: {e}", path.display())),
    }
}

/// Create the default config file. Errors if it already exists.
pub fn create_default_config(path: &Path) {
    if path.exists() {
        bail(format!("Config file already exists at {}", path.display()));
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .unwrap_or_else(|e| bail(format!("Failed to create directory {}: {e}", parent.display())));
    }

    std::fs::write(path, DEFAULT_CONFIG_TEMPLATE)
        .unwrap_or_else(|e| bail(format!("Failed to write config to {}: {e}", path.display())));
}
