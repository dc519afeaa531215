mod schema;

pub use schema::{Config, DataFiles, DEFAULT_SUBJECT_ORDER};

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Get the config directory path (~/.config/exam-net/)
pub fn get_config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config").join("exam-net"))
}

/// Get the default config file path (~/.config/exam-net/config.yaml)
pub fn get_config_path() -> Option<PathBuf> {
    get_config_dir().map(|dir| dir.join("config.yaml"))
}

/// Load configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to config file. If None, uses the default path
///   (~/.config/exam-net/config.yaml) and falls back to built-in defaults
///   when that file does not exist.
///
/// # Errors
///
/// Returns an error if:
/// - An explicitly given config file does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    match path {
        Some(config_path) => {
            if !config_path.exists() {
                anyhow::bail!("Config file not found at {}", config_path.display());
            }
            read_config(&config_path)
        }
        None => match get_config_path() {
            Some(config_path) if config_path.exists() => read_config(&config_path),
            _ => {
                debug!("no config file found, using defaults");
                Ok(Config::default())
            }
        },
    }
}

fn read_config(config_path: &Path) -> Result<Config> {
    let config_content = fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    let config: Config = serde_saphyr::from_str(&config_content)
        .with_context(|| format!("Failed to parse config: invalid YAML in {}", config_path.display()))?;

    debug!(path = %config_path.display(), "loaded config");
    Ok(config)
}

/// Validate configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if config.subject_order.is_empty() {
        errors.push("subject_order: must list at least one subject".to_string());
    }

    let mut seen = HashSet::new();
    for (i, subject) in config.subject_order.iter().enumerate() {
        if subject.trim().is_empty() {
            errors.push(format!("subject_order[{}]: subject name is empty", i));
        } else if !seen.insert(subject.as_str()) {
            errors.push(format!("subject_order[{}]: duplicate subject '{}'", i, subject));
        }
    }

    let files = [
        ("answer_keys", &config.files.answer_keys),
        ("coefficients", &config.files.coefficients),
        ("roster", &config.files.roster),
        ("submissions", &config.files.submissions),
    ];
    for (field, name) in files {
        if name.trim().is_empty() {
            errors.push(format!("files.{}: file name is empty", field));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
