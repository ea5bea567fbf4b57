use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::store::TASKS_FILE;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskcliConfig {
    /// Path of the tasks file. A relative value resolves against the
    /// working directory the command runs in.
    pub tasks_file: Option<String>,
}

pub fn config_filename_candidates() -> [&'static str; 2] {
    [".taskcli.toml", ".taskclirc"]
}

pub fn config_path(dir: &Path) -> PathBuf {
    dir.join(".taskcli.toml")
}

pub fn resolve_user_home_dir() -> Option<PathBuf> {
    if let Ok(home) = std::env::var("HOME") {
        let trimmed = home.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }
    if let Ok(profile) = std::env::var("USERPROFILE") {
        let trimmed = profile.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }
    None
}

pub fn resolve_taskcli_home_dir() -> Option<PathBuf> {
    if let Ok(value) = std::env::var("TASKCLI_HOME") {
        let trimmed = value.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }
    resolve_user_home_dir().map(|home| home.join(".taskcli"))
}

pub fn global_config_path() -> Option<PathBuf> {
    resolve_taskcli_home_dir().map(|home| home.join("config.toml"))
}

pub fn load_config(dir: &Path) -> Option<TaskcliConfig> {
    for name in config_filename_candidates() {
        let path = dir.join(name);
        if path.is_file() {
            if let Ok(text) = fs::read_to_string(&path) {
                if let Ok(config) = toml::from_str::<TaskcliConfig>(&text) {
                    return Some(config);
                }
            }
        }
    }
    None
}

pub fn load_global_config() -> Option<TaskcliConfig> {
    let path = global_config_path()?;
    if !path.is_file() {
        return None;
    }
    let text = fs::read_to_string(path).ok()?;
    toml::from_str::<TaskcliConfig>(&text).ok()
}

pub fn write_config(dir: &Path, config: &TaskcliConfig) -> Result<PathBuf, ConfigError> {
    let path = config_path(dir);
    let body = toml::to_string_pretty(config)?;
    fs::write(&path, body)?;
    Ok(path)
}

/// Resolves the tasks-file path. Precedence: explicit path, project config,
/// global config, then `tasks.json` in the working directory.
pub fn resolve_tasks_file(cwd: &Path, explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    if let Some(value) = load_config(cwd).and_then(configured_file) {
        return resolve_relative(cwd, &value);
    }
    if let Some(value) = load_global_config().and_then(configured_file) {
        return resolve_relative(cwd, &value);
    }
    cwd.join(TASKS_FILE)
}

fn configured_file(config: TaskcliConfig) -> Option<String> {
    config
        .tasks_file
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn resolve_relative(cwd: &Path, value: &str) -> PathBuf {
    let path = PathBuf::from(value);
    if path.is_absolute() {
        path
    } else {
        cwd.join(path)
    }
}
