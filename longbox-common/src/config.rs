//! Configuration loading and data directory resolution

use std::path::{Path, PathBuf};

/// Environment variable naming the artifact directory.
pub const DATA_DIR_ENV: &str = "LONGBOX_DATA_DIR";

/// Data directory resolution priority order:
/// 1. Command-line argument (highest priority)
/// 2. `LONGBOX_DATA_DIR` environment variable
/// 3. TOML config file (`data_dir` key)
/// 4. OS-dependent default (fallback)
pub fn resolve_data_dir(cli_arg: Option<&Path>) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(DATA_DIR_ENV) {
        return PathBuf::from(path);
    }

    // Priority 3: TOML config file
    if let Some(config_path) = find_config_file() {
        if let Ok(contents) = std::fs::read_to_string(&config_path) {
            if let Ok(config) = toml::from_str::<toml::Value>(&contents) {
                if let Some(dir) = config.get("data_dir").and_then(|v| v.as_str()) {
                    return PathBuf::from(dir);
                }
            }
        }
    }

    // Priority 4: OS-dependent default
    default_data_dir()
}

/// Probe the per-user config location first, then the system-wide one.
fn find_config_file() -> Option<PathBuf> {
    if let Some(path) = dirs::config_dir().map(|d| d.join("longbox").join("config.toml")) {
        if path.exists() {
            return Some(path);
        }
    }
    let system_config = PathBuf::from("/etc/longbox/config.toml");
    if system_config.exists() {
        return Some(system_config);
    }
    None
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("longbox"))
        .unwrap_or_else(|| PathBuf::from("./longbox_data"))
}
