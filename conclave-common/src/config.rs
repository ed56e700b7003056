//! Configuration loading and root folder resolution

use std::path::PathBuf;

/// Default port for the API service
pub const DEFAULT_PORT: u16 = 5720;

/// Root folder resolution priority order:
/// 1. Command-line argument (highest priority)
/// 2. Environment variable
/// 3. TOML config file
/// 4. OS-dependent compiled default (fallback)
///
/// Resolution never fails: an unreadable or malformed config file falls
/// through to the next tier.
pub fn resolve_root_folder(cli_arg: Option<&str>, env_var_name: &str) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return PathBuf::from(path);
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(env_var_name) {
        return PathBuf::from(path);
    }

    // Priority 3: TOML config file
    if let Some(config_path) = locate_config_file() {
        if let Ok(toml_content) = std::fs::read_to_string(&config_path) {
            if let Ok(config) = toml::from_str::<toml::Value>(&toml_content) {
                if let Some(root_folder) = config.get("root_folder").and_then(|v| v.as_str()) {
                    return PathBuf::from(root_folder);
                }
            }
        }
    }

    // Priority 4: OS-dependent compiled default
    default_root_folder()
}

/// First existing config file: the user's config directory, then the
/// system-wide location on Linux
fn locate_config_file() -> Option<PathBuf> {
    if let Some(path) = dirs::config_dir().map(|d| d.join("conclave").join("config.toml")) {
        if path.exists() {
            return Some(path);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/conclave/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}

/// Get OS-dependent default root folder path
fn default_root_folder() -> PathBuf {
    if cfg!(target_os = "linux") {
        dirs::data_local_dir()
            .map(|d| d.join("conclave"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/conclave"))
    } else if cfg!(target_os = "macos") {
        dirs::data_dir()
            .map(|d| d.join("conclave"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/conclave"))
    } else if cfg!(target_os = "windows") {
        dirs::data_local_dir()
            .map(|d| d.join("conclave"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\conclave"))
    } else {
        PathBuf::from("./conclave_data")
    }
}

/// Database file path under the resolved root folder
pub fn database_path(root_folder: &std::path::Path) -> PathBuf {
    root_folder.join("conclave.db")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_arg_takes_priority() {
        let root = resolve_root_folder(Some("/tmp/conclave-test"), "CONCLAVE_TEST_UNSET");
        assert_eq!(root, PathBuf::from("/tmp/conclave-test"));
    }

    #[test]
    fn test_database_path() {
        let path = database_path(std::path::Path::new("/data/conclave"));
        assert_eq!(path, PathBuf::from("/data/conclave/conclave.db"));
    }
}
