use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_DEVICE_PATHS: [&str; 3] = [
    "/sys/bus/i2c/devices/2-0055/eeprom",
    "/sys/bus/i2c/devices/2-0054/eeprom",
    "/sys/bus/i2c/devices/2-0050/eeprom",
];
pub const DEFAULT_SERVER_ID_PATH: &str = "/sys/class/soc/xreg/server_id";
pub const DEFAULT_MANUFACTURER: &str = "Hewlett Packard Enterprise";

/// Where a scan reads from.
///
/// Missing keys in a JSON override file fall back to the built-in defaults.
///
/// # Examples
/// ```
/// use frudevice_core::ScanConfig;
///
/// let config = ScanConfig::default();
/// assert_eq!(config.device_paths.len(), 3);
/// assert_eq!(config.manufacturer, "Hewlett Packard Enterprise");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScanConfig {
    /// Candidate EEPROM paths, tried in order.
    pub device_paths: Vec<PathBuf>,
    /// File holding the server id on its first line.
    pub server_id_path: PathBuf,
    /// Published manufacturer name.
    pub manufacturer: String,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            device_paths: DEFAULT_DEVICE_PATHS.iter().map(PathBuf::from).collect(),
            server_id_path: PathBuf::from(DEFAULT_SERVER_ID_PATH),
            manufacturer: DEFAULT_MANUFACTURER.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl ScanConfig {
    /// Load a JSON override file.
    ///
    /// # Errors
    /// Returns `ConfigError` when the file cannot be read or is not a valid
    /// config object.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_deployed_paths() {
        let config = ScanConfig::default();
        assert_eq!(
            config.device_paths.first(),
            Some(&PathBuf::from("/sys/bus/i2c/devices/2-0055/eeprom"))
        );
        assert_eq!(config.server_id_path, PathBuf::from(DEFAULT_SERVER_ID_PATH));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: ScanConfig =
            serde_json::from_str(r#"{"device_paths": ["/tmp/eeprom"]}"#).unwrap();
        assert_eq!(config.device_paths, vec![PathBuf::from("/tmp/eeprom")]);
        assert_eq!(config.manufacturer, DEFAULT_MANUFACTURER);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = serde_json::from_str::<ScanConfig>(r#"{"devices": []}"#).unwrap_err();
        assert!(err.to_string().contains("unknown field"));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = ScanConfig::from_json_file(Path::new("/nonexistent/frudevice.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
