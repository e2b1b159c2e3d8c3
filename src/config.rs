//! qrforge runtime configuration handling

use crate::controller::{DEFAULT_EXPORT_SIZE, MAX_EXPORT_SIZE};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Top-level configuration structure persisted to disk or environment
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QrforgeConfig {
    /// Logging configuration
    pub logging: LoggingOptions,
    /// Export defaults
    pub export: ExportOptions,
}

impl QrforgeConfig {
    /// Load configuration from an explicit path or fall back to discovered defaults.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let mut config = if let Some(path) = explicit_path {
            Self::from_file(path)?
        } else if let Some(path) = Self::discover_file()? {
            tracing::info!("Using configuration file: {}", path.display());
            Self::from_file(&path)?
        } else {
            tracing::debug!("No qrforge.toml / qrforge.yaml found, using defaults");
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Attempt to locate a configuration file in common locations.
    fn discover_file() -> Result<Option<PathBuf>> {
        let cwd =
            env::current_dir().map_err(|e| Error::Config(format!("Failed to read cwd: {e}")))?;
        for candidate in ["qrforge.toml", "qrforge.yaml", "qrforge.yml"] {
            let path = cwd.join(candidate);
            if path.exists() {
                return Ok(Some(path));
            }
        }

        if let Some(xdg_config) = env::var_os("XDG_CONFIG_HOME") {
            let base = PathBuf::from(xdg_config).join("qrforge");
            for candidate in ["config.toml", "config.yaml"] {
                let path = base.join(candidate);
                if path.exists() {
                    return Ok(Some(path));
                }
            }
        }

        Ok(None)
    }

    /// Read configuration from a concrete file path.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {e}", path.display())))?;

        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
            .to_ascii_lowercase()
            .as_str()
        {
            "toml" => toml::from_str(&contents).map_err(|e| {
                Error::Config(format!("Failed to parse TOML {}: {e}", path.display()))
            }),
            "yaml" | "yml" => serde_yaml::from_str(&contents).map_err(|e| {
                Error::Config(format!("Failed to parse YAML {}: {e}", path.display()))
            }),
            other => Err(Error::Config(format!(
                "Unsupported config format '{}', expected toml/yaml",
                other
            ))),
        }
    }

    /// Apply environment variable overrides after file/default loading.
    fn apply_env_overrides(&mut self) {
        self.logging.apply_env_overrides();
        self.export.apply_env_overrides();
    }
}

/// Structured logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingOptions {
    /// Default log level (overridable via `QRFORGE_LOG_LEVEL`)
    pub level: String,
    /// Optional log file path for teeing structured logs
    pub file: Option<PathBuf>,
    /// Force ANSI colors in stdout logging
    pub color: bool,
    /// Optional log rotation strategy applied to `file`
    pub rotation: Option<LogRotation>,
}

impl Default for LoggingOptions {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            color: true,
            rotation: None,
        }
    }
}

impl LoggingOptions {
    pub(crate) fn apply_env_overrides(&mut self) {
        if let Ok(level) = env::var("QRFORGE_LOG_LEVEL") {
            self.level = level;
        }
        if let Ok(file) = env::var("QRFORGE_LOG_FILE") {
            self.file = Some(PathBuf::from(file));
        }
        if let Ok(color) = env::var("QRFORGE_LOG_COLOR") {
            if let Some(flag) = parse_flag(&color) {
                self.color = flag;
            }
        }
        if let Ok(rotation) = env::var("QRFORGE_LOG_ROTATION") {
            if let Some(parsed) = LogRotation::parse(&rotation) {
                self.rotation = Some(parsed);
            }
        }
    }
}

/// Supported log rotation policies for file sinks
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    /// Rotate log files once per hour
    Hourly,
    /// Rotate log files once per day
    Daily,
}

impl LogRotation {
    fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "hourly" => Some(Self::Hourly),
            "daily" => Some(Self::Daily),
            _ => None,
        }
    }
}

/// Defaults applied to downloads
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    /// Square size used when no size is selected
    pub default_size: u32,
    /// Directory downloads are saved into
    pub output_dir: PathBuf,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            default_size: DEFAULT_EXPORT_SIZE,
            output_dir: PathBuf::from("."),
        }
    }
}

impl ExportOptions {
    pub(crate) fn apply_env_overrides(&mut self) {
        if let Ok(size) = env::var("QRFORGE_EXPORT_SIZE") {
            if let Ok(parsed) = size.trim().parse::<u32>() {
                self.default_size = parsed.clamp(1, MAX_EXPORT_SIZE);
            }
        }
        if let Ok(dir) = env::var("QRFORGE_OUTPUT_DIR") {
            if !dir.trim().is_empty() {
                self.output_dir = PathBuf::from(dir);
            }
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "0" | "false" | "off" => Some(false),
        "1" | "true" | "on" => Some(true),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_export_constants() {
        let config = QrforgeConfig::default();
        assert_eq!(config.export.default_size, 400);
        assert_eq!(config.logging.level, "info");
        assert!(config.logging.rotation.is_none());
    }

    #[test]
    fn reads_partial_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("qrforge.toml");
        fs::write(
            &path,
            "[export]\ndefault_size = 512\n\n[logging]\nrotation = \"daily\"\n",
        )
        .unwrap();

        let config = QrforgeConfig::from_file(&path).unwrap();
        assert_eq!(config.export.default_size, 512);
        assert_eq!(config.export.output_dir, PathBuf::from("."));
        assert_eq!(config.logging.rotation, Some(LogRotation::Daily));
        assert!(config.logging.color);
    }

    #[test]
    fn reads_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("qrforge.yaml");
        fs::write(&path, "export:\n  output_dir: downloads\n").unwrap();

        let config = QrforgeConfig::from_file(&path).unwrap();
        assert_eq!(config.export.output_dir, PathBuf::from("downloads"));
    }

    #[test]
    fn rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("qrforge.ini");
        fs::write(&path, "").unwrap();
        assert!(matches!(
            QrforgeConfig::from_file(&path),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn flag_parsing() {
        assert_eq!(parse_flag("OFF"), Some(false));
        assert_eq!(parse_flag("1"), Some(true));
        assert_eq!(parse_flag("maybe"), None);
    }
}
