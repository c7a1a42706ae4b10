//! # CLI Configuration
//!
//! Optional YAML file passed with `--config`. Every key is optional and
//! command-line flags take precedence over the file.
//!
//! ```yaml
//! format: json          # text | json
//! path_display: as_given  # file_name | as_given
//! ```

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// How diagnostics are printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// One line per diagnostic.
    #[default]
    Text,
    /// A JSON array of diagnostic objects.
    Json,
}

/// How the validated file is named inside diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathDisplay {
    /// The bare file name, relative to the file's own directory.
    #[default]
    FileName,
    /// The path exactly as given on the command line.
    AsGiven,
}

/// Settings read from the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    pub format: OutputFormat,
    pub path_display: PathDisplay,
}

/// The config file could not be used.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
}

impl CliConfig {
    /// Load settings from a YAML file. An empty file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, serde_yaml::Error> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_text_and_file_name() {
        let config = CliConfig::default();
        assert_eq!(config.format, OutputFormat::Text);
        assert_eq!(config.path_display, PathDisplay::FileName);
    }

    #[test]
    fn empty_file_yields_defaults() {
        assert_eq!(CliConfig::from_yaml_str("").unwrap(), CliConfig::default());
        assert_eq!(CliConfig::from_yaml_str("\n  \n").unwrap(), CliConfig::default());
    }

    #[test]
    fn partial_config_keeps_other_defaults() {
        let config = CliConfig::from_yaml_str("format: json\n").unwrap();
        assert_eq!(config.format, OutputFormat::Json);
        assert_eq!(config.path_display, PathDisplay::FileName);
    }

    #[test]
    fn full_config() {
        let config = CliConfig::from_yaml_str("format: text\npath_display: as_given\n").unwrap();
        assert_eq!(config.path_display, PathDisplay::AsGiven);
    }

    #[test]
    fn unknown_keys_and_values_are_rejected() {
        assert!(CliConfig::from_yaml_str("colour: always\n").is_err());
        assert!(CliConfig::from_yaml_str("format: xml\n").is_err());
    }

    #[test]
    fn load_reports_missing_file() {
        let err = CliConfig::load(Path::new("/nonexistent/podlint.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("podlint.yaml");
        std::fs::write(&path, "path_display: as_given\n").unwrap();
        let config = CliConfig::load(&path).unwrap();
        assert_eq!(config.path_display, PathDisplay::AsGiven);
    }
}
