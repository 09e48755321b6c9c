use crate::error::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "goscribe.toml";

/// Keywords reported in a node's `notes`, in reporting order
pub const DEFAULT_NOTE_KEYWORDS: [&str; 9] = [
    "TODO", "FIXME", "XXX", "BUG", "NOTE", "HACK", "OPTIMIZE", "WARNING", "ERROR",
];

/// Annotation token pattern
pub const DEFAULT_ANNOTATION_PATTERN: &str = r"@[0-9A-Za-z_]+";

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub source: SourceConfig,
    pub mining: MiningConfig,
    pub output: OutputConfig,
}

/// Source file selection
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// File-name globs skipped when reading a package directory
    pub exclude: Vec<String>,
}

/// Comment mining settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MiningConfig {
    pub note_keywords: Vec<String>,
    pub annotation_pattern: String,
}

/// Output settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub pretty: bool,
}

impl Default for MiningConfig {
    fn default() -> Self {
        Self {
            note_keywords: DEFAULT_NOTE_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            annotation_pattern: DEFAULT_ANNOTATION_PATTERN.to_string(),
        }
    }
}

impl Config {
    /// Load config from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load the given file, else `goscribe.toml` in the working directory if present, else defaults
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            log::debug!("Loading config from {}", path.display());
            return Self::load(path);
        }

        let default_path = Path::new(DEFAULT_CONFIG_FILE);
        if default_path.is_file() {
            log::debug!("Loading config from {}", default_path.display());
            Self::load(default_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Merge CLI arguments into config (CLI takes precedence)
    pub fn merge_cli(&mut self, pretty: bool) {
        if pretty {
            self.output.pretty = true;
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.mining.note_keywords.is_empty() {
            return Err(Error::config_validation("note_keywords must not be empty"));
        }

        if self
            .mining
            .note_keywords
            .iter()
            .any(|k| k.trim().is_empty())
        {
            return Err(Error::config_validation(
                "note_keywords must not contain blank entries",
            ));
        }

        if self.mining.annotation_pattern.is_empty() {
            return Err(Error::config_validation(
                "annotation_pattern must not be empty",
            ));
        }
        Regex::new(&self.mining.annotation_pattern)?;

        for pattern in &self.source.exclude {
            glob::Pattern::new(pattern)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.source.exclude.is_empty());
        assert_eq!(config.mining.note_keywords.len(), 9);
        assert_eq!(config.mining.note_keywords[0], "TODO");
        assert_eq!(config.mining.annotation_pattern, DEFAULT_ANNOTATION_PATTERN);
        assert!(!config.output.pretty);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_valid_config() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[source]
exclude = ["*_gen.go"]

[mining]
note_keywords = ["TODO", "DEPRECATED"]

[output]
pretty = true
"#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.source.exclude, vec!["*_gen.go".to_string()]);
        assert_eq!(config.mining.note_keywords, vec!["TODO", "DEPRECATED"]);
        // unspecified keys keep their defaults
        assert_eq!(config.mining.annotation_pattern, DEFAULT_ANNOTATION_PATTERN);
        assert!(config.output.pretty);
    }

    #[test]
    fn test_load_missing_file() {
        let result = Config::load(Path::new("/nonexistent/goscribe.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_invalid_toml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[mining\nnote_keywords = 3").unwrap();
        let result = Config::load(file.path());
        assert!(matches!(result, Err(Error::ConfigParse(_))));
    }

    #[test]
    fn test_discover_explicit_missing_is_error() {
        let result = Config::discover(Some(Path::new("/nonexistent/goscribe.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_validation_empty_keywords() {
        let mut config = Config::default();
        config.mining.note_keywords.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_blank_keyword() {
        let mut config = Config::default();
        config.mining.note_keywords.push("  ".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_bad_annotation_pattern() {
        let mut config = Config::default();
        config.mining.annotation_pattern = "@(".to_string();
        assert!(matches!(config.validate(), Err(Error::Regex(_))));
    }

    #[test]
    fn test_validation_bad_exclude_glob() {
        let mut config = Config::default();
        config.source.exclude.push("[".to_string());
        assert!(matches!(config.validate(), Err(Error::GlobPattern(_))));
    }

    #[test]
    fn test_merge_cli_pretty() {
        let mut config = Config::default();
        config.merge_cli(true);
        assert!(config.output.pretty);
    }

    #[test]
    fn test_merge_cli_keeps_config_pretty() {
        let mut config = Config::default();
        config.output.pretty = true;
        config.merge_cli(false);
        assert!(config.output.pretty);
    }

    #[test]
    fn test_output_config_parsing() {
        let toml_str = r#"pretty = true"#;
        let output: OutputConfig = toml::from_str(toml_str).unwrap();
        assert!(output.pretty);
    }
}
