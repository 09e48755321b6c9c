use std::path::PathBuf;
use thiserror::Error;

/// Goscribe error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Config validation error: {0}")]
    ConfigValidation(String),

    #[error("Source directory not found: {0}")]
    SourceNotFound(PathBuf),

    #[error("Cannot read source {path}: {message}")]
    SourceUnreadable { path: PathBuf, message: String },

    #[error("No buildable Go source files in {0}")]
    NoSourceFiles(PathBuf),

    #[error("Found packages {first} ({first_file}) and {second} ({second_file}) in {dir}")]
    AmbiguousPackage {
        dir: PathBuf,
        first: String,
        first_file: String,
        second: String,
        second_file: String,
    },

    #[error("Malformed declaration: {0}")]
    MalformedDeclaration(String),

    #[error("Failed to serialize document: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Glob pattern error: {0}")]
    GlobPattern(#[from] glob::PatternError),

    #[error("Invalid annotation pattern: {0}")]
    Regex(#[from] regex::Error),

    #[error("Parser error: {0}")]
    Parser(String),
}

/// Result type alias for goscribe operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a config validation error
    pub fn config_validation(msg: impl Into<String>) -> Self {
        Error::ConfigValidation(msg.into())
    }

    /// Create a source-unreadable error
    pub fn unreadable(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Error::SourceUnreadable {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a malformed-declaration error
    pub fn malformed(msg: impl Into<String>) -> Self {
        Error::MalformedDeclaration(msg.into())
    }

    /// Create a parser error
    pub fn parser(msg: impl Into<String>) -> Self {
        Error::Parser(msg.into())
    }
}
