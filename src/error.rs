use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PermapError>;

#[derive(Debug, Error)]
pub enum PermapError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A matched line carries a token in role position that is not a known marker.
    #[error("invalid role marker '{token}' on line {line_number}: {line}")]
    InvalidRole {
        line_number: usize,
        token: String,
        line: String,
    },

    #[error("conflicting role markers {first} and {second} on line {line_number}: {line}")]
    ConflictingRoles {
        line_number: usize,
        first: &'static str,
        second: &'static str,
        line: String,
    },

    #[error("TOML parse error in {path}: {source}")]
    TomlParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML serialization failed: {0}")]
    Yaml(#[from] serde_yml::Error),

    #[error("Unknown format: '{0}'. Use `permap list-formats` to see valid formats.")]
    UnknownFormat(String),

    #[error("Cannot write output: {reason}")]
    WriteFailure { reason: String },
}

impl PermapError {
    /// True for errors that come from the data itself rather than the environment.
    pub fn is_malformed_input(&self) -> bool {
        matches!(self, Self::InvalidRole { .. } | Self::ConflictingRoles { .. })
    }
}
