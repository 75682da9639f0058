use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use crate::error::{PermapError, Result};

/// Default capacity hint for the result set; real permission maps run to tens
/// of thousands of entries.
pub const DEFAULT_INITIAL_CAPACITY: usize = 10_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub parser: ParserConfig,
}

/// How entries sharing a signature are collapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicatePolicy {
    /// The first line for a signature wins; later ones are dropped.
    #[default]
    KeepFirst,
    /// Permissions of all lines for a signature are unioned.
    MergePermissions,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParserConfig {
    /// Skip whitespace-only lines without reporting them.
    pub skip_blank_lines: bool,
    pub duplicates: DuplicatePolicy,
    pub initial_capacity: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            skip_blank_lines: true,
            duplicates: DuplicatePolicy::KeepFirst,
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
        }
    }
}

impl Config {
    /// Load config from an explicit TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| PermapError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml(&raw, path)
    }

    /// Load config from ~/.permap/config.toml.
    /// Returns a default config if the file does not exist.
    pub fn load_default() -> Result<Self> {
        let path = config_file_path();
        if !path.exists() {
            return Ok(Config::default());
        }
        Self::load(&path)
    }

    /// Load `path` when given, otherwise the default location.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Self::load_default(),
        }
    }

    fn from_toml(raw: &str, path: &Path) -> Result<Self> {
        toml::from_str(raw).map_err(|e| PermapError::TomlParse {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

/// Root directory for permap config: ~/.permap/
pub fn permap_dir() -> PathBuf {
    home_dir().join(".permap")
}

pub fn config_file_path() -> PathBuf {
    permap_dir().join("config.toml")
}

/// Resolve the user's home directory.
///
/// Uses the `HOME` environment variable on Unix (the shell's value), falling
/// back to `dirs::home_dir()` (passwd lookup) if it is unset or empty.
pub fn home_dir() -> PathBuf {
    std::env::var("HOME")
        .ok()
        .filter(|h| !h.is_empty())
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn empty_file_gives_defaults() {
        let file = write_config("");
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config, Config::default());
        assert!(config.parser.skip_blank_lines);
        assert_eq!(config.parser.initial_capacity, DEFAULT_INITIAL_CAPACITY);
    }

    #[test]
    fn parser_table_overrides_fields() {
        let file = write_config(
            "[parser]\nskip_blank_lines = false\nduplicates = \"merge-permissions\"\n",
        );
        let config = Config::load(file.path()).unwrap();
        assert!(!config.parser.skip_blank_lines);
        assert_eq!(config.parser.duplicates, DuplicatePolicy::MergePermissions);
        assert_eq!(config.parser.initial_capacity, DEFAULT_INITIAL_CAPACITY);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let file = write_config("[parser]\nskip_comments = true\n");
        let err = Config::load(file.path()).unwrap_err();
        assert!(matches!(err, PermapError::TomlParse { .. }));
    }

    #[test]
    fn missing_explicit_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, PermapError::Io { .. }));
    }
}
