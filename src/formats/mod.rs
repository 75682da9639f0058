use crate::error::{PermapError, Result};
use crate::writer::Writer;

pub mod json;
pub mod text;
pub mod yaml;

/// Output formats a parsed permission map can be rendered as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Text,
    Json,
    Yaml,
}

impl Format {
    pub fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" | "permission-map" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            other => Err(PermapError::UnknownFormat(other.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Json => "json",
            Self::Yaml => "yaml",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Text => "Permission-map lines (<Class: Ret name(Args)> perms -> _ROLE_)",
            Self::Json => "Pretty-printed JSON array of method objects",
            Self::Yaml => "YAML sequence of method objects",
        }
    }

    pub fn writer(&self) -> Box<dyn Writer> {
        match self {
            Self::Text => Box::new(text::TextWriter),
            Self::Json => Box::new(json::JsonWriter),
            Self::Yaml => Box::new(yaml::YamlWriter),
        }
    }

    pub fn all() -> &'static [Self] {
        &[Self::Text, Self::Json, Self::Yaml]
    }
}

pub(crate) fn write_failure(e: std::io::Error) -> PermapError {
    PermapError::WriteFailure { reason: e.to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_str_accepts_aliases() {
        assert_eq!(Format::from_str("TEXT").unwrap(), Format::Text);
        assert_eq!(Format::from_str("yml").unwrap(), Format::Yaml);
        assert_eq!(Format::from_str("json").unwrap(), Format::Json);
    }

    #[test]
    fn from_str_rejects_unknown() {
        let err = Format::from_str("xml").unwrap_err();
        assert!(matches!(err, PermapError::UnknownFormat(ref f) if f == "xml"));
    }

    #[test]
    fn names_round_trip() {
        for fmt in Format::all() {
            assert_eq!(Format::from_str(fmt.name()).unwrap(), *fmt);
        }
    }
}
