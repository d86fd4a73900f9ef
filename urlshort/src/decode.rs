use std::{fmt, path::Path, str::FromStr};

use serde::Deserialize;
use thiserror::Error;

/// One configured redirect, as written in a config file.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct PathRecord {
    pub path: String,
    pub url: String,
}

/// Raised when config bytes are not well-formed or lack a `path`/`url` field.
/// Nothing is recovered: one bad record fails the whole buffer.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("config is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}

/// Parses a YAML sequence of mappings:
///
/// ```yaml
/// - path: /some-path
///   url: https://www.some-url.com/demo
/// ```
///
/// An empty or `null` document holds no records.
pub fn parse_yaml(yml: &[u8]) -> Result<Vec<PathRecord>, DecodeError> {
    let records: Option<Vec<PathRecord>> = serde_yaml::from_slice(yml)?;
    Ok(records.unwrap_or_default())
}

/// Parses a JSON array of objects:
///
/// ```json
/// [{"path": "/some-path", "url": "https://www.some-url.com/demo"}]
/// ```
pub fn parse_json(jsn: &[u8]) -> Result<Vec<PathRecord>, DecodeError> {
    Ok(serde_json::from_slice(jsn)?)
}

#[derive(Deserialize)]
struct TomlRedirects {
    #[serde(default)]
    redirect: Vec<PathRecord>,
}

/// Parses an array of `[[redirect]]` tables:
///
/// ```toml
/// [[redirect]]
/// path = "/some-path"
/// url = "https://www.some-url.com/demo"
/// ```
pub fn parse_toml(tml: &[u8]) -> Result<Vec<PathRecord>, DecodeError> {
    let redirects: TomlRedirects = toml::from_str(std::str::from_utf8(tml)?)?;
    Ok(redirects.redirect)
}

/// A config notation understood by this crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Yaml,
    Json,
    Toml,
}

impl Format {
    /// Guesses the notation from a file extension.
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?;
        match ext.to_ascii_lowercase().as_str() {
            "yaml" | "yml" => Some(Self::Yaml),
            "json" => Some(Self::Json),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }

    pub fn parse(self, bytes: &[u8]) -> Result<Vec<PathRecord>, DecodeError> {
        match self {
            Self::Yaml => parse_yaml(bytes),
            Self::Json => parse_json(bytes),
            Self::Toml => parse_toml(bytes),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Yaml => "yaml",
            Self::Json => "json",
            Self::Toml => "toml",
        })
    }
}

#[derive(Debug, Error)]
#[error("unknown config format {0:?}, expected one of yaml, json, toml")]
pub struct UnknownFormat(String);

impl FromStr for Format {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "yaml" | "yml" => Ok(Self::Yaml),
            "json" => Ok(Self::Json),
            "toml" => Ok(Self::Toml),
            _ => Err(UnknownFormat(s.to_string())),
        }
    }
}
