//! Small settings files (run configuration, CLI session) in JSON, TOML or YAML

use serde::{Serialize, de::DeserializeOwned};

use crate::{Error, NormalizedPath, Result, io};

/// Serialization format, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Toml,
    Yaml,
}

impl Format {
    /// Format for `path`, matched case-insensitively on the extension.
    pub fn of(path: &NormalizedPath) -> Result<Self> {
        let extension = path.extension().unwrap_or("");
        match extension.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "toml" => Ok(Self::Toml),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => Err(Error::UnsupportedFormat {
                extension: extension.to_string(),
            }),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Json => "JSON",
            Self::Toml => "TOML",
            Self::Yaml => "YAML",
        }
    }

    fn parse<T: DeserializeOwned>(self, text: &str) -> std::result::Result<T, String> {
        match self {
            Self::Json => serde_json::from_str(text).map_err(|e| e.to_string()),
            Self::Toml => toml::from_str(text).map_err(|e| e.to_string()),
            Self::Yaml => serde_yaml::from_str(text).map_err(|e| e.to_string()),
        }
    }

    fn render<T: Serialize>(self, value: &T) -> std::result::Result<String, String> {
        match self {
            Self::Json => serde_json::to_string_pretty(value).map_err(|e| e.to_string()),
            Self::Toml => toml::to_string_pretty(value).map_err(|e| e.to_string()),
            Self::Yaml => serde_yaml::to_string(value).map_err(|e| e.to_string()),
        }
    }
}

/// Reads and writes serde types in the format their path names.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConfigStore;

impl ConfigStore {
    pub fn new() -> Self {
        Self
    }

    pub fn load<T: DeserializeOwned>(&self, path: &NormalizedPath) -> Result<T> {
        let format = Format::of(path)?;
        let text = io::read_text(path)?;
        format.parse(&text).map_err(|message| Error::ConfigParse {
            path: path.to_native(),
            format: format.name().into(),
            message,
        })
    }

    /// Write `value` to `path`; the file is replaced atomically.
    pub fn save<T: Serialize>(&self, path: &NormalizedPath, value: &T) -> Result<()> {
        let format = Format::of(path)?;
        let text = format.render(value).map_err(|message| Error::ConfigSerialize {
            path: path.to_native(),
            format: format.name().into(),
            message,
        })?;
        tracing::debug!(path = %path, format = format.name(), "Saving settings");
        io::write_atomic(path, text.as_bytes())
    }
}
