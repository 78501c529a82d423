//! Resolves the per-invocation configuration: API keys from positional
//! arguments or a JSON file, plus the highlight theme.

use crate::{
    error::Error,
    render::Theme,
};
use eyre::{
    Context as _,
    Result,
};
use serde::Deserialize;
use std::path::{
    Path,
    PathBuf,
};
use tracing::warn;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_keys: Vec<String>,
    pub theme: Theme,
}

/// On-disk shape: `{"apiKeys": ["…"], "color": "green"}`. No schema
/// versioning.
#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(rename = "apiKeys", default)]
    api_keys: Vec<String>,
    #[serde(default)]
    color: Option<String>,
}

impl Config {
    /// Keys come from the config file when one was requested, otherwise
    /// from the positional arguments. An empty key set is rejected here so
    /// the orchestrator can assume at least one key.
    pub fn resolve(positional_keys: Vec<String>, config_file: Option<PathBuf>) -> Result<Self> {
        let config = match config_file {
            Some(path) => Self::from_file(&path)?,
            None => Self {
                api_keys: positional_keys,
                theme: Theme::default(),
            },
        };
        if config.api_keys.is_empty() {
            return Err(Error::NoApiKeysConfigured.into());
        }
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read config file {}", path.display()))?;
        Self::parse(&content)
            .wrap_err_with(|| format!("failed to parse config file {}", path.display()))
    }

    fn parse(content: &str) -> Result<Self> {
        let file: ConfigFile = serde_json::from_str(content)?;
        let theme = match file.color.as_deref() {
            Some(name) => Theme::from_name(name).unwrap_or_else(|| {
                warn!(color = name, "unknown color theme, falling back to the default");
                Theme::default()
            }),
            None => Theme::default(),
        };
        Ok(Self {
            api_keys: file.api_keys,
            theme,
        })
    }
}
