use crate::cli::ContentArgs;
use crate::constants::{DEFAULT_CONTAINER_TAG, DEFAULT_MAX_CONTENT_LENGTH, DEFAULT_MAX_RETRY_ATTEMPTS};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Problems with the sender's configuration; never retried.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no destination given and no default destination configured")]
    MissingDestination,
    #[error("error destination is not configured")]
    MissingErrorDestination,
    #[error("max content length must be greater than zero")]
    InvalidMaxContentLength,
    #[error("could not read config file {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Sender configuration, read-only once a `Sender` is built from it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SenderConfig {
    /// Default delivery target.
    pub destination: Option<String>,
    /// Target for `send_error`.
    pub error_destination: Option<String>,
    /// Template name to pattern; `{0}` body, `{1}` UTC timestamp.
    pub templates: HashMap<String, String>,
    pub max_content_length: usize,
    pub max_retry_attempts: u32,
    /// Element wrapped around each markup chunk; empty disables wrapping.
    pub container_tag: Option<String>,
}

impl Default for SenderConfig {
    fn default() -> Self {
        Self {
            destination: None,
            error_destination: None,
            templates: HashMap::new(),
            max_content_length: DEFAULT_MAX_CONTENT_LENGTH,
            max_retry_attempts: DEFAULT_MAX_RETRY_ATTEMPTS,
            container_tag: Some(DEFAULT_CONTAINER_TAG.to_string()),
        }
    }
}

impl SenderConfig {
    pub fn new(error_destination: impl Into<String>) -> Self {
        Self {
            error_destination: Some(error_destination.into()),
            ..Self::default()
        }
    }

    pub fn with_destination(
        mut self,
        destination: impl Into<String>,
    ) -> Self {
        self.destination = Some(destination.into());
        self
    }

    pub fn with_template(
        mut self,
        key: impl Into<String>,
        pattern: impl Into<String>,
    ) -> Self {
        self.templates.insert(key.into(), pattern.into());
        self
    }

    pub fn with_max_content_length(
        mut self,
        max_content_length: usize,
    ) -> Self {
        self.max_content_length = max_content_length;
        self
    }

    pub fn with_max_retry_attempts(
        mut self,
        max_retry_attempts: u32,
    ) -> Self {
        self.max_retry_attempts = max_retry_attempts;
        self
    }

    pub fn with_container_tag(
        mut self,
        container_tag: Option<String>,
    ) -> Self {
        self.container_tag = container_tag;
        self
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Start from the `--config` file (or defaults) and apply CLI overrides.
    pub fn from_cli(args: &ContentArgs) -> Result<Self, ConfigError> {
        let mut config = match &args.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        if let Some(max_len) = args.max_len {
            config.max_content_length = max_len;
        }
        if let Some(tag) = &args.container_tag {
            config.container_tag = Some(tag.clone());
        }
        Ok(config)
    }

    /// Checks required keys before a sender is built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_content_length == 0 {
            return Err(ConfigError::InvalidMaxContentLength);
        }
        if non_empty(self.error_destination.as_deref()).is_none() {
            return Err(ConfigError::MissingErrorDestination);
        }
        Ok(())
    }

    /// Per-call destination, else the configured default.
    pub fn resolve_destination<'a>(
        &'a self,
        requested: Option<&'a str>,
    ) -> Result<&'a str, ConfigError> {
        non_empty(requested)
            .or_else(|| non_empty(self.destination.as_deref()))
            .ok_or(ConfigError::MissingDestination)
    }

    pub fn error_destination(&self) -> Result<&str, ConfigError> {
        non_empty(self.error_destination.as_deref()).ok_or(ConfigError::MissingErrorDestination)
    }

    pub fn container_tag(&self) -> Option<&str> {
        non_empty(self.container_tag.as_deref())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_endpoint_limits() {
        let config = SenderConfig::default();
        assert_eq!(config.max_content_length, 4096);
        assert_eq!(config.max_retry_attempts, 3);
        assert_eq!(config.container_tag(), Some("div"));
    }

    #[test]
    fn per_call_destination_wins() {
        let config = SenderConfig::new("errors").with_destination("main");
        assert_eq!(config.resolve_destination(Some("other")).unwrap(), "other");
        assert_eq!(config.resolve_destination(Some("")).unwrap(), "main");
        assert_eq!(config.resolve_destination(None).unwrap(), "main");
    }

    #[test]
    fn missing_destination_is_an_error() {
        let config = SenderConfig::new("errors");
        assert!(matches!(
            config.resolve_destination(None),
            Err(ConfigError::MissingDestination)
        ));
    }

    #[test]
    fn validate_requires_error_destination() {
        assert!(matches!(
            SenderConfig::default().validate(),
            Err(ConfigError::MissingErrorDestination)
        ));
        assert!(matches!(
            SenderConfig::new("e").with_max_content_length(0).validate(),
            Err(ConfigError::InvalidMaxContentLength)
        ));
        assert!(SenderConfig::new("e").validate().is_ok());
    }
}
