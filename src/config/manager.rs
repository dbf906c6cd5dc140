use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::paths;
use crate::translation::{DEFAULT_API_URL, TranslateError};

/// Default model when none is configured.
pub const DEFAULT_MODEL: &str = "glm-4";

/// The configuration file structure.
///
/// Corresponds to `~/.config/glmt/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    /// API keys, comma- or newline-delimited.
    pub api_keys: Option<String>,
    /// Base URL override. Defaults to the first-party platform.
    pub api_url: Option<String>,
    /// Model name, or "custom" together with `custom_model`.
    pub model: Option<String>,
    /// Model name used when `model = "custom"`.
    pub custom_model: Option<String>,
    /// Whether to stream responses. Defaults to true.
    pub stream: Option<bool>,
    /// Default source language code.
    pub from: Option<String>,
    /// Default target language code.
    pub to: Option<String>,
    /// Custom system prompt template ({from}, {to}, {text} placeholders).
    pub custom_system_prompt: Option<String>,
    /// Custom user prompt template ({from}, {to}, {text} placeholders).
    pub custom_user_prompt: Option<String>,
}

/// Resolved configuration after merging CLI arguments and config file.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// The API key to use for this invocation.
    pub api_key: String,
    /// The configured base URL (not yet normalized).
    pub api_url: String,
    /// The effective model name.
    pub model: String,
    /// Whether to stream responses.
    pub stream: bool,
    /// Source language code.
    pub from: String,
    /// Target language code.
    pub to: String,
    /// Custom system prompt template, if any.
    pub custom_system_prompt: Option<String>,
    /// Custom user prompt template, if any.
    pub custom_user_prompt: Option<String>,
}

/// CLI overrides that take precedence over config file values.
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    pub from: Option<String>,
    pub to: Option<String>,
    pub url: Option<String>,
    pub model: Option<String>,
    pub api_key: Option<String>,
    pub no_stream: bool,
}

/// Splits a delimited `api_keys` value into individual keys.
///
/// Accepts commas and newlines as delimiters; blank entries are dropped.
pub fn split_api_keys(raw: &str) -> Vec<String> {
    raw.split([',', '\n'])
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .map(str::to_string)
        .collect()
}

/// Resolves configuration by merging CLI options with config file
/// settings. CLI options win; built-in defaults fill the rest.
///
/// # Errors
///
/// Returns [`TranslateError::MissingCredential`] when no API key is
/// available and [`TranslateError::MissingConfiguration`] when
/// `model = "custom"` has no `custom_model` or no source/target language
/// can be determined.
pub fn resolve_config(options: &ResolveOptions, config_file: &ConfigFile) -> Result<ResolvedConfig> {
    let api_key = options
        .api_key
        .clone()
        .or_else(|| {
            config_file
                .api_keys
                .as_deref()
                .map(split_api_keys)
                .and_then(|keys| keys.into_iter().next())
        })
        .ok_or_else(|| anyhow::Error::new(TranslateError::MissingCredential))?;

    let model = options
        .model
        .clone()
        .or_else(|| config_file.model.clone())
        .unwrap_or_else(|| DEFAULT_MODEL.to_string());

    let model = if model == "custom" {
        match config_file.custom_model.as_deref().map(str::trim) {
            Some(custom) if !custom.is_empty() => custom.to_string(),
            _ => {
                return Err(anyhow::Error::new(TranslateError::MissingConfiguration(
                    "'custom_model': model = \"custom\" requires a custom model name in \
                     ~/.config/glmt/config.toml"
                        .to_string(),
                )));
            }
        }
    } else {
        model
    };

    let from = options
        .from
        .clone()
        .or_else(|| config_file.from.clone())
        .ok_or_else(|| {
            anyhow::Error::new(missing("'from' (source language)", "glmt --from <lang>"))
        })?;

    let to = options
        .to
        .clone()
        .or_else(|| config_file.to.clone())
        .ok_or_else(|| {
            anyhow::Error::new(missing("'to' (target language)", "glmt --to <lang>"))
        })?;

    let api_url = options
        .url
        .clone()
        .or_else(|| config_file.api_url.clone())
        .unwrap_or_else(|| DEFAULT_API_URL.to_string());

    let stream = if options.no_stream {
        false
    } else {
        config_file.stream.unwrap_or(true)
    };

    Ok(ResolvedConfig {
        api_key,
        api_url,
        model,
        stream,
        from,
        to,
        custom_system_prompt: config_file.custom_system_prompt.clone(),
        custom_user_prompt: config_file.custom_user_prompt.clone(),
    })
}

fn missing(what: &str, how: &str) -> TranslateError {
    TranslateError::MissingConfiguration(format!(
        "{what}\n\n\
         Please provide it via:\n  \
         - {how}\n  \
         - Config file: ~/.config/glmt/config.toml"
    ))
}

/// Manages loading and saving the configuration file.
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Creates a config manager for `$XDG_CONFIG_HOME/glmt/config.toml`
    /// (or `~/.config/glmt/config.toml`).
    pub fn new() -> Self {
        Self {
            config_path: paths::config_dir().join("config.toml"),
        }
    }

    pub const fn config_path(&self) -> &PathBuf {
        &self.config_path
    }

    pub fn load(&self) -> Result<ConfigFile> {
        let contents = fs::read_to_string(&self.config_path).with_context(|| {
            format!("Failed to read config file: {}", self.config_path.display())
        })?;

        let config_file: ConfigFile =
            toml::from_str(&contents).with_context(|| "Failed to parse config file")?;

        Ok(config_file)
    }

    pub fn save(&self, config: &ConfigFile) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let contents = toml::to_string_pretty(config).context("Failed to serialize config")?;

        fs::write(&self.config_path, contents).with_context(|| {
            format!(
                "Failed to write config file: {}",
                self.config_path.display()
            )
        })?;

        Ok(())
    }

    pub fn load_or_default(&self) -> ConfigFile {
        self.load().unwrap_or_default()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_manager(temp_dir: &TempDir) -> ConfigManager {
        ConfigManager {
            config_path: temp_dir.path().join("config.toml"),
        }
    }

    fn config_with_key() -> ConfigFile {
        ConfigFile {
            api_keys: Some("key-1".to_string()),
            from: Some("en".to_string()),
            to: Some("ja".to_string()),
            ..ConfigFile::default()
        }
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);

        let config = ConfigFile {
            api_keys: Some("key-1,key-2".to_string()),
            api_url: Some("https://api.example.com".to_string()),
            model: Some("custom".to_string()),
            custom_model: Some("glm-4-plus".to_string()),
            stream: Some(false),
            from: Some("en".to_string()),
            to: Some("zh-Hans".to_string()),
            custom_system_prompt: None,
            custom_user_prompt: Some("{to}: {text}".to_string()),
        };

        manager.save(&config).unwrap();
        let loaded = manager.load().unwrap();

        assert_eq!(loaded.api_keys, Some("key-1,key-2".to_string()));
        assert_eq!(loaded.custom_model, Some("glm-4-plus".to_string()));
        assert_eq!(loaded.stream, Some(false));
        assert_eq!(loaded.custom_user_prompt, Some("{to}: {text}".to_string()));
    }

    #[test]
    fn test_load_nonexistent_config() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);

        assert!(manager.load().is_err());
    }

    #[test]
    fn test_split_api_keys() {
        assert_eq!(split_api_keys("a,b"), vec!["a", "b"]);
        assert_eq!(split_api_keys("a\nb\n"), vec!["a", "b"]);
        assert_eq!(split_api_keys(" a , ,b "), vec!["a", "b"]);
        assert!(split_api_keys("").is_empty());
    }

    #[test]
    fn test_resolve_defaults() {
        let resolved = resolve_config(&ResolveOptions::default(), &config_with_key()).unwrap();

        assert_eq!(resolved.api_key, "key-1");
        assert_eq!(resolved.api_url, DEFAULT_API_URL);
        assert_eq!(resolved.model, DEFAULT_MODEL);
        assert!(resolved.stream);
    }

    #[test]
    fn test_resolve_cli_overrides_file() {
        let options = ResolveOptions {
            to: Some("fr".to_string()),
            model: Some("glm-4-flash".to_string()),
            url: Some("https://api.example.com".to_string()),
            no_stream: true,
            ..ResolveOptions::default()
        };

        let resolved = resolve_config(&options, &config_with_key()).unwrap();

        assert_eq!(resolved.to, "fr");
        assert_eq!(resolved.model, "glm-4-flash");
        assert_eq!(resolved.api_url, "https://api.example.com");
        assert!(!resolved.stream);
    }

    #[test]
    fn test_resolve_first_key_of_many() {
        let mut config = config_with_key();
        config.api_keys = Some("first\nsecond,third".to_string());

        let resolved = resolve_config(&ResolveOptions::default(), &config).unwrap();
        assert_eq!(resolved.api_key, "first");
    }

    #[test]
    fn test_resolve_missing_api_key() {
        let mut config = config_with_key();
        config.api_keys = None;

        let err = resolve_config(&ResolveOptions::default(), &config).unwrap_err();
        assert!(err.to_string().contains("api_keys"));
        assert!(matches!(
            err.downcast_ref::<TranslateError>(),
            Some(TranslateError::MissingCredential)
        ));
    }

    #[test]
    fn test_resolve_custom_model_requires_name() {
        let mut config = config_with_key();
        config.model = Some("custom".to_string());

        let err = resolve_config(&ResolveOptions::default(), &config).unwrap_err();
        assert!(err.to_string().contains("custom_model"));
        assert!(matches!(
            err.downcast_ref::<TranslateError>(),
            Some(TranslateError::MissingConfiguration(_))
        ));

        config.custom_model = Some("my-model".to_string());
        let resolved = resolve_config(&ResolveOptions::default(), &config).unwrap();
        assert_eq!(resolved.model, "my-model");
    }

    #[test]
    fn test_resolve_missing_target_language() {
        let mut config = config_with_key();
        config.to = None;

        let err = resolve_config(&ResolveOptions::default(), &config).unwrap_err();
        assert!(err.to_string().contains("'to'"));
        assert!(matches!(
            err.downcast_ref::<TranslateError>(),
            Some(TranslateError::MissingConfiguration(_))
        ));
    }
}
