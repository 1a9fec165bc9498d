//! Chat provider configuration.
//!
//! Settings come from, in priority order:
//!
//! 1. command-line overrides (`--provider`, `--model`);
//! 2. the config file, `<config dir>/vibes/config.toml` (or `$VIBES_CONFIG`):
//!
//!    ```toml
//!    provider = "anthropic"
//!
//!    [providers.anthropic]
//!    api_key = "sk-..."
//!    model = "claude-sonnet-4-5"
//!    ```
//!
//! 3. environment variables (a `.env` file is loaded at startup):
//!    `VIBES_PROVIDER`, `{PROVIDER}_API_KEY`, `{PROVIDER}_MODEL`;
//! 4. the provider's default model.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Environment variable overriding the config file location.
pub const CONFIG_PATH_ENV: &str = "VIBES_CONFIG";
/// Environment variable naming the provider.
pub const PROVIDER_ENV: &str = "VIBES_PROVIDER";
/// Reply length limit for providers that require one.
pub const DEFAULT_MAX_TOKENS: u32 = 1000;

/// A supported chat provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    /// OpenAI chat completions.
    OpenAi,
    /// Anthropic messages.
    Anthropic,
    /// Google Gemini.
    Google,
}

impl Provider {
    /// Name used in config files and on the command line.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Anthropic => "anthropic",
            Self::Google => "google",
        }
    }

    /// Model used when none is configured.
    #[must_use]
    pub fn default_model(self) -> &'static str {
        match self {
            Self::OpenAi => "gpt-5",
            Self::Anthropic => "claude-sonnet-4-5",
            Self::Google => "gemini-2.5-pro",
        }
    }

    fn env_var(self, suffix: &str) -> String {
        format!("{}_{suffix}", self.name().to_uppercase())
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Provider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "anthropic" => Ok(Self::Anthropic),
            "google" => Ok(Self::Google),
            _ => Err(ConfigError::UnknownProvider { name: s.to_string() }),
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file exists but could not be read.
    #[error("failed to read {}: {message}", .path.display())]
    Read {
        /// Config file path.
        path: PathBuf,
        /// I/O error message.
        message: String,
    },
    /// The config file is not valid TOML for this schema.
    #[error("failed to parse {}: {message}", .path.display())]
    Parse {
        /// Config file path.
        path: PathBuf,
        /// Parser message.
        message: String,
    },
    /// No provider was selected anywhere.
    #[error(
        "No provider configured. Set provider in {} or VIBES_PROVIDER environment variable.",
        .path.display()
    )]
    NoProvider {
        /// Config file path.
        path: PathBuf,
    },
    /// The provider name is not supported.
    #[error("Unknown provider '{name}'. Expected one of: openai, anthropic, google.")]
    UnknownProvider {
        /// The rejected name.
        name: String,
    },
    /// No API key was found for the provider.
    #[error(
        "No API key found for provider '{provider}'. Set API key in '{}' or {env} environment variable.",
        .path.display()
    )]
    NoApiKey {
        /// Selected provider.
        provider: Provider,
        /// Config file path.
        path: PathBuf,
        /// Environment variable that would supply the key.
        env: String,
    },
}

/// One `[providers.<name>]` table.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderSection {
    /// API key.
    pub api_key: Option<String>,
    /// Model name.
    pub model: Option<String>,
    /// Alternative API endpoint.
    pub base_url: Option<String>,
    /// Reply length limit.
    pub max_tokens: Option<u32>,
}

/// Parsed content of the config file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    /// Selected provider.
    pub provider: Option<String>,
    /// Per-provider settings.
    #[serde(default)]
    pub providers: HashMap<String, ProviderSection>,
}

/// Command-line overrides.
#[derive(Debug, Clone, Copy, Default)]
pub struct Overrides<'a> {
    /// Provider name.
    pub provider: Option<&'a str>,
    /// Model name.
    pub model: Option<&'a str>,
}

/// Everything needed to talk to a chat provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatSettings {
    /// Selected provider.
    pub provider: Provider,
    /// API key.
    pub api_key: String,
    /// Model name.
    pub model: String,
    /// Alternative API endpoint.
    pub base_url: Option<String>,
    /// Reply length limit.
    pub max_tokens: u32,
}

/// Loaded configuration; constructed once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    path: PathBuf,
    file: ConfigFile,
}

impl Config {
    /// Location of the config file: `$VIBES_CONFIG`, else
    /// `<config dir>/vibes/config.toml`.
    #[must_use]
    pub fn default_path() -> PathBuf {
        if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
            return PathBuf::from(path);
        }
        dirs::config_dir().unwrap_or_else(|| PathBuf::from(".")).join("vibes").join("config.toml")
    }

    /// Loads the config file from [`Config::default_path`].
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::default_path())
    }

    /// Loads the config file at `path`; a missing file is an empty config.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file");
            return Ok(Self { path: path.to_path_buf(), file: ConfigFile::default() });
        }
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Read { path: path.to_path_buf(), message: e.to_string() })?;
        Self::from_toml(path, &text)
    }

    /// Parses config text as if it had been read from `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if `text` is not a valid config file.
    pub fn from_toml(path: &Path, text: &str) -> Result<Self, ConfigError> {
        let file = toml::from_str(text)
            .map_err(|e| ConfigError::Parse { path: path.to_path_buf(), message: e.to_string() })?;
        Ok(Self { path: path.to_path_buf(), file })
    }

    /// Path the config was loaded from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Resolves chat settings against the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if no provider or API key can be found.
    pub fn chat_settings(&self, overrides: Overrides<'_>) -> Result<ChatSettings, ConfigError> {
        self.chat_settings_with(overrides, |key| std::env::var(key).ok())
    }

    /// Resolves chat settings, reading environment variables through `env`.
    ///
    /// # Errors
    ///
    /// Returns an error if no provider or API key can be found.
    pub fn chat_settings_with(
        &self,
        overrides: Overrides<'_>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<ChatSettings, ConfigError> {
        let env = |key: &str| env(key).filter(|value| !value.trim().is_empty());

        let provider_name = overrides
            .provider
            .map(str::to_string)
            .or_else(|| self.file.provider.clone())
            .or_else(|| env(PROVIDER_ENV))
            .ok_or_else(|| ConfigError::NoProvider { path: self.path.clone() })?;
        let provider: Provider = provider_name.parse()?;

        let section = self.file.providers.get(provider.name()).cloned().unwrap_or_default();

        let api_key_env = provider.env_var("API_KEY");
        let api_key = section.api_key.or_else(|| env(&api_key_env)).ok_or_else(|| {
            ConfigError::NoApiKey { provider, path: self.path.clone(), env: api_key_env.clone() }
        })?;

        let model = overrides
            .model
            .map(str::to_string)
            .or(section.model)
            .or_else(|| env(&provider.env_var("MODEL")))
            .unwrap_or_else(|| provider.default_model().to_string());

        debug!(%provider, %model, "resolved chat settings");
        Ok(ChatSettings {
            provider,
            api_key,
            model,
            base_url: section.base_url,
            max_tokens: section.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(text: &str) -> Config {
        Config::from_toml(Path::new("/tmp/vibes/config.toml"), text).unwrap()
    }

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn file_settings_win_over_environment() {
        let config = config(
            r#"
            provider = "anthropic"

            [providers.anthropic]
            api_key = "file-key"
            model = "file-model"
            "#,
        );
        let env = env_of(&[
            ("VIBES_PROVIDER", "openai"),
            ("ANTHROPIC_API_KEY", "env-key"),
            ("ANTHROPIC_MODEL", "env-model"),
        ]);

        let settings = config.chat_settings_with(Overrides::default(), env).unwrap();
        assert_eq!(settings.provider, Provider::Anthropic);
        assert_eq!(settings.api_key, "file-key");
        assert_eq!(settings.model, "file-model");
        assert_eq!(settings.max_tokens, DEFAULT_MAX_TOKENS);
    }

    #[test]
    fn environment_fills_gaps_and_default_model_applies() {
        let config = config("");
        let env = env_of(&[("VIBES_PROVIDER", "google"), ("GOOGLE_API_KEY", "g-key")]);

        let settings = config.chat_settings_with(Overrides::default(), env).unwrap();
        assert_eq!(settings.provider, Provider::Google);
        assert_eq!(settings.api_key, "g-key");
        assert_eq!(settings.model, "gemini-2.5-pro");
    }

    #[test]
    fn command_line_overrides_win() {
        let config = config(
            r#"
            provider = "anthropic"
            [providers.openai]
            api_key = "o-key"
            model = "file-model"
            base_url = "http://localhost:9"
            max_tokens = 50
            "#,
        );
        let overrides = Overrides { provider: Some("OpenAI"), model: Some("cli-model") };

        let settings = config.chat_settings_with(overrides, env_of(&[])).unwrap();
        assert_eq!(settings.provider, Provider::OpenAi);
        assert_eq!(settings.model, "cli-model");
        assert_eq!(settings.base_url.as_deref(), Some("http://localhost:9"));
        assert_eq!(settings.max_tokens, 50);
    }

    #[test]
    fn missing_provider_names_file_and_variable() {
        let err = config("").chat_settings_with(Overrides::default(), env_of(&[])).unwrap_err();
        let message = err.to_string();
        assert!(matches!(err, ConfigError::NoProvider { .. }));
        assert!(message.contains("/tmp/vibes/config.toml"));
        assert!(message.contains("VIBES_PROVIDER"));
    }

    #[test]
    fn missing_api_key_names_variable() {
        let err = config("provider = \"openai\"")
            .chat_settings_with(Overrides::default(), env_of(&[("OPENAI_API_KEY", "  ")]))
            .unwrap_err();
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn unknown_provider_is_rejected() {
        let err = config("provider = \"mistral\"")
            .chat_settings_with(Overrides::default(), env_of(&[]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownProvider { ref name } if name == "mistral"));
    }

    #[test]
    fn invalid_toml_is_a_parse_error() {
        let err = Config::from_toml(Path::new("c.toml"), "provider = [").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn missing_file_is_empty_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert!(config.file.provider.is_none());
        assert_eq!(config.path(), dir.path().join("absent.toml"));
    }
}
