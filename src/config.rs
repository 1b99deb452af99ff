use std::collections::HashMap;
use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::commands::OutputMode;
use crate::llm::provider::{Provider, ProviderError};

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-pro-latest";
pub const DEFAULT_ARLI_MODEL: &str = "Gemma-3-27B-ArliAI-RPMax-v3";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";

pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_ARLI_API_BASE: &str = "https://api.arliai.com/v1";
pub const DEFAULT_OPENAI_API_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_RADIO_BROWSER_API_BASE: &str = "https://de1.api.radio-browser.info";

/// Credentials and endpoint for one LLM provider.
///
/// `Debug` output never contains the key itself.
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderSettings {
    pub api_key: Option<String>,
    pub model: String,
    pub api_base: String,
}

impl ProviderSettings {
    pub fn new(model: impl Into<String>, api_base: impl Into<String>) -> Self {
        Self {
            api_key: None,
            model: model.into(),
            api_base: api_base.into(),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = non_blank(Some(api_key.into()));
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Returns the key, or the configuration error for `provider` when unset.
    pub fn require_api_key(&self, provider: Provider) -> Result<&str, ProviderError> {
        self.api_key
            .as_deref()
            .ok_or(ProviderError::MissingApiKey {
                provider,
                key_env: provider.api_key_env(),
            })
    }

    /// Base URL without a trailing slash, ready for path joining.
    pub fn base(&self) -> &str {
        self.api_base.trim_end_matches('/')
    }
}

impl fmt::Debug for ProviderSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderSettings")
            .field("api_key_present", &self.has_api_key())
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RadioSettings {
    pub api_base: String,
    pub user_agent: String,
}

impl Default for RadioSettings {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_RADIO_BROWSER_API_BASE.to_string(),
            user_agent: format!("airwaves/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Process-wide settings, resolved once at startup and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub gemini: ProviderSettings,
    pub arli: ProviderSettings,
    pub openai: ProviderSettings,
    pub radio: RadioSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            gemini: ProviderSettings::new(DEFAULT_GEMINI_MODEL, DEFAULT_GEMINI_API_BASE),
            arli: ProviderSettings::new(DEFAULT_ARLI_MODEL, DEFAULT_ARLI_API_BASE),
            openai: ProviderSettings::new(DEFAULT_OPENAI_MODEL, DEFAULT_OPENAI_API_BASE),
            radio: RadioSettings::default(),
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds settings from an arbitrary variable source. Blank values count
    /// as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| non_blank(lookup(key));
        let defaults = Self::default();

        let provider = |base: ProviderSettings, key: Option<String>, model: &str, api_base: &str| {
            ProviderSettings {
                api_key: key,
                model: var(model).unwrap_or(base.model),
                api_base: var(api_base).unwrap_or(base.api_base),
            }
        };

        Self {
            gemini: provider(
                defaults.gemini,
                var("GEMINI_API_KEY").or_else(|| var("GOOGLE_API_KEY")),
                "GEMINI_MODEL",
                "GEMINI_API_BASE",
            ),
            arli: provider(
                defaults.arli,
                var("ARLI_API_KEY"),
                "ARLI_MODEL",
                "ARLI_API_BASE",
            ),
            openai: provider(
                defaults.openai,
                var("OPENAI_API_KEY"),
                "OPENAI_MODEL",
                "OPENAI_API_BASE",
            ),
            radio: RadioSettings {
                api_base: var("RADIO_BROWSER_API_BASE").unwrap_or(defaults.radio.api_base),
                user_agent: defaults.radio.user_agent,
            },
        }
    }

    pub fn provider(&self, provider: Provider) -> &ProviderSettings {
        match provider {
            Provider::Gemini => &self.gemini,
            Provider::Arli => &self.arli,
            Provider::Openai => &self.openai,
        }
    }

    pub fn provider_mut(&mut self, provider: Provider) -> &mut ProviderSettings {
        match provider {
            Provider::Gemini => &mut self.gemini,
            Provider::Arli => &mut self.arli,
            Provider::Openai => &mut self.openai,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
pub struct ProfileConfig {
    pub provider: Option<String>,
    pub model: Option<String>,
    pub output: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct ConfigFile {
    profiles: Option<HashMap<String, ProfileConfig>>,
}

pub fn load_profile(name: &str) -> Result<ProfileConfig, String> {
    let path = config_path()?;
    let config = read_config_file(&path)?;
    find_profile(&config, name, &path)
}

/// Checks that the config file parses and that the named profile (if any)
/// holds valid values. Returns the path that was checked.
pub fn validate_config(profile: Option<&str>) -> Result<PathBuf, String> {
    let path = config_path()?;
    let config = read_config_file(&path)?;

    let profiles: Vec<(String, ProfileConfig)> = match profile {
        Some(name) => vec![(name.to_string(), find_profile(&config, name, &path)?)],
        None => config.profiles.unwrap_or_default().into_iter().collect(),
    };

    for (name, profile) in &profiles {
        validate_profile(name, profile)?;
    }

    Ok(path)
}

pub fn validate_profile(name: &str, profile: &ProfileConfig) -> Result<(), String> {
    if let Some(provider) = profile.provider.as_deref() {
        provider.parse::<Provider>().map_err(|_| {
            format!(
                "Invalid profile provider '{provider}' in profile '{name}'. Supported values: {}.",
                Provider::supported_values()
            )
        })?;
    }
    if let Some(output) = profile.output.as_deref() {
        OutputMode::parse(output).ok_or_else(|| {
            format!("Invalid profile output '{output}' in profile '{name}'. Supported values: text, json.")
        })?;
    }
    Ok(())
}

fn read_config_file(path: &Path) -> Result<ConfigFile, String> {
    let raw = fs::read_to_string(path)
        .map_err(|err| format!("Failed to read config file '{}': {err}", path.display()))?;

    toml::from_str(&raw)
        .map_err(|err| format!("Failed to parse config file '{}': {err}", path.display()))
}

fn find_profile(config: &ConfigFile, name: &str, path: &Path) -> Result<ProfileConfig, String> {
    let profiles = config.profiles.as_ref().ok_or_else(|| {
        format!(
            "Config file '{}' does not contain a [profiles] section.",
            path.display()
        )
    })?;

    profiles.get(name).cloned().ok_or_else(|| {
        format!(
            "Profile '{}' not found in config file '{}'.",
            name,
            path.display()
        )
    })
}

pub fn config_path() -> Result<PathBuf, String> {
    if let Some(path) = non_blank(env::var("AIRWAVES_CONFIG").ok()) {
        return Ok(PathBuf::from(path));
    }

    if let Some(xdg) = non_blank(env::var("XDG_CONFIG_HOME").ok()) {
        return Ok(PathBuf::from(xdg).join("airwaves").join("config.toml"));
    }

    let home = env::var("HOME").map_err(|_| {
        "Cannot resolve config path: set AIRWAVES_CONFIG or HOME/XDG_CONFIG_HOME.".to_string()
    })?;
    Ok(PathBuf::from(home)
        .join(".config")
        .join("airwaves")
        .join("config.toml"))
}
