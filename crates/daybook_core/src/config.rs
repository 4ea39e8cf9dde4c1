//! Environment-driven application configuration.
//!
//! | Env | Default |
//! |-----|---------|
//! | DAYBOOK_DATA_DIR | `./.daybook` |
//! | DAYBOOK_LOG_LEVEL | `debug` (debug builds) / `info` (release) |
//! | DAYBOOK_GEMINI_API_KEY or GEMINI_API_KEY | unset |
//! | DAYBOOK_GEMINI_MODELS | built-in Gemini list |
//! | DAYBOOK_OPENAI_API_KEY or OPENAI_API_KEY | unset |
//! | DAYBOOK_OPENAI_BASE_URL | `https://api.openai.com/v1` |
//! | DAYBOOK_OPENAI_MODELS | built-in OpenAI list |
//! | DAYBOOK_HTTP_TIMEOUT_SECS | 60 |
//! | DAYBOOK_FOCUS_MINUTES / DAYBOOK_SHORT_BREAK_MINUTES / DAYBOOK_LONG_BREAK_MINUTES | 25 / 5 / 15 |
//! | DAYBOOK_LONG_BREAK_EVERY | 4 |
//!
//! Blank values count as unset; unparsable numbers fall back to defaults.

use crate::assistant::provider::{ProviderConfig, OPENAI_BASE_URL};
use crate::logging::default_log_level;
use crate::timer::TimerDurations;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_DATA_DIR: &str = ".daybook";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 60;
pub const DATABASE_FILE_NAME: &str = "daybook.sqlite3";
pub const LOG_DIR_NAME: &str = "logs";

#[derive(Debug)]
pub enum ConfigError {
    DataDir { path: PathBuf, source: std::io::Error },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DataDir { path, source } => {
                write!(f, "cannot prepare data directory `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::DataDir { source, .. } => Some(source),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AssistantConfig {
    /// Providers in fallback order. Only providers with a key are listed.
    pub providers: Vec<ProviderConfig>,
    pub http_timeout: Duration,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            providers: Vec::new(),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub log_level: String,
    pub assistant: AssistantConfig,
    pub timer: TimerDurations,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            log_level: default_log_level().to_string(),
            assistant: AssistantConfig::default(),
            timer: TimerDurations::default(),
        }
    }
}

impl AppConfig {
    /// Reads configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds configuration from any name -> value lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let defaults = Self::default();

        let mut providers = Vec::new();
        if let Some(key) = get("DAYBOOK_GEMINI_API_KEY").or_else(|| get("GEMINI_API_KEY")) {
            let models = get("DAYBOOK_GEMINI_MODELS").map_or_else(Vec::new, |raw| parse_list(&raw));
            providers.push(ProviderConfig::gemini(key).with_models(models));
        }
        if let Some(key) = get("DAYBOOK_OPENAI_API_KEY").or_else(|| get("OPENAI_API_KEY")) {
            let models = get("DAYBOOK_OPENAI_MODELS").map_or_else(Vec::new, |raw| parse_list(&raw));
            let base_url = get("DAYBOOK_OPENAI_BASE_URL").unwrap_or_else(|| OPENAI_BASE_URL.to_string());
            providers.push(
                ProviderConfig::openai(key)
                    .with_base_url(base_url)
                    .with_models(models),
            );
        }

        let timer = TimerDurations {
            focus_minutes: parse_positive(get("DAYBOOK_FOCUS_MINUTES"), defaults.timer.focus_minutes),
            short_break_minutes: parse_positive(
                get("DAYBOOK_SHORT_BREAK_MINUTES"),
                defaults.timer.short_break_minutes,
            ),
            long_break_minutes: parse_positive(
                get("DAYBOOK_LONG_BREAK_MINUTES"),
                defaults.timer.long_break_minutes,
            ),
            long_break_every: parse_positive(
                get("DAYBOOK_LONG_BREAK_EVERY"),
                defaults.timer.long_break_every,
            ),
        };

        Self {
            data_dir: get("DAYBOOK_DATA_DIR").map_or(defaults.data_dir, PathBuf::from),
            log_level: get("DAYBOOK_LOG_LEVEL").unwrap_or(defaults.log_level),
            assistant: AssistantConfig {
                providers,
                http_timeout: Duration::from_secs(parse_positive(
                    get("DAYBOOK_HTTP_TIMEOUT_SECS"),
                    DEFAULT_HTTP_TIMEOUT_SECS,
                )),
            },
            timer,
        }
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(DATABASE_FILE_NAME)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join(LOG_DIR_NAME)
    }

    /// Creates the data directory when missing.
    pub fn ensure_data_dir(&self) -> Result<&Path, ConfigError> {
        std::fs::create_dir_all(&self.data_dir).map_err(|source| ConfigError::DataDir {
            path: self.data_dir.clone(),
            source,
        })?;
        Ok(&self.data_dir)
    }
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_positive<T>(raw: Option<String>, default: T) -> T
where
    T: std::str::FromStr + PartialOrd + Default,
{
    raw.and_then(|value| value.parse::<T>().ok())
        .filter(|value| *value > T::default())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::AppConfig;
    use crate::assistant::provider::ProviderKind;
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn config(vars: &[(&str, &str)]) -> AppConfig {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = config(&[]);
        assert_eq!(config.data_dir, PathBuf::from(".daybook"));
        assert!(config.assistant.providers.is_empty());
        assert_eq!(config.assistant.http_timeout.as_secs(), 60);
        assert_eq!(config.timer.focus_minutes, 25);
        assert_eq!(config.timer.long_break_every, 4);
    }

    #[test]
    fn providers_follow_key_presence_in_fixed_order() {
        let config = config(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("DAYBOOK_OPENAI_MODELS", "local-a, ,local-b"),
            ("DAYBOOK_OPENAI_BASE_URL", "http://localhost:11434/v1"),
            ("DAYBOOK_GEMINI_API_KEY", "g-test"),
        ]);
        let kinds: Vec<ProviderKind> = config.assistant.providers.iter().map(|p| p.kind).collect();
        assert_eq!(kinds, vec![ProviderKind::Gemini, ProviderKind::OpenAi]);
        let openai = &config.assistant.providers[1];
        assert_eq!(openai.models, vec!["local-a".to_string(), "local-b".to_string()]);
        assert_eq!(openai.base_url, "http://localhost:11434/v1");
    }

    #[test]
    fn blank_keys_and_bad_numbers_fall_back() {
        let config = config(&[
            ("GEMINI_API_KEY", "   "),
            ("DAYBOOK_FOCUS_MINUTES", "abc"),
            ("DAYBOOK_LONG_BREAK_EVERY", "0"),
            ("DAYBOOK_SHORT_BREAK_MINUTES", "10"),
        ]);
        assert!(config.assistant.providers.is_empty());
        assert_eq!(config.timer.focus_minutes, 25);
        assert_eq!(config.timer.long_break_every, 4);
        assert_eq!(config.timer.short_break_minutes, 10);
    }
}
