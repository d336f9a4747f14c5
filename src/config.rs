//! Runtime configuration from the process environment
//!
//! Every provider key is optional. A missing key disables that feature
//! instead of failing startup.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "openai/gpt-oss-120b";
pub const DEFAULT_PORT: u16 = 8000;
const DEFAULT_LOOKUP_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub groq_api_key: Option<String>,
    pub openweather_api_key: Option<String>,
    pub unsplash_api_key: Option<String>,
    pub model: String,
    pub llm_base_url: String,
    pub weather_base_url: String,
    pub unsplash_base_url: String,
    pub port: u16,
    pub export_dir: PathBuf,
    pub lookup_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            groq_api_key: None,
            openweather_api_key: None,
            unsplash_api_key: None,
            model: DEFAULT_MODEL.to_string(),
            llm_base_url: crate::llm::DEFAULT_BASE_URL.to_string(),
            weather_base_url: crate::weather::DEFAULT_BASE_URL.to_string(),
            unsplash_base_url: crate::images::DEFAULT_BASE_URL.to_string(),
            port: DEFAULT_PORT,
            export_dir: std::env::temp_dir().join("planova-exports"),
            lookup_timeout: Duration::from_secs(DEFAULT_LOOKUP_TIMEOUT_SECS),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source. Empty values count as unset.
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        let var = |name: &str| var(name).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        Self {
            groq_api_key: var("GROQ_API_KEY"),
            openweather_api_key: var("OPENWEATHER_API_KEY"),
            unsplash_api_key: var("UNSPLASH_ACCESS_KEY"),
            model: var("PLANOVA_MODEL").unwrap_or(defaults.model),
            llm_base_url: var("LLM_BASE_URL").unwrap_or(defaults.llm_base_url),
            weather_base_url: var("OPENWEATHER_BASE_URL")
                .unwrap_or(defaults.weather_base_url),
            unsplash_base_url: var("UNSPLASH_BASE_URL")
                .unwrap_or(defaults.unsplash_base_url),
            port: var("PLANOVA_PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            export_dir: var("PLANOVA_EXPORT_DIR")
                .map_or(defaults.export_dir, PathBuf::from),
            lookup_timeout: var("PLANOVA_HTTP_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .map_or(defaults.lookup_timeout, Duration::from_secs),
        }
    }
}
