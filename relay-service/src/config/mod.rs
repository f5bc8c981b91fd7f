use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

/// Default base URL of the generative-language API.
const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default text model.
const DEFAULT_TEXT_MODEL: &str = "gemini-1.5-flash";

#[derive(Debug, Clone, Deserialize)]
pub struct RelayConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub gemini: GeminiSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeminiSettings {
    pub api_key: String,
    pub model: String,
    pub api_base: String,
}

impl RelayConfig {
    pub fn load() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        Ok(RelayConfig {
            common,
            gemini: GeminiSettings {
                // A missing key is only detected when the upstream call fails.
                api_key: env::var("GEMINI_API_KEY").unwrap_or_default(),
                model: get_env("RELAY_TEXT_MODEL", Some(DEFAULT_TEXT_MODEL), is_prod)?,
                api_base: get_env("GEMINI_API_BASE", Some(DEFAULT_API_BASE), is_prod)?,
            },
        })
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}
