//! Process configuration — the credential guard and provider overrides.
//!
//! Everything is read once at startup. Nothing here writes back into the
//! process environment: the secondary provider key is carried as a plain
//! field instead.

use std::fmt;
use std::time::Duration;

use tracing::debug;

use crate::constants::{
    DEFAULT_GROQ_BASE_URL, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS, GROQ_API_KEY_VAR,
    GROQ_BASE_URL_VAR, GROQ_MODEL_VAR, OPENAI_API_KEY_VAR, OPENAI_KEY_PLACEHOLDER, TIMEOUT_VAR,
};
use crate::error::{CrewError, Result};
use crate::util::{env_first, mask_key};

/// Resolved runtime settings.
#[derive(Clone)]
pub struct Settings {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
    /// Secondary provider key; the placeholder when the caller did not set one.
    /// Only recorded for diagnostics: no request ever sends it.
    pub fallback_openai_key: String,
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("api_key", &mask_key(&self.api_key))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("fallback_openai_key", &mask_key(&self.fallback_openai_key))
            .finish()
    }
}

impl Settings {
    /// Load settings from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env_first(&[key]))
    }

    /// Load settings through an arbitrary lookup; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let api_key = get(GROQ_API_KEY_VAR).ok_or_else(|| {
            CrewError::Config(format!("{GROQ_API_KEY_VAR} environment variable is required"))
        })?;

        let model = get(GROQ_MODEL_VAR).unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let base_url = get(GROQ_BASE_URL_VAR)
            .unwrap_or_else(|| DEFAULT_GROQ_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let timeout_secs = match get(TIMEOUT_VAR) {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                CrewError::Config(format!("{TIMEOUT_VAR} must be a whole number of seconds, got {raw:?}"))
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let fallback_openai_key =
            get(OPENAI_API_KEY_VAR).unwrap_or_else(|| OPENAI_KEY_PLACEHOLDER.to_string());

        let settings = Settings {
            api_key: api_key.trim().to_string(),
            model,
            base_url,
            timeout: Duration::from_secs(timeout_secs),
            fallback_openai_key,
        };
        debug!(?settings, "settings loaded");
        Ok(settings)
    }
}
