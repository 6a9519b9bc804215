use crate::error::{CompanionError, Result};
use std::env;
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;
const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone)]
pub struct GeminiSettings {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub temperature: Option<f32>,
    pub max_output_tokens: Option<u32>,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub gemini: GeminiSettings,
    pub bind_addr: String,
    pub max_upload_bytes: usize,
}

impl Settings {
    /// Reads the process environment. `.env` loading is left to the binary.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let api_key = get("GOOGLE_API_KEY")
            .or_else(|| get("GEMINI_API_KEY"))
            .ok_or_else(|| {
                CompanionError::Config(
                    "GOOGLE_API_KEY or GEMINI_API_KEY environment variable not set".to_string(),
                )
            })?;

        let temperature = parse_opt::<f32>("GEMINI_TEMPERATURE", get("GEMINI_TEMPERATURE"))?;
        let max_output_tokens =
            parse_opt::<u32>("GEMINI_MAX_OUTPUT_TOKENS", get("GEMINI_MAX_OUTPUT_TOKENS"))?;
        let timeout_secs = parse_opt::<u64>("GEMINI_TIMEOUT_SECS", get("GEMINI_TIMEOUT_SECS"))?
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        let max_upload_bytes = parse_opt::<usize>("MAX_UPLOAD_BYTES", get("MAX_UPLOAD_BYTES"))?
            .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES);

        Ok(Self {
            gemini: GeminiSettings {
                api_key,
                model: get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                base_url: get("GEMINI_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                    .trim_end_matches('/')
                    .to_string(),
                temperature,
                max_output_tokens,
                timeout: Duration::from_secs(timeout_secs),
            },
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            max_upload_bytes,
        })
    }
}

fn parse_opt<T: std::str::FromStr>(key: &str, raw: Option<String>) -> Result<Option<T>> {
    match raw {
        None => Ok(None),
        Some(value) => value
            .parse::<T>()
            .map(Some)
            .map_err(|_| CompanionError::Config(format!("{key} has an invalid value: {value}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> Result<Settings> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_only_key_is_set() {
        let s = settings(&[("GEMINI_API_KEY", "abc")]).unwrap();
        assert_eq!(s.gemini.api_key, "abc");
        assert_eq!(s.gemini.model, DEFAULT_MODEL);
        assert_eq!(s.gemini.base_url, DEFAULT_BASE_URL);
        assert_eq!(s.gemini.temperature, None);
        assert_eq!(s.gemini.timeout, Duration::from_secs(60));
        assert_eq!(s.bind_addr, DEFAULT_BIND_ADDR);
        assert_eq!(s.max_upload_bytes, DEFAULT_MAX_UPLOAD_BYTES);
    }

    #[test]
    fn google_key_wins_over_gemini_key() {
        let s = settings(&[("GOOGLE_API_KEY", "google"), ("GEMINI_API_KEY", "gemini")]).unwrap();
        assert_eq!(s.gemini.api_key, "google");
    }

    #[test]
    fn missing_key_is_a_config_error() {
        let err = settings(&[("GEMINI_API_KEY", "   ")]).unwrap_err();
        assert_eq!(err.kind(), "config");
    }

    #[test]
    fn overrides_are_parsed() {
        let s = settings(&[
            ("GEMINI_API_KEY", "k"),
            ("GEMINI_MODEL", "gemini-2.0-flash"),
            ("GEMINI_BASE_URL", "http://localhost:9000/v1/"),
            ("GEMINI_TEMPERATURE", "0.3"),
            ("GEMINI_MAX_OUTPUT_TOKENS", "1000"),
            ("MAX_UPLOAD_BYTES", "1024"),
        ])
        .unwrap();
        assert_eq!(s.gemini.model, "gemini-2.0-flash");
        assert_eq!(s.gemini.base_url, "http://localhost:9000/v1");
        assert_eq!(s.gemini.temperature, Some(0.3));
        assert_eq!(s.gemini.max_output_tokens, Some(1000));
        assert_eq!(s.max_upload_bytes, 1024);
    }

    #[test]
    fn bad_number_is_rejected() {
        let err = settings(&[("GEMINI_API_KEY", "k"), ("GEMINI_TIMEOUT_SECS", "soon")]).unwrap_err();
        assert!(err.to_string().contains("GEMINI_TIMEOUT_SECS"));
    }
}
