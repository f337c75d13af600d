use std::{net::SocketAddr, time::Duration};

use crate::core::errors::{AppError, AppResult};

pub const DEFAULT_MODEL: &str = "gemini-2.5-pro";
const DEFAULT_BIND: &str = "127.0.0.1:5000";
const DEFAULT_TIMEOUT_SECS: u64 = 120;
const DEFAULT_MAX_UPLOAD_MB: usize = 25;

/// Process-wide settings, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_key: String,
    pub model: String,
    pub bind_addr: SocketAddr,
    pub request_timeout: Duration,
    pub max_upload_bytes: usize,
    /// Names and acronyms the proofreader must leave alone.
    pub glossary: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let api_key = read("GOOGLE_API_KEY").ok_or_else(|| {
            AppError::Configuration("GOOGLE_API_KEY is not set".to_string())
        })?;

        let model = read("PROOFREAD_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let bind_raw = read("PROOFREAD_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind_addr = bind_raw.parse::<SocketAddr>().map_err(|err| {
            AppError::Configuration(format!("PROOFREAD_BIND `{bind_raw}` is invalid: {err}"))
        })?;

        let timeout_secs = match read("PROOFREAD_TIMEOUT_SECS") {
            Some(raw) => raw.parse::<u64>().map_err(|err| {
                AppError::Configuration(format!("PROOFREAD_TIMEOUT_SECS `{raw}` is invalid: {err}"))
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let max_upload_mb = match read("PROOFREAD_MAX_UPLOAD_MB") {
            Some(raw) => raw.parse::<usize>().map_err(|err| {
                AppError::Configuration(format!("PROOFREAD_MAX_UPLOAD_MB `{raw}` is invalid: {err}"))
            })?,
            None => DEFAULT_MAX_UPLOAD_MB,
        };

        let glossary = read("PROOFREAD_GLOSSARY")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|term| !term.is_empty())
                    .map(ToString::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            api_key,
            model,
            bind_addr,
            request_timeout: Duration::from_secs(timeout_secs.max(1)),
            max_upload_bytes: max_upload_mb.max(1) * 1024 * 1024,
            glossary,
        })
    }
}

pub fn log_filter_from_env() -> String {
    std::env::var("PROOFREAD_LOG")
        .ok()
        .map(|value| value.trim().to_ascii_lowercase())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| "info".to_string())
}
