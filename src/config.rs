use anyhow::{Context, Result};
use std::{env, time::Duration};

pub const DEFAULT_SPREADSHEET_ID: &str = "1jYhSlvDi9_w23T1Oy6EOTQC0xVrTcuRZtYgw4a8N5bE";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";

/// Runtime settings, read from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub log_level: String,
    pub spreadsheet_id: String,
    pub sheet_gid: String,
    pub revalidate: Duration,
    pub fetch_retries: u32,
    /// Upper bound for one upstream request, connect through body.
    pub fetch_timeout: Duration,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_base_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            log_level: "info".into(),
            spreadsheet_id: DEFAULT_SPREADSHEET_ID.into(),
            sheet_gid: "0".into(),
            revalidate: Duration::from_secs(60),
            fetch_retries: 3,
            fetch_timeout: Duration::from_secs(10),
            openai_api_key: None,
            openai_model: DEFAULT_OPENAI_MODEL.into(),
            openai_base_url: DEFAULT_OPENAI_BASE_URL.into(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; unset or empty keys keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut cfg = Self::default();

        if let Some(v) = get("PORT") {
            cfg.port = v.trim().parse().with_context(|| format!("PORT={:?}", v))?;
        }
        if let Some(v) = get("LOG_LEVEL") {
            cfg.log_level = v;
        }
        if let Some(v) = get("SPREADSHEET_ID") {
            cfg.spreadsheet_id = v;
        }
        if let Some(v) = get("SHEET_GID") {
            cfg.sheet_gid = v;
        }
        if let Some(v) = get("REVALIDATE_SECS") {
            let secs: u64 = v
                .trim()
                .parse()
                .with_context(|| format!("REVALIDATE_SECS={:?}", v))?;
            cfg.revalidate = Duration::from_secs(secs);
        }
        if let Some(v) = get("FETCH_RETRIES") {
            cfg.fetch_retries = v
                .trim()
                .parse()
                .with_context(|| format!("FETCH_RETRIES={:?}", v))?;
        }
        if let Some(v) = get("FETCH_TIMEOUT_SECS") {
            let secs: u64 = v
                .trim()
                .parse()
                .with_context(|| format!("FETCH_TIMEOUT_SECS={:?}", v))?;
            cfg.fetch_timeout = Duration::from_secs(secs);
        }
        cfg.openai_api_key = get("OPENAI_API_KEY");
        if let Some(v) = get("OPENAI_MODEL") {
            cfg.openai_model = v;
        }
        if let Some(v) = get("OPENAI_BASE_URL") {
            cfg.openai_base_url = v;
        }

        Ok(cfg)
    }
}
