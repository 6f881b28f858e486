use anyhow::{Context, Result, anyhow};
use std::path::Path;

use chat_argparse::coerce::parse_reference;

pub const DEFAULT_PREFIX: &str = "!";

/// Bot settings read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// `BOT_PREFIX`: text every command message starts with.
    pub prefix: String,
    /// `MOD_CATEGORY_ID`: category new tickets are opened in.
    pub category_id: Option<String>,
    /// `LOG_CHANNEL_ID`: channel that receives close notices.
    pub log_channel_id: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            category_id: None,
            log_channel_id: None,
        }
    }
}

impl Config {
    /// Load `env_file` (or `.env` when present) into the process environment,
    /// then read the settings.
    pub fn load(env_file: Option<&Path>) -> Result<Self> {
        match env_file {
            Some(path) => {
                dotenvy::from_path(path)
                    .with_context(|| format!("failed to load env file: {}", path.display()))?;
            }
            None => {
                if let Err(e) = dotenvy::dotenv() {
                    if !e.not_found() {
                        return Err(e).context("failed to load .env");
                    }
                }
            }
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Ok(Self {
            prefix: get("BOT_PREFIX").unwrap_or_else(|| DEFAULT_PREFIX.to_string()),
            category_id: get("MOD_CATEGORY_ID")
                .map(|v| snowflake("MOD_CATEGORY_ID", &v))
                .transpose()?,
            log_channel_id: get("LOG_CHANNEL_ID")
                .map(|v| snowflake("LOG_CHANNEL_ID", &v))
                .transpose()?,
        })
    }
}

fn snowflake(key: &str, value: &str) -> Result<String> {
    parse_reference(value)
        .map(str::to_string)
        .ok_or_else(|| anyhow!("{key} is not a valid id: {value}"))
}
