use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use tracing::info;

use crate::error::{JotError, Result};

const DEFAULT_SPELLER_URL: &str =
    "https://speller.yandex.net/services/spellservice.json/checkText";

/// Runtime configuration, loaded from the environment.
///
/// Every value has a default so the server starts with no configuration at
/// all; an unparsable value fails startup instead of being silently
/// replaced.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port to listen on (`JOTD_PORT`).
    pub port: u16,
    /// Directory holding `users.json` and `notes.json` (`JOTD_DATA_DIR`).
    pub data_dir: PathBuf,
    /// Spell-check endpoint (`JOTD_SPELLER_URL`).
    pub speller_url: String,
    /// Per-request spell-check timeout (`JOTD_SPELLER_TIMEOUT_MS`).
    pub speller_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8000,
            data_dir: PathBuf::from("."),
            speller_url: DEFAULT_SPELLER_URL.to_string(),
            speller_timeout: Duration::from_millis(3000),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            port: try_parse("JOTD_PORT", 8000)?,
            data_dir: PathBuf::from(var_or("JOTD_DATA_DIR", ".")),
            speller_url: var_or("JOTD_SPELLER_URL", DEFAULT_SPELLER_URL),
            speller_timeout: Duration::from_millis(try_parse("JOTD_SPELLER_TIMEOUT_MS", 3000)?),
        })
    }
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    })
}

fn try_parse<T: FromStr>(key: &str, default: T) -> Result<T>
where
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| JotError::InvalidInput(format!("invalid {key}: {e}"))),
        Err(_) => {
            info!("{key} not set, using default");
            Ok(default)
        }
    }
}
