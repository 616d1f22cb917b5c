//! # API Configuration
//!
//! Server settings come from the process environment (after `.env` has been
//! loaded by the binary). Shop rules such as timezone, closed days and phone
//! country code are separate, see [`barbershop_core::settings::ShopSettings`].
//!
//! | variable | default |
//! |---|---|
//! | `API_HOST` | `0.0.0.0` |
//! | `API_PORT` | `3000` |
//! | `DATABASE_URL` | required |
//! | `LOG_LEVEL` | `info` |
//! | `API_CORS_ORIGINS` | unset, comma separated |
//! | `API_REQUEST_TIMEOUT_SECONDS` | `30` |

use eyre::{eyre, Result, WrapErr};
use tracing::Level;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Configuration for the booking API server
///
/// ```no_run
/// use barbershop_api::config::ApiConfig;
///
/// # fn main() -> eyre::Result<()> {
/// let config = ApiConfig::from_env()?;
/// println!("Starting server on {}", config.server_addr());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    /// PostgreSQL connection string
    pub database_url: String,
    pub log_level: Level,
    /// Allowed browser origins; `None` leaves CORS off
    pub cors_origins: Option<Vec<String>>,
    /// Per-request timeout in seconds
    pub request_timeout: u64,
}

impl ApiConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup.
    ///
    /// # Errors
    ///
    /// `DATABASE_URL` missing or blank, or a port or timeout that is not a
    /// number.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let database_url = value("DATABASE_URL")
            .ok_or_else(|| eyre!("DATABASE_URL environment variable must be set"))?;

        let port = match value("API_PORT") {
            Some(raw) => raw.parse().wrap_err_with(|| format!("Invalid API_PORT value: {}", raw))?,
            None => DEFAULT_PORT,
        };

        let request_timeout = match value("API_REQUEST_TIMEOUT_SECONDS") {
            Some(raw) => raw
                .parse()
                .wrap_err_with(|| format!("Invalid API_REQUEST_TIMEOUT_SECONDS value: {}", raw))?,
            None => DEFAULT_TIMEOUT_SECONDS,
        };

        Ok(Self {
            host: value("API_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            database_url,
            log_level: value("LOG_LEVEL")
                .map(|raw| parse_log_level(&raw))
                .unwrap_or(Level::INFO),
            cors_origins: value("API_CORS_ORIGINS")
                .map(|raw| parse_origins(&raw))
                .filter(|origins| !origins.is_empty()),
            request_timeout,
        })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Unknown names fall back to `INFO`.
fn parse_log_level(raw: &str) -> Level {
    raw.to_ascii_uppercase().parse().unwrap_or(Level::INFO)
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<ApiConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ApiConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_only_database_is_set() {
        let config = config(&[("DATABASE_URL", "postgres://localhost/barbershop")]).unwrap();

        assert_eq!(config.server_addr(), "0.0.0.0:3000");
        assert_eq!(config.log_level, Level::INFO);
        assert_eq!(config.cors_origins, None);
        assert_eq!(config.request_timeout, 30);
    }

    #[test]
    fn database_url_is_required() {
        assert!(config(&[]).is_err());
        assert!(config(&[("DATABASE_URL", "  ")]).is_err());
    }

    #[test]
    fn malformed_numbers_are_errors() {
        let db = ("DATABASE_URL", "postgres://localhost/barbershop");
        assert!(config(&[db, ("API_PORT", "eighty")]).is_err());
        assert!(config(&[db, ("API_REQUEST_TIMEOUT_SECONDS", "-1")]).is_err());
    }

    #[test]
    fn origins_skip_blanks() {
        let config = config(&[
            ("DATABASE_URL", "postgres://localhost/barbershop"),
            ("API_CORS_ORIGINS", "https://salon.example, ,http://localhost:5173"),
        ])
        .unwrap();

        assert_eq!(
            config.cors_origins,
            Some(vec!["https://salon.example".to_string(), "http://localhost:5173".to_string()])
        );
    }

    #[rstest]
    #[case("debug", Level::DEBUG)]
    #[case("WARN", Level::WARN)]
    #[case("verbose", Level::INFO)]
    fn log_level_falls_back_to_info(#[case] raw: &str, #[case] expected: Level) {
        assert_eq!(parse_log_level(raw), expected);
    }
}
