//! Typed configuration loaded from environment variables.
//! Only `DISCORD_TOKEN` is required; everything else has a sensible default.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Errors raised while building the configuration at startup.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
}

/// Deployment environment, used to pick log verbosity defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

#[derive(Clone)]
pub struct Config {
    pub discord_token: String,
    pub owner_ids: Vec<u64>,
    pub prefix: String,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub w2g_api_key: Option<String>,
    pub environment: Environment,
    pub debug: bool,
    pub database_path: PathBuf,
    pub system_prompt_path: PathBuf,
    pub confirm_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::build()
    }

    fn build() -> Result<Self, ConfigError> {
        Ok(Config {
            discord_token: env::var("DISCORD_TOKEN")
                .map_err(|_| ConfigError::Missing("DISCORD_TOKEN"))?,
            owner_ids: parse_owner_ids(&env::var("OWNER_IDS").unwrap_or_default()),
            prefix: env::var("COMMAND_PREFIX").unwrap_or_else(|_| "!".to_string()),
            gemini_api_key: env::var("GEMINI_API_KEY").ok().filter(|k| !k.is_empty()),
            gemini_model: env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| "gemini-2.0-flash".to_string()),
            w2g_api_key: env::var("W2G_API_KEY").ok().filter(|k| !k.is_empty()),
            environment: parse_environment(
                &env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            ),
            debug: env::var("DEBUG")
                .map(|v| v.parse().unwrap_or(false))
                .unwrap_or(false),
            database_path: env::var("DATABASE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data/bot.db")),
            system_prompt_path: env::var("SYSTEM_PROMPT_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data/system_prompt.txt")),
            confirm_timeout: Duration::from_secs(
                env::var("CONFIRM_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(30),
            ),
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    pub fn is_owner(&self, user_id: u64) -> bool {
        self.owner_ids.contains(&user_id)
    }
}

/// Parses a comma-separated list of Discord user ids. Entries that are not
/// valid u64s are skipped rather than failing startup.
fn parse_owner_ids(raw: &str) -> Vec<u64> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|s| s.parse().ok())
        .collect()
}

fn parse_environment(raw: &str) -> Environment {
    if raw.eq_ignore_ascii_case("production") {
        Environment::Production
    } else {
        Environment::Development
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("discord_token", &"[REDACTED]")
            .field("owner_ids", &self.owner_ids)
            .field("prefix", &self.prefix)
            .field(
                "gemini_api_key",
                &self.gemini_api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("gemini_model", &self.gemini_model)
            .field(
                "w2g_api_key",
                &self.w2g_api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("environment", &self.environment)
            .field("debug", &self.debug)
            .field("database_path", &self.database_path)
            .field("system_prompt_path", &self.system_prompt_path)
            .field("confirm_timeout", &self.confirm_timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_config() -> Config {
        Config {
            discord_token: "super-secret-token".to_string(),
            owner_ids: vec![42],
            prefix: "!".to_string(),
            gemini_api_key: Some("super-secret-key".to_string()),
            gemini_model: "gemini-2.0-flash".to_string(),
            w2g_api_key: None,
            environment: Environment::Development,
            debug: false,
            database_path: PathBuf::from("data/bot.db"),
            system_prompt_path: PathBuf::from("data/system_prompt.txt"),
            confirm_timeout: Duration::from_secs(30),
        }
    }

    #[test]
    fn owner_ids_parse_from_comma_separated_list() {
        assert_eq!(parse_owner_ids("1,2, 3"), vec![1, 2, 3]);
        assert_eq!(parse_owner_ids(""), Vec::<u64>::new());
        // Junk entries are dropped, valid ones kept.
        assert_eq!(parse_owner_ids("7,abc, ,9"), vec![7, 9]);
    }

    #[test]
    fn environment_parses_case_insensitively() {
        assert_eq!(parse_environment("PRODUCTION"), Environment::Production);
        assert_eq!(parse_environment("development"), Environment::Development);
        assert_eq!(parse_environment("staging"), Environment::Development);
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let config = sample_config();
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("super-secret-token"));
        assert!(!rendered.contains("super-secret-key"));
        assert!(rendered.contains("[REDACTED]"));
    }

    #[test]
    fn owner_check_matches_configured_ids() {
        let config = sample_config();
        assert!(config.is_owner(42));
        assert!(!config.is_owner(43));
    }
}
