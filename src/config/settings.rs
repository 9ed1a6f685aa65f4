//! Application settings loaded from the environment.

use std::fmt;
use std::time::Duration;

/// Environment variable holding the bot token.
pub const TOKEN_ENV_VAR: &str = "TGBOT_TOKEN";

/// Bot configuration.
#[derive(Clone)]
pub struct BotSettings {
    /// Telegram Bot API token (obtain from `@BotFather`).
    pub bot_token: String,

    /// Base URL of the Telegram Bot API.
    pub telegram_api_url: String,

    /// Base URL of the quotes API; the pair id is appended as a path segment.
    pub quotes_api_url: String,

    /// Long-polling timeout for `getUpdates` in seconds.
    pub poll_timeout_secs: u64,

    /// Delay before polling again after a failed `getUpdates` call.
    pub poll_retry_delay_secs: u64,
}

fn default_telegram_api_url() -> String {
    "https://api.telegram.org".to_owned()
}

fn default_quotes_api_url() -> String {
    "https://economia.awesomeapi.com.br/json/last".to_owned()
}

fn default_poll_timeout() -> u64 {
    60
}

fn default_poll_retry_delay() -> u64 {
    3
}

impl BotSettings {
    /// Creates settings with the given token and default endpoints.
    #[must_use]
    pub fn new(bot_token: String) -> Self {
        Self {
            bot_token,
            telegram_api_url: default_telegram_api_url(),
            quotes_api_url: default_quotes_api_url(),
            poll_timeout_secs: default_poll_timeout(),
            poll_retry_delay_secs: default_poll_retry_delay(),
        }
    }

    /// Creates settings from environment variables.
    ///
    /// Expects `TGBOT_TOKEN` to be set. `TELEGRAM_API_URL`, `QUOTES_API_URL`,
    /// `POLL_TIMEOUT_SECS` and `POLL_RETRY_DELAY_SECS` are optional.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is missing or blank.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from an arbitrary variable lookup.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bot_token = lookup(TOKEN_ENV_VAR)
            .map(|t| t.trim().to_owned())
            .filter(|t| !t.is_empty())
            .ok_or(ConfigError::MissingEnvVar(TOKEN_ENV_VAR))?;

        Ok(Self {
            bot_token,
            telegram_api_url: lookup("TELEGRAM_API_URL")
                .map_or_else(default_telegram_api_url, |u| trim_url(&u)),
            quotes_api_url: lookup("QUOTES_API_URL")
                .map_or_else(default_quotes_api_url, |u| trim_url(&u)),
            poll_timeout_secs: lookup("POLL_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(default_poll_timeout),
            poll_retry_delay_secs: lookup("POLL_RETRY_DELAY_SECS")
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(default_poll_retry_delay),
        })
    }

    /// Returns the poll retry delay as a `Duration`.
    #[must_use]
    pub const fn poll_retry_delay(&self) -> Duration {
        Duration::from_secs(self.poll_retry_delay_secs)
    }
}

impl fmt::Debug for BotSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotSettings")
            .field("bot_token", &mask_token(&self.bot_token))
            .field("telegram_api_url", &self.telegram_api_url)
            .field("quotes_api_url", &self.quotes_api_url)
            .field("poll_timeout_secs", &self.poll_timeout_secs)
            .field("poll_retry_delay_secs", &self.poll_retry_delay_secs)
            .finish()
    }
}

/// Masks a bot token for logging (keeps the numeric bot id only).
#[must_use]
pub fn mask_token(token: &str) -> String {
    match token.split_once(':') {
        Some((bot_id, _)) if !bot_id.is_empty() => format!("{bot_id}:***"),
        _ => "***".to_owned(),
    }
}

fn trim_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_owned()
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(&'static str),
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_new_uses_defaults() {
        let settings = BotSettings::new("123:abc".to_owned());
        assert_eq!(settings.telegram_api_url, "https://api.telegram.org");
        assert_eq!(
            settings.quotes_api_url,
            "https://economia.awesomeapi.com.br/json/last"
        );
        assert_eq!(settings.poll_timeout_secs, 60);
        assert_eq!(settings.poll_retry_delay(), Duration::from_secs(3));
    }

    #[test]
    fn test_missing_token() {
        let result = BotSettings::from_lookup(lookup_from(&[]));
        assert!(matches!(result, Err(ConfigError::MissingEnvVar("TGBOT_TOKEN"))));
    }

    #[test]
    fn test_blank_token_is_missing() {
        let result = BotSettings::from_lookup(lookup_from(&[("TGBOT_TOKEN", "   ")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_overrides() {
        let settings = BotSettings::from_lookup(lookup_from(&[
            ("TGBOT_TOKEN", "42:secret"),
            ("QUOTES_API_URL", "http://localhost:8080/json/last/"),
            ("POLL_TIMEOUT_SECS", "10"),
            ("POLL_RETRY_DELAY_SECS", "not a number"),
        ]))
        .unwrap();

        assert_eq!(settings.bot_token, "42:secret");
        assert_eq!(settings.quotes_api_url, "http://localhost:8080/json/last");
        assert_eq!(settings.poll_timeout_secs, 10);
        assert_eq!(settings.poll_retry_delay_secs, 3);
    }

    #[test]
    fn test_debug_masks_token() {
        let settings = BotSettings::new("12345:very-secret".to_owned());
        let debug = format!("{settings:?}");
        assert!(debug.contains("12345:***"));
        assert!(!debug.contains("very-secret"));
    }

    #[test]
    fn test_mask_token() {
        assert_eq!(mask_token("12345:abcdef"), "12345:***");
        assert_eq!(mask_token("no-colon"), "***");
        assert_eq!(mask_token(":abc"), "***");
    }
}
