//! Configuration module for the quote bot.
//!
//! Handles loading of the bot token and endpoint settings from the
//! environment.

mod settings;

pub use settings::{BotSettings, ConfigError, TOKEN_ENV_VAR, mask_token};
