//! Telegram Bot API wire types (the subset this bot uses).

use serde::{Deserialize, Serialize};

use super::TelegramError;

/// Envelope of every Bot API response.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
    pub error_code: Option<i32>,
}

impl<T> ApiResponse<T> {
    /// Converts the envelope into the result or an API error.
    pub fn into_result(self, method: &'static str) -> Result<T, TelegramError> {
        if !self.ok {
            return Err(TelegramError::Api {
                code: self.error_code.unwrap_or_default(),
                description: self
                    .description
                    .unwrap_or_else(|| "no description".to_owned()),
            });
        }
        self.result.ok_or(TelegramError::EmptyResult(method))
    }
}

/// A Telegram user or bot account.
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub is_bot: bool,
    pub first_name: String,
    pub username: Option<String>,
}

/// A chat a message belongs to.
#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// An incoming message.
#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    pub from: Option<User>,
    pub text: Option<String>,
}

/// One entry of a `getUpdates` batch.
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

/// Parameters of `getUpdates`.
#[derive(Debug, Serialize)]
pub(super) struct GetUpdatesParams {
    pub offset: i64,
    pub timeout: u64,
    pub allowed_updates: &'static [&'static str],
}

/// Parameters of `sendMessage`.
#[derive(Debug, Serialize)]
pub(super) struct SendMessageParams<'a> {
    pub chat_id: i64,
    pub text: &'a str,
}
