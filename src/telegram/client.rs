//! Telegram Bot API client.

use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::transport::{ChatTransport, InboundMessage, OutboundReply};
use super::types::{ApiResponse, GetUpdatesParams, Message, SendMessageParams, Update, User};
use crate::config::{BotSettings, mask_token};

/// Errors that can occur during Telegram operations.
#[derive(Debug, Error)]
pub enum TelegramError {
    #[error("HTTP error: {0}")]
    Http(#[source] reqwest::Error),

    #[error("Telegram API error {code}: {description}")]
    Api { code: i32, description: String },

    #[error("Telegram API returned no result for {0}")]
    EmptyResult(&'static str),
}

impl From<reqwest::Error> for TelegramError {
    fn from(err: reqwest::Error) -> Self {
        // Request URLs embed the bot token.
        Self::Http(err.without_url())
    }
}

/// Long-polling Telegram bot.
pub struct TelegramBot {
    /// HTTP client shared by all API calls.
    client: Client,

    /// `{api_url}/bot{token}`.
    endpoint: String,

    /// Token, kept only for masked logging.
    token: String,

    /// The bot's own account.
    me: User,

    /// Server-side long-polling timeout.
    poll_timeout_secs: u64,

    /// Pause after a failed poll.
    retry_delay: Duration,

    /// Next update id to request.
    offset: i64,

    /// Messages received but not yet handed out.
    pending: VecDeque<InboundMessage>,
}

impl TelegramBot {
    /// Connects to the Bot API and verifies the token with `getMe`.
    ///
    /// # Errors
    ///
    /// Returns an error if the API is unreachable or rejects the token.
    pub async fn connect(client: Client, settings: &BotSettings) -> Result<Self, TelegramError> {
        info!(
            "Connecting to Telegram as {}...",
            mask_token(&settings.bot_token)
        );

        let endpoint = format!(
            "{}/bot{}",
            settings.telegram_api_url.trim_end_matches('/'),
            settings.bot_token
        );

        let me: User = call(&client, &endpoint, "getMe", &serde_json::json!({})).await?;
        debug!("Token belongs to user {}", me.id);

        Ok(Self {
            client,
            endpoint,
            token: settings.bot_token.clone(),
            me,
            poll_timeout_secs: settings.poll_timeout_secs,
            retry_delay: settings.poll_retry_delay(),
            offset: 0,
            pending: VecDeque::new(),
        })
    }

    /// The bot's own account.
    #[must_use]
    pub const fn me(&self) -> &User {
        &self.me
    }

    /// Fetches the next batch of updates and advances the offset.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn get_updates(&mut self) -> Result<Vec<Update>, TelegramError> {
        let params = GetUpdatesParams {
            offset: self.offset,
            timeout: self.poll_timeout_secs,
            allowed_updates: &["message"],
        };

        let updates: Vec<Update> = call(&self.client, &self.endpoint, "getUpdates", &params).await?;
        self.offset = next_offset(self.offset, &updates);
        Ok(updates)
    }

    /// Sends a text message to a chat.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or Telegram rejects it.
    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<Message, TelegramError> {
        let params = SendMessageParams { chat_id, text };
        call(&self.client, &self.endpoint, "sendMessage", &params).await
    }
}

#[async_trait]
impl ChatTransport for TelegramBot {
    async fn next_message(&mut self) -> Option<InboundMessage> {
        loop {
            if let Some(message) = self.pending.pop_front() {
                return Some(message);
            }

            match self.get_updates().await {
                Ok(updates) => {
                    let total = updates.len();
                    let queued = buffer_messages(&mut self.pending, updates);
                    debug!("Received {} updates, {} messages", total, queued);
                }
                Err(e) => {
                    warn!("Failed to poll updates: {}. Retrying in {:?}", e, self.retry_delay);
                    tokio::time::sleep(self.retry_delay).await;
                }
            }
        }
    }

    type Error = TelegramError;

    async fn send_text(&self, reply: &OutboundReply) -> Result<(), TelegramError> {
        self.send_message(reply.chat_id, &reply.text).await.map(|_| ())
    }
}

impl std::fmt::Debug for TelegramBot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramBot")
            .field("token", &mask_token(&self.token))
            .field("username", &self.me.username)
            .field("offset", &self.offset)
            .field("pending", &self.pending.len())
            .finish_non_exhaustive()
    }
}

/// Calls a Bot API method with JSON parameters.
async fn call<P, T>(
    client: &Client,
    endpoint: &str,
    method: &'static str,
    params: &P,
) -> Result<T, TelegramError>
where
    P: Serialize + ?Sized,
    T: DeserializeOwned,
{
    // Error responses still carry a JSON envelope, so the status is not checked here.
    let response: ApiResponse<T> = client
        .post(format!("{endpoint}/{method}"))
        .json(params)
        .send()
        .await?
        .json()
        .await?;

    response.into_result(method)
}

/// Offset that acknowledges every update in the batch.
fn next_offset(current: i64, updates: &[Update]) -> i64 {
    updates
        .iter()
        .map(|u| u.update_id + 1)
        .fold(current, i64::max)
}

/// Queues the messages of a batch in arrival order, skipping other updates.
///
/// Returns how many messages were queued.
fn buffer_messages(pending: &mut VecDeque<InboundMessage>, updates: Vec<Update>) -> usize {
    let before = pending.len();
    pending.extend(
        updates
            .into_iter()
            .filter_map(|u| u.message)
            .map(InboundMessage::from),
    );
    pending.len() - before
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telegram::Chat;
    use crate::test_support::serve;

    fn update(id: i64) -> Update {
        Update {
            update_id: id,
            message: None,
        }
    }

    fn message_update(id: i64, chat_id: i64, text: Option<&str>) -> Update {
        Update {
            update_id: id,
            message: Some(Message {
                message_id: id * 10,
                chat: Chat {
                    id: chat_id,
                    kind: Some("private".to_owned()),
                },
                from: None,
                text: text.map(str::to_owned),
            }),
        }
    }

    #[test]
    fn test_buffer_messages_keeps_order() {
        let mut pending = VecDeque::from([InboundMessage::new(1, Some("/euro"))]);

        let queued = buffer_messages(
            &mut pending,
            vec![
                message_update(5, 10, Some("/dolar")),
                update(6),
                message_update(7, 11, None),
                message_update(8, 10, Some("oi")),
            ],
        );

        assert_eq!(queued, 3);
        assert_eq!(
            Vec::from(pending),
            vec![
                InboundMessage::new(1, Some("/euro")),
                InboundMessage::new(10, Some("/dolar")),
                InboundMessage::new(11, None),
                InboundMessage::new(10, Some("oi")),
            ]
        );
    }

    #[test]
    fn test_buffer_messages_skips_non_message_updates() {
        let mut pending = VecDeque::new();
        assert_eq!(buffer_messages(&mut pending, vec![update(1), update(2)]), 0);
        assert_eq!(buffer_messages(&mut pending, Vec::new()), 0);
        assert!(pending.is_empty());
    }

    #[tokio::test]
    async fn test_next_message_retries_failed_poll() {
        let (base_url, mut requests) = serve(vec![
            (200, r#"{"ok":true,"result":{"id":42,"is_bot":true,"first_name":"Cotacao","username":"cotacao_bot"}}"#),
            (502, "Bad Gateway"),
            (
                200,
                r#"{"ok":true,"result":[
                    {"update_id":3,"message":{"message_id":30,"chat":{"id":10,"type":"private"},"text":"/dolar"}},
                    {"update_id":4,"edited_message":{"message_id":30,"chat":{"id":10,"type":"private"},"text":"/euro"}},
                    {"update_id":5,"message":{"message_id":31,"chat":{"id":11,"type":"group"}}}
                ]}"#,
            ),
        ])
        .await;

        let mut settings = BotSettings::new("123:abc".to_owned());
        settings.telegram_api_url = base_url;
        settings.poll_retry_delay_secs = 0;

        let mut bot = TelegramBot::connect(Client::new(), &settings).await.unwrap();
        assert_eq!(bot.me().username.as_deref(), Some("cotacao_bot"));

        assert_eq!(
            bot.next_message().await,
            Some(InboundMessage::new(10, Some("/dolar")))
        );
        assert_eq!(bot.next_message().await, Some(InboundMessage::new(11, None)));
        assert_eq!(bot.offset, 6);

        let mut lines = Vec::new();
        while let Ok(line) = requests.try_recv() {
            lines.push(line);
        }
        assert_eq!(
            lines,
            vec![
                "POST /bot123:abc/getMe HTTP/1.1",
                "POST /bot123:abc/getUpdates HTTP/1.1",
                "POST /bot123:abc/getUpdates HTTP/1.1",
            ]
        );
    }

    #[tokio::test]
    async fn test_connect_rejected_token() {
        let (base_url, _requests) = serve(vec![(
            401,
            r#"{"ok":false,"error_code":401,"description":"Unauthorized"}"#,
        )])
        .await;

        let mut settings = BotSettings::new("123:bad".to_owned());
        settings.telegram_api_url = base_url;

        let err = TelegramBot::connect(Client::new(), &settings)
            .await
            .unwrap_err();
        assert!(matches!(err, TelegramError::Api { code: 401, .. }));
    }

    #[test]
    fn test_next_offset() {
        assert_eq!(next_offset(0, &[]), 0);
        assert_eq!(next_offset(0, &[update(5), update(7), update(6)]), 8);
        assert_eq!(next_offset(10, &[update(3)]), 10);
    }

    #[test]
    fn test_error_display() {
        let err = TelegramError::Api {
            code: 403,
            description: "Forbidden: bot was blocked by the user".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "Telegram API error 403: Forbidden: bot was blocked by the user"
        );
    }
}
