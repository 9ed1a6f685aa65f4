//! Transport abstraction used by the message loop.

use async_trait::async_trait;

use super::types::Message;

/// A chat message waiting for a reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    /// Chat the reply goes to.
    pub chat_id: i64,

    /// Message text, if any (photos, stickers etc. have none).
    pub text: Option<String>,
}

impl InboundMessage {
    /// Creates an inbound message.
    #[must_use]
    pub fn new(chat_id: i64, text: Option<&str>) -> Self {
        Self {
            chat_id,
            text: text.map(str::to_owned),
        }
    }
}

impl From<Message> for InboundMessage {
    fn from(message: Message) -> Self {
        Self {
            chat_id: message.chat.id,
            text: message.text,
        }
    }
}

/// A text reply addressed to a chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundReply {
    pub chat_id: i64,
    pub text: String,
}

/// Source of inbound messages and sink for replies.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Error returned when a reply cannot be sent.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Waits for the next inbound message.
    ///
    /// Returns `None` once the source is exhausted.
    async fn next_message(&mut self) -> Option<InboundMessage>;

    /// Sends a text reply. Delivery is not confirmed beyond the API call.
    async fn send_text(&self, reply: &OutboundReply) -> Result<(), Self::Error>;
}
