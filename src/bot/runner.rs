//! Message loop runner.
//!
//! The loop follows a two-state machine:
//! 1. Idle: wait for the next inbound message
//! 2. Handling: look up the command, fetch and format the quote, reply
//!
//! Every message returns the loop to Idle, whatever happened while
//! handling it. Messages are processed strictly in arrival order.

use tracing::{debug, info, warn};

use super::LoopState;
use crate::commands::CommandHandler;
use crate::quotes::QuoteSource;
use crate::telegram::{ChatTransport, InboundMessage, OutboundReply};

/// Sequential request/response loop over a chat transport.
pub struct MessageLoop<T, Q> {
    /// Source of messages and sink for replies.
    transport: T,

    /// Builds the reply for each message.
    handler: CommandHandler<Q>,

    /// Current state.
    state: LoopState,
}

impl<T, Q> MessageLoop<T, Q>
where
    T: ChatTransport,
    Q: QuoteSource,
{
    /// Creates a new message loop.
    #[must_use]
    pub const fn new(transport: T, handler: CommandHandler<Q>) -> Self {
        Self {
            transport,
            handler,
            state: LoopState::Idle,
        }
    }

    /// Runs until the transport stops producing messages.
    pub async fn run(&mut self) {
        info!(
            "Message loop started ({} commands)",
            self.handler.table().len()
        );

        while let Some(message) = self.transport.next_message().await {
            self.process(message).await;
        }

        info!("Inbound message stream ended");
    }

    /// Handles a single message.
    ///
    /// Returns `true` if a reply was sent. Send failures are logged and
    /// never propagated.
    pub async fn process(&mut self, message: InboundMessage) -> bool {
        self.state = LoopState::Handling;
        let sent = self.reply_to(message).await;
        self.state = LoopState::Idle;
        sent
    }

    async fn reply_to(&self, message: InboundMessage) -> bool {
        let Some(reply) = self.handler.handle(message.text.as_deref()).await else {
            debug!("Ignoring message without text in chat {}", message.chat_id);
            return false;
        };

        debug!("Replying to chat {} with {} reply", message.chat_id, reply.kind());

        let outbound = OutboundReply {
            chat_id: message.chat_id,
            text: reply.to_string(),
        };

        match self.transport.send_text(&outbound).await {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to send reply to chat {}: {}", message.chat_id, e);
                false
            }
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> LoopState {
        self.state
    }

    /// Gets a reference to the transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }
}

impl<T, Q> std::fmt::Debug for MessageLoop<T, Q> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageLoop")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
