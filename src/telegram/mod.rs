//! Telegram transport module.
//!
//! Long-polls the Bot API for incoming messages and sends text replies.

mod client;
mod transport;
mod types;

pub use client::{TelegramBot, TelegramError};
pub use transport::{ChatTransport, InboundMessage, OutboundReply};
pub use types::{ApiResponse, Chat, Message, Update, User};
