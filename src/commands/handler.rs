//! Command handler implementation.

use tracing::{debug, warn};

use super::table::CommandTable;
use super::types::Reply;
use crate::quotes::{QuoteSource, format_bid};

/// Maps chat text to a reply, fetching quotes for known commands.
#[derive(Debug)]
pub struct CommandHandler<Q> {
    /// Command lookup table, read-only after startup.
    table: CommandTable,

    /// Where bids come from.
    quotes: Q,
}

impl<Q: QuoteSource> CommandHandler<Q> {
    /// Creates a new command handler.
    #[must_use]
    pub const fn new(table: CommandTable, quotes: Q) -> Self {
        Self { table, quotes }
    }

    /// Returns the command table.
    #[must_use]
    pub const fn table(&self) -> &CommandTable {
        &self.table
    }

    /// Handles a message's text.
    ///
    /// Returns `None` for absent or empty text, which gets no reply.
    pub async fn handle(&self, text: Option<&str>) -> Option<Reply> {
        let text = text.filter(|t| !t.is_empty())?;
        Some(self.dispatch(text).await)
    }

    /// Dispatches non-empty text to a command or the help reply.
    pub async fn dispatch(&self, text: &str) -> Reply {
        let Some(entry) = self.table.get(text) else {
            debug!("No command matches {:?}, sending help", truncate(text, 30));
            return Reply::Help(self.table.help_text());
        };

        debug!("Handling {} ({})", entry.command, entry.pair_id);

        let bid = match self.quotes.fetch_bid(entry).await {
            Ok(bid) => bid,
            Err(e) if e.is_parse_error() => {
                warn!("Unexpected {} quote response: {}", entry.pair_id, e);
                return Reply::FetchFailed;
            }
            Err(e) => {
                warn!("Failed to fetch {} quote: {}", entry.pair_id, e);
                return Reply::FetchFailed;
            }
        };

        match format_bid(&bid) {
            Some(value) => Reply::Quote {
                display_name: entry.display_name.clone(),
                value,
            },
            None => {
                warn!("Quote for {} has non-numeric bid {:?}", entry.pair_id, bid);
                Reply::FormatFailed
            }
        }
    }
}

/// Truncates a string to a maximum length, adding "..." if truncated.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_owned()
    } else {
        format!("{}...", s.chars().take(max_len).collect::<String>())
    }
}
