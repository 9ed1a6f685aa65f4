//! Exchange-rate quotes.
//!
//! Fetches the current bid for a currency pair from the public quotes API
//! and formats it for display.

mod client;
mod format;

pub use client::{AwesomeApiClient, QuoteError, QuoteSource, extract_bid};
pub use format::format_bid;
