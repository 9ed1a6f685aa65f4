//! Cotacao Bot Library
//!
//! A Telegram bot that replies with current exchange rates against the
//! Brazilian real.
//!
//! This crate provides the core functionality for:
//! - Mapping chat commands to currency pairs
//! - Fetching bids from the public quotes API
//! - Long-polling Telegram and replying to each message in order

pub mod bot;
pub mod commands;
pub mod config;
pub mod quotes;
pub mod telegram;

#[cfg(test)]
mod test_support;
