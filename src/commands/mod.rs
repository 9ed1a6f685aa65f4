//! Command handling module.
//!
//! Maps chat commands such as `/dolar` to currency pairs and builds the
//! reply for each incoming message.

mod handler;
mod table;
mod types;

pub use handler::CommandHandler;
pub use table::{CommandEntry, CommandTable, TableError};
pub use types::{FETCH_FAILED_MESSAGE, FORMAT_FAILED_MESSAGE, Reply};
