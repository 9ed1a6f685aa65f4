//! Reply types produced by the command handler.

use std::fmt;

/// Sent when the quotes API could not be reached or answered unexpectedly.
pub const FETCH_FAILED_MESSAGE: &str = "Não foi possível buscar a cotação 😢";

/// Sent when the bid returned by the API is not a number.
pub const FORMAT_FAILED_MESSAGE: &str = "Não foi possível formatar a cotação 😢";

/// Outcome of handling one chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// A formatted quote.
    Quote {
        /// Display name of the currency.
        display_name: String,
        /// Bid rendered with two decimals.
        value: String,
    },

    /// The quote could not be fetched.
    FetchFailed,

    /// The bid could not be parsed as a number.
    FormatFailed,

    /// The text did not match any command.
    Help(String),
}

impl Reply {
    /// Short label for logging.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Quote { .. } => "quote",
            Self::FetchFailed => "fetch_failed",
            Self::FormatFailed => "format_failed",
            Self::Help(_) => "help",
        }
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Quote {
                display_name,
                value,
            } => write!(f, "💵 Cotação atual do {display_name}: R$ {value}"),
            Self::FetchFailed => f.write_str(FETCH_FAILED_MESSAGE),
            Self::FormatFailed => f.write_str(FORMAT_FAILED_MESSAGE),
            Self::Help(text) => f.write_str(text),
        }
    }
}
