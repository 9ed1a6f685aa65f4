//! Message loop state.

use std::fmt;

/// State of the message loop.
///
/// The loop handles one message at a time, so it is always in exactly one
/// of these two states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopState {
    /// Waiting for the next inbound message.
    #[default]
    Idle,

    /// Processing a message (lookup, fetch, reply).
    Handling,
}

impl fmt::Display for LoopState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str("idle"),
            Self::Handling => f.write_str("handling"),
        }
    }
}
