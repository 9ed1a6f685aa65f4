//! Message loop module.
//!
//! Pulls chat messages from the transport one at a time and answers each
//! with a quote or the help text.

mod runner;
mod state;

pub use runner::MessageLoop;
pub use state::LoopState;
