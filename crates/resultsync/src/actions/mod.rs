//! Remote actions module
//!
//! Provides the handler for requests that ask the remote to do something:
//! start a download, browse a sender, or change a persona's trust.

mod handler;

pub use handler::ActionHandler;
