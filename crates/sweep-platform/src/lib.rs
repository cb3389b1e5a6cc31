//! Typed HTTP surface for the communication platform's proxy-session and
//! chat-channel APIs.
//!
//! Every operation is a single request/response round trip; callers decide
//! what to do with failures. Retry policy is deliberately out of scope.

mod platform_client;
mod platform_types;
#[cfg(test)]
mod tests;

use thiserror::Error;

pub use platform_client::{PlatformClient, PlatformConfig};
pub use platform_types::{ChannelPage, ChannelSummary, ProxySession, SessionStatus};

/// Failures surfaced by `PlatformClient` operations.
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("missing account credentials")]
    MissingCredentials,
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{operation} returned non-success status {status}: {body}")]
    HttpStatus {
        operation: &'static str,
        status: u16,
        body: String,
    },
}
