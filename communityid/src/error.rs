//! Error types for Community ID generation.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while validating flow input or parsing a Community ID.
///
/// Every variant is a precondition failure detected before any hashing takes
/// place, so none of them are retryable without corrected input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A required field is missing or holds a value outside its domain.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The protocol tag is not one of TCP, UDP or SCTP.
    #[error("unsupported protocol: {0}")]
    UnsupportedProtocol(String),

    /// The string is not a well-formed version 1 Community ID.
    #[error("invalid community id: {0}")]
    InvalidCommunityId(String),
}

impl Error {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn unsupported_protocol(tag: impl Into<String>) -> Self {
        Self::UnsupportedProtocol(tag.into())
    }

    pub fn invalid_community_id(message: impl Into<String>) -> Self {
        Self::InvalidCommunityId(message.into())
    }
}
