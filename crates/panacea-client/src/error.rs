//! Error types for data-service and identity operations.

use thiserror::Error;

/// Errors from the external-collaborator boundary.
///
/// `NotAuthenticated` asks the user to re-authenticate; everything else is
/// surfaced to the caller and recoverable by retrying or correcting input.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ClientError {
    /// No usable identity: signed out, or the service answered 401.
    #[error("not authenticated")]
    NotAuthenticated,

    /// Network-level failure talking to the data service.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered, but with GraphQL-level errors.
    #[error("graphql error: {0}")]
    GraphQl(String),

    /// The response body did not match the expected schema.
    #[error("malformed response: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Identity-provider failure that is not a plain "signed out".
    #[error("identity provider error: {0}")]
    Identity(String),
}

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
