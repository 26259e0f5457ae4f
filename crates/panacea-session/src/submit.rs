//! The submission collaborator boundary.

use std::error::Error;
use std::fmt;
use std::future::Future;

use panacea_model::{AnswerBatch, SubmitReceipt};

/// Error surfaced by a submission collaborator (network or server).
///
/// Carries the underlying cause so callers can log or display it; the
/// session attaches it to [`SessionError::SubmissionFailed`].
///
/// [`SessionError::SubmissionFailed`]: crate::SessionError::SubmissionFailed
#[derive(Debug)]
pub struct SubmitError {
    message: String,
    source: Option<Box<dyn Error + Send + Sync>>,
}

impl SubmitError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        source: impl Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl Error for SubmitError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source
            .as_deref()
            .map(|source| source as &(dyn Error + 'static))
    }
}

/// Transmits an assembled answer batch in a single call.
///
/// Implementations are single-shot request/response: no streaming, no
/// retry policy of their own (retry is user-initiated through the
/// session). The GraphQL client provides the production implementation;
/// tests substitute their own.
pub trait ResponseSubmitter {
    fn submit_batch(
        &self,
        batch: &AnswerBatch,
    ) -> impl Future<Output = std::result::Result<SubmitReceipt, SubmitError>> + Send;
}
