//! Error types for questionnaire sessions.

use panacea_model::QuestionId;
use thiserror::Error;

use crate::submit::SubmitError;

/// Errors from session transitions.
///
/// None of these are fatal to the session: validation failures surface
/// inline, transition misuse is a caller bug reported loudly, and
/// submission failures leave the session in a retryable state.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    /// A session needs at least one question.
    #[error("questionnaire has no questions")]
    NoQuestions,

    /// The operation is not allowed in the session's current state.
    #[error("'{operation}' is not valid while the session is {state}")]
    InvalidTransition {
        operation: &'static str,
        state: &'static str,
    },

    /// `advance()` was called before the current question was answered.
    #[error("question '{0}' has no recorded answer")]
    Unanswered(QuestionId),

    /// The recorded answer violates its question's constraint.
    #[error("answer for question '{id}' failed validation: {reason}")]
    ValidationFailed { id: QuestionId, reason: String },

    /// `retreat()` from the first question.
    #[error("cannot move back from the first question")]
    AtStart,

    /// The submission collaborator reported a failure. The session stays
    /// recoverable; `submit()` may be retried.
    #[error("batch submission failed")]
    SubmissionFailed {
        #[source]
        source: SubmitError,
    },
}

/// Result type alias for session operations.
pub type Result<T> = std::result::Result<T, SessionError>;
