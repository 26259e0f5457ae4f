//! Questionnaire session state machine.
//!
//! The session is a standalone object independent of any rendering
//! framework: screens observe it and call its transition methods, the
//! session owns the answers. Submission goes through the
//! [`ResponseSubmitter`] collaborator as a single batched call.

pub mod error;
pub mod push;
pub mod session;
pub mod submit;

pub use error::{Result, SessionError};
pub use push::session_from_push;
pub use session::{QuestionnaireSession, SessionState, validate_answer};
pub use submit::{ResponseSubmitter, SubmitError};
