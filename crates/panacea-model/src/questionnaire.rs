//! Questionnaire questions, recorded answers, and the batch payload
//! transmitted on submission.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a question within one questionnaire.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(String);

impl QuestionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How a question is answered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "kind")]
pub enum QuestionKind {
    /// Pick one of an ordered, non-empty list of allowed answers.
    Choice { options: Vec<String> },
    /// Type anything non-blank.
    FreeText,
}

/// One question of a questionnaire. Immutable once a session starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionnaireQuestion {
    pub id: QuestionId,
    pub prompt: String,
    #[serde(flatten)]
    pub kind: QuestionKind,
}

impl QuestionnaireQuestion {
    pub fn choice(
        id: impl Into<String>,
        prompt: impl Into<String>,
        options: Vec<String>,
    ) -> Self {
        Self {
            id: QuestionId::new(id),
            prompt: prompt.into(),
            kind: QuestionKind::Choice { options },
        }
    }

    pub fn free_text(id: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            id: QuestionId::new(id),
            prompt: prompt.into(),
            kind: QuestionKind::FreeText,
        }
    }
}

/// An answer as the session holds it in memory, with the true per-question
/// times the interview observed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordedAnswer {
    pub question_id: QuestionId,
    pub value: String,
    pub asked_at: DateTime<Utc>,
    pub answered_at: DateTime<Utc>,
}

/// One answer as it appears in the submitted batch.
///
/// Both timestamps carry the batch's shared submission instant, not the
/// per-question times; the service expects a uniform stamp per batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchAnswer {
    pub question_id: QuestionId,
    pub value: String,
    pub asked_at: DateTime<Utc>,
    pub responded_at: DateTime<Utc>,
}

/// The single payload transmitting all of a session's answers at once.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerBatch {
    pub medication_name: String,
    pub submitted_at: DateTime<Utc>,
    pub answers: Vec<BatchAnswer>,
}

/// The data service's acknowledgement of a batch submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitReceipt {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
