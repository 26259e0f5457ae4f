//! The questionnaire session state machine.
//!
//! A session owns an ordered question list, a cursor, and the recorded
//! answers, independent of any rendering layer. Screens observe it through
//! the read accessors and drive it only through the transition methods;
//! nothing else mutates the answer map for the session's lifetime.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use panacea_model::{
    AnswerBatch, BatchAnswer, QuestionKind, QuestionnaireQuestion, RecordedAnswer, SubmitReceipt,
};

use crate::error::{Result, SessionError};
use crate::submit::{ResponseSubmitter, SubmitError};

/// Observable session state.
///
/// `ReadyToSubmit` is the cursor standing one past the last question with
/// every question answered on the way; `Submitted` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    InProgress { position: usize },
    ReadyToSubmit,
    Submitting,
    Submitted,
    SubmitFailed,
}

impl SessionState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::InProgress { .. } => "in progress",
            Self::ReadyToSubmit => "ready to submit",
            Self::Submitting => "submitting",
            Self::Submitted => "submitted",
            Self::SubmitFailed => "submit failed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Answering,
    Submitting,
    Submitted,
    SubmitFailed,
}

/// A sequential, resumable interview collecting typed answers for one
/// medication's questionnaire.
#[derive(Debug)]
pub struct QuestionnaireSession {
    medication_name: String,
    questions: Vec<QuestionnaireQuestion>,
    /// Cursor in `[0, questions.len()]`; `== len` means completion-ready.
    position: usize,
    answers: BTreeMap<panacea_model::QuestionId, RecordedAnswer>,
    /// When each question was first shown, by question index.
    first_asked: Vec<Option<DateTime<Utc>>>,
    phase: Phase,
}

impl QuestionnaireSession {
    /// Start a session over a non-empty question list.
    pub fn new(
        medication_name: impl Into<String>,
        questions: Vec<QuestionnaireQuestion>,
    ) -> Result<Self> {
        if questions.is_empty() {
            return Err(SessionError::NoQuestions);
        }
        let mut first_asked = vec![None; questions.len()];
        first_asked[0] = Some(Utc::now());
        Ok(Self {
            medication_name: medication_name.into(),
            questions,
            position: 0,
            answers: BTreeMap::new(),
            first_asked,
            phase: Phase::Answering,
        })
    }

    pub fn medication_name(&self) -> &str {
        &self.medication_name
    }

    pub fn questions(&self) -> &[QuestionnaireQuestion] {
        &self.questions
    }

    pub fn state(&self) -> SessionState {
        match self.phase {
            Phase::Submitting => SessionState::Submitting,
            Phase::Submitted => SessionState::Submitted,
            Phase::SubmitFailed => SessionState::SubmitFailed,
            Phase::Answering if self.position == self.questions.len() => {
                SessionState::ReadyToSubmit
            }
            Phase::Answering => SessionState::InProgress {
                position: self.position,
            },
        }
    }

    /// The question under the cursor, absent once every question has been
    /// visited forward.
    pub fn current_question(&self) -> Option<&QuestionnaireQuestion> {
        self.questions.get(self.position)
    }

    /// The recorded answer for the current question, used to pre-fill a
    /// revisited question.
    pub fn current_answer(&self) -> Option<&RecordedAnswer> {
        let question = self.current_question()?;
        self.answers.get(&question.id)
    }

    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    /// Record (or overwrite, in place) the answer for the current
    /// question. The cursor does not move.
    pub fn answer(&mut self, value: impl Into<String>) -> Result<()> {
        self.require_answering("answer")?;
        let question_id = self
            .questions
            .get(self.position)
            .map(|question| question.id.clone())
            .ok_or(SessionError::InvalidTransition {
                operation: "answer",
                state: SessionState::ReadyToSubmit.name(),
            })?;

        let now = Utc::now();
        let asked_at = self.first_asked[self.position].unwrap_or(now);
        let recorded = RecordedAnswer {
            question_id: question_id.clone(),
            value: value.into(),
            asked_at,
            answered_at: now,
        };
        debug!(question = %question_id, "recorded answer");
        self.answers.insert(question_id, recorded);
        Ok(())
    }

    /// Move forward one question, saturating one past the end.
    ///
    /// Requires a recorded answer that passes the current question's
    /// validation; a failing answer blocks the move and is surfaced to the
    /// caller rather than silently ignored.
    pub fn advance(&mut self) -> Result<()> {
        self.require_answering("advance")?;
        let question = self
            .questions
            .get(self.position)
            .ok_or(SessionError::InvalidTransition {
                operation: "advance",
                state: SessionState::ReadyToSubmit.name(),
            })?;
        let answer = self
            .answers
            .get(&question.id)
            .ok_or_else(|| SessionError::Unanswered(question.id.clone()))?;
        validate_answer(question, &answer.value)?;

        self.position += 1;
        if self.position < self.questions.len() {
            let slot = &mut self.first_asked[self.position];
            if slot.is_none() {
                *slot = Some(Utc::now());
            }
        }
        debug!(position = self.position, "advanced");
        Ok(())
    }

    /// Move back one question. Recorded answers are kept and re-displayed;
    /// a session in `SubmitFailed` returns to `InProgress`.
    pub fn retreat(&mut self) -> Result<()> {
        match self.phase {
            Phase::Answering | Phase::SubmitFailed => {}
            Phase::Submitting | Phase::Submitted => {
                return Err(SessionError::InvalidTransition {
                    operation: "retreat",
                    state: self.state().name(),
                });
            }
        }
        if self.position == 0 {
            return Err(SessionError::AtStart);
        }
        self.position -= 1;
        self.phase = Phase::Answering;
        debug!(position = self.position, "retreated");
        Ok(())
    }

    /// Submit every recorded answer as one batch.
    ///
    /// Valid from `ReadyToSubmit`, and again from `SubmitFailed` for a
    /// user-initiated retry. The whole batch shares a single submission
    /// timestamp; a collaborator failure parks the session in
    /// `SubmitFailed` without losing any answers.
    pub async fn submit<S: ResponseSubmitter>(
        &mut self,
        submitter: &S,
    ) -> Result<SubmitReceipt> {
        match self.state() {
            SessionState::ReadyToSubmit | SessionState::SubmitFailed => {}
            state => {
                return Err(SessionError::InvalidTransition {
                    operation: "submit",
                    state: state.name(),
                });
            }
        }

        self.phase = Phase::Submitting;
        let batch = self.assemble_batch();
        info!(
            medication = %self.medication_name,
            answers = batch.answers.len(),
            "submitting answer batch"
        );

        match submitter.submit_batch(&batch).await {
            Ok(receipt) if receipt.success => {
                self.phase = Phase::Submitted;
                Ok(receipt)
            }
            Ok(receipt) => {
                warn!(message = ?receipt.message, "service rejected answer batch");
                self.phase = Phase::SubmitFailed;
                let message = receipt
                    .message
                    .unwrap_or_else(|| "service rejected the batch".to_string());
                Err(SessionError::SubmissionFailed {
                    source: SubmitError::new(message),
                })
            }
            Err(source) => {
                warn!(error = %source, "answer batch submission failed");
                self.phase = Phase::SubmitFailed;
                Err(SessionError::SubmissionFailed { source })
            }
        }
    }

    /// Build the batch payload: answers in question order, every entry
    /// stamped with the same submission instant (the service expects a
    /// uniform stamp per batch, not per-question times).
    fn assemble_batch(&self) -> AnswerBatch {
        let submitted_at = Utc::now();
        let answers = self
            .questions
            .iter()
            .filter_map(|question| self.answers.get(&question.id))
            .map(|answer| BatchAnswer {
                question_id: answer.question_id.clone(),
                value: answer.value.clone(),
                asked_at: submitted_at,
                responded_at: submitted_at,
            })
            .collect();
        AnswerBatch {
            medication_name: self.medication_name.clone(),
            submitted_at,
            answers,
        }
    }

    fn require_answering(&self, operation: &'static str) -> Result<()> {
        match self.phase {
            Phase::Answering => Ok(()),
            _ => Err(SessionError::InvalidTransition {
                operation,
                state: self.state().name(),
            }),
        }
    }
}

/// Check an answer against its question's constraint: choice answers must
/// be one of the allowed options, free text must be non-blank after
/// trimming.
pub fn validate_answer(question: &QuestionnaireQuestion, value: &str) -> Result<()> {
    match &question.kind {
        QuestionKind::Choice { options } => {
            if options.iter().any(|option| option == value) {
                Ok(())
            } else {
                Err(SessionError::ValidationFailed {
                    id: question.id.clone(),
                    reason: format!("'{value}' is not an allowed answer"),
                })
            }
        }
        QuestionKind::FreeText => {
            if value.trim().is_empty() {
                Err(SessionError::ValidationFailed {
                    id: question.id.clone(),
                    reason: "free-text answer is blank".to_string(),
                })
            } else {
                Ok(())
            }
        }
    }
}
