//! Session state-machine tests: navigation, validation, and the
//! submission lifecycle against a scripted collaborator.

use std::sync::Mutex;

use panacea_model::{AnswerBatch, QuestionnaireQuestion, SubmitReceipt};
use panacea_session::{
    QuestionnaireSession, ResponseSubmitter, SessionError, SessionState, SubmitError,
};

/// Scripted submitter: pops one pre-programmed response per call and keeps
/// every batch it was handed.
struct ScriptedSubmitter {
    responses: Mutex<Vec<Result<SubmitReceipt, SubmitError>>>,
    batches: Mutex<Vec<AnswerBatch>>,
}

impl ScriptedSubmitter {
    fn new(responses: Vec<Result<SubmitReceipt, SubmitError>>) -> Self {
        Self {
            responses: Mutex::new(responses),
            batches: Mutex::new(Vec::new()),
        }
    }

    fn succeeding() -> Self {
        Self::new(vec![Ok(SubmitReceipt {
            success: true,
            message: None,
        })])
    }

    fn batches(&self) -> Vec<AnswerBatch> {
        self.batches.lock().unwrap().clone()
    }
}

impl ResponseSubmitter for ScriptedSubmitter {
    async fn submit_batch(&self, batch: &AnswerBatch) -> Result<SubmitReceipt, SubmitError> {
        self.batches.lock().unwrap().push(batch.clone());
        self.responses
            .lock()
            .unwrap()
            .remove(0)
    }
}

fn three_questions() -> Vec<QuestionnaireQuestion> {
    vec![
        QuestionnaireQuestion::choice(
            "q1",
            "How well did you sleep last night?",
            vec!["Very well".to_string(), "Okay".to_string(), "Poorly".to_string()],
        ),
        QuestionnaireQuestion::choice(
            "q2",
            "Did you wake during the night?",
            vec!["Yes".to_string(), "No".to_string()],
        ),
        QuestionnaireQuestion::free_text("q3", "Describe any side effects."),
    ]
}

fn session() -> QuestionnaireSession {
    QuestionnaireSession::new("Lunesta", three_questions()).expect("session")
}

#[test]
fn starts_in_progress_at_the_first_question() {
    let session = session();
    assert_eq!(session.state(), SessionState::InProgress { position: 0 });
    assert_eq!(
        session.current_question().map(|q| q.id.as_str()),
        Some("q1")
    );
    assert!(session.current_answer().is_none());
}

#[test]
fn advance_requires_a_recorded_answer() {
    let mut session = session();
    match session.advance() {
        Err(SessionError::Unanswered(id)) => assert_eq!(id.as_str(), "q1"),
        other => panic!("expected Unanswered, got {other:?}"),
    }
}

#[test]
fn advance_blocks_on_invalid_answers() {
    let mut session = session();

    session.answer("Sideways").expect("record answer");
    assert!(matches!(
        session.advance(),
        Err(SessionError::ValidationFailed { .. })
    ));

    // Still on the first question; a valid overwrite unblocks.
    session.answer("Okay").expect("overwrite answer");
    session.advance().expect("advance past q1");
    assert_eq!(session.state(), SessionState::InProgress { position: 1 });
}

#[test]
fn blank_free_text_blocks_advance() {
    let mut session = session();
    session.answer("Very well").expect("answer q1");
    session.advance().expect("advance");
    session.answer("No").expect("answer q2");
    session.advance().expect("advance");

    session.answer("   \t ").expect("record blank answer");
    assert!(matches!(
        session.advance(),
        Err(SessionError::ValidationFailed { .. })
    ));
}

#[test]
fn retreat_restores_the_recorded_answer_for_prefill() {
    let mut session = session();
    session.answer("Poorly").expect("answer q1");
    session.advance().expect("advance");
    assert!(session.current_answer().is_none());

    session.retreat().expect("retreat");
    assert_eq!(session.state(), SessionState::InProgress { position: 0 });
    let prefill = session.current_answer().expect("answer preserved");
    assert_eq!(prefill.value, "Poorly");

    // Editing a revisited answer overwrites in place.
    session.answer("Okay").expect("overwrite");
    assert_eq!(session.answered_count(), 1);
    assert_eq!(session.current_answer().unwrap().value, "Okay");
}

#[test]
fn retreat_from_the_start_is_rejected() {
    let mut session = session();
    assert!(matches!(session.retreat(), Err(SessionError::AtStart)));
}

#[test]
fn answering_every_question_reaches_ready_to_submit() {
    let mut session = session();
    for answer in ["Very well", "No", "None at all"] {
        session.answer(answer).expect("answer");
        session.advance().expect("advance");
    }
    assert_eq!(session.state(), SessionState::ReadyToSubmit);
    assert!(session.current_question().is_none());

    // Saturated: another advance is a reported misuse, not a crash.
    assert!(matches!(
        session.advance(),
        Err(SessionError::InvalidTransition { .. })
    ));

    // And ready-to-submit can still step back into the interview.
    session.retreat().expect("retreat from ready");
    assert_eq!(session.state(), SessionState::InProgress { position: 2 });
}

#[tokio::test]
async fn submit_before_ready_is_rejected() {
    let mut session = session();
    let submitter = ScriptedSubmitter::succeeding();
    assert!(matches!(
        session.submit(&submitter).await,
        Err(SessionError::InvalidTransition {
            operation: "submit",
            ..
        })
    ));
    assert!(submitter.batches().is_empty());
}

#[tokio::test]
async fn submitted_batch_shares_one_timestamp_across_answers() {
    let mut session = session();
    for answer in ["Very well", "No", "Mild headache"] {
        session.answer(answer).expect("answer");
        session.advance().expect("advance");
    }

    let submitter = ScriptedSubmitter::succeeding();
    let receipt = session.submit(&submitter).await.expect("submit");
    assert!(receipt.success);
    assert_eq!(session.state(), SessionState::Submitted);

    let batches = submitter.batches();
    assert_eq!(batches.len(), 1);
    let batch = &batches[0];
    assert_eq!(batch.medication_name, "Lunesta");
    assert_eq!(batch.answers.len(), 3);
    for answer in &batch.answers {
        assert_eq!(answer.asked_at, batch.submitted_at);
        assert_eq!(answer.responded_at, batch.submitted_at);
    }
    let values: Vec<&str> = batch.answers.iter().map(|a| a.value.as_str()).collect();
    assert_eq!(values, vec!["Very well", "No", "Mild headache"]);
}

#[tokio::test]
async fn failed_submission_is_retryable() {
    let mut session = session();
    for answer in ["Okay", "Yes", "Some dizziness"] {
        session.answer(answer).expect("answer");
        session.advance().expect("advance");
    }

    let submitter = ScriptedSubmitter::new(vec![
        Err(SubmitError::new("connection reset")),
        Ok(SubmitReceipt {
            success: true,
            message: Some("Responses recorded".to_string()),
        }),
    ]);

    let error = session.submit(&submitter).await.unwrap_err();
    assert!(matches!(error, SessionError::SubmissionFailed { .. }));
    assert_eq!(session.state(), SessionState::SubmitFailed);

    // Retry is user-initiated and re-enters Submitting with the answers
    // intact.
    let receipt = session.submit(&submitter).await.expect("retry succeeds");
    assert!(receipt.success);
    assert_eq!(session.state(), SessionState::Submitted);
    assert_eq!(submitter.batches().len(), 2);
    assert_eq!(submitter.batches()[1].answers.len(), 3);
}

#[tokio::test]
async fn service_rejection_parks_the_session_in_submit_failed() {
    let mut session = session();
    for answer in ["Okay", "Yes", "None"] {
        session.answer(answer).expect("answer");
        session.advance().expect("advance");
    }

    let submitter = ScriptedSubmitter::new(vec![Ok(SubmitReceipt {
        success: false,
        message: Some("study is closed".to_string()),
    })]);
    let error = session.submit(&submitter).await.unwrap_err();
    assert!(matches!(error, SessionError::SubmissionFailed { .. }));
    assert_eq!(session.state(), SessionState::SubmitFailed);
}

#[tokio::test]
async fn terminal_sessions_refuse_further_mutation() {
    let mut session = session();
    for answer in ["Okay", "Yes", "None"] {
        session.answer(answer).expect("answer");
        session.advance().expect("advance");
    }
    session
        .submit(&ScriptedSubmitter::succeeding())
        .await
        .expect("submit");

    assert!(matches!(
        session.answer("late edit"),
        Err(SessionError::InvalidTransition { .. })
    ));
    assert!(matches!(
        session.retreat(),
        Err(SessionError::InvalidTransition { .. })
    ));
    assert!(matches!(
        session.submit(&ScriptedSubmitter::succeeding()).await,
        Err(SessionError::InvalidTransition { .. })
    ));
}
