//! Interpretation of push-notification payloads into sessions.

use serde::Deserialize;
use tracing::debug;

use panacea_model::QuestionnaireQuestion;

use crate::session::QuestionnaireSession;

/// Wire form of the questionnaire push payload.
#[derive(Debug, Deserialize)]
struct PushPayload {
    #[serde(rename = "medication_name", alias = "medicationName")]
    medication_name: String,
    questions: Vec<PushQuestion>,
}

#[derive(Debug, Deserialize)]
struct PushQuestion {
    question: String,
    #[serde(default)]
    answers: Vec<String>,
}

/// Build a session from an opaque push payload.
///
/// Payloads come straight off the notification channel, so anything can
/// arrive here; a payload that doesn't decode, or that carries no
/// questions, yields `None` and the screen shows its empty state. Session
/// creation must never panic on delivery data.
pub fn session_from_push(payload: &serde_json::Value) -> Option<QuestionnaireSession> {
    let payload: PushPayload = match serde_json::from_value(payload.clone()) {
        Ok(payload) => payload,
        Err(error) => {
            debug!(%error, "ignoring malformed questionnaire push payload");
            return None;
        }
    };
    if payload.questions.is_empty() {
        debug!("push payload carries no questions");
        return None;
    }

    let questions = payload
        .questions
        .into_iter()
        .enumerate()
        .map(|(index, question)| {
            let id = format!("q{}", index + 1);
            if question.answers.is_empty() {
                QuestionnaireQuestion::free_text(id, question.question)
            } else {
                QuestionnaireQuestion::choice(id, question.question, question.answers)
            }
        })
        .collect();

    QuestionnaireSession::new(payload.medication_name, questions).ok()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn well_formed_payload_builds_a_session() {
        let payload = json!({
            "medication_name": "Lunesta",
            "questions": [
                { "question": "How well did you sleep?", "answers": ["Well", "Poorly"] },
                { "question": "Any side effects?" }
            ]
        });
        let session = session_from_push(&payload).expect("session from payload");
        assert_eq!(session.medication_name(), "Lunesta");
        assert_eq!(session.questions().len(), 2);
    }

    #[test]
    fn camel_case_medication_name_is_accepted() {
        let payload = json!({
            "medicationName": "Lunesta",
            "questions": [ { "question": "How well did you sleep?", "answers": ["Well"] } ]
        });
        assert!(session_from_push(&payload).is_some());
    }

    #[test]
    fn malformed_payloads_yield_no_session() {
        assert!(session_from_push(&json!(null)).is_none());
        assert!(session_from_push(&json!({ "questions": [] })).is_none());
        assert!(session_from_push(&json!({ "medication_name": "Lunesta" })).is_none());
        assert!(
            session_from_push(&json!({ "medication_name": "Lunesta", "questions": [] })).is_none()
        );
        assert!(session_from_push(&json!("not an object")).is_none());
    }
}
