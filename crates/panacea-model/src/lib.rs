pub mod adverse;
pub mod error;
pub mod outcome;
pub mod questionnaire;
pub mod study;

pub use adverse::{AdverseEvent, AdverseEventReport, SeriousEvent};
pub use error::{ModelError, Result};
pub use outcome::{DosageGroup, NormalizedSeries, OutcomePayload, StudyOutcome};
pub use questionnaire::{
    AnswerBatch, BatchAnswer, QuestionId, QuestionKind, QuestionnaireQuestion, RecordedAnswer,
    SubmitReceipt,
};
pub use study::{
    Demographics, GenderSplit, ParticipantGroup, Participants, Study, StudyDates, StudyInfo,
    validate_questions,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_metric_rejected() {
        let study = Study {
            study_info: StudyInfo {
                title: "A Phase III Study".to_string(),
                funding: None,
                institution: None,
                dates: StudyDates::default(),
                summary: None,
            },
            participants: Participants::default(),
            adverse_events: AdverseEventReport::default(),
            outcomes: vec![
                OutcomePayload {
                    name: "Sleep Latency".to_string(),
                    chart_type: None,
                    description: None,
                    units: Some("minutes".to_string()),
                    groups: serde_json::Value::Null,
                },
                OutcomePayload {
                    name: "Sleep Latency".to_string(),
                    chart_type: None,
                    description: None,
                    units: None,
                    groups: serde_json::Value::Null,
                },
            ],
        };
        assert!(matches!(
            study.validate(),
            Err(ModelError::DuplicateMetric(name)) if name == "Sleep Latency"
        ));
    }

    #[test]
    fn empty_choice_options_rejected() {
        let questions = vec![QuestionnaireQuestion::choice("q1", "How was it?", vec![])];
        assert!(matches!(
            validate_questions(&questions),
            Err(ModelError::EmptyChoiceOptions(id)) if id == "q1"
        ));
    }
}
