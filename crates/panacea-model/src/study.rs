//! Study metadata and participant demographics.

use serde::{Deserialize, Serialize};

use crate::adverse::AdverseEventReport;
use crate::error::ModelError;
use crate::outcome::OutcomePayload;
use crate::questionnaire::QuestionKind;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StudyDates {
    /// Start month, "YYYY-MM".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion: Option<String>,
}

/// Header-card metadata for one clinical study.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudyInfo {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub funding: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub institution: Option<String>,
    #[serde(default)]
    pub dates: StudyDates,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

/// One enrollment cohort: dosage arm crossed with a demographic bucket.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantGroup {
    pub group_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dosage: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age_category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenderSplit {
    #[serde(default)]
    pub female: u32,
    #[serde(default)]
    pub male: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Demographics {
    #[serde(default)]
    pub gender: GenderSplit,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dropout_rate: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Participants {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u32>,
    #[serde(default)]
    pub groups: Vec<ParticipantGroup>,
    #[serde(default)]
    pub demographics: Demographics,
}

/// Everything the app presents for one study of a medication.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Study {
    pub study_info: StudyInfo,
    #[serde(default)]
    pub participants: Participants,
    #[serde(default)]
    pub adverse_events: AdverseEventReport,
    /// Outcome metrics in their raw wire form; parsed by the chart pipeline.
    #[serde(default, alias = "metrics")]
    pub outcomes: Vec<OutcomePayload>,
}

impl Study {
    /// Check the structural invariants the rest of the pipeline assumes:
    /// metric names are unique within the study's outcome set.
    pub fn validate(&self) -> Result<(), ModelError> {
        let mut seen: Vec<&str> = Vec::new();
        for outcome in &self.outcomes {
            if seen.contains(&outcome.name.as_str()) {
                return Err(ModelError::DuplicateMetric(outcome.name.clone()));
            }
            seen.push(outcome.name.as_str());
        }
        Ok(())
    }

    pub fn outcome(&self, metric_name: &str) -> Option<&OutcomePayload> {
        self.outcomes.iter().find(|o| o.name == metric_name)
    }
}

/// Validate a questionnaire question set before a session starts: choice
/// questions must carry at least one allowed answer.
pub fn validate_questions(
    questions: &[crate::questionnaire::QuestionnaireQuestion],
) -> Result<(), ModelError> {
    for question in questions {
        if let QuestionKind::Choice { options } = &question.kind {
            if options.is_empty() {
                return Err(ModelError::EmptyChoiceOptions(question.id.to_string()));
            }
        }
    }
    Ok(())
}
