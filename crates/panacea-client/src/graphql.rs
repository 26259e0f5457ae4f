//! GraphQL-shaped data-service client.
//!
//! Both operations are single-shot request/response calls; retry policy is
//! the caller's concern (the questionnaire session retries submissions on
//! user request).

use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, warn};

use panacea_model::{AnswerBatch, Study, SubmitReceipt};
use panacea_session::{ResponseSubmitter, SubmitError};

use crate::error::{ClientError, Result};
use crate::identity::IdentityProvider;

const SEARCH_STUDIES_QUERY: &str = "\
query Studies($searchTerm: String!) {
  studies(searchTerm: $searchTerm) {
    studyInfo { title funding institution dates { start completion } summary }
    participants {
      total
      groups { groupName dosage ageCategory size }
      demographics { gender { female male } dropoutRate }
    }
    adverseEvents {
      summary
      common { event percentage }
      serious { event count }
    }
    outcomes
  }
}";

const SUBMIT_RESPONSES_MUTATION: &str = "\
mutation SubmitResponses($batch: AnswerBatchInput!) {
  submitResponses(batch: $batch) { success message }
}";

#[derive(Debug, Deserialize)]
struct GraphQlEnvelope<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlErrorEntry>,
}

#[derive(Debug, Deserialize)]
struct GraphQlErrorEntry {
    message: String,
}

#[derive(Debug, Deserialize)]
struct StudiesData {
    studies: Vec<Study>,
}

#[derive(Debug, Deserialize)]
struct SubmitData {
    #[serde(rename = "submitResponses")]
    submit_responses: SubmitReceipt,
}

/// Client for the study data service.
///
/// The identity provider supplies the bearer credential attached to every
/// request; a 401 from the service surfaces as
/// [`ClientError::NotAuthenticated`] so the UI can ask the user to
/// re-authenticate.
#[derive(Debug)]
pub struct GraphQlClient<P> {
    endpoint: String,
    http: reqwest::Client,
    identity: P,
}

impl<P: IdentityProvider> GraphQlClient<P> {
    pub fn new(endpoint: impl Into<String>, identity: P) -> Self {
        Self {
            endpoint: endpoint.into(),
            http: reqwest::Client::new(),
            identity,
        }
    }

    pub fn identity(&self) -> &P {
        &self.identity
    }

    /// Fetch the studies matching a medication search term.
    pub async fn search_studies(&self, term: &str) -> Result<Vec<Study>> {
        let body = search_request_body(term);
        let response = self.post(&body).await?;
        let studies = parse_studies_response(response)?;
        for study in &studies {
            if let Err(error) = study.validate() {
                // Served data violating the model invariant is displayable
                // anyway; flag it for the operators.
                warn!(%error, title = %study.study_info.title, "study payload failed validation");
            }
        }
        debug!(term, count = studies.len(), "search complete");
        Ok(studies)
    }

    /// Transmit a session's answer batch.
    pub async fn submit_responses(&self, batch: &AnswerBatch) -> Result<SubmitReceipt> {
        let body = submit_request_body(batch)?;
        let response = self.post(&body).await?;
        parse_submit_response(response)
    }

    async fn post(&self, body: &Value) -> Result<Value> {
        let token = self.identity.bearer_token()?;
        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(token)
            .json(body)
            .send()
            .await?;
        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(ClientError::NotAuthenticated);
        }
        let response = response.error_for_status()?;
        Ok(response.json().await?)
    }
}

impl<P: IdentityProvider + Send + Sync> ResponseSubmitter for GraphQlClient<P> {
    async fn submit_batch(
        &self,
        batch: &AnswerBatch,
    ) -> std::result::Result<SubmitReceipt, SubmitError> {
        self.submit_responses(batch)
            .await
            .map_err(|error| SubmitError::with_source("submitResponses call failed", error))
    }
}

fn search_request_body(term: &str) -> Value {
    json!({
        "query": SEARCH_STUDIES_QUERY,
        "variables": { "searchTerm": term },
    })
}

fn submit_request_body(batch: &AnswerBatch) -> Result<Value> {
    Ok(json!({
        "query": SUBMIT_RESPONSES_MUTATION,
        "variables": { "batch": serde_json::to_value(batch)? },
    }))
}

fn parse_studies_response(response: Value) -> Result<Vec<Study>> {
    let envelope: GraphQlEnvelope<StudiesData> = serde_json::from_value(response)?;
    into_data(envelope).map(|data| data.studies)
}

fn parse_submit_response(response: Value) -> Result<SubmitReceipt> {
    let envelope: GraphQlEnvelope<SubmitData> = serde_json::from_value(response)?;
    into_data(envelope).map(|data| data.submit_responses)
}

fn into_data<T>(envelope: GraphQlEnvelope<T>) -> Result<T> {
    if !envelope.errors.is_empty() {
        let messages: Vec<String> = envelope
            .errors
            .into_iter()
            .map(|entry| entry.message)
            .collect();
        return Err(ClientError::GraphQl(messages.join("; ")));
    }
    envelope
        .data
        .ok_or_else(|| ClientError::GraphQl("response carried no data".to_string()))
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use panacea_model::BatchAnswer;

    use super::*;

    #[test]
    fn search_body_names_the_search_term() {
        let body = search_request_body("Lunesta");
        assert_eq!(body["variables"]["searchTerm"], "Lunesta");
        assert!(
            body["query"]
                .as_str()
                .unwrap()
                .contains("studies(searchTerm: $searchTerm)")
        );
    }

    #[test]
    fn submit_body_serializes_the_batch_camel_cased() {
        let submitted_at = Utc::now();
        let batch = AnswerBatch {
            medication_name: "Lunesta".to_string(),
            submitted_at,
            answers: vec![BatchAnswer {
                question_id: panacea_model::QuestionId::new("q1"),
                value: "Very well".to_string(),
                asked_at: submitted_at,
                responded_at: submitted_at,
            }],
        };
        let body = submit_request_body(&batch).expect("body");
        let wire = &body["variables"]["batch"];
        assert_eq!(wire["medicationName"], "Lunesta");
        assert_eq!(wire["answers"][0]["questionId"], "q1");
        assert!(wire["answers"][0]["respondedAt"].is_string());
    }

    #[test]
    fn studies_response_parses_into_the_model() {
        let response = json!({
            "data": {
                "studies": [{
                    "studyInfo": { "title": "A Phase III Study" },
                    "outcomes": [
                        { "name": "Sleep Latency", "units": "minutes", "groups": [] }
                    ]
                }]
            }
        });
        let studies = parse_studies_response(response).expect("parse");
        assert_eq!(studies.len(), 1);
        assert_eq!(studies[0].outcomes[0].name, "Sleep Latency");
    }

    #[test]
    fn graphql_errors_surface_as_client_errors() {
        let response = json!({
            "data": null,
            "errors": [
                { "message": "Authorization header missing or malformed" }
            ]
        });
        let error = parse_studies_response(response).unwrap_err();
        assert!(matches!(error, ClientError::GraphQl(message)
            if message.contains("Authorization header")));
    }

    #[test]
    fn submit_response_parses_the_receipt() {
        let response = json!({
            "data": { "submitResponses": { "success": true, "message": "Recorded" } }
        });
        let receipt = parse_submit_response(response).expect("parse");
        assert!(receipt.success);
        assert_eq!(receipt.message.as_deref(), Some("Recorded"));
    }
}
