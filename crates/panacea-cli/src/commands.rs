use std::fs;

use anyhow::{Context, Result, bail};
use tracing::{debug, info, warn};

use panacea_chart::{
    ChartConfig, EventAggregator, grouped_bar_input, normalize_payload, pie_input,
};
use panacea_client::{GraphQlClient, StaticTokenProvider};
use panacea_model::{AnswerBatch, Study, SubmitReceipt};
use panacea_session::{ResponseSubmitter, SessionState, SubmitError, session_from_push};
use panacea_cli::logging::redact_value;

use crate::cli::{QuestionnaireArgs, SearchArgs, StudyArgs};
use crate::summary::{events_table, outcome_table, studies_table};
use crate::types::{StudyRunResult, StudySummary};

pub fn run_study(args: &StudyArgs) -> Result<StudyRunResult> {
    let raw = fs::read_to_string(&args.payload)
        .with_context(|| format!("read {}", args.payload.display()))?;
    let studies = parse_studies(&raw)?;
    info!(studies = studies.len(), "loaded study payload");

    let config = ChartConfig {
        top_n: args.top_events,
        ..ChartConfig::default()
    };
    let aggregator = EventAggregator::new(&config);

    let mut result = StudyRunResult::default();
    for study in &studies {
        if let Err(error) = study.validate() {
            warn!(%error, title = %study.study_info.title, "study payload failed validation");
        }
        let mut summary = StudySummary {
            title: study.study_info.title.clone(),
            outcomes_charted: 0,
            outcomes_empty: 0,
            event_slices: 0,
            errors: Vec::new(),
        };

        println!("Study: {}", study.study_info.title);
        if let Some(institution) = &study.study_info.institution {
            println!("Institution: {institution}");
        }

        for outcome in &study.outcomes {
            if let Some(metric) = &args.metric {
                if metric != &outcome.name {
                    continue;
                }
            }
            match normalize_payload(outcome) {
                Ok(series) if series.is_empty() => {
                    println!("\n{}: no data", outcome.name);
                    summary.outcomes_empty += 1;
                }
                Ok(series) => {
                    let input = grouped_bar_input(&series, &config.palette);
                    println!("\n{}", outcome.name);
                    println!("{}", outcome_table(outcome.units.as_deref(), &input));
                    summary.outcomes_charted += 1;
                }
                Err(error) => {
                    warn!(%error, metric = %outcome.name, "skipping unreadable outcome");
                    summary.errors.push(error.to_string());
                }
            }
        }

        let events = aggregator.summarize(&study.adverse_events.common);
        match pie_input(&events, &config.palette) {
            Some(input) => {
                println!("\nAdverse events");
                println!("{}", events_table(&input));
                summary.event_slices = input.slices.len();
            }
            None => println!("\nNo adverse events data available."),
        }

        result.has_errors |= !summary.errors.is_empty();
        result.summaries.push(summary);
    }
    Ok(result)
}

pub fn run_questionnaire(args: &QuestionnaireArgs) -> Result<()> {
    let raw = fs::read_to_string(&args.payload)
        .with_context(|| format!("read {}", args.payload.display()))?;
    let payload: serde_json::Value =
        serde_json::from_str(&raw).context("parse push payload JSON")?;

    let Some(mut session) = session_from_push(&payload) else {
        println!("No data available for the questionnaire.");
        return Ok(());
    };
    info!(
        medication = session.medication_name(),
        questions = session.questions().len(),
        "questionnaire session started"
    );

    for answer in &args.answers {
        let question_id = match session.current_question() {
            Some(question) => question.id.clone(),
            None => bail!(
                "got {} answers but the questionnaire has only {} questions",
                args.answers.len(),
                session.questions().len()
            ),
        };
        debug!(question = %question_id, answer = redact_value(answer), "answering");
        session.answer(answer.as_str())?;
        session.advance()?;
    }

    match session.state() {
        SessionState::ReadyToSubmit => {}
        SessionState::InProgress { position } => {
            let prompt = session
                .current_question()
                .map(|question| question.prompt.clone())
                .unwrap_or_default();
            bail!(
                "questionnaire incomplete: question {} of {} still unanswered (\"{prompt}\")",
                position + 1,
                session.questions().len()
            );
        }
        state => bail!("session is unexpectedly {}", state.name()),
    }

    let receipt = match &args.endpoint {
        Some(endpoint) => {
            let client = GraphQlClient::new(endpoint, identity_from_token(args.token.as_deref()));
            runtime()?.block_on(session.submit(&client))?
        }
        None => runtime()?.block_on(session.submit(&StdoutSubmitter))?,
    };
    println!(
        "Submitted {} answers for {}: {}",
        session.questions().len(),
        session.medication_name(),
        receipt.message.as_deref().unwrap_or("ok")
    );
    Ok(())
}

pub fn run_search(args: &SearchArgs) -> Result<()> {
    let client = GraphQlClient::new(&args.endpoint, identity_from_token(args.token.as_deref()));
    let studies = runtime()?.block_on(client.search_studies(&args.term))?;
    if studies.is_empty() {
        println!("No studies found for '{}'.", args.term);
        return Ok(());
    }
    println!("{}", studies_table(&studies));
    Ok(())
}

/// Prints the assembled batch instead of transmitting it; the offline
/// stand-in for the data service.
struct StdoutSubmitter;

impl ResponseSubmitter for StdoutSubmitter {
    async fn submit_batch(&self, batch: &AnswerBatch) -> Result<SubmitReceipt, SubmitError> {
        let json = serde_json::to_string_pretty(batch)
            .map_err(|error| SubmitError::with_source("serialize batch", error))?;
        println!("{json}");
        Ok(SubmitReceipt {
            success: true,
            message: Some("batch printed (no endpoint given)".to_string()),
        })
    }
}

fn identity_from_token(token: Option<&str>) -> StaticTokenProvider {
    match token {
        Some(token) => StaticTokenProvider::with_token("cli", token),
        None => StaticTokenProvider::signed_out(),
    }
}

fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("build async runtime")
}

fn parse_studies(raw: &str) -> Result<Vec<Study>> {
    let value: serde_json::Value = serde_json::from_str(raw).context("parse payload JSON")?;
    match value {
        serde_json::Value::Array(_) => {
            serde_json::from_value(value).context("parse study array")
        }
        serde_json::Value::Object(_) => {
            Ok(vec![serde_json::from_value(value).context("parse study")?])
        }
        _ => bail!("payload must be a study object or an array of studies"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_study_and_array_payloads_both_parse() {
        let single = r#"{ "studyInfo": { "title": "A" } }"#;
        let array = r#"[{ "studyInfo": { "title": "A" } }, { "studyInfo": { "title": "B" } }]"#;

        assert_eq!(parse_studies(single).unwrap().len(), 1);
        assert_eq!(parse_studies(array).unwrap().len(), 2);
        assert!(parse_studies("42").is_err());
    }
}
