//! CLI argument definitions for the Panacea study-data tools.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use panacea_chart::DEFAULT_TOP_EVENTS;

#[derive(Parser)]
#[command(
    name = "panacea",
    version,
    about = "Panacea - Clinical-trial medication data tools",
    long_about = "Inspect clinical-trial study payloads as terminal charts and\n\
                  drive questionnaire sessions against the Panacea data service.\n\
                  Study payloads are the JSON the GraphQL studies query returns."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow patient-answer values in log output.
    ///
    /// Answers are PHI and logged as [REDACTED] by default.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Render a study payload's outcome and adverse-event charts as tables.
    Study(StudyArgs),

    /// Replay a questionnaire session from a push payload and submit it.
    Questionnaire(QuestionnaireArgs),

    /// Search the data service for studies of a medication.
    Search(SearchArgs),
}

#[derive(Parser)]
pub struct StudyArgs {
    /// Path to a study payload JSON file (one study or an array).
    #[arg(value_name = "PAYLOAD")]
    pub payload: PathBuf,

    /// Show only the named outcome metric.
    #[arg(long = "metric", value_name = "NAME")]
    pub metric: Option<String>,

    /// Adverse events to keep before rolling the rest into "Other".
    #[arg(long = "top-events", value_name = "N", default_value_t = DEFAULT_TOP_EVENTS)]
    pub top_events: usize,
}

#[derive(Parser)]
pub struct QuestionnaireArgs {
    /// Path to a questionnaire push payload JSON file.
    #[arg(value_name = "PAYLOAD")]
    pub payload: PathBuf,

    /// Answer to the next question, in order (repeat per question).
    #[arg(long = "answer", value_name = "VALUE")]
    pub answers: Vec<String>,

    /// Submit the batch to this GraphQL endpoint instead of printing it.
    #[arg(long = "endpoint", value_name = "URL")]
    pub endpoint: Option<String>,

    /// Bearer token for the data service.
    #[arg(long = "token", value_name = "TOKEN")]
    pub token: Option<String>,
}

#[derive(Parser)]
pub struct SearchArgs {
    /// Medication search term.
    #[arg(value_name = "TERM")]
    pub term: String,

    /// GraphQL endpoint of the data service.
    #[arg(long = "endpoint", value_name = "URL")]
    pub endpoint: String,

    /// Bearer token for the data service.
    #[arg(long = "token", value_name = "TOKEN")]
    pub token: Option<String>,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
