use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("duplicate outcome metric '{0}' in study")]
    DuplicateMetric(String),
    #[error("choice question '{0}' has an empty option list")]
    EmptyChoiceOptions(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
