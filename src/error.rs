//! Crate-wide error type.
//!
//! Every failure the pipeline can surface is a variant here, so `main` can
//! map errors to stable exit codes:
//!
//! - 2: configuration / validation / schema problems
//! - 3: no usable data
//! - 4: network / retrieval failures

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PollError {
    /// A textual date bound that is not `YYYY-MM-DD`.
    #[error("invalid date '{input}' (expected YYYY-MM-DD)")]
    InvalidDate { input: String },

    /// A candidate name that does not match any column in the data.
    #[error("candidate '{name}' not found in poll data")]
    UnknownCandidate { name: String },

    /// A numeric option outside its allowed range.
    #[error("invalid value for {field}: {message}")]
    InvalidConfig {
        field: &'static str,
        message: String,
    },

    /// A required base column missing from the retrieved table.
    #[error("missing required column `{name}`")]
    MissingColumn { name: &'static str },

    /// No observations where at least one is required.
    #[error("no poll data available: {context}")]
    NoData { context: String },

    /// A required environment variable that is not set.
    #[error("environment variable {name} not set (add it to .env or the environment)")]
    MissingEnv { name: &'static str },

    /// Network or HTML-extraction failure while retrieving polls.
    #[error("failed to retrieve polls: {0}")]
    Fetch(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl PollError {
    pub fn no_data(context: impl Into<String>) -> Self {
        PollError::NoData {
            context: context.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            PollError::InvalidDate { .. }
            | PollError::UnknownCandidate { .. }
            | PollError::InvalidConfig { .. }
            | PollError::MissingColumn { .. }
            | PollError::MissingEnv { .. }
            | PollError::Io(_)
            | PollError::Csv(_) => 2,
            PollError::NoData { .. } => 3,
            PollError::Fetch(_) => 4,
        }
    }
}
