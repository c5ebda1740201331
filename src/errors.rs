use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalculatorError {
    #[error("invalid input: {details}")]
    InvalidInput {
        details: String,
    },
}

impl CalculatorError {
    pub fn invalid(details: impl Into<String>) -> Self {
        CalculatorError::InvalidInput {
            details: details.into(),
        }
    }

    /// the human readable part, without the error kind prefix
    pub fn details(&self) -> &str {
        match self {
            CalculatorError::InvalidInput { details } => details,
        }
    }
}

/// errors loading or validating a [`crate::config::CalculatorConfig`]
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, CalculatorError>;
