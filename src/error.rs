//! Error types for catalog report rendering

use thiserror::Error;

/// Main error type for report rendering
///
/// Missing data on an element is never an error; it renders as the configured
/// sentinel. Only configuration problems and enrichment failures surface here.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Parsing error: {0}")]
    Parse(String),

    #[error("No Default report spec is registered for output format {format}")]
    MissingDefaultSpec { format: String },

    #[error("Unknown output format: {0}")]
    UnknownOutputFormat(String),

    #[error("Report spec '{spec}' names enrichment hook '{hook}', which is not registered")]
    MissingHook { spec: String, hook: String },

    #[error("Enrichment hook '{hook}' failed: {source}")]
    Enrichment {
        hook: String,
        #[source]
        source: anyhow::Error,
    },
}

/// Result type alias for report operations
pub type ReportResult<T> = Result<T, ReportError>;

impl From<serde_json::Error> for ReportError {
    fn from(err: serde_json::Error) -> Self {
        ReportError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for ReportError {
    fn from(err: toml::de::Error) -> Self {
        ReportError::Parse(err.to_string())
    }
}

impl From<toml::ser::Error> for ReportError {
    fn from(err: toml::ser::Error) -> Self {
        ReportError::Serialization(err.to_string())
    }
}

impl From<std::fmt::Error> for ReportError {
    fn from(err: std::fmt::Error) -> Self {
        ReportError::Serialization(err.to_string())
    }
}

impl ReportError {
    /// True for errors caused by how the registry or config was set up
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            ReportError::Configuration(_)
                | ReportError::MissingDefaultSpec { .. }
                | ReportError::MissingHook { .. }
                | ReportError::UnknownOutputFormat(_)
        )
    }
}
