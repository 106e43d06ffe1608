use std::path::PathBuf;
use thiserror::Error;

/// Failures that abort an analysis request.
///
/// A missing download for the word cloud is not one of these: that step
/// reports its outcome through [`crate::word_cloud::WordCloud`] instead.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The file storage service has no metadata for the submission.
    #[error("Submission {0} not found in file storage")]
    NotFound(String),

    /// The file storage service could not be reached or answered with an error.
    #[error("File storage request failed: {0}")]
    Upstream(String),

    #[error("Failed to write report file {}: {source}", path.display())]
    ReportWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize report: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The report store rejected the report.
    #[error("Failed to register report: {0}")]
    Store(String),
}

impl From<reqwest::Error> for AnalysisError {
    fn from(e: reqwest::Error) -> Self {
        AnalysisError::Upstream(e.to_string())
    }
}
