//! Client for the upstream file storage service.

use crate::error::AnalysisError;
use crate::models::{SubmissionListItem, SubmissionMetadata};
use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::time::Duration;

/// Read access to submissions held by the file storage service.
#[async_trait]
pub trait FileStoringClient: Send + Sync {
    /// Metadata for one submission. Fails with `NotFound` on any non-success status.
    async fn metadata(&self, submission_id: &str) -> Result<SubmissionMetadata, AnalysisError>;

    /// All submissions for an assignment, earliest upload first.
    async fn submissions(&self, assignment_id: &str)
        -> Result<Vec<SubmissionListItem>, AnalysisError>;

    /// Raw file bytes, or `None` when the service answers with a non-success status.
    async fn download(&self, submission_id: &str) -> Result<Option<Vec<u8>>, AnalysisError>;
}

pub struct HttpFileStoringClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpFileStoringClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, AnalysisError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

// Everything except RFC 3986 unreserved characters.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Percent-encodes one URL path segment.
pub fn encode_path_segment(segment: &str) -> String {
    utf8_percent_encode(segment, PATH_SEGMENT).to_string()
}

#[async_trait]
impl FileStoringClient for HttpFileStoringClient {
    async fn metadata(&self, submission_id: &str) -> Result<SubmissionMetadata, AnalysisError> {
        let response = self
            .client
            .get(self.url(&format!("/files/{}/metadata", encode_path_segment(submission_id))))
            .send()
            .await?;

        if !response.status().is_success() {
            tracing::debug!(submission_id, status = %response.status(), "metadata lookup failed");
            return Err(AnalysisError::NotFound(submission_id.to_string()));
        }

        let mut metadata: SubmissionMetadata = response.json().await?;
        if metadata.id.is_empty() {
            metadata.id = submission_id.to_string();
        }
        Ok(metadata)
    }

    async fn submissions(
        &self,
        assignment_id: &str,
    ) -> Result<Vec<SubmissionListItem>, AnalysisError> {
        let response = self
            .client
            .get(self.url(&format!("/files/works/{}/submissions", encode_path_segment(assignment_id))))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AnalysisError::Upstream(format!(
                "listing submissions for assignment {} returned {}",
                assignment_id,
                response.status()
            )));
        }

        Ok(response.json().await?)
    }

    async fn download(&self, submission_id: &str) -> Result<Option<Vec<u8>>, AnalysisError> {
        let response = self
            .client
            .get(self.url(&format!("/files/{}/download", encode_path_segment(submission_id))))
            .send()
            .await?;

        if !response.status().is_success() {
            tracing::debug!(submission_id, status = %response.status(), "download unavailable");
            return Ok(None);
        }

        Ok(Some(response.bytes().await?.to_vec()))
    }
}
