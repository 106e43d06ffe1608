use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

/// Metadata for one submission as reported by the file storage service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionMetadata {
    #[serde(default)]
    pub id: String,
    pub student_name: String,
    pub assignment_id: String,
    pub uploaded_at: String,
    pub file_name: String,
}

/// One entry of an assignment's submission list, earliest upload first.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionListItem {
    pub id: String,
    pub student_name: String,
}

/// The persisted result of analysing a single submission.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: String,
    pub submission_id: String,
    pub student_name: String,
    pub assignment_id: String,
    pub is_plagiarism_suspected: bool,
    pub similar_submission_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub report_path: PathBuf,
    pub word_cloud_url: Option<String>,
}

impl Report {
    /// Fresh report id. Ids are never reused.
    pub fn new_id() -> String {
        Uuid::new_v4().to_string()
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerAnalysisRequest {
    pub submission_id: String,
}
