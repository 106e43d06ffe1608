//! End-to-end analysis of one submission: authorship ordering, word cloud,
//! then a report written to disk and registered in the report store.

use crate::error::AnalysisError;
use crate::file_storing::FileStoringClient;
use crate::models::Report;
use crate::similarity;
use crate::storage::ReportRepository;
use crate::word_cloud;
use chrono::Utc;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Directory that holds one JSON artifact per report.
///
/// Created once by [`ReportsDir::init`]; report writes assume it exists.
#[derive(Debug, Clone)]
pub struct ReportsDir(PathBuf);

impl ReportsDir {
    pub fn init(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        std::fs::create_dir_all(&path)?;
        Ok(Self(path))
    }

    pub fn path(&self) -> &Path {
        &self.0
    }

    pub fn report_path(&self, report_id: &str) -> PathBuf {
        self.0.join(format!("{}.json", report_id))
    }
}

pub struct AnalysisService {
    files: Arc<dyn FileStoringClient>,
    reports: Arc<dyn ReportRepository>,
    reports_dir: ReportsDir,
    wordcloud_url: String,
}

impl AnalysisService {
    pub fn new(
        files: Arc<dyn FileStoringClient>,
        reports: Arc<dyn ReportRepository>,
        reports_dir: ReportsDir,
        wordcloud_url: impl Into<String>,
    ) -> Self {
        Self {
            files,
            reports,
            reports_dir,
            wordcloud_url: wordcloud_url.into(),
        }
    }

    /// Analyses a submission and persists the resulting report.
    ///
    /// Fails if the submission is unknown, the file storage service errors on
    /// metadata or listing, or the report cannot be written or registered. A
    /// missing download only leaves `word_cloud_url` empty. Concurrent calls
    /// for the same submission each produce their own report.
    pub async fn analyze(&self, submission_id: &str) -> Result<Report, AnalysisError> {
        let (metadata, verdict) = similarity::resolve(self.files.as_ref(), submission_id).await?;
        tracing::info!(
            submission_id,
            assignment_id = %metadata.assignment_id,
            suspected = verdict.is_plagiarism_suspected,
            similar = ?verdict.similar_submission_id,
            "Resolved submission ordering"
        );

        let cloud = word_cloud::build(self.files.as_ref(), submission_id, &self.wordcloud_url).await;

        let id = Report::new_id();
        let report = Report {
            report_path: self.reports_dir.report_path(&id),
            id,
            submission_id: submission_id.to_string(),
            student_name: metadata.student_name,
            assignment_id: metadata.assignment_id,
            is_plagiarism_suspected: verdict.is_plagiarism_suspected,
            similar_submission_id: verdict.similar_submission_id,
            created_at: Utc::now(),
            word_cloud_url: cloud.into_url(),
        };

        self.write_artifact(&report).await?;
        // The artifact stays on disk if registration fails.
        self.reports.add(&report).await?;

        tracing::info!(
            submission_id,
            report_id = %report.id,
            path = %report.report_path.display(),
            "Report persisted"
        );
        Ok(report)
    }

    pub async fn reports_by_assignment(
        &self,
        assignment_id: &str,
    ) -> Result<Vec<Report>, AnalysisError> {
        self.reports.by_assignment(assignment_id).await
    }

    async fn write_artifact(&self, report: &Report) -> Result<(), AnalysisError> {
        let json = serde_json::to_string_pretty(report)?;
        tokio::fs::write(&report.report_path, json)
            .await
            .map_err(|source| AnalysisError::ReportWrite {
                path: report.report_path.clone(),
                source,
            })
    }
}
