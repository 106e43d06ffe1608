use crate::error::AnalysisError;
use crate::models::Report;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::fs;
use std::path::PathBuf;
use tokio::sync::RwLock;

/// Durable registry of analysis reports.
#[async_trait]
pub trait ReportRepository: Send + Sync {
    async fn add(&self, report: &Report) -> Result<(), AnalysisError>;

    async fn by_assignment(&self, assignment_id: &str) -> Result<Vec<Report>, AnalysisError>;
}

/// Reports kept in memory and mirrored to a single JSON file.
pub struct JsonReportStorage {
    path: PathBuf,
    reports: RwLock<Vec<Report>>,
}

impl JsonReportStorage {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let reports = if path.exists() {
            let data = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read report store {}", path.display()))?;
            serde_json::from_str(&data)
                .with_context(|| format!("Failed to parse report store {}", path.display()))?
        } else {
            Vec::new()
        };

        Ok(Self {
            path,
            reports: RwLock::new(reports),
        })
    }

    async fn append(&self, report: &Report) -> Result<()> {
        let mut reports = self.reports.write().await;
        reports.push(report.clone());
        if let Err(e) = self.save_to_disk(&reports).await {
            reports.pop();
            return Err(e);
        }
        Ok(())
    }

    fn staging_path(&self) -> PathBuf {
        let mut staging = self.path.clone().into_os_string();
        staging.push(".tmp");
        PathBuf::from(staging)
    }

    /// Writes the whole store to a staging file, then renames it over the store
    /// so a crash mid-write leaves the previous contents intact.
    async fn save_to_disk(&self, reports: &[Report]) -> Result<()> {
        let json = serde_json::to_string_pretty(reports)
            .context("Failed to serialize reports")?;
        let staging = self.staging_path();
        tokio::fs::write(&staging, json)
            .await
            .with_context(|| format!("Failed to write report store {}", staging.display()))?;
        tokio::fs::rename(&staging, &self.path)
            .await
            .with_context(|| format!("Failed to replace report store {}", self.path.display()))?;
        Ok(())
    }
}

#[async_trait]
impl ReportRepository for JsonReportStorage {
    async fn add(&self, report: &Report) -> Result<(), AnalysisError> {
        self.append(report)
            .await
            .map_err(|e| AnalysisError::Store(format!("{:#}", e)))
    }

    async fn by_assignment(&self, assignment_id: &str) -> Result<Vec<Report>, AnalysisError> {
        let reports = self.reports.read().await;
        Ok(reports
            .iter()
            .filter(|r| r.assignment_id == assignment_id)
            .cloned()
            .collect())
    }
}
