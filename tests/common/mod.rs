#![allow(dead_code)]

use analysis_service::analysis::{AnalysisService, ReportsDir};
use analysis_service::file_storing::HttpFileStoringClient;
use analysis_service::storage::JsonReportStorage;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

pub const CLOUD_BASE: &str = "https://quickchart.io/wordcloud";

/// In-process stand-in for the file storage service.
#[derive(Default, Clone)]
pub struct FakeFileStoring {
    metadata: HashMap<String, Value>,
    lists: HashMap<String, Result<Value, StatusCode>>,
    downloads: HashMap<String, Result<Vec<u8>, StatusCode>>,
    download_delays: HashMap<String, Duration>,
}

impl FakeFileStoring {
    /// Registers submissions in upload order. Each is `(id, student)`.
    pub fn assignment(mut self, assignment_id: &str, submissions: &[(&str, &str)]) -> Self {
        let mut list = Vec::new();
        for (i, (id, student)) in submissions.iter().enumerate() {
            self.metadata.insert(
                id.to_string(),
                json!({
                    "studentName": student,
                    "assignmentId": assignment_id,
                    "uploadedAt": format!("2024-03-01T10:{:02}:00Z", i),
                    "fileName": format!("{}.txt", id),
                }),
            );
            list.push(json!({ "id": id, "studentName": student, "assignmentId": assignment_id }));
        }
        self.lists.insert(assignment_id.to_string(), Ok(Value::Array(list)));
        self
    }

    pub fn content(mut self, submission_id: &str, body: &[u8]) -> Self {
        self.downloads.insert(submission_id.to_string(), Ok(body.to_vec()));
        self
    }

    pub fn download_status(mut self, submission_id: &str, status: StatusCode) -> Self {
        self.downloads.insert(submission_id.to_string(), Err(status));
        self
    }

    /// Holds the download response back for `delay`.
    pub fn slow_download(mut self, submission_id: &str, delay: Duration) -> Self {
        self.download_delays.insert(submission_id.to_string(), delay);
        self
    }

    pub fn list_status(mut self, assignment_id: &str, status: StatusCode) -> Self {
        self.lists.insert(assignment_id.to_string(), Err(status));
        self
    }

    /// Serves the fake on an ephemeral port and returns its base URL.
    pub async fn serve(self) -> String {
        let app = Router::new()
            .route("/files/works/:assignment_id/submissions", get(list))
            .route("/files/:id/metadata", get(metadata))
            .route("/files/:id/download", get(download))
            .with_state(Arc::new(self));
        spawn(app).await
    }
}

async fn metadata(State(fake): State<Arc<FakeFileStoring>>, Path(id): Path<String>) -> Response {
    match fake.metadata.get(&id) {
        Some(meta) => Json(meta.clone()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn list(
    State(fake): State<Arc<FakeFileStoring>>,
    Path(assignment_id): Path<String>,
) -> Response {
    match fake.lists.get(&assignment_id) {
        Some(Ok(list)) => Json(list.clone()).into_response(),
        Some(Err(status)) => (*status).into_response(),
        None => Json(json!([])).into_response(),
    }
}

async fn download(State(fake): State<Arc<FakeFileStoring>>, Path(id): Path<String>) -> Response {
    if let Some(delay) = fake.download_delays.get(&id) {
        tokio::time::sleep(*delay).await;
    }
    match fake.downloads.get(&id) {
        Some(Ok(bytes)) => bytes.clone().into_response(),
        Some(Err(status)) => (*status).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

pub async fn spawn(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

/// A service wired to the given file storage URL with fresh temp storage.
pub struct Harness {
    pub service: AnalysisService,
    pub store: Arc<JsonReportStorage>,
    pub reports_dir: ReportsDir,
    pub tmp: TempDir,
}

pub fn harness(file_storing_url: &str) -> Harness {
    let tmp = tempfile::tempdir().unwrap();
    let reports_dir = ReportsDir::init(tmp.path().join("reports")).unwrap();
    let store = Arc::new(JsonReportStorage::open(tmp.path().join("reports.json")).unwrap());
    let files = HttpFileStoringClient::new(file_storing_url, Duration::from_secs(5)).unwrap();

    let service = AnalysisService::new(
        Arc::new(files),
        store.clone(),
        reports_dir.clone(),
        CLOUD_BASE,
    );

    Harness {
        service,
        store,
        reports_dir,
        tmp,
    }
}

pub fn artifact_count(dir: &ReportsDir) -> usize {
    std::fs::read_dir(dir.path()).unwrap().count()
}
