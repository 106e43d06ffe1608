use analysis_service::{
    analysis::{AnalysisService, ReportsDir},
    config::AppConfig,
    file_storing::HttpFileStoringClient,
    logging,
    routes::{self, AppState},
    storage::JsonReportStorage,
};
use anyhow::{Context, Result};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::from_env()?;
    let _log_guard = logging::init(&config);

    let reports_path = config.reports_dir();
    let reports_dir = ReportsDir::init(&reports_path).with_context(|| {
        format!("Failed to create reports directory {}", reports_path.display())
    })?;
    let store = JsonReportStorage::open(config.store_file())?;
    let files = HttpFileStoringClient::new(&config.file_storing_url, config.http_timeout)
        .context("Failed to build file storage client")?;

    let app_state = Arc::new(AppState {
        analysis: AnalysisService::new(
            Arc::new(files),
            Arc::new(store),
            reports_dir,
            config.wordcloud_url.clone(),
        ),
    });

    let app = routes::router(app_state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    tracing::info!(
        %addr,
        file_storing = %config.file_storing_url,
        reports_dir = %reports_path.display(),
        "Analysis service running"
    );
    tracing::info!("POST /analysis/trigger - Analyse a submission");
    tracing::info!("GET  /analysis/reports/by-work/:assignment_id - List reports for an assignment");

    axum::serve(listener, app)
        .await
        .context("Server error")?;
    Ok(())
}
