use analysis_service::file_storing::encode_path_segment;
use chrono::{DateTime, Local, Utc};
use clap::{Parser, Subcommand};
use prettytable::{Cell, Row, Table};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "analysis-cli")]
#[command(about = "A CLI tool for analysing submissions and viewing reports", long_about = None)]
struct Cli {
    #[arg(long, global = true, default_value = "http://localhost:3000", help = "Analysis service URL")]
    api_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Analyse an uploaded submission")]
    Analyze {
        #[arg(short, long, help = "The submission ID")]
        submission_id: String,
    },

    #[command(about = "List reports for an assignment")]
    Reports {
        #[arg(short, long, help = "The assignment ID")]
        assignment_id: String,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TriggerAnalysisRequest {
    submission_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Report {
    id: String,
    submission_id: String,
    student_name: String,
    is_plagiarism_suspected: bool,
    similar_submission_id: Option<String>,
    created_at: DateTime<Utc>,
    report_path: String,
    word_cloud_url: Option<String>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Analyze { submission_id } => analyze(&cli.api_url, submission_id).await,
        Commands::Reports { assignment_id } => list_reports(&cli.api_url, &assignment_id).await,
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

async fn analyze(api_url: &str, submission_id: String) -> Result<(), Box<dyn std::error::Error>> {
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/analysis/trigger", api_url))
        .json(&TriggerAnalysisRequest { submission_id })
        .send()
        .await?;

    if !response.status().is_success() {
        let error_text = response.text().await?;
        return Err(format!("Analysis failed: {}", error_text).into());
    }

    let report: Report = response.json().await?;

    println!("✅ Analysis complete!");
    println!("   Report: {}", report.id);
    println!("   Student: {}", report.student_name);
    if report.is_plagiarism_suspected {
        println!(
            "   ⚠️  Suspected: earlier submission {}",
            report.similar_submission_id.as_deref().unwrap_or("-")
        );
    } else {
        println!("   Suspected: no");
    }
    println!("   Saved to: {}", report.report_path);
    match report.word_cloud_url {
        Some(url) => println!("   Word cloud: {}", url),
        None => println!("   Word cloud: unavailable"),
    }

    Ok(())
}

async fn list_reports(api_url: &str, assignment_id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let client = reqwest::Client::new();

    let response = client
        .get(reports_url(api_url, assignment_id))
        .send()
        .await?;

    if !response.status().is_success() {
        let error_text = response.text().await?;
        return Err(format!("Failed to fetch reports: {}", error_text).into());
    }

    let reports: Vec<Report> = response.json().await?;

    if reports.is_empty() {
        println!("📭 No reports found for assignment {}.", assignment_id);
        return Ok(());
    }

    println!("\n📋 Reports for {} ({})\n", assignment_id, reports.len());

    let mut table = Table::new();
    table.add_row(Row::new(vec![
        Cell::new("Report"),
        Cell::new("Submission"),
        Cell::new("Student"),
        Cell::new("Suspected"),
        Cell::new("Similar To"),
        Cell::new("Created"),
        Cell::new("Cloud"),
    ]));

    for report in reports {
        let created = report.created_at.with_timezone(&Local);
        let similar = report.similar_submission_id.unwrap_or_else(|| "-".to_string());

        table.add_row(Row::new(vec![
            Cell::new(short_id(&report.id)),
            Cell::new(short_id(&report.submission_id)),
            Cell::new(&report.student_name),
            Cell::new(if report.is_plagiarism_suspected { "yes" } else { "no" }),
            Cell::new(short_id(&similar)),
            Cell::new(&created.format("%Y-%m-%d %H:%M:%S").to_string()),
            Cell::new(if report.word_cloud_url.is_some() { "yes" } else { "-" }),
        ]));
    }

    table.printstd();
    println!();

    Ok(())
}

fn reports_url(api_url: &str, assignment_id: &str) -> String {
    format!(
        "{}/analysis/reports/by-work/{}",
        api_url.trim_end_matches('/'),
        encode_path_segment(assignment_id)
    )
}

fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assignment_id_is_encoded_in_reports_url() {
        assert_eq!(
            reports_url("http://localhost:3000/", "hw/1?draft#a"),
            "http://localhost:3000/analysis/reports/by-work/hw%2F1%3Fdraft%23a"
        );
        assert_eq!(
            reports_url("http://localhost:3000", "hw1"),
            "http://localhost:3000/analysis/reports/by-work/hw1"
        );
    }

    #[test]
    fn short_id_handles_short_values() {
        assert_eq!(short_id("abcdefghijkl"), "abcdefgh");
        assert_eq!(short_id("-"), "-");
    }
}
