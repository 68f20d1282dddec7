use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use jobscout_client::{CardExtractor, ReqwestFetcher};
use jobscout_core::{
    DEFAULT_LOCATION, FetchOrchestrator, FetchRequest, JobRecord, SearchConfig, sanitize_records,
};

#[derive(Parser)]
#[command(name = "jobscout", version, about = "Public job listing search")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search job listings, print them and export them as CSV
    Search {
        /// Keywords to search for (empty searches every category)
        #[arg(short, long, default_value = "")]
        query: String,

        /// Location to search in
        #[arg(short, long, default_value = DEFAULT_LOCATION)]
        location: String,

        /// Number of result pages to walk (values below 1 count as 1)
        #[arg(short, long, default_value_t = 1, allow_negative_numbers = true)]
        pages: i64,

        /// CSV output path (defaults to jobs_linkedin_<timestamp>.csv)
        #[arg(long, conflicts_with = "no_csv")]
        csv: Option<PathBuf>,

        /// Only print the listing, do not write a CSV file
        #[arg(long, default_value_t = false)]
        no_csv: bool,

        /// Listing endpoint to query
        #[arg(
            long,
            env = "JOBSCOUT_SEARCH_URL",
            default_value = jobscout_core::config::DEFAULT_SEARCH_URL
        )]
        search_url: String,

        /// Pause between result pages, in milliseconds
        #[arg(long, env = "JOBSCOUT_PAGE_DELAY_MS", default_value_t = jobscout_core::config::DEFAULT_PAGE_DELAY_MS)]
        page_delay_ms: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("jobscout=info".parse()?))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Search {
            query,
            location,
            pages,
            csv,
            no_csv,
            search_url,
            page_delay_ms,
        } => {
            let config = SearchConfig::new(&search_url)?
                .with_page_delay(Duration::from_millis(page_delay_ms));
            let request = FetchRequest::new(query, location, pages);
            let jobs = cmd_search(config, &request).await?;

            print!("{}", render_listing(&jobs));

            if !no_csv && !jobs.is_empty() {
                let path = csv.unwrap_or_else(default_csv_path);
                write_csv(&jobs, &path)?;
                println!("\n{} jobs saved to: {}", jobs.len(), path.display());
            }
        }
    }

    Ok(())
}

async fn cmd_search(config: SearchConfig, request: &FetchRequest) -> Result<Vec<JobRecord>> {
    let fetcher = ReqwestFetcher::new().context("Failed to create HTTP client")?;
    let extractor =
        CardExtractor::new(config.search_url.clone()).context("Failed to build extractor")?;
    let orchestrator = FetchOrchestrator::new(fetcher, extractor, config);

    let report = orchestrator
        .fetch_report(request)
        .await
        .context("Search failed")?;

    if report.failed_pages() > 0 {
        tracing::warn!(
            failed_pages = report.failed_pages(),
            "Some result pages could not be fetched"
        );
    }

    Ok(sanitize_records(report.records))
}

fn default_csv_path() -> PathBuf {
    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    PathBuf::from(format!("jobs_linkedin_{timestamp}.csv"))
}

/// Write jobs as CSV with a `title,company,location,link,posted_date` header.
fn write_csv(jobs: &[JobRecord], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;
    for job in jobs {
        writer
            .serialize(job)
            .with_context(|| format!("Failed to write CSV row to {}", path.display()))?;
    }
    writer.flush().context("Failed to flush CSV file")?;
    Ok(())
}

/// Numbered, human-readable listing for the console.
fn render_listing(jobs: &[JobRecord]) -> String {
    if jobs.is_empty() {
        return "\nNo jobs found.\n".to_string();
    }

    let rule = "=".repeat(60);
    let separator = "-".repeat(60);
    let mut out = String::new();

    let _ = writeln!(out, "\n{rule}");
    let _ = writeln!(out, "JOBS FOUND: {}", jobs.len());
    let _ = writeln!(out, "{rule}\n");

    for (i, job) in jobs.iter().enumerate() {
        let _ = writeln!(out, "{}. {}", i + 1, job.title);
        let _ = writeln!(out, "   Company: {}", job.company);
        let _ = writeln!(out, "   Location: {}", job.location);
        let _ = writeln!(out, "   Posted: {}", job.posted_date);
        let _ = writeln!(out, "   Link: {}", job.link);
        let _ = writeln!(out, "{separator}");
    }

    out
}
