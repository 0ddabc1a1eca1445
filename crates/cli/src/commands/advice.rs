//! Prompt preview and analysis commands.
//!
//! # Environment Variables
//!
//! - `GEMINI_API_KEY` - Required for `analyze`
//! - `GEMINI_MODEL`, `GEMINI_API_URL`, `GEMINI_TEMPERATURE`,
//!   `GEMINI_MAX_OUTPUT_TOKENS` - Optional model settings
//! - `ADVISOR_TIMEOUT_SECS` - Seconds before an analysis gives up
//! - `ADVISOR_LANGUAGE` - Language the advice is written in

use std::time::Duration;

use tracing::{info, warn};

use kirana_mitra_advisor::config::DEFAULT_LANGUAGE;
use kirana_mitra_advisor::{AdvisorConfig, AdvisoryEngine, build_prompt};
use kirana_mitra_core::{AdvisoryReport, Completion, InventoryStore, ReportSource, ShopSession};

/// Print the prompt an analysis of `store` would send.
#[allow(clippy::print_stdout)]
pub fn prompt(store: &InventoryStore) {
    dotenvy::dotenv().ok();
    let language =
        std::env::var("ADVISOR_LANGUAGE").unwrap_or_else(|_| DEFAULT_LANGUAGE.to_string());

    let prompt = build_prompt(&store.snapshot(), &language);
    println!("--- system ---");
    println!("{}", prompt.system);
    println!();
    println!("--- user ---");
    println!("{}", prompt.user);
}

/// Run one analysis and print the report.
///
/// # Errors
///
/// Returns an error if configuration is missing or invalid, or the client
/// cannot be built. Failures of the analysis itself produce a degraded
/// report instead.
pub async fn analyze(
    store: InventoryStore,
    timeout_secs: Option<u64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AdvisorConfig::from_env()?;
    if let Some(secs) = timeout_secs {
        config.timeout = Duration::from_secs(secs);
    }

    let engine = AdvisoryEngine::from_config(&config)?;
    info!(model = %config.gemini.model, timeout = ?config.timeout, "Starting analysis");

    let mut session = ShopSession::new(store);
    let request = session.begin_analysis();
    let (ticket, report) = engine.analyze_request(request).await;

    if session.complete_analysis(ticket, report) == Completion::Stale {
        warn!(sequence = ticket.sequence(), "Analysis superseded");
        return Ok(());
    }
    if let Some(report) = session.report() {
        print_report(report);
    }
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_report(report: &AdvisoryReport) {
    match report.source {
        ReportSource::Generated => {
            for (title, body) in [
                ("Status", &report.status),
                ("Actions", &report.actions),
                ("Fast sellers", &report.fast_sellers),
                ("Advice", &report.advice),
            ] {
                println!("{title}");
                println!("{}", "-".repeat(title.len()));
                println!("{body}");
                println!();
            }
        }
        ReportSource::Unstructured | ReportSource::Degraded => println!("{}", report.advice),
    }
}
