// Fact-check CLI
//
// Analyzes one claim or URL and prints the report as pretty JSON.
//
// Usage:
//   kodegen-factcheck [--history] <claim or URL...>
//
// Reads GEMINI_API_KEY (required), GEMINI_MODEL, GOOGLE_SEARCH_API_KEY and
// GOOGLE_SEARCH_ENGINE_ID from the environment. Logs go to stderr, filtered
// by RUST_LOG (default `info`).

use anyhow::{Context, Result, bail};
use kodegen_tools_factcheck::{
    ContentFetcher, EvidenceOrchestrator, FactCheckConfig, GeminiClient, GoogleSearchClient,
    HistoryStore, InMemoryHistoryStore,
};
use tracing::info;

const USAGE: &str = "Usage: kodegen-factcheck [--history] <claim or URL...>";

#[tokio::main]
async fn main() -> Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let mut keep_history = false;
    let mut words = Vec::new();
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--history" => keep_history = true,
            "-h" | "--help" => {
                println!("{USAGE}");
                return Ok(());
            }
            _ => words.push(arg),
        }
    }
    let input = words.join(" ");
    if input.trim().is_empty() {
        bail!("{USAGE}");
    }

    let config = FactCheckConfig::from_env().context("Failed to load configuration")?;
    let search = GoogleSearchClient::from_config(&config).context("Failed to create search client")?;
    let fetcher = ContentFetcher::from_config(&config).context("Failed to create content fetcher")?;
    let judge = GeminiClient::from_config(&config).context("Failed to create judgment client")?;

    let orchestrator = EvidenceOrchestrator::from_config(&config, search, fetcher, judge);
    let report = orchestrator.analyze(&input).await.context("Analysis failed")?;

    println!(
        "{}",
        serde_json::to_string_pretty(&report).context("Failed to serialize report")?
    );

    if keep_history {
        let history = InMemoryHistoryStore::new();
        let entry = history.append(&input, report);
        info!(id = %entry.id, "Report stored in history");
        println!(
            "{}",
            serde_json::to_string_pretty(&history.statistics())
                .context("Failed to serialize history statistics")?
        );
    }

    Ok(())
}
