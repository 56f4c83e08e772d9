use anyhow::Result;
use clap::Parser;
use quotegrab_common::observability::{LogConfig, init_logging};
use quotegrab_common::{OutputFormat, QuoteRecord};
use quotegrab_config::{GrabConfig, GrabConfigLoader};
use std::collections::HashSet;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing::{error, warn};

#[derive(Parser, Debug)]
#[command(name = "quotegrab", version, about = "Collect quotes from a paginated listing")]
struct Cli {
    /// Optional YAML config; a missing file falls back to built-in defaults.
    #[arg(long, default_value = "quotegrab.yaml")]
    config: PathBuf,

    /// Override the configured output format (json|text).
    #[arg(long)]
    format: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(LogConfig {
        emit_stderr: true,
        ..LogConfig::default()
    })?;

    // Failures are reported, not propagated: the process always ends
    // normally, matching the historical behavior.
    if let Err(e) = run(cli).await {
        error!(error = %e, "run failed");
    }
    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let cfg: GrabConfig = GrabConfigLoader::new().with_file(&cli.config).load()?;
    let format: OutputFormat = cli
        .format
        .as_deref()
        .unwrap_or(&cfg.output.format)
        .parse()?;

    // Ctrl-C trips the token; the collector unwinds through its normal
    // teardown path so the browser session is still released.
    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("interrupt received; finishing the current page");
                cancel.cancel();
            }
        });
    }

    let records = quotegrab_scrape::collect::run(&cfg, &cancel).await;
    if records.is_empty() {
        warn!("no quotes were collected; check the connection and try again");
        return Ok(());
    }

    summarize(&records);
    quotegrab_scrape::persist::persist(&records, format, &cfg.output)?;
    Ok(())
}

/// Closing report, printed to stdout only on nonempty success.
fn summarize(records: &[QuoteRecord]) {
    let unique_authors: HashSet<&str> = records.iter().map(|r| r.author.as_str()).collect();
    let pages = records.iter().map(|r| r.page).max().unwrap_or(0);

    println!(
        "Collected {} quotes across {} pages ({} unique authors).",
        records.len(),
        pages,
        unique_authors.len()
    );

    if let Some(first) = records.first() {
        println!(
            "First quote: \u{201c}{}\u{201d} by {} [{}]",
            first.text,
            first.author,
            first.tags.join(", ")
        );
    }
}
