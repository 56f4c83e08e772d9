use crate::session::{DriverSession, QuoteSession};
use anyhow::{Context, Result};
use quotegrab_common::{GrabError, QuoteRecord};
use quotegrab_config::GrabConfig;
use quotegrab_drivers::browser::driver::QuoteDriver;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Visit the start page and every page reachable via the "next" control,
/// returning the ordered records found, or an empty sequence if browser
/// startup or the initial page load fails.
///
/// After a successful startup the browser session is torn down on every
/// exit path, including cancellation.
pub async fn run(cfg: &GrabConfig, cancel: &CancellationToken) -> Vec<QuoteRecord> {
    let mut driver = match QuoteDriver::new(&cfg.webdriver_url, cfg.headless).await {
        Ok(driver) => {
            info!("browser session initialised");
            driver
        }
        Err(e) => {
            error!(error = %e, "failed to initialise the browser");
            return Vec::new();
        }
    };

    let records = match open_listing(&mut driver, cfg).await {
        Ok(mut session) => collect_quotes(&mut session, cancel).await,
        Err(e) => {
            error!(error = %e, url = %cfg.start_url, "initial page load failed");
            Vec::new()
        }
    };

    info!("closing the browser");
    if let Err(e) = driver.close().await {
        warn!(error = %e, "browser teardown reported an error");
    }

    records
}

/// Navigate to the start URL and wait for the first quote element.
async fn open_listing(driver: &mut QuoteDriver, cfg: &GrabConfig) -> Result<DriverSession> {
    info!(url = %cfg.start_url, "navigating to start page");
    let page = driver.goto(&cfg.start_url).await?;

    page.wait_for_element(
        &cfg.selectors.quote,
        Duration::from_secs(cfg.waits.initial_load_secs),
    )
    .await
    .map_err(|_| GrabError::Timeout)
    .context("page took too long to load")?;

    Ok(DriverSession::new(page, cfg))
}

/// The pagination loop.
///
/// Termination: no "next" control, a page-level wait expiring, a page with
/// zero quote elements, an unexpected navigation error, or cancellation.
/// All but the first keep partial results and are logged. A quote element
/// missing a required field is skipped; its siblings are still processed.
pub async fn collect_quotes<S>(session: &mut S, cancel: &CancellationToken) -> Vec<QuoteRecord>
where
    S: QuoteSession + ?Sized,
{
    let mut records = Vec::new();
    let mut page: u32 = 1;

    loop {
        if cancel.is_cancelled() {
            info!(page, "cancellation requested; keeping partial results");
            break;
        }

        match session.current_url().await {
            Ok(url) => info!(page, url = %url, "scraping page"),
            Err(_) => info!(page, "scraping page"),
        }
        let raw_quotes = match session.page_quotes().await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(page, error = %e, "quote elements did not load");
                break;
            }
        };
        if raw_quotes.is_empty() {
            info!(page, "no quotes found on current page");
            break;
        }

        for (index, raw) in raw_quotes.into_iter().enumerate() {
            match raw.into_record(page) {
                Some(record) => records.push(record),
                None => {
                    warn!(page, index = index + 1, "quote missing required fields; skipped")
                }
            }
        }

        match session.advance().await {
            Ok(true) => page += 1,
            Ok(false) => {
                info!(pages = page, "no further pages");
                break;
            }
            Err(e) => {
                warn!(page, error = %e, "failed to reach the next page; keeping partial results");
                break;
            }
        }
    }

    records
}
