use anyhow::Result;
use quotegrab_common::{GrabError, RawQuote};
use quotegrab_config::{GrabConfig, Pacing, Selectors, Waits};
use quotegrab_drivers::browser::pacing::Pacer;
use quotegrab_drivers::browser::page::{PageElement, QuotePage};
use std::time::Duration;
use tracing::warn;

/// One page-at-a-time view of the quote listing.
///
/// `page_quotes` reads the raw quote elements on the current page;
/// `advance` moves to the next page, returning `false` when there is none.
/// A `false` return is the sole termination condition for pagination.
/// `current_url` identifies the page for diagnostics.
#[async_trait::async_trait]
pub trait QuoteSession {
    async fn current_url(&mut self) -> Result<String>;
    async fn page_quotes(&mut self) -> Result<Vec<RawQuote>>;
    async fn advance(&mut self) -> Result<bool>;
}

/// Production [`QuoteSession`] backed by a WebDriver page.
pub struct DriverSession {
    page: QuotePage,
    selectors: Selectors,
    waits: Waits,
    pacing: Pacing,
    pacer: Pacer,
}

impl DriverSession {
    pub fn new(page: QuotePage, cfg: &GrabConfig) -> Self {
        Self {
            page,
            selectors: cfg.selectors.clone(),
            waits: cfg.waits.clone(),
            pacing: cfg.pacing.clone(),
            pacer: Pacer::new(),
        }
    }

    /// Read text, author, and tags out of one quote element.
    ///
    /// A failed DOM read is logged and leaves the corresponding field unset;
    /// the caller decides whether the partial result survives. The site
    /// wraps quote bodies in curly quote marks, which are stripped.
    async fn read_quote(&self, element: &PageElement, index: usize) -> RawQuote {
        let mut raw = RawQuote::default();

        match child_text(element, &self.selectors.text).await {
            Ok(text) => {
                raw.text = Some(
                    text.trim_matches(|c| c == '\u{201c}' || c == '\u{201d}' || c == '"')
                        .to_string(),
                );
            }
            Err(e) => warn!(index, error = %e, "failed to read quote text"),
        }

        match child_text(element, &self.selectors.author).await {
            Ok(author) => raw.author = Some(author),
            Err(e) => warn!(index, error = %e, "failed to read quote author"),
        }

        match element.find_elements(&self.selectors.tag).await {
            Ok(tag_elements) => {
                for tag in tag_elements {
                    match tag.text().await {
                        Ok(t) => raw.tags.push(t),
                        Err(e) => warn!(index, error = %e, "failed to read a tag"),
                    }
                }
            }
            Err(e) => warn!(index, error = %e, "failed to query tags"),
        }

        raw
    }
}

async fn child_text(element: &PageElement, selector: &str) -> Result<String> {
    element.find_element(selector).await?.text().await
}

#[async_trait::async_trait]
impl QuoteSession for DriverSession {
    async fn current_url(&mut self) -> Result<String> {
        self.page.current_url().await
    }

    /// Wait for the quote elements on the current page and extract each one.
    ///
    /// The bounded wait expiring surfaces as [`GrabError::Timeout`]; zero
    /// matches after a successful wait yields an empty vector.
    async fn page_quotes(&mut self) -> Result<Vec<RawQuote>> {
        self.page
            .wait_for_element(
                &self.selectors.quote,
                Duration::from_secs(self.waits.page_secs),
            )
            .await
            .map_err(|_| GrabError::Timeout)?;

        let elements = self.page.find_elements(&self.selectors.quote).await?;
        let mut quotes = Vec::with_capacity(elements.len());
        for (i, element) in elements.iter().enumerate() {
            quotes.push(self.read_quote(element, i + 1).await);
        }
        Ok(quotes)
    }

    /// Scroll to the "next" control and click it.
    ///
    /// An absent or late control is the normal end of the listing and maps
    /// to `Ok(false)`; failures after the control was found propagate.
    async fn advance(&mut self) -> Result<bool> {
        let next = match self
            .page
            .wait_for_element(
                &self.selectors.next,
                Duration::from_secs(self.waits.next_secs),
            )
            .await
        {
            Ok(el) => el,
            Err(_) => return Ok(false),
        };

        next.scroll_into_view().await?;
        self.pacer.settle(self.pacing.scroll_settle_ms).await;
        next.click().await?;
        self.pacer.settle(self.pacing.page_settle_ms).await;
        Ok(true)
    }
}
