use crate::browser::page::QuotePage;
use anyhow::Result;
use fantoccini::{Client, ClientBuilder};
use serde_json::json;
use std::collections::HashMap;
use tracing::debug;
use webdriver::capabilities::Capabilities;

/// Thin wrapper around a `fantoccini` WebDriver client.
///
/// Owns the browser session for its entire lifetime; [`QuoteDriver::close`]
/// consumes the wrapper so the session can only be torn down once.
pub struct QuoteDriver {
    client: Client,
}

impl QuoteDriver {
    /// Create a new driver connected to a running WebDriver service
    /// (Chromedriver by default, `http://localhost:9515`).
    ///
    /// The sandbox and shared-memory flags keep Chrome viable inside
    /// containers; the fixed viewport keeps the listing layout stable.
    pub async fn new(webdriver_url: &str, headless: bool) -> Result<Self> {
        let mut caps = Capabilities::new();
        let mut chrome_opts = HashMap::new();

        let mut args = vec![
            "--no-sandbox".to_string(),
            "--disable-dev-shm-usage".to_string(),
            "--window-size=1920,1080".to_string(),
        ];
        if headless {
            args.push("--headless".to_string());
            args.push("--disable-gpu".to_string());
        }
        chrome_opts.insert("args".to_string(), json!(args));
        caps.insert("goog:chromeOptions".to_string(), json!(chrome_opts));

        let client = ClientBuilder::native()
            .capabilities(caps)
            .connect(webdriver_url)
            .await?;
        debug!(webdriver_url, headless, "browser session established");

        Ok(Self { client })
    }

    /// Navigate to `url` and return a [`QuotePage`] for element queries.
    pub async fn goto(&mut self, url: &str) -> Result<QuotePage> {
        self.client.goto(url).await?;
        Ok(QuotePage::new(self.client.clone()))
    }

    /// Close the underlying browser session.
    pub async fn close(self) -> Result<()> {
        self.client.close().await?;
        Ok(())
    }
}
