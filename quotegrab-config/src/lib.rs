//! Loader for the scraper configuration with YAML + environment overlays.
//!
//! Every field has a default that reproduces the stock behavior (scrape
//! `quotes.toscrape.com` headlessly through a local Chromedriver), so the
//! binary runs with no file and no environment at all. A `quotegrab.yaml`
//! file, when present, overrides the defaults, and `QUOTEGRAB_`-prefixed
//! environment variables override the file.
use config::{Config, Environment, File};
use quotegrab_common::GrabError;
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;

/// Top-level runtime configuration for a scrape run.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GrabConfig {
    /// First page to visit.
    pub start_url: String,
    /// WebDriver endpoint the browser session is created against.
    pub webdriver_url: String,
    /// Run the browser without a visible window.
    pub headless: bool,
    pub selectors: Selectors,
    pub waits: Waits,
    pub pacing: Pacing,
    pub output: Output,
}

impl Default for GrabConfig {
    fn default() -> Self {
        Self {
            start_url: "http://quotes.toscrape.com/".into(),
            webdriver_url: "http://localhost:9515".into(),
            headless: true,
            selectors: Selectors::default(),
            waits: Waits::default(),
            pacing: Pacing::default(),
            output: Output::default(),
        }
    }
}

/// CSS selectors anchoring the extraction.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Selectors {
    /// One quote container per record.
    pub quote: String,
    /// Quote body, child of the container.
    pub text: String,
    /// Author name, child of the container.
    pub author: String,
    /// Zero or more tag elements, children of the container.
    pub tag: String,
    /// Pagination control; absence terminates the run.
    pub next: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            quote: ".quote".into(),
            text: ".text".into(),
            author: ".author".into(),
            tag: ".tag".into(),
            next: "li.next a".into(),
        }
    }
}

/// Bounded wait durations, in seconds. Expiry is never retried.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Waits {
    /// Wait for the first quote element after the initial navigation.
    pub initial_load_secs: u64,
    /// Wait for quote elements on each subsequent page.
    pub page_secs: u64,
    /// Wait for the "next" control before declaring the run complete.
    pub next_secs: u64,
}

impl Default for Waits {
    fn default() -> Self {
        Self {
            initial_load_secs: 10,
            page_secs: 10,
            next_secs: 5,
        }
    }
}

/// Settle pauses between navigation steps, in milliseconds.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Pacing {
    /// Pause after scrolling the "next" control into view.
    pub scroll_settle_ms: u64,
    /// Pause after clicking through to the next page.
    pub page_settle_ms: u64,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            scroll_settle_ms: 500,
            page_settle_ms: 1000,
        }
    }
}

/// Output file selection. Paths are relative to the working directory.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Output {
    /// `json` or `text`.
    pub format: String,
    pub json_path: String,
    pub text_path: String,
}

impl Default for Output {
    fn default() -> Self {
        Self {
            format: "json".into(),
            json_path: "quotes_coletadas.json".into(),
            text_path: "quotes_coletadas.txt".into(),
        }
    }
}

impl GrabConfig {
    /// Reject configurations that cannot possibly drive a session.
    pub fn validate(&self) -> Result<(), GrabError> {
        url::Url::parse(&self.start_url)
            .map_err(|e| GrabError::Config(format!("invalid start_url: {e}")))?;
        url::Url::parse(&self.webdriver_url)
            .map_err(|e| GrabError::Config(format!("invalid webdriver_url: {e}")))?;
        if self.selectors.quote.trim().is_empty() {
            return Err(GrabError::Config("selectors.quote is empty".into()));
        }
        Ok(())
    }
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Builder hiding the `config` crate wiring (YAML + env overrides).
pub struct GrabConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for GrabConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl GrabConfigLoader {
    /// Start with an empty source stack; the `QUOTEGRAB_` environment
    /// source is merged last, in [`GrabConfigLoader::load`], so it wins
    /// over any attached file.
    ///
    /// ```
    /// use quotegrab_config::GrabConfigLoader;
    ///
    /// let config = GrabConfigLoader::new().load().expect("defaults load");
    /// assert_eq!(config.start_url, "http://quotes.toscrape.com/");
    /// assert!(config.headless);
    /// ```
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
        }
    }

    /// Attach a YAML/TOML/JSON file. A missing file is not an error, so the
    /// binary works file-less out of the box.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Allow tests/CLI to merge inline YAML snippets.
    ///
    /// ```
    /// use quotegrab_config::GrabConfigLoader;
    ///
    /// let cfg = GrabConfigLoader::new()
    ///     .with_yaml_str("waits:\n  next_secs: 2\noutput:\n  format: text")
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(cfg.waits.next_secs, 2);
    /// assert_eq!(cfg.waits.page_secs, 10);
    /// assert_eq!(cfg.output.format, "text");
    /// ```
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Consume the builder and deserialize the merged sources.
    ///
    /// `QUOTEGRAB_`-prefixed environment variables are merged here, after
    /// every file source, so they override file values. `${VAR}`
    /// placeholders in string values are expanded (recursively, with a
    /// depth cap) before the strongly typed config materialises.
    pub fn load(self) -> Result<GrabConfig, GrabError> {
        let cfg = self
            .builder
            .add_source(
                Environment::with_prefix("QUOTEGRAB")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(|e| GrabError::Config(e.to_string()))?;

        let mut v: Value = cfg
            .try_deserialize()
            .map_err(|e| GrabError::Config(e.to_string()))?;
        expand_env_in_value(&mut v);

        let typed: GrabConfig =
            serde_json::from_value(v).map_err(|e| GrabError::Config(e.to_string()))?;

        typed.validate()?;
        Ok(typed)
    }
}
