//! Common types shared across the quotegrab crates.
//!
//! This crate defines the quote record model, the output-format selector,
//! observability helpers, and shared error types used throughout the
//! workspace. It is intentionally lightweight so every crate can depend on
//! it without heavy transitive costs.
//!
//! # Overview
//!
//! - [`QuoteRecord`]: one extracted quote, immutable once built
//! - [`RawQuote`]: per-element extraction result before validation
//! - [`OutputFormat`]: persistence format selector
//! - [`observability`]: centralised tracing/logging initialisation
//! - [`GrabError`] and [`Result`]: shared error handling
use serde::{Deserialize, Serialize};

pub mod observability;

/// One quote as collected from the site.
///
/// The serialized field names (`citacao`, `autor`, `tags`, `pagina`) are
/// fixed by the output file format and must not change. Tag order is DOM
/// order; `page` is the 1-based page the quote was found on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteRecord {
    #[serde(rename = "citacao")]
    pub text: String,
    #[serde(rename = "autor")]
    pub author: String,
    pub tags: Vec<String>,
    #[serde(rename = "pagina")]
    pub page: u32,
}

/// Raw per-element extraction result, before validation.
///
/// The driver layer fills in whatever it could read from one quote element;
/// the collector decides whether the element yields a [`QuoteRecord`] or is
/// skipped because a required field is missing.
#[derive(Debug, Clone, Default)]
pub struct RawQuote {
    pub text: Option<String>,
    pub author: Option<String>,
    pub tags: Vec<String>,
}

impl RawQuote {
    /// Promote to a [`QuoteRecord`] on `page`, or `None` if a required
    /// field is absent.
    pub fn into_record(self, page: u32) -> Option<QuoteRecord> {
        Some(QuoteRecord {
            text: self.text?,
            author: self.author?,
            tags: self.tags,
            page,
        })
    }
}

/// Persistence format for collected quotes.
///
/// This is a closed enum on purpose: an unrecognized format string fails at
/// parse time instead of silently producing no output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    Text,
}

impl std::str::FromStr for OutputFormat {
    type Err = GrabError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "text" | "txt" => Ok(Self::Text),
            other => Err(GrabError::Format(other.to_string())),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json => f.write_str("json"),
            Self::Text => f.write_str("text"),
        }
    }
}

/// Error types used across the quotegrab system.
#[derive(thiserror::Error, Debug)]
pub enum GrabError {
    /// The browser driver (WebDriver session, navigation) reported an error.
    #[error("Driver error: {0}")]
    Driver(#[from] anyhow::Error),

    /// Configuration was incomplete or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// An unrecognized output format selector.
    #[error("Unrecognized output format: {0:?} (expected \"json\" or \"text\")")]
    Format(String),

    /// Writing the output file failed.
    #[error("Persist error: {0}")]
    Persist(#[source] std::io::Error),

    /// Encoding records for the output file failed.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// A bounded wait expired.
    #[error("Timeout occurred")]
    Timeout,
}

/// Convenient alias for results that use [`GrabError`].
pub type Result<T> = std::result::Result<T, GrabError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_parses_known_values() {
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("TXT".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert_eq!(" text ".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
    }

    #[test]
    fn format_rejects_unknown_values() {
        let err = "yaml".parse::<OutputFormat>().unwrap_err();
        assert!(matches!(err, GrabError::Format(ref s) if s == "yaml"));
    }

    #[test]
    fn raw_quote_requires_text_and_author() {
        let complete = RawQuote {
            text: Some("A witty line".into()),
            author: Some("Someone".into()),
            tags: vec!["wit".into()],
        };
        let record = complete.into_record(3).unwrap();
        assert_eq!(record.page, 3);
        assert_eq!(record.tags, vec!["wit".to_string()]);

        let missing_author = RawQuote {
            text: Some("A witty line".into()),
            author: None,
            tags: vec![],
        };
        assert!(missing_author.into_record(3).is_none());
    }

    #[test]
    fn record_serializes_with_fixed_field_names() {
        let record = QuoteRecord {
            text: "Ser ou não ser".into(),
            author: "Shakespeare".into(),
            tags: vec!["vida".into(), "dúvida".into()],
            page: 1,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["citacao"], "Ser ou não ser");
        assert_eq!(json["autor"], "Shakespeare");
        assert_eq!(json["pagina"], 1);
        assert_eq!(json["tags"][1], "dúvida");
    }
}
