//! Driver layer for browser automation.
//!
//! This crate exposes the WebDriver session wrapper and page/element helpers
//! the collector uses to walk the quote listing.
//!
//! - [`browser::driver::QuoteDriver`]: WebDriver client wrapper with
//!   headless/sandbox options and guaranteed single teardown
//! - [`browser::page::QuotePage`]: bounded element waits and CSS queries
//! - [`browser::pacing::Pacer`]: settle pauses between navigation steps
pub mod browser;
