//! Collector and persister for the quote listing.
//!
//! The collector walks the paginated listing through a browser session and
//! returns a flat, ordered sequence of [`quotegrab_common::QuoteRecord`]s.
//! The persister writes that sequence to disk in one of two formats. Control
//! flows strictly collector → persister.
//!
//! The pagination loop is written against the [`session::QuoteSession`]
//! trait so its skip and termination semantics are testable without a
//! browser; [`session::DriverSession`] is the production implementation.
pub mod collect;
pub mod persist;
pub mod session;
