//! HTTP client module for the quote API
//!
//! Provides the authenticated client whose round trips are being measured.

mod client;

pub use client::{ClientError, QuoteClient, QuoteResponse, QuoteSource};
