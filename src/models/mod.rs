//! Data models shared across the benchmark
//!
//! This module contains the query types sent to the quote API.

mod symbols;

pub use symbols::SymbolSet;
