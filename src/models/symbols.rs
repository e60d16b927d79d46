//! Symbol set queried on every request

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Ordered, de-duplicated set of instrument symbols (e.g. `NSE:SBIN-EQ`)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct SymbolSet {
    symbols: Vec<String>,
}

impl SymbolSet {
    /// Build from symbols, trimming whitespace and dropping blanks and repeats
    pub fn new(symbols: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let mut unique: Vec<String> = Vec::new();
        for symbol in symbols {
            let symbol = symbol.into().trim().to_string();
            if !symbol.is_empty() && !unique.contains(&symbol) {
                unique.push(symbol);
            }
        }
        Self { symbols: unique }
    }

    /// Symbols benchmarked when nothing else is configured
    pub fn default_set() -> Self {
        Self::new(["NSE:SBIN-EQ", "NSE:RELIANCE-EQ", "NSE:TCS-EQ"])
    }

    /// Comma-joined form used in the query string
    pub fn query(&self) -> String {
        self.symbols.join(",")
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.symbols.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

impl Default for SymbolSet {
    fn default() -> Self {
        Self::default_set()
    }
}

impl From<Vec<String>> for SymbolSet {
    fn from(symbols: Vec<String>) -> Self {
        Self::new(symbols)
    }
}

impl From<SymbolSet> for Vec<String> {
    fn from(set: SymbolSet) -> Self {
        set.symbols
    }
}

impl FromStr for SymbolSet {
    type Err = std::convert::Infallible;

    /// Parse a comma-separated list
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s.split(',')))
    }
}

impl fmt::Display for SymbolSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbols.join(", "))
    }
}
