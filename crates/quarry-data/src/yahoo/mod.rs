//! Yahoo Finance data provider.

pub mod interval;
pub mod quotes;

pub use interval::Interval;
pub use quotes::{YahooQuoteProvider, quotes_to_frame};
