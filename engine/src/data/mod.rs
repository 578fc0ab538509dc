// Raw price data: provider rows in, validated series out.
pub mod adapter;
pub mod csv_parser;
pub mod source;

pub use adapter::normalize;
pub use source::{CsvPriceSource, PriceSource};
