pub mod models;
pub mod utils;

pub use models::{
    Exchange, Indicator, IndicatorResult, Lookback, PricePoint, PriceSeries, RawPriceRow,
    SeriesViolation,
};
