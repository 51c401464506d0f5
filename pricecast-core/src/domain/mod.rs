//! Domain types: bars, price and return series, macro benchmarks.

pub mod bar;
pub mod benchmark;
pub mod series;

pub use bar::Bar;
pub use benchmark::{MacroBenchmark, MacroSeries};
pub use series::{PriceSeries, ReturnSeries, SeriesError};
