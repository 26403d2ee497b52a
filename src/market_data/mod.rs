pub mod series;

// Re-export for convenient access (e.g. `use crate::market_data::Series`).
pub use series::{PriceBar, Series};
