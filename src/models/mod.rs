//! Data models for stock-pulse commands and services
//!
//! Price samples as they come off the wire, the selectable intervals, and the
//! result structs each service hands to the presentation layer.

pub mod correlation;
pub mod interval;
pub mod price;
pub mod stock;

// Re-export commonly used types for convenience
pub use correlation::{Alignment, CorrelationResult, CorrelationStrength};
pub use interval::Interval;
pub use price::{PriceSample, PriceSeries};
pub use stock::{StockListing, StockPageResult};
