pub mod client;
pub mod models;

pub use client::StockApiClient;
pub use models::ApiError;
