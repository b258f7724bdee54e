pub mod chart_service;
pub mod correlation_service;
pub mod stock_service;
