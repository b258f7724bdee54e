pub mod format;
pub mod table;

pub use format::{format_average, format_coefficient, format_price, format_timestamp, paint_badge};
pub use table::{Align, Table};
