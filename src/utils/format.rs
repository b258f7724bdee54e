use chrono::{DateTime, Local, Utc};

/// `$123.45000`, the precision used in price tables
pub fn format_price(price: f64) -> String {
    format!("${:.5}", price)
}

/// `$123.45`, the precision used for averages
pub fn format_average(average: f64) -> String {
    format!("${:.2}", average)
}

/// Coefficient with four decimals, or `N/A` when undefined
pub fn format_coefficient(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.4}", v),
        None => "N/A".to_string(),
    }
}

pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

/// Wrap `text` in a 24-bit ANSI background; plain text when color is off
pub fn paint_badge(text: &str, (r, g, b): (u8, u8, u8), color: bool) -> String {
    if !color {
        return format!("[ {} ]", text);
    }
    format!("\x1b[48;2;{};{};{}m\x1b[30m {} \x1b[0m", r, g, b, text)
}
