//! Correlation models and badge classification

use chrono::Duration;

use super::Interval;

/// How two series are paired before correlating them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    /// Truncate both to the shorter length and pair in the order received
    #[default]
    ReceiptOrder,
    /// Pair each sample with the nearest-in-time sample of the other series
    NearestTimestamp { tolerance: Duration },
}

/// Display band for a correlation coefficient
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorrelationStrength {
    StrongPositive,
    ModeratePositive,
    Weak,
    ModerateNegative,
    StrongNegative,
    NotAvailable,
}

impl CorrelationStrength {
    /// Bands in legend order with their range text
    pub const LEGEND: [(CorrelationStrength, &'static str); 5] = [
        (CorrelationStrength::StrongPositive, "0.7 to 1"),
        (CorrelationStrength::ModeratePositive, "0.3 to 0.7"),
        (CorrelationStrength::Weak, "-0.3 to 0.3"),
        (CorrelationStrength::ModerateNegative, "-0.7 to -0.3"),
        (CorrelationStrength::StrongNegative, "-1 to -0.7"),
    ];

    /// Lower bounds are inclusive. `None` is the undefined coefficient.
    pub fn classify(value: Option<f64>) -> Self {
        match value {
            None => CorrelationStrength::NotAvailable,
            Some(v) if v >= 0.7 => CorrelationStrength::StrongPositive,
            Some(v) if v >= 0.3 => CorrelationStrength::ModeratePositive,
            Some(v) if v >= -0.3 => CorrelationStrength::Weak,
            Some(v) if v >= -0.7 => CorrelationStrength::ModerateNegative,
            Some(_) => CorrelationStrength::StrongNegative,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CorrelationStrength::StrongPositive => "Strong Positive",
            CorrelationStrength::ModeratePositive => "Moderate Positive",
            CorrelationStrength::Weak => "Weak/No Correlation",
            CorrelationStrength::ModerateNegative => "Moderate Negative",
            CorrelationStrength::StrongNegative => "Strong Negative",
            CorrelationStrength::NotAvailable => "N/A",
        }
    }

    /// Hex color of the badge
    pub fn color(self) -> &'static str {
        match self {
            CorrelationStrength::StrongPositive => "#28a745",
            CorrelationStrength::ModeratePositive => "#ffc107",
            CorrelationStrength::Weak => "#ADD8E6",
            CorrelationStrength::ModerateNegative => "#fd7e14",
            CorrelationStrength::StrongNegative => "#dc3545",
            CorrelationStrength::NotAvailable => "#ccc",
        }
    }

    /// Badge color as RGB, for terminals with 24-bit color
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            CorrelationStrength::StrongPositive => (0x28, 0xa7, 0x45),
            CorrelationStrength::ModeratePositive => (0xff, 0xc1, 0x07),
            CorrelationStrength::Weak => (0xad, 0xd8, 0xe6),
            CorrelationStrength::ModerateNegative => (0xfd, 0x7e, 0x14),
            CorrelationStrength::StrongNegative => (0xdc, 0x35, 0x45),
            CorrelationStrength::NotAvailable => (0xcc, 0xcc, 0xcc),
        }
    }
}

/// Result of a pairwise correlation query
#[derive(Debug, Clone)]
pub struct CorrelationResult {
    pub ticker_a: String,
    pub ticker_b: String,
    pub interval: Interval,
    /// `None` when either series is empty or has no variance
    pub coefficient: Option<f64>,
    /// Number of sample pairs that went into the coefficient
    pub samples_used: usize,
    pub strength: CorrelationStrength,
}
