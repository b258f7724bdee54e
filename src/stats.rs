//! Descriptive and paired statistics over price series
//!
//! Nothing in here panics or returns an error. Empty or degenerate input
//! degrades to `0.0` or `None`; callers decide how to present it.

use chrono::Duration;

use crate::models::PriceSample;

/// Arithmetic mean. Empty input yields NaN, so callers guard it.
pub fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Unbiased (n - 1) standard deviation; 0 for fewer than two values
pub fn sample_std_dev(values: &[f64], mean: f64) -> f64 {
    let n = values.len();
    if n <= 1 {
        return 0.0;
    }

    let sum_of_squares: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    (sum_of_squares / (n - 1) as f64).sqrt()
}

/// Sample covariance of two equal-length sequences; 0 for fewer than two pairs.
/// Extra values of the longer sequence are ignored.
pub fn covariance(values_a: &[f64], mean_a: f64, values_b: &[f64], mean_b: f64) -> f64 {
    let n = values_a.len().min(values_b.len());
    if n <= 1 {
        return 0.0;
    }

    let sum_of_products: f64 = values_a
        .iter()
        .zip(values_b)
        .map(|(a, b)| (a - mean_a) * (b - mean_b))
        .sum();

    sum_of_products / (n - 1) as f64
}

/// Average of the `price` field, `None` when there is nothing to average
pub fn average_price(samples: &[PriceSample]) -> Option<f64> {
    if samples.is_empty() {
        return None;
    }
    let prices: Vec<f64> = samples.iter().map(|s| s.price).collect();
    Some(mean(&prices))
}

/// Pearson correlation of two series paired in receipt order.
///
/// Both series are truncated to the shorter length before pairing; no
/// timestamp matching happens here (see [`pearson_correlation_aligned`]).
/// Returns `None` when either series is empty or either side has zero variance.
pub fn pearson_correlation(series_a: &[PriceSample], series_b: &[PriceSample]) -> Option<f64> {
    if series_a.is_empty() || series_b.is_empty() {
        return None;
    }

    let n = series_a.len().min(series_b.len());
    let values_a: Vec<f64> = series_a[..n].iter().map(|s| s.price).collect();
    let values_b: Vec<f64> = series_b[..n].iter().map(|s| s.price).collect();

    correlation_of(&values_a, &values_b)
}

/// Pearson correlation over samples paired by nearest timestamp, along with
/// the number of pairs it rests on.
///
/// Pairs farther apart than `tolerance` are dropped before the coefficient is
/// computed, so the count may be lower than either series holds.
pub fn pearson_correlation_aligned(
    series_a: &[PriceSample],
    series_b: &[PriceSample],
    tolerance: Duration,
) -> (Option<f64>, usize) {
    let (values_a, values_b) = align_by_timestamp(series_a, series_b, tolerance);
    if values_a.is_empty() {
        return (None, 0);
    }
    (correlation_of(&values_a, &values_b), values_a.len())
}

/// Pair prices of `series_a` with the nearest unused sample of `series_b`.
///
/// Both inputs are sorted chronologically first. Matching is greedy and
/// monotonic: once a sample of `series_b` is used, nothing before it is
/// considered again. This is not a globally optimal matching; a sample of
/// `series_b` goes to the first sample of `series_a` within tolerance, even
/// when a later one is closer.
pub fn align_by_timestamp(
    series_a: &[PriceSample],
    series_b: &[PriceSample],
    tolerance: Duration,
) -> (Vec<f64>, Vec<f64>) {
    let mut sorted_a: Vec<&PriceSample> = series_a.iter().collect();
    sorted_a.sort_by_key(|s| s.observed_at);
    let mut sorted_b: Vec<&PriceSample> = series_b.iter().collect();
    sorted_b.sort_by_key(|s| s.observed_at);

    let tolerance_ms = tolerance.num_milliseconds().abs();
    let mut values_a = Vec::new();
    let mut values_b = Vec::new();
    let mut next_b = 0;

    for sample in sorted_a {
        let mut best: Option<(usize, i64)> = None;

        for (idx, candidate) in sorted_b.iter().enumerate().skip(next_b) {
            let gap = (candidate.observed_at - sample.observed_at)
                .num_milliseconds()
                .abs();
            match best {
                Some((_, best_gap)) if gap >= best_gap => break,
                _ => best = Some((idx, gap)),
            }
        }

        if let Some((idx, gap)) = best {
            if gap <= tolerance_ms {
                values_a.push(sample.price);
                values_b.push(sorted_b[idx].price);
                next_b = idx + 1;
            }
        }
    }

    (values_a, values_b)
}

fn correlation_of(values_a: &[f64], values_b: &[f64]) -> Option<f64> {
    let mean_a = mean(values_a);
    let mean_b = mean(values_b);

    let std_dev_a = sample_std_dev(values_a, mean_a);
    let std_dev_b = sample_std_dev(values_b, mean_b);

    if !std_dev_a.is_finite() || !std_dev_b.is_finite() || std_dev_a == 0.0 || std_dev_b == 0.0 {
        return None;
    }

    let cov = covariance(values_a, mean_a, values_b, mean_b);
    let r = cov / (std_dev_a * std_dev_b);
    // Overflow in the sums surfaces as NaN or infinity
    if !r.is_finite() {
        return None;
    }
    // Rounding can push |r| a hair past 1
    Some(r.clamp(-1.0, 1.0))
}
