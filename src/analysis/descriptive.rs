//! Descriptive statistics over measurement samples.
//!
//! All functions handle short or empty input explicitly (`Option` returns)
//! and reject non-finite values rather than letting a stray NaN poison a
//! group mean. Percentiles use linear interpolation between order
//! statistics, the same convention the field workbooks and the comparison
//! plots were built with.

use serde::Serialize;

/// Arithmetic mean. `None` if `data` is empty or contains a non-finite value.
pub fn mean(data: &[f64]) -> Option<f64> {
    if data.is_empty() || !data.iter().all(|x| x.is_finite()) {
        return None;
    }
    Some(data.iter().sum::<f64>() / data.len() as f64)
}

/// Sample standard deviation (Bessel's correction, denominator `n − 1`),
/// computed with Welford's online update to avoid catastrophic
/// cancellation. `None` if `data.len() < 2` or contains a non-finite value.
pub fn std_dev(data: &[f64]) -> Option<f64> {
    if data.len() < 2 || !data.iter().all(|x| x.is_finite()) {
        return None;
    }
    let mut count = 0.0f64;
    let mut running_mean = 0.0f64;
    let mut m2 = 0.0f64;
    for &x in data {
        count += 1.0;
        let delta = x - running_mean;
        running_mean += delta / count;
        m2 += delta * (x - running_mean);
    }
    Some((m2 / (count - 1.0)).sqrt())
}

/// Percentile `p` in `[0, 100]` with linear interpolation between the two
/// nearest order statistics. `None` for empty input, non-finite values, or
/// `p` outside the range.
pub fn percentile(data: &[f64], p: f64) -> Option<f64> {
    if data.is_empty() || !data.iter().all(|x| x.is_finite()) {
        return None;
    }
    if !(0.0..=100.0).contains(&p) {
        return None;
    }
    let mut sorted = data.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let rank = p / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Five-number quartile summary with Tukey adjacent values, plus the
/// sample size. This is the full set of numbers a box/violin rendering
/// consumer needs for one group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuartileSummary {
    pub n: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    /// Lowest observation within 1.5 IQR below Q1.
    pub whisker_low: f64,
    /// Highest observation within 1.5 IQR above Q3.
    pub whisker_high: f64,
}

/// Summarizes one sample. `None` for empty input or non-finite values.
pub fn quartile_summary(data: &[f64]) -> Option<QuartileSummary> {
    let q1 = percentile(data, 25.0)?;
    let median = percentile(data, 50.0)?;
    let q3 = percentile(data, 75.0)?;
    let mut sorted = data.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let min = sorted[0];
    let max = sorted[sorted.len() - 1];
    let (whisker_low, whisker_high) = adjacent_values(&sorted, q1, q3);
    Some(QuartileSummary {
        n: data.len(),
        min,
        q1,
        median,
        q3,
        max,
        whisker_low,
        whisker_high,
    })
}

/// Tukey adjacent values: the whisker endpoints clipped to 1.5 IQR beyond
/// the quartiles and to the observed range. `sorted` must be ascending.
pub fn adjacent_values(sorted: &[f64], q1: f64, q3: f64) -> (f64, f64) {
    let iqr = q3 - q1;
    let upper = (q3 + 1.5 * iqr).clamp(q3, sorted[sorted.len() - 1]);
    let lower = (q1 - 1.5 * iqr).clamp(sorted[0], q1);
    (lower, upper)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
