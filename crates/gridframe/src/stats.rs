#![forbid(unsafe_code)]

/// Descriptive statistics for one column: the three-number summary returned
/// by [`DataFrame::describe`](crate::DataFrame::describe).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColumnSummary {
    pub mean: f64,
    pub median: f64,
    pub std: f64,
}

/// Pluggable provider of the numeric algorithms behind `describe`.
///
/// The frame hands each provider a non-empty sample of the column's numeric
/// cells (missing cells already removed) and only defines the three-number
/// result shape; the numerics live here.
pub trait StatsProvider {
    fn mean(&self, sample: &[f64]) -> f64;
    fn median(&self, sample: &[f64]) -> f64;
    fn std(&self, sample: &[f64]) -> f64;
}

/// Default provider: simple moments.
///
/// Standard deviation is the population form (divide by `n`, not `n - 1`);
/// the even-count median is the midpoint of the two middle values.
#[derive(Clone, Copy, Debug, Default)]
pub struct Moments;

impl StatsProvider for Moments {
    fn mean(&self, sample: &[f64]) -> f64 {
        sample.iter().sum::<f64>() / sample.len() as f64
    }

    fn median(&self, sample: &[f64]) -> f64 {
        let mut sorted = sample.to_vec();
        sorted.sort_by(f64::total_cmp);
        let mid = sorted.len() / 2;
        if sorted.len() % 2 == 0 {
            (sorted[mid - 1] + sorted[mid]) / 2.0
        } else {
            sorted[mid]
        }
    }

    fn std(&self, sample: &[f64]) -> f64 {
        let mean = self.mean(sample);
        let variance = sample
            .iter()
            .map(|v| {
                let d = v - mean;
                d * d
            })
            .sum::<f64>()
            / sample.len() as f64;
        variance.sqrt()
    }
}
