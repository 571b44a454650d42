//! Statistics Calculator Module
//! Descriptive statistics, pairwise correlation and kernel density estimates.

use rayon::prelude::*;
use statrs::distribution::{Continuous, Normal};

/// Descriptive statistics for one numeric column.
#[derive(Debug, Clone, PartialEq)]
pub struct DescriptiveStats {
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub p25: f64,
    pub median: f64,
    pub p75: f64,
    pub max: f64,
}

impl Default for DescriptiveStats {
    fn default() -> Self {
        Self {
            count: 0,
            mean: f64::NAN,
            std: f64::NAN,
            min: f64::NAN,
            p25: f64::NAN,
            median: f64::NAN,
            p75: f64::NAN,
            max: f64::NAN,
        }
    }
}

/// Pearson correlations between named columns, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[row][col]
    }
}

pub struct StatsCalculator;

impl StatsCalculator {
    /// Compute descriptive statistics for an array of values.
    ///
    /// Standard deviation uses the sample (n - 1) convention; it is NaN for a
    /// single value.
    pub fn compute_descriptive_stats(values: &[f64]) -> DescriptiveStats {
        let n = values.len();
        if n == 0 {
            return DescriptiveStats::default();
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let mean = values.iter().sum::<f64>() / n as f64;
        let std = Self::sample_std(values, mean);

        DescriptiveStats {
            count: n,
            mean,
            std,
            min: sorted[0],
            p25: Self::percentile(&sorted, 25.0),
            median: Self::percentile(&sorted, 50.0),
            p75: Self::percentile(&sorted, 75.0),
            max: sorted[n - 1],
        }
    }

    fn sample_std(values: &[f64], mean: f64) -> f64 {
        let n = values.len();
        if n < 2 {
            return f64::NAN;
        }
        let variance = values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
        variance.sqrt()
    }

    /// Calculate percentile using linear interpolation (NumPy compatible).
    pub fn percentile(sorted_values: &[f64], p: f64) -> f64 {
        let n = sorted_values.len();
        if n == 0 {
            return f64::NAN;
        }
        if n == 1 {
            return sorted_values[0];
        }

        let rank = (p / 100.0) * (n - 1) as f64;
        let lower = rank.floor() as usize;
        let upper = (rank.ceil() as usize).min(n - 1);
        let frac = rank - lower as f64;

        if lower == upper {
            sorted_values[lower]
        } else {
            sorted_values[lower] * (1.0 - frac) + sorted_values[upper] * frac
        }
    }

    /// Pearson correlation over the rows where both values are present.
    pub fn pearson(xs: &[Option<f64>], ys: &[Option<f64>]) -> f64 {
        let pairs: Vec<(f64, f64)> = xs
            .iter()
            .zip(ys.iter())
            .filter_map(|(x, y)| match (x, y) {
                (Some(x), Some(y)) if !x.is_nan() && !y.is_nan() => Some((*x, *y)),
                _ => None,
            })
            .collect();

        let n = pairs.len() as f64;
        if n < 2.0 {
            return f64::NAN;
        }

        let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
        let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

        let mut cov = 0.0;
        let mut var_x = 0.0;
        let mut var_y = 0.0;
        for (x, y) in &pairs {
            cov += (x - mean_x) * (y - mean_y);
            var_x += (x - mean_x).powi(2);
            var_y += (y - mean_y).powi(2);
        }

        let denom = (var_x * var_y).sqrt();
        if denom == 0.0 {
            f64::NAN
        } else {
            cov / denom
        }
    }

    /// Compute the full correlation matrix, one row per thread.
    pub fn correlation_matrix(columns: &[(String, Vec<Option<f64>>)]) -> CorrelationMatrix {
        let values = columns
            .par_iter()
            .map(|(_, xs)| {
                columns
                    .iter()
                    .map(|(_, ys)| Self::pearson(xs, ys))
                    .collect::<Vec<f64>>()
            })
            .collect();

        CorrelationMatrix {
            columns: columns.iter().map(|(name, _)| name.clone()).collect(),
            values,
        }
    }

    /// Gaussian kernel bandwidth by Scott's rule.
    pub fn scott_bandwidth(values: &[f64]) -> Option<f64> {
        let n = values.len();
        if n < 2 {
            return None;
        }
        let mean = values.iter().sum::<f64>() / n as f64;
        let std = Self::sample_std(values, mean);
        let bandwidth = std * (n as f64).powf(-0.2);
        (bandwidth > 0.0 && bandwidth.is_finite()).then_some(bandwidth)
    }

    /// Gaussian kernel density estimate evaluated at each grid point.
    pub fn kernel_density(values: &[f64], grid: &[f64]) -> Option<Vec<f64>> {
        let bandwidth = Self::scott_bandwidth(values)?;
        let kernels: Vec<Normal> = values
            .iter()
            .filter_map(|&v| Normal::new(v, bandwidth).ok())
            .collect();
        if kernels.is_empty() {
            return None;
        }

        let n = kernels.len() as f64;
        Some(
            grid.par_iter()
                .map(|&x| kernels.iter().map(|k| k.pdf(x)).sum::<f64>() / n)
                .collect(),
        )
    }
}
