use statrs::distribution::{ContinuousCDF, Normal as Gaussian};
use std::fmt;

use crate::error::AppError;

/// Normal-distribution summary of one numeric metric across a set of matches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normal {
    pub mean: f64,
    /// Sample standard deviation (n - 1 denominator); 0 for a single
    /// observation.
    pub std_dev: f64,
}

impl Normal {
    /// Fits a normal to a non-empty sample.
    ///
    /// A single observation has no measurable spread, so its standard
    /// deviation is 0 rather than an error.
    pub fn from_samples<I>(samples: I) -> Result<Normal, AppError>
    where
        I: IntoIterator<Item = f64>,
    {
        let values: Vec<f64> = samples.into_iter().collect();

        if values.is_empty() {
            return Err(AppError::EmptySample);
        }

        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;

        let std_dev = if values.len() > 1 {
            let sum_sq: f64 = values.iter().map(|x| (x - mean).powi(2)).sum();
            (sum_sq / (n - 1.0)).sqrt()
        } else {
            0.0
        };

        Ok(Normal { mean, std_dev })
    }

    /// Quantile function (inverse CDF) of N(mean, std_dev) at cumulative
    /// probability `p`, for `p` in (0, 1). At `p = 0.5` this is the mean.
    ///
    /// A distribution with no spread answers every quantile with its mean.
    pub fn percentile(&self, p: f64) -> f64 {
        if self.std_dev <= 0.0 {
            return self.mean;
        }

        match Gaussian::new(self.mean, self.std_dev) {
            Ok(dist) => dist.inverse_cdf(p),
            Err(_) => self.mean,
        }
    }
}

impl fmt::Display for Normal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "N(μ: {:.4}, σ: {:.4})", self.mean, self.std_dev)
    }
}
