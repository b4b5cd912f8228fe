//! shrinkage::options — estimator configuration.
//!
//! Purpose
//! -------
//! Hold the single tuning knob of the estimator: the normalization used by
//! every across-subject variance. The same divisor is applied to the noise,
//! scan-rescan and total variances so that `var_within / var_total` does not
//! depend on it.
//!
//! Conventions
//! -----------
//! - `Sample` (divide by `n − 1`) is the default.
//! - Names accepted by [`VarianceNormalization::from_str`] are
//!   `"sample"`/`"unbiased"` and `"population"`/`"biased"`, case-insensitive.

use std::str::FromStr;

use crate::shrinkage::errors::{ShrinkageError, ShrinkageResult};

/// Divisor used for across-subject variances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VarianceNormalization {
    /// Unbiased sample variance, divide by `n − 1`.
    #[default]
    Sample,
    /// Population variance, divide by `n`.
    Population,
}

impl VarianceNormalization {
    /// Delta degrees of freedom passed to `ndarray`'s `var_axis`.
    pub fn ddof(&self) -> f64 {
        match self {
            VarianceNormalization::Sample => 1.0,
            VarianceNormalization::Population => 0.0,
        }
    }
}

impl FromStr for VarianceNormalization {
    type Err = ShrinkageError;

    fn from_str(s: &str) -> ShrinkageResult<Self> {
        match s.to_lowercase().as_str() {
            "sample" | "unbiased" => Ok(VarianceNormalization::Sample),
            "population" | "biased" => Ok(VarianceNormalization::Population),
            other => Err(ShrinkageError::InvalidNormalization { name: other.to_string() }),
        }
    }
}

/// ShrinkageOptions — configuration for [`ShrinkageEstimator`](crate::shrinkage::ShrinkageEstimator).
///
/// Fields
/// ------
/// - `normalization`: [`VarianceNormalization`]
///   Divisor shared by all four variance computations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ShrinkageOptions {
    pub normalization: VarianceNormalization,
}

impl ShrinkageOptions {
    pub fn new(normalization: VarianceNormalization) -> Self {
        ShrinkageOptions { normalization }
    }

    pub fn ddof(&self) -> f64 {
        self.normalization.ddof()
    }
}
