//! shrinkage::inputs — the four surrogate measurements fed to the estimator.
//!
//! Each subject contributes four estimates of the same summary statistic:
//! two from complementary halves of the series (`x1`, `x2`) and two from a
//! second, interleaved split (`x_odd`, `x_even`). [`ShrinkageInputs`] bundles
//! borrowed views of the four arrays so they can be validated and consumed
//! together; [`InputRole`] names each position for error reporting.

use ndarray::{ArrayView, Dimension};

use crate::shrinkage::errors::{ShrinkageError, ShrinkageResult};

/// Number of arrays the estimator consumes.
pub const N_INPUTS: usize = 4;

/// Position of an array within the four-input contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputRole {
    /// Estimate from the first half of the series.
    X1,
    /// Estimate from the second half of the series.
    X2,
    /// Estimate from the odd blocks of the series.
    XOdd,
    /// Estimate from the even blocks of the series.
    XEven,
}

impl InputRole {
    pub const ALL: [InputRole; N_INPUTS] =
        [InputRole::X1, InputRole::X2, InputRole::XOdd, InputRole::XEven];

    pub fn name(&self) -> &'static str {
        match self {
            InputRole::X1 => "x1",
            InputRole::X2 => "x2",
            InputRole::XOdd => "x_odd",
            InputRole::XEven => "x_even",
        }
    }
}

impl std::fmt::Display for InputRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Reject any number of input arrays other than [`N_INPUTS`].
pub fn check_arity(actual: usize) -> ShrinkageResult<()> {
    if actual != N_INPUTS {
        return Err(ShrinkageError::InvalidArgumentCount { expected: N_INPUTS, actual });
    }
    Ok(())
}

/// ShrinkageInputs — borrowed views of `x1`, `x2`, `x_odd`, `x_even`.
///
/// Construction does not validate; call
/// [`validate_inputs`](crate::shrinkage::validation::validate_inputs) (or go
/// through [`ShrinkageEstimator`](crate::shrinkage::ShrinkageEstimator), which
/// does so) before relying on shape agreement.
#[derive(Debug, Clone)]
pub struct ShrinkageInputs<'a, D: Dimension> {
    pub x1: ArrayView<'a, f64, D>,
    pub x2: ArrayView<'a, f64, D>,
    pub x_odd: ArrayView<'a, f64, D>,
    pub x_even: ArrayView<'a, f64, D>,
}

impl<'a, D: Dimension> ShrinkageInputs<'a, D> {
    pub fn new(
        x1: ArrayView<'a, f64, D>, x2: ArrayView<'a, f64, D>, x_odd: ArrayView<'a, f64, D>,
        x_even: ArrayView<'a, f64, D>,
    ) -> Self {
        ShrinkageInputs { x1, x2, x_odd, x_even }
    }

    /// Bundle a slice of arrays given in `x1, x2, x_odd, x_even` order.
    ///
    /// Errors
    /// ------
    /// - `ShrinkageError::InvalidArgumentCount`
    ///   Returned when `arrays.len() != 4`.
    pub fn from_slice(arrays: &[ArrayView<'a, f64, D>]) -> ShrinkageResult<Self> {
        let [x1, x2, x_odd, x_even] = arrays else {
            return Err(ShrinkageError::InvalidArgumentCount {
                expected: N_INPUTS,
                actual: arrays.len(),
            });
        };
        Ok(Self::new(x1.clone(), x2.clone(), x_odd.clone(), x_even.clone()))
    }

    /// The four views paired with their roles, in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (InputRole, &ArrayView<'a, f64, D>)> {
        InputRole::ALL.into_iter().zip([&self.x1, &self.x2, &self.x_odd, &self.x_even])
    }
}
