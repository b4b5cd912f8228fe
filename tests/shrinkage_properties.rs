//! Property tests for the shrinkage estimator.
//!
//! Purpose
//! -------
//! - Check the estimator's invariants on randomly generated inputs rather
//!   than hand-picked ones.
//!
//! Coverage
//! --------
//! - lambda ∈ [0, 1] for every slot.
//! - x_shrink = λ·X̄ + (1 − λ)·X and lies between X̄ and X.
//! - Slots whose total variance is exactly zero get λ = 0 and are returned
//!   unchanged.
//! - Output shapes.
//! - Invalid shapes are rejected rather than panicking.
use ndarray::Array2;
use proptest::prelude::*;
use subject_shrinkage::shrinkage::{ShrinkageError, ShrinkageEstimator};

type Quad = (Array2<f64>, Array2<f64>, Array2<f64>, Array2<f64>);

/// Four (p, n) arrays with 1 ≤ p ≤ 4 slots and 2 ≤ n ≤ 9 subjects.
fn quad_strategy() -> impl Strategy<Value = Quad> {
    (1usize..=4, 2usize..=9).prop_flat_map(|(p, n)| {
        let cells = prop::collection::vec(-10.0f64..10.0, p * n);
        (cells.clone(), cells.clone(), cells.clone(), cells).prop_map(move |(a, b, c, d)| {
            let shape = (p, n);
            (
                Array2::from_shape_vec(shape, a).unwrap(),
                Array2::from_shape_vec(shape, b).unwrap(),
                Array2::from_shape_vec(shape, c).unwrap(),
                Array2::from_shape_vec(shape, d).unwrap(),
            )
        })
    })
}

proptest! {
    #[test]
    fn lambda_lies_in_unit_interval((x1, x2, x_odd, x_even) in quad_strategy()) {
        let outcome = ShrinkageEstimator::default()
            .estimate(x1.view(), x2.view(), x_odd.view(), x_even.view())
            .unwrap();

        for &l in outcome.lambda().iter() {
            prop_assert!((0.0..=1.0).contains(&l), "lambda out of range: {}", l);
        }
    }

    #[test]
    fn shrunk_values_are_convex_combinations((x1, x2, x_odd, x_even) in quad_strategy()) {
        let outcome = ShrinkageEstimator::default()
            .estimate(x1.view(), x2.view(), x_odd.view(), x_even.view())
            .unwrap();
        let x = (&x1 + &x2) / 2.0;
        let (p, n) = x.dim();

        for i in 0..p {
            let l = outcome.lambda()[i];
            let mean = outcome.group_mean()[i];
            for s in 0..n {
                let est = x[[i, s]];
                let got = outcome.x_shrink()[[i, s]];
                let expected = l * mean + (1.0 - l) * est;
                prop_assert!((got - expected).abs() <= 1e-12 * (1.0 + expected.abs()));

                let tol = 1e-12 * (1.0 + mean.abs().max(est.abs()));
                prop_assert!(got >= mean.min(est) - tol && got <= mean.max(est) + tol,
                    "{} not between {} and {}", got, mean, est);
            }
        }
    }

    #[test]
    fn output_shapes_follow_inputs((x1, x2, x_odd, x_even) in quad_strategy()) {
        let outcome = ShrinkageEstimator::default()
            .estimate(x1.view(), x2.view(), x_odd.view(), x_even.view())
            .unwrap();

        prop_assert_eq!(outcome.x_shrink().shape(), x1.shape());
        prop_assert_eq!(outcome.lambda().shape(), &x1.shape()[..1]);
    }

    #[test]
    fn constant_slot_gets_zero_lambda(
        (x1, x2, x_odd, x_even) in quad_strategy(),
        level in -5.0f64..5.0,
    ) {
        // Overwrite slot 0 with the same value for every subject in x1 and
        // x2, so X is constant there and its total variance is exactly zero.
        let (mut x1, mut x2) = (x1, x2);
        x1.row_mut(0).fill(level);
        x2.row_mut(0).fill(level);

        let outcome = ShrinkageEstimator::default()
            .estimate(x1.view(), x2.view(), x_odd.view(), x_even.view())
            .unwrap();

        prop_assert_eq!(outcome.components().var_total[0], 0.0);
        prop_assert_eq!(outcome.lambda()[0], 0.0);
        for &v in outcome.x_shrink().row(0).iter() {
            prop_assert_eq!(v, level);
        }
    }

    #[test]
    fn mismatched_subject_counts_are_rejected((x1, x2, x_odd, _) in quad_strategy()) {
        let (p, n) = x1.dim();
        let wider = Array2::<f64>::zeros((p, n + 1));

        let result = ShrinkageEstimator::default()
            .estimate(x1.view(), x2.view(), x_odd.view(), wider.view());

        let is_shape_mismatch = matches!(result, Err(ShrinkageError::ShapeMismatch { .. }));
        prop_assert!(is_shape_mismatch);
    }
}
