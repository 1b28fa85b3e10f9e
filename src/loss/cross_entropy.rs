use ndarray::{Array1, Array2, ArrayView2, Axis};

use crate::{MlErr, Result};

/// Transient one-hot expansion of integer class labels.
///
/// # Errors
/// Returns `MlErr::ShapeMismatch` when a label is outside `[0, num_classes)`.
pub fn one_hot(labels: &[usize], num_classes: usize) -> Result<Array2<f32>> {
    let mut expanded = Array2::zeros((labels.len(), num_classes));
    for (i, &label) in labels.iter().enumerate() {
        if label >= num_classes {
            return Err(MlErr::ShapeMismatch {
                what: "class index",
                got: label,
                expected: num_classes,
            });
        }
        expanded[[i, label]] = 1.0;
    }

    Ok(expanded)
}

/// Per-example cross-entropy `−Σ_c onehot(y)_c · ln(p_c)`, summed over
/// classes only. The caller decides how to aggregate over the batch.
///
/// Probabilities are floored at `f32::MIN_POSITIVE` before the log, so
/// entries that underflowed to exactly zero (the stabilized softmax does
/// this at extreme logit margins) yield a large finite loss instead of an
/// infinity, and zero non-target entries cannot turn into `0 · ln(0)` NaNs.
///
/// # Errors
/// Returns `MlErr::ShapeMismatch` when the label count differs from the
/// probability rows, or a label is outside the class range.
pub fn cross_entropy(probs: ArrayView2<f32>, labels: &[usize]) -> Result<Array1<f32>> {
    if labels.len() != probs.nrows() {
        return Err(MlErr::ShapeMismatch {
            what: "labels",
            got: labels.len(),
            expected: probs.nrows(),
        });
    }

    let targets = one_hot(labels, probs.ncols())?;
    let log_probs = probs.mapv(|p| p.max(f32::MIN_POSITIVE).ln());
    let log_likelihood = (&targets * &log_probs).sum_axis(Axis(1));

    Ok(-log_likelihood)
}

#[cfg(test)]
mod test {
    use super::*;
    use ndarray::array;

    #[test]
    fn one_hot_sets_a_single_unit_entry_per_row() {
        let expanded = one_hot(&[1, 0, 2], 3).unwrap();

        assert_eq!(
            expanded,
            array![[0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]]
        );
    }

    #[test]
    fn one_hot_rejects_out_of_range_label() {
        assert!(one_hot(&[3], 3).is_err());
    }

    #[test]
    fn cross_entropy_of_uniform_prediction_is_ln_num_classes() {
        let probs = array![[0.5, 0.5], [0.5, 0.5]];

        let losses = cross_entropy(probs.view(), &[0, 1]).unwrap();

        for &loss in &losses {
            assert!((loss - 2.0f32.ln()).abs() < 1e-6);
        }
    }

    #[test]
    fn cross_entropy_is_non_negative_and_small_when_saturated() {
        let probs = array![[0.999, 0.001], [0.001, 0.999]];

        let losses = cross_entropy(probs.view(), &[0, 1]).unwrap();

        for &loss in &losses {
            assert!(loss >= 0.0);
            assert!(loss < 0.01);
        }
    }

    #[test]
    fn cross_entropy_penalizes_confidently_wrong_predictions() {
        let probs = array![[0.01, 0.99]];

        let losses = cross_entropy(probs.view(), &[0]).unwrap();

        assert!(losses[0] > 4.0);
    }

    #[test]
    fn cross_entropy_stays_finite_when_the_softmax_underflows() {
        // Extreme logit margins drive the losing entry to exactly 0.0.
        let model = {
            let mut model = crate::model::LinearSoftmax::zeros(1, 2);
            let (weights, _) = model.params_mut();
            weights.copy_from_slice(&[1000.0, -1000.0]);
            model
        };
        let probs = model.forward(array![[1.0]].view()).unwrap();
        assert_eq!(probs[[0, 1]], 0.0);

        // Saturated correct prediction: the zero non-target entry must not
        // poison the loss with a NaN.
        let losses = cross_entropy(probs.view(), &[0]).unwrap();
        assert_eq!(losses[0], 0.0);

        // Saturated wrong prediction: large but finite.
        let losses = cross_entropy(probs.view(), &[1]).unwrap();
        assert!(losses[0].is_finite());
        assert!(losses[0] > 80.0);
    }

    #[test]
    fn cross_entropy_rejects_label_count_mismatch() {
        let probs = array![[0.5, 0.5]];
        let err = cross_entropy(probs.view(), &[0, 1]).unwrap_err();
        assert_eq!(
            err,
            MlErr::ShapeMismatch {
                what: "labels",
                got: 2,
                expected: 1,
            }
        );
    }
}
