use ndarray::{Array1, Array2, ArrayView2, Axis};

use crate::{MlErr, Result};

/// Parameter gradients matching [`LinearSoftmax`](super::LinearSoftmax)'s
/// weight and bias shapes.
#[derive(Debug)]
pub struct Gradients {
    pub weights: Array2<f32>,
    pub bias: Array1<f32>,
}

/// Closed-form gradient of the batch-summed cross-entropy loss with respect
/// to the affine map's parameters:
///
/// `dW = Xᵗ(P − onehot(y))`, `db = colsum(P − onehot(y))`
///
/// `probs` must be the softmax output for `x` under the current parameters.
///
/// # Errors
/// Returns `MlErr::ShapeMismatch` when `probs` or `labels` disagree with the
/// batch's row count, or a label is outside the class range.
pub fn gradients(
    x: ArrayView2<f32>,
    probs: ArrayView2<f32>,
    labels: &[usize],
) -> Result<Gradients> {
    if probs.nrows() != x.nrows() {
        return Err(MlErr::ShapeMismatch {
            what: "probs",
            got: probs.nrows(),
            expected: x.nrows(),
        });
    }

    if labels.len() != x.nrows() {
        return Err(MlErr::ShapeMismatch {
            what: "labels",
            got: labels.len(),
            expected: x.nrows(),
        });
    }

    let mut delta = probs.to_owned();
    for (i, &label) in labels.iter().enumerate() {
        if label >= delta.ncols() {
            return Err(MlErr::ShapeMismatch {
                what: "class index",
                got: label,
                expected: delta.ncols(),
            });
        }
        delta[[i, label]] -= 1.0;
    }

    Ok(Gradients {
        weights: x.t().dot(&delta),
        bias: delta.sum_axis(Axis(0)),
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use ndarray::array;

    #[test]
    fn gradient_vanishes_at_perfect_prediction() {
        let x = array![[1.0, 0.0], [0.0, 1.0]];
        let probs = array![[1.0, 0.0], [0.0, 1.0]];

        let grads = gradients(x.view(), probs.view(), &[0, 1]).unwrap();

        assert!(grads.weights.iter().all(|&g| g == 0.0));
        assert!(grads.bias.iter().all(|&g| g == 0.0));
    }

    #[test]
    fn gradient_matches_hand_computation() {
        // Single example, uniform prediction, true class 0:
        // delta = [0.5 - 1, 0.5] = [-0.5, 0.5].
        let x = array![[2.0, -1.0]];
        let probs = array![[0.5, 0.5]];

        let grads = gradients(x.view(), probs.view(), &[0]).unwrap();

        assert_eq!(grads.weights, array![[-1.0, 1.0], [0.5, -0.5]]);
        assert_eq!(grads.bias, array![-0.5, 0.5]);
    }

    #[test]
    fn rejects_out_of_range_label() {
        let x = array![[1.0]];
        let probs = array![[0.6, 0.4]];

        let err = gradients(x.view(), probs.view(), &[2]).unwrap_err();

        assert_eq!(
            err,
            MlErr::ShapeMismatch {
                what: "class index",
                got: 2,
                expected: 2,
            }
        );
    }

    #[test]
    fn rejects_row_count_disagreements() {
        let x = array![[1.0], [2.0]];
        let probs = array![[0.5, 0.5]];
        assert!(gradients(x.view(), probs.view(), &[0, 1]).is_err());

        let probs = array![[0.5, 0.5], [0.5, 0.5]];
        assert!(gradients(x.view(), probs.view(), &[0]).is_err());
    }
}
