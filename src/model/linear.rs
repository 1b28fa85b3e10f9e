use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::{MlErr, Result};

/// Standard deviation of the Normal(0, ·) weight initialization.
const INIT_STD: f32 = 0.01;

/// A linear classifier mapping feature rows to class probabilities through
/// an affine transform followed by a row-wise softmax.
///
/// The weight matrix is `[input_dim, num_classes]` and the bias vector
/// `[num_classes]`; there is no hidden state beyond these parameters.
pub struct LinearSoftmax {
    weights: Array2<f32>,
    bias: Array1<f32>,
}

impl LinearSoftmax {
    /// Creates a model with all parameters set to zero.
    pub fn zeros(input_dim: usize, num_classes: usize) -> Self {
        Self {
            weights: Array2::zeros((input_dim, num_classes)),
            bias: Array1::zeros(num_classes),
        }
    }

    /// Creates a model with randomly initialized weights and a zero bias.
    pub fn random<R: Rng>(input_dim: usize, num_classes: usize, rng: &mut R) -> Self {
        let mut model = Self::zeros(input_dim, num_classes);
        model.reinit(rng);
        model
    }

    /// Re-draws the weights from Normal(0, `INIT_STD`) and zeroes the bias,
    /// giving a fresh starting point between experiments.
    pub fn reinit<R: Rng>(&mut self, rng: &mut R) {
        let normal = Normal::new(0.0, INIT_STD).unwrap();
        self.weights.mapv_inplace(|_| normal.sample(rng));
        self.bias.fill(0.0);
    }

    pub fn input_dim(&self) -> usize {
        self.weights.nrows()
    }

    pub fn num_classes(&self) -> usize {
        self.weights.ncols()
    }

    pub fn weights(&self) -> ArrayView2<'_, f32> {
        self.weights.view()
    }

    pub fn bias(&self) -> ArrayView1<'_, f32> {
        self.bias.view()
    }

    /// Affine map `x · W + b`.
    ///
    /// # Errors
    /// Returns `MlErr::ShapeMismatch` when the input width differs from the
    /// weight matrix's row count. This is a caller contract violation.
    pub fn logits(&self, x: ArrayView2<f32>) -> Result<Array2<f32>> {
        if x.ncols() != self.input_dim() {
            return Err(MlErr::ShapeMismatch {
                what: "features",
                got: x.ncols(),
                expected: self.input_dim(),
            });
        }

        Ok(x.dot(&self.weights) + &self.bias)
    }

    /// Row-stochastic class probabilities for a feature batch.
    ///
    /// Each row's maximum is subtracted before exponentiating, so the
    /// normalization stays finite for large-magnitude logits. Entries are
    /// strictly positive for moderate logit magnitudes; at extreme margins
    /// a losing entry can underflow to zero, which the loss guards against.
    ///
    /// # Errors
    /// Same contract as [`LinearSoftmax::logits`].
    pub fn forward(&self, x: ArrayView2<f32>) -> Result<Array2<f32>> {
        let mut z = self.logits(x)?;

        for mut row in z.rows_mut() {
            let max = row.fold(f32::NEG_INFINITY, |m, &v| m.max(v));
            row.mapv_inplace(|v| (v - max).exp());
            let sum = row.sum();
            row.mapv_inplace(|v| v / sum);
        }

        Ok(z)
    }

    /// Sum of squared entries over all parameter tensors.
    pub fn squared_norm(&self) -> f32 {
        self.weights
            .iter()
            .chain(self.bias.iter())
            .map(|p| p * p)
            .sum()
    }

    /// Raw mutable parameter slices for in-place optimizer updates.
    pub(crate) fn params_mut(&mut self) -> (&mut [f32], &mut [f32]) {
        let Self { weights, bias } = self;
        // owned arrays in standard layout always expose their backing slice
        (
            weights.as_slice_mut().unwrap(),
            bias.as_slice_mut().unwrap(),
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use ndarray::array;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn forward_rows_are_stochastic_and_positive() {
        let mut rng = StdRng::seed_from_u64(0);
        let model = LinearSoftmax::random(3, 4, &mut rng);
        let x = array![[0.1, 0.5, 0.9], [1.0, 0.0, 0.3]];

        let probs = model.forward(x.view()).unwrap();

        assert_eq!(probs.dim(), (2, 4));
        for row in probs.rows() {
            let sum: f32 = row.sum();
            assert!((sum - 1.0).abs() < 1e-6, "row sums to {sum}");
            assert!(row.iter().all(|&p| p > 0.0));
        }
    }

    #[test]
    fn forward_is_stable_for_large_logits() {
        let mut model = LinearSoftmax::zeros(1, 2);
        let (weights, _) = model.params_mut();
        weights.copy_from_slice(&[1000.0, -1000.0]);

        let probs = model.forward(array![[1.0]].view()).unwrap();

        assert!(probs.iter().all(|p| p.is_finite()));
        assert!((probs[[0, 0]] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn logits_reject_wrong_input_width() {
        let model = LinearSoftmax::zeros(3, 2);
        let err = model.logits(array![[1.0, 2.0]].view()).unwrap_err();
        assert_eq!(
            err,
            MlErr::ShapeMismatch {
                what: "features",
                got: 2,
                expected: 3,
            }
        );
    }

    #[test]
    fn logits_apply_affine_map() {
        let mut model = LinearSoftmax::zeros(2, 2);
        let (weights, bias) = model.params_mut();
        weights.copy_from_slice(&[1.0, 0.0, 0.0, 1.0]);
        bias.copy_from_slice(&[0.5, -0.5]);

        let z = model.logits(array![[2.0, 3.0]].view()).unwrap();

        assert_eq!(z, array![[2.5, 2.5]]);
    }

    #[test]
    fn reinit_redraws_weights_and_zeroes_bias() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut model = LinearSoftmax::random(4, 3, &mut rng);
        let (_, bias) = model.params_mut();
        bias.fill(1.0);
        let before = model.weights().to_owned();

        model.reinit(&mut rng);

        assert_ne!(model.weights(), before.view());
        assert!(model.bias().iter().all(|&b| b == 0.0));
    }

    #[test]
    fn squared_norm_counts_weights_and_bias() {
        let mut model = LinearSoftmax::zeros(1, 2);
        assert_eq!(model.squared_norm(), 0.0);

        let (weights, bias) = model.params_mut();
        weights.copy_from_slice(&[3.0, 0.0]);
        bias.copy_from_slice(&[0.0, 4.0]);

        assert_eq!(model.squared_norm(), 25.0);
    }
}
