use crate::model::{Gradients, LinearSoftmax};

/// L2 weight penalty: `strength · Σ p²` over every parameter tensor.
///
/// The trainer adds the penalty once per batch to the batch-summed loss, so
/// its effective strength grows with the number of batches per epoch.
#[derive(Debug, Clone, Copy)]
pub struct L2 {
    strength: f32,
}

impl L2 {
    pub fn new(strength: f32) -> Self {
        Self { strength }
    }

    pub fn strength(&self) -> f32 {
        self.strength
    }

    /// The scalar penalty term added to the loss.
    pub fn penalty(&self, model: &LinearSoftmax) -> f32 {
        self.strength * model.squared_norm()
    }

    /// The penalty's contribution to the parameter gradients:
    /// `2 · strength · p` for every parameter.
    pub fn grad(&self, model: &LinearSoftmax) -> Gradients {
        let scale = 2.0 * self.strength;

        Gradients {
            weights: model.weights().mapv(|w| scale * w),
            bias: model.bias().mapv(|b| scale * b),
        }
    }
}
