use super::Optimizer;

/// Plain stochastic gradient descent.
///
/// No momentum and no decay schedule: the update is deterministic given the
/// gradients and the learning rate, and leaves parameters untouched under a
/// zero gradient.
pub struct GradientDescent {
    learning_rate: f32,
}

impl GradientDescent {
    /// Returns a new `GradientDescent`.
    ///
    /// # Arguments
    /// * `learning_rate` - Scales how far each `update_params` call moves
    ///   the parameters along the negative gradient.
    pub fn new(learning_rate: f32) -> Self {
        Self { learning_rate }
    }
}

impl Optimizer for GradientDescent {
    /// Steps every parameter against its gradient: `param ← param − lr·grad`.
    fn update_params(&mut self, params: &mut [f32], grad: &[f32]) {
        let lr = self.learning_rate;

        for (w, g) in params.iter_mut().zip(grad) {
            *w -= lr * g;
        }
    }
}
