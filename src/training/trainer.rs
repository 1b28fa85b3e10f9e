use std::num::NonZeroUsize;

use log::info;
use rand::Rng;

use crate::{
    dataset::{Batch, Dataset},
    eval::accuracy,
    loss::{cross_entropy, L2},
    model::{gradients, LinearSoftmax},
    optimization::Optimizer,
    Result,
};

/// Smoothing factor of the reported loss moving average.
const LOSS_SMOOTHING: f32 = 0.99;

/// Summary of a finished training run.
#[derive(Debug, Clone, Copy)]
pub struct TrainReport {
    pub epochs_run: usize,
    /// Exponential moving average of the per-batch loss at the end of training.
    pub smoothed_loss: f32,
    pub train_accuracy: f32,
    pub test_accuracy: f32,
}

/// Runs plain SGD over a fixed number of epochs.
///
/// Each epoch optionally shuffles the training set and then folds over its
/// batch stream; each batch goes through forward, loss, closed-form
/// gradients and an in-place parameter update, strictly in that order.
/// There is no early stopping and no convergence check: the loop always
/// runs the configured epoch count.
///
/// Built through [`TrainerBuilder`](super::TrainerBuilder).
pub struct Trainer<O: Optimizer, R: Rng> {
    pub(super) optimizer: O,
    pub(super) epochs: usize,
    pub(super) batch_size: NonZeroUsize,
    pub(super) penalty: L2,
    pub(super) shuffle: bool,
    pub(super) eval_every: NonZeroUsize,
    pub(super) rng: R,
}

impl<O: Optimizer, R: Rng> Trainer<O, R> {
    /// Trains `model` on `train`, logging accuracy on both splits every
    /// `eval_every` epochs. The model is mutated in place; the datasets are
    /// only read (`train` is borrowed mutably for shuffling).
    ///
    /// # Errors
    /// Propagates shape mismatches between the datasets and the model, and
    /// rejects empty datasets.
    pub fn train(
        &mut self,
        model: &mut LinearSoftmax,
        train: &mut Dataset,
        test: &Dataset,
    ) -> Result<TrainReport> {
        let mut smoothed_loss = None;

        for epoch in 1..=self.epochs {
            if self.shuffle {
                train.shuffle(&mut self.rng);
            }

            // The moving average is the fold accumulator; it is seeded by
            // the first batch loss and carried across epochs.
            smoothed_loss = train
                .batches(self.batch_size)
                .try_fold(smoothed_loss, |ema, batch| {
                    let loss = self.step(model, &batch)?;

                    Ok(Some(match ema {
                        Some(ema) => LOSS_SMOOTHING * ema + (1.0 - LOSS_SMOOTHING) * loss,
                        None => loss,
                    }))
                })?;

            if epoch % self.eval_every.get() == 0 || epoch == self.epochs {
                let train_acc = accuracy(model, train, self.batch_size)?;
                let test_acc = accuracy(model, test, self.batch_size)?;
                info!(
                    "epoch {epoch}: loss = {:.6}, train accuracy = {train_acc:.4}, test accuracy = {test_acc:.4}",
                    smoothed_loss.unwrap_or(f32::NAN),
                );
            }
        }

        Ok(TrainReport {
            epochs_run: self.epochs,
            smoothed_loss: smoothed_loss.unwrap_or(f32::NAN),
            train_accuracy: accuracy(model, train, self.batch_size)?,
            test_accuracy: accuracy(model, test, self.batch_size)?,
        })
    }

    /// One forward/backward/update transition over a single batch.
    ///
    /// Returns the batch-summed cross-entropy plus the L2 penalty, which is
    /// added once per batch.
    fn step(&mut self, model: &mut LinearSoftmax, batch: &Batch<'_>) -> Result<f32> {
        let probs = model.forward(batch.features)?;
        let loss =
            cross_entropy(probs.view(), batch.labels)?.sum() + self.penalty.penalty(model);

        let mut grads = gradients(batch.features, probs.view(), batch.labels)?;
        if self.penalty.strength() != 0.0 {
            let reg = self.penalty.grad(model);
            grads.weights += &reg.weights;
            grads.bias += &reg.bias;
        }

        let (weights, bias) = model.params_mut();
        // gradients of owned arrays are standard layout
        self.optimizer
            .update_params(weights, grads.weights.as_slice().unwrap());
        self.optimizer
            .update_params(bias, grads.bias.as_slice().unwrap());

        Ok(loss)
    }
}
