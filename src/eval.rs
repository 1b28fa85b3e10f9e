use std::num::NonZeroUsize;

use ndarray::ArrayView1;

use crate::{dataset::Dataset, model::LinearSoftmax, MlErr, Result};

/// Index of the row's largest entry; ties break to the lowest class index.
pub fn argmax(row: ArrayView1<f32>) -> usize {
    let mut best = 0;
    for (i, &v) in row.iter().enumerate() {
        if v > row[best] {
            best = i;
        }
    }

    best
}

/// Fraction of examples whose predicted class matches the label, computed in
/// one full read-only pass over the dataset.
///
/// # Errors
/// Returns `MlErr::InvalidInput` for an empty dataset and propagates shape
/// mismatches between the dataset and the model.
pub fn accuracy(
    model: &LinearSoftmax,
    dataset: &Dataset,
    batch_size: NonZeroUsize,
) -> Result<f32> {
    if dataset.is_empty() {
        return Err(MlErr::InvalidInput("cannot evaluate on an empty dataset"));
    }

    let mut correct = 0usize;
    for batch in dataset.batches(batch_size) {
        let probs = model.forward(batch.features)?;
        for (row, &label) in probs.rows().into_iter().zip(batch.labels) {
            if argmax(row) == label {
                correct += 1;
            }
        }
    }

    Ok(correct as f32 / dataset.len() as f32)
}
