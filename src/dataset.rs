use std::num::NonZeroUsize;

use ndarray::ArrayView2;
use rand::{seq::SliceRandom, Rng};

use crate::{MlErr, Result};

/// A batch of examples: one feature row per example plus its class labels.
pub struct Batch<'a> {
    pub features: ArrayView2<'a, f32>,
    pub labels: &'a [usize],
}

/// An in-memory labeled dataset.
///
/// Features are stored as a flat row-major buffer of `input_dim` values per
/// example; labels are integer class indices. The dataset only provides
/// access to examples, it does not normalize or otherwise transform them.
#[derive(Debug)]
pub struct Dataset {
    input_dim: usize,
    features: Vec<f32>,
    labels: Vec<usize>,
}

impl Dataset {
    /// Creates a dataset from a flat feature buffer and its labels.
    ///
    /// # Errors
    /// Returns `MlErr::InvalidInput` if `input_dim` is zero or the buffer is
    /// not divisible by it, and `MlErr::ShapeMismatch` if the label count
    /// does not match the number of feature rows.
    pub fn new(features: Vec<f32>, labels: Vec<usize>, input_dim: usize) -> Result<Self> {
        if input_dim == 0 {
            return Err(MlErr::InvalidInput("input_dim must be positive"));
        }

        if features.len() % input_dim != 0 {
            return Err(MlErr::InvalidInput(
                "feature buffer is not divisible by input_dim",
            ));
        }

        let rows = features.len() / input_dim;
        if labels.len() != rows {
            return Err(MlErr::ShapeMismatch {
                what: "labels",
                got: labels.len(),
                expected: rows,
            });
        }

        Ok(Self {
            input_dim,
            features,
            labels,
        })
    }

    /// Number of examples.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Width of a feature row.
    pub fn input_dim(&self) -> usize {
        self.input_dim
    }

    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    /// Reorders the examples in place, keeping feature rows and labels in
    /// lockstep. Reproducible given a seeded rng.
    pub fn shuffle<R: Rng>(&mut self, rng: &mut R) {
        let mut order: Vec<usize> = (0..self.len()).collect();
        order.shuffle(rng);

        let mut features = Vec::with_capacity(self.features.len());
        let mut labels = Vec::with_capacity(self.labels.len());
        for &i in &order {
            features.extend_from_slice(&self.features[i * self.input_dim..(i + 1) * self.input_dim]);
            labels.push(self.labels[i]);
        }

        self.features = features;
        self.labels = labels;
    }

    /// Iterates one epoch of batches of at most `batch_size` examples each.
    ///
    /// The final batch may be smaller when the dataset size is not a
    /// multiple of `batch_size`. Calling `batches` again restarts the
    /// iteration for the next epoch.
    pub fn batches(&self, batch_size: NonZeroUsize) -> impl Iterator<Item = Batch<'_>> {
        let size = batch_size.get();
        let dim = self.input_dim;

        // The two chunk streams stay aligned because the feature buffer
        // holds exactly `dim` values per label.
        self.features
            .chunks(size * dim)
            .zip(self.labels.chunks(size))
            .map(move |(rows, labels)| Batch {
                features: ArrayView2::from_shape((labels.len(), dim), rows).unwrap(),
                labels,
            })
    }
}
