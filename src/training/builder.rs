use std::num::NonZeroUsize;

use rand::{rngs::StdRng, SeedableRng};

use super::Trainer;
use crate::{loss::L2, optimization::Optimizer};

const DEFAULT_EPOCHS: usize = 100;
const DEFAULT_BATCH_SIZE: usize = 32;
const DEFAULT_EVAL_EVERY: usize = 10;

/// Configures and builds [`Trainer`]s.
///
/// Defaults: 100 epochs, batches of 32, no L2 penalty, shuffling on,
/// accuracy reported every 10 epochs, OS-seeded rng.
pub struct TrainerBuilder {
    epochs: usize,
    batch_size: NonZeroUsize,
    l2_strength: f32,
    shuffle: bool,
    eval_every: NonZeroUsize,
    seed: Option<u64>,
}

impl Default for TrainerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TrainerBuilder {
    pub fn new() -> Self {
        Self {
            epochs: DEFAULT_EPOCHS,
            batch_size: NonZeroUsize::new(DEFAULT_BATCH_SIZE).unwrap(),
            l2_strength: 0.0,
            shuffle: true,
            eval_every: NonZeroUsize::new(DEFAULT_EVAL_EVERY).unwrap(),
            seed: None,
        }
    }

    /// Number of epochs every `train` call runs, with no early stopping.
    pub fn epochs(mut self, epochs: usize) -> Self {
        self.epochs = epochs;
        self
    }

    /// Upper bound on the number of examples per batch.
    pub fn batch_size(mut self, batch_size: NonZeroUsize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Strength of the L2 penalty; zero disables it.
    pub fn l2_strength(mut self, strength: f32) -> Self {
        self.l2_strength = strength;
        self
    }

    /// Whether the training set is reshuffled at the start of each epoch.
    pub fn shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    /// Epochs between accuracy reports on the two splits.
    pub fn eval_every(mut self, eval_every: NonZeroUsize) -> Self {
        self.eval_every = eval_every;
        self
    }

    /// Fixes the rng seed, making shuffling reproducible across runs.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn build<O: Optimizer>(self, optimizer: O) -> Trainer<O, StdRng> {
        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Trainer {
            optimizer,
            epochs: self.epochs,
            batch_size: self.batch_size,
            penalty: L2::new(self.l2_strength),
            shuffle: self.shuffle,
            eval_every: self.eval_every,
            rng,
        }
    }
}
