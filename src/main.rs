use std::num::NonZeroUsize;

use anyhow::Result;
use linear_softmax::{
    dataset::Dataset, model::LinearSoftmax, optimization::GradientDescent,
    training::TrainerBuilder,
};
use log::info;
use rand::{rngs::StdRng, Rng, SeedableRng};

const SIDE: usize = 8;
const INPUT_DIM: usize = SIDE * SIDE;
const NUM_CLASSES: usize = 2;

const EPOCHS: usize = 200;
const LEARNING_RATE: f32 = 0.05;
const L2_STRENGTH: f32 = 1e-3;

/// Noisy 8x8 block patterns standing in for digit images: class 0 fills the
/// top half of the image, class 1 the bottom half.
fn block_digits(n: usize, noise: f32, rng: &mut StdRng) -> Result<Dataset> {
    let mut features = Vec::with_capacity(n * INPUT_DIM);
    let mut labels = Vec::with_capacity(n);

    for i in 0..n {
        let class = i % NUM_CLASSES;
        for row in 0..SIDE {
            for _col in 0..SIDE {
                let filled = (class == 0) == (row < SIDE / 2);
                let base = if filled { 0.9 } else { 0.1 };
                features.push((base + noise * (rng.random::<f32>() - 0.5)).clamp(0.0, 1.0));
            }
        }
        labels.push(class);
    }

    Ok(Dataset::new(features, labels, INPUT_DIM)?)
}

fn main() -> Result<()> {
    env_logger::init();

    let mut rng = StdRng::seed_from_u64(7);

    // A tiny, very noisy training set against a larger, cleaner test set:
    // plenty of room for the model to memorize noise.
    let mut train = block_digits(16, 1.6, &mut rng)?;
    let test = block_digits(64, 0.4, &mut rng)?;

    let batch_size = NonZeroUsize::new(4).unwrap();
    let mut model = LinearSoftmax::random(INPUT_DIM, NUM_CLASSES, &mut rng);

    let mut trainer = TrainerBuilder::new()
        .epochs(EPOCHS)
        .batch_size(batch_size)
        .seed(42)
        .build(GradientDescent::new(LEARNING_RATE));
    let plain = trainer.train(&mut model, &mut train, &test)?;
    let plain_norm = model.squared_norm();
    info!(
        "without L2: train accuracy = {:.3}, test accuracy = {:.3}, |params|^2 = {:.4}",
        plain.train_accuracy, plain.test_accuracy, plain_norm
    );

    model.reinit(&mut rng);
    let mut trainer = TrainerBuilder::new()
        .epochs(EPOCHS)
        .batch_size(batch_size)
        .l2_strength(L2_STRENGTH)
        .seed(42)
        .build(GradientDescent::new(LEARNING_RATE));
    let regularized = trainer.train(&mut model, &mut train, &test)?;
    info!(
        "with L2 {L2_STRENGTH}: train accuracy = {:.3}, test accuracy = {:.3}, |params|^2 = {:.4}",
        regularized.train_accuracy,
        regularized.test_accuracy,
        model.squared_norm()
    );

    Ok(())
}
