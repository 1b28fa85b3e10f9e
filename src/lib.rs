//! A linear softmax classifier trained by plain SGD, with an optional L2
//! penalty, illustrating overfitting versus regularized training.

pub mod dataset;
pub mod error;
pub mod eval;
pub mod loss;
pub mod model;
pub mod optimization;
pub mod training;

pub use error::{MlErr, Result};
