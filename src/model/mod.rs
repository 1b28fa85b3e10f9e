mod grad;
mod linear;

pub use grad::{gradients, Gradients};
pub use linear::LinearSoftmax;
