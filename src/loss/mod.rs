mod cross_entropy;
mod l2;

pub use cross_entropy::{cross_entropy, one_hot};
pub use l2::L2;
