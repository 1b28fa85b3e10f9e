/// In-place update rule for a flat parameter slice.
///
/// Parameters and gradients are matched element by element; how the
/// gradients were produced is not this trait's concern.
pub trait Optimizer {
    fn update_params(&mut self, params: &mut [f32], grad: &[f32]);
}
