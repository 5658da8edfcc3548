use crate::Params;

/// Defines how a role's parameters move after a loss evaluation.
pub trait Optimizer {
    /// Returns the parameters that replace `params` after observing `loss`.
    ///
    /// # Arguments
    /// * `params` - The current parameters, left untouched.
    /// * `loss` - The scalar loss measured with `params`.
    fn step(&mut self, params: &Params, loss: f32) -> Params;
}
