use super::Optimizer;
use crate::Params;

/// Sign descent optimization algorithm.
///
/// It isn't a gradient method: every parameter moves by the same `learning_rate` against the sign
/// of the scalar loss, so all components shift together.
#[derive(Debug, Clone, Copy)]
pub struct SignDescent {
    learning_rate: f32,
}

impl SignDescent {
    /// Returns a new `SignDescent`.
    ///
    /// # Arguments
    /// * `learning_rate` - The *length* of the steps taken on `step`.
    pub fn new(learning_rate: f32) -> Self {
        Self { learning_rate }
    }

    /// The magnitude of every step.
    pub fn learning_rate(&self) -> f32 {
        self.learning_rate
    }
}

impl Optimizer for SignDescent {
    fn step(&mut self, params: &Params, loss: f32) -> Params {
        let delta = self.learning_rate * loss_sign(loss);
        params.mapv(|p| p - delta)
    }
}

/// The sign of a loss: `1`, `-1`, `0` for zero and `NaN` for `NaN`.
///
/// Unlike `f32::signum`, a zero loss doesn't move the parameters.
#[inline]
pub fn loss_sign(loss: f32) -> f32 {
    if loss > 0. {
        1.
    } else if loss < 0. {
        -1.
    } else if loss == 0. {
        0.
    } else {
        f32::NAN
    }
}
